use clap::{Parser, Subcommand};
use frag2pdf::toolchain::CommandToolchain;
use frag2pdf::{batch, config, output};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Shared flags for commands that convert figures.
#[derive(clap::Args, Clone)]
struct CropArgs {
    /// Skip the crop step and keep the full-page PDF
    #[arg(long)]
    no_crop: bool,
}

#[derive(Parser)]
#[command(name = "frag2pdf")]
#[command(about = "Convert EPS figures to cropped PDFs with psfrag replacements")]
#[command(long_about = "\
Convert EPS figures to cropped PDFs with psfrag replacements

Each figure FIG is typeset through latex, dvips, ps2pdf, and pdfcrop,
substituting the placeholder labels embedded in FIG.eps with the LaTeX
replacements listed in FIG.psfrags:

  [width=\\textwidth]                 # optional first line: \\includegraphics options
  \\psfrag{xlabel}{Time (s)}          # one \\psfrag directive per line
  \\psfrag{ylabel}[cc][cc]{$E_b/N_0$}

Replacements that need extra packages can put \\usepackage lines in
FIG_extra_packages.tex or, as a shared fallback, extra_latex_packages.tex
next to the figure.

A failed run leaves FIG_psfrag_replace_debug.tex behind; typeset it
manually to see what went wrong.

Run 'frag2pdf gen-config' to generate a documented frag2pdf.toml.")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert the named figures (each NAME reads NAME.psfrags)
    Convert {
        /// Figure name(s) without the .eps extension
        names: Vec<PathBuf>,

        /// Read replacements from this file instead of NAME.psfrags
        /// (requires exactly one NAME)
        #[arg(long)]
        replacements: Option<PathBuf>,

        #[command(flatten)]
        crop: CropArgs,
    },
    /// Convert every figure with a .psfrags file in the given folders
    Folder {
        /// Folder(s) to scan for *.psfrags files
        dirs: Vec<PathBuf>,

        #[command(flatten)]
        crop: CropArgs,
    },
    /// Print a stock frag2pdf.toml with all options documented
    GenConfig,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let config = match config::load_config(Path::new(".")) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("frag2pdf: {err}");
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Command::Convert {
            names,
            replacements,
            crop,
        } => {
            if names.is_empty() {
                eprintln!("frag2pdf: no figure names supplied");
                return ExitCode::FAILURE;
            }
            if replacements.is_some() && names.len() != 1 {
                eprintln!("frag2pdf: --replacements requires exactly one figure name");
                return ExitCode::FAILURE;
            }
            let toolchain = CommandToolchain::new(&config.tools);
            let outcomes = batch::convert_files(
                &toolchain,
                &names,
                replacements.as_deref(),
                config.output.crop && !crop.no_crop,
            );
            output::print_outcomes(&outcomes);
            batch_exit_code(&outcomes)
        }
        Command::Folder { dirs, crop } => {
            if dirs.is_empty() {
                eprintln!("frag2pdf: no folders supplied");
                return ExitCode::FAILURE;
            }
            let toolchain = CommandToolchain::new(&config.tools);
            let outcomes =
                batch::convert_folders(&toolchain, &dirs, config.output.crop && !crop.no_crop);
            output::print_outcomes(&outcomes);
            batch_exit_code(&outcomes)
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
            ExitCode::SUCCESS
        }
    }
}

/// Exit 0 only when every item converted; per-item failures were already
/// reported and never abort the batch.
fn batch_exit_code(outcomes: &[batch::ItemOutcome]) -> ExitCode {
    if outcomes.iter().all(batch::ItemOutcome::succeeded) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
