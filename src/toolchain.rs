//! External toolchain invocation.
//!
//! Four programs do the actual conversion work: `latex` typesets the
//! generated document, `dvips` and `ps2pdf` turn the DVI output into a
//! PDF, and `pdfcrop` trims surrounding whitespace. The [`Toolchain`]
//! trait isolates those invocations so the orchestrator can be exercised
//! in tests without a TeX installation.
//!
//! Every invocation runs with the figure's directory as its working
//! directory, receives its arguments as an explicit vector (file names are
//! never interpolated into a shell string), has stdout suppressed, and
//! reports only its exit status. A tool that cannot be launched at all is
//! a [`ToolchainError`], distinct from a tool that ran and failed.

use std::path::Path;
use std::process::{Command, Stdio};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ToolchainError {
    #[error("failed to launch {tool}: {source}")]
    Launch {
        tool: String,
        source: std::io::Error,
    },
}

/// The four external conversion steps.
///
/// Each step returns the tool's exit status: `0` for success, non-zero for
/// a tool that ran and failed. All file arguments are names relative to
/// `dir`.
pub trait Toolchain {
    /// Typeset `tex_file`, producing `<stem>.dvi` alongside it.
    fn typeset(&self, dir: &Path, tex_file: &str) -> Result<i32, ToolchainError>;

    /// Convert `dvi_file` to PostScript `ps_file`.
    fn dvi_to_ps(&self, dir: &Path, dvi_file: &str, ps_file: &str) -> Result<i32, ToolchainError>;

    /// Convert PostScript `ps_file` to `pdf_file`.
    fn ps_to_pdf(&self, dir: &Path, ps_file: &str, pdf_file: &str) -> Result<i32, ToolchainError>;

    /// Crop `input_pdf`, writing the result to `output_pdf`.
    fn crop(&self, dir: &Path, input_pdf: &str, output_pdf: &str) -> Result<i32, ToolchainError>;
}

/// Production toolchain invoking the configured external programs.
pub struct CommandToolchain {
    latex: String,
    dvips: String,
    ps2pdf: String,
    pdfcrop: String,
}

impl CommandToolchain {
    pub fn new(tools: &crate::config::ToolsConfig) -> Self {
        Self {
            latex: tools.latex.clone(),
            dvips: tools.dvips.clone(),
            ps2pdf: tools.ps2pdf.clone(),
            pdfcrop: tools.pdfcrop.clone(),
        }
    }

    fn run(&self, dir: &Path, program: &str, args: &[&str]) -> Result<i32, ToolchainError> {
        log::debug!("running {program} {args:?} in {}", dir.display());
        let status = Command::new(program)
            .args(args)
            .current_dir(dir)
            .stdout(Stdio::null())
            .status()
            .map_err(|source| ToolchainError::Launch {
                tool: program.to_string(),
                source,
            })?;
        // A signal-terminated child has no exit code; report it as failure.
        let code = status.code().unwrap_or(-1);
        log::debug!("{program} exited with status {code}");
        Ok(code)
    }
}

impl Default for CommandToolchain {
    fn default() -> Self {
        Self::new(&crate::config::ToolsConfig::default())
    }
}

impl Toolchain for CommandToolchain {
    fn typeset(&self, dir: &Path, tex_file: &str) -> Result<i32, ToolchainError> {
        self.run(
            dir,
            &self.latex,
            &["-halt-on-error", "-interaction=batchmode", tex_file],
        )
    }

    fn dvi_to_ps(&self, dir: &Path, dvi_file: &str, ps_file: &str) -> Result<i32, ToolchainError> {
        self.run(dir, &self.dvips, &["-q", "-o", ps_file, dvi_file])
    }

    fn ps_to_pdf(&self, dir: &Path, ps_file: &str, pdf_file: &str) -> Result<i32, ToolchainError> {
        self.run(dir, &self.ps2pdf, &[ps_file, pdf_file])
    }

    fn crop(&self, dir: &Path, input_pdf: &str, output_pdf: &str) -> Result<i32, ToolchainError> {
        self.run(dir, &self.pdfcrop, &[input_pdf, output_pdf])
    }
}
