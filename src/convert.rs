//! Conversion orchestration.
//!
//! Drives one figure through the pipeline: assemble the LaTeX document,
//! typeset it, convert DVI → PS → PDF, optionally crop, and clean up every
//! intermediate artifact. The sequence is strictly linear; each external
//! tool blocks until completion and only its exit status is inspected.
//!
//! ## File naming
//!
//! For a figure `fig1`, the intermediate document is written to
//! `fig1_psfrag_replace.tex` — derived from the figure name so that
//! conversions of *different* figures in the same directory never collide
//! (two conversions of the *same* figure in the same directory are not
//! safe concurrently). A failed run leaves `fig1_psfrag_replace_debug.tex`
//! behind for manual inspection; everything else matching the
//! `fig1_psfrag_replace.` prefix is removed unconditionally at the end.
//!
//! ## Working directory
//!
//! A figure path may carry a directory component. The orchestrator never
//! changes the process working directory; it passes the figure's own
//! directory to every step explicitly and operates on base names inside
//! it.

use crate::directives::ReplacementSpec;
use crate::template;
use crate::toolchain::{Toolchain, ToolchainError};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Toolchain(#[from] ToolchainError),
    #[error("figure path has no base name: {0}")]
    InvalidName(PathBuf),
}

/// One conversion to perform.
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    /// Figure path without extension; may include a directory component.
    pub figure: PathBuf,
    /// Replacements to apply inside the figure.
    pub replacements: ReplacementSpec,
    /// `\includegraphics` options, brackets included. `None` (or empty)
    /// includes the figure at natural scale.
    pub inclusion_options: Option<String>,
    /// Crop the final PDF with the external crop tool.
    pub crop: bool,
}

/// Outcome of one conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionResult {
    pub succeeded: bool,
    /// Exit status of the failing step, or 0.
    pub exit_code: i32,
    /// Debug copy of the document source, kept when a step failed.
    pub diagnostic_path: Option<PathBuf>,
    /// The crop tool reported failure; the uncropped PDF was kept.
    pub crop_failed: bool,
}

impl ConversionResult {
    fn failure(exit_code: i32, diagnostic_path: PathBuf) -> Self {
        Self {
            succeeded: false,
            exit_code,
            diagnostic_path: Some(diagnostic_path),
            crop_failed: false,
        }
    }
}

/// Names of every file a conversion touches, all derived from the figure
/// base name.
struct WorkFiles {
    stem: String,
    tex: String,
    debug_tex: String,
    dvi: String,
    ps: String,
    /// Final output, named after the figure itself.
    pdf: String,
}

impl WorkFiles {
    fn for_figure(figure: &str) -> Self {
        let stem = format!("{figure}_psfrag_replace");
        Self {
            tex: format!("{stem}.tex"),
            debug_tex: format!("{stem}_debug.tex"),
            dvi: format!("{stem}.dvi"),
            ps: format!("{stem}.ps"),
            pdf: format!("{figure}.pdf"),
            stem,
        }
    }

    /// Prefix matching every transient artifact (`<stem>.*`). The trailing
    /// dot keeps `<stem>_debug.*` files out.
    fn temp_prefix(&self) -> String {
        format!("{}.", self.stem)
    }

    /// Prefix matching preserved debug artifacts (`<stem>_debug.*`).
    fn debug_prefix(&self) -> String {
        format!("{}_debug.", self.stem)
    }
}

/// Convert one figure.
///
/// Returns `Err` only for environmental problems (unwritable directory,
/// unlaunchable tool); a tool that runs and fails is a normal
/// [`ConversionResult`] with `succeeded == false`.
pub fn convert(
    toolchain: &impl Toolchain,
    request: &ConversionRequest,
) -> Result<ConversionResult, ConvertError> {
    let (dir, figure) = split_figure(&request.figure)?;
    let names = WorkFiles::for_figure(figure);

    let block = request.replacements.block();
    let options = request.inclusion_options.as_deref().unwrap_or("");
    let extra = template::resolve_extra_packages(&dir, figure);
    let source = template::assemble(figure, &block, options, &extra);
    fs::write(dir.join(&names.tex), source)?;

    log::info!("typesetting {}", names.tex);
    let typeset_status = toolchain.typeset(&dir, &names.tex)?;
    if typeset_status != 0 {
        log::warn!(
            "typesetting failed with status {typeset_status}; keeping {} for inspection",
            names.debug_tex
        );
        let debug_path = dir.join(&names.debug_tex);
        fs::rename(dir.join(&names.tex), &debug_path)?;
        remove_prefixed(&dir, &names.temp_prefix())?;
        return Ok(ConversionResult::failure(typeset_status, debug_path));
    }
    // A previous failed run may have left debug copies behind.
    remove_prefixed(&dir, &names.debug_prefix())?;

    log::info!("converting {} to {}", names.dvi, names.pdf);
    let convert_status = run_conversion(toolchain, &dir, &names)?;

    let mut diagnostic_path = None;
    let mut crop_failed = false;
    if convert_status != 0 {
        log::warn!(
            "DVI-to-PDF conversion failed with status {convert_status}; keeping {} for inspection",
            names.debug_tex
        );
        let debug_path = dir.join(&names.debug_tex);
        fs::rename(dir.join(&names.tex), &debug_path)?;
        diagnostic_path = Some(debug_path);
    } else if request.crop {
        crop_failed = !crop_pdf(toolchain, &dir, &names.pdf)?;
    }

    remove_prefixed(&dir, &names.temp_prefix())?;

    Ok(ConversionResult {
        succeeded: convert_status == 0,
        exit_code: convert_status,
        diagnostic_path,
        crop_failed,
    })
}

/// Split a figure path into its directory and base name.
fn split_figure(figure: &Path) -> Result<(PathBuf, &str), ConvertError> {
    let dir = match figure.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let base = figure
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| ConvertError::InvalidName(figure.to_path_buf()))?;
    Ok((dir, base))
}

/// Run `dvips` then `ps2pdf` as one combined step; the second runs only
/// when the first succeeds. Returns the first non-zero status, or 0.
fn run_conversion(
    toolchain: &impl Toolchain,
    dir: &Path,
    names: &WorkFiles,
) -> Result<i32, ToolchainError> {
    let status = toolchain.dvi_to_ps(dir, &names.dvi, &names.ps)?;
    if status != 0 {
        return Ok(status);
    }
    toolchain.ps_to_pdf(dir, &names.ps, &names.pdf)
}

/// Crop `pdf` in place, reusing the original file name.
///
/// The existing output is renamed aside so the crop tool can write to the
/// target name. A non-zero crop status restores the uncropped file instead
/// of discarding it; cropping never fails the conversion. Returns whether
/// the crop succeeded.
fn crop_pdf(toolchain: &impl Toolchain, dir: &Path, pdf: &str) -> Result<bool, ConvertError> {
    let aux = aux_name(pdf);
    fs::rename(dir.join(pdf), dir.join(&aux))?;

    let status = toolchain.crop(dir, &aux, pdf)?;
    if status != 0 {
        log::warn!("crop failed with status {status}; keeping the uncropped {pdf}");
        fs::rename(dir.join(&aux), dir.join(pdf))?;
        return Ok(false);
    }
    fs::remove_file(dir.join(aux))?;
    Ok(true)
}

/// Auxiliary name for the crop step: `fig1.pdf` → `fig1_aux.pdf`.
fn aux_name(pdf: &str) -> String {
    match pdf.rsplit_once('.') {
        Some((base, ext)) => format!("{base}_aux.{ext}"),
        None => format!("{pdf}_aux"),
    }
}

/// Remove every file in `dir` whose name starts with `prefix`.
fn remove_prefixed(dir: &Path, prefix: &str) -> std::io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if name.starts_with(prefix) && entry.path().is_file() {
            fs::remove_file(entry.path())?;
        }
    }
    Ok(())
}
