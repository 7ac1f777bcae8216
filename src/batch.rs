//! Batch drivers: file mode and folder mode.
//!
//! File mode converts explicitly named figures, each reading its
//! replacements from `<name>.psfrags` (or from an explicit override for
//! the single-file form). Folder mode discovers every `*.psfrags` file
//! directly inside the given folders and derives the figure names from
//! them.
//!
//! Both modes isolate failures per item: one figure's failure is recorded
//! and the batch continues with the next. Items are processed strictly in
//! order; nothing runs in parallel.

use crate::convert::{self, ConversionRequest, ConversionResult, ConvertError};
use crate::directives::{self, DirectiveError, ReplacementSpec};
use crate::toolchain::Toolchain;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Extension of replacement files sitting next to their figures.
pub const PSFRAGS_EXTENSION: &str = "psfrags";

#[derive(Error, Debug)]
pub enum BatchError {
    #[error(transparent)]
    Directive(#[from] DirectiveError),
    #[error(transparent)]
    Convert(#[from] ConvertError),
    #[error("cannot read folder {path}: {source}")]
    Folder {
        path: PathBuf,
        source: walkdir::Error,
    },
}

/// Outcome of one batch item.
#[derive(Debug)]
pub struct ItemOutcome {
    pub figure: PathBuf,
    pub result: Result<ConversionResult, BatchError>,
}

impl ItemOutcome {
    /// Whether the item converted successfully. A best-effort crop failure
    /// does not count against the item.
    pub fn succeeded(&self) -> bool {
        matches!(&self.result, Ok(r) if r.succeeded)
    }
}

/// Convert each named figure in order.
///
/// Replacements are read from `<figure>.psfrags` unless
/// `replacements_override` names an explicit file (single-figure form;
/// the caller enforces that). Failures never stop the batch.
pub fn convert_files(
    toolchain: &impl Toolchain,
    figures: &[PathBuf],
    replacements_override: Option<&Path>,
    crop: bool,
) -> Vec<ItemOutcome> {
    figures
        .iter()
        .map(|figure| {
            log::info!("processing {}", figure.display());
            let result = convert_one(toolchain, figure, replacements_override, crop);
            if let Err(err) = &result {
                log::warn!("{}: {err}", figure.display());
            }
            ItemOutcome {
                figure: figure.clone(),
                result,
            }
        })
        .collect()
}

/// Discover and convert every figure with a `.psfrags` file directly
/// inside each folder. An unreadable folder is recorded as a single
/// failed item and the remaining folders are still processed.
pub fn convert_folders(
    toolchain: &impl Toolchain,
    folders: &[PathBuf],
    crop: bool,
) -> Vec<ItemOutcome> {
    let mut outcomes = Vec::new();
    for folder in folders {
        match discover_figures(folder) {
            Ok(figures) => {
                log::info!(
                    "{}: {} replacement file(s) found",
                    folder.display(),
                    figures.len()
                );
                outcomes.extend(convert_files(toolchain, &figures, None, crop));
            }
            Err(err) => {
                log::warn!("{}: {err}", folder.display());
                outcomes.push(ItemOutcome {
                    figure: folder.clone(),
                    result: Err(err),
                });
            }
        }
    }
    outcomes
}

/// List figure base paths for all `*.psfrags` files directly inside
/// `folder`, sorted by name for a deterministic processing order.
pub fn discover_figures(folder: &Path) -> Result<Vec<PathBuf>, BatchError> {
    let mut figures = Vec::new();
    for entry in WalkDir::new(folder)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|source| BatchError::Folder {
            path: folder.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path
            .extension()
            .is_some_and(|ext| ext == PSFRAGS_EXTENSION)
        {
            figures.push(path.with_extension(""));
        }
    }
    Ok(figures)
}

fn convert_one(
    toolchain: &impl Toolchain,
    figure: &Path,
    replacements_override: Option<&Path>,
    crop: bool,
) -> Result<ConversionResult, BatchError> {
    let replacements_path = match replacements_override {
        Some(path) => path.to_path_buf(),
        None => psfrags_path(figure),
    };
    let parsed = directives::load_psfrags(&replacements_path)?;
    let request = ConversionRequest {
        figure: figure.to_path_buf(),
        replacements: ReplacementSpec::Raw(parsed.block),
        inclusion_options: parsed.inclusion_options,
        crop,
    };
    Ok(convert::convert(toolchain, &request)?)
}

/// Replacement file sitting next to a figure: `plots/fig1` →
/// `plots/fig1.psfrags`. Appends rather than swapping extensions so a dot
/// in the figure name survives.
fn psfrags_path(figure: &Path) -> PathBuf {
    let mut name = figure.as_os_str().to_os_string();
    name.push(".");
    name.push(PSFRAGS_EXTENSION);
    PathBuf::from(name)
}
