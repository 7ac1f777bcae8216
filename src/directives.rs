//! Psfrag replacement directives and `.psfrags` file parsing.
//!
//! A directive maps a placeholder label embedded in an EPS figure to the
//! LaTeX text that should replace it, with optional placement parameters:
//!
//! ```text
//! \psfrag{BER}[cc][cc]{BER}
//! \psfrag{Eb/N0}{$E_b/N_0$}
//! ```
//!
//! Replacements arrive either pre-formatted (a block typed by the user or
//! read from a `.psfrags` file) or as structured triples from a caller.
//! No escaping is performed in either case: the strings are inserted
//! verbatim, and malformed markup only surfaces when the typesetter fails.
//!
//! ## `.psfrags` files
//!
//! A `.psfrags` file carries one directive per line. If its first line
//! starts with `[`, that line holds options for the `\includegraphics`
//! command and the remaining lines form the replacement block:
//!
//! ```text
//! [width=\textwidth]
//! \psfrag{xlabel}{Time (s)}
//! \psfrag{ylabel}[cc][cc]{Amplitude}
//! ```

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DirectiveError {
    #[error("cannot read replacements file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// A single text replacement applied inside the figure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    /// Placeholder text as it appears in the EPS source.
    pub original: String,
    /// LaTeX replacement text.
    pub replacement: String,
    /// Placement parameters passed through verbatim, e.g. `[cc][cc]`.
    /// Empty for default placement.
    pub placement: String,
}

/// Replacement input for one conversion.
#[derive(Debug, Clone)]
pub enum ReplacementSpec {
    /// Block already containing `\psfrag` lines, used verbatim.
    Raw(String),
    /// Structured directives rendered via [`render_directives`].
    List(Vec<Directive>),
}

impl ReplacementSpec {
    /// Produce the formatted replacement block.
    pub fn block(&self) -> String {
        match self {
            ReplacementSpec::Raw(block) => block.clone(),
            ReplacementSpec::List(directives) => render_directives(directives),
        }
    }
}

/// Render directives into a replacement block, one `\psfrag` line per
/// directive, in input order. Trailing whitespace is trimmed from the
/// final block; an empty slice yields an empty block.
pub fn render_directives(directives: &[Directive]) -> String {
    let mut block = String::new();
    for d in directives {
        block.push_str("\\psfrag{");
        block.push_str(&d.original);
        block.push('}');
        block.push_str(&d.placement);
        block.push('{');
        block.push_str(&d.replacement);
        block.push_str("}\n");
    }
    block.trim_end().to_string()
}

/// Parsed content of a `.psfrags` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PsfragsFile {
    /// `\includegraphics` options from the first line, brackets included.
    pub inclusion_options: Option<String>,
    /// The replacement block (all remaining lines).
    pub block: String,
}

/// Parse `.psfrags` content.
///
/// A first line starting with `[` is split off as the inclusion options;
/// everything else is the replacement block, verbatim.
pub fn parse_psfrags(content: &str) -> PsfragsFile {
    if !content.starts_with('[') {
        return PsfragsFile {
            inclusion_options: None,
            block: content.to_string(),
        };
    }
    match content.split_once('\n') {
        Some((options, block)) => PsfragsFile {
            inclusion_options: Some(options.trim_end().to_string()),
            block: block.to_string(),
        },
        // Single-line file: options, no directives.
        None => PsfragsFile {
            inclusion_options: Some(content.trim_end().to_string()),
            block: String::new(),
        },
    }
}

/// Read and parse a `.psfrags` file.
///
/// A missing or unreadable file is an error; there is no fallback for a
/// figure whose replacements cannot be loaded.
pub fn load_psfrags(path: &Path) -> Result<PsfragsFile, DirectiveError> {
    let content = std::fs::read_to_string(path).map_err(|source| DirectiveError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_psfrags(&content))
}
