//! LaTeX document assembly.
//!
//! The generated document is a fixed skeleton with four substitution
//! points: extra packages, the replacement block, `\includegraphics`
//! options, and the figure file name. Substitution is purely textual —
//! nothing here validates that the result is well-formed LaTeX; a bad
//! block surfaces as a typeset failure downstream.
//!
//! The skeleton zeroes out all page margins so the figure lands on the
//! page at its natural position, leaving the whitespace trim to the crop
//! step.
//!
//! ## Extra packages
//!
//! Replacement text sometimes needs packages beyond the always-loaded set
//! (`graphicx`, `psfrag`, `color`, `babel`, `inputenc`, `tikz`). Those
//! `\usepackage` lines are picked up from sidecar files next to the
//! figure: `<name>_extra_packages.tex` (per-figure) or
//! `extra_latex_packages.tex` (shared fallback). The per-figure file wins
//! when both exist.

use std::path::Path;

/// Options used when the caller supplies none: include at natural scale.
pub const DEFAULT_INCLUSION_OPTIONS: &str = "[scale=1]";

/// Shared extra-package file name, resolved in the figure's directory.
pub const SHARED_PACKAGES_FILE: &str = "extra_latex_packages.tex";

const DOCUMENT_TEMPLATE: &str = r"\documentclass{article}
\usepackage{graphicx,psfrag,color}
\usepackage[english]{babel}
\usepackage[utf8]{inputenc}
@EXTRA_PACKAGES@
\setlength{\topmargin}{0in}
\setlength{\headheight}{0pt}
\setlength{\headsep}{0pt}
\setlength{\topskip}{0pt}
\setlength{\textheight}{\paperheight}
\setlength{\oddsidemargin}{0in}
\setlength{\evensidemargin}{0in}
\setlength{\textwidth}{\paperwidth}
\setlength{\parindent}{0pt}
\usepackage{tikz}
\pagestyle{empty}

\begin{document}
@REPLACEMENTS@
\includegraphics@OPTIONS@{@FIGURE@}
\end{document}
";

/// Assemble the complete document source for one figure.
///
/// `inclusion_options` is inserted verbatim (brackets included); an empty
/// string falls back to [`DEFAULT_INCLUSION_OPTIONS`]. `figure` is the
/// file name without extension — the graphics driver resolves the `.eps`.
pub fn assemble(
    figure: &str,
    replacement_block: &str,
    inclusion_options: &str,
    extra_packages: &str,
) -> String {
    let options = if inclusion_options.is_empty() {
        DEFAULT_INCLUSION_OPTIONS
    } else {
        inclusion_options
    };
    DOCUMENT_TEMPLATE
        .replace("@EXTRA_PACKAGES@", extra_packages)
        .replace("@REPLACEMENTS@", replacement_block)
        .replace("@OPTIONS@", options)
        .replace("@FIGURE@", figure)
}

/// Resolve extra `\usepackage` lines for a figure.
///
/// Checks `<figure>_extra_packages.tex` then [`SHARED_PACKAGES_FILE`] in
/// `dir`; the first readable file wins. Returns an empty string when
/// neither exists.
pub fn resolve_extra_packages(dir: &Path, figure: &str) -> String {
    let per_figure = dir.join(format!("{figure}_extra_packages.tex"));
    if let Ok(content) = std::fs::read_to_string(&per_figure) {
        return content;
    }
    std::fs::read_to_string(dir.join(SHARED_PACKAGES_FILE)).unwrap_or_default()
}
