//! # frag2pdf
//!
//! Convert EPS figures to cropped PDFs while substituting placeholder
//! labels with typeset LaTeX text. The figure keeps plain markers like
//! `xlabel` or `Eb/N0`; a sibling `.psfrags` file maps each marker to the
//! real LaTeX replacement, and frag2pdf drives the external toolchain that
//! does the rest.
//!
//! # Architecture: One Linear Pipeline Per Figure
//!
//! ```text
//! fig1.psfrags ──parse──▶ replacement block + \includegraphics options
//!              ──assemble──▶ fig1_psfrag_replace.tex
//!              ──latex → dvips → ps2pdf → pdfcrop──▶ fig1.pdf
//! ```
//!
//! Each figure is independent: the batch drivers run figures strictly in
//! sequence and one figure's failure never stops the rest. A failed run
//! keeps a `_debug.tex` copy of the generated document for manual
//! diagnosis; every other intermediate file is removed unconditionally.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`directives`] | `\psfrag` directive rendering and `.psfrags` file parsing |
//! | [`template`] | LaTeX document skeleton assembly and extra-package resolution |
//! | [`toolchain`] | External process invocation behind the [`toolchain::Toolchain`] trait |
//! | [`convert`] | Per-figure orchestration: typeset, convert, crop, clean up |
//! | [`batch`] | File mode and folder mode drivers with per-item failure isolation |
//! | [`config`] | `frag2pdf.toml` loading, merging, and validation |
//! | [`output`] | CLI output formatting — pure format functions + print wrappers |
//!
//! # Design Decisions
//!
//! ## Explicit Base Directory, No `chdir`
//!
//! A figure given as `plots/fig1` is processed *inside* `plots/`, but the
//! process working directory is never changed: the figure's directory is
//! passed to every step explicitly. This keeps independent conversions
//! from interfering through process-wide state.
//!
//! ## Argument Vectors, Not Shell Strings
//!
//! External tools receive their arguments as explicit vectors. File names
//! are never interpolated into a shell command line, so names with spaces
//! or metacharacters work and nothing is shell-injectable.
//!
//! ## Surfaced Crop Status
//!
//! `pdfcrop` is best-effort: its failure does not fail the conversion.
//! But it is never silent — a failed crop keeps the uncropped PDF, logs a
//! warning, and is flagged in the [`convert::ConversionResult`].

pub mod batch;
pub mod config;
pub mod convert;
pub mod directives;
pub mod output;
pub mod template;
pub mod toolchain;
