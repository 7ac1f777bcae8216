//! CLI output formatting.
//!
//! Each conversion outcome gets a header line naming the figure and what
//! happened to it, with secondary context (debug artifact location, crop
//! status) on indented lines below. A batch ends with a one-line summary.
//!
//! ```text
//! fig1: converted
//! fig2: converted
//!     Crop failed - output left uncropped
//! fig3: conversion failed (exit code 1)
//!     Debug source: fig3_psfrag_replace_debug.tex
//! 2 of 3 figures converted
//! ```
//!
//! Format functions are pure — no I/O, no side effects — and return the
//! lines to print; the `print_*` wrappers write them to stdout.

use crate::batch::ItemOutcome;

/// Indentation for secondary context lines.
fn indent(line: String) -> String {
    format!("    {line}")
}

/// Format the outcome of a single conversion.
pub fn format_outcome(outcome: &ItemOutcome) -> Vec<String> {
    let figure = outcome.figure.display();
    match &outcome.result {
        Ok(result) if result.succeeded => {
            let mut lines = vec![format!("{figure}: converted")];
            if result.crop_failed {
                lines.push(indent("Crop failed - output left uncropped".to_string()));
            }
            lines
        }
        Ok(result) => {
            let mut lines = vec![format!(
                "{figure}: conversion failed (exit code {})",
                result.exit_code
            )];
            if let Some(path) = &result.diagnostic_path {
                lines.push(indent(format!("Debug source: {}", path.display())));
            }
            lines
        }
        Err(err) => vec![format!("{figure}: {err}")],
    }
}

/// Format the batch summary line.
pub fn format_summary(outcomes: &[ItemOutcome]) -> String {
    let converted = outcomes.iter().filter(|o| o.succeeded()).count();
    format!("{converted} of {} figures converted", outcomes.len())
}

/// Print every outcome followed by the batch summary.
pub fn print_outcomes(outcomes: &[ItemOutcome]) {
    for outcome in outcomes {
        for line in format_outcome(outcome) {
            println!("{line}");
        }
    }
    println!("{}", format_summary(outcomes));
}
