//! Folder mode end-to-end: discovery, per-item isolation, final artifacts.
//!
//! Uses a stub toolchain that "typesets" successfully only when the
//! figure's EPS file exists, mirroring how latex fails on a missing
//! `\includegraphics` target. Successful steps fabricate their output
//! files the way the real tools would.

use frag2pdf::batch;
use frag2pdf::toolchain::{Toolchain, ToolchainError};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

struct EpsCheckingToolchain;

fn touch(dir: &Path, name: &str) {
    fs::write(dir.join(name), "").unwrap();
}

impl Toolchain for EpsCheckingToolchain {
    fn typeset(&self, dir: &Path, tex_file: &str) -> Result<i32, ToolchainError> {
        let stem = tex_file.strip_suffix(".tex").unwrap_or(tex_file);
        touch(dir, &format!("{stem}.log"));
        let figure = stem.strip_suffix("_psfrag_replace").unwrap_or(stem);
        if dir.join(format!("{figure}.eps")).exists() {
            touch(dir, &format!("{stem}.dvi"));
            Ok(0)
        } else {
            Ok(1)
        }
    }

    fn dvi_to_ps(&self, dir: &Path, _dvi_file: &str, ps_file: &str) -> Result<i32, ToolchainError> {
        touch(dir, ps_file);
        Ok(0)
    }

    fn ps_to_pdf(&self, dir: &Path, _ps_file: &str, pdf_file: &str) -> Result<i32, ToolchainError> {
        touch(dir, pdf_file);
        Ok(0)
    }

    fn crop(&self, dir: &Path, _input_pdf: &str, output_pdf: &str) -> Result<i32, ToolchainError> {
        touch(dir, output_pdf);
        Ok(0)
    }
}

#[test]
fn folder_mode_continues_past_a_failing_figure() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("a.psfrags"), "\\psfrag{x}{$x$}\n").unwrap();
    fs::write(tmp.path().join("a.eps"), "%!PS").unwrap();
    // b has replacements but no EPS file, so its typeset step fails.
    fs::write(tmp.path().join("b.psfrags"), "\\psfrag{y}{$y$}\n").unwrap();

    let outcomes = batch::convert_folders(&EpsCheckingToolchain, &[tmp.path().to_path_buf()], true);

    assert_eq!(outcomes.len(), 2);

    // Discovery is sorted, so a comes first and converts cleanly.
    assert_eq!(outcomes[0].figure, tmp.path().join("a"));
    assert!(outcomes[0].succeeded());
    assert!(tmp.path().join("a.pdf").exists());

    // b fails but was attempted after a, with its debug source kept.
    assert_eq!(outcomes[1].figure, tmp.path().join("b"));
    assert!(!outcomes[1].succeeded());
    assert!(!tmp.path().join("b.pdf").exists());
    assert!(tmp.path().join("b_psfrag_replace_debug.tex").exists());

    // No transient artifacts survive for either figure.
    for entry in fs::read_dir(tmp.path()).unwrap() {
        let name = entry.unwrap().file_name().to_string_lossy().to_string();
        assert!(!name.starts_with("a_psfrag_replace."));
        assert!(!name.starts_with("b_psfrag_replace."));
    }
}

#[test]
fn folder_mode_handles_multiple_folders() {
    let tmp = TempDir::new().unwrap();
    let plots = tmp.path().join("plots");
    let extra = tmp.path().join("extra");
    fs::create_dir_all(&plots).unwrap();
    fs::create_dir_all(&extra).unwrap();
    fs::write(plots.join("fig1.psfrags"), "\\psfrag{a}{b}\n").unwrap();
    fs::write(plots.join("fig1.eps"), "%!PS").unwrap();
    fs::write(extra.join("fig2.psfrags"), "\\psfrag{c}{d}\n").unwrap();
    fs::write(extra.join("fig2.eps"), "%!PS").unwrap();

    let outcomes = batch::convert_folders(&EpsCheckingToolchain, &[plots.clone(), extra.clone()], false);

    assert_eq!(outcomes.len(), 2);
    assert!(outcomes.iter().all(batch::ItemOutcome::succeeded));
    assert!(plots.join("fig1.pdf").exists());
    assert!(extra.join("fig2.pdf").exists());
}

#[test]
fn folder_without_psfrags_files_converts_nothing() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("orphan.eps"), "%!PS").unwrap();

    let outcomes = batch::convert_folders(&EpsCheckingToolchain, &[tmp.path().to_path_buf()], true);

    assert!(outcomes.is_empty());
    assert!(!tmp.path().join("orphan.pdf").exists());
}
