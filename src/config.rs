//! Tool configuration.
//!
//! Handles loading, validating, and merging `frag2pdf.toml`. User config
//! files are sparse — values are merged over stock defaults, so a file
//! needs to name only what it overrides:
//!
//! ```toml
//! # Only swap the typesetter
//! [tools]
//! latex = "pdflatex"
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [tools]
//! latex = "latex"       # Typesetting engine (batch, halt-on-error)
//! dvips = "dvips"       # DVI to PostScript converter
//! ps2pdf = "ps2pdf"     # PostScript to PDF converter
//! pdfcrop = "pdfcrop"   # PDF whitespace crop tool
//!
//! [output]
//! crop = true           # Crop the final PDF to its contents
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Config file name, looked up in the invocation directory.
pub const CONFIG_FILE: &str = "frag2pdf.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from [`CONFIG_FILE`].
///
/// All fields have working defaults; user files only specify overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// External program names.
    pub tools: ToolsConfig,
    /// Output handling.
    pub output: OutputConfig,
}

/// External program names, overridable for TeX distributions that install
/// the tools under different names or outside `PATH`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolsConfig {
    pub latex: String,
    pub dvips: String,
    pub ps2pdf: String,
    pub pdfcrop: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            latex: "latex".to_string(),
            dvips: "dvips".to_string(),
            ps2pdf: "ps2pdf".to_string(),
            pdfcrop: "pdfcrop".to_string(),
        }
    }
}

/// Output handling settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Crop the final PDF to its contents (`--no-crop` overrides per run).
    pub crop: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { crop: true }
    }
}

impl Config {
    /// Validate config values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, command) in [
            ("tools.latex", &self.tools.latex),
            ("tools.dvips", &self.tools.dvips),
            ("tools.ps2pdf", &self.tools.ps2pdf),
            ("tools.pdfcrop", &self.tools.pdfcrop),
        ] {
            if command.trim().is_empty() {
                return Err(ConfigError::Validation(format!("{key} must not be empty")));
            }
        }
        Ok(())
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`, the base
/// layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(Config::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// Tables merge key-by-key; any other overlay value replaces the base
/// value entirely; base keys absent from the overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load [`CONFIG_FILE`] from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist; `Err` if it exists but
/// contains invalid TOML.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and
/// validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<Config, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: Config = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from [`CONFIG_FILE`] in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result. Uses the defaults when no file exists.
pub fn load_config(dir: &Path) -> Result<Config, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(dir)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `frag2pdf.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r#"# frag2pdf configuration
# ======================
# Place this file as `frag2pdf.toml` in the directory you run frag2pdf
# from. All options are optional - the defaults are shown below. Delete
# anything you don't want to override.

[tools]
# External programs invoked during conversion. Override when your TeX
# distribution installs them under different names, or give absolute
# paths for tools outside PATH.
latex = "latex"
dvips = "dvips"
ps2pdf = "ps2pdf"
pdfcrop = "pdfcrop"

[output]
# Crop the final PDF to its contents. The --no-crop flag overrides this
# for a single run.
crop = true
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &Path, content: &str) {
        fs::write(dir.join(CONFIG_FILE), content).unwrap();
    }

    #[test]
    fn defaults_name_the_standard_tools() {
        let config = Config::default();
        assert_eq!(config.tools.latex, "latex");
        assert_eq!(config.tools.dvips, "dvips");
        assert_eq!(config.tools.ps2pdf, "ps2pdf");
        assert_eq!(config.tools.pdfcrop, "pdfcrop");
        assert!(config.output.crop);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.tools.latex, "latex");
        assert!(config.output.crop);
    }

    #[test]
    fn sparse_override_keeps_other_defaults() {
        let tmp = TempDir::new().unwrap();
        write_config(tmp.path(), "[tools]\nlatex = \"pdflatex\"\n");

        let config = load_config(tmp.path()).unwrap();

        assert_eq!(config.tools.latex, "pdflatex");
        assert_eq!(config.tools.dvips, "dvips");
        assert!(config.output.crop);
    }

    #[test]
    fn crop_can_be_disabled() {
        let tmp = TempDir::new().unwrap();
        write_config(tmp.path(), "[output]\ncrop = false\n");

        let config = load_config(tmp.path()).unwrap();
        assert!(!config.output.crop);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let tmp = TempDir::new().unwrap();
        write_config(tmp.path(), "[tools]\nlatx = \"latex\"\n");

        assert!(load_config(tmp.path()).is_err());
    }

    #[test]
    fn invalid_toml_is_rejected() {
        let tmp = TempDir::new().unwrap();
        write_config(tmp.path(), "[tools\nlatex=");

        assert!(matches!(load_config(tmp.path()), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn empty_command_name_fails_validation() {
        let tmp = TempDir::new().unwrap();
        write_config(tmp.path(), "[tools]\ndvips = \"\"\n");

        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn stock_config_parses_to_the_defaults() {
        let config: Config = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config.tools.latex, Config::default().tools.latex);
        assert_eq!(config.tools.pdfcrop, Config::default().tools.pdfcrop);
        assert_eq!(config.output.crop, Config::default().output.crop);
    }

    #[test]
    fn merge_overlay_table_wins_per_key() {
        let base = toml::toml! {
            [tools]
            latex = "latex"
            dvips = "dvips"
        };
        let overlay = toml::toml! {
            [tools]
            latex = "pdflatex"
        };

        let merged = merge_toml(toml::Value::Table(base), toml::Value::Table(overlay));
        let tools = merged.get("tools").unwrap();
        assert_eq!(tools.get("latex").unwrap().as_str(), Some("pdflatex"));
        assert_eq!(tools.get("dvips").unwrap().as_str(), Some("dvips"));
    }
}
