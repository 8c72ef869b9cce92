//! Application configuration for the world book converter.
//!
//! User config lives at `~/.worldbook/worldbook.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, WorldBookError};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "worldbook.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".worldbook";

/// Largest accepted JSON indent width.
pub const MAX_INDENT: usize = 8;

// ---------------------------------------------------------------------------
// Config structs (matching worldbook.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// JSON output settings.
    #[serde(default)]
    pub output: OutputConfig,

    /// Terminal UI settings.
    #[serde(default)]
    pub tui: TuiConfig,
}

/// `[output]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Spaces per indent level in the emitted JSON.
    #[serde(default = "default_indent")]
    pub indent: usize,

    /// Directory used by `convert --save`.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Suffix appended to the input file stem by `convert --save`.
    #[serde(default = "default_file_suffix")]
    pub file_suffix: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            indent: default_indent(),
            output_dir: default_output_dir(),
            file_suffix: default_file_suffix(),
        }
    }
}

fn default_indent() -> usize {
    2
}
fn default_output_dir() -> String {
    ".".into()
}
fn default_file_suffix() -> String {
    "tavo.json".into()
}

/// `[tui]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TuiConfig {
    /// Event poll interval in milliseconds.
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
        }
    }
}

fn default_tick_ms() -> u64 {
    100
}

// ---------------------------------------------------------------------------
// Convert options (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime conversion options, merged from config file + CLI flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Spaces per indent level in the emitted JSON.
    pub indent: usize,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            indent: default_indent(),
        }
    }
}

impl ConvertOptions {
    /// Reject options the formatter cannot honour, whatever their source.
    pub fn validate(&self) -> Result<()> {
        if self.indent > MAX_INDENT {
            return Err(WorldBookError::config(format!(
                "indent must be at most {MAX_INDENT}, got {}",
                self.indent
            )));
        }
        Ok(())
    }
}

impl From<&AppConfig> for ConvertOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            indent: config.output.indent,
        }
    }
}

impl AppConfig {
    /// Reject values the converter cannot honour.
    pub fn validate(&self) -> Result<()> {
        if self.output.indent > MAX_INDENT {
            return Err(WorldBookError::config(format!(
                "output.indent must be at most {MAX_INDENT}, got {}",
                self.output.indent
            )));
        }
        if self.output.file_suffix.trim().is_empty() {
            return Err(WorldBookError::config("output.file_suffix must not be empty"));
        }
        if self.tui.tick_ms == 0 {
            return Err(WorldBookError::config("tui.tick_ms must be greater than zero"));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.worldbook/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| WorldBookError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.worldbook/worldbook.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load and validate the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| WorldBookError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| {
        WorldBookError::config(format!("failed to parse {}: {e}", path.display()))
    })?;
    config.validate()?;
    Ok(config)
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    init_config_at(&config_dir()?)
}

/// Write a default config file into `dir`, creating it if needed.
pub fn init_config_at(dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).map_err(|e| WorldBookError::io(dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| WorldBookError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| WorldBookError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(tag: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();
        std::env::temp_dir().join(format!("wb_test_{tag}_{}_{nanos}", std::process::id()))
    }

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("indent"));
        assert!(toml_str.contains("tavo.json"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.output.indent, 2);
        assert_eq!(parsed.tui.tick_ms, 100);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[output]
indent = 4
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.output.indent, 4);
        assert_eq!(config.output.output_dir, ".");
        assert_eq!(config.tui.tick_ms, 100);
    }

    #[test]
    fn convert_options_from_app_config() {
        let mut app = AppConfig::default();
        app.output.indent = 4;
        let opts = ConvertOptions::from(&app);
        assert_eq!(opts.indent, 4);
    }

    #[test]
    fn validation_rejects_bad_values() {
        let mut config = AppConfig::default();
        assert!(config.validate().is_ok());

        config.output.indent = 20;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("output.indent"));

        let mut config = AppConfig::default();
        config.tui.tick_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn convert_options_bound_indent() {
        assert!(ConvertOptions { indent: 0 }.validate().is_ok());
        assert!(ConvertOptions { indent: MAX_INDENT }.validate().is_ok());

        let err = ConvertOptions { indent: MAX_INDENT + 1 }.validate().unwrap_err();
        assert!(matches!(err, WorldBookError::Config { .. }));
        assert!(ConvertOptions { indent: usize::MAX }.validate().is_err());
    }

    #[test]
    fn init_then_load() {
        let dir = scratch_dir("init");
        let path = init_config_at(&dir).expect("init config");
        let loaded = load_config_from(&path).expect("load config");
        assert_eq!(loaded.output.file_suffix, "tavo.json");
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let path = scratch_dir("missing").join("worldbook.toml");
        let err = load_config_from(&path).unwrap_err();
        assert!(matches!(err, WorldBookError::Io { .. }));
    }
}
