//! Tool configuration.
//!
//! Handles loading and validating `config.toml`. Every option has a stock
//! default; user config files are sparse and override only what they name.
//! Unknown keys are rejected to catch typos early.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! default_preset = "16:9"   # Aspect preset selected at startup
//!
//! [export]
//! format = "jpeg"           # jpeg | png | webp
//! quality = 90              # Lossy quality 10-100 (ignored for png)
//!
//! [preview]
//! max_edge = 300            # Longest preview edge in pixels
//!
//! [naming]
//! prefix = "image"          # Export filename prefix
//! use_original_name = false # Use the source file stem as the prefix
//!
//! [processing]
//! max_processes = 4         # Max parallel workers (omit for auto = CPU cores)
//! ```

use crate::catalog::find_preset;
use crate::imaging::ExportFormat;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Tool configuration loaded from `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolConfig {
    /// Aspect preset selected when the CLI gives none.
    #[serde(default = "default_preset_key")]
    pub default_preset: String,
    /// Export format and quality defaults.
    pub export: ExportConfig,
    /// Preview rendering settings.
    pub preview: PreviewConfig,
    /// Export filename settings.
    pub naming: NamingConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

fn default_preset_key() -> String {
    crate::catalog::DEFAULT_PRESET.to_string()
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            default_preset: default_preset_key(),
            export: ExportConfig::default(),
            preview: PreviewConfig::default(),
            naming: NamingConfig::default(),
            processing: ProcessingConfig::default(),
        }
    }
}

/// Export defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    pub format: ExportFormat,
    /// Lossy encoding quality (10-100). Ignored for png.
    pub quality: u32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: ExportFormat::Jpeg,
            quality: 90,
        }
    }
}

/// Preview rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PreviewConfig {
    /// Longest edge of the preview surface in pixels.
    pub max_edge: u32,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self { max_edge: 300 }
    }
}

/// Export filename settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NamingConfig {
    /// Filename prefix for exports.
    pub prefix: String,
    /// Use the source file's stem as the prefix instead.
    pub use_original_name: bool,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            prefix: crate::naming::DEFAULT_PREFIX.to_string(),
            use_original_name: false,
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel export workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

impl ToolConfig {
    /// Parse and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` when given, else `./config.toml` when present, else
    /// stock defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::load(p),
            None => {
                let local = Path::new("config.toml");
                if local.exists() {
                    Self::load(local)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if find_preset(&self.default_preset).is_none() {
            return Err(ConfigError::Validation(format!(
                "unknown default_preset '{}'",
                self.default_preset
            )));
        }
        if !(10..=100).contains(&self.export.quality) {
            return Err(ConfigError::Validation(
                "export.quality must be 10-100".into(),
            ));
        }
        if self.preview.max_edge < 16 {
            return Err(ConfigError::Validation(
                "preview.max_edge must be at least 16".into(),
            ));
        }
        if self.naming.prefix.is_empty() {
            return Err(ConfigError::Validation(
                "naming.prefix must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// The stock config file printed by `bildfix gen-config`, with every option
/// documented at its default.
pub fn stock_config_toml() -> &'static str {
    r#"# bildfix configuration
# All options are optional - the values below are the defaults.

# Aspect preset selected when the CLI gives none.
# Run `bildfix presets` for the full catalog.
default_preset = "16:9"

[export]
# Output format: jpeg | png | webp
format = "jpeg"
# Lossy encoding quality, 10-100. Ignored for png.
quality = 90

[preview]
# Longest edge of preview renders, in pixels.
max_edge = 300

[naming]
# Export filenames look like: {prefix}_{width}x{height}_{date}_{time}.{ext}
prefix = "image"
# Use the source file's stem as the prefix instead.
use_original_name = false

[processing]
# Max parallel export workers. Omit for auto (one per CPU core).
# max_processes = 4
"#
}
