//! Cropper configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! the base layer; a user `config.toml` in the config directory overrides any
//! subset of them, and command-line flags override both.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [viewport]
//! width = 800.0             # Logical viewport the images are fitted into
//! height = 600.0
//!
//! [crop]
//! aspect_ratio = "3:2"      # Locked width:height ratio of the crop
//! min_size = 50.0           # Smallest crop side, in viewport units
//!
//! [export]
//! quality = 90              # JPEG quality (1-100)
//! entry_prefix = "cropped"  # Archive entries: cropped_1_beach.jpg
//! archive_prefix = "cropped_images"
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Override just the values you want:
//!
//! ```toml
//! [crop]
//! aspect_ratio = "1:1"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::aspect::AspectRatio;
use crate::engine::MIN_CROP_SIZE;
use crate::geometry::Viewport;
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

/// Configuration loaded from `config.toml`.
///
/// All fields have defaults. User config files need only specify the values
/// they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatchConfig {
    /// Logical display area images are fitted into.
    pub viewport: ViewportConfig,
    /// Crop rectangle constraints.
    pub crop: CropConfig,
    /// Output encoding and naming.
    pub export: ExportConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewportConfig {
    pub width: f64,
    pub height: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        let viewport = Viewport::default();
        Self {
            width: viewport.width,
            height: viewport.height,
        }
    }
}

impl ViewportConfig {
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.width, self.height)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CropConfig {
    pub aspect_ratio: AspectRatio,
    pub min_size: f64,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            aspect_ratio: AspectRatio::default(),
            min_size: MIN_CROP_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    /// JPEG quality (1-100).
    pub quality: u32,
    /// Prefix of each archive entry name.
    pub entry_prefix: String,
    /// Prefix of the archive file name.
    pub archive_prefix: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            quality: 90,
            entry_prefix: "cropped".to_string(),
            archive_prefix: "cropped_images".to_string(),
        }
    }
}

impl BatchConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = |v: f64| v.is_finite() && v > 0.0;

        if !positive(self.viewport.width) || !positive(self.viewport.height) {
            return Err(ConfigError::Validation(
                "viewport.width and viewport.height must be positive".into(),
            ));
        }
        if !positive(self.crop.min_size) {
            return Err(ConfigError::Validation(
                "crop.min_size must be positive".into(),
            ));
        }
        if !(1..=100).contains(&self.export.quality) {
            return Err(ConfigError::Validation(
                "export.quality must be 1-100".into(),
            ));
        }
        for (key, prefix) in [
            ("entry_prefix", &self.export.entry_prefix),
            ("archive_prefix", &self.export.archive_prefix),
        ] {
            if prefix.is_empty() || prefix.contains(['/', '\\']) {
                return Err(ConfigError::Validation(format!(
                    "export.{key} must be a non-empty file name fragment"
                )));
            }
        }
        Ok(())
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock defaults as a `toml::Value::Table`, parsed from
/// [`stock_config_toml`].
///
/// This is the base layer for merging user overrides on top.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::from_str(stock_config_toml())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
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

/// Load a `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<BatchConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: BatchConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(dir: &Path) -> Result<BatchConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(dir)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# batchcrop Configuration
# =======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Place this file as config.toml in the directory passed to --config
# (the current directory by default). Command-line flags take precedence.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Viewport
# ---------------------------------------------------------------------------
[viewport]
# Logical area each image is scaled into (aspect preserved, centered).
# Crop coordinates in gesture scripts are expressed in this space.
width = 800.0
height = 600.0

# ---------------------------------------------------------------------------
# Crop
# ---------------------------------------------------------------------------
[crop]
# Locked width:height ratio. Presets: "1:1", "4:3", "16:9", "3:2".
# Any ratio of two positive integers is accepted.
aspect_ratio = "3:2"

# Smallest width or height the crop can be resized to, in viewport units.
min_size = 50.0

# ---------------------------------------------------------------------------
# Export
# ---------------------------------------------------------------------------
[export]
# JPEG encoding quality (1 = worst, 100 = best).
quality = 90

# Archive entries are named {entry_prefix}_{n}_{file stem}.jpg
entry_prefix = "cropped"

# The archive is named {archive_prefix}_{unix millis}.zip
archive_prefix = "cropped_images"
"##
}
