//! Configuration file support.
//!
//! Handles loading, validating, and merging `simple-thumb.toml`. User
//! values are layered over stock defaults with a recursive table merge, so
//! a file only needs the keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [size]
//! # width = 160             # Bounding box width
//! # height = 160            # Bounding box height
//! # scale = 0.5             # Scale factor, instead of width/height
//! keep_aspect_ratio = true
//!
//! [output]
//! # format = "png"          # "original" keeps the source format
//! # quality = 0.8           # 0.0 - 1.0
//! rename = "prefix-dot-thumbnail"
//! # directory = "thumbs"    # Write here instead of next to the originals
//! allow_overwrite = true
//!
//! [processing]
//! scaling = "bilinear"      # nearest | bilinear | bicubic | lanczos3
//! exif_orientation = true
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{OutputFormat, Quality, ScalingMode};
use crate::naming::StandardRename;
use crate::thumbnails::Thumbnails;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File looked up in the working directory when no path is given.
pub const CONFIG_FILE_NAME: &str = "simple-thumb.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Thumbnail configuration loaded from `simple-thumb.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThumbConfig {
    pub size: SizeConfig,
    pub output: OutputConfig,
    pub processing: ProcessingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SizeConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    pub keep_aspect_ratio: bool,
}

impl Default for SizeConfig {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            scale: None,
            keep_aspect_ratio: true,
        }
    }
}

impl SizeConfig {
    pub fn is_set(&self) -> bool {
        self.width.is_some() || self.height.is_some() || self.scale.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<f32>,
    pub rename: StandardRename,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
    pub allow_overwrite: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            quality: None,
            rename: StandardRename::default(),
            directory: None,
            allow_overwrite: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    pub scaling: ScalingMode,
    pub exif_orientation: bool,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            scaling: ScalingMode::default(),
            exif_orientation: true,
        }
    }
}

impl ThumbConfig {
    /// Check the values serde cannot: ranges, exclusivity, format names.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let size = &self.size;
        if size.scale.is_some() && (size.width.is_some() || size.height.is_some()) {
            return Err(ConfigError::Validation(
                "size.scale cannot be combined with size.width or size.height".into(),
            ));
        }
        if let Some(scale) = size.scale
            && !(scale.is_finite() && scale > 0.0)
        {
            return Err(ConfigError::Validation(
                "size.scale must be greater than 0".into(),
            ));
        }
        if size.width == Some(0) || size.height == Some(0) {
            return Err(ConfigError::Validation(
                "size.width and size.height must be greater than 0".into(),
            ));
        }
        if !size.keep_aspect_ratio
            && size.scale.is_none()
            && (size.width.is_some() != size.height.is_some())
        {
            return Err(ConfigError::Validation(
                "size.keep_aspect_ratio = false needs both size.width and size.height".into(),
            ));
        }
        if let Some(quality) = self.output.quality
            && Quality::new(quality).is_none()
        {
            return Err(ConfigError::Validation(
                "output.quality must be between 0.0 and 1.0".into(),
            ));
        }
        if let Some(format) = &self.output.format {
            OutputFormat::parse(format)
                .map_err(|e| ConfigError::Validation(format!("output.format: {e}")))?;
        }
        Ok(())
    }

    /// Map these settings onto a builder. Size keys that are unset leave
    /// the builder's size untouched.
    pub fn apply<'a>(&self, builder: Thumbnails<'a>) -> Thumbnails<'a> {
        let mut builder = match (self.size.scale, self.size.width, self.size.height) {
            (Some(scale), _, _) => builder.scale(scale),
            (None, Some(w), Some(h)) => builder.size(w, h),
            (None, Some(w), None) => builder.width(w),
            (None, None, Some(h)) => builder.height(h),
            (None, None, None) => builder,
        };
        builder = builder
            .keep_aspect_ratio(self.size.keep_aspect_ratio)
            .scaling_mode(self.processing.scaling)
            .use_exif_orientation(self.processing.exif_orientation)
            .allow_overwrite(self.output.allow_overwrite);
        if let Some(format) = &self.output.format {
            builder = builder.output_format(format);
        }
        if let Some(quality) = self.output.quality {
            builder = builder.output_quality(quality);
        }
        builder
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(ThumbConfig::default())?)
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

/// Read a config file as a raw TOML value. `Ok(None)` if it does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<ThumbConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ThumbConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the config at `path` over stock defaults. A missing file yields
/// the defaults.
pub fn load_config(path: &Path) -> Result<ThumbConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(path)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock config file with all keys.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# simple-thumb configuration
# ==========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Command-line flags override them.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Thumbnail size
# ---------------------------------------------------------------------------
[size]
# Bounding box. Give one edge to scale by that edge alone.
# width = 160
# height = 160

# Scale factor applied to the original dimensions. Cannot be combined
# with width/height.
# scale = 0.5

# false stretches to exactly width x height.
keep_aspect_ratio = true

# ---------------------------------------------------------------------------
# Output
# ---------------------------------------------------------------------------
[output]
# Output format: png, jpg, gif, bmp, tiff, webp, avif, or "original".
# Omit to use the destination extension, falling back to the source format.
# format = "png"

# Encoder quality from 0.0 to 1.0 (JPEG and AVIF).
# quality = 0.8

# How thumbnails are named:
# no-change, prefix-dot-thumbnail, prefix-hyphen-thumbnail,
# suffix-dot-thumbnail, suffix-hyphen-thumbnail
rename = "prefix-dot-thumbnail"

# Write thumbnails into this directory instead of next to the originals.
# directory = "thumbs"

# false skips thumbnails whose destination already exists.
allow_overwrite = true

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Interpolation: nearest, bilinear, bicubic, lanczos3.
scaling = "bilinear"

# Turn images upright according to their EXIF orientation tag.
exif_orientation = true
"##
}
