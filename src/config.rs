//! Publish configuration.
//!
//! Everything the walker and driver need is carried in one explicit
//! [`PublishConfig`] record. No global state. Values come from three layers,
//! later layers winning:
//!
//! 1. stock defaults ([`PublishConfig::default`]),
//! 2. an optional `klaus.toml` next to the content,
//! 3. command-line flags (applied by the binary).
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! source = "content"        # Tree to publish
//! output = "published"      # Where the mirrored site goes
//! templates = "templates"   # Holds main.html and main.css
//! on_error = "skip"         # "skip": log and continue, "abort": stop at first failure
//!
//! [images]
//! max_size = 1000           # Bounding box edge in pixels
//! quality = 75              # JPEG quality (1-100)
//! upscale = false           # Enlarge images smaller than the box
//! ```
//!
//! Config files are sparse, so override just the values you want. Unknown
//! keys are rejected to catch typos early.

use crate::imaging::{DownscaleConfig, Quality};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
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

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "klaus.toml";

/// What to do when a single entry fails to publish.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnError {
    /// Log the failure, record it, and keep walking.
    #[default]
    Skip,
    /// Stop the walk at the first failure.
    Abort,
}

/// Configuration for one publish run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PublishConfig {
    /// Root of the content tree.
    pub source: PathBuf,
    /// Root of the published tree.
    pub output: PathBuf,
    /// Directory holding `main.html` and `main.css`.
    pub templates: PathBuf,
    /// Per-entry failure policy.
    pub on_error: OnError,
    /// JPEG downscaling settings.
    pub images: ImagesConfig,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::from("content"),
            output: PathBuf::from("published"),
            templates: PathBuf::from("templates"),
            on_error: OnError::default(),
            images: ImagesConfig::default(),
        }
    }
}

impl PublishConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.images.max_size == 0 {
            return Err(ConfigError::Validation(
                "images.max_size must be greater than 0".into(),
            ));
        }
        if !(1..=100).contains(&self.images.quality) {
            return Err(ConfigError::Validation(
                "images.quality must be 1-100".into(),
            ));
        }
        if self.source == self.output {
            return Err(ConfigError::Validation(
                "source and output must be different directories".into(),
            ));
        }
        Ok(())
    }

    /// Page template every markdown document is rendered into.
    pub fn template_path(&self) -> PathBuf {
        self.templates.join("main.html")
    }

    /// Stylesheet copied to the output root.
    pub fn stylesheet_path(&self) -> PathBuf {
        self.templates.join("main.css")
    }

    pub fn downscale(&self) -> DownscaleConfig {
        DownscaleConfig {
            max_size: self.images.max_size,
            quality: Quality::new(self.images.quality),
            upscale: self.images.upscale,
        }
    }
}

/// JPEG downscaling settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImagesConfig {
    /// Edge of the square bounding box, in pixels.
    pub max_size: u32,
    /// JPEG encoding quality (1 = worst, 100 = best).
    pub quality: u32,
    /// Enlarge images that already fit inside the box.
    pub upscale: bool,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            max_size: 1000,
            quality: 75,
            upscale: false,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged on top of.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(PublishConfig::default()).expect("default config must serialize")
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

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
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
) -> Result<PublishConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: PublishConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from the file at `path`, falling back to stock defaults when
/// it does not exist.
pub fn load_config(path: &Path) -> Result<PublishConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(path)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `klaus.toml`.
pub fn stock_config_toml() -> &'static str {
    r##"# Klaus Configuration
# ===================
# All keys are optional. Delete anything you don't want to override.

# Tree to publish. Every file under it is mirrored into `output`.
source = "content"

# Where the published site is written.
output = "published"

# Directory holding the page template (main.html) and stylesheet (main.css).
templates = "templates"

# What to do when one file fails to publish:
#   "skip"  - log it, keep going, exit non-zero at the end
#   "abort" - stop immediately
on_error = "skip"

[images]
# JPEGs are shrunk to fit a max_size x max_size box, keeping aspect ratio.
max_size = 1000

# JPEG encoding quality (1-100).
quality = 75

# Also enlarge JPEGs that are smaller than the box.
upscale = false
"##
}
