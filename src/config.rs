//! Builder configuration.
//!
//! Settings come from three layers, later layers winning:
//!
//! 1. Stock defaults ([`IndexConfig::default`])
//! 2. An optional `gallery-index.toml` in the working directory, or the file
//!    named by `--config`, which must then exist
//! 3. Command-line flags and their `GALLERY_INDEX_*` environment variables
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! gallery_root = "public/gallery"             # One subfolder per landmark
//! output_path = "public/galleryIndex.json"    # Manifest written here
//! extensions = ["jpg", "jpeg", "png", "webp"] # Case-insensitive, leading dot optional
//! follow_links = false                        # Treat symlinks as their targets
//! include_hidden = false                      # Index dot-folders and dotfiles
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name looked up in the working directory when `--config` is absent.
pub const CONFIG_FILENAME: &str = "gallery-index.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("TOML parse error in {path}: {source}")]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Builder configuration loaded from `gallery-index.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndexConfig {
    /// Directory holding one subfolder per landmark.
    pub gallery_root: PathBuf,
    /// Where the JSON manifest is written.
    pub output_path: PathBuf,
    /// Recognized image extensions, without the dot.
    pub extensions: Vec<String>,
    /// Classify symlinks by their target instead of skipping them.
    pub follow_links: bool,
    /// Index folders and files whose names start with `.`.
    pub include_hidden: bool,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            gallery_root: PathBuf::from("public/gallery"),
            output_path: PathBuf::from("public/galleryIndex.json"),
            extensions: ["jpg", "jpeg", "png", "webp"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            follow_links: false,
            include_hidden: false,
        }
    }
}

impl IndexConfig {
    /// Lower-case extensions and strip leading dots, so `".JPG"` and `"jpg"`
    /// name the same format.
    pub fn normalize(&mut self) {
        let mut normalized: Vec<String> = Vec::with_capacity(self.extensions.len());
        for ext in self.extensions.drain(..) {
            let ext = ext.trim_start_matches('.').to_lowercase();
            if !normalized.contains(&ext) {
                normalized.push(ext);
            }
        }
        self.extensions = normalized;
    }

    /// Validate config values. Expects [`normalize`](Self::normalize) to
    /// have run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.extensions.is_empty() {
            return Err(ConfigError::Validation(
                "extensions must not be empty".into(),
            ));
        }
        if let Some(bad) = self
            .extensions
            .iter()
            .find(|e| e.is_empty() || e.contains(['/', '\\', '.']))
        {
            return Err(ConfigError::Validation(format!(
                "invalid extension {bad:?}: expected a bare suffix like \"jpg\""
            )));
        }
        if self.gallery_root.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "gallery_root must not be empty".into(),
            ));
        }
        if self.output_path.as_os_str().is_empty() || self.output_path.file_name().is_none() {
            return Err(ConfigError::Validation(
                "output_path must name a file".into(),
            ));
        }
        Ok(())
    }

    /// Whether `path`'s extension is one of the recognized ones.
    ///
    /// Comparison is case-insensitive. A name like `.jpg` has no extension.
    pub fn is_recognized(&self, path: &Path) -> bool {
        path.extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .is_some_and(|ext| self.extensions.iter().any(|known| *known == ext))
    }
}

// =============================================================================
// Config loading and merging
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(IndexConfig::default()).expect("default config must serialize")
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
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    read_raw_config(path).map(Some)
}

fn read_raw_config(path: &Path) -> Result<toml::Value, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Toml {
        path: path.to_path_buf(),
        source,
    })
}

/// Load config from `path`, merged over stock defaults.
///
/// A missing file yields the stock defaults. The result is normalized but
/// not yet validated: command-line overrides are applied by the caller
/// before [`IndexConfig::validate`].
pub fn load_config(path: &Path) -> Result<IndexConfig, ConfigError> {
    let overlay = load_raw_config(path)?;
    config_from_overlay(path, overlay)
}

/// Like [`load_config`], but for a file the user named explicitly: a
/// missing file is a [`ConfigError::Io`] instead of the stock defaults.
pub fn load_config_file(path: &Path) -> Result<IndexConfig, ConfigError> {
    let overlay = read_raw_config(path)?;
    config_from_overlay(path, Some(overlay))
}

fn config_from_overlay(
    path: &Path,
    overlay: Option<toml::Value>,
) -> Result<IndexConfig, ConfigError> {
    let base = stock_defaults_value();
    let merged = match overlay {
        Some(overlay) => merge_toml(base, overlay),
        None => base,
    };
    let mut config: IndexConfig = merged.try_into().map_err(|source| ConfigError::Toml {
        path: path.to_path_buf(),
        source,
    })?;
    config.normalize();
    Ok(config)
}

/// Returns a fully-commented stock `gallery-index.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Gallery Index Configuration
# ===========================
# All settings are optional. Values shown below are the defaults.
# Command-line flags and GALLERY_INDEX_* environment variables override
# anything set here. Unknown keys will cause an error.

# Directory holding one subfolder per landmark, e.g. public/gallery/12_Bab_Al_Bahrain/
gallery_root = "public/gallery"

# Where the JSON manifest is written. Parent directories are created.
output_path = "public/galleryIndex.json"

# Image extensions to index. Case-insensitive; a leading dot is optional.
extensions = ["jpg", "jpeg", "png", "webp"]

# Follow symlinks and classify them by their target.
# When false, symlinked folders and files are ignored.
follow_links = false

# Index folders and files whose names start with a dot.
include_hidden = false
"##
}
