//! Runtime configuration for the asset manager
//!
//! Every field has a default so a partial (or missing) config file works.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Name of the sort sidecar written into each product folder
pub const DEFAULT_SORT_FILE: &str = "image_sort.json";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// File name of the sort sidecar inside the target folder
    pub sort_file_name: String,
    /// Drop a file's name from the sort order when it is deleted.
    /// Off by default: stale names are skipped at display time.
    pub prune_sort_on_delete: bool,
    /// Ask before deleting from the command line
    pub confirm_deletes: bool,
    /// Buffer size of the event broadcast channel
    pub event_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sort_file_name: DEFAULT_SORT_FILE.to_string(),
            prune_sort_on_delete: false,
            confirm_deletes: true,
            event_capacity: 256,
        }
    }
}

impl Config {
    /// Load the config from the user's config directory:
    /// - Linux: ~/.config/hanli-assets/config.json
    /// - macOS: ~/Library/Application Support/hanli-assets/config.json
    /// - Windows: %APPDATA%\hanli-assets\config.json
    ///
    /// A missing file yields the defaults.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load the config from an explicit file
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Get the path where the config file is expected
    pub fn default_path() -> Option<PathBuf> {
        let mut path = dirs::config_dir().or_else(dirs::home_dir)?;
        path.push("hanli-assets");
        path.push("config.json");
        Some(path)
    }
}
