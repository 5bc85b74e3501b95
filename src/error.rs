//! Error types for the asset manager
//!
//! Managers fold most failures into events and aggregate results. Only the
//! errors below ever reach a caller as `Err`.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced to callers of the managers and the controller
#[derive(Debug, Error)]
pub enum AssetError {
    /// An operation needed an active folder but none was set
    #[error("no target folder is selected")]
    NoTargetFolder,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Failures reported by a [`crate::store::FileStore`]
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{op} {}: {source}", .path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: {message}", .path.display())]
    Listing { path: PathBuf, message: String },

    #[error("background task failed: {0}")]
    Join(String),

    /// A file name that is not a single entry of the target folder
    #[error("invalid file name {name:?}")]
    InvalidName { name: String },
}

impl StoreError {
    pub fn io(op: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            op,
            path: path.into(),
            source,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}

/// Reasons a sort sidecar could not be used.
/// Never leaves the sort manager, which degrades to an empty order.
#[derive(Debug, Error)]
pub(crate) enum SortFileError {
    #[error("failed to read sort file: {0}")]
    Read(#[from] StoreError),

    #[error("sort file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("sort file has no `order` array")]
    Schema,
}

/// Configuration loading failures
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
