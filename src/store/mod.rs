//! Collaborator interfaces consumed by the managers
//!
//! The managers never touch the filesystem directly. They go through a
//! [`FileStore`] and ask a [`ViewReloader`] to refresh whatever view shows the
//! folder once a mutating batch succeeded.

use async_trait::async_trait;
use std::path::Path;

use crate::error::StoreError;
use crate::media::FileEntry;

mod local;
#[cfg(test)]
pub(crate) mod memory;

pub use local::LocalStore;

/// Directory listing and whole-file I/O
#[async_trait]
pub trait FileStore: Send + Sync {
    /// List the direct children of a directory
    async fn list(&self, dir: &Path) -> Result<Vec<FileEntry>, StoreError>;

    async fn read(&self, path: &Path) -> Result<Vec<u8>, StoreError>;

    /// Write a file, replacing any existing one
    async fn write(&self, path: &Path, bytes: &[u8]) -> Result<(), StoreError>;

    async fn delete(&self, path: &Path) -> Result<(), StoreError>;
}

/// Called after an upload or delete batch changed the folder's contents
#[async_trait]
pub trait ViewReloader: Send + Sync {
    async fn reload_detail(&self, folder_path: &Path, folder_name: &str);
}

/// Reloader for callers that refresh on their own (CLI, tests)
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReloader;

#[async_trait]
impl ViewReloader for NoopReloader {
    async fn reload_detail(&self, _folder_path: &Path, _folder_name: &str) {}
}
