use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::Path;
use walkdir::WalkDir;

use super::FileStore;
use crate::error::StoreError;
use crate::media::FileEntry;

/// [`FileStore`] backed by the local disk
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStore;

impl LocalStore {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FileStore for LocalStore {
    async fn list(&self, dir: &Path) -> Result<Vec<FileEntry>, StoreError> {
        let dir = dir.to_path_buf();
        // walkdir is blocking, keep it off the async thread
        tokio::task::spawn_blocking(move || list_blocking(&dir))
            .await
            .map_err(|e| StoreError::Join(e.to_string()))?
    }

    async fn read(&self, path: &Path) -> Result<Vec<u8>, StoreError> {
        tokio::fs::read(path)
            .await
            .map_err(|e| StoreError::io("read", path, e))
    }

    async fn write(&self, path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
        tokio::fs::write(path, bytes)
            .await
            .map_err(|e| StoreError::io("write", path, e))
    }

    async fn delete(&self, path: &Path) -> Result<(), StoreError> {
        tokio::fs::remove_file(path)
            .await
            .map_err(|e| StoreError::io("delete", path, e))
    }
}

/// List direct children sorted by file name
fn list_blocking(dir: &Path) -> Result<Vec<FileEntry>, StoreError> {
    let mut entries = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| StoreError::Listing {
            path: dir.to_path_buf(),
            message: e.to_string(),
        })?;

        let metadata = entry.metadata().ok();
        let size = metadata
            .as_ref()
            .filter(|m| m.is_file())
            .map(|m| m.len());
        let modified_at = metadata
            .as_ref()
            .and_then(|m| m.modified().ok())
            .map(DateTime::<Utc>::from);

        entries.push(FileEntry {
            name: entry.file_name().to_string_lossy().to_string(),
            path: entry.path().to_path_buf(),
            is_directory: entry.file_type().is_dir(),
            size,
            modified_at,
        });
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_list_read_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new();
        std::fs::create_dir(dir.path().join("nested")).unwrap();

        store.write(&dir.path().join("b.png"), b"bb").await.unwrap();
        store.write(&dir.path().join("a.jpg"), b"a").await.unwrap();

        let entries = store.list(dir.path()).await.unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a.jpg", "b.png", "nested"]);
        assert_eq!(entries[1].size, Some(2));
        assert!(entries[2].is_directory);

        let bytes = store.read(&dir.path().join("b.png")).await.unwrap();
        assert_eq!(bytes, b"bb");

        store.delete(&dir.path().join("a.jpg")).await.unwrap();
        assert!(!dir.path().join("a.jpg").exists());
    }

    #[tokio::test]
    async fn test_write_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new();
        let path = dir.path().join("x.jpg");

        store.write(&path, b"first").await.unwrap();
        store.write(&path, b"second").await.unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"second");
    }

    #[tokio::test]
    async fn test_missing_paths_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new();
        let missing = dir.path().join("gone.jpg");

        assert!(store.read(&missing).await.is_err());
        assert!(store.delete(&missing).await.is_err());
        assert!(store.list(&dir.path().join("nope")).await.is_err());
    }
}
