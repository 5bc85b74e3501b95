//! Shared data structures for the asset managers
//!
//! These structs flow between the file store and the managers.

use chrono::{DateTime, Utc};
use std::path::{Component, Path, PathBuf};

use super::kind::{classify, MediaKind};
use crate::error::StoreError;

/// The folder currently under management (one product's asset directory)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetFolder {
    /// Absolute directory path, the folder's identity
    pub path: PathBuf,
    /// Display name handed to the view reloader
    pub name: String,
}

impl TargetFolder {
    pub fn new(path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
        }
    }

    /// Build a folder whose display name is the last path component
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        Self { path, name }
    }

    /// Location of a file inside this folder.
    ///
    /// The name must be a single plain path component, so nothing can
    /// resolve outside the folder.
    pub fn file_path(&self, file_name: &str) -> Result<PathBuf, StoreError> {
        if !is_plain_file_name(file_name) {
            return Err(StoreError::InvalidName {
                name: file_name.to_string(),
            });
        }
        Ok(self.path.join(file_name))
    }
}

/// True when `name` is exactly one normal path component
pub fn is_plain_file_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !name.ends_with('/')
}

/// One raw directory listing entry, as returned by a file store
#[derive(Debug, Clone, PartialEq)]
pub struct FileEntry {
    pub name: String,
    pub path: PathBuf,
    pub is_directory: bool,
    pub size: Option<u64>,
    pub modified_at: Option<DateTime<Utc>>,
}

impl FileEntry {
    pub fn file(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            is_directory: false,
            size: None,
            modified_at: None,
        }
    }
}

/// One asset inside the target folder
#[derive(Debug, Clone, PartialEq)]
pub struct MediaFile {
    /// File name, unique within the folder
    pub name: String,
    /// Full path (folder path + name)
    pub path: PathBuf,
    /// Derived from the extension, never persisted
    pub kind: MediaKind,
    pub size: Option<u64>,
    pub modified_at: Option<DateTime<Utc>>,
}

impl MediaFile {
    pub fn new(folder: &Path, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            path: folder.join(&name),
            kind: classify(&name),
            name,
            size: None,
            modified_at: None,
        }
    }

    /// Convert a listing entry; directories are not media files
    pub fn from_entry(entry: FileEntry) -> Option<Self> {
        if entry.is_directory {
            return None;
        }
        Some(Self {
            kind: classify(&entry.name),
            name: entry.name,
            path: entry.path,
            size: entry.size,
            modified_at: entry.modified_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_entry_skips_directories() {
        let mut entry = FileEntry::file("thumbs", "/p/thumbs");
        entry.is_directory = true;
        assert!(MediaFile::from_entry(entry).is_none());

        let file = MediaFile::from_entry(FileEntry::file("a.PNG", "/p/a.PNG")).unwrap();
        assert_eq!(file.kind, MediaKind::Image);
        assert_eq!(file.path, PathBuf::from("/p/a.PNG"));
    }

    #[test]
    fn test_folder_from_path() {
        let folder = TargetFolder::from_path("/catalog/sku-1042");
        assert_eq!(folder.name, "sku-1042");
        assert_eq!(
            folder.file_path("1.jpg").unwrap(),
            PathBuf::from("/catalog/sku-1042/1.jpg")
        );
    }

    #[test]
    fn test_file_path_stays_inside_folder() {
        let folder = TargetFolder::from_path("/catalog/sku-1");
        for name in ["/home/user/precious.jpg", "../x.jpg", "sub/a.jpg", "..", ".", "", "a.jpg/"] {
            assert!(
                matches!(folder.file_path(name), Err(StoreError::InvalidName { .. })),
                "{name:?} should be rejected"
            );
        }
        assert!(is_plain_file_name("cover image (1).JPG"));
        assert!(is_plain_file_name("..hidden.png"));
    }
}
