//! The asset managers
//!
//! - Selection set and click semantics (selection.rs)
//! - Persisted display order and drag reordering (sort.rs, order.rs, sidecar.rs)
//! - FIFO upload queue (upload.rs)
//! - Single and batch deletion (delete.rs)
//!
//! Each manager embeds a [`ManagerBase`] holding the shared event bus, the
//! active folder and the file list it was last handed.

pub mod delete;
pub mod order;
pub mod selection;
pub mod sidecar;
pub mod sort;
pub mod upload;

use parking_lot::Mutex;
use std::sync::Arc;

use crate::error::AssetError;
use crate::events::{EventBus, ImageEvent};
use crate::media::{MediaFile, TargetFolder};

/// Folder, file list and event bus common to every manager
#[derive(Debug, Clone)]
pub struct ManagerBase {
    events: EventBus,
    folder: Option<TargetFolder>,
    files: Vec<MediaFile>,
}

impl ManagerBase {
    pub fn new(events: EventBus) -> Self {
        Self {
            events,
            folder: None,
            files: Vec::new(),
        }
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn emit(&self, event: ImageEvent) {
        self.events.emit(event);
    }

    pub fn folder(&self) -> Option<&TargetFolder> {
        self.folder.as_ref()
    }

    /// The active folder, or the missing-context error
    pub fn require_folder(&self) -> Result<&TargetFolder, AssetError> {
        self.folder.as_ref().ok_or(AssetError::NoTargetFolder)
    }

    /// Switch folders; the old file list no longer applies
    pub fn set_folder(&mut self, folder: Option<TargetFolder>) {
        self.folder = folder;
        self.files.clear();
    }

    pub fn files(&self) -> &[MediaFile] {
        &self.files
    }

    pub fn set_files(&mut self, files: Vec<MediaFile>) {
        self.files = files;
    }

    pub fn contains(&self, name: &str) -> bool {
        self.files.iter().any(|f| f.name == name)
    }
}

/// The sort order of the active folder, shared by the sort, upload and
/// delete managers.
///
/// Reads are cheap snapshots. Anything that rewrites the sidecar must hold
/// [`SharedOrder::writer`] from before the mutation until the write
/// finished, so sidecar writes for the folder never interleave.
#[derive(Clone, Default)]
pub struct SharedOrder {
    inner: Arc<OrderInner>,
}

#[derive(Default)]
struct OrderInner {
    names: Mutex<Vec<String>>,
    writer: tokio::sync::Mutex<()>,
}

impl SharedOrder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Vec<String> {
        self.inner.names.lock().clone()
    }

    pub fn replace(&self, names: Vec<String>) {
        *self.inner.names.lock() = names;
    }

    pub fn is_empty(&self) -> bool {
        self.inner.names.lock().is_empty()
    }

    pub fn update<R>(&self, f: impl FnOnce(&mut Vec<String>) -> R) -> R {
        let mut names = self.inner.names.lock();
        f(&mut *names)
    }

    /// Exclusive right to mutate and persist
    pub async fn writer(&self) -> tokio::sync::MutexGuard<'_, ()> {
        self.inner.writer.lock().await
    }
}

impl std::fmt::Debug for SharedOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SharedOrder").field(&self.snapshot()).finish()
    }
}
