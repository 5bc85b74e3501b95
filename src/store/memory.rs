//! In-memory [`FileStore`] used by the manager tests

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

use super::{FileStore, ViewReloader};
use crate::error::StoreError;
use crate::media::FileEntry;

#[derive(Default)]
pub(crate) struct MemoryStore {
    files: Mutex<BTreeMap<PathBuf, Vec<u8>>>,
    failing: Mutex<HashSet<PathBuf>>,
    writes: Mutex<Vec<PathBuf>>,
    deletes: Mutex<Vec<PathBuf>>,
    gate: Mutex<Option<Gate>>,
}

/// Pauses the next write or delete of one path until released
#[derive(Clone)]
pub(crate) struct Gate {
    path: PathBuf,
    /// Signalled once the held operation has started
    pub entered: Arc<Notify>,
    pub release: Arc<Notify>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, path: impl Into<PathBuf>, bytes: &[u8]) {
        self.files.lock().insert(path.into(), bytes.to_vec());
    }

    /// Make every operation on `path` fail
    pub fn fail_on(&self, path: impl Into<PathBuf>) {
        self.failing.lock().insert(path.into());
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.files.lock().contains_key(path)
    }

    pub fn get(&self, path: &Path) -> Option<Vec<u8>> {
        self.files.lock().get(path).cloned()
    }

    /// Paths written so far, in write order
    pub fn writes(&self) -> Vec<PathBuf> {
        self.writes.lock().clone()
    }

    /// Paths removed so far, in delete order
    pub fn deletes(&self) -> Vec<PathBuf> {
        self.deletes.lock().clone()
    }

    /// Hold the next write or delete of `path`
    pub fn hold(&self, path: impl Into<PathBuf>) -> Gate {
        let gate = Gate {
            path: path.into(),
            entered: Arc::new(Notify::new()),
            release: Arc::new(Notify::new()),
        };
        *self.gate.lock() = Some(gate.clone());
        gate
    }

    async fn pass_gate(&self, path: &Path) {
        let gate = {
            let mut slot = self.gate.lock();
            if slot.as_ref().is_some_and(|g| g.path == path) {
                slot.take()
            } else {
                None
            }
        };
        if let Some(gate) = gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }
    }

    fn check(&self, op: &'static str, path: &Path) -> Result<(), StoreError> {
        if self.failing.lock().contains(path) {
            return Err(StoreError::io(
                op,
                path,
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "injected failure"),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl FileStore for MemoryStore {
    async fn list(&self, dir: &Path) -> Result<Vec<FileEntry>, StoreError> {
        self.check("list", dir)?;
        let files = self.files.lock();
        Ok(files
            .iter()
            .filter(|(path, _)| path.parent() == Some(dir))
            .map(|(path, bytes)| {
                let name = path.file_name().unwrap_or_default().to_string_lossy().to_string();
                let mut entry = FileEntry::file(name, path.clone());
                entry.size = Some(bytes.len() as u64);
                entry
            })
            .collect())
    }

    async fn read(&self, path: &Path) -> Result<Vec<u8>, StoreError> {
        self.check("read", path)?;
        self.get(path).ok_or_else(|| {
            StoreError::io("read", path, std::io::ErrorKind::NotFound.into())
        })
    }

    async fn write(&self, path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
        self.pass_gate(path).await;
        self.check("write", path)?;
        self.writes.lock().push(path.to_path_buf());
        self.insert(path, bytes);
        Ok(())
    }

    async fn delete(&self, path: &Path) -> Result<(), StoreError> {
        self.pass_gate(path).await;
        self.check("delete", path)?;
        match self.files.lock().remove(path) {
            Some(_) => {
                self.deletes.lock().push(path.to_path_buf());
                Ok(())
            }
            None => Err(StoreError::io("delete", path, std::io::ErrorKind::NotFound.into())),
        }
    }
}

/// Reloader that counts how often it was asked to refresh
#[derive(Default)]
pub(crate) struct CountingReloader {
    calls: AtomicUsize,
}

impl CountingReloader {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ViewReloader for CountingReloader {
    async fn reload_detail(&self, _folder_path: &Path, _folder_name: &str) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}
