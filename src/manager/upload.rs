//! FIFO upload queue
//!
//! Files are written into the target folder one at a time, in submission
//! order. Each successful write appends the file's name to the sort order so
//! the new file shows up at the end of the display list.

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::order::{apply_sort_order, materialize};
use super::sidecar::SortSidecar;
use super::{ManagerBase, SharedOrder};
use crate::error::{AssetError, StoreError};
use crate::events::{EventBus, ImageEvent};
use crate::media::{classify, is_plain_file_name, MediaFile, TargetFolder};
use crate::store::{FileStore, ViewReloader};

/// Where a pending file's bytes come from
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Read through the file store when its turn comes
    Path(PathBuf),
    /// Already in memory (drop, paste)
    Bytes(Vec<u8>),
}

/// One file waiting to be written
#[derive(Debug, Clone, PartialEq)]
pub struct PendingFile {
    /// Name the file gets inside the target folder
    pub name: String,
    pub payload: Payload,
}

impl PendingFile {
    /// Upload a file from disk under its own name
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        Self {
            name,
            payload: Payload::Path(path),
        }
    }

    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            payload: Payload::Bytes(bytes),
        }
    }
}

/// Outcome of one drained queue
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadSummary {
    pub success_count: usize,
    pub failed_count: usize,
    /// `"<name>: <reason>"` per failed file
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueStatus {
    pub is_uploading: bool,
    pub queue_length: usize,
    pub files: Vec<String>,
}

pub struct UploadManager {
    base: ManagerBase,
    store: Arc<dyn FileStore>,
    reloader: Arc<dyn ViewReloader>,
    sidecar: SortSidecar,
    order: SharedOrder,
    queue: Mutex<VecDeque<PendingFile>>,
    /// Reported state; cleared by a cancel
    is_uploading: AtomicBool,
    /// Set while a drain loop owns the queue. A cancel never clears it, so a
    /// drain finishing its last write cannot be joined by a second one.
    draining: AtomicBool,
}

impl UploadManager {
    pub fn new(
        events: EventBus,
        store: Arc<dyn FileStore>,
        reloader: Arc<dyn ViewReloader>,
        sidecar: SortSidecar,
        order: SharedOrder,
    ) -> Self {
        Self {
            base: ManagerBase::new(events),
            store,
            reloader,
            sidecar,
            order,
            queue: Mutex::new(VecDeque::new()),
            is_uploading: AtomicBool::new(false),
            draining: AtomicBool::new(false),
        }
    }

    /// New folder: anything still queued belonged to the old one
    pub fn set_current_item(&mut self, folder: Option<TargetFolder>) {
        self.base.set_folder(folder);
        self.cancel_upload();
    }

    /// Files in natural order; used to place new names after the displayed ones
    pub fn update_image_files(&mut self, files: Vec<MediaFile>) {
        self.base.set_files(files);
    }

    /// Queue image and video files and drain the queue if nobody else is.
    /// Names that are not a plain file name are rejected with the non-media
    /// files.
    ///
    /// Returns the summary when this call did the draining, `None` when the
    /// files were rejected or handed to a drain already running.
    pub async fn add_files(&self, files: Vec<PendingFile>) -> Result<Option<UploadSummary>, AssetError> {
        let folder = self.base.require_folder()?;

        let (accepted, rejected): (Vec<_>, Vec<_>) = files
            .into_iter()
            .partition(|f| is_plain_file_name(&f.name) && classify(&f.name).is_visual());
        let rejected: Vec<String> = rejected.into_iter().map(|f| f.name).collect();

        if accepted.is_empty() {
            tracing::warn!("no image or video files among {} submitted", rejected.len());
            self.base.emit(ImageEvent::UploadError {
                message: "only image and video files can be uploaded into the folder".to_string(),
                rejected,
            });
            return Ok(None);
        }
        if !rejected.is_empty() {
            tracing::debug!("skipping {} files: {:?}", rejected.len(), rejected);
        }

        let names: Vec<String> = accepted.iter().map(|f| f.name.clone()).collect();
        let queue_length = {
            let mut queue = self.queue.lock();
            queue.extend(accepted);
            queue.len()
        };
        self.base.emit(ImageEvent::FilesAdded {
            files: names,
            queue_length,
        });

        Ok(self.drain_queue(folder).await)
    }

    /// Drain the queue unless a drain is already running
    pub async fn process_upload_queue(&self) -> Result<Option<UploadSummary>, AssetError> {
        let folder = self.base.require_folder()?;
        Ok(self.drain_queue(folder).await)
    }

    /// Drop everything still queued. A write already in progress finishes.
    pub fn cancel_upload(&self) -> usize {
        let dropped = {
            let mut queue = self.queue.lock();
            let n = queue.len();
            queue.clear();
            n
        };
        self.is_uploading.store(false, Ordering::SeqCst);
        if dropped > 0 {
            tracing::info!("cancelled {} queued uploads", dropped);
        }
        dropped
    }

    pub fn queue_status(&self) -> QueueStatus {
        let queue = self.queue.lock();
        QueueStatus {
            is_uploading: self.is_uploading.load(Ordering::SeqCst),
            queue_length: queue.len(),
            files: queue.iter().map(|f| f.name.clone()).collect(),
        }
    }

    pub fn is_uploading(&self) -> bool {
        self.is_uploading.load(Ordering::SeqCst)
    }

    async fn drain_queue(&self, folder: &TargetFolder) -> Option<UploadSummary> {
        if self.draining.swap(true, Ordering::SeqCst) {
            return None;
        }
        self.is_uploading.store(true, Ordering::SeqCst);

        let queue_length = self.queue.lock().len();
        tracing::info!("uploading {} files into {}", queue_length, folder.name);
        self.base.emit(ImageEvent::UploadStarted { queue_length });

        let mut summary = UploadSummary::default();
        loop {
            let next = self.queue.lock().pop_front();
            let Some(file) = next else {
                self.draining.store(false, Ordering::SeqCst);
                // Files queued after the last pop but before the flag cleared
                if self.queue.lock().is_empty() || self.draining.swap(true, Ordering::SeqCst) {
                    break;
                }
                continue;
            };
            self.is_uploading.store(true, Ordering::SeqCst);

            match self.upload_one(folder, &file).await {
                Ok(()) => {
                    summary.success_count += 1;
                    tracing::debug!("uploaded {}", file.name);
                    self.base.emit(ImageEvent::FileUploaded {
                        file: file.name.clone(),
                        success: true,
                        error: None,
                    });
                    self.append_to_order(folder, &file.name).await;
                }
                Err(e) => {
                    summary.failed_count += 1;
                    tracing::warn!("upload of {} failed: {}", file.name, e);
                    summary.errors.push(format!("{}: {}", file.name, e));
                    self.base.emit(ImageEvent::FileUploaded {
                        file: file.name.clone(),
                        success: false,
                        error: Some(e.to_string()),
                    });
                }
            }
        }

        self.is_uploading.store(false, Ordering::SeqCst);
        tracing::info!(
            "upload finished: {} succeeded, {} failed",
            summary.success_count,
            summary.failed_count
        );
        self.base.emit(ImageEvent::UploadCompleted(summary.clone()));

        if summary.success_count > 0 {
            self.reloader.reload_detail(&folder.path, &folder.name).await;
        }
        Some(summary)
    }

    async fn upload_one(&self, folder: &TargetFolder, file: &PendingFile) -> Result<(), StoreError> {
        let target = folder.file_path(&file.name)?;
        match &file.payload {
            Payload::Bytes(bytes) => self.store.write(&target, bytes).await,
            Payload::Path(source) => {
                let bytes = self.store.read(source).await?;
                self.store.write(&target, &bytes).await
            }
        }
    }

    /// Put a new name after everything currently displayed and persist
    async fn append_to_order(&self, folder: &TargetFolder, name: &str) {
        let _writer = self.order.writer().await;
        let files = self.base.files();

        let new_order = self.order.update(|order| {
            if order.iter().any(|n| n == name) {
                return None;
            }
            let display: Vec<String> = apply_sort_order(files, order)
                .into_iter()
                .map(|f| f.name)
                .filter(|n| n != name)
                .collect();
            let mut full = materialize(&display, order);
            full.push(name.to_string());
            *order = full.clone();
            Some(full)
        });

        if let Some(new_order) = new_order {
            self.sidecar.save(&folder.path, &new_order).await;
        }
    }
}
