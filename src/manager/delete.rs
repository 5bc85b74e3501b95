//! Single and batch deletion inside the target folder

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::sidecar::SortSidecar;
use super::{ManagerBase, SharedOrder};
use crate::confirm::Confirmer;
use crate::error::{AssetError, StoreError};
use crate::events::{EventBus, ImageEvent};
use crate::media::{MediaFile, TargetFolder};
use crate::store::{FileStore, ViewReloader};

/// Outcome of a delete batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteSummary {
    pub success: usize,
    pub failed: usize,
    /// `"<name>: <reason>"` per failed file
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteStatus {
    pub is_deleting: bool,
    pub pending: Vec<String>,
}

pub struct DeleteManager {
    base: ManagerBase,
    store: Arc<dyn FileStore>,
    reloader: Arc<dyn ViewReloader>,
    confirmer: Arc<dyn Confirmer>,
    sidecar: SortSidecar,
    order: SharedOrder,
    prune_sort_on_delete: bool,
    pending: Mutex<VecDeque<String>>,
    is_deleting: AtomicBool,
    /// One batch at a time
    batch: tokio::sync::Mutex<()>,
}

impl DeleteManager {
    pub fn new(
        events: EventBus,
        store: Arc<dyn FileStore>,
        reloader: Arc<dyn ViewReloader>,
        confirmer: Arc<dyn Confirmer>,
        sidecar: SortSidecar,
        order: SharedOrder,
    ) -> Self {
        Self {
            base: ManagerBase::new(events),
            store,
            reloader,
            confirmer,
            sidecar,
            order,
            prune_sort_on_delete: false,
            pending: Mutex::new(VecDeque::new()),
            is_deleting: AtomicBool::new(false),
            batch: tokio::sync::Mutex::new(()),
        }
    }

    /// Also remove deleted names from the sort order
    pub fn with_prune_sort_on_delete(mut self, prune: bool) -> Self {
        self.prune_sort_on_delete = prune;
        self
    }

    pub fn set_current_item(&mut self, folder: Option<TargetFolder>) {
        self.base.set_folder(folder);
        self.cancel_delete();
    }

    pub fn update_image_files(&mut self, files: Vec<MediaFile>) {
        self.base.set_files(files);
    }

    /// Delete one file. Store failures come back as `Ok(false)`.
    ///
    /// Waits for a running batch to finish first.
    pub async fn delete_file(&self, name: &str) -> Result<bool, AssetError> {
        let folder = self.base.require_folder()?;

        let _batch = self.batch.lock().await;
        self.is_deleting.store(true, Ordering::SeqCst);
        let deleted = self.delete_in(folder, name).await.is_ok();
        self.is_deleting.store(false, Ordering::SeqCst);

        if deleted {
            self.reloader.reload_detail(&folder.path, &folder.name).await;
        }
        Ok(deleted)
    }

    /// Delete files one after another; a failure never stops the batch
    pub async fn delete_files(&self, names: &[String]) -> Result<DeleteSummary, AssetError> {
        let folder = self.base.require_folder()?;
        if names.is_empty() {
            return Ok(DeleteSummary::default());
        }

        let _batch = self.batch.lock().await;
        self.pending.lock().extend(names.iter().cloned());
        self.is_deleting.store(true, Ordering::SeqCst);

        tracing::info!("deleting {} files from {}", names.len(), folder.name);
        self.base.emit(ImageEvent::DeleteStarted {
            files: names.to_vec(),
        });

        let mut summary = DeleteSummary::default();
        loop {
            let next = self.pending.lock().pop_front();
            let Some(name) = next else {
                break;
            };
            match self.delete_in(folder, &name).await {
                Ok(()) => summary.success += 1,
                Err(e) => {
                    summary.failed += 1;
                    summary.errors.push(format!("{}: {}", name, e));
                }
            }
        }

        self.is_deleting.store(false, Ordering::SeqCst);
        tracing::info!(
            "delete finished: {} removed, {} failed",
            summary.success,
            summary.failed
        );
        self.base.emit(ImageEvent::DeleteCompleted(summary.clone()));

        if summary.success > 0 {
            self.reloader.reload_detail(&folder.path, &folder.name).await;
        }
        Ok(summary)
    }

    /// Ask first; declining deletes nothing
    pub async fn delete_file_with_confirm(&self, name: &str) -> Result<bool, AssetError> {
        self.base.require_folder()?;
        let message = format!("Delete \"{}\"? This cannot be undone.", name);
        if !self.confirmer.confirm(&message).await {
            tracing::debug!("delete of {} declined", name);
            return Ok(false);
        }
        self.delete_file(name).await
    }

    pub async fn delete_files_with_confirm(&self, names: &[String]) -> Result<DeleteSummary, AssetError> {
        self.base.require_folder()?;
        if names.is_empty() {
            return Ok(DeleteSummary::default());
        }
        let message = format!("Delete {} files? This cannot be undone.", names.len());
        if !self.confirmer.confirm(&message).await {
            tracing::debug!("batch delete of {} files declined", names.len());
            return Ok(DeleteSummary::default());
        }
        self.delete_files(names).await
    }

    /// Delete every tracked image and video, after confirmation
    pub async fn clear_all_images(&self) -> Result<DeleteSummary, AssetError> {
        let folder = self.base.require_folder()?;
        let names: Vec<String> = self
            .base
            .files()
            .iter()
            .filter(|f| f.kind.is_visual())
            .map(|f| f.name.clone())
            .collect();
        if names.is_empty() {
            return Ok(DeleteSummary::default());
        }

        let message = format!(
            "Delete all {} images and videos in \"{}\"? This cannot be undone.",
            names.len(),
            folder.name
        );
        if !self.confirmer.confirm(&message).await {
            return Ok(DeleteSummary::default());
        }
        self.delete_files(&names).await
    }

    /// Forget names not yet processed. Completed deletions stay deleted.
    pub fn cancel_delete(&self) -> usize {
        let dropped = {
            let mut pending = self.pending.lock();
            let n = pending.len();
            pending.clear();
            n
        };
        self.is_deleting.store(false, Ordering::SeqCst);
        if dropped > 0 {
            tracing::info!("cancelled {} pending deletions", dropped);
        }
        dropped
    }

    pub fn delete_status(&self) -> DeleteStatus {
        DeleteStatus {
            is_deleting: self.is_deleting.load(Ordering::SeqCst),
            pending: self.pending.lock().iter().cloned().collect(),
        }
    }

    pub fn is_deleting(&self) -> bool {
        self.is_deleting.load(Ordering::SeqCst)
    }

    /// Remove one file and report it
    async fn delete_in(&self, folder: &TargetFolder, name: &str) -> Result<(), StoreError> {
        let result = match folder.file_path(name) {
            Ok(path) => self.store.delete(&path).await,
            Err(e) => Err(e),
        };

        match &result {
            Ok(()) => tracing::debug!("deleted {}", name),
            Err(e) => tracing::warn!("failed to delete {}: {}", name, e),
        }
        self.base.emit(ImageEvent::FileDeleted {
            file_name: name.to_string(),
            success: result.is_ok(),
            error: result.as_ref().err().map(|e| e.to_string()),
        });

        if result.is_ok() && self.prune_sort_on_delete {
            self.prune_from_order(folder, name).await;
        }
        result
    }

    async fn prune_from_order(&self, folder: &TargetFolder, name: &str) {
        let _writer = self.order.writer().await;
        let new_order = self.order.update(|order| {
            let before = order.len();
            order.retain(|n| n != name);
            (order.len() != before).then(|| order.clone())
        });
        if let Some(new_order) = new_order {
            self.sidecar.save(&folder.path, &new_order).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confirm::AutoConfirm;
    use crate::events::record;
    use crate::store::memory::{CountingReloader, MemoryStore};
    use std::path::{Path, PathBuf};

    const FOLDER: &str = "/catalog/sku-3";

    struct Fixture {
        store: Arc<MemoryStore>,
        reloader: Arc<CountingReloader>,
        order: SharedOrder,
        manager: DeleteManager,
    }

    fn setup(names: &[&str], confirm: bool, prune: bool) -> Fixture {
        let store = Arc::new(MemoryStore::new());
        for name in names {
            store.insert(target(name), name.as_bytes());
        }
        let reloader = Arc::new(CountingReloader::default());
        let order = SharedOrder::new();
        let mut manager = DeleteManager::new(
            EventBus::new(64),
            store.clone(),
            reloader.clone(),
            Arc::new(AutoConfirm(confirm)),
            SortSidecar::new(store.clone(), "image_sort.json"),
            order.clone(),
        )
        .with_prune_sort_on_delete(prune);
        manager.set_current_item(Some(TargetFolder::from_path(FOLDER)));
        manager.update_image_files(
            names.iter().map(|n| MediaFile::new(Path::new(FOLDER), *n)).collect(),
        );
        Fixture {
            store,
            reloader,
            order,
            manager,
        }
    }

    fn target(name: &str) -> PathBuf {
        Path::new(FOLDER).join(name)
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|n| n.to_string()).collect()
    }

    #[tokio::test]
    async fn test_delete_single_file() {
        let f = setup(&["a.jpg", "b.jpg"], true, false);
        let events = record(f.manager.base.events());

        assert!(f.manager.delete_file("a.jpg").await.unwrap());

        assert!(!f.store.contains(&target("a.jpg")));
        assert!(f.store.contains(&target("b.jpg")));
        assert_eq!(f.reloader.calls(), 1);
        assert_eq!(
            events.lock()[0],
            ImageEvent::FileDeleted {
                file_name: "a.jpg".into(),
                success: true,
                error: None,
            }
        );
    }

    #[tokio::test]
    async fn test_delete_missing_file_folds_into_false() {
        let f = setup(&["a.jpg"], true, false);

        assert!(!f.manager.delete_file("nope.jpg").await.unwrap());
        assert_eq!(f.reloader.calls(), 0);
    }

    #[tokio::test]
    async fn test_batch_partial_failure() {
        let f = setup(&["a.jpg", "b.jpg", "c.jpg"], true, false);
        f.store.fail_on(target("b.jpg"));

        let summary = f
            .manager
            .delete_files(&names(&["a.jpg", "b.jpg", "c.jpg"]))
            .await
            .unwrap();

        assert_eq!(summary.success, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.errors.len(), 1);
        assert!(summary.errors[0].starts_with("b.jpg: "));
        assert!(!f.store.contains(&target("a.jpg")));
        assert!(f.store.contains(&target("b.jpg")));
        assert!(!f.store.contains(&target("c.jpg")));
        assert_eq!(f.reloader.calls(), 1);
        assert!(!f.manager.is_deleting());
    }

    #[tokio::test]
    async fn test_batch_event_sequence() {
        let f = setup(&["a.jpg", "b.jpg"], true, false);
        let events = record(f.manager.base.events());

        f.manager.delete_files(&names(&["a.jpg", "b.jpg"])).await.unwrap();

        let seen: Vec<_> = events.lock().iter().map(|e| e.name()).collect();
        assert_eq!(
            seen,
            vec!["deleteStarted", "fileDeleted", "fileDeleted", "deleteCompleted"]
        );
    }

    #[tokio::test]
    async fn test_all_failed_batch_does_not_reload() {
        let f = setup(&["a.jpg"], true, false);

        let summary = f.manager.delete_files(&names(&["x.jpg"])).await.unwrap();

        assert_eq!(summary.failed, 1);
        assert_eq!(f.reloader.calls(), 0);
    }

    #[tokio::test]
    async fn test_declined_confirmation_is_a_noop() {
        let f = setup(&["a.jpg", "b.jpg"], false, false);

        assert!(!f.manager.delete_file_with_confirm("a.jpg").await.unwrap());
        let summary = f
            .manager
            .delete_files_with_confirm(&names(&["a.jpg", "b.jpg"]))
            .await
            .unwrap();
        let cleared = f.manager.clear_all_images().await.unwrap();

        assert_eq!(summary, DeleteSummary::default());
        assert_eq!(cleared, DeleteSummary::default());
        assert!(f.store.contains(&target("a.jpg")));
        assert!(f.store.contains(&target("b.jpg")));
    }

    #[tokio::test]
    async fn test_confirmed_deletes() {
        let f = setup(&["a.jpg", "b.mp4", "c.png"], true, false);

        assert!(f.manager.delete_file_with_confirm("a.jpg").await.unwrap());
        let summary = f.manager.clear_all_images().await.unwrap();

        // a.jpg is still in the tracked list until the view reloads
        assert_eq!(summary.success, 2);
        assert_eq!(summary.failed, 1);
        assert!(!f.store.contains(&target("b.mp4")));
        assert!(!f.store.contains(&target("c.png")));
    }

    #[tokio::test]
    async fn test_stale_order_entries_remain_by_default() {
        let f = setup(&["a.jpg", "b.jpg"], true, false);
        f.order.replace(names(&["b.jpg", "a.jpg"]));

        f.manager.delete_file("a.jpg").await.unwrap();

        assert_eq!(f.order.snapshot(), names(&["b.jpg", "a.jpg"]));
    }

    #[tokio::test]
    async fn test_prune_policy_drops_deleted_names() {
        let f = setup(&["a.jpg", "b.jpg"], true, true);
        f.order.replace(names(&["b.jpg", "a.jpg"]));

        f.manager.delete_file("a.jpg").await.unwrap();

        assert_eq!(f.order.snapshot(), names(&["b.jpg"]));
        let raw = f.store.get(&target("image_sort.json")).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&raw).unwrap();
        assert_eq!(value["order"], serde_json::json!(["b.jpg"]));
    }

    #[tokio::test]
    async fn test_cancel_delete_clears_bookkeeping() {
        let f = setup(&["a.jpg"], true, false);
        f.manager.pending.lock().extend(names(&["x", "y"]));
        f.manager.is_deleting.store(true, Ordering::SeqCst);

        assert_eq!(f.manager.cancel_delete(), 2);

        let status = f.manager.delete_status();
        assert!(!status.is_deleting);
        assert!(status.pending.is_empty());
    }

    #[tokio::test]
    async fn test_names_outside_folder_are_refused() {
        let f = setup(&["a.jpg"], true, false);
        f.store.insert("/home/user/precious.jpg", b"keep");
        f.store.insert("/catalog/x.jpg", b"keep");
        let events = record(f.manager.base.events());

        assert!(!f.manager.delete_file("/home/user/precious.jpg").await.unwrap());
        let summary = f.manager.delete_files(&names(&["../x.jpg", "a.jpg"])).await.unwrap();

        assert_eq!(summary.success, 1);
        assert_eq!(summary.failed, 1);
        assert!(f.store.contains(Path::new("/home/user/precious.jpg")));
        assert!(f.store.contains(Path::new("/catalog/x.jpg")));
        assert_eq!(f.store.deletes(), vec![target("a.jpg")]);
        assert!(matches!(
            &events.lock()[0],
            ImageEvent::FileDeleted { success: false, error: Some(_), .. }
        ));
        assert_eq!(f.reloader.calls(), 1);
    }

    #[tokio::test]
    async fn test_single_delete_waits_for_running_batch() {
        let f = setup(&["a.jpg", "b.jpg", "c.jpg"], true, false);
        let gate = f.store.hold(target("a.jpg"));
        let events = record(f.manager.base.events());

        let batch_names = names(&["a.jpg", "b.jpg"]);
        let batch = f.manager.delete_files(&batch_names);
        let single = async {
            gate.entered.notified().await;
            let status = f.manager.delete_status();
            assert!(status.is_deleting);
            assert_eq!(status.pending, names(&["b.jpg"]));
            gate.release.notify_one();
            f.manager.delete_file("c.jpg").await
        };
        let (summary, single) = tokio::join!(batch, single);

        assert_eq!(summary.unwrap().success, 2);
        assert!(single.unwrap());
        assert_eq!(
            f.store.deletes(),
            vec![target("a.jpg"), target("b.jpg"), target("c.jpg")]
        );
        let seen: Vec<_> = events.lock().iter().map(|e| e.name()).collect();
        assert_eq!(
            seen,
            vec!["deleteStarted", "fileDeleted", "fileDeleted", "deleteCompleted", "fileDeleted"]
        );
        assert!(!f.manager.is_deleting());
    }

    #[tokio::test]
    async fn test_requires_folder() {
        let mut f = setup(&["a.jpg"], true, false);
        f.manager.set_current_item(None);

        assert!(matches!(
            f.manager.delete_file("a.jpg").await,
            Err(AssetError::NoTargetFolder)
        ));
        assert!(matches!(
            f.manager.delete_files(&names(&["a.jpg"])).await,
            Err(AssetError::NoTargetFolder)
        ));
        assert!(matches!(
            f.manager.delete_file_with_confirm("a.jpg").await,
            Err(AssetError::NoTargetFolder)
        ));
    }
}
