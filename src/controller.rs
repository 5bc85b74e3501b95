//! The façade the UI talks to
//!
//! [`ImageController`] owns one instance of each manager, wired to a single
//! event bus and a single shared sort order. Folder and file-list changes fan
//! out to every manager in a fixed order: selection, sort, upload, delete.

use std::sync::Arc;
use tokio::sync::broadcast;

use crate::config::Config;
use crate::confirm::Confirmer;
use crate::error::AssetError;
use crate::events::{EventBus, EventKind, ImageEvent, ListenerId};
use crate::manager::delete::{DeleteManager, DeleteStatus, DeleteSummary};
use crate::manager::selection::{Modifiers, SelectionManager, SelectionMode};
use crate::manager::sidecar::SortSidecar;
use crate::manager::sort::{DragState, SortManager};
use crate::manager::upload::{PendingFile, QueueStatus, UploadManager, UploadSummary};
use crate::manager::SharedOrder;
use crate::media::{FileEntry, MediaFile, TargetFolder};
use crate::store::{FileStore, ViewReloader};

pub struct ImageController {
    events: EventBus,
    store: Arc<dyn FileStore>,
    folder: Option<TargetFolder>,
    selection: SelectionManager,
    sort: SortManager,
    upload: UploadManager,
    delete: DeleteManager,
}

impl ImageController {
    pub fn new(
        store: Arc<dyn FileStore>,
        reloader: Arc<dyn ViewReloader>,
        confirmer: Arc<dyn Confirmer>,
        config: &Config,
    ) -> Self {
        let events = EventBus::new(config.event_capacity);
        let order = SharedOrder::new();
        let sidecar = SortSidecar::new(store.clone(), config.sort_file_name.clone());

        let selection = SelectionManager::new(events.clone());
        let sort = SortManager::new(events.clone(), sidecar.clone(), order.clone());
        let upload = UploadManager::new(
            events.clone(),
            store.clone(),
            reloader.clone(),
            sidecar.clone(),
            order.clone(),
        );
        let delete = DeleteManager::new(events.clone(), store.clone(), reloader, confirmer, sidecar, order)
            .with_prune_sort_on_delete(config.prune_sort_on_delete);

        Self {
            events,
            store,
            folder: None,
            selection,
            sort,
            upload,
            delete,
        }
    }

    // ========== Events ==========

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ImageEvent> {
        self.events.subscribe()
    }

    pub fn on<F>(&self, kind: EventKind, callback: F) -> ListenerId
    where
        F: Fn(&ImageEvent) + Send + Sync + 'static,
    {
        self.events.on(kind, callback)
    }

    pub fn on_any<F>(&self, callback: F) -> ListenerId
    where
        F: Fn(&ImageEvent) + Send + Sync + 'static,
    {
        self.events.on_any(callback)
    }

    pub fn off(&self, id: ListenerId) -> bool {
        self.events.off(id)
    }

    // ========== Folder and files ==========

    /// Switch to another folder (or none) and load its sort sidecar.
    /// Returns the loaded order.
    pub async fn set_current_item(&mut self, folder: Option<TargetFolder>) -> Vec<String> {
        match &folder {
            Some(f) => tracing::info!("managing {}", f.path.display()),
            None => tracing::info!("no folder selected"),
        }
        self.folder = folder.clone();

        self.selection.set_current_item(folder.clone());
        self.sort.set_current_item(folder.clone());
        self.upload.set_current_item(folder.clone());
        self.delete.set_current_item(folder);

        match &self.folder {
            Some(f) => self.sort.load_sort_config(&f.path).await,
            None => Vec::new(),
        }
    }

    pub fn current_item(&self) -> Option<&TargetFolder> {
        self.folder.as_ref()
    }

    /// Feed a raw listing of the current folder. Only images and videos are
    /// managed; the sidecar and other files are ignored.
    ///
    /// Sort, upload and delete get the natural list first. Selection is
    /// updated last because its indices address the sorted display list.
    pub fn update_image_files(&mut self, entries: Vec<FileEntry>) {
        let natural: Vec<MediaFile> = entries
            .into_iter()
            .filter_map(MediaFile::from_entry)
            .filter(|f| f.kind.is_visual())
            .collect();

        self.sort.update_image_files(natural.clone());
        self.upload.update_image_files(natural.clone());
        self.delete.update_image_files(natural);
        self.sync_selection();
    }

    /// List the current folder through the store and feed the result.
    /// Returns the number of managed files.
    pub async fn refresh(&mut self) -> Result<usize, AssetError> {
        let folder = self.folder.as_ref().ok_or(AssetError::NoTargetFolder)?;
        let entries = self.store.list(&folder.path).await?;
        self.update_image_files(entries);
        Ok(self.sort.sorted_files().len())
    }

    /// Managed files in display order
    pub fn image_files(&self) -> Vec<MediaFile> {
        self.sort.sorted_files()
    }

    /// Selection indices address the display order, so it follows every reorder
    fn sync_selection(&mut self) {
        self.selection.update_image_files(self.sort.sorted_files());
    }

    // ========== Selection ==========

    pub fn select_image(&mut self, name: &str, index: usize, modifiers: Modifiers) {
        self.selection.select_image(name, index, modifiers);
    }

    pub fn deselect_image(&mut self, name: &str) {
        self.selection.deselect_image(name);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear_selection();
    }

    pub fn select_all(&mut self) {
        self.selection.select_all();
    }

    pub fn invert_selection(&mut self) {
        self.selection.invert_selection();
    }

    pub fn set_selection<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.selection.set_selection(names);
    }

    pub fn is_selected(&self, name: &str) -> bool {
        self.selection.is_selected(name)
    }

    pub fn selected_images(&self) -> Vec<String> {
        self.selection.selected_images()
    }

    pub fn selection_count(&self) -> usize {
        self.selection.selection_count()
    }

    pub fn set_selection_mode(&mut self, mode: SelectionMode) {
        self.selection.set_selection_mode(mode);
    }

    pub fn selection_mode(&self) -> SelectionMode {
        self.selection.mode()
    }

    // ========== Sorting ==========

    pub async fn handle_drag_sort(&mut self, from_index: usize, to_index: usize) -> Result<bool, AssetError> {
        let moved = self.sort.handle_drag_sort(from_index, to_index).await?;
        self.sync_selection();
        Ok(moved)
    }

    pub async fn swap_images(&mut self, index_a: usize, index_b: usize) -> Result<bool, AssetError> {
        let swapped = self.sort.swap_images(index_a, index_b).await?;
        self.sync_selection();
        Ok(swapped)
    }

    pub async fn move_image(&mut self, from_index: usize, to_index: usize) -> Result<bool, AssetError> {
        let moved = self.sort.move_image(from_index, to_index).await?;
        self.sync_selection();
        Ok(moved)
    }

    pub async fn reset_sort(&mut self) -> Result<(), AssetError> {
        self.sort.reset_sort().await?;
        self.sync_selection();
        Ok(())
    }

    pub fn current_sort(&self) -> Vec<String> {
        self.sort.current_sort()
    }

    pub fn has_custom_sort(&self) -> bool {
        self.sort.has_custom_sort()
    }

    pub fn start_drag(&mut self, index: usize) {
        self.sort.start_drag(index);
    }

    pub fn handle_drag_move(&self, over_index: Option<usize>) {
        self.sort.handle_drag_move(over_index);
    }

    pub async fn end_drag(&mut self, drop_index: Option<usize>) -> Result<bool, AssetError> {
        let moved = self.sort.end_drag(drop_index).await;
        self.sync_selection();
        moved
    }

    pub fn drag_state(&self) -> DragState {
        self.sort.drag_state()
    }

    // ========== Upload ==========

    pub async fn add_files(&self, files: Vec<PendingFile>) -> Result<Option<UploadSummary>, AssetError> {
        self.upload.add_files(files).await
    }

    pub fn cancel_upload(&self) -> usize {
        self.upload.cancel_upload()
    }

    pub fn queue_status(&self) -> QueueStatus {
        self.upload.queue_status()
    }

    // ========== Delete ==========

    pub async fn delete_file(&self, name: &str) -> Result<bool, AssetError> {
        self.delete.delete_file(name).await
    }

    pub async fn delete_files(&self, names: &[String]) -> Result<DeleteSummary, AssetError> {
        self.delete.delete_files(names).await
    }

    pub async fn delete_file_with_confirm(&self, name: &str) -> Result<bool, AssetError> {
        self.delete.delete_file_with_confirm(name).await
    }

    pub async fn delete_files_with_confirm(&self, names: &[String]) -> Result<DeleteSummary, AssetError> {
        self.delete.delete_files_with_confirm(names).await
    }

    /// Delete the current selection, after confirmation
    pub async fn delete_selected(&self) -> Result<DeleteSummary, AssetError> {
        let names = self.selection.selected_images();
        self.delete.delete_files_with_confirm(&names).await
    }

    pub async fn clear_all_images(&self) -> Result<DeleteSummary, AssetError> {
        self.delete.clear_all_images().await
    }

    pub fn cancel_delete(&self) -> usize {
        self.delete.cancel_delete()
    }

    pub fn delete_status(&self) -> DeleteStatus {
        self.delete.delete_status()
    }
}
