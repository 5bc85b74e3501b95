//! Persisted display order and drag reordering

use std::path::Path;

use super::order::{apply_sort_order, materialize, move_item, swap_items};
use super::sidecar::SortSidecar;
use super::{ManagerBase, SharedOrder};
use crate::error::AssetError;
use crate::events::{EventBus, ImageEvent};
use crate::media::{MediaFile, TargetFolder};

/// Transient state of an in-progress drag
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DragState {
    pub is_dragging: bool,
    pub dragged_index: Option<usize>,
    pub drop_index: Option<usize>,
}

#[derive(Debug, Clone, Copy)]
enum Reorder {
    Move,
    Swap,
}

/// Owns the custom order of the active folder.
///
/// Reorder indices address the display list (the files after
/// [`SortManager::apply_sort_order`]). Memory is updated first, then the
/// sidecar is written; a failed write is logged and the new order is kept.
pub struct SortManager {
    base: ManagerBase,
    sidecar: SortSidecar,
    order: SharedOrder,
    drag: DragState,
}

impl SortManager {
    pub fn new(events: EventBus, sidecar: SortSidecar, order: SharedOrder) -> Self {
        Self {
            base: ManagerBase::new(events),
            sidecar,
            order,
            drag: DragState::default(),
        }
    }

    /// New folder: forget the previous order until the sidecar is loaded
    pub fn set_current_item(&mut self, folder: Option<TargetFolder>) {
        self.base.set_folder(folder);
        self.order.replace(Vec::new());
        self.drag = DragState::default();
    }

    /// Files in natural (listing) order
    pub fn update_image_files(&mut self, files: Vec<MediaFile>) {
        self.base.set_files(files);
    }

    /// Read the folder's sidecar and adopt it; empty if it is missing or unusable
    pub async fn load_sort_config(&self, folder: &Path) -> Vec<String> {
        let _writer = self.order.writer().await;
        let order = self.sidecar.load(folder).await;
        self.order.replace(order.clone());
        order
    }

    pub async fn save_sort_config(&self, folder: &Path, order: &[String]) -> bool {
        self.sidecar.save(folder, order).await
    }

    pub fn apply_sort_order(&self, files: &[MediaFile]) -> Vec<MediaFile> {
        apply_sort_order(files, &self.order.snapshot())
    }

    /// The current files in display order
    pub fn sorted_files(&self) -> Vec<MediaFile> {
        self.apply_sort_order(self.base.files())
    }

    pub async fn handle_drag_sort(&self, from_index: usize, to_index: usize) -> Result<bool, AssetError> {
        self.reorder(from_index, to_index, Reorder::Move).await
    }

    pub async fn swap_images(&self, index_a: usize, index_b: usize) -> Result<bool, AssetError> {
        self.reorder(index_a, index_b, Reorder::Swap).await
    }

    pub async fn move_image(&self, from_index: usize, to_index: usize) -> Result<bool, AssetError> {
        self.reorder(from_index, to_index, Reorder::Move).await
    }

    /// Discard the custom arrangement in favour of the natural order
    pub async fn reset_sort(&self) -> Result<(), AssetError> {
        let folder = self.base.require_folder()?;
        let _writer = self.order.writer().await;

        let natural: Vec<String> = self.base.files().iter().map(|f| f.name.clone()).collect();
        self.order.replace(natural.clone());
        self.save_sort_config(&folder.path, &natural).await;

        tracing::info!("reset sort order for {}", folder.name);
        self.base.emit(ImageEvent::SortChanged {
            from_index: None,
            to_index: None,
            new_order: natural,
        });
        Ok(())
    }

    pub fn current_sort(&self) -> Vec<String> {
        self.order.snapshot()
    }

    pub fn has_custom_sort(&self) -> bool {
        !self.order.is_empty()
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    pub fn start_drag(&mut self, index: usize) {
        self.drag = DragState {
            is_dragging: true,
            dragged_index: Some(index),
            drop_index: None,
        };
        self.base.emit(ImageEvent::DragStarted { index });
    }

    /// Hook for live drag feedback; does not change any state
    pub fn handle_drag_move(&self, over_index: Option<usize>) {
        if self.drag.is_dragging {
            tracing::trace!(dragged = ?self.drag.dragged_index, over = ?over_index, "drag move");
        }
    }

    /// Finish a drag, moving the dragged file to `drop_index` if given.
    /// Returns whether the order changed.
    pub async fn end_drag(&mut self, drop_index: Option<usize>) -> Result<bool, AssetError> {
        if !self.drag.is_dragging {
            return Ok(false);
        }
        self.drag.drop_index = drop_index;
        let state = std::mem::take(&mut self.drag);

        let moved = match (state.dragged_index, state.drop_index) {
            (Some(from), Some(to)) => self.handle_drag_sort(from, to).await,
            _ => Ok(false),
        };

        self.base.emit(ImageEvent::DragEnded {
            dragged_index: state.dragged_index,
            drop_index: state.drop_index,
        });
        moved
    }

    async fn reorder(&self, from_index: usize, to_index: usize, op: Reorder) -> Result<bool, AssetError> {
        let folder = self.base.require_folder()?;
        let _writer = self.order.writer().await;
        let files = self.base.files();

        let new_order = self.order.update(|order| {
            let display: Vec<String> = apply_sort_order(files, order)
                .into_iter()
                .map(|f| f.name)
                .collect();
            if from_index >= display.len() || to_index >= display.len() {
                return None;
            }

            let mut working = materialize(&display, order);
            let changed = match op {
                Reorder::Move => move_item(&mut working, from_index, to_index),
                Reorder::Swap => swap_items(&mut working, from_index, to_index),
            };
            if !changed {
                return None;
            }
            *order = working.clone();
            Some(working)
        });

        let Some(new_order) = new_order else {
            tracing::debug!("ignored reorder {:?} {} -> {}", op, from_index, to_index);
            return Ok(false);
        };

        self.save_sort_config(&folder.path, &new_order).await;
        self.base.emit(ImageEvent::SortChanged {
            from_index: Some(from_index),
            to_index: Some(to_index),
            new_order,
        });
        Ok(true)
    }
}
