//! Image asset management for locally stored product folders.
//!
//! One [`ImageController`] manages the images and videos of the active
//! folder: a persisted custom display order (`image_sort.json`), a
//! multi-select selection, a FIFO upload queue and batch deletion behind a
//! confirmation prompt. Every change is announced on a typed event bus.

pub mod config;
pub mod confirm;
pub mod controller;
pub mod error;
pub mod events;
pub mod manager;
pub mod media;
pub mod store;

pub use config::Config;
pub use confirm::{AutoConfirm, Confirmer, DialogConfirm};
pub use controller::ImageController;
pub use error::{AssetError, ConfigError, StoreError};
pub use events::{EventBus, EventKind, ImageEvent, ListenerId};
pub use manager::delete::{DeleteStatus, DeleteSummary};
pub use manager::selection::{Modifiers, SelectionMode};
pub use manager::sort::DragState;
pub use manager::upload::{Payload, PendingFile, QueueStatus, UploadSummary};
pub use media::{classify, FileEntry, MediaFile, MediaKind, TargetFolder};
pub use store::{FileStore, LocalStore, NoopReloader, ViewReloader};
