//! Media model
//!
//! - File classification by extension (kind.rs)
//! - Folder and file data structures (data.rs)

pub mod data;
pub mod kind;

pub use data::{is_plain_file_name, FileEntry, MediaFile, TargetFolder};
pub use kind::{classify, MediaKind};
