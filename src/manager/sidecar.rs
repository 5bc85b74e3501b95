//! The `image_sort.json` sidecar kept inside each target folder
//!
//! ```json
//! { "version": "1.0", "lastUpdated": "2024-05-01T08:30:00Z", "order": ["1.jpg", "2.mp4"] }
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::SortFileError;
use crate::store::FileStore;

pub const SORT_FILE_VERSION: &str = "1.0";

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct SortConfig<'a> {
    version: &'static str,
    last_updated: DateTime<Utc>,
    order: &'a [String],
}

/// Reads and writes a folder's sort sidecar through the file store
#[derive(Clone)]
pub struct SortSidecar {
    store: Arc<dyn FileStore>,
    file_name: String,
}

impl SortSidecar {
    pub fn new(store: Arc<dyn FileStore>, file_name: impl Into<String>) -> Self {
        Self {
            store,
            file_name: file_name.into(),
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn path(&self, folder: &Path) -> PathBuf {
        folder.join(&self.file_name)
    }

    /// Load the order, degrading to empty on any problem
    pub async fn load(&self, folder: &Path) -> Vec<String> {
        match self.read(folder).await {
            Ok(order) => {
                tracing::debug!("loaded sort order ({} entries) for {}", order.len(), folder.display());
                order
            }
            Err(SortFileError::Read(e)) if e.is_not_found() => {
                tracing::debug!("no sort file in {}, using natural order", folder.display());
                Vec::new()
            }
            Err(e) => {
                tracing::warn!("ignoring sort file in {}: {}", folder.display(), e);
                Vec::new()
            }
        }
    }

    pub(crate) async fn read(&self, folder: &Path) -> Result<Vec<String>, SortFileError> {
        let bytes = self.store.read(&self.path(folder)).await?;
        parse_order(&bytes)
    }

    /// Persist `order`; false (and a warning) if the write failed
    pub async fn save(&self, folder: &Path, order: &[String]) -> bool {
        let config = SortConfig {
            version: SORT_FILE_VERSION,
            last_updated: Utc::now(),
            order,
        };

        let json = match serde_json::to_vec_pretty(&config) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!("failed to encode sort order: {}", e);
                return false;
            }
        };

        match self.store.write(&self.path(folder), &json).await {
            Ok(()) => {
                tracing::debug!("saved sort order ({} entries) for {}", order.len(), folder.display());
                true
            }
            Err(e) => {
                tracing::warn!("failed to save sort order: {}", e);
                false
            }
        }
    }
}

/// Extract `order` from sidecar bytes; non-string entries are dropped
fn parse_order(bytes: &[u8]) -> Result<Vec<String>, SortFileError> {
    let value: serde_json::Value = serde_json::from_slice(bytes)?;
    let order = value
        .get("order")
        .and_then(|o| o.as_array())
        .ok_or(SortFileError::Schema)?;

    Ok(order
        .iter()
        .filter_map(|name| name.as_str().map(str::to_string))
        .collect())
}
