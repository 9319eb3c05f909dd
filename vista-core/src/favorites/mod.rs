//! Persistent favorites with reactive membership views.
//!
//! A [`FavoritesStore`] keeps at most one [`FavoriteRecord`] per id and
//! exposes its contents as streams that replay the current value and re-emit
//! whenever the projected value changes. [`FavoriteSync`] maps catalog items
//! into records and implements toggling on top of any store.

pub mod file_store;
pub mod memory;
pub mod sync;
mod table;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};

pub use file_store::FileFavoritesStore;
pub use memory::MemoryFavoritesStore;
pub use sync::{FavoriteFilter, FavoriteSync, record_from_item};

use crate::errors::StoreError;
use crate::media::{MediaKind, VideoVariant};

/// Denormalized copy of a favorited item.
///
/// Ids share one key space across kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteRecord {
    pub id: String,
    pub kind: MediaKind,
    pub title: String,
    pub creator: String,
    pub preview_url: String,
    pub original_url: String,
    pub width: u32,
    pub height: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_color: Option<String>,
    /// JSON array of the video's renditions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serialized_variants: Option<String>,
    pub added_at: DateTime<Utc>,
    #[serde(default)]
    pub downloaded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_path: Option<String>,
}

impl FavoriteRecord {
    /// Decodes the stored video renditions. Photos have none.
    ///
    /// # Errors
    /// - `StoreError::Serialization` - Stored variant JSON is malformed
    pub fn variants(&self) -> Result<Vec<VideoVariant>, StoreError> {
        match &self.serialized_variants {
            Some(json) => Ok(serde_json::from_str(json)?),
            None => Ok(Vec::new()),
        }
    }
}

/// Durable keyed store of favorite records.
///
/// Every mutation is visible to all open streams before it returns. Streams
/// start with the current value, only emit when their projection changes, and
/// are independent of each other.
#[async_trait]
pub trait FavoritesStore: Send + Sync + std::fmt::Debug {
    /// Inserts the record, fully replacing any record with the same id.
    ///
    /// # Errors
    /// - `StoreError` - Backing storage rejected the write
    async fn upsert(&self, record: FavoriteRecord) -> Result<(), StoreError>;

    /// Removes the record with `id`. Removing an unknown id is a no-op.
    ///
    /// # Errors
    /// - `StoreError` - Backing storage rejected the write
    async fn delete_by_id(&self, id: &str) -> Result<(), StoreError>;

    /// Point lookup of one record.
    ///
    /// # Errors
    /// - `StoreError` - Backing storage could not be read
    async fn get_by_id(&self, id: &str) -> Result<Option<FavoriteRecord>, StoreError>;

    /// Whether a record with `id` exists, now and after every change.
    fn exists_by_id(&self, id: &str) -> BoxStream<'static, bool>;

    /// All records, most recently added first.
    fn list_all(&self) -> BoxStream<'static, Vec<FavoriteRecord>>;

    /// Records of one kind, most recently added first.
    fn list_by_kind(&self, kind: MediaKind) -> BoxStream<'static, Vec<FavoriteRecord>>;

    /// Number of records.
    fn count(&self) -> BoxStream<'static, usize>;

    /// Sets download state of an existing record. Unknown ids are ignored.
    ///
    /// # Errors
    /// - `StoreError` - Backing storage rejected the write
    async fn update_download_status(
        &self,
        id: &str,
        downloaded: bool,
        local_path: Option<String>,
    ) -> Result<(), StoreError>;

    /// Removes the record's id if present, otherwise inserts the record, as
    /// one step. Returns whether the id is favorited afterwards.
    ///
    /// # Errors
    /// - `StoreError` - Backing storage rejected the write
    async fn flip(&self, record: FavoriteRecord) -> Result<bool, StoreError>;
}
