//! In-memory favorites store.

use async_trait::async_trait;
use futures::stream::BoxStream;

use super::table::{RecordMap, RecordTable, apply};
use super::{FavoriteRecord, FavoritesStore};
use crate::errors::StoreError;
use crate::media::MediaKind;

/// Favorites kept only for the lifetime of the process.
///
/// Mutations never fail; they are serialized by the underlying watch channel.
#[derive(Debug)]
pub struct MemoryFavoritesStore {
    table: RecordTable,
}

impl MemoryFavoritesStore {
    pub fn new() -> Self {
        Self {
            table: RecordTable::new(RecordMap::new()),
        }
    }

    /// Store preloaded with `records`; later duplicates replace earlier ones.
    pub fn with_records(records: impl IntoIterator<Item = FavoriteRecord>) -> Self {
        let records = records
            .into_iter()
            .map(|record| (record.id.clone(), record))
            .collect();
        Self {
            table: RecordTable::new(records),
        }
    }

    /// Number of records right now.
    pub fn len(&self) -> usize {
        self.table.current().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryFavoritesStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FavoritesStore for MemoryFavoritesStore {
    async fn upsert(&self, record: FavoriteRecord) -> Result<(), StoreError> {
        tracing::debug!(id = %record.id, kind = %record.kind, "Upserting favorite");
        self.table.edit(|records| apply::upsert(records, record));
        Ok(())
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), StoreError> {
        tracing::debug!(id, "Deleting favorite");
        self.table.edit(|records| apply::delete(records, id));
        Ok(())
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<FavoriteRecord>, StoreError> {
        Ok(self.table.get(id))
    }

    fn exists_by_id(&self, id: &str) -> BoxStream<'static, bool> {
        self.table.exists(id)
    }

    fn list_all(&self) -> BoxStream<'static, Vec<FavoriteRecord>> {
        self.table.list(None)
    }

    fn list_by_kind(&self, kind: MediaKind) -> BoxStream<'static, Vec<FavoriteRecord>> {
        self.table.list(Some(kind))
    }

    fn count(&self) -> BoxStream<'static, usize> {
        self.table.count()
    }

    async fn update_download_status(
        &self,
        id: &str,
        downloaded: bool,
        local_path: Option<String>,
    ) -> Result<(), StoreError> {
        self.table
            .edit(|records| apply::download_status(records, id, downloaded, local_path));
        Ok(())
    }

    async fn flip(&self, record: FavoriteRecord) -> Result<bool, StoreError> {
        let id = record.id.clone();
        let favorited = self.table.edit(|records| apply::flip(records, record));
        tracing::debug!(id = %id, favorited, "Flipped favorite");
        Ok(favorited)
    }
}

#[cfg(test)]
mod tests {
    use futures::StreamExt;

    use super::*;
    use crate::test_fixtures::sample_record;

    #[tokio::test]
    async fn test_upsert_replaces_by_id() {
        let store = MemoryFavoritesStore::new();
        store
            .upsert(sample_record("1", MediaKind::Photo, 0))
            .await
            .unwrap();

        let mut replacement = sample_record("1", MediaKind::Photo, 5);
        replacement.title = "Renamed".to_string();
        store.upsert(replacement).await.unwrap();

        let all = store.list_all().next().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].title, "Renamed");
    }

    #[tokio::test]
    async fn test_exists_stream_follows_mutations() {
        let store = MemoryFavoritesStore::new();
        let mut exists = store.exists_by_id("42");

        assert_eq!(exists.next().await, Some(false));

        store
            .upsert(sample_record("42", MediaKind::Photo, 0))
            .await
            .unwrap();
        assert_eq!(exists.next().await, Some(true));

        store.delete_by_id("42").await.unwrap();
        assert_eq!(exists.next().await, Some(false));
    }

    #[tokio::test]
    async fn test_unrelated_changes_do_not_reemit_membership() {
        let store = MemoryFavoritesStore::new();
        let mut exists = store.exists_by_id("1");
        assert_eq!(exists.next().await, Some(false));

        store
            .upsert(sample_record("2", MediaKind::Photo, 0))
            .await
            .unwrap();
        store
            .upsert(sample_record("1", MediaKind::Photo, 1))
            .await
            .unwrap();

        // the change for id 2 is skipped, the next emission is id 1 appearing
        assert_eq!(exists.next().await, Some(true));
    }

    #[tokio::test]
    async fn test_list_by_kind_and_count() {
        let store = MemoryFavoritesStore::with_records([
            sample_record("p1", MediaKind::Photo, 0),
            sample_record("v1", MediaKind::Video, 1),
            sample_record("p2", MediaKind::Photo, 2),
        ]);

        let photos = store.list_by_kind(MediaKind::Photo).next().await.unwrap();
        let ids: Vec<&str> = photos.iter().map(|record| record.id.as_str()).collect();
        assert_eq!(ids, vec!["p2", "p1"]);
        assert_eq!(store.count().next().await, Some(3));
    }

    #[tokio::test]
    async fn test_update_download_status() {
        let store = MemoryFavoritesStore::with_records([sample_record("1", MediaKind::Photo, 0)]);

        store
            .update_download_status("1", true, Some("/tmp/1.jpg".to_string()))
            .await
            .unwrap();
        store
            .update_download_status("unknown", true, None)
            .await
            .unwrap();

        let record = store.get_by_id("1").await.unwrap().unwrap();
        assert!(record.downloaded);
        assert_eq!(record.local_path.as_deref(), Some("/tmp/1.jpg"));
        assert_eq!(store.len(), 1);
        assert!(store.get_by_id("unknown").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_dropping_one_subscription_keeps_others() {
        let store = MemoryFavoritesStore::new();
        let first = store.count();
        let mut second = store.count();
        assert_eq!(second.next().await, Some(0));

        drop(first);
        store
            .upsert(sample_record("1", MediaKind::Video, 0))
            .await
            .unwrap();
        assert_eq!(second.next().await, Some(1));
    }
}
