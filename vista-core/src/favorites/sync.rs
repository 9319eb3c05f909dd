//! Favoriting of catalog items on top of a [`FavoritesStore`].

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::StreamExt;
use futures::stream::BoxStream;

use super::{FavoriteRecord, FavoritesStore};
use crate::errors::StoreError;
use crate::media::{MediaItem, MediaKind, Photo, Video};

const UNTITLED: &str = "Untitled";
const UNKNOWN_CREATOR: &str = "Unknown Creator";

/// Which favorites a listing shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum FavoriteFilter {
    #[default]
    All,
    Photos,
    Videos,
}

impl FavoriteFilter {
    /// Kind the filter keeps, `None` for all kinds.
    pub fn kind(self) -> Option<MediaKind> {
        match self {
            FavoriteFilter::All => None,
            FavoriteFilter::Photos => Some(MediaKind::Photo),
            FavoriteFilter::Videos => Some(MediaKind::Video),
        }
    }
}

/// Reactive favorite state for catalog items.
#[derive(Debug, Clone)]
pub struct FavoriteSync {
    store: Arc<dyn FavoritesStore>,
}

impl FavoriteSync {
    pub fn new(store: Arc<dyn FavoritesStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn FavoritesStore> {
        &self.store
    }

    /// Whether `id` is favorited, now and after every change.
    pub fn is_favorite(&self, id: &str) -> BoxStream<'static, bool> {
        self.store.exists_by_id(id)
    }

    /// Favorites the item, replacing any existing record with the same id.
    ///
    /// # Errors
    /// - `StoreError` - Record could not be built or written
    pub async fn add(&self, item: &MediaItem) -> Result<(), StoreError> {
        let record = record_from_item(item, Utc::now())?;
        self.store.upsert(record).await
    }

    /// Flips the item's favorite state and returns the new state.
    ///
    /// Reads the current state, then adds or removes. Two concurrent toggles
    /// of the same id can both observe the same state; use
    /// [`FavoriteSync::toggle_atomic`] when that matters.
    ///
    /// # Errors
    /// - `StoreError` - Record could not be built or written
    pub async fn toggle(&self, item: &MediaItem) -> Result<bool, StoreError> {
        let id = item.favorite_key();
        let favorited = self
            .store
            .exists_by_id(&id)
            .next()
            .await
            .unwrap_or(false);

        if favorited {
            self.store.delete_by_id(&id).await?;
            tracing::info!(id = %id, kind = %item.kind(), "Removed favorite");
            Ok(false)
        } else {
            self.add(item).await?;
            tracing::info!(id = %id, kind = %item.kind(), "Added favorite");
            Ok(true)
        }
    }

    /// Flips the item's favorite state in one store operation.
    ///
    /// # Errors
    /// - `StoreError` - Record could not be built or written
    pub async fn toggle_atomic(&self, item: &MediaItem) -> Result<bool, StoreError> {
        let record = record_from_item(item, Utc::now())?;
        self.store.flip(record).await
    }

    /// All favorites, newest first.
    pub fn favorites(&self) -> BoxStream<'static, Vec<FavoriteRecord>> {
        self.store.list_all()
    }

    pub fn favorites_filtered(&self, filter: FavoriteFilter) -> BoxStream<'static, Vec<FavoriteRecord>> {
        match filter.kind() {
            Some(kind) => self.store.list_by_kind(kind),
            None => self.store.list_all(),
        }
    }

    pub fn favorites_count(&self) -> BoxStream<'static, usize> {
        self.store.count()
    }

    /// # Errors
    /// - `StoreError` - Backing storage rejected the write
    pub async fn remove(&self, id: &str) -> Result<(), StoreError> {
        self.store.delete_by_id(id).await
    }

    /// Records that the favorite was downloaded to `local_path`.
    ///
    /// # Errors
    /// - `StoreError` - Backing storage rejected the write
    pub async fn mark_downloaded(
        &self,
        id: &str,
        local_path: impl Into<String>,
    ) -> Result<(), StoreError> {
        self.store
            .update_download_status(id, true, Some(local_path.into()))
            .await
    }
}

/// Builds the favorite record stored for `item`.
///
/// # Errors
/// - `StoreError::Serialization` - Video renditions could not be encoded
pub fn record_from_item(
    item: &MediaItem,
    added_at: DateTime<Utc>,
) -> Result<FavoriteRecord, StoreError> {
    match item {
        MediaItem::Photo(photo) => Ok(photo_record(photo, added_at)),
        MediaItem::Video(video) => video_record(video, added_at),
    }
}

fn photo_record(photo: &Photo, added_at: DateTime<Utc>) -> FavoriteRecord {
    let title = photo
        .alt
        .as_deref()
        .map(str::trim)
        .filter(|alt| !alt.is_empty())
        .unwrap_or(UNTITLED);

    FavoriteRecord {
        id: photo.id.to_string(),
        kind: MediaKind::Photo,
        title: title.to_string(),
        creator: photo.creator_name.clone(),
        preview_url: photo.preview_url.clone(),
        original_url: photo.original_url.clone(),
        width: photo.width,
        height: photo.height,
        duration_seconds: None,
        avg_color: Some(photo.avg_color.clone()),
        serialized_variants: None,
        added_at,
        downloaded: false,
        local_path: None,
    }
}

fn video_record(video: &Video, added_at: DateTime<Utc>) -> Result<FavoriteRecord, StoreError> {
    let creator = match video.creator_name.trim() {
        "" => UNKNOWN_CREATOR,
        name => name,
    };

    Ok(FavoriteRecord {
        id: video.id.to_string(),
        kind: MediaKind::Video,
        title: format!("Video by {creator}"),
        creator: creator.to_string(),
        preview_url: video.preview_url.clone(),
        original_url: video.original_url().to_string(),
        width: video.width,
        height: video.height,
        duration_seconds: Some(video.duration_seconds),
        avg_color: None,
        serialized_variants: Some(serde_json::to_string(&video.variants)?),
        added_at,
        downloaded: false,
        local_path: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::favorites::MemoryFavoritesStore;
    use crate::test_fixtures::{fixed_time, sample_photo, sample_video};

    fn sync() -> FavoriteSync {
        FavoriteSync::new(Arc::new(MemoryFavoritesStore::new()))
    }

    #[test]
    fn test_photo_title_falls_back_to_untitled() {
        let mut photo = sample_photo(1, "Ann");
        photo.alt = Some("   ".to_string());
        let record = record_from_item(&photo.clone().into(), fixed_time(0)).unwrap();
        assert_eq!(record.title, "Untitled");

        photo.alt = None;
        let record = record_from_item(&photo.into(), fixed_time(0)).unwrap();
        assert_eq!(record.title, "Untitled");
        assert_eq!(record.avg_color.as_deref(), Some("#5A6B7C"));
        assert_eq!(record.kind, MediaKind::Photo);
    }

    #[test]
    fn test_video_record_uses_hd_variant() {
        let video = sample_video(9, "Bo");
        let record = record_from_item(&video.into(), fixed_time(0)).unwrap();

        assert_eq!(record.title, "Video by Bo");
        assert_eq!(record.original_url, "https://videos.example/9/hd.mp4");
        assert_eq!(record.duration_seconds, Some(15));
        assert_eq!(record.variants().unwrap().len(), 2);
    }

    #[test]
    fn test_video_without_creator() {
        let video = sample_video(9, " ");
        let record = record_from_item(&video.into(), fixed_time(0)).unwrap();
        assert_eq!(record.title, "Video by Unknown Creator");
        assert_eq!(record.creator, "Unknown Creator");
    }

    #[tokio::test]
    async fn test_toggle_round_trip() {
        let sync = sync();
        let item: MediaItem = sample_photo(3, "Cy").into();
        let mut status = sync.is_favorite("3");
        assert_eq!(status.next().await, Some(false));

        assert!(sync.toggle(&item).await.unwrap());
        assert_eq!(status.next().await, Some(true));

        assert!(!sync.toggle(&item).await.unwrap());
        assert_eq!(status.next().await, Some(false));
        assert!(sync.store().get_by_id("3").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_toggle_atomic_round_trip() {
        let sync = sync();
        let item: MediaItem = sample_video(4, "Di").into();

        assert!(sync.toggle_atomic(&item).await.unwrap());
        assert_eq!(sync.favorites_count().next().await, Some(1));
        assert!(!sync.toggle_atomic(&item).await.unwrap());
        assert_eq!(sync.favorites_count().next().await, Some(0));
    }

    #[tokio::test]
    async fn test_filtered_favorites() {
        let sync = sync();
        sync.add(&sample_photo(1, "A").into()).await.unwrap();
        sync.add(&sample_video(2, "B").into()).await.unwrap();

        let videos = sync
            .favorites_filtered(FavoriteFilter::Videos)
            .next()
            .await
            .unwrap();
        assert_eq!(videos.len(), 1);
        assert_eq!(videos[0].id, "2");

        let all = sync
            .favorites_filtered(FavoriteFilter::All)
            .next()
            .await
            .unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_mark_downloaded_and_remove() {
        let sync = sync();
        sync.add(&sample_photo(1, "A").into()).await.unwrap();

        sync.mark_downloaded("1", "/downloads/1.jpg").await.unwrap();
        let record = sync.store().get_by_id("1").await.unwrap().unwrap();
        assert!(record.downloaded);

        sync.remove("1").await.unwrap();
        assert_eq!(sync.favorites().next().await, Some(Vec::new()));
    }
}
