//! Feed adapters that route a query to the matching catalog endpoint.

use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::CatalogError;
use crate::media::{MediaItem, MediaKind};
use crate::query::{Query, QueryMode};
use crate::remote::{RemotePage, RemoteSource};

/// Source of raw pages for one content kind.
///
/// Implementations pick the curated or search endpoint from the query and
/// know nothing about cursors beyond the page number.
#[async_trait]
pub trait PageSource: Send + Sync + std::fmt::Debug {
    /// Item type delivered in pages.
    type Item: Clone + Send + Sync + 'static;

    /// Content kind this source serves, used for log context.
    fn kind(&self) -> MediaKind;

    /// Fetches one page for `query`.
    ///
    /// # Errors
    /// - `CatalogError::Transport` - Connectivity issues or timeout
    /// - `CatalogError::Server` - Non-success status from the catalog
    /// - `CatalogError::Decode` - Malformed payload
    async fn fetch_page(
        &self,
        query: &Query,
        page: u32,
        per_page: u32,
    ) -> Result<RemotePage<Self::Item>, CatalogError>;
}

/// Photo feed over a remote catalog.
#[derive(Debug, Clone)]
pub struct PhotoFeed {
    source: Arc<dyn RemoteSource>,
}

impl PhotoFeed {
    pub fn new(source: Arc<dyn RemoteSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl PageSource for PhotoFeed {
    type Item = MediaItem;

    fn kind(&self) -> MediaKind {
        MediaKind::Photo
    }

    async fn fetch_page(
        &self,
        query: &Query,
        page: u32,
        per_page: u32,
    ) -> Result<RemotePage<MediaItem>, CatalogError> {
        let remote = match query.mode() {
            QueryMode::Curated => self.source.fetch_curated_photos(page, per_page).await?,
            QueryMode::Search => {
                self.source
                    .search_photos(query.text(), page, per_page)
                    .await?
            }
        };
        Ok(RemotePage::new(
            remote.items.into_iter().map(MediaItem::Photo).collect(),
            remote.total_results,
        ))
    }
}

/// Video feed over a remote catalog.
#[derive(Debug, Clone)]
pub struct VideoFeed {
    source: Arc<dyn RemoteSource>,
}

impl VideoFeed {
    pub fn new(source: Arc<dyn RemoteSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl PageSource for VideoFeed {
    type Item = MediaItem;

    fn kind(&self) -> MediaKind {
        MediaKind::Video
    }

    async fn fetch_page(
        &self,
        query: &Query,
        page: u32,
        per_page: u32,
    ) -> Result<RemotePage<MediaItem>, CatalogError> {
        let remote = match query.mode() {
            QueryMode::Curated => self.source.fetch_curated_videos(page, per_page).await?,
            QueryMode::Search => {
                self.source
                    .search_videos(query.text(), page, per_page)
                    .await?
            }
        };
        Ok(RemotePage::new(
            remote.items.into_iter().map(MediaItem::Video).collect(),
            remote.total_results,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{RemoteCall, ScriptedRemote};

    #[tokio::test]
    async fn test_photo_feed_routes_by_mode() {
        let remote = Arc::new(ScriptedRemote::with_photo_count(3));
        let feed = PhotoFeed::new(remote.clone());

        let curated = feed.fetch_page(&Query::curated(), 1, 20).await.unwrap();
        assert_eq!(curated.items.len(), 3);
        assert!(matches!(curated.items[0], MediaItem::Photo(_)));

        feed.fetch_page(&Query::search("cats"), 2, 10).await.unwrap();

        assert_eq!(
            remote.calls(),
            vec![
                RemoteCall::CuratedPhotos { page: 1, per_page: 20 },
                RemoteCall::SearchPhotos {
                    query: "cats".to_string(),
                    page: 2,
                    per_page: 10
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_video_feed_routes_by_mode() {
        let remote = Arc::new(ScriptedRemote::with_video_count(2));
        let feed = VideoFeed::new(remote.clone());

        let page = feed.fetch_page(&Query::search("sea"), 1, 20).await.unwrap();
        assert_eq!(page.items.len(), 2);
        assert!(matches!(page.items[0], MediaItem::Video(_)));

        // blank search text never reaches the search endpoint
        feed.fetch_page(&Query::search("  "), 1, 20).await.unwrap();

        assert_eq!(
            remote.calls(),
            vec![
                RemoteCall::SearchVideos {
                    query: "sea".to_string(),
                    page: 1,
                    per_page: 20
                },
                RemoteCall::CuratedVideos { page: 1, per_page: 20 },
            ]
        );
    }
}
