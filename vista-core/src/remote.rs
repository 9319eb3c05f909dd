//! Interface to the remote media catalog.
//!
//! The engine only consumes this narrow request/response surface. HTTP
//! bindings live in `vista-search`.

use async_trait::async_trait;

use crate::errors::CatalogError;
use crate::media::{Photo, Video};

/// Page size used when callers do not override it.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// One page of raw catalog results.
#[derive(Debug, Clone, PartialEq)]
pub struct RemotePage<T> {
    pub items: Vec<T>,
    /// Total matches reported by the catalog for the whole query
    pub total_results: u64,
}

impl<T> RemotePage<T> {
    pub fn new(items: Vec<T>, total_results: u64) -> Self {
        Self {
            items,
            total_results,
        }
    }
}

/// Stateless fetcher for catalog pages and single items.
///
/// Pages are 1-based. Implementations must not cache or retry; the paging
/// layer decides when to reissue a request.
#[async_trait]
pub trait RemoteSource: Send + Sync + std::fmt::Debug {
    /// Fetches a page of curated photos.
    ///
    /// # Errors
    /// - `CatalogError::Transport` - Connectivity issues or timeout
    /// - `CatalogError::Server` - Non-success status from the catalog
    /// - `CatalogError::Decode` - Malformed payload
    async fn fetch_curated_photos(
        &self,
        page: u32,
        per_page: u32,
    ) -> Result<RemotePage<Photo>, CatalogError>;

    /// Fetches a page of photos matching `query`.
    ///
    /// # Errors
    /// - `CatalogError::Transport` - Connectivity issues or timeout
    /// - `CatalogError::Server` - Non-success status from the catalog
    /// - `CatalogError::Decode` - Malformed payload
    async fn search_photos(
        &self,
        query: &str,
        page: u32,
        per_page: u32,
    ) -> Result<RemotePage<Photo>, CatalogError>;

    /// Fetches a page of popular videos.
    ///
    /// # Errors
    /// - `CatalogError::Transport` - Connectivity issues or timeout
    /// - `CatalogError::Server` - Non-success status from the catalog
    /// - `CatalogError::Decode` - Malformed payload
    async fn fetch_curated_videos(
        &self,
        page: u32,
        per_page: u32,
    ) -> Result<RemotePage<Video>, CatalogError>;

    /// Fetches a page of videos matching `query`.
    ///
    /// # Errors
    /// - `CatalogError::Transport` - Connectivity issues or timeout
    /// - `CatalogError::Server` - Non-success status from the catalog
    /// - `CatalogError::Decode` - Malformed payload
    async fn search_videos(
        &self,
        query: &str,
        page: u32,
        per_page: u32,
    ) -> Result<RemotePage<Video>, CatalogError>;

    /// Looks up a single photo.
    ///
    /// # Errors
    /// - `CatalogError::NotFound` - No photo with this id
    /// - `CatalogError::Transport` - Connectivity issues or timeout
    async fn get_photo_by_id(&self, id: u64) -> Result<Photo, CatalogError>;

    /// Looks up a single video.
    ///
    /// # Errors
    /// - `CatalogError::NotFound` - No video with this id
    /// - `CatalogError::Transport` - Connectivity issues or timeout
    async fn get_video_by_id(&self, id: u64) -> Result<Video, CatalogError>;
}
