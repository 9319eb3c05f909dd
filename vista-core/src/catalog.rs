//! Browsing session over the photo and video feeds.
//!
//! A session owns one router per feed, the selected tab and the search text.
//! Only the selected tab's feed streams; the other one is kept idle so a tab
//! switch never shows results of a query the user has since replaced.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;

use crate::VistaError;
use crate::config::PagingConfig;
use crate::errors::{CatalogError, StoreError};
use crate::favorites::FavoriteSync;
use crate::media::{MediaItem, Photo, Video};
use crate::paging::{Paginator, PhotoFeed, VideoFeed};
use crate::query::Query;
use crate::remote::RemoteSource;
use crate::router::QueryRouter;

/// Feed shown by a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Tab {
    #[default]
    Photos,
    Videos,
}

impl Tab {
    pub fn index(self) -> usize {
        match self {
            Tab::Photos => 0,
            Tab::Videos => 1,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Tab::Photos),
            1 => Some(Tab::Videos),
            _ => None,
        }
    }
}

/// Outcome of a single-item lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Loading,
    Success(T),
    Error { message: String },
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn success(&self) -> Option<&T> {
        match self {
            LoadState::Success(value) => Some(value),
            _ => None,
        }
    }
}

impl<T> From<Result<T, CatalogError>> for LoadState<T> {
    fn from(result: Result<T, CatalogError>) -> Self {
        match result {
            Ok(value) => LoadState::Success(value),
            Err(error) => LoadState::Error {
                message: VistaError::from(error).user_message(),
            },
        }
    }
}

#[derive(Debug, Default)]
struct Selection {
    tab: Tab,
    search_text: String,
}

/// Photo and video feeds plus favorites for one consumer.
#[derive(Debug)]
pub struct CatalogSession {
    remote: Arc<dyn RemoteSource>,
    favorites: FavoriteSync,
    photos: QueryRouter<PhotoFeed>,
    videos: QueryRouter<VideoFeed>,
    selection: Mutex<Selection>,
}

impl CatalogSession {
    /// Creates a session with both feeds idle. Call [`CatalogSession::start`]
    /// from within a runtime to begin streaming the selected tab.
    pub fn new(remote: Arc<dyn RemoteSource>, favorites: FavoriteSync, config: &PagingConfig) -> Self {
        let photos = QueryRouter::new(Paginator::new(PhotoFeed::new(Arc::clone(&remote))), config);
        let videos = QueryRouter::new(Paginator::new(VideoFeed::new(Arc::clone(&remote))), config);
        Self {
            remote,
            favorites,
            photos,
            videos,
            selection: Mutex::new(Selection::default()),
        }
    }

    pub fn photos(&self) -> &QueryRouter<PhotoFeed> {
        &self.photos
    }

    pub fn videos(&self) -> &QueryRouter<VideoFeed> {
        &self.videos
    }

    pub fn favorites(&self) -> &FavoriteSync {
        &self.favorites
    }

    pub fn selected_tab(&self) -> Tab {
        self.selection.lock().tab
    }

    pub fn search_text(&self) -> String {
        self.selection.lock().search_text.clone()
    }

    /// Streams the selected tab with the current search text.
    pub fn start(&self) {
        let selection = self.selection.lock();
        self.apply(&selection);
    }

    /// Replaces the search text. Blank text shows curated content.
    pub fn update_search_query(&self, text: impl Into<String>) {
        let mut selection = self.selection.lock();
        selection.search_text = text.into();
        self.apply(&selection);
    }

    pub fn clear_search(&self) {
        self.update_search_query(String::new());
    }

    /// Shows `tab`, idling the other feed.
    pub fn select_tab(&self, tab: Tab) {
        let mut selection = self.selection.lock();
        selection.tab = tab;
        self.apply(&selection);
    }

    /// Shows `tab` with `text` as its search text in a single restart.
    ///
    /// Equivalent to [`CatalogSession::select_tab`] followed by
    /// [`CatalogSession::update_search_query`] without streaming the
    /// intermediate query.
    pub fn browse(&self, tab: Tab, text: impl Into<String>) {
        let mut selection = self.selection.lock();
        selection.tab = tab;
        selection.search_text = text.into();
        self.apply(&selection);
    }

    /// Toggles the favorite state of a feed item.
    ///
    /// # Errors
    /// - `StoreError` - Favorite record could not be written
    pub async fn toggle_favorite(&self, item: &MediaItem) -> Result<bool, StoreError> {
        self.favorites.toggle(item).await
    }

    /// Looks up one photo.
    pub async fn photo_details(&self, id: u64) -> LoadState<Photo> {
        let result = self.remote.get_photo_by_id(id).await;
        log_lookup("photo", id, &result);
        result.into()
    }

    /// Looks up one video.
    pub async fn video_details(&self, id: u64) -> LoadState<Video> {
        let result = self.remote.get_video_by_id(id).await;
        log_lookup("video", id, &result);
        result.into()
    }

    /// Photo lookup published on a watch channel: `Loading`, then the outcome.
    pub fn watch_photo_details(&self, id: u64) -> watch::Receiver<LoadState<Photo>> {
        let (sender, receiver) = watch::channel(LoadState::Loading);
        let remote = Arc::clone(&self.remote);
        tokio::spawn(async move {
            let result = remote.get_photo_by_id(id).await;
            log_lookup("photo", id, &result);
            sender.send_replace(result.into());
        });
        receiver
    }

    /// Video lookup published on a watch channel: `Loading`, then the outcome.
    pub fn watch_video_details(&self, id: u64) -> watch::Receiver<LoadState<Video>> {
        let (sender, receiver) = watch::channel(LoadState::Loading);
        let remote = Arc::clone(&self.remote);
        tokio::spawn(async move {
            let result = remote.get_video_by_id(id).await;
            log_lookup("video", id, &result);
            sender.send_replace(result.into());
        });
        receiver
    }

    fn apply(&self, selection: &Selection) {
        let query = Query::from_text(&selection.search_text);
        tracing::debug!(tab = ?selection.tab, %query, "Applying catalog selection");
        match selection.tab {
            Tab::Photos => {
                self.videos.clear();
                self.photos.set_query(query);
            }
            Tab::Videos => {
                self.photos.clear();
                self.videos.set_query(query);
            }
        }
    }
}

fn log_lookup<T>(kind: &str, id: u64, result: &Result<T, CatalogError>) {
    match result {
        Ok(_) => tracing::debug!(kind, id, "Loaded details"),
        Err(error) => tracing::warn!(kind, id, error = %error, "Details lookup failed"),
    }
}
