//! Test fixtures for paging and favorites tests.
//!
//! `ScriptedRemote` serves canned catalog data, records every call, and can
//! fail or hold individual requests so tests control response ordering.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use parking_lot::Mutex;
use tokio::sync::Semaphore;

use crate::errors::CatalogError;
use crate::favorites::FavoriteRecord;
use crate::media::{MediaKind, Photo, Video, VideoVariant};
use crate::remote::{RemotePage, RemoteSource};

/// Creator name given to curated fixture items.
pub const CURATED_CREATOR: &str = "Curator";

/// Call received by a [`ScriptedRemote`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteCall {
    CuratedPhotos { page: u32, per_page: u32 },
    SearchPhotos { query: String, page: u32, per_page: u32 },
    CuratedVideos { page: u32, per_page: u32 },
    SearchVideos { query: String, page: u32, per_page: u32 },
    PhotoById { id: u64 },
    VideoById { id: u64 },
}

/// Remote catalog backed by in-memory lists.
#[derive(Debug, Default)]
pub struct ScriptedRemote {
    curated_photos: Vec<Photo>,
    curated_videos: Vec<Video>,
    photo_searches: HashMap<String, Vec<Photo>>,
    video_searches: HashMap<String, Vec<Video>>,
    calls: Mutex<Vec<RemoteCall>>,
    failures: Mutex<VecDeque<CatalogError>>,
    holds: Mutex<HashMap<(String, u32), Arc<Semaphore>>>,
}

impl ScriptedRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remote with `count` curated photos, ids starting at 1.
    pub fn with_photo_count(count: usize) -> Self {
        Self::new().curated_photos(count)
    }

    /// Remote with `count` curated videos, ids starting at 1.
    pub fn with_video_count(count: usize) -> Self {
        Self::new().curated_videos(count)
    }

    pub fn curated_photos(mut self, count: usize) -> Self {
        self.curated_photos = (1..=count as u64)
            .map(|id| sample_photo(id, CURATED_CREATOR))
            .collect();
        self
    }

    pub fn curated_videos(mut self, count: usize) -> Self {
        self.curated_videos = (1..=count as u64)
            .map(|id| sample_video(id, CURATED_CREATOR))
            .collect();
        self
    }

    /// Registers `count` photo results for `query`; their creator is the query.
    pub fn photo_search(mut self, query: &str, count: usize) -> Self {
        let base = 1_000 * (self.photo_searches.len() as u64 + 1);
        let photos = (1..=count as u64)
            .map(|offset| sample_photo(base + offset, query))
            .collect();
        self.photo_searches.insert(query.to_string(), photos);
        self
    }

    /// Registers `count` video results for `query`; their creator is the query.
    pub fn video_search(mut self, query: &str, count: usize) -> Self {
        let base = 1_000 * (self.video_searches.len() as u64 + 1);
        let videos = (1..=count as u64)
            .map(|offset| sample_video(base + offset, query))
            .collect();
        self.video_searches.insert(query.to_string(), videos);
        self
    }

    /// Makes the next call fail with `error`. Queued failures apply in order.
    pub fn fail_next(&self, error: CatalogError) {
        self.failures.lock().push_back(error);
    }

    /// Blocks requests for `page` of `query` until [`ScriptedRemote::release`].
    ///
    /// Curated requests use an empty query.
    pub fn hold(&self, query: &str, page: u32) {
        self.holds
            .lock()
            .insert((query.to_string(), page), Arc::new(Semaphore::new(0)));
    }

    /// Lets held requests for `page` of `query` complete.
    pub fn release(&self, query: &str, page: u32) {
        if let Some(gate) = self.holds.lock().get(&(query.to_string(), page)) {
            gate.add_permits(1024);
        }
    }

    pub fn calls(&self) -> Vec<RemoteCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    async fn enter(&self, call: RemoteCall, query: &str, page: u32) -> Result<(), CatalogError> {
        self.calls.lock().push(call);
        let gate = self.holds.lock().get(&(query.to_string(), page)).cloned();
        if let Some(gate) = gate {
            let _permit = gate.acquire().await;
        }
        match self.failures.lock().pop_front() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

fn slice_page<T: Clone>(items: &[T], page: u32, per_page: u32) -> RemotePage<T> {
    let start = (page.saturating_sub(1) as usize).saturating_mul(per_page as usize);
    let end = start.saturating_add(per_page as usize).min(items.len());
    let slice = if start >= items.len() {
        Vec::new()
    } else {
        items[start..end].to_vec()
    };
    RemotePage::new(slice, items.len() as u64)
}

#[async_trait]
impl RemoteSource for ScriptedRemote {
    async fn fetch_curated_photos(
        &self,
        page: u32,
        per_page: u32,
    ) -> Result<RemotePage<Photo>, CatalogError> {
        self.enter(RemoteCall::CuratedPhotos { page, per_page }, "", page)
            .await?;
        Ok(slice_page(&self.curated_photos, page, per_page))
    }

    async fn search_photos(
        &self,
        query: &str,
        page: u32,
        per_page: u32,
    ) -> Result<RemotePage<Photo>, CatalogError> {
        let call = RemoteCall::SearchPhotos {
            query: query.to_string(),
            page,
            per_page,
        };
        self.enter(call, query, page).await?;
        let results = self.photo_searches.get(query).map(Vec::as_slice).unwrap_or(&[]);
        Ok(slice_page(results, page, per_page))
    }

    async fn fetch_curated_videos(
        &self,
        page: u32,
        per_page: u32,
    ) -> Result<RemotePage<Video>, CatalogError> {
        self.enter(RemoteCall::CuratedVideos { page, per_page }, "", page)
            .await?;
        Ok(slice_page(&self.curated_videos, page, per_page))
    }

    async fn search_videos(
        &self,
        query: &str,
        page: u32,
        per_page: u32,
    ) -> Result<RemotePage<Video>, CatalogError> {
        let call = RemoteCall::SearchVideos {
            query: query.to_string(),
            page,
            per_page,
        };
        self.enter(call, query, page).await?;
        let results = self.video_searches.get(query).map(Vec::as_slice).unwrap_or(&[]);
        Ok(slice_page(results, page, per_page))
    }

    async fn get_photo_by_id(&self, id: u64) -> Result<Photo, CatalogError> {
        self.enter(RemoteCall::PhotoById { id }, "", 0).await?;
        self.curated_photos
            .iter()
            .chain(self.photo_searches.values().flatten())
            .find(|photo| photo.id == id)
            .cloned()
            .ok_or(CatalogError::NotFound {
                kind: MediaKind::Photo,
                id,
            })
    }

    async fn get_video_by_id(&self, id: u64) -> Result<Video, CatalogError> {
        self.enter(RemoteCall::VideoById { id }, "", 0).await?;
        self.curated_videos
            .iter()
            .chain(self.video_searches.values().flatten())
            .find(|video| video.id == id)
            .cloned()
            .ok_or(CatalogError::NotFound {
                kind: MediaKind::Video,
                id,
            })
    }
}

/// Photo with predictable urls derived from its id.
pub fn sample_photo(id: u64, creator: &str) -> Photo {
    Photo {
        id,
        preview_url: format!("https://images.example/photos/{id}/medium.jpg"),
        original_url: format!("https://images.example/photos/{id}/original.jpg"),
        width: 4000,
        height: 3000,
        creator_name: creator.to_string(),
        avg_color: "#5A6B7C".to_string(),
        alt: Some(format!("Photo {id}")),
    }
}

/// Video with an SD and an HD rendition.
pub fn sample_video(id: u64, creator: &str) -> Video {
    Video {
        id,
        preview_url: format!("https://images.example/videos/{id}/poster.jpg"),
        width: 1920,
        height: 1080,
        creator_name: creator.to_string(),
        duration_seconds: 15,
        variants: vec![
            VideoVariant {
                quality: "sd".to_string(),
                width: Some(640),
                height: Some(360),
                link: format!("https://videos.example/{id}/sd.mp4"),
            },
            VideoVariant {
                quality: "hd".to_string(),
                width: Some(1920),
                height: Some(1080),
                link: format!("https://videos.example/{id}/hd.mp4"),
            },
        ],
    }
}

/// Photo favorite record added at `minute` past a fixed epoch.
pub fn sample_record(id: &str, kind: MediaKind, minute: u32) -> FavoriteRecord {
    FavoriteRecord {
        id: id.to_string(),
        kind,
        title: format!("Item {id}"),
        creator: CURATED_CREATOR.to_string(),
        preview_url: format!("https://images.example/{id}/preview.jpg"),
        original_url: format!("https://images.example/{id}/original.jpg"),
        width: 100,
        height: 100,
        duration_seconds: None,
        avg_color: None,
        serialized_variants: None,
        added_at: fixed_time(minute),
        downloaded: false,
        local_path: None,
    }
}

/// Deterministic timestamp `minute` minutes after 2024-01-01T00:00:00Z.
pub fn fixed_time(minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_default()
        + chrono::Duration::minutes(i64::from(minute))
}
