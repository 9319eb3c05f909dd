//! Demo provider implementation for development and testing.

use async_trait::async_trait;
use vista_core::media::{MediaKind, Photo, Video, VideoVariant};
use vista_core::remote::{RemotePage, RemoteSource};
use vista_core::CatalogError;

const SUBJECTS: &[&str] = &[
    "ocean", "mountain", "city", "forest", "desert", "night sky", "river", "coffee",
];

const CREATORS: &[&str] = &[
    "Ana Lima",
    "Kenji Mori",
    "Lena Fischer",
    "Tomás Ruiz",
    "Priya Nair",
];

/// Demo provider for development and testing.
///
/// Serves a fixed generated catalog without external API calls. Search
/// matches the query against each item's subject, case-insensitively.
#[derive(Debug)]
pub struct DemoProvider {
    photos: Vec<(Photo, &'static str)>,
    videos: Vec<(Video, &'static str)>,
}

impl Default for DemoProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoProvider {
    /// Catalog of 96 photos and 40 videos.
    pub fn new() -> Self {
        Self::with_sizes(96, 40)
    }

    /// Catalog with the given number of photos and videos, ids starting at 1.
    pub fn with_sizes(photo_count: u64, video_count: u64) -> Self {
        let photos = (1..=photo_count)
            .map(|id| {
                let subject = subject_for(id);
                (demo_photo(id, subject), subject)
            })
            .collect();
        let videos = (1..=video_count)
            .map(|id| {
                let subject = subject_for(id);
                (demo_video(id), subject)
            })
            .collect();
        Self { photos, videos }
    }

    fn matching<'a, T>(
        items: &'a [(T, &'static str)],
        query: &str,
    ) -> impl Iterator<Item = &'a T> + 'a {
        let needle = query.trim().to_lowercase();
        items
            .iter()
            .filter(move |(_, subject)| subject.contains(needle.as_str()))
            .map(|(item, _)| item)
    }
}

fn subject_for(id: u64) -> &'static str {
    SUBJECTS[(id as usize - 1) % SUBJECTS.len()]
}

fn creator_for(id: u64) -> &'static str {
    CREATORS[(id as usize - 1) % CREATORS.len()]
}

fn demo_photo(id: u64, subject: &str) -> Photo {
    Photo {
        id,
        preview_url: format!("https://demo.vista.invalid/photos/{id}/medium.jpg"),
        original_url: format!("https://demo.vista.invalid/photos/{id}/original.jpg"),
        width: 6000,
        height: 4000,
        creator_name: creator_for(id).to_string(),
        avg_color: "#6E7F80".to_string(),
        alt: Some(format!("{subject} at golden hour")),
    }
}

fn demo_video(id: u64) -> Video {
    Video {
        id,
        preview_url: format!("https://demo.vista.invalid/videos/{id}/poster.jpg"),
        width: 1920,
        height: 1080,
        creator_name: creator_for(id).to_string(),
        duration_seconds: 10 + (id as u32 % 50),
        variants: vec![
            VideoVariant {
                quality: "sd".to_string(),
                width: Some(960),
                height: Some(540),
                link: format!("https://demo.vista.invalid/videos/{id}/sd.mp4"),
            },
            VideoVariant {
                quality: "hd".to_string(),
                width: Some(1920),
                height: Some(1080),
                link: format!("https://demo.vista.invalid/videos/{id}/hd.mp4"),
            },
        ],
    }
}

fn page_of<'a, T: Clone + 'a>(
    items: impl Iterator<Item = &'a T>,
    page: u32,
    per_page: u32,
) -> RemotePage<T> {
    let matched: Vec<&T> = items.collect();
    let start = (page.saturating_sub(1) as usize).saturating_mul(per_page as usize);
    let selected = matched
        .iter()
        .skip(start)
        .take(per_page as usize)
        .map(|item| (*item).clone())
        .collect();
    RemotePage::new(selected, matched.len() as u64)
}

#[async_trait]
impl RemoteSource for DemoProvider {
    async fn fetch_curated_photos(
        &self,
        page: u32,
        per_page: u32,
    ) -> Result<RemotePage<Photo>, CatalogError> {
        Ok(page_of(self.photos.iter().map(|(photo, _)| photo), page, per_page))
    }

    async fn search_photos(
        &self,
        query: &str,
        page: u32,
        per_page: u32,
    ) -> Result<RemotePage<Photo>, CatalogError> {
        Ok(page_of(Self::matching(&self.photos, query), page, per_page))
    }

    async fn fetch_curated_videos(
        &self,
        page: u32,
        per_page: u32,
    ) -> Result<RemotePage<Video>, CatalogError> {
        Ok(page_of(self.videos.iter().map(|(video, _)| video), page, per_page))
    }

    async fn search_videos(
        &self,
        query: &str,
        page: u32,
        per_page: u32,
    ) -> Result<RemotePage<Video>, CatalogError> {
        Ok(page_of(Self::matching(&self.videos, query), page, per_page))
    }

    async fn get_photo_by_id(&self, id: u64) -> Result<Photo, CatalogError> {
        self.photos
            .iter()
            .find(|(photo, _)| photo.id == id)
            .map(|(photo, _)| photo.clone())
            .ok_or(CatalogError::NotFound {
                kind: MediaKind::Photo,
                id,
            })
    }

    async fn get_video_by_id(&self, id: u64) -> Result<Video, CatalogError> {
        self.videos
            .iter()
            .find(|(video, _)| video.id == id)
            .map(|(video, _)| video.clone())
            .ok_or(CatalogError::NotFound {
                kind: MediaKind::Video,
                id,
            })
    }
}
