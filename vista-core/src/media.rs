//! Media items returned by the remote catalog.
//!
//! Items are ephemeral: one instance per fetched page, never persisted by the
//! engine itself. Favorites keep their own denormalized copy.

use serde::{Deserialize, Serialize};

/// Quality label the catalog uses for high-definition video renditions.
pub const HD_QUALITY: &str = "hd";

/// Content kind of a media item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Photo,
    Video,
}

impl MediaKind {
    /// Lowercase label used in persisted records and log output.
    pub fn as_str(self) -> &'static str {
        match self {
            MediaKind::Photo => "photo",
            MediaKind::Video => "video",
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Still image from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    pub id: u64,
    /// Medium-sized rendition for grids
    pub preview_url: String,
    /// Full resolution rendition for download
    pub original_url: String,
    pub width: u32,
    pub height: u32,
    pub creator_name: String,
    /// Average color as a CSS hex string, e.g. `#7A6F5B`
    pub avg_color: String,
    /// Alternative text, often empty for older uploads
    pub alt: Option<String>,
}

/// Single encoded rendition of a video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoVariant {
    pub quality: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub link: String,
}

/// Video clip from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub id: u64,
    /// Poster frame
    pub preview_url: String,
    pub width: u32,
    pub height: u32,
    pub creator_name: String,
    pub duration_seconds: u32,
    /// Renditions in the order the catalog listed them
    pub variants: Vec<VideoVariant>,
}

impl Video {
    /// Preferred playback link: first HD rendition, else the first listed one.
    ///
    /// Returns an empty string when the video has no renditions at all.
    pub fn original_url(&self) -> &str {
        self.variants
            .iter()
            .find(|variant| variant.quality == HD_QUALITY)
            .or_else(|| self.variants.first())
            .map(|variant| variant.link.as_str())
            .unwrap_or("")
    }
}

/// Photo or video as delivered in a catalog page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MediaItem {
    Photo(Photo),
    Video(Video),
}

impl MediaItem {
    pub fn id(&self) -> u64 {
        match self {
            MediaItem::Photo(photo) => photo.id,
            MediaItem::Video(video) => video.id,
        }
    }

    pub fn kind(&self) -> MediaKind {
        match self {
            MediaItem::Photo(_) => MediaKind::Photo,
            MediaItem::Video(_) => MediaKind::Video,
        }
    }

    /// Key under which this item is stored in the favorites store.
    ///
    /// Photo and video ids share one key space, so callers mixing kinds must
    /// keep ids distinct.
    pub fn favorite_key(&self) -> String {
        self.id().to_string()
    }

    pub fn preview_url(&self) -> &str {
        match self {
            MediaItem::Photo(photo) => &photo.preview_url,
            MediaItem::Video(video) => &video.preview_url,
        }
    }

    pub fn original_url(&self) -> &str {
        match self {
            MediaItem::Photo(photo) => &photo.original_url,
            MediaItem::Video(video) => video.original_url(),
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            MediaItem::Photo(photo) => (photo.width, photo.height),
            MediaItem::Video(video) => (video.width, video.height),
        }
    }

    pub fn creator_name(&self) -> &str {
        match self {
            MediaItem::Photo(photo) => &photo.creator_name,
            MediaItem::Video(video) => &video.creator_name,
        }
    }
}

impl From<Photo> for MediaItem {
    fn from(photo: Photo) -> Self {
        MediaItem::Photo(photo)
    }
}

impl From<Video> for MediaItem {
    fn from(video: Video) -> Self {
        MediaItem::Video(video)
    }
}
