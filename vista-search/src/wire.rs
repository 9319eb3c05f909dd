//! JSON shapes of the Pexels API and their conversion into catalog types.

use serde::Deserialize;
use vista_core::media::{Photo, Video, VideoVariant};
use vista_core::remote::RemotePage;

/// One page of photos from `v1/curated` or `v1/search`.
#[derive(Debug, Deserialize)]
pub(crate) struct PhotoPageResponse {
    #[serde(default)]
    total_results: u64,
    #[serde(default)]
    photos: Vec<PexelsPhoto>,
}

/// One page of videos from `videos/popular` or `videos/search`.
#[derive(Debug, Deserialize)]
pub(crate) struct VideoPageResponse {
    #[serde(default)]
    total_results: u64,
    #[serde(default)]
    videos: Vec<PexelsVideo>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PexelsPhoto {
    id: u64,
    width: u32,
    height: u32,
    #[serde(default)]
    photographer: String,
    #[serde(default)]
    avg_color: Option<String>,
    src: PhotoSource,
    #[serde(default)]
    alt: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PhotoSource {
    original: String,
    medium: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PexelsVideo {
    id: u64,
    width: u32,
    height: u32,
    #[serde(default)]
    duration: u32,
    image: String,
    user: VideoUser,
    #[serde(default)]
    video_files: Option<Vec<VideoFile>>,
}

#[derive(Debug, Deserialize)]
struct VideoUser {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct VideoFile {
    #[serde(default)]
    quality: Option<String>,
    #[serde(default)]
    width: Option<u32>,
    #[serde(default)]
    height: Option<u32>,
    link: String,
}

impl From<PexelsPhoto> for Photo {
    fn from(photo: PexelsPhoto) -> Self {
        Photo {
            id: photo.id,
            preview_url: photo.src.medium,
            original_url: photo.src.original,
            width: photo.width,
            height: photo.height,
            creator_name: photo.photographer,
            avg_color: photo.avg_color.unwrap_or_default(),
            alt: photo.alt.filter(|alt| !alt.trim().is_empty()),
        }
    }
}

impl From<PexelsVideo> for Video {
    fn from(video: PexelsVideo) -> Self {
        let variants = video
            .video_files
            .unwrap_or_default()
            .into_iter()
            .map(|file| VideoVariant {
                quality: file.quality.unwrap_or_default(),
                width: file.width,
                height: file.height,
                link: file.link,
            })
            .collect();

        Video {
            id: video.id,
            preview_url: video.image,
            width: video.width,
            height: video.height,
            creator_name: video.user.name,
            duration_seconds: video.duration,
            variants,
        }
    }
}

impl From<PhotoPageResponse> for RemotePage<Photo> {
    fn from(response: PhotoPageResponse) -> Self {
        RemotePage::new(
            response.photos.into_iter().map(Photo::from).collect(),
            response.total_results,
        )
    }
}

impl From<VideoPageResponse> for RemotePage<Video> {
    fn from(response: VideoPageResponse) -> Self {
        RemotePage::new(
            response.videos.into_iter().map(Video::from).collect(),
            response.total_results,
        )
    }
}
