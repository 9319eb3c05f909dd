//! Pexels HTTP provider for production use.

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::AUTHORIZATION;
use serde::de::DeserializeOwned;
use url::Url;
use vista_core::config::RemoteConfig;
use vista_core::media::{MediaKind, Photo, Video};
use vista_core::remote::{RemotePage, RemoteSource};
use vista_core::CatalogError;

use crate::errors::ProviderError;
use crate::wire::{PexelsPhoto, PexelsVideo, PhotoPageResponse, VideoPageResponse};

const CURATED_PHOTOS: &str = "v1/curated";
const SEARCH_PHOTOS: &str = "v1/search";
const POPULAR_VIDEOS: &str = "videos/popular";
const SEARCH_VIDEOS: &str = "videos/search";

/// Pexels catalog provider.
///
/// Sends the API key verbatim in the `Authorization` header. Never retries;
/// every failure is classified into a [`CatalogError`] and returned.
#[derive(Debug)]
pub struct PexelsProvider {
    client: reqwest::Client,
    base_url: Url,
    api_key: Option<String>,
}

impl PexelsProvider {
    /// Creates a provider from remote settings.
    ///
    /// # Errors
    /// - `ProviderError::InvalidBaseUrl` - Base URL does not parse or cannot be a base
    /// - `ProviderError::ClientBuild` - HTTP client could not be constructed
    pub fn from_config(config: &RemoteConfig) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent)
            .build()
            .map_err(|e| ProviderError::ClientBuild {
                reason: e.to_string(),
            })?;

        Self::with_client(client, &config.base_url, config.api_key.clone())
    }

    /// Creates a provider around an existing client.
    ///
    /// A trailing slash is added to `base_url` so endpoint paths append to it.
    ///
    /// # Errors
    /// - `ProviderError::InvalidBaseUrl` - Base URL does not parse or cannot be a base
    pub fn with_client(
        client: reqwest::Client,
        base_url: &str,
        api_key: Option<String>,
    ) -> Result<Self, ProviderError> {
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base_url = Url::parse(&normalized).map_err(|e| ProviderError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ProviderError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: "URL cannot carry endpoint paths".to_string(),
            });
        }

        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    /// Base URL every endpoint path is joined onto.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, CatalogError> {
        self.base_url
            .join(path)
            .map_err(|e| CatalogError::Transport {
                reason: format!("Invalid endpoint '{path}': {e}"),
            })
    }

    /// Issues a GET and decodes the JSON body.
    ///
    /// `lookup` names the item a 404 refers to; without it a 404 is a server error.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
        lookup: Option<(MediaKind, u64)>,
    ) -> Result<T, CatalogError> {
        let url = self.endpoint(path)?;
        tracing::debug!(%url, ?params, "Pexels request");

        let mut request = self.client.get(url).query(params);
        if let Some(api_key) = &self.api_key {
            request = request.header(AUTHORIZATION, api_key);
        }

        let response = request.send().await.map_err(|e| CatalogError::Transport {
            reason: format!("Pexels request failed: {e}"),
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(path, status = status.as_u16(), "Pexels returned error status");
            return Err(classify_status(status, lookup));
        }

        let body = response.bytes().await.map_err(|e| CatalogError::Transport {
            reason: format!("Pexels response interrupted: {e}"),
        })?;

        serde_json::from_slice(&body).map_err(|e| CatalogError::Decode {
            reason: format!("Pexels JSON parsing failed: {e}"),
        })
    }

    fn page_params(page: u32, per_page: u32) -> Vec<(&'static str, String)> {
        vec![("per_page", per_page.to_string()), ("page", page.to_string())]
    }

    fn search_params(query: &str, page: u32, per_page: u32) -> Vec<(&'static str, String)> {
        let mut params = vec![("query", query.to_string())];
        params.extend(Self::page_params(page, per_page));
        params
    }
}

/// Maps a non-success status to a catalog error.
fn classify_status(status: StatusCode, lookup: Option<(MediaKind, u64)>) -> CatalogError {
    match (status, lookup) {
        (StatusCode::NOT_FOUND, Some((kind, id))) => CatalogError::NotFound { kind, id },
        _ => CatalogError::Server {
            status: status.as_u16(),
            reason: status
                .canonical_reason()
                .unwrap_or("Unexpected status")
                .to_string(),
        },
    }
}

#[async_trait]
impl RemoteSource for PexelsProvider {
    async fn fetch_curated_photos(
        &self,
        page: u32,
        per_page: u32,
    ) -> Result<RemotePage<Photo>, CatalogError> {
        let response: PhotoPageResponse = self
            .get_json(CURATED_PHOTOS, &Self::page_params(page, per_page), None)
            .await?;
        Ok(response.into())
    }

    async fn search_photos(
        &self,
        query: &str,
        page: u32,
        per_page: u32,
    ) -> Result<RemotePage<Photo>, CatalogError> {
        let response: PhotoPageResponse = self
            .get_json(SEARCH_PHOTOS, &Self::search_params(query, page, per_page), None)
            .await?;
        Ok(response.into())
    }

    async fn fetch_curated_videos(
        &self,
        page: u32,
        per_page: u32,
    ) -> Result<RemotePage<Video>, CatalogError> {
        let response: VideoPageResponse = self
            .get_json(POPULAR_VIDEOS, &Self::page_params(page, per_page), None)
            .await?;
        Ok(response.into())
    }

    async fn search_videos(
        &self,
        query: &str,
        page: u32,
        per_page: u32,
    ) -> Result<RemotePage<Video>, CatalogError> {
        let response: VideoPageResponse = self
            .get_json(SEARCH_VIDEOS, &Self::search_params(query, page, per_page), None)
            .await?;
        Ok(response.into())
    }

    async fn get_photo_by_id(&self, id: u64) -> Result<Photo, CatalogError> {
        let photo: PexelsPhoto = self
            .get_json(&format!("v1/photos/{id}"), &[], Some((MediaKind::Photo, id)))
            .await?;
        Ok(photo.into())
    }

    async fn get_video_by_id(&self, id: u64) -> Result<Video, CatalogError> {
        let video: PexelsVideo = self
            .get_json(&format!("videos/videos/{id}"), &[], Some((MediaKind::Video, id)))
            .await?;
        Ok(video.into())
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    use super::*;

    /// Serves one canned HTTP response and hands back the raw request.
    async fn serve_once(status_line: &str, body: &str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buffer = [0u8; 1024];
            while !request.windows(4).any(|window| window == b"\r\n\r\n") {
                let read = socket.read(&mut buffer).await.unwrap();
                if read == 0 {
                    break;
                }
                request.extend_from_slice(&buffer[..read]);
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            String::from_utf8_lossy(&request).into_owned()
        });

        (format!("http://{address}"), handle)
    }

    fn provider(base_url: &str) -> PexelsProvider {
        PexelsProvider::with_client(
            reqwest::Client::new(),
            base_url,
            Some("test-key".to_string()),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_search_request_shape() {
        let (base_url, server) =
            serve_once("200 OK", r#"{"total_results": 0, "page": 2, "photos": []}"#).await;

        let page = provider(&base_url)
            .search_photos("red fox", 2, 20)
            .await
            .unwrap();
        assert!(page.items.is_empty());

        let request = server.await.unwrap();
        let request_line = request.lines().next().unwrap();
        assert!(request_line.starts_with("GET /v1/search?"));
        assert!(request_line.contains("query=red+fox"));
        assert!(request_line.contains("per_page=20"));
        assert!(request_line.contains("page=2"));
        assert!(request.to_lowercase().contains("authorization: test-key"));
    }

    #[tokio::test]
    async fn test_lookup_404_is_not_found() {
        let (base_url, _server) = serve_once("404 Not Found", "{}").await;

        let error = provider(&base_url).get_video_by_id(77).await.unwrap_err();
        assert_eq!(
            error,
            CatalogError::NotFound {
                kind: MediaKind::Video,
                id: 77
            }
        );
    }

    #[tokio::test]
    async fn test_bad_json_is_decode_error() {
        let (base_url, _server) = serve_once("200 OK", r#"{"photos": "nope"}"#).await;

        let error = provider(&base_url)
            .fetch_curated_photos(1, 20)
            .await
            .unwrap_err();
        assert!(matches!(error, CatalogError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        drop(listener);

        let error = provider(&format!("http://{address}"))
            .fetch_curated_videos(1, 20)
            .await
            .unwrap_err();
        assert!(matches!(error, CatalogError::Transport { .. }));
    }

    #[test]
    fn test_status_classification() {
        assert_eq!(
            classify_status(StatusCode::NOT_FOUND, None),
            CatalogError::Server {
                status: 404,
                reason: "Not Found".to_string()
            }
        );
        assert!(matches!(
            classify_status(StatusCode::TOO_MANY_REQUESTS, None),
            CatalogError::Server { status: 429, .. }
        ));
    }

    #[test]
    fn test_base_url_normalization() {
        let provider = provider("https://api.pexels.com");
        assert_eq!(provider.base_url().as_str(), "https://api.pexels.com/");
        assert_eq!(
            provider.endpoint(SEARCH_VIDEOS).unwrap().as_str(),
            "https://api.pexels.com/videos/search"
        );

        let error = PexelsProvider::with_client(reqwest::Client::new(), "not a url", None);
        assert!(matches!(error, Err(ProviderError::InvalidBaseUrl { .. })));
    }
}
