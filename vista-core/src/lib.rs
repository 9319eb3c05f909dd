//! Vista Core - Paginated media catalog engine and reactive favorites
//!
//! This crate provides the building blocks for browsing a remote photo and
//! video catalog: cursor-based paging, per-feed query routing with
//! latest-query-wins semantics, a persistent favorites store observed through
//! streams, and configuration management.

pub mod catalog;
pub mod config;
pub mod errors;
pub mod favorites;
pub mod media;
pub mod paging;
pub mod query;
pub mod reactive;
pub mod remote;
pub mod router;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_fixtures;
pub mod tracing_setup;

// Re-export main types for convenient access
pub use catalog::{CatalogSession, LoadState, Tab};
pub use config::VistaConfig;
pub use errors::{CatalogError, StoreError};
pub use favorites::{
    FavoriteFilter, FavoriteRecord, FavoriteSync, FavoritesStore, FileFavoritesStore,
    MemoryFavoritesStore,
};
pub use media::{MediaItem, MediaKind, Photo, Video, VideoVariant};
pub use paging::{Cursor, LoadRequest, Page, PageLoadError, Paginator};
pub use query::{Query, QueryMode};
pub use remote::{RemotePage, RemoteSource};
pub use router::{FeedSnapshot, FeedStatus, QueryRouter};

/// Core errors that can bubble up from any Vista subsystem.
#[derive(Debug, thiserror::Error)]
pub enum VistaError {
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Page load error: {0}")]
    PageLoad(#[from] PageLoadError),

    #[error("Favorites error: {0}")]
    Store(#[from] StoreError),

    #[error("Configuration error: {reason}")]
    Configuration { reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl VistaError {
    /// Returns a user-friendly error message suitable for display.
    pub fn user_message(&self) -> String {
        match self {
            VistaError::Catalog(e) | VistaError::PageLoad(PageLoadError { source: e, .. }) => {
                match e {
                    CatalogError::Transport { .. } => {
                        "Could not reach the catalog, check your connection".to_string()
                    }
                    CatalogError::Server { status: 401 | 403, .. } => {
                        "The catalog rejected the API key".to_string()
                    }
                    CatalogError::Server { status: 429, .. } => {
                        "Too many requests, try again later".to_string()
                    }
                    CatalogError::Server { .. } => "The catalog is unavailable".to_string(),
                    CatalogError::Decode { .. } => {
                        "The catalog sent an unexpected response".to_string()
                    }
                    CatalogError::NotFound { kind, id } => format!("{kind} {id} not found"),
                }
            }
            VistaError::Store(_) => "Could not update favorites".to_string(),
            VistaError::Configuration { reason } => format!("Invalid configuration: {reason}"),
            VistaError::Io(_) => "File system error occurred".to_string(),
        }
    }

    /// Checks whether repeating the failed operation may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            VistaError::Catalog(e) | VistaError::PageLoad(PageLoadError { source: e, .. }) => {
                e.is_retryable()
            }
            VistaError::Store(StoreError::Io(_)) | VistaError::Io(_) => true,
            VistaError::Store(_) | VistaError::Configuration { .. } => false,
        }
    }

    /// Checks if this error is due to user input validation.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            VistaError::Configuration { .. } | VistaError::Catalog(CatalogError::NotFound { .. })
        )
    }
}

pub type Result<T> = std::result::Result<T, VistaError>;
