//! Error types for provider construction.

use thiserror::Error;

/// Errors that can occur while setting up a catalog provider.
///
/// Request-time failures are reported as `vista_core::CatalogError`.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Configured base URL cannot be parsed or cannot carry paths.
    #[error("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl {
        /// The rejected URL
        url: String,
        /// The reason it was rejected
        reason: String,
    },

    /// HTTP client could not be constructed.
    #[error("HTTP client setup failed: {reason}")]
    ClientBuild {
        /// The reason for the failure
        reason: String,
    },

    /// Provider needs an API key but none was configured.
    #[error("Missing API key: set VISTA_API_KEY")]
    MissingApiKey,
}
