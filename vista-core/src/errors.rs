//! Error types for catalog fetches and favorites persistence.

use thiserror::Error;

use crate::media::MediaKind;

/// Errors that can occur while talking to the remote catalog.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// Connectivity failure or timeout before a response arrived.
    #[error("Transport error: {reason}")]
    Transport {
        /// The reason for the transport failure
        reason: String,
    },

    /// Catalog answered with a non-success status.
    #[error("Server error {status}: {reason}")]
    Server {
        /// HTTP status code returned by the catalog
        status: u16,
        /// The reason for the server error
        reason: String,
    },

    /// Response body could not be decoded into catalog types.
    #[error("Decode error: {reason}")]
    Decode {
        /// The reason for the decode failure
        reason: String,
    },

    /// Single-item lookup found nothing for the id.
    #[error("{kind} {id} not found")]
    NotFound {
        /// Kind of item that was looked up
        kind: MediaKind,
        /// Id that was looked up
        id: u64,
    },
}

impl CatalogError {
    /// Checks whether reissuing the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            CatalogError::Transport { .. } => true,
            CatalogError::Server { status, .. } => *status >= 500 || *status == 429,
            CatalogError::Decode { .. } | CatalogError::NotFound { .. } => false,
        }
    }
}

/// Errors that occur while reading or writing favorite records.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backing store cannot be reached or refused the operation
    #[error("Store unavailable: {reason}")]
    Unavailable {
        /// Description of the failure
        reason: String,
    },

    /// Records could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Standard I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
