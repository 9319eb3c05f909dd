//! Vista Search - Remote media catalog providers

#![deny(missing_docs)]
#![deny(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
//!
//! Implements `vista_core::RemoteSource` over the Pexels HTTP API and over a
//! generated demo catalog for offline development.

pub mod errors;
pub mod providers;
mod wire;

// Re-export main types
pub use errors::ProviderError;
pub use providers::{DemoProvider, PexelsProvider, build_provider};
