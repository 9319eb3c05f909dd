//! Provider implementations of the remote catalog.

use std::sync::Arc;

use vista_core::config::RemoteConfig;
use vista_core::remote::RemoteSource;

use crate::errors::ProviderError;

pub mod demo;
pub mod pexels;

pub use demo::DemoProvider;
pub use pexels::PexelsProvider;

/// Chooses the catalog backend for a run.
///
/// The demo catalog needs no credentials; Pexels requires an API key.
///
/// # Errors
/// - `ProviderError::MissingApiKey` - Pexels selected without an API key
/// - `ProviderError::InvalidBaseUrl` - Configured base URL is unusable
/// - `ProviderError::ClientBuild` - HTTP client could not be constructed
pub fn build_provider(
    config: &RemoteConfig,
    use_demo: bool,
) -> Result<Arc<dyn RemoteSource>, ProviderError> {
    if use_demo {
        tracing::info!("Using demo catalog");
        return Ok(Arc::new(DemoProvider::new()));
    }
    if config.api_key.is_none() {
        return Err(ProviderError::MissingApiKey);
    }
    tracing::info!(base_url = %config.base_url, "Using Pexels catalog");
    Ok(Arc::new(PexelsProvider::from_config(config)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pexels_requires_api_key() {
        let config = RemoteConfig::default();
        assert!(matches!(
            build_provider(&config, false),
            Err(ProviderError::MissingApiKey)
        ));
        assert!(build_provider(&config, true).is_ok());
    }
}
