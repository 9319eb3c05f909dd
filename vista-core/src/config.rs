//! Centralized configuration for Vista.
//!
//! All tunable parameters and settings are defined here to avoid
//! hard-coded values scattered throughout the codebase.

use std::num::NonZeroU32;
use std::path::PathBuf;
use std::time::Duration;

use crate::paging::default_page_size;

/// Central configuration for all Vista components.
///
/// Groups related configuration settings into logical sections.
/// Supports environment variable overrides for runtime customization.
#[derive(Debug, Clone, Default)]
pub struct VistaConfig {
    pub remote: RemoteConfig,
    pub paging: PagingConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

/// Remote catalog connection settings.
#[derive(Clone)]
pub struct RemoteConfig {
    /// Base URL every endpoint path is joined onto
    pub base_url: String,
    /// Key sent in the `Authorization` header, if any
    pub api_key: Option<String>,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// User agent for HTTP requests
    pub user_agent: &'static str,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.pexels.com/".to_string(),
            api_key: None,
            request_timeout: Duration::from_secs(30),
            user_agent: "vista/0.1.0",
        }
    }
}

// Keeps the api key out of debug logs.
impl std::fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("request_timeout", &self.request_timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// Page loading behavior shared by every feed.
#[derive(Debug, Clone)]
pub struct PagingConfig {
    /// Items requested per page
    pub page_size: NonZeroU32,
    /// Remaining items before the end that trigger loading the next page
    pub prefetch_distance: usize,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            prefetch_distance: 3,
        }
    }
}

/// Favorites persistence settings.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// JSON file holding favorite records
    pub favorites_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            favorites_path: PathBuf::from("vista-favorites.json"),
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Directory receiving the full trace log of the last run
    pub logs_dir: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            logs_dir: PathBuf::from("logs"),
        }
    }
}

impl VistaConfig {
    /// Creates configuration with environment variable overrides.
    ///
    /// Allows runtime configuration via environment variables while
    /// maintaining sensible defaults. Unparseable values are ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Applies overrides from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        // Remote overrides
        if let Some(api_key) = lookup("VISTA_API_KEY").filter(|key| !key.trim().is_empty()) {
            config.remote.api_key = Some(api_key.trim().to_string());
        }

        if let Some(base_url) = lookup("VISTA_BASE_URL") {
            config.remote.base_url = base_url;
        }

        if let Some(timeout) = lookup("VISTA_REQUEST_TIMEOUT")
            && let Ok(seconds) = timeout.parse::<u64>()
        {
            config.remote.request_timeout = Duration::from_secs(seconds);
        }

        // Paging overrides
        if let Some(page_size) = lookup("VISTA_PAGE_SIZE")
            && let Ok(size) = page_size.parse::<NonZeroU32>()
        {
            config.paging.page_size = size;
        }

        // Storage overrides
        if let Some(path) = lookup("VISTA_FAVORITES_PATH") {
            config.storage.favorites_path = PathBuf::from(path);
        }

        // Logging overrides
        if let Some(dir) = lookup("VISTA_LOGS_DIR").filter(|dir| !dir.trim().is_empty()) {
            config.logging.logs_dir = PathBuf::from(dir);
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = VistaConfig::default();
        assert_eq!(config.paging.page_size.get(), 20);
        assert_eq!(config.paging.prefetch_distance, 3);
        assert_eq!(config.remote.base_url, "https://api.pexels.com/");
        assert!(config.remote.api_key.is_none());
        assert_eq!(config.logging.logs_dir, PathBuf::from("logs"));
    }

    #[test]
    fn test_lookup_overrides() {
        let values: HashMap<&str, &str> = [
            ("VISTA_API_KEY", " secret "),
            ("VISTA_PAGE_SIZE", "40"),
            ("VISTA_REQUEST_TIMEOUT", "5"),
            ("VISTA_FAVORITES_PATH", "/tmp/favs.json"),
            ("VISTA_LOGS_DIR", "/var/log/vista"),
        ]
        .into_iter()
        .collect();
        let config = VistaConfig::from_lookup(|key| values.get(key).map(|v| v.to_string()));

        assert_eq!(config.remote.api_key.as_deref(), Some("secret"));
        assert_eq!(config.paging.page_size.get(), 40);
        assert_eq!(config.remote.request_timeout, Duration::from_secs(5));
        assert_eq!(
            config.storage.favorites_path,
            PathBuf::from("/tmp/favs.json")
        );
        assert_eq!(config.logging.logs_dir, PathBuf::from("/var/log/vista"));
    }

    #[test]
    fn test_invalid_overrides_are_ignored() {
        let config = VistaConfig::from_lookup(|key| match key {
            "VISTA_PAGE_SIZE" => Some("0".to_string()),
            "VISTA_REQUEST_TIMEOUT" => Some("soon".to_string()),
            "VISTA_API_KEY" => Some("   ".to_string()),
            _ => None,
        });
        assert_eq!(config.paging.page_size.get(), 20);
        assert_eq!(config.remote.request_timeout, Duration::from_secs(30));
        assert!(config.remote.api_key.is_none());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let mut config = VistaConfig::default();
        config.remote.api_key = Some("hunter2".to_string());
        let rendered = format!("{:?}", config.remote);
        assert!(!rendered.contains("hunter2"));
    }
}
