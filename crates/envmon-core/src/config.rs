//! Console configuration
//!
//! Loaded from TOML. Every section is optional:
//!
//! ```toml
//! navigation = "/etc/envmon/menu.json"
//!
//! [api]
//! base_url = "http://localhost:9000/"
//! timeout_secs = 30
//!
//! [marker]
//! kind = "file"
//! path = "/var/lib/envmon/session.json"
//!
//! [log]
//! filter = "info,envmon_reference=debug"
//! json = false
//! ```

use crate::error::ConfigError;
use envmon_session::{FileMarkerStore, MarkerStore, MemoryMarkerStore};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Default service address
pub const DEFAULT_BASE_URL: &str = "http://localhost:9000/";

/// External service settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL every request path is joined onto
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

impl ApiConfig {
    /// Request timeout
    #[inline]
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Where the authentication marker lives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MarkerConfig {
    /// In memory, optionally expiring
    Memory {
        /// Lifetime in seconds; unset means until exit
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ttl_secs: Option<u64>,
    },
    /// JSON file
    File {
        /// Marker file
        path: PathBuf,
    },
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self::Memory { ttl_secs: None }
    }
}

impl MarkerConfig {
    /// Build the configured store
    #[must_use]
    pub fn build(&self) -> Arc<dyn MarkerStore> {
        match self {
            Self::Memory { ttl_secs: None } => Arc::new(MemoryMarkerStore::new()),
            Self::Memory { ttl_secs: Some(secs) } => {
                Arc::new(MemoryMarkerStore::with_ttl(Duration::from_secs(*secs)))
            }
            Self::File { path } => Arc::new(FileMarkerStore::new(path.clone())),
        }
    }
}

/// Logging settings, applied by the binary only
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directive; `RUST_LOG` takes precedence
    pub filter: String,
    /// Emit JSON lines instead of text
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json: false,
        }
    }
}

/// Console configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// External service
    pub api: ApiConfig,
    /// Authentication marker storage
    pub marker: MarkerConfig,
    /// Navigation tree file (`.json` or `.toml`); built-in sidebar when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub navigation: Option<PathBuf>,
    /// Logging
    pub log: LogConfig,
}

impl ConsoleConfig {
    /// Create default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read and validate configuration file
    ///
    /// # Errors
    /// Returns `ConfigError` when the file cannot be read, does not parse or
    /// names an invalid base URL
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::io_error(path, e))?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Parse and validate TOML text
    ///
    /// # Errors
    /// Returns `ConfigError` on malformed TOML or an invalid base URL
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the base URL
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidBaseUrl` unless it is an absolute http(s) URL
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.base_url().map(|_| ())
    }

    /// Parsed base URL, always ending in `/` so request paths join under it
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidBaseUrl` unless it is an absolute http(s) URL
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        parse_base_url(&self.api.base_url)
    }

    /// With service base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api.base_url = url.into();
        self
    }

    /// With request timeout
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.api.timeout_secs = secs;
        self
    }

    /// With marker storage
    #[must_use]
    pub fn with_marker(mut self, marker: MarkerConfig) -> Self {
        self.marker = marker;
        self
    }

    /// With navigation file
    #[must_use]
    pub fn with_navigation(mut self, path: impl Into<PathBuf>) -> Self {
        self.navigation = Some(path.into());
        self
    }

    /// With log filter
    #[must_use]
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log.filter = filter.into();
        self
    }
}

pub(crate) fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidBaseUrl {
        url: raw.to_string(),
        reason,
    };
    let mut url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {}", url.scheme())));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_file_is_default() {
        let config = ConsoleConfig::from_toml_str("").unwrap();
        assert_eq!(config, ConsoleConfig::default());
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.marker, MarkerConfig::Memory { ttl_secs: None });
    }

    #[test]
    fn full_file() {
        let config = ConsoleConfig::from_toml_str(
            r#"
            navigation = "menu.json"

            [api]
            base_url = "https://aqm.example.org/api"
            timeout_secs = 5

            [marker]
            kind = "file"
            path = "/tmp/envmon.json"

            [log]
            filter = "debug"
            json = true
            "#,
        )
        .unwrap();

        assert_eq!(config.api.timeout(), Duration::from_secs(5));
        assert_eq!(config.base_url().unwrap().as_str(), "https://aqm.example.org/api/");
        assert_eq!(config.navigation.as_deref(), Some(Path::new("menu.json")));
        assert_eq!(
            config.marker,
            MarkerConfig::File {
                path: PathBuf::from("/tmp/envmon.json")
            }
        );
        assert!(config.log.json);
    }

    #[test]
    fn rejects_bad_base_url() {
        let err = ConsoleConfig::from_toml_str("[api]\nbase_url = \"ftp://host/\"").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBaseUrl { .. }));
        assert!(ConsoleConfig::new().with_base_url("not a url").validate().is_err());
    }

    #[test]
    fn builder() {
        let config = ConsoleConfig::new()
            .with_base_url("http://10.0.0.2:9000")
            .with_timeout_secs(3)
            .with_marker(MarkerConfig::Memory { ttl_secs: Some(600) })
            .with_log_filter("warn");
        assert_eq!(config.base_url().unwrap().as_str(), "http://10.0.0.2:9000/");
        assert_eq!(config.log.filter, "warn");
        assert!(!config.marker.build().is_present());
    }

    #[test]
    fn load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("envmon.toml");
        std::fs::write(&path, "[log]\njson = true\n").unwrap();

        assert!(ConsoleConfig::load(&path).unwrap().log.json);
        assert!(matches!(
            ConsoleConfig::load(dir.path().join("missing.toml")),
            Err(ConfigError::Io { .. })
        ));
    }
}
