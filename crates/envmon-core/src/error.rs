//! Error types for the console facade

use envmon_access::NavigationError;
use envmon_reference::FetchError;
use envmon_session::SessionError;
use std::path::PathBuf;

/// Configuration could not be loaded
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading a configuration file
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML did not match the expected shape
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// Service base URL is not an absolute http(s) URL
    #[error("invalid base url {url}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl ConfigError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Console errors
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    /// Configuration error
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// Navigation tree is invalid
    #[error("navigation error: {0}")]
    Navigation(#[from] NavigationError),

    /// Login failed
    #[error("session error: {0}")]
    Session(#[from] SessionError),

    /// Reference data could not be loaded
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// HTTP client could not be built
    #[error("http client error: {0}")]
    Client(#[from] reqwest::Error),
}

/// Result type alias for console operations
pub type ConsoleResult<T> = Result<T, ConsoleError>;
