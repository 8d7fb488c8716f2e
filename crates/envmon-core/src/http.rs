//! HTTP client for the monitoring service
//!
//! One `reqwest` client with a cookie store, so the session cookie set by
//! `/login` rides along on every collection request.

use crate::config::{parse_base_url, ApiConfig};
use crate::error::ConsoleResult;
use async_trait::async_trait;
use envmon_reference::{CollectionSource, FetchError};
use envmon_session::{AuthService, AuthenticationError, Credentials, User};
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;
use std::time::Duration;

/// Login endpoint
pub const LOGIN_PATH: &str = "/login";

/// Client for the external service
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: Client,
    base: Url,
}

impl HttpApi {
    /// Create client rooted at `base_url`
    ///
    /// # Errors
    /// Returns `ConsoleError::Config` for an invalid base URL and
    /// `ConsoleError::Client` when the TLS backend cannot be initialised
    pub fn new(base_url: &str, timeout: Duration) -> ConsoleResult<Self> {
        let base = parse_base_url(base_url)?;
        let client = Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .build()?;
        Ok(Self { client, base })
    }

    /// Create client from the `[api]` section
    ///
    /// # Errors
    /// Same as [`HttpApi::new`]
    pub fn from_config(config: &ApiConfig) -> ConsoleResult<Self> {
        Self::new(&config.base_url, config.timeout())
    }

    /// Base URL
    #[inline]
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn url(&self, path: &str) -> Result<Url, String> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|e| e.to_string())
    }
}

#[async_trait]
impl CollectionSource for HttpApi {
    async fn fetch(&self, path: &str) -> Result<Value, FetchError> {
        let url = self.url(path).map_err(|e| FetchError::transport(path, e))?;
        tracing::debug!(%url, "GET");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::transport(path, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::status(path, status.as_u16()));
        }
        response
            .json::<Value>()
            .await
            .map_err(|e| FetchError::decode(path, e))
    }
}

#[async_trait]
impl AuthService for HttpApi {
    async fn authenticate(&self, credentials: &Credentials) -> Result<User, AuthenticationError> {
        let url = self.url(LOGIN_PATH).map_err(AuthenticationError::Unavailable)?;
        tracing::debug!(%url, username = %credentials.username, "POST");

        let response = self
            .client
            .post(url)
            .json(credentials)
            .send()
            .await
            .map_err(|e| AuthenticationError::Unavailable(e.to_string()))?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(AuthenticationError::Rejected),
            status if !status.is_success() => Err(AuthenticationError::Unavailable(format!(
                "unexpected status {status}"
            ))),
            _ => response
                .json::<User>()
                .await
                .map_err(|e| AuthenticationError::Unavailable(format!("invalid profile: {e}"))),
        }
    }
}
