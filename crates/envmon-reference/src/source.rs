//! Boundary to the external HTTP service

use crate::error::FetchError;
use async_trait::async_trait;
use std::sync::Arc;

/// Supplier of full collections, addressed by request path
///
/// Implementations must map transport failures and non-success statuses to
/// [`FetchError`]; they never partially apply anything themselves.
#[async_trait]
pub trait CollectionSource: Send + Sync + std::fmt::Debug {
    /// GET `path` and return the decoded JSON body
    async fn fetch(&self, path: &str) -> Result<serde_json::Value, FetchError>;
}

#[async_trait]
impl<T: CollectionSource + ?Sized> CollectionSource for Arc<T> {
    async fn fetch(&self, path: &str) -> Result<serde_json::Value, FetchError> {
        (**self).fetch(path).await
    }
}
