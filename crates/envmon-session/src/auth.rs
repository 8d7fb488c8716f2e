//! Boundary to the external authentication service

use crate::error::AuthenticationError;
use crate::user::{Credentials, User};
use async_trait::async_trait;
use std::sync::Arc;

/// Verifies credentials and returns the principal's profile
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Authenticate `credentials`
    ///
    /// # Errors
    /// Returns `AuthenticationError::Rejected` when the service refuses the
    /// credentials and `AuthenticationError::Unavailable` when it cannot answer
    async fn authenticate(&self, credentials: &Credentials) -> Result<User, AuthenticationError>;
}

#[async_trait]
impl<T: AuthService + ?Sized> AuthService for Arc<T> {
    async fn authenticate(&self, credentials: &Credentials) -> Result<User, AuthenticationError> {
        (**self).authenticate(credentials).await
    }
}
