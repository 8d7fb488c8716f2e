//! Error types for session handling
//!
//! Navigation denial is not an error: the guard answers with a redirect.

use std::path::PathBuf;

/// Authentication service refused or could not answer
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthenticationError {
    /// Credentials were rejected
    #[error("credentials rejected")]
    Rejected,

    /// Service could not be reached or answered unexpectedly
    #[error("authentication service unavailable: {0}")]
    Unavailable(String),
}

/// Persisted marker could not be read or written
#[derive(Debug, thiserror::Error)]
pub enum MarkerError {
    /// IO error on the marker file
    #[error("io error on marker {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Marker content is not a valid marker
    #[error("corrupt marker: {0}")]
    Corrupt(String),
}

impl MarkerError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Login failures
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Credentials failed local validation; nothing was sent
    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),

    /// Authentication service refused
    #[error("authentication failed: {0}")]
    Authentication(#[from] AuthenticationError),

    /// Marker could not be persisted
    #[error("marker error: {0}")]
    Marker(#[from] MarkerError),

    /// A logout happened while the login was in flight
    #[error("login interrupted by logout")]
    Interrupted,
}

impl SessionError {
    /// Check if the error should be shown inline on the login form
    #[inline]
    #[must_use]
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials(_) | Self::Authentication(AuthenticationError::Rejected)
        )
    }
}

/// Result type alias for session operations
pub type SessionResult<T> = Result<T, SessionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_is_user_facing() {
        let err: SessionError = AuthenticationError::Rejected.into();
        assert!(err.is_user_facing());
        assert_eq!(err.to_string(), "authentication failed: credentials rejected");
    }

    #[test]
    fn outage_is_not_user_facing() {
        let err: SessionError = AuthenticationError::Unavailable("timeout".into()).into();
        assert!(!err.is_user_facing());
    }

    #[test]
    fn marker_conversion() {
        let err: SessionError = MarkerError::Corrupt("truncated".into()).into();
        assert!(matches!(err, SessionError::Marker(_)));
    }
}
