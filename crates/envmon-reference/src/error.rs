//! Error types for reference-data loading

/// Failure to load a collection from the external service
///
/// Cloneable so one failed fetch can be reported to every caller that
/// joined it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// Request never produced a response
    #[error("transport error fetching {path}: {message}")]
    Transport { path: String, message: String },

    /// Service answered with a non-success status
    #[error("{path} returned status {status}")]
    Status { path: String, status: u16 },

    /// Payload was not the expected collection
    #[error("invalid payload from {path}: {message}")]
    Decode { path: String, message: String },
}

impl FetchError {
    /// Create transport error for path
    pub fn transport(path: impl Into<String>, message: impl ToString) -> Self {
        Self::Transport {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Create status error for path
    pub fn status(path: impl Into<String>, status: u16) -> Self {
        Self::Status {
            path: path.into(),
            status,
        }
    }

    /// Create decode error for path
    pub fn decode(path: impl Into<String>, message: impl ToString) -> Self {
        Self::Decode {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Path of the failed request
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::Transport { path, .. } | Self::Status { path, .. } | Self::Decode { path, .. } => path,
        }
    }

    /// Check if a later retry may succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { .. } => true,
            Self::Status { status, .. } => *status >= 500 || *status == 429,
            Self::Decode { .. } => false,
        }
    }
}
