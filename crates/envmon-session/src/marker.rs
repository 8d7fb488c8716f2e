//! Persisted authentication marker
//!
//! The marker says "someone logged in here" and carries the cached profile so
//! a restarted process can rebuild its menu. It carries no trust: the service
//! re-checks authorization on every call.

use crate::error::MarkerError;
use crate::user::User;
use chrono::{DateTime, Utc};
use moka::sync::Cache;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Storage key of the marker
pub const MARKER_KEY: &str = "authenticated";

/// Marker written on login and removed on logout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthMarker {
    /// Profile returned by the last successful login
    pub user: User,
    /// When the marker was written
    pub issued_at: DateTime<Utc>,
}

impl AuthMarker {
    /// Create marker stamped now
    #[must_use]
    pub fn new(user: User) -> Self {
        Self {
            user,
            issued_at: Utc::now(),
        }
    }
}

/// Place the marker lives between runs
pub trait MarkerStore: Send + Sync + std::fmt::Debug {
    /// Read marker, `None` when absent
    ///
    /// # Errors
    /// Returns `MarkerError` when the stored marker cannot be read or decoded
    fn read(&self) -> Result<Option<AuthMarker>, MarkerError>;

    /// Write marker, replacing any previous one
    ///
    /// # Errors
    /// Returns `MarkerError` when the marker cannot be stored
    fn write(&self, marker: &AuthMarker) -> Result<(), MarkerError>;

    /// Remove marker; absent marker is not an error
    ///
    /// # Errors
    /// Returns `MarkerError` when an existing marker cannot be removed
    fn clear(&self) -> Result<(), MarkerError>;

    /// Check for a readable marker
    fn is_present(&self) -> bool {
        matches!(self.read(), Ok(Some(_)))
    }
}

/// In-memory marker with optional lifetime
///
/// Behaves like a session cookie: gone when the process exits, and gone
/// after `ttl` when one is set.
#[derive(Debug, Clone)]
pub struct MemoryMarkerStore {
    inner: Cache<&'static str, AuthMarker>,
}

impl MemoryMarkerStore {
    /// Create store whose marker never expires
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Cache::new(1),
        }
    }

    /// Create store whose marker expires `ttl` after being written
    #[inline]
    #[must_use]
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            inner: Cache::builder().max_capacity(1).time_to_live(ttl).build(),
        }
    }
}

impl Default for MemoryMarkerStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkerStore for MemoryMarkerStore {
    fn read(&self) -> Result<Option<AuthMarker>, MarkerError> {
        Ok(self.inner.get(MARKER_KEY))
    }

    fn write(&self, marker: &AuthMarker) -> Result<(), MarkerError> {
        self.inner.insert(MARKER_KEY, marker.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), MarkerError> {
        self.inner.invalidate(MARKER_KEY);
        Ok(())
    }
}

/// Marker kept as a JSON file
#[derive(Debug, Clone)]
pub struct FileMarkerStore {
    path: PathBuf,
}

impl FileMarkerStore {
    /// Create store at `path`; nothing is touched until the first write
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Marker file path
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl MarkerStore for FileMarkerStore {
    fn read(&self) -> Result<Option<AuthMarker>, MarkerError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(MarkerError::io_error(&self.path, e)),
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| MarkerError::Corrupt(e.to_string()))
    }

    fn write(&self, marker: &AuthMarker) -> Result<(), MarkerError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| MarkerError::io_error(parent, e))?;
        }
        let json = serde_json::to_vec_pretty(marker).map_err(|e| MarkerError::Corrupt(e.to_string()))?;

        // Write-then-rename so a crash never leaves half a marker
        let tmp = self.temp_path();
        fs::write(&tmp, json).map_err(|e| MarkerError::io_error(&tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| MarkerError::io_error(&self.path, e))
    }

    fn clear(&self) -> Result<(), MarkerError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(MarkerError::io_error(&self.path, e)),
        }
    }
}
