//! Session state
//!
//! The only writers are [`Session::login`] and [`Session::logout`]. Everything
//! else reads: the guard through [`SessionView`], the menu through
//! [`Session::current_capabilities`].

use crate::auth::AuthService;
use crate::error::{SessionError, SessionResult};
use crate::marker::{AuthMarker, MarkerStore};
use crate::user::{Credentials, User};
use envmon_access::CapabilitySet;
use parking_lot::RwLock;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Synchronous read of the authentication flag
pub trait SessionView {
    /// Check if a principal is logged in
    fn is_authenticated(&self) -> bool;
}

/// Authenticated principal plus its persisted marker
pub struct Session {
    auth: Arc<dyn AuthService>,
    marker: Arc<dyn MarkerStore>,
    user: RwLock<Option<User>>,
    login_lock: Mutex<()>,
    logout_epoch: AtomicU64,
}

impl Session {
    /// Create logged-out session
    ///
    /// Does not look at an existing marker; see [`Session::restore`].
    pub fn new(auth: Arc<dyn AuthService>, marker: Arc<dyn MarkerStore>) -> Self {
        Self {
            auth,
            marker,
            user: RwLock::new(None),
            login_lock: Mutex::new(()),
            logout_epoch: AtomicU64::new(0),
        }
    }

    /// Create session hydrated from the persisted marker
    ///
    /// An unreadable marker is removed and the session starts logged out.
    pub fn restore(auth: Arc<dyn AuthService>, marker: Arc<dyn MarkerStore>) -> Self {
        let session = Self::new(auth, marker);
        match session.marker.read() {
            Ok(Some(found)) => {
                tracing::info!(user = %found.user.id, issued_at = %found.issued_at, "session restored");
                *session.user.write() = Some(found.user);
            }
            Ok(None) => tracing::debug!("no session marker"),
            Err(e) => {
                tracing::warn!(error = %e, "discarding unreadable session marker");
                if let Err(e) = session.marker.clear() {
                    tracing::warn!(error = %e, "failed to remove session marker");
                }
            }
        }
        session
    }

    /// Log in, replacing any current principal
    ///
    /// Credentials are checked locally before the service is contacted. On
    /// any failure the session is left exactly as it was.
    ///
    /// # Errors
    /// - `SessionError::InvalidCredentials` when local validation fails
    /// - `SessionError::Authentication` when the service refuses or is down
    /// - `SessionError::Marker` when the marker cannot be persisted
    /// - `SessionError::Interrupted` when `logout` ran while waiting on the service
    pub async fn login(&self, credentials: &Credentials) -> SessionResult<User> {
        credentials.validate()?;

        let _serial = self.login_lock.lock().await;
        let epoch = self.logout_epoch.load(Ordering::Acquire);

        let user = match self.auth.authenticate(credentials).await {
            Ok(user) => user,
            Err(e) => {
                tracing::info!(username = %credentials.username, error = %e, "login failed");
                return Err(e.into());
            }
        };

        self.marker.write(&AuthMarker::new(user.clone()))?;

        let mut slot = self.user.write();
        if self.logout_epoch.load(Ordering::Acquire) != epoch {
            drop(slot);
            tracing::warn!(username = %credentials.username, "login discarded after logout");
            if let Err(e) = self.marker.clear() {
                tracing::warn!(error = %e, "failed to remove session marker");
            }
            return Err(SessionError::Interrupted);
        }
        *slot = Some(user.clone());
        drop(slot);

        tracing::info!(user = %user.id, admin = user.is_admin, "logged in");
        Ok(user)
    }

    /// Log out; always succeeds
    pub fn logout(&self) {
        let mut slot = self.user.write();
        let previous = slot.take();
        if let Err(e) = self.marker.clear() {
            tracing::warn!(error = %e, "failed to remove session marker");
        }
        self.logout_epoch.fetch_add(1, Ordering::AcqRel);

        match previous {
            Some(user) => tracing::info!(user = %user.id, "logged out"),
            None => tracing::debug!("logout without a session"),
        }
    }

    /// Current principal, `None` when logged out
    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        if !self.marker.is_present() {
            return None;
        }
        self.user.read().clone()
    }

    /// Capabilities of the current principal; empty when logged out
    #[must_use]
    pub fn current_capabilities(&self) -> CapabilitySet {
        self.current_user()
            .map(|user| user.capabilities())
            .unwrap_or_default()
    }
}

impl SessionView for Session {
    fn is_authenticated(&self) -> bool {
        self.user.read().is_some() && self.marker.is_present()
    }
}

impl<T: SessionView + ?Sized> SessionView for Arc<T> {
    fn is_authenticated(&self) -> bool {
        (**self).is_authenticated()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("user", &self.user.read().as_ref().map(|u| u.id.clone()))
            .field("marker", &self.marker)
            .finish_non_exhaustive()
    }
}
