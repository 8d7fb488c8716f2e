//! Login flow with destination replay
//!
//! The guard discards what was asked for; this flow remembers it so the user
//! lands there once logged in.

use crate::error::SessionResult;
use crate::guard::NavigationOutcome;
use crate::route::{NavTarget, HOME_ROUTE};
use crate::session::Session;
use crate::user::Credentials;
use parking_lot::Mutex;

/// Remembers the last denied destination
#[derive(Debug, Default)]
pub struct LoginFlow {
    pending: Mutex<Option<NavTarget>>,
}

impl LoginFlow {
    /// Create flow with nothing pending
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember `target` as the post-login destination
    pub fn record(&self, target: NavTarget) {
        tracing::debug!(%target, "destination recorded for after login");
        *self.pending.lock() = Some(target);
    }

    /// Remember the requested target of a redirect; other outcomes are ignored
    pub fn observe(&self, outcome: &NavigationOutcome) {
        if let NavigationOutcome::Redirect { requested, .. } = outcome {
            self.record(requested.clone());
        }
    }

    /// Destination waiting for a login
    #[must_use]
    pub fn pending(&self) -> Option<NavTarget> {
        self.pending.lock().clone()
    }

    /// Forget the pending destination
    pub fn reset(&self) {
        self.pending.lock().take();
    }

    /// Log in and return where to go next
    ///
    /// The pending destination is consumed on success and kept on failure.
    ///
    /// # Errors
    /// Propagates the error of [`Session::login`]
    pub async fn submit(&self, session: &Session, credentials: &Credentials) -> SessionResult<NavTarget> {
        session.login(credentials).await?;
        let next = self
            .pending
            .lock()
            .take()
            .unwrap_or_else(|| NavTarget::name(HOME_ROUTE));
        Ok(next)
    }

    /// Log out and drop the pending destination
    pub fn logout(&self, session: &Session) {
        session.logout();
        self.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MockAuthService;
    use crate::error::AuthenticationError;
    use crate::marker::MemoryMarkerStore;
    use crate::user::User;
    use std::sync::Arc;

    fn session() -> Session {
        let mut auth = MockAuthService::new();
        auth.expect_authenticate()
            .withf(|c| c.password == "secret1")
            .returning(|c| Ok(User::new(c.username.clone(), "Operator")));
        auth.expect_authenticate()
            .withf(|c| c.password != "secret1")
            .returning(|_| Err(AuthenticationError::Rejected));
        Session::new(Arc::new(auth), Arc::new(MemoryMarkerStore::new()))
    }

    #[tokio::test]
    async fn replays_recorded_destination() {
        let session = session();
        let flow = LoginFlow::new();
        flow.record(NavTarget::path("/report"));

        let next = flow.submit(&session, &Credentials::new("op1", "secret1")).await.unwrap();
        assert_eq!(next, NavTarget::path("/report"));
        assert!(flow.pending().is_none());
    }

    #[tokio::test]
    async fn defaults_to_home() {
        let next = LoginFlow::new()
            .submit(&session(), &Credentials::new("op1", "secret1"))
            .await
            .unwrap();
        assert_eq!(next, NavTarget::name(HOME_ROUTE));
    }

    #[tokio::test]
    async fn failure_keeps_destination() {
        let session = session();
        let flow = LoginFlow::new();
        flow.record(NavTarget::name("alarm-query"));

        assert!(flow.submit(&session, &Credentials::new("op1", "badpass")).await.is_err());
        assert_eq!(flow.pending(), Some(NavTarget::name("alarm-query")));
    }

    #[test]
    fn logout_drops_destination() {
        let session = session();
        let flow = LoginFlow::new();
        flow.record(NavTarget::name("report"));

        flow.logout(&session);
        assert!(flow.pending().is_none());
    }
}
