//! Route guard
//!
//! Runs on every navigation, before any view is built. The only inputs are
//! the route table and the synchronous session flag.

use crate::route::{NavTarget, RouteDef, RouteTable};
use crate::session::SessionView;
use std::sync::Arc;

/// Guard decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// Render the resolved view
    Proceed(RouteDef),
    /// Show the login view instead; `requested` is what was asked for
    Redirect {
        /// Login view
        to: RouteDef,
        /// Target as requested
        requested: NavTarget,
    },
}

impl NavigationOutcome {
    /// View that will actually be shown
    #[must_use]
    pub fn route(&self) -> &RouteDef {
        match self {
            Self::Proceed(route) | Self::Redirect { to: route, .. } => route,
        }
    }

    /// Check if navigation was redirected
    #[inline]
    #[must_use]
    pub fn is_redirect(&self) -> bool {
        matches!(self, Self::Redirect { .. })
    }
}

/// Session gate in front of every view
#[derive(Debug, Clone)]
pub struct RouteGuard {
    routes: Arc<RouteTable>,
}

impl RouteGuard {
    /// Create guard over `routes`
    #[must_use]
    pub fn new(routes: Arc<RouteTable>) -> Self {
        Self { routes }
    }

    /// Route table in use
    #[inline]
    #[must_use]
    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Decide a navigation attempt
    ///
    /// Unknown targets resolve to the not-found view first, so they are
    /// gated like any other view.
    pub fn check(&self, session: &dyn SessionView, target: &NavTarget) -> NavigationOutcome {
        let route = self.routes.resolve(target);
        let login = self.routes.login();

        if route.name == login.name || session.is_authenticated() {
            tracing::debug!(%target, route = %route.name, "navigation allowed");
            NavigationOutcome::Proceed(route.clone())
        } else {
            tracing::debug!(%target, "navigation redirected to login");
            NavigationOutcome::Redirect {
                to: login.clone(),
                requested: target.clone(),
            }
        }
    }
}
