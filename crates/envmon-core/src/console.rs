//! Console facade
//!
//! Wires the session gate, the sidebar and the reference stores around one
//! pair of external services. Presentation layers talk to this and nothing
//! else.

use crate::config::ConsoleConfig;
use crate::error::{ConfigError, ConsoleResult};
use crate::http::HttpApi;
use envmon_access::{filter, NavigationModel};
use envmon_reference::{CollectionSource, ReferenceData};
use envmon_session::{
    AuthService, Credentials, LoginFlow, MarkerStore, NavTarget, NavigationOutcome, RouteGuard,
    RouteTable, Session, SessionView, User,
};
use std::path::Path;
use std::sync::Arc;

/// Monitoring console core
#[derive(Debug)]
pub struct Console {
    session: Session,
    guard: RouteGuard,
    login_flow: LoginFlow,
    reference: ReferenceData,
    navigation: NavigationModel,
}

impl Console {
    /// Create console with the built-in routes and sidebar
    ///
    /// The session is restored from `marker`.
    pub fn new(
        auth: Arc<dyn AuthService>,
        source: Arc<dyn CollectionSource>,
        marker: Arc<dyn MarkerStore>,
    ) -> Self {
        Self {
            session: Session::restore(auth, marker),
            guard: RouteGuard::new(Arc::new(RouteTable::standard())),
            login_flow: LoginFlow::new(),
            reference: ReferenceData::new(source),
            navigation: NavigationModel::standard(),
        }
    }

    /// Create console talking HTTP as configured
    ///
    /// # Errors
    /// Returns `ConsoleError` when the base URL is invalid, the HTTP client
    /// cannot be built or the navigation file is unreadable or references an
    /// unknown route
    pub fn from_config(config: &ConsoleConfig) -> ConsoleResult<Self> {
        let api = Arc::new(HttpApi::from_config(&config.api)?);
        let console = Self::new(api.clone(), api, config.marker.build());
        tracing::info!(base_url = %config.api.base_url, "console configured");

        match &config.navigation {
            Some(path) => console.with_navigation(load_navigation(path)?),
            None => Ok(console),
        }
    }

    /// With sidebar tree; every route in it must be known
    ///
    /// # Errors
    /// Returns `ConsoleError::Navigation` naming the first unknown route
    pub fn with_navigation(mut self, navigation: NavigationModel) -> ConsoleResult<Self> {
        let routes = self.guard.routes();
        navigation.validate(|name| routes.contains(name))?;
        self.navigation = navigation;
        Ok(self)
    }

    /// With route table; the sidebar is re-checked against it
    ///
    /// # Errors
    /// Returns `ConsoleError::Navigation` when the current sidebar names a
    /// route the new table lacks
    pub fn with_routes(mut self, routes: RouteTable) -> ConsoleResult<Self> {
        self.navigation.validate(|name| routes.contains(name))?;
        self.guard = RouteGuard::new(Arc::new(routes));
        Ok(self)
    }

    /// Run the guard for `target`, remembering denied destinations
    pub fn navigate(&self, target: impl Into<NavTarget>) -> NavigationOutcome {
        let outcome = self.guard.check(&self.session, &target.into());
        self.login_flow.observe(&outcome);
        outcome
    }

    /// Log in and navigate to the remembered destination or home
    ///
    /// # Errors
    /// Returns `ConsoleError::Session` when the login fails; the session
    /// and the remembered destination are left unchanged
    pub async fn login(&self, credentials: &Credentials) -> ConsoleResult<NavigationOutcome> {
        let next = self.login_flow.submit(&self.session, credentials).await?;
        Ok(self.navigate(next))
    }

    /// Log out; always succeeds
    pub fn logout(&self) {
        self.login_flow.logout(&self.session);
    }

    /// Sidebar for the current principal
    #[must_use]
    pub fn sidebar(&self) -> NavigationModel {
        filter(&self.navigation, &self.session.current_capabilities())
    }

    /// Check if someone is logged in
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// Current principal
    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.session.current_user()
    }

    /// Shared reference stores
    #[inline]
    #[must_use]
    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    /// Load every reference store that has not loaded yet
    ///
    /// # Errors
    /// Returns `ConsoleError::Fetch` with the first failure, in store order.
    /// Stores that did load keep their data.
    pub async fn ensure_reference(&self) -> ConsoleResult<()> {
        let reference = &self.reference;
        let (monitors, monitor_types, monitor_type_groups, tables) = tokio::join!(
            reference.monitors.ensure_loaded(),
            reference.monitor_types.ensure_loaded(),
            reference.monitor_type_groups.ensure_loaded(),
            reference.tables.ensure_loaded(),
        );
        monitors.and(monitor_types).and(monitor_type_groups).and(tables)?;
        Ok(())
    }

    /// Session state
    #[inline]
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Route table
    #[inline]
    #[must_use]
    pub fn routes(&self) -> &RouteTable {
        self.guard.routes()
    }

    /// Unfiltered sidebar tree
    #[inline]
    #[must_use]
    pub fn navigation(&self) -> &NavigationModel {
        &self.navigation
    }

    /// Destination waiting for a login
    #[must_use]
    pub fn pending_destination(&self) -> Option<NavTarget> {
        self.login_flow.pending()
    }
}

/// Read a navigation tree; `.toml` files as TOML, anything else as JSON
///
/// # Errors
/// Returns `ConsoleError` when the file cannot be read or parsed
pub fn load_navigation(path: &Path) -> ConsoleResult<NavigationModel> {
    let text = std::fs::read_to_string(path).map_err(|e| ConfigError::io_error(path, e))?;
    let model = if path.extension().is_some_and(|ext| ext == "toml") {
        NavigationModel::from_toml(&text)?
    } else {
        NavigationModel::from_json(&text)?
    };
    tracing::info!(path = %path.display(), nodes = model.node_count(), "navigation loaded");
    Ok(model)
}
