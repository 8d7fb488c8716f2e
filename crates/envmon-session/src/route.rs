//! Route table: every view the console can show
//!
//! Names are stable identifiers shared with the navigation tree; paths are
//! what a user types or deep-links. Anything unknown resolves to
//! [`NOT_FOUND_ROUTE`].

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Dashboard landing view
pub const HOME_ROUTE: &str = "home";
/// Login view, the only view reachable without a session
pub const LOGIN_ROUTE: &str = "login";
/// Catch-all for unknown targets
pub const NOT_FOUND_ROUTE: &str = "error-404";

/// Page chrome a view is rendered with
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Sidebar and navbar
    #[default]
    Vertical,
    /// Bare page
    Full,
}

/// Single view definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteDef {
    /// Route name
    pub name: String,
    /// URL path, always starting with `/`
    pub path: String,
    /// Heading shown above the view
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_title: Option<String>,
    /// Page chrome
    #[serde(default)]
    pub layout: Layout,
    /// Breadcrumb trail, outermost first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub breadcrumb: Vec<String>,
}

impl RouteDef {
    /// Create vertical-layout route without title
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            page_title: None,
            layout: Layout::Vertical,
            breadcrumb: Vec::new(),
        }
    }

    /// With page title
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.page_title = Some(title.into());
        self
    }

    /// With layout
    #[must_use]
    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    /// With breadcrumb trail
    #[must_use]
    pub fn with_breadcrumb(mut self, trail: &[&str]) -> Self {
        self.breadcrumb = trail.iter().map(|s| (*s).to_string()).collect();
        self
    }

    /// Titled view under `section`; the title doubles as the last crumb
    fn page(name: &str, title: &str, section: Option<&str>) -> Self {
        let mut crumbs: Vec<&str> = section.into_iter().collect();
        crumbs.push(title);
        Self::new(name, format!("/{name}"))
            .with_title(title)
            .with_breadcrumb(&crumbs)
    }
}

/// Navigation request
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavTarget {
    /// By route name
    Name(String),
    /// By URL path, possibly with query or fragment
    Path(String),
}

impl NavTarget {
    /// Target by route name
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    /// Target by URL path
    pub fn path(path: impl Into<String>) -> Self {
        Self::Path(path.into())
    }
}

impl From<&str> for NavTarget {
    /// A leading `/` makes a path, anything else a route name
    fn from(s: &str) -> Self {
        if s.starts_with('/') {
            Self::path(s)
        } else {
            Self::name(s)
        }
    }
}

impl From<String> for NavTarget {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl fmt::Display for NavTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => write!(f, "{name}"),
            Self::Path(path) => write!(f, "{path}"),
        }
    }
}

/// Strip query, fragment and trailing slash
fn normalize_path(raw: &str) -> &str {
    let end = raw.find(['?', '#']).unwrap_or(raw.len());
    let trimmed = raw[..end].trim_end_matches('/');
    if trimmed.is_empty() {
        "/"
    } else {
        trimmed
    }
}

/// Known views plus the login and not-found fallbacks
#[derive(Debug, Clone)]
pub struct RouteTable {
    login: RouteDef,
    not_found: RouteDef,
    routes: IndexMap<String, RouteDef>,
}

impl RouteTable {
    /// Create table holding only the login and not-found views
    #[must_use]
    pub fn new() -> Self {
        Self {
            login: RouteDef::new(LOGIN_ROUTE, "/login").with_layout(Layout::Full),
            not_found: RouteDef::new(NOT_FOUND_ROUTE, "/error-404").with_layout(Layout::Full),
            routes: IndexMap::new(),
        }
    }

    /// Every view of the dashboard
    #[must_use]
    pub fn standard() -> Self {
        const QUERY: &str = "數據查詢";
        const REPORT: &str = "報表查詢";
        const ADMIN: &str = "系統管理";

        let home = RouteDef::new(HOME_ROUTE, "/")
            .with_title("儀表板")
            .with_breadcrumb(&["儀表板"]);

        [
            home,
            RouteDef::page("realtime-data", "即時資料", None),
            RouteDef::page("history-data", "歷史資料查詢", Some(QUERY)),
            RouteDef::page("history-trend", "歷史趨勢圖", Some(QUERY)),
            RouteDef::page("calibration-query", "校正查詢", Some(QUERY)),
            RouteDef::page("alarm-query", "警報查詢", Some(QUERY)),
            RouteDef::page("wind-rose-query", "玫瑰圖查詢", Some(QUERY)),
            RouteDef::page("earthquake-event-query", "地震事件查詢", Some(QUERY)),
            RouteDef::page("report", "監測報表", Some(REPORT)),
            RouteDef::page("instrument-management", "儀器管理", Some(ADMIN)),
            RouteDef::page("monitor-config", "測點管理", Some(ADMIN)),
            RouteDef::page("monitor-type-config", "測項管理", Some(ADMIN)),
            RouteDef::page("user-management", "使用者管理", Some(ADMIN)),
            RouteDef::page("group-management", "群組管理", Some(ADMIN)),
            RouteDef::page("data-management", "資料上傳", Some(ADMIN)),
            RouteDef::page("system-config", "參數設定", Some(ADMIN)),
        ]
        .into_iter()
        .fold(Self::new(), Self::with_route)
    }

    /// With route, replacing any route of the same name
    #[must_use]
    pub fn with_route(mut self, route: RouteDef) -> Self {
        match route.name.as_str() {
            LOGIN_ROUTE => self.login = route,
            NOT_FOUND_ROUTE => self.not_found = route,
            _ => {
                self.routes.insert(route.name.clone(), route);
            }
        }
        self
    }

    /// Login view
    #[inline]
    #[must_use]
    pub fn login(&self) -> &RouteDef {
        &self.login
    }

    /// Not-found view
    #[inline]
    #[must_use]
    pub fn not_found(&self) -> &RouteDef {
        &self.not_found
    }

    /// Route by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RouteDef> {
        match name {
            LOGIN_ROUTE => Some(&self.login),
            NOT_FOUND_ROUTE => Some(&self.not_found),
            _ => self.routes.get(name),
        }
    }

    /// Route by URL path
    #[must_use]
    pub fn by_path(&self, path: &str) -> Option<&RouteDef> {
        let path = normalize_path(path);
        self.iter().find(|r| r.path == path)
    }

    /// Resolve target, falling back to the not-found view
    #[must_use]
    pub fn resolve(&self, target: &NavTarget) -> &RouteDef {
        let found = match target {
            NavTarget::Name(name) => self.get(name),
            NavTarget::Path(path) => self.by_path(path),
        };
        found.unwrap_or(&self.not_found)
    }

    /// Check if a route name is known
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Views in registration order, then login and not-found
    pub fn iter(&self) -> impl Iterator<Item = &RouteDef> {
        self.routes
            .values()
            .chain([&self.login, &self.not_found])
    }

    /// Number of views including login and not-found
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len() + 2
    }

    /// Always false: login and not-found are always present
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use envmon_access::NavigationModel;

    #[test]
    fn standard_covers_the_sidebar() {
        let routes = RouteTable::standard();
        NavigationModel::standard()
            .validate(|name| routes.contains(name))
            .unwrap();
    }

    #[test]
    fn resolve_by_name_and_path() {
        let routes = RouteTable::standard();
        assert_eq!(routes.resolve(&"report".into()).path, "/report");
        assert_eq!(routes.resolve(&"/history-data?start=1".into()).name, "history-data");
        assert_eq!(routes.resolve(&"/report/".into()).name, "report");
        assert_eq!(routes.resolve(&"/".into()).name, HOME_ROUTE);
    }

    #[test]
    fn unknown_targets_fall_back() {
        let routes = RouteTable::standard();
        assert_eq!(routes.resolve(&"nope".into()).name, NOT_FOUND_ROUTE);
        assert_eq!(routes.resolve(&"/nope/deeper".into()).name, NOT_FOUND_ROUTE);
    }

    #[test]
    fn metadata() {
        let routes = RouteTable::standard();
        assert_eq!(routes.login().layout, Layout::Full);
        let trend = routes.get("history-trend").unwrap();
        assert_eq!(trend.page_title.as_deref(), Some("歷史趨勢圖"));
        assert_eq!(trend.breadcrumb, vec!["數據查詢", "歷史趨勢圖"]);
        assert_eq!(trend.layout, Layout::Vertical);
    }

    #[test]
    fn with_route_replaces() {
        let routes = RouteTable::new().with_route(RouteDef::new(LOGIN_ROUTE, "/sign-in"));
        assert_eq!(routes.resolve(&"/sign-in".into()).name, LOGIN_ROUTE);
        assert_eq!(routes.len(), 2);
    }

    #[test]
    fn normalize() {
        assert_eq!(normalize_path("/a/?x=1"), "/a");
        assert_eq!(normalize_path("/#top"), "/");
        assert_eq!(normalize_path(""), "/");
    }
}
