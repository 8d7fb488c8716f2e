//! Static navigation tree
//!
//! The sidebar is configuration: a list of sections, each an ordered list of
//! entries. Entries may name a route and may require a capability. The tree is
//! built once and only read afterwards; [`crate::filter`] derives per-user
//! views from it.
//!
//! # Wire format
//!
//! ```json
//! [
//!   { "title": "數據查詢", "icon": "DatabaseIcon", "children": [
//!       { "title": "歷史資料查詢", "route": "history-data", "action": "read", "resource": "Data" }
//!   ] }
//! ]
//! ```

use crate::capability::{Action, Capability, Resource};
use crate::error::{NavigationError, NavigationResult};
use serde::{Deserialize, Serialize};

/// Menu entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawNavNode", into = "RawNavNode")]
pub struct NavNode {
    /// Label shown in the sidebar
    pub title: String,
    /// Route name; `None` renders as a non-navigable label
    pub route: Option<String>,
    /// Icon name
    pub icon: Option<String>,
    /// Capability required to see this entry
    pub requires: Option<Capability>,
    /// Child entries in display order
    pub children: Vec<NavNode>,
}

impl NavNode {
    /// Section header with no route
    pub fn section(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            route: None,
            icon: None,
            requires: None,
            children: Vec::new(),
        }
    }

    /// Leaf entry pointing at `route`
    pub fn leaf(title: impl Into<String>, route: impl Into<String>) -> Self {
        Self {
            route: Some(route.into()),
            ..Self::section(title)
        }
    }

    /// With icon
    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// With required capability
    #[must_use]
    pub fn requiring(mut self, action: Action, resource: Resource) -> Self {
        self.requires = Some(Capability::new(action, resource));
        self
    }

    /// With child entry appended
    #[must_use]
    pub fn child(mut self, node: NavNode) -> Self {
        self.children.push(node);
        self
    }

    /// Check whether the entry has no children
    #[inline]
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Visit this node and descendants depth-first, parents before children
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a NavNode)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }
}

/// Serialized shape of a [`NavNode`]
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawNavNode {
    title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    route: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    resource: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    children: Vec<NavNode>,
}

impl TryFrom<RawNavNode> for NavNode {
    type Error = NavigationError;

    fn try_from(raw: RawNavNode) -> Result<Self, Self::Error> {
        let requires = match (raw.action, raw.resource) {
            (None, None) => None,
            (Some(action), Some(resource)) => {
                let raw_cap = crate::capability::Ability::new(action, resource);
                let cap = Capability::try_from(raw_cap).map_err(|source| {
                    NavigationError::InvalidRequirement {
                        title: raw.title.clone(),
                        source,
                    }
                })?;
                Some(cap)
            }
            _ => {
                return Err(NavigationError::IncompleteRequirement { title: raw.title });
            }
        };

        Ok(NavNode {
            title: raw.title,
            route: raw.route,
            icon: raw.icon,
            requires,
            children: raw.children,
        })
    }
}

impl From<NavNode> for RawNavNode {
    fn from(node: NavNode) -> Self {
        let (action, resource) = match node.requires.map(crate::capability::Ability::from) {
            Some(raw) => (Some(raw.action), Some(raw.subject)),
            None => (None, None),
        };
        RawNavNode {
            title: node.title,
            route: node.route,
            icon: node.icon,
            action,
            resource,
            children: node.children,
        }
    }
}

/// Ordered list of top-level menu sections
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationModel {
    /// Top-level sections in display order
    pub sections: Vec<NavNode>,
}

impl NavigationModel {
    /// Create model from sections
    #[inline]
    #[must_use]
    pub fn new(sections: Vec<NavNode>) -> Self {
        Self { sections }
    }

    /// Built-in sidebar of the monitoring console
    #[must_use]
    pub fn standard() -> Self {
        use Action::Read;
        use Resource::{Dashboard, Data};

        Self::new(vec![
            NavNode::section("即時資訊")
                .with_icon("ActivityIcon")
                .child(NavNode::leaf("儀錶板", "home").requiring(Read, Dashboard))
                .child(NavNode::leaf("即時數據", "realtime-data").requiring(Read, Dashboard)),
            NavNode::section("數據查詢")
                .with_icon("DatabaseIcon")
                .child(NavNode::leaf("歷史資料查詢", "history-data").requiring(Read, Data))
                .child(NavNode::leaf("歷史趨勢圖", "history-trend").requiring(Read, Data))
                .child(NavNode::leaf("警報記錄查詢", "alarm-query").requiring(Read, Data)),
            NavNode::section("報表查詢")
                .with_icon("BookOpenIcon")
                .child(NavNode::leaf("監測報表", "report").requiring(Read, Data)),
            NavNode::section("系統管理")
                .with_icon("SettingsIcon")
                .child(NavNode::leaf("儀器管理", "instrument-management"))
                .child(NavNode::leaf("測點管理", "monitor-config"))
                .child(NavNode::leaf("測項管理", "monitor-type-config"))
                .child(NavNode::leaf("使用者管理", "user-management"))
                .child(NavNode::leaf("群組管理", "group-management"))
                .child(NavNode::leaf("資料上傳", "data-management"))
                .child(NavNode::leaf("參數設定", "system-config")),
        ])
    }

    /// Parse a JSON array of sections
    ///
    /// # Errors
    /// Returns `NavigationError` on malformed JSON or invalid requirements
    pub fn from_json(json: &str) -> NavigationResult<Self> {
        let sections: Vec<NavNode> = serde_json::from_str(json)?;
        Ok(Self::new(sections))
    }

    /// Parse a TOML document with `[[sections]]` tables
    ///
    /// # Errors
    /// Returns `NavigationError` on malformed TOML or invalid requirements
    pub fn from_toml(toml_str: &str) -> NavigationResult<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Check that every route names a known destination
    ///
    /// # Errors
    /// Returns `NavigationError::UnresolvedRoute` for the first unknown route
    pub fn validate(&self, is_known_route: impl Fn(&str) -> bool) -> NavigationResult<()> {
        let mut unresolved = None;
        for section in &self.sections {
            section.walk(&mut |node| {
                if unresolved.is_some() {
                    return;
                }
                if let Some(route) = node.route.as_deref() {
                    if !is_known_route(route) {
                        unresolved = Some(NavigationError::UnresolvedRoute {
                            title: node.title.clone(),
                            route: route.to_string(),
                        });
                    }
                }
            });
        }
        unresolved.map_or(Ok(()), Err)
    }

    /// Route names in display order
    #[must_use]
    pub fn routes(&self) -> Vec<&str> {
        let mut out = Vec::new();
        for section in &self.sections {
            section.walk(&mut |node| {
                if let Some(route) = node.route.as_deref() {
                    out.push(route);
                }
            });
        }
        out
    }

    /// Total number of nodes
    #[must_use]
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        for section in &self.sections {
            section.walk(&mut |_| count += 1);
        }
        count
    }

    /// Check if the model has no sections
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn standard_tree_shape() {
        let model = NavigationModel::standard();
        let titles: Vec<_> = model.sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["即時資訊", "數據查詢", "報表查詢", "系統管理"]);
        assert_eq!(model.routes().first(), Some(&"home"));
        assert_eq!(model.node_count(), 17);
    }

    #[test]
    fn json_matches_menu_file_shape() {
        let json = r#"[
            { "title": "數據查詢", "icon": "DatabaseIcon", "children": [
                { "title": "歷史資料查詢", "route": "history-data", "action": "read", "resource": "Data" },
                { "title": "校正查詢", "route": "calibration-query" }
            ] }
        ]"#;
        let model = NavigationModel::from_json(json).unwrap();
        let section = &model.sections[0];
        assert_eq!(section.icon.as_deref(), Some("DatabaseIcon"));
        assert_eq!(
            section.children[0].requires,
            Some(Capability::new(Action::Read, Resource::Data))
        );
        assert_eq!(section.children[1].requires, None);
    }

    #[test]
    fn json_round_trip_keeps_flat_pair() {
        let node = NavNode::leaf("警報", "alarm-query").requiring(Action::Set, Resource::Alarm);
        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(value["action"], "set");
        assert_eq!(value["resource"], "Alarm");
        assert!(value.get("children").is_none());
    }

    #[test]
    fn half_requirement_is_rejected() {
        let json = r#"[{ "title": "壞", "route": "home", "action": "read" }]"#;
        let err = NavigationModel::from_json(json).unwrap_err();
        assert!(err.to_string().contains("incomplete"), "{err}");
    }

    #[test]
    fn unknown_resource_is_rejected() {
        let json = r#"[{ "title": "壞", "route": "home", "action": "read", "resource": "Weather" }]"#;
        assert!(NavigationModel::from_json(json).is_err());
    }

    #[test]
    fn toml_sections() {
        let doc = r#"
            [[sections]]
            title = "數據查詢"
            icon = "DatabaseIcon"

            [[sections.children]]
            title = "風花圖查詢"
            route = "wind-rose-query"
            action = "read"
            resource = "Data"
        "#;
        let model = NavigationModel::from_toml(doc).unwrap();
        assert_eq!(model.routes(), vec!["wind-rose-query"]);
    }

    #[test]
    fn validate_reports_unknown_route() {
        let model = NavigationModel::standard();
        assert!(model.validate(|_| true).is_ok());

        let err = model.validate(|route| route != "report").unwrap_err();
        assert!(matches!(
            err,
            NavigationError::UnresolvedRoute { ref route, .. } if route == "report"
        ));
    }
}
