//! Capability-restricted view of the navigation tree
//!
//! Rules:
//! - a leaf is visible iff it requires nothing or its requirement is permitted
//! - a branch is visible iff at least one child survives; branches left empty
//!   are pruned regardless of their own requirement
//! - surviving siblings keep their source order
//!
//! Filtering affects menu visibility only. Whether a route can be entered is
//! decided by the route guard.

use crate::capability::CapabilitySet;
use crate::navigation::{NavNode, NavigationModel};

/// Derive the part of `model` visible to a holder of `capabilities`
#[must_use]
pub fn filter(model: &NavigationModel, capabilities: &CapabilitySet) -> NavigationModel {
    let sections = model
        .sections
        .iter()
        .filter_map(|section| filter_node(section, capabilities))
        .collect();
    NavigationModel::new(sections)
}

/// Filter a single node; `None` when it is hidden
#[must_use]
pub fn filter_node(node: &NavNode, capabilities: &CapabilitySet) -> Option<NavNode> {
    if node.is_leaf() {
        return is_permitted(node, capabilities).then(|| node.clone());
    }

    let children: Vec<NavNode> = node
        .children
        .iter()
        .filter_map(|child| filter_node(child, capabilities))
        .collect();

    if children.is_empty() {
        return None;
    }

    Some(NavNode {
        title: node.title.clone(),
        route: node.route.clone(),
        icon: node.icon.clone(),
        requires: node.requires,
        children,
    })
}

/// Check the node's own requirement, ignoring descendants
#[inline]
#[must_use]
pub fn is_permitted(node: &NavNode, capabilities: &CapabilitySet) -> bool {
    node.requires
        .as_ref()
        .map_or(true, |required| capabilities.permits(required))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::{Action, Capability, Resource};
    use pretty_assertions::assert_eq;

    fn caps(list: &[(Action, Resource)]) -> CapabilitySet {
        list.iter().map(|&(a, r)| Capability::new(a, r)).collect()
    }

    fn query_section() -> NavigationModel {
        NavigationModel::new(vec![NavNode::section("數據查詢")
            .child(NavNode::leaf("歷史資料查詢", "history-data").requiring(Action::Read, Resource::Data))
            .child(NavNode::leaf("警報設定", "alarm-query").requiring(Action::Set, Resource::Alarm))])
    }

    #[test]
    fn keeps_only_permitted_child() {
        let visible = filter(&query_section(), &caps(&[(Action::Read, Resource::Data)]));

        assert_eq!(visible.sections.len(), 1);
        assert_eq!(visible.routes(), vec!["history-data"]);
    }

    #[test]
    fn prunes_section_with_no_visible_children() {
        let visible = filter(&query_section(), &caps(&[(Action::Read, Resource::Dashboard)]));
        assert!(visible.is_empty());
    }

    #[test]
    fn wildcard_sees_everything() {
        let model = NavigationModel::standard();
        let visible = filter(&model, &CapabilitySet::wildcard());
        assert_eq!(visible, model);
    }

    #[test]
    fn empty_capabilities_see_unguarded_entries() {
        let visible = filter(&NavigationModel::standard(), &CapabilitySet::new());
        let titles: Vec<_> = visible.sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["系統管理"]);
        assert_eq!(visible.sections[0].children.len(), 7);
    }

    #[test]
    fn guarded_branch_with_route_and_no_survivors_is_hidden() {
        let model = NavigationModel::new(vec![NavNode::leaf("報表", "report")
            .requiring(Action::Read, Resource::Report)
            .child(NavNode::leaf("月報", "report").requiring(Action::Read, Resource::Data))]);

        let visible = filter(&model, &caps(&[(Action::Read, Resource::Dashboard)]));
        assert!(visible.is_empty());
    }

    #[test]
    fn sibling_order_is_preserved() {
        let model = NavigationModel::standard();
        let visible = filter(
            &model,
            &caps(&[(Action::Read, Resource::Data), (Action::Read, Resource::Dashboard)]),
        );
        let expected: Vec<_> = model.routes();
        assert_eq!(visible.routes(), expected);
    }

    #[test]
    fn source_tree_is_untouched() {
        let model = NavigationModel::standard();
        let before = model.clone();
        let _ = filter(&model, &CapabilitySet::new());
        assert_eq!(model, before);
    }
}
