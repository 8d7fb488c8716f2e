use envmon_access::{filter, is_permitted, Action, Capability, CapabilitySet, NavNode, NavigationModel, Resource};
use proptest::prelude::*;

fn arb_capability() -> impl Strategy<Value = Capability> {
    (0..Action::ALL.len(), 0..Resource::ALL.len())
        .prop_map(|(a, r)| Capability::new(Action::ALL[a], Resource::ALL[r]))
}

fn arb_leaf() -> impl Strategy<Value = NavNode> {
    (proptest::option::of(arb_capability()), "[a-z]{1,8}").prop_map(|(requires, title)| NavNode {
        route: Some(title.clone()),
        title,
        icon: None,
        requires,
        children: Vec::new(),
    })
}

fn arb_node() -> impl Strategy<Value = NavNode> {
    arb_leaf().prop_recursive(3, 32, 4, |inner| {
        (
            proptest::option::of(arb_capability()),
            proptest::collection::vec(inner, 1..4),
        )
            .prop_map(|(requires, children)| NavNode {
                title: "section".to_string(),
                route: None,
                icon: None,
                requires,
                children,
            })
    })
}

fn arb_model() -> impl Strategy<Value = NavigationModel> {
    proptest::collection::vec(arb_node(), 0..5).prop_map(NavigationModel::new)
}

fn arb_capabilities() -> impl Strategy<Value = CapabilitySet> {
    proptest::collection::vec(arb_capability(), 0..6).prop_map(|caps| caps.into_iter().collect())
}

fn leaves(model: &NavigationModel) -> Vec<NavNode> {
    let mut out = Vec::new();
    for section in &model.sections {
        section.walk(&mut |node| {
            if node.is_leaf() {
                out.push(node.clone());
            }
        });
    }
    out
}

proptest! {
    #[test]
    fn visible_leaves_are_exactly_the_permitted_ones(model in arb_model(), caps in arb_capabilities()) {
        let expected: Vec<NavNode> = leaves(&model)
            .into_iter()
            .filter(|leaf| is_permitted(leaf, &caps))
            .collect();

        let visible = filter(&model, &caps);
        prop_assert_eq!(leaves(&visible), expected);
    }

    #[test]
    fn every_visible_leaf_is_permitted(model in arb_model(), caps in arb_capabilities()) {
        let visible = filter(&model, &caps);
        for section in &visible.sections {
            section.walk(&mut |node| {
                if node.is_leaf() {
                    assert!(is_permitted(node, &caps), "unpermitted leaf {}", node.title);
                }
            });
        }
    }

    #[test]
    fn wildcard_keeps_the_whole_tree(model in arb_model()) {
        prop_assert_eq!(filter(&model, &CapabilitySet::wildcard()), model);
    }

    #[test]
    fn filtering_is_idempotent(model in arb_model(), caps in arb_capabilities()) {
        let once = filter(&model, &caps);
        let twice = filter(&once, &caps);
        prop_assert_eq!(once, twice);
    }
}
