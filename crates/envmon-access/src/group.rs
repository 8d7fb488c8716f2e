//! User groups and the parent lookup table
//!
//! A [`Group`] refers to its parent by identifier only. [`GroupDirectory`]
//! owns every group and resolves those references; it refuses to build when a
//! parent is missing or when following parents would loop.

use crate::capability::{Ability, Capability, CapabilitySet};
use crate::error::GroupError;
use indexmap::IndexMap;
use petgraph::algo::{is_cyclic_directed, kosaraju_scc};
use petgraph::graphmap::DiGraphMap;
use serde::{Deserialize, Serialize};

/// Group of users sharing monitor visibility and capabilities
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Group identifier
    #[serde(rename = "_id")]
    pub id: String,
    /// Display name
    pub name: String,
    /// Monitors visible to members
    #[serde(default)]
    pub monitors: Vec<String>,
    /// Monitor types visible to members
    #[serde(default, rename = "monitorTypes")]
    pub monitor_types: Vec<String>,
    /// Members are administrators
    #[serde(default)]
    pub admin: bool,
    /// Raw abilities granted to members
    #[serde(default)]
    pub abilities: Vec<Ability>,
    /// Parent group identifier (relation only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

impl Group {
    /// Create group with no members, abilities or parent
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            monitors: Vec::new(),
            monitor_types: Vec::new(),
            admin: false,
            abilities: Vec::new(),
            parent: None,
        }
    }

    /// With parent reference
    #[must_use]
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// With ability
    #[must_use]
    pub fn with_ability(mut self, cap: Capability) -> Self {
        self.abilities.push(cap.into());
        self
    }

    /// With administrator flag
    #[must_use]
    pub fn with_admin(mut self, admin: bool) -> Self {
        self.admin = admin;
        self
    }

    /// Decoded capabilities, plus the wildcard for administrator groups
    #[must_use]
    pub fn capabilities(&self) -> CapabilitySet {
        let mut caps = CapabilitySet::from_abilities(&self.abilities);
        if self.admin {
            caps.insert(Capability::All);
        }
        caps
    }
}

/// Lookup table of groups keyed by identifier
#[derive(Debug, Clone, Default)]
pub struct GroupDirectory {
    groups: IndexMap<String, Group>,
}

impl GroupDirectory {
    /// Build directory, validating parent references
    ///
    /// # Errors
    /// - `GroupError::DuplicateGroup` if two groups share an id
    /// - `GroupError::UnknownParent` if a parent id is not in the input
    /// - `GroupError::ParentCycle` if a parent chain loops
    pub fn new(groups: impl IntoIterator<Item = Group>) -> Result<Self, GroupError> {
        let mut table = IndexMap::new();
        for group in groups {
            if table.contains_key(&group.id) {
                return Err(GroupError::DuplicateGroup(group.id));
            }
            table.insert(group.id.clone(), group);
        }

        for group in table.values() {
            if let Some(parent) = &group.parent {
                if !table.contains_key(parent) {
                    return Err(GroupError::UnknownParent {
                        group: group.id.clone(),
                        parent: parent.clone(),
                    });
                }
            }
        }

        let directory = Self { groups: table };
        directory.reject_cycles()?;
        Ok(directory)
    }

    /// Every group has at most one parent, so each strongly connected
    /// component that is not a lone node is exactly one cycle.
    fn reject_cycles(&self) -> Result<(), GroupError> {
        let mut graph = DiGraphMap::<&str, ()>::new();
        for group in self.groups.values() {
            graph.add_node(group.id.as_str());
            if let Some(parent) = &group.parent {
                graph.add_edge(group.id.as_str(), parent.as_str(), ());
            }
        }
        if !is_cyclic_directed(&graph) {
            return Ok(());
        }

        let Some(component) = kosaraju_scc(&graph).into_iter().find(|members| {
            members.len() > 1 || members.first().is_some_and(|&id| graph.contains_edge(id, id))
        }) else {
            return Ok(());
        };
        let Some(start) = self
            .groups
            .keys()
            .find(|id| component.contains(&id.as_str()))
        else {
            return Ok(());
        };

        let mut path = vec![start.clone()];
        let mut current = start.as_str();
        while let Some(parent) = self.groups.get(current).and_then(|g| g.parent.as_deref()) {
            path.push(parent.to_string());
            if parent == start.as_str() {
                break;
            }
            current = parent;
        }
        Err(GroupError::ParentCycle { path })
    }

    /// Get group by id
    #[inline]
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Group> {
        self.groups.get(id)
    }

    /// Get parent of group
    #[must_use]
    pub fn parent(&self, id: &str) -> Option<&Group> {
        self.get(id)
            .and_then(|g| g.parent.as_deref())
            .and_then(|p| self.get(p))
    }

    /// Ancestors of group, nearest first
    #[must_use]
    pub fn ancestors(&self, id: &str) -> Vec<&Group> {
        let mut out = Vec::new();
        let mut current = self.parent(id);
        while let Some(group) = current {
            out.push(group);
            current = self.parent(&group.id);
        }
        out
    }

    /// Direct children of group, in insertion order
    #[must_use]
    pub fn children(&self, id: &str) -> Vec<&Group> {
        self.groups
            .values()
            .filter(|g| g.parent.as_deref() == Some(id))
            .collect()
    }

    /// Iterate groups in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Group> {
        self.groups.values()
    }

    /// Number of groups
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Check if directory is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
