//! Capability (ability) model
//!
//! A capability grants permission to perform an [`Action`] on entities tagged
//! with a [`Resource`]. Administrators hold the single wildcard
//! [`Capability::All`], which satisfies every check.
//!
//! On the wire an ability is `{ "action": "read", "subject": "Data" }`.
//! `{ "action": "manage", "subject": "all" }` is the wildcard.

use crate::error::CapabilityError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Action half of a capability
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Action {
    /// View entities
    Read,
    /// Create entities
    Create,
    /// Modify entities
    Update,
    /// Remove entities
    Delete,
    /// Change settings (alarm levels, thresholds)
    Set,
    /// Every action on the resource
    Manage,
}

impl Action {
    /// All actions, in declaration order
    pub const ALL: [Action; 6] = [
        Action::Read,
        Action::Create,
        Action::Update,
        Action::Delete,
        Action::Set,
        Action::Manage,
    ];

    /// Wire name
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Read => "read",
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::Set => "set",
            Action::Manage => "manage",
        }
    }
}

impl FromStr for Action {
    type Err = CapabilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| CapabilityError::UnknownAction(s.to_string()))
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resource (subject) half of a capability
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Resource {
    /// Dashboard and realtime views
    Dashboard,
    /// Historical data queries
    Data,
    /// Alarm configuration
    Alarm,
    /// Monitoring reports
    Report,
    /// Calibration records
    Calibration,
    /// Monitoring stations
    Monitor,
    /// Measured quantities
    MonitorType,
    /// User accounts
    User,
    /// User groups
    Group,
    /// System parameters
    System,
}

impl Resource {
    /// All resources, in declaration order
    pub const ALL: [Resource; 10] = [
        Resource::Dashboard,
        Resource::Data,
        Resource::Alarm,
        Resource::Report,
        Resource::Calibration,
        Resource::Monitor,
        Resource::MonitorType,
        Resource::User,
        Resource::Group,
        Resource::System,
    ];

    /// Wire name
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Resource::Dashboard => "Dashboard",
            Resource::Data => "Data",
            Resource::Alarm => "Alarm",
            Resource::Report => "Report",
            Resource::Calibration => "Calibration",
            Resource::Monitor => "Monitor",
            Resource::MonitorType => "MonitorType",
            Resource::User => "User",
            Resource::Group => "Group",
            Resource::System => "System",
        }
    }
}

impl FromStr for Resource {
    type Err = CapabilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Resource::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| CapabilityError::UnknownResource(s.to_string()))
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const WILDCARD_SUBJECT: &str = "all";

/// Permission pair held by a principal
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Ability", into = "Ability")]
pub enum Capability {
    /// Exact `(action, resource)` grant
    Grant {
        /// Permitted action
        action: Action,
        /// Resource the action applies to
        resource: Resource,
    },
    /// Wildcard held by administrators
    All,
}

impl Capability {
    /// Create an exact grant
    #[inline]
    #[must_use]
    pub const fn new(action: Action, resource: Resource) -> Self {
        Capability::Grant { action, resource }
    }

    /// Check whether holding `self` satisfies `required`
    #[inline]
    #[must_use]
    pub fn satisfies(&self, required: &Capability) -> bool {
        matches!(self, Capability::All) || self == required
    }
}

impl FromStr for Capability {
    type Err = CapabilityError;

    /// Parse `action:resource`, or `manage:all` for the wildcard
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (action, subject) = s
            .split_once(':')
            .ok_or_else(|| CapabilityError::Malformed(s.to_string()))?;
        Capability::try_from(Ability::new(action.trim(), subject.trim()))
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Grant { action, resource } => write!(f, "{action}:{resource}"),
            Capability::All => write!(f, "{}:{WILDCARD_SUBJECT}", Action::Manage),
        }
    }
}

/// Raw ability as exchanged with the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ability {
    /// Action string
    pub action: String,
    /// Resource string
    pub subject: String,
}

impl Ability {
    /// Create raw ability
    pub fn new(action: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            subject: subject.into(),
        }
    }
}

impl TryFrom<Ability> for Capability {
    type Error = CapabilityError;

    fn try_from(raw: Ability) -> Result<Self, Self::Error> {
        let action: Action = raw.action.parse()?;
        if raw.subject == WILDCARD_SUBJECT {
            return if action == Action::Manage {
                Ok(Capability::All)
            } else {
                Err(CapabilityError::UnknownResource(raw.subject))
            };
        }
        let resource: Resource = raw.subject.parse()?;
        Ok(Capability::Grant { action, resource })
    }
}

impl From<Capability> for Ability {
    fn from(cap: Capability) -> Self {
        match cap {
            Capability::Grant { action, resource } => Ability::new(action.as_str(), resource.as_str()),
            Capability::All => Ability::new(Action::Manage.as_str(), WILDCARD_SUBJECT),
        }
    }
}

/// Set of capabilities held by a principal
///
/// Duplicates collapse under `(action, resource)` identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapabilitySet {
    inner: BTreeSet<Capability>,
}

impl CapabilitySet {
    /// Create empty set
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set holding only the wildcard
    #[must_use]
    pub fn wildcard() -> Self {
        std::iter::once(Capability::All).collect()
    }

    /// Decode raw abilities, skipping (and logging) the ones that fail
    pub fn from_abilities<'a>(abilities: impl IntoIterator<Item = &'a Ability>) -> Self {
        abilities
            .into_iter()
            .filter_map(|raw| match Capability::try_from(raw.clone()) {
                Ok(cap) => Some(cap),
                Err(err) => {
                    tracing::warn!(action = %raw.action, subject = %raw.subject, "skipping ability: {err}");
                    None
                }
            })
            .collect()
    }

    /// Add capability; returns false if it was already present
    #[inline]
    pub fn insert(&mut self, cap: Capability) -> bool {
        self.inner.insert(cap)
    }

    /// Check whether the set satisfies `required`
    #[must_use]
    pub fn permits(&self, required: &Capability) -> bool {
        self.is_wildcard() || self.inner.contains(required)
    }

    /// Check whether the set contains the wildcard
    #[inline]
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        self.inner.contains(&Capability::All)
    }

    /// Union of two sets
    #[must_use]
    pub fn union(&self, other: &CapabilitySet) -> CapabilitySet {
        self.inner.union(&other.inner).copied().collect()
    }

    /// Iterate capabilities in canonical order
    pub fn iter(&self) -> impl Iterator<Item = &Capability> {
        self.inner.iter()
    }

    /// Number of distinct capabilities
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Check if set is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl FromIterator<Capability> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().collect(),
        }
    }
}

impl Extend<Capability> for CapabilitySet {
    fn extend<I: IntoIterator<Item = Capability>>(&mut self, iter: I) {
        self.inner.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_grant() {
        let cap: Capability = "read:Data".parse().unwrap();
        assert_eq!(cap, Capability::new(Action::Read, Resource::Data));
        assert_eq!(cap.to_string(), "read:Data");
    }

    #[test]
    fn parse_wildcard() {
        let cap: Capability = "manage:all".parse().unwrap();
        assert_eq!(cap, Capability::All);
        assert_eq!(cap.to_string(), "manage:all");
    }

    #[test]
    fn wildcard_subject_requires_manage() {
        let err = "read:all".parse::<Capability>().unwrap_err();
        assert_eq!(err, CapabilityError::UnknownResource("all".into()));
    }

    #[test]
    fn parse_rejects_malformed() {
        assert!(matches!(
            "readData".parse::<Capability>(),
            Err(CapabilityError::Malformed(_))
        ));
        assert!(matches!(
            "fly:Data".parse::<Capability>(),
            Err(CapabilityError::UnknownAction(_))
        ));
    }

    #[test]
    fn json_wire_shape() {
        let cap = Capability::new(Action::Set, Resource::Alarm);
        let json = serde_json::to_value(cap).unwrap();
        assert_eq!(json, serde_json::json!({"action": "set", "subject": "Alarm"}));

        let back: Capability = serde_json::from_value(json).unwrap();
        assert_eq!(back, cap);
    }

    #[test]
    fn duplicates_collapse() {
        let set: CapabilitySet = [
            Capability::new(Action::Read, Resource::Data),
            Capability::new(Action::Read, Resource::Data),
        ]
        .into_iter()
        .collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn wildcard_permits_everything() {
        let set = CapabilitySet::wildcard();
        for action in Action::ALL {
            for resource in Resource::ALL {
                assert!(set.permits(&Capability::new(action, resource)));
            }
        }
    }

    #[test]
    fn exact_match_only() {
        let set: CapabilitySet = [Capability::new(Action::Read, Resource::Data)].into_iter().collect();
        assert!(set.permits(&Capability::new(Action::Read, Resource::Data)));
        assert!(!set.permits(&Capability::new(Action::Set, Resource::Data)));
        assert!(!set.permits(&Capability::new(Action::Read, Resource::Alarm)));
        assert!(!set.permits(&Capability::All));
    }

    #[test]
    fn from_abilities_skips_unknown() {
        let raw = [
            Ability::new("read", "Data"),
            Ability::new("read", "Weather"),
            Ability::new("manage", "all"),
        ];
        let set = CapabilitySet::from_abilities(&raw);
        assert_eq!(set.len(), 2);
        assert!(set.is_wildcard());
    }
}
