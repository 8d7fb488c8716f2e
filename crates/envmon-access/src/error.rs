//! Error types for the access layer
//!
//! Provides error handling for:
//! - Capability decoding (wire strings → closed enums)
//! - Group directory construction (duplicates, dangling parents, cycles)
//! - Navigation tree loading and route validation

/// Errors while decoding a capability from its string form
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CapabilityError {
    /// Action string is not one of the known actions
    #[error("unknown action: '{0}'")]
    UnknownAction(String),

    /// Resource (subject) string is not one of the known resources
    #[error("unknown resource: '{0}'")]
    UnknownResource(String),

    /// Textual form is not `action:resource`
    #[error("malformed capability '{0}': expected 'action:resource'")]
    Malformed(String),
}

/// Errors while building a [`GroupDirectory`](crate::group::GroupDirectory)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GroupError {
    /// Two groups share one identifier
    #[error("duplicate group id: {0}")]
    DuplicateGroup(String),

    /// A parent reference points at no known group
    #[error("group {group} references unknown parent {parent}")]
    UnknownParent { group: String, parent: String },

    /// Following parent references returns to a group already visited
    #[error("parent cycle detected: {path:?}")]
    ParentCycle { path: Vec<String> },
}

/// Errors while loading or validating a navigation tree
#[derive(Debug, thiserror::Error)]
pub enum NavigationError {
    /// Node requires a capability but only half of the pair is present
    #[error("menu entry '{title}' has an incomplete action/resource pair")]
    IncompleteRequirement { title: String },

    /// Node requirement could not be decoded
    #[error("menu entry '{title}': {source}")]
    InvalidRequirement {
        title: String,
        #[source]
        source: CapabilityError,
    },

    /// Node routes to a destination no view serves
    #[error("menu entry '{title}' routes to unknown destination '{route}'")]
    UnresolvedRoute { title: String, route: String },

    /// JSON document could not be parsed
    #[error("invalid navigation json: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML document could not be parsed
    #[error("invalid navigation toml: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result type alias for navigation operations
pub type NavigationResult<T> = Result<T, NavigationError>;
