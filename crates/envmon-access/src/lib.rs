//! Envmon Access Layer
//!
//! Who may see what in the monitoring console.
//!
//! # Overview
//!
//! - **Capability**: closed `(action, resource)` pairs plus an administrator wildcard
//! - **GroupDirectory**: groups with validated, acyclic parent references
//! - **NavigationModel**: the static sidebar tree
//! - **filter**: the capability-restricted view of that tree
//!
//! # Example
//!
//! ```rust
//! use envmon_access::{filter, Action, Capability, CapabilitySet, NavigationModel, Resource};
//!
//! let caps: CapabilitySet = [Capability::new(Action::Read, Resource::Data)].into_iter().collect();
//! let sidebar = filter(&NavigationModel::standard(), &caps);
//!
//! assert!(sidebar.routes().contains(&"history-data"));
//! assert!(!sidebar.routes().contains(&"home"));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod capability;
pub mod error;
pub mod filter;
pub mod group;
pub mod navigation;

// Re-exports
pub use capability::{Ability, Action, Capability, CapabilitySet, Resource};
pub use error::{CapabilityError, GroupError, NavigationError, NavigationResult};
pub use filter::{filter, filter_node, is_permitted};
pub use group::{Group, GroupDirectory};
pub use navigation::{NavNode, NavigationModel};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for access checks
    pub use crate::{
        filter, Action, Capability, CapabilitySet, Group, GroupDirectory, NavNode, NavigationModel,
        Resource,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
