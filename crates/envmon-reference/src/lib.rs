//! Envmon Reference Data
//!
//! Process-wide caches of the collections every view depends on: monitors,
//! monitor types, monitor-type groups and table names.
//!
//! # Core Operations
//!
//! - **load**: fetch the full collection and replace it wholesale
//! - **lookup**: O(1) access through an index derived once per snapshot
//! - **all**: the current read-only snapshot in fetch order
//!
//! # Example
//!
//! ```rust,ignore
//! use envmon_reference::ReferenceData;
//!
//! # async fn example(source: std::sync::Arc<dyn envmon_reference::CollectionSource>) {
//! let data = ReferenceData::new(source);
//! let report = data.load_all().await;
//!
//! if let Some(station) = data.monitors.lookup("M1") {
//!     println!("{}", station.desc);
//! }
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod error;
pub mod kind;
pub mod registry;
pub mod source;
pub mod store;
pub mod tables;

// Re-exports
pub use error::FetchError;
pub use kind::{
    Monitor, MonitorType, MonitorTypeGroup, MonitorTypeGroups, MonitorTypes, Monitors, ResourceKind,
    TableName, Tables, ThresholdConfig,
};
pub use registry::{LoadReport, ReferenceData};
pub use source::CollectionSource;
pub use store::{ReferenceStore, Snapshot};
pub use tables::{data_types, hour_data_types, DataType};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for reference data access
    pub use crate::{CollectionSource, FetchError, ReferenceData, ReferenceStore, ResourceKind};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
