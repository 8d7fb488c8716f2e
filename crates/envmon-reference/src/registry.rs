//! The set of stores every view draws from

use crate::error::FetchError;
use crate::kind::{MonitorTypeGroups, MonitorTypes, Monitors, ResourceKind, Tables};
use crate::source::CollectionSource;
use crate::store::ReferenceStore;
use std::sync::Arc;

/// Reference stores sharing one source
#[derive(Debug, Clone)]
pub struct ReferenceData {
    /// Monitoring stations
    pub monitors: ReferenceStore<Monitors>,
    /// Measured quantities
    pub monitor_types: ReferenceStore<MonitorTypes>,
    /// Groups of measured quantities
    pub monitor_type_groups: ReferenceStore<MonitorTypeGroups>,
    /// Data table names
    pub tables: ReferenceStore<Tables>,
}

impl ReferenceData {
    /// Create empty stores over `source`
    #[must_use]
    pub fn new(source: Arc<dyn CollectionSource>) -> Self {
        Self {
            monitors: ReferenceStore::new(Arc::clone(&source)),
            monitor_types: ReferenceStore::new(Arc::clone(&source)),
            monitor_type_groups: ReferenceStore::new(Arc::clone(&source)),
            tables: ReferenceStore::new(source),
        }
    }

    /// Load every store concurrently
    ///
    /// A failing resource does not stop the others.
    pub async fn load_all(&self) -> LoadReport {
        let (monitors, monitor_types, monitor_type_groups, tables) = futures::join!(
            self.monitors.load(),
            self.monitor_types.load(),
            self.monitor_type_groups.load(),
            self.tables.load(),
        );

        let report = LoadReport {
            outcomes: vec![
                (Monitors::NAME, monitors),
                (MonitorTypes::NAME, monitor_types),
                (MonitorTypeGroups::NAME, monitor_type_groups),
                (Tables::NAME, tables),
            ],
        };
        if !report.is_complete() {
            tracing::warn!(failed = report.failures().count(), "reference data partially loaded");
        }
        report
    }

    /// Check if every store has loaded at least once
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.monitors.is_loaded()
            && self.monitor_types.is_loaded()
            && self.monitor_type_groups.is_loaded()
            && self.tables.is_loaded()
    }
}

/// Per-resource outcome of [`ReferenceData::load_all`]
#[derive(Debug, Clone)]
pub struct LoadReport {
    /// `(resource name, outcome)` in a fixed order
    pub outcomes: Vec<(&'static str, Result<(), FetchError>)>,
}

impl LoadReport {
    /// Check if every resource loaded
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.outcomes.iter().all(|(_, r)| r.is_ok())
    }

    /// Failed resources with their errors
    pub fn failures(&self) -> impl Iterator<Item = (&'static str, &FetchError)> + '_ {
        self.outcomes
            .iter()
            .filter_map(|(name, r)| r.as_ref().err().map(|e| (*name, e)))
    }
}
