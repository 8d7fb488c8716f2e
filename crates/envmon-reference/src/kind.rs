//! Resource kinds and their entities
//!
//! Each kind names its collection endpoint and how to key an entity. The
//! entity structs keep the service's field names on the wire.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// A kind of reference collection served by the external service
pub trait ResourceKind: Send + Sync + 'static {
    /// Entity stored by this kind
    type Entity: DeserializeOwned + Clone + Debug + Send + Sync + 'static;

    /// Short name used in logs and reports
    const NAME: &'static str;

    /// Request path of the full collection
    const PATH: &'static str;

    /// Identifier used by the lookup index
    fn key(entity: &Self::Entity) -> &str;
}

/// Monitoring station
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Monitor {
    /// Station identifier
    #[serde(rename = "_id")]
    pub id: String,
    /// Station description
    pub desc: String,
    /// Latitude
    #[serde(default)]
    pub lat: f64,
    /// Longitude
    #[serde(default)]
    pub lng: f64,
}

impl Monitor {
    /// Create station at the origin
    pub fn new(id: impl Into<String>, desc: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            desc: desc.into(),
            lat: 0.0,
            lng: 0.0,
        }
    }
}

/// Threshold settings of a monitor type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    /// Seconds a reading must stay over threshold before alarming
    #[serde(rename = "elapseTime")]
    pub elapse_time: u64,
}

/// Measured quantity (PM2.5, wind speed, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorType {
    #[serde(rename = "_id")]
    pub id: String,
    pub desp: String,
    pub unit: String,
    /// Display precision (decimal places)
    pub prec: u32,
    /// Sort order in tables and charts
    pub order: i32,
    #[serde(rename = "signalType", default)]
    pub signal_type: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub std_law: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub std_internal: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zd_internal: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zd_law: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span_dev_internal: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span_dev_law: Option<f64>,
    /// Instruments producing this quantity
    #[serde(rename = "measuringBy", default, skip_serializing_if = "Option::is_none")]
    pub measuring_by: Option<Vec<String>>,
    #[serde(rename = "thresholdConfig", default, skip_serializing_if = "Option::is_none")]
    pub threshold_config: Option<ThresholdConfig>,
}

impl MonitorType {
    /// Create monitor type with no standards or calibration limits
    pub fn new(id: impl Into<String>, desp: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            desp: desp.into(),
            unit: unit.into(),
            prec: 2,
            order: 0,
            signal_type: false,
            std_law: None,
            std_internal: None,
            zd_internal: None,
            zd_law: None,
            span: None,
            span_dev_internal: None,
            span_dev_law: None,
            measuring_by: None,
            threshold_config: None,
        }
    }

    /// Format a reading with this type's precision
    #[must_use]
    pub fn format_value(&self, value: f64) -> String {
        format!("{value:.prec$}", prec = self.prec as usize)
    }
}

/// Named group of monitor types
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorTypeGroup {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    /// Member monitor type ids
    #[serde(default, alias = "monitorTypes")]
    pub mts: Vec<String>,
}

/// Name of a data table (`hour_data`, `min_data_raw`, ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableName(pub String);

impl TableName {
    /// Table name as string
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TableName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// `/Monitors`
#[derive(Debug, Clone, Copy)]
pub struct Monitors;

impl ResourceKind for Monitors {
    type Entity = Monitor;
    const NAME: &'static str = "monitors";
    const PATH: &'static str = "/Monitors";

    fn key(entity: &Monitor) -> &str {
        &entity.id
    }
}

/// `/MonitorType`
#[derive(Debug, Clone, Copy)]
pub struct MonitorTypes;

impl ResourceKind for MonitorTypes {
    type Entity = MonitorType;
    const NAME: &'static str = "monitor-types";
    const PATH: &'static str = "/MonitorType";

    fn key(entity: &MonitorType) -> &str {
        &entity.id
    }
}

/// `/MonitorTypeGroups`
#[derive(Debug, Clone, Copy)]
pub struct MonitorTypeGroups;

impl ResourceKind for MonitorTypeGroups {
    type Entity = MonitorTypeGroup;
    const NAME: &'static str = "monitor-type-groups";
    const PATH: &'static str = "/MonitorTypeGroups";

    fn key(entity: &MonitorTypeGroup) -> &str {
        &entity.id
    }
}

/// `/Tables`
#[derive(Debug, Clone, Copy)]
pub struct Tables;

impl ResourceKind for Tables {
    type Entity = TableName;
    const NAME: &'static str = "tables";
    const PATH: &'static str = "/Tables";

    fn key(entity: &TableName) -> &str {
        entity.as_str()
    }
}
