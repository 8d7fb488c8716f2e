//! Data types offered by the query views, derived from table names
//!
//! `hour_data` → `hour` / 小時資料, `hour_data_raw` → 小時資料(raw); minute
//! tables map the same way to 分鐘資料. Other tables are not queryable.

use crate::kind::{TableName, Tables};
use crate::store::ReferenceStore;
use serde::Serialize;

const HOUR_TABLE: &str = "hour_data";
const MIN_TABLE: &str = "min_data";
const HOUR_LABEL: &str = "小時資料";
const MIN_LABEL: &str = "分鐘資料";

/// Selectable data type in query forms
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataType {
    /// Value sent back to the service
    pub id: String,
    /// Label shown to the operator
    #[serde(rename = "txt")]
    pub label: String,
}

impl DataType {
    fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

fn derive(table: &str, base: &str, short_id: &str, label: &str) -> Option<DataType> {
    if !table.contains(base) {
        return None;
    }
    if table == base {
        return Some(DataType::new(short_id, label));
    }
    let text = table.replacen(&format!("{base}_"), &format!("{label}("), 1) + ")";
    Some(DataType::new(table, text))
}

fn hourly(table: &str) -> Option<DataType> {
    derive(table, HOUR_TABLE, "hour", HOUR_LABEL)
}

fn minutely(table: &str) -> Option<DataType> {
    derive(table, MIN_TABLE, "min", MIN_LABEL)
}

/// Hourly and minute data types, in table order
#[must_use]
pub fn data_types(tables: &[TableName]) -> Vec<DataType> {
    tables
        .iter()
        .filter_map(|t| hourly(t.as_str()).or_else(|| minutely(t.as_str())))
        .collect()
}

/// Hourly data types only, in table order
#[must_use]
pub fn hour_data_types(tables: &[TableName]) -> Vec<DataType> {
    tables.iter().filter_map(|t| hourly(t.as_str())).collect()
}

impl ReferenceStore<Tables> {
    /// [`data_types`] over the current snapshot
    #[must_use]
    pub fn data_types(&self) -> Vec<DataType> {
        data_types(&self.all())
    }

    /// [`hour_data_types`] over the current snapshot
    #[must_use]
    pub fn hour_data_types(&self) -> Vec<DataType> {
        hour_data_types(&self.all())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<TableName> {
        list.iter().copied().map(TableName::from).collect()
    }

    #[test]
    fn base_tables_use_short_ids() {
        let types = data_types(&names(&["hour_data", "min_data"]));
        assert_eq!(
            types,
            vec![DataType::new("hour", "小時資料"), DataType::new("min", "分鐘資料")]
        );
    }

    #[test]
    fn suffixed_tables_keep_full_id() {
        let types = data_types(&names(&["hour_data_raw", "min_data_raw"]));
        assert_eq!(types[0], DataType::new("hour_data_raw", "小時資料(raw)"));
        assert_eq!(types[1], DataType::new("min_data_raw", "分鐘資料(raw)"));
    }

    #[test]
    fn unrelated_tables_are_skipped() {
        let types = data_types(&names(&["calibration", "alarms", "hour_data"]));
        assert_eq!(types.len(), 1);
    }

    #[test]
    fn hour_only() {
        let types = hour_data_types(&names(&["min_data", "hour_data", "hour_data_avg"]));
        let ids: Vec<_> = types.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["hour", "hour_data_avg"]);
    }

    #[test]
    fn serializes_with_txt_label() {
        let json = serde_json::to_value(DataType::new("hour", "小時資料")).unwrap();
        assert_eq!(json, serde_json::json!({"id": "hour", "txt": "小時資料"}));
    }
}
