/// Column catalog returned by the discovery call
///
/// The catalog is advisory: requested fields missing from it are reported,
/// never rejected. The server has been seen to answer either with an object
/// keyed by field id or with an array of field descriptions or bare ids.
/// Flags the server leaves out stay unknown rather than false.
use crate::types::{ReportField, ReportSpec};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Description of one available field
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColumnInfo {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub aggregation_allowed: Option<bool>,
    pub grouping_allowed: Option<bool>,
    pub filtering_allowed: Option<bool>,
    pub tags: Option<Vec<String>>,
}

/// True for a discovery body that carries nothing at all:
/// null, false, zero, an empty string, an empty array or an empty object
pub fn is_blank_response(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

/// Available fields for one report type, keyed by field id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnCatalog {
    pub columns: BTreeMap<String, ColumnInfo>,
}

impl ColumnCatalog {
    /// Interpret a discovery response body
    pub fn from_value(value: &Value) -> Self {
        let mut columns = BTreeMap::new();
        match value {
            Value::Object(map) => {
                for (id, info) in map {
                    columns.insert(id.clone(), parse_info(info));
                }
            }
            Value::Array(items) => {
                for item in items {
                    if let Value::String(id) = item {
                        columns.insert(id.clone(), ColumnInfo::default());
                        continue;
                    }
                    let id = item.get("id").or_else(|| item.get("name")).and_then(Value::as_str);
                    if let Some(id) = id {
                        columns.insert(id.to_string(), parse_info(item));
                    }
                }
            }
            _ => {}
        }
        ColumnCatalog { columns }
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn contains(&self, field: &ReportField) -> bool {
        self.columns.contains_key(field.as_str())
    }

    /// Requested fields the catalog does not list, in request order
    pub fn missing_fields<'a>(&self, spec: &'a ReportSpec) -> Vec<&'a ReportField> {
        spec.requested_fields().filter(|f| !self.contains(f)).collect()
    }

    /// Fields that cannot be used the way the report request uses them
    ///
    /// Only fields that are present in the catalog and explicitly flagged
    /// as not allowed are reported.
    pub fn misused_fields<'a>(&self, spec: &'a ReportSpec) -> Vec<(&'a ReportField, &'static str)> {
        let mut misused = Vec::new();
        for field in spec.group_by_row_fields.iter().chain(spec.group_by_col_fields.iter()) {
            if let Some(info) = self.columns.get(field.as_str())
                && info.grouping_allowed == Some(false)
            {
                misused.push((field, "grouping"));
            }
        }
        for field in &spec.aggregate_fields {
            if let Some(info) = self.columns.get(field.as_str())
                && info.aggregation_allowed == Some(false)
            {
                misused.push((field, "aggregation"));
            }
        }
        misused
    }
}

fn parse_info(value: &Value) -> ColumnInfo {
    // Unknown shapes still count as present; only the flags are lost
    ColumnInfo::deserialize(value).unwrap_or_default()
}
