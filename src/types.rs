/// Core data structures for the report request
///
/// This module defines the request side of an OLAP report: which report to
/// build, how to group it, what to aggregate and which filters the server
/// applies before aggregation. `ReportSpec` serializes to exactly the body
/// the reporting endpoint expects.
use serde::{Deserialize, Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Kind of OLAP report the server should build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportType {
    Sales,
    Transactions,
    Deliveries,
}

impl ReportType {
    /// Wire name used in query strings and request bodies
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportType::Sales => "SALES",
            ReportType::Transactions => "TRANSACTIONS",
            ReportType::Deliveries => "DELIVERIES",
        }
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Period selector for date range filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PeriodType {
    Custom,
    OpenPeriod,
    Today,
    Yesterday,
    CurrentWeek,
    CurrentMonth,
    CurrentYear,
    LastWeek,
    LastMonth,
    LastYear,
}

/// A field name used as a group-by key or an aggregate
///
/// Identity is the string name alone, e.g. `"Delivery.CustomerPhone"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReportField(pub String);

impl ReportField {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReportField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ReportField {
    fn from(s: &str) -> Self {
        ReportField(s.to_string())
    }
}

/// Server-side constraint applied before aggregation
///
/// Tagged on the wire by `filterType`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "filterType")]
pub enum Filter {
    DateRange {
        #[serde(rename = "periodType")]
        period_type: PeriodType,
        from: String,
        to: String,
        #[serde(rename = "includeLow")]
        include_low: bool,
        #[serde(rename = "includeHigh")]
        include_high: bool,
    },
    IncludeValues {
        values: BTreeSet<String>,
    },
}

impl Filter {
    /// Custom date range, inclusive at the low bound and exclusive at the high bound
    pub fn custom_range(from: impl Into<String>, to: impl Into<String>) -> Self {
        Filter::DateRange {
            period_type: PeriodType::Custom,
            from: from.into(),
            to: to.into(),
            include_low: true,
            include_high: false,
        }
    }

    pub fn include_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Filter::IncludeValues { values: values.into_iter().map(Into::into).collect() }
    }
}

/// The immutable report request, sent verbatim as the request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSpec {
    pub report_type: ReportType,
    #[serde(serialize_with = "bool_as_string")]
    pub build_summary: bool,
    pub group_by_row_fields: Vec<ReportField>,
    pub group_by_col_fields: Vec<ReportField>,
    pub aggregate_fields: Vec<ReportField>,
    pub filters: BTreeMap<String, Filter>,
}

impl ReportSpec {
    /// All requested fields in request order: rows, then columns, then aggregates
    pub fn requested_fields(&self) -> impl Iterator<Item = &ReportField> {
        self.group_by_row_fields.iter().chain(self.group_by_col_fields.iter()).chain(self.aggregate_fields.iter())
    }

    /// Serialize to the JSON request body
    pub fn to_request_body(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

// The server expects "true"/"false" strings rather than JSON booleans
fn bool_as_string<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(if *value { "true" } else { "false" })
}

#[cfg(test)]
#[path = "data_structures_test.rs"]
mod data_structures_test;
