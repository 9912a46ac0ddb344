//! Row flattening - turns the report's `data` array into a rectangular table.
//!
//! The reporting service does not guarantee a uniform row shape. A row is
//! either a flat object, or an array of partial objects that together make
//! up one logical row (typically one object per group-by dimension).
//!
//! Flattening is purely structural. It knows nothing about the requested
//! fields, never reorders rows, and never drops a row: a malformed row
//! still occupies its position as an empty record.

use log::debug;
use serde_json::{Map, Value};
use std::fmt;

/// A flat record: field name to scalar value, in first-seen key order
pub type FlatRow = Map<String, Value>;

/// One element of the response's `data` array, classified by shape
#[derive(Debug, Clone, PartialEq)]
pub enum RawRow {
    /// Already a flat mapping
    Flat(FlatRow),
    /// A sequence of partial mappings describing one logical row
    Partial(Vec<Value>),
    /// Anything else (string, number, null, ...)
    Malformed(Value),
}

impl From<Value> for RawRow {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => RawRow::Flat(map),
            Value::Array(items) => RawRow::Partial(items),
            other => RawRow::Malformed(other),
        }
    }
}

/// Which path produced the table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlattenPath {
    /// Every row was already a flat mapping
    Direct,
    /// At least one row needed per-row merging
    Fallback,
}

/// A shape problem found while flattening. Never fatal.
#[derive(Debug, Clone, PartialEq)]
pub enum RowDiagnostic {
    /// A sub-element of a partial row was not a mapping and was skipped
    UnexpectedElement { row: usize, element: usize, kind: &'static str },
    /// The row itself was neither a mapping nor a sequence
    UnexpectedRow { row: usize, kind: &'static str },
}

impl fmt::Display for RowDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowDiagnostic::UnexpectedElement { row, element, kind } => {
                write!(f, "unexpected {} at data[{}][{}], skipped", kind, row, element)
            }
            RowDiagnostic::UnexpectedRow { row, kind } => {
                write!(f, "unexpected {} at data[{}], kept as an empty row", kind, row)
            }
        }
    }
}

/// Ordered rows sharing the union of all their keys as the column set
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    /// Union of all row keys, in order of first appearance
    pub columns: Vec<String>,
    pub rows: Vec<FlatRow>,
}

impl Table {
    /// Build a table from rows, collecting the column union in first-seen order
    pub fn from_rows(rows: Vec<FlatRow>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for row in &rows {
            for key in row.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.clone());
                }
            }
        }
        Table { columns, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[cfg(test)]
    /// Value of `column` in row `row`; None when the row lacks the column
    pub fn cell(&self, row: usize, column: &str) -> Option<&Value> {
        self.rows.get(row).and_then(|r| r.get(column))
    }
}

/// Result of flattening a `data` array
#[derive(Debug, Clone, PartialEq)]
pub struct Flattened {
    pub table: Table,
    pub path: FlattenPath,
    pub diagnostics: Vec<RowDiagnostic>,
}

/// Flatten the response's `data` array into a table
///
/// Rows that are all flat mappings are taken as-is. Otherwise every row goes
/// through [`flatten_row`], with later sub-mappings overwriting earlier ones.
pub fn flatten_rows(data: Vec<Value>) -> Flattened {
    let rows: Vec<RawRow> = data.into_iter().map(RawRow::from).collect();

    if let Some(direct) = try_direct(&rows) {
        debug!("data is already tabular ({} rows)", direct.len());
        return Flattened { table: Table::from_rows(direct), path: FlattenPath::Direct, diagnostics: Vec::new() };
    }

    debug!("data is not directly tabular, flattening {} rows one by one", rows.len());

    let mut diagnostics = Vec::new();
    let flat: Vec<FlatRow> =
        rows.into_iter().enumerate().map(|(index, row)| flatten_row(index, row, &mut diagnostics)).collect();

    Flattened { table: Table::from_rows(flat), path: FlattenPath::Fallback, diagnostics }
}

/// Flatten the `summary` record, if there is anything in it
///
/// The summary is one record; an array is merged the same way as a partial row.
pub fn flatten_summary(summary: Value) -> (Option<FlatRow>, Vec<RowDiagnostic>) {
    let mut diagnostics = Vec::new();
    if summary.is_null() {
        return (None, diagnostics);
    }
    let row = flatten_row(0, RawRow::from(summary), &mut diagnostics);
    if row.is_empty() { (None, diagnostics) } else { (Some(row), diagnostics) }
}

/// Merge one raw row into a flat record
pub fn flatten_row(index: usize, row: RawRow, diagnostics: &mut Vec<RowDiagnostic>) -> FlatRow {
    let mut combined = FlatRow::new();
    match row {
        RawRow::Flat(map) => combined.extend(map),
        RawRow::Partial(items) => {
            for (element, item) in items.into_iter().enumerate() {
                match item {
                    Value::Object(map) => combined.extend(map),
                    other => diagnostics.push(RowDiagnostic::UnexpectedElement {
                        row: index,
                        element,
                        kind: value_kind(&other),
                    }),
                }
            }
        }
        RawRow::Malformed(other) => {
            diagnostics.push(RowDiagnostic::UnexpectedRow { row: index, kind: value_kind(&other) })
        }
    }
    combined
}

fn try_direct(rows: &[RawRow]) -> Option<Vec<FlatRow>> {
    rows.iter()
        .map(|row| match row {
            RawRow::Flat(map) => Some(map.clone()),
            _ => None,
        })
        .collect()
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
#[path = "flatten_test.rs"]
mod flatten_test;
