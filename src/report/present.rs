//! Presentation of a flattened table.
//!
//! Turns field ids into display labels, fills missing values with blanks,
//! renders values as text and word-wraps the designated long-text columns.
//! The result feeds both the console grid and the file exports.

use super::labels::{ColumnLabels, DEFAULT_WRAP_COLUMNS};
use crate::console_format::{self, Align, TableWriter};
use crate::flatten::{FlatRow, Table};
use serde_json::{Number, Value};
use std::io::{self, Write};

/// How the table is shown
#[derive(Debug, Clone, PartialEq)]
pub struct PresentOptions {
    pub labels: ColumnLabels,
    /// Display labels of columns whose text is wrapped
    pub wrap_columns: Vec<String>,
    pub wrap_width: usize,
    /// Cap on console and spreadsheet column width
    pub max_col_width: usize,
}

impl Default for PresentOptions {
    fn default() -> Self {
        PresentOptions {
            labels: ColumnLabels::sales(),
            wrap_columns: DEFAULT_WRAP_COLUMNS.iter().map(|s| s.to_string()).collect(),
            wrap_width: 30,
            max_col_width: 50,
        }
    }
}

/// One presented value
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(Number),
    Bool(bool),
}

impl Cell {
    /// Missing and null values both become `Empty`; nested values are kept as compact JSON
    pub fn from_value(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => Cell::Empty,
            Some(Value::String(s)) if s.is_empty() => Cell::Empty,
            Some(Value::String(s)) => Cell::Text(s.clone()),
            Some(Value::Number(n)) => Cell::Number(n.clone()),
            Some(Value::Bool(b)) => Cell::Bool(*b),
            Some(nested) => Cell::Text(nested.to_string()),
        }
    }

    /// Text as shown on the console and used for width calculations
    pub fn text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => n.to_string(),
            Cell::Bool(b) => b.to_string(),
        }
    }

    pub fn align(&self) -> Align {
        match self {
            Cell::Number(_) => Align::Right,
            _ => Align::Left,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Cell::Empty => Value::String(String::new()),
            Cell::Text(s) => Value::String(s.clone()),
            Cell::Number(n) => Value::Number(n.clone()),
            Cell::Bool(b) => Value::Bool(*b),
        }
    }
}

/// Labelled, blank-filled, wrapped table ready for output
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PresentedTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl PresentedTable {
    /// All cells of one column, top to bottom
    pub fn column(&self, index: usize) -> impl Iterator<Item = &Cell> {
        self.rows.iter().filter_map(move |row| row.get(index))
    }

    /// Render as a console grid
    pub fn write_to<W: Write>(&self, writer: &mut TableWriter<W>, max_col_width: usize) -> io::Result<()> {
        let rows: Vec<Vec<(String, Align)>> =
            self.rows.iter().map(|row| row.iter().map(|c| (c.text(), c.align())).collect()).collect();
        writer.write_grid(&self.headers, &rows, max_col_width)
    }
}

/// Present the report rows
pub fn present(table: &Table, options: &PresentOptions) -> PresentedTable {
    let headers: Vec<String> = table.columns.iter().map(|c| options.labels.label_for(c).to_string()).collect();
    let wrapped: Vec<bool> = headers.iter().map(|h| options.wrap_columns.iter().any(|w| w == h)).collect();

    let rows = table
        .rows
        .iter()
        .map(|row| {
            table
                .columns
                .iter()
                .zip(&wrapped)
                .map(|(column, wrap)| {
                    let cell = Cell::from_value(row.get(column));
                    if *wrap { wrap_cell(cell, options.wrap_width) } else { cell }
                })
                .collect()
        })
        .collect();

    PresentedTable { headers, rows }
}

/// Present the single summary record; labels apply, wrapping does not
pub fn present_summary(summary: &FlatRow, options: &PresentOptions) -> PresentedTable {
    let headers = summary.keys().map(|k| options.labels.label_for(k).to_string()).collect();
    let row = summary.values().map(|v| Cell::from_value(Some(v))).collect();
    PresentedTable { headers, rows: vec![row] }
}

fn wrap_cell(cell: Cell, width: usize) -> Cell {
    match cell {
        Cell::Text(text) => {
            let lines = console_format::wrap_text(&text, width);
            if lines.is_empty() { Cell::Empty } else { Cell::Text(lines.join("\n")) }
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flatten::flatten_rows;
    use serde_json::json;

    fn table(value: Value) -> Table {
        let Value::Array(rows) = value else { panic!("array expected") };
        flatten_rows(rows).table
    }

    #[test]
    fn test_headers_are_translated() {
        let t = table(json!([{"Delivery.CustomerPhone": "+7900", "GuestNum": 2, "Department": "Main"}]));
        let presented = present(&t, &PresentOptions::default());
        assert_eq!(presented.headers, vec!["Телефон клиента", "Количество гостей", "Department"]);
    }

    #[test]
    fn test_missing_values_are_blank() {
        let t = table(json!([{"A": 1, "B": "x"}, {"A": null}]));
        let presented = present(&t, &PresentOptions::default());
        assert_eq!(presented.rows[1], vec![Cell::Empty, Cell::Empty]);
        assert_eq!(presented.rows[1][1].text(), "");
    }

    #[test]
    fn test_wrap_columns_are_wrapped() {
        let comment = "Позвонить за час до доставки, домофон не работает";
        let t = table(json!([{"Delivery.CustomerComment": comment, "ExternalNumber": comment}]));
        let presented = present(&t, &PresentOptions::default());
        assert_eq!(presented.rows[0][0], Cell::Text("Позвонить за час до доставки,\nдомофон не работает".to_string()));
        // Not a wrap column
        assert_eq!(presented.rows[0][1], Cell::Text(comment.to_string()));
    }

    #[test]
    fn test_numbers_are_not_wrapped_and_align_right() {
        let t = table(json!([{"Delivery.Email": 12345}]));
        let presented = present(&t, &PresentOptions { wrap_width: 2, ..PresentOptions::default() });
        assert_eq!(presented.rows[0][0].text(), "12345");
        assert_eq!(presented.rows[0][0].align(), Align::Right);
    }

    #[test]
    fn test_nested_values_are_compact_json() {
        assert_eq!(Cell::from_value(Some(&json!({"a": [1, 2]}))).text(), r#"{"a":[1,2]}"#);
    }

    #[test]
    fn test_summary_presentation() {
        let summary = match json!({"GuestNum": 10, "DishSumInt": 1500.5}) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        let presented = present_summary(&summary, &PresentOptions::default());
        assert_eq!(presented.headers, vec!["Количество гостей", "Сумма заказа"]);
        assert_eq!(presented.rows.len(), 1);
        assert_eq!(presented.rows[0][1].text(), "1500.5");
    }

    #[test]
    fn test_write_to_console_grid() {
        let t = table(json!([{"GuestNum": 3, "Delivery.Email": "a@b.c"}]));
        let presented = present(&t, &PresentOptions::default());
        let mut buf = Vec::new();
        presented.write_to(&mut TableWriter::new(&mut buf, false), 50).unwrap();
        let out = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "Количество гостей  Email");
        assert_eq!(lines[1], "                3  a@b.c");
    }
}
