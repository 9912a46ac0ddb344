//! Report presentation module - labels, console rendering and file export.
//!
//! This module handles:
//! - Translating field ids into display labels
//! - Filling missing values and wrapping long text
//! - Printing the report and summary tables
//! - Export to spreadsheet and JSON formats
//!
//! Console layout primitives live in the console_format module.
//!
//! # Module Organization
//!
//! - `labels` - Field id → display label table
//! - `present` - Table → PresentedTable (cells, wrapping, console grid)
//! - `export` - Spreadsheet and JSON export

mod export;
mod labels;
mod present;

pub use labels::ColumnLabels;

pub use present::{PresentOptions, PresentedTable, present, present_summary};

pub use export::{export_json, export_xlsx};

use crate::console_format::{self, TableWriter};
use std::io;

/// Print a titled table to stdout, narrowing columns to fit the console
pub fn print_table(title: &str, table: &PresentedTable, max_col_width: usize, use_colors: bool) {
    let width =
        console_format::fit_column_width(console_format::get_console_width(), table.headers.len(), max_col_width);
    let mut writer = TableWriter::new(io::stdout(), use_colors);
    let _ = writer.write_banner(title);
    let _ = table.write_to(&mut writer, width);
}
