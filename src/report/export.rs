//! Report export functions for spreadsheet and JSON formats.
//!
//! The spreadsheet gets one named sheet with a header row and columns sized
//! to their longest value. JSON carries the same presented table plus the
//! summary record.

use super::present::{Cell, PresentedTable};
use log::debug;
use rust_xlsxwriter::{Format, FormatBorder, Workbook, XlsxError};
use serde_json::{Map, Value, json};
use std::fs::File;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Hard limit on columns in a worksheet
const MAX_SHEET_COLUMNS: usize = 16_384;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("spreadsheet error: {0}")]
    Xlsx(#[from] XlsxError),

    #[error("{0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("table has {0} columns, a worksheet holds at most 16384")]
    TooManyColumns(usize),
}

/// Spreadsheet column width for a column: longest value (in characters,
/// header excluded) capped at `max_width`, plus two for breathing room
pub fn column_width(table: &PresentedTable, index: usize, max_width: usize) -> f64 {
    let longest = table.column(index).map(|c| c.text().chars().count()).max().unwrap_or(0);
    (longest.min(max_width) + 2) as f64
}

/// Export the presented table to a single-sheet workbook.
///
/// # Arguments
/// * `table` - Presented report rows
/// * `output_path` - Path of the workbook to write
/// * `sheet_name` - Name of the only worksheet
/// * `max_col_width` - Cap applied before adding padding to each column width
pub fn export_xlsx(
    table: &PresentedTable,
    output_path: &Path,
    sheet_name: &str,
    max_col_width: usize,
) -> Result<(), ExportError> {
    if table.headers.len() > MAX_SHEET_COLUMNS {
        return Err(ExportError::TooManyColumns(table.headers.len()));
    }

    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold().set_border(FormatBorder::Thin);
    let wrap_format = Format::new().set_text_wrap();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name)?;

    for (col, header) in table.headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, header.as_str(), &header_format)?;
    }

    for (row_idx, row) in table.rows.iter().enumerate() {
        let row_num = row_idx as u32 + 1;
        for (col, cell) in row.iter().enumerate() {
            let col = col as u16;
            match cell {
                Cell::Empty => {}
                Cell::Text(text) if text.contains('\n') => {
                    worksheet.write_string_with_format(row_num, col, text.as_str(), &wrap_format)?;
                }
                Cell::Text(text) => {
                    worksheet.write_string(row_num, col, text.as_str())?;
                }
                Cell::Number(n) => match n.as_f64() {
                    Some(value) => {
                        worksheet.write_number(row_num, col, value)?;
                    }
                    None => {
                        worksheet.write_string(row_num, col, n.to_string())?;
                    }
                },
                Cell::Bool(b) => {
                    worksheet.write_boolean(row_num, col, *b)?;
                }
            }
        }
    }

    for col in 0..table.headers.len() {
        worksheet.set_column_width(col as u16, column_width(table, col, max_col_width))?;
    }

    debug!("writing {} rows to {}", table.rows.len(), output_path.display());
    workbook.save(output_path)?;

    Ok(())
}

/// Export the presented table and summary as JSON.
///
/// Rows become objects keyed by display label, in column order.
pub fn export_json(
    table: &PresentedTable,
    summary: Option<&PresentedTable>,
    output_path: &Path,
) -> Result<(), ExportError> {
    let report = json!({
        "generated_at": chrono::Local::now().to_rfc3339(),
        "columns": table.headers,
        "rows": table.rows.iter().map(|row| row_object(&table.headers, row)).collect::<Vec<_>>(),
        "summary": summary
            .and_then(|s| s.rows.first().map(|row| row_object(&s.headers, row)))
            .unwrap_or(Value::Null),
    });

    let file = File::create(output_path)?;
    serde_json::to_writer_pretty(file, &report)?;

    Ok(())
}

fn row_object(headers: &[String], row: &[Cell]) -> Value {
    let mut object = Map::new();
    for (header, cell) in headers.iter().zip(row) {
        object.insert(header.clone(), cell.to_json());
    }
    Value::Object(object)
}
