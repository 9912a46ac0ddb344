// Copyright 2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

mod api;
mod cli;
mod columns;
mod config;
mod console_format;
mod flatten;
mod report;
mod types;
mod ui;

#[cfg(test)]
mod test_server;

use api::{ApiClient, FetchError};
use columns::{ColumnCatalog, is_blank_response};
use config::{ExportConfig, ReportSource};
use console_format::{Align, TableWriter};
use flatten::FlattenPath;
use log::{debug, warn};
use std::io;

fn main() {
    env_logger::init();

    // Parse CLI arguments
    let args = cli::CliArgs::parse_args();

    if args.no_color {
        ui::set_colors(false);
    }

    // Validate arguments
    if let Err(e) = args.validate() {
        ui::print_error(&e);
        std::process::exit(1);
    }

    // Set console width override if specified
    if let Some(width) = args.console_width {
        console_format::set_console_width(width);
    }

    let config = match config::build_export_config(&args) {
        Ok(c) => c,
        Err(e) => {
            ui::print_error(&format!("Configuration error: {}", e));
            std::process::exit(1);
        }
    };

    let client = ApiClient::new(&config.api);

    // Failing to retrieve data is reported, not an error exit
    run(&client, &config, args.list_columns);
}

/// Discovery, fetch, flatten, then print and export
fn run(client: &ApiClient, config: &ExportConfig, list_columns: bool) {
    match &config.source {
        ReportSource::BuiltIn => debug!("using built-in report definition"),
        ReportSource::File(path) => ui::status(&format!("Report definition: {}", path.display())),
    }

    // Step 1: column discovery
    ui::status(&format!("Fetching available fields for {} report", config.report.report_type));
    let columns = match client.get_olap_columns(config.report.report_type) {
        Ok(columns) => columns,
        Err(e) => {
            print_fetch_error("Could not retrieve report fields", &e);
            return;
        }
    };

    if is_blank_response(&columns) {
        ui::print_error("The server returned no report fields");
        return;
    }
    let catalog = ColumnCatalog::from_value(&columns);
    debug!("server offers {} fields", catalog.len());

    if list_columns {
        print_catalog(&catalog);
        return;
    }

    if catalog.is_empty() {
        warn!("unrecognized field list: {}", columns);
        ui::print_warning("Could not read the field list, requested fields were not checked");
    } else {
        check_requested_fields(&catalog, config);
    }

    // Step 2: report fetch
    ui::status(&format!(
        "Requesting report: {} group-by fields, {} aggregates, {} filters",
        config.report.group_by_row_fields.len() + config.report.group_by_col_fields.len(),
        config.report.aggregate_fields.len(),
        config.report.filters.len()
    ));
    let report = match client.get_olap_report(&config.report) {
        Ok(report) => report,
        Err(e) => {
            print_fetch_error("Could not retrieve the report", &e);
            return;
        }
    };

    // Step 3: flatten
    let flattened = flatten::flatten_rows(report.data);
    ui::status(&format!("Received {} rows", flattened.table.len()));
    if flattened.path == FlattenPath::Fallback {
        debug!("rows were not directly tabular, merged partial rows");
    }
    for diagnostic in &flattened.diagnostics {
        ui::print_warning(&diagnostic.to_string());
    }

    let summary = report.summary.and_then(|s| {
        let (row, diagnostics) = flatten::flatten_summary(s);
        for diagnostic in &diagnostics {
            ui::print_warning(&format!("summary: {}", diagnostic));
        }
        row
    });
    let presented_summary = summary.as_ref().map(|s| report::present_summary(s, &config.present));

    // Step 4: present and export
    let use_colors = ui::colors_enabled();
    let max_width = config.present.max_col_width;

    if flattened.table.is_empty() {
        println!("\nReport data is empty.");
        if presented_summary.is_some() {
            export_json_output(&report::PresentedTable::default(), presented_summary.as_ref(), config);
        }
    } else {
        let presented = report::present(&flattened.table, &config.present);
        report::print_table("Report data", &presented, max_width, use_colors);
        export_outputs(&presented, presented_summary.as_ref(), config);
    }

    match &presented_summary {
        Some(totals) => report::print_table("Report totals", totals, max_width, use_colors),
        None => println!("\nReport totals are missing."),
    }
}

/// Write the spreadsheet and, if requested, the JSON export
fn export_outputs(presented: &report::PresentedTable, summary: Option<&report::PresentedTable>, config: &ExportConfig) {
    let target = &config.target;

    match report::export_xlsx(presented, &target.output, &target.sheet_name, config.present.max_col_width) {
        Ok(()) => println!("\nReport saved to: {}", target.output.display()),
        Err(e) => ui::print_error(&format!("Failed to save {}: {}", target.output.display(), e)),
    }

    export_json_output(presented, summary, config);
}

/// Write the JSON export when one was requested
fn export_json_output(presented: &report::PresentedTable, summary: Option<&report::PresentedTable>, config: &ExportConfig) {
    if let Some(json_path) = &config.target.json_output {
        match report::export_json(presented, summary, json_path) {
            Ok(()) => println!("JSON report saved to: {}", json_path.display()),
            Err(e) => ui::print_error(&format!("Failed to save {}: {}", json_path.display(), e)),
        }
    }
}

/// Report requested fields the server does not list; advisory only
fn check_requested_fields(catalog: &ColumnCatalog, config: &ExportConfig) {
    let missing = catalog.missing_fields(&config.report);
    if !missing.is_empty() {
        let names: Vec<&str> = missing.iter().map(|f| f.as_str()).collect();
        warn!("requested fields not offered by the server: {:?}", names);
        ui::print_warning(&format!("Fields not listed by the server: {}", names.join(", ")));
    }

    for (field, usage) in catalog.misused_fields(&config.report) {
        warn!("field {} does not allow {}", field, usage);
        ui::print_warning(&format!("Field {} does not allow {}", field, usage));
    }
}

/// Print the discovered fields as a table
fn print_catalog(catalog: &ColumnCatalog) {
    let flag = |allowed: Option<bool>| {
        let text = match allowed {
            Some(true) => "yes",
            Some(false) => "no",
            None => "",
        };
        (text.to_string(), Align::Left)
    };
    let headers: Vec<String> =
        ["Field", "Name", "Type", "Group", "Aggregate", "Filter"].iter().map(|s| s.to_string()).collect();
    let rows: Vec<Vec<(String, Align)>> = catalog
        .columns
        .iter()
        .map(|(id, info)| {
            vec![
                (id.clone(), Align::Left),
                (info.name.clone().unwrap_or_default(), Align::Left),
                (info.kind.clone().unwrap_or_default(), Align::Left),
                flag(info.grouping_allowed),
                flag(info.aggregation_allowed),
                flag(info.filtering_allowed),
            ]
        })
        .collect();

    let mut writer = TableWriter::new(io::stdout(), ui::colors_enabled());
    let _ = writer.write_banner(&format!("{} available fields", catalog.len()));
    let _ = writer.write_grid(&headers, &rows, console_format::get_console_width() / 2);
}

/// Report a failed request: what failed, the status code and the server's answer
fn print_fetch_error(what: &str, error: &FetchError) {
    match error {
        FetchError::Status { code, body } => {
            ui::print_error(&format!("{}: HTTP {}", what, code));
            if !body.trim().is_empty() {
                println!("{}", body.trim_end());
            }
        }
        other => ui::print_error(&format!("{}: {}", what, other)),
    }
}
