/// Configuration resolution module
///
/// This module handles:
/// - Building an ExportConfig from CLI arguments
/// - Loading an optional TOML report definition
/// - Applying date range overrides
/// - Validating the report specification before anything goes on the wire
use crate::cli::{self, CliArgs};
use crate::report::{ColumnLabels, PresentOptions};
use crate::types::*;
use chrono::{NaiveDate, NaiveDateTime};
use log::debug;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Field whose DateRange filter `--from`/`--to` adjust
pub const ORDER_DATE_FIELD: &str = "OpenDate.Typed";

/// Connection settings for the reporting service
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    pub base_url: String,
    pub key: String,
    pub timeout: Duration,
}

/// Where the output goes
#[derive(Debug, Clone, PartialEq)]
pub struct ExportTarget {
    pub output: PathBuf,
    pub sheet_name: String,
    pub json_output: Option<PathBuf>,
}

/// Where the report specification came from
#[derive(Debug, Clone, PartialEq)]
pub enum ReportSource {
    BuiltIn,
    File(PathBuf),
}

/// Everything one run needs, resolved once at startup
#[derive(Debug, Clone, PartialEq)]
pub struct ExportConfig {
    pub api: ApiConfig,
    pub report: ReportSpec,
    pub present: PresentOptions,
    pub target: ExportTarget,
    pub source: ReportSource,
}

/// TOML report definition; every key is optional and falls back to the built-in report
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ReportFile {
    report_type: Option<ReportType>,
    build_summary: Option<bool>,
    group_by_row_fields: Option<Vec<ReportField>>,
    group_by_col_fields: Option<Vec<ReportField>>,
    aggregate_fields: Option<Vec<ReportField>>,
    wrap_columns: Option<Vec<String>>,
    wrap_width: Option<usize>,
    max_col_width: Option<usize>,
    filters: Option<BTreeMap<String, Filter>>,
    labels: Option<BTreeMap<String, String>>,
}

/// The built-in sales report: customer and order dimensions for October 2023,
/// excluding deleted orders
pub fn default_report_spec() -> ReportSpec {
    let mut filters = BTreeMap::new();
    filters.insert(ORDER_DATE_FIELD.to_string(), Filter::custom_range("2023-10-01", "2023-11-01"));
    filters.insert("DeletedWithWriteoff".to_string(), Filter::include_values(["NOT_DELETED"]));
    filters.insert("OrderDeleted".to_string(), Filter::include_values(["NOT_DELETED"]));

    ReportSpec {
        report_type: ReportType::Sales,
        build_summary: true,
        group_by_row_fields: [
            "Delivery.CustomerPhone",
            "Delivery.CustomerCreatedDateTyped",
            "Delivery.CustomerName",
            "Delivery.Email",
            "Delivery.CustomerComment",
            ORDER_DATE_FIELD,
            "ExternalNumber",
        ]
        .into_iter()
        .map(ReportField::from)
        .collect(),
        group_by_col_fields: Vec::new(),
        aggregate_fields: ["GuestNum", "DishSumInt", "DishDiscountSumInt", "UniqOrderId"]
            .into_iter()
            .map(ReportField::from)
            .collect(),
        filters,
    }
}

/// Build a complete ExportConfig from CLI arguments
///
/// This resolves all configuration upfront, so the pipeline receives a
/// fully validated, immutable report specification.
pub fn build_export_config(args: &CliArgs) -> Result<ExportConfig, String> {
    debug!("Building export config from CLI args");

    let report_path = match &args.report {
        Some(path) => Some(path.clone()),
        None => cli::default_report_file().filter(|p| p.is_file()),
    };

    let (mut report, present, source) = match report_path {
        Some(path) => {
            debug!("Loading report definition from {:?}", path);
            let file = load_report_file(&path)?;
            let (report, present) = apply_report_file(file);
            (report, present, ReportSource::File(path))
        }
        None => (default_report_spec(), PresentOptions::default(), ReportSource::BuiltIn),
    };

    apply_date_overrides(&mut report, args.from, args.to)?;
    validate_report_spec(&report)?;

    if present.wrap_width == 0 || present.max_col_width == 0 {
        return Err("wrap_width and max_col_width must be at least 1".to_string());
    }

    Ok(ExportConfig {
        api: ApiConfig {
            base_url: args.base_url.trim_end_matches('/').to_string(),
            key: args.key.clone(),
            timeout: args.request_timeout(),
        },
        report,
        present,
        target: ExportTarget {
            output: args.output.clone(),
            sheet_name: args.sheet_name.clone(),
            json_output: args.json_output.clone(),
        },
        source,
    })
}

fn load_report_file(path: &Path) -> Result<ReportFile, String> {
    let text = fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    parse_report_file(&text).map_err(|e| format!("Invalid report definition {}: {}", path.display(), e))
}

fn parse_report_file(text: &str) -> Result<ReportFile, toml::de::Error> {
    toml::from_str(text)
}

/// Merge a report file over the built-in defaults
fn apply_report_file(file: ReportFile) -> (ReportSpec, PresentOptions) {
    let defaults = default_report_spec();
    let report = ReportSpec {
        report_type: file.report_type.unwrap_or(defaults.report_type),
        build_summary: file.build_summary.unwrap_or(defaults.build_summary),
        group_by_row_fields: file.group_by_row_fields.unwrap_or(defaults.group_by_row_fields),
        group_by_col_fields: file.group_by_col_fields.unwrap_or(defaults.group_by_col_fields),
        aggregate_fields: file.aggregate_fields.unwrap_or(defaults.aggregate_fields),
        filters: file.filters.unwrap_or(defaults.filters),
    };

    let mut present = PresentOptions::default();
    if let Some(labels) = file.labels {
        let mut merged = ColumnLabels::sales();
        merged.extend(labels);
        present.labels = merged;
    }
    if let Some(wrap_columns) = file.wrap_columns {
        present.wrap_columns = wrap_columns;
    }
    if let Some(width) = file.wrap_width {
        present.wrap_width = width;
    }
    if let Some(width) = file.max_col_width {
        present.max_col_width = width;
    }

    (report, present)
}

/// Replace the bounds of the order date filter
///
/// With no existing filter both bounds are needed to create one.
fn apply_date_overrides(report: &mut ReportSpec, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<(), String> {
    if from.is_none() && to.is_none() {
        return Ok(());
    }

    let fmt = |d: NaiveDate| d.format("%Y-%m-%d").to_string();

    match report.filters.get_mut(ORDER_DATE_FIELD) {
        Some(Filter::DateRange { from: f, to: t, period_type, .. }) => {
            if let Some(from) = from {
                *f = fmt(from);
            }
            if let Some(to) = to {
                *t = fmt(to);
            }
            *period_type = PeriodType::Custom;
        }
        Some(Filter::IncludeValues { .. }) => {
            return Err(format!("Filter on {} is not a date range; cannot apply --from/--to", ORDER_DATE_FIELD));
        }
        None => match (from, to) {
            (Some(from), Some(to)) => {
                report.filters.insert(ORDER_DATE_FIELD.to_string(), Filter::custom_range(fmt(from), fmt(to)));
            }
            _ => {
                return Err(format!("No date filter on {}; pass both --from and --to to create one", ORDER_DATE_FIELD));
            }
        },
    }

    debug!("Date range overridden: from={:?} to={:?}", from, to);
    Ok(())
}

/// Parse a date bound as `YYYY-MM-DD` or `YYYY-MM-DDTHH:MM:SS[.fff]`
pub fn parse_date_bound(s: &str) -> Option<NaiveDateTime> {
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").ok()
}

/// Check the report specification before it is sent
pub fn validate_report_spec(report: &ReportSpec) -> Result<(), String> {
    if report.requested_fields().next().is_none() {
        return Err("Report requests no fields: add group-by or aggregate fields".to_string());
    }

    for (field, filter) in &report.filters {
        match filter {
            Filter::DateRange { from, to, .. } => {
                let start = parse_date_bound(from)
                    .ok_or_else(|| format!("Filter {}: invalid 'from' date '{}'", field, from))?;
                let end = parse_date_bound(to).ok_or_else(|| format!("Filter {}: invalid 'to' date '{}'", field, to))?;
                if start >= end {
                    return Err(format!("Filter {}: 'from' ({}) must be before 'to' ({})", field, from, to));
                }
            }
            Filter::IncludeValues { values } => {
                if values.is_empty() {
                    return Err(format!("Filter {}: IncludeValues needs at least one value", field));
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
