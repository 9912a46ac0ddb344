/// Tests for config module
#[cfg(test)]
mod tests {
    use crate::cli::CliArgs;
    use crate::config::*;
    use crate::types::{Filter, PeriodType, ReportType};
    use clap::Parser;
    use std::io::Write;

    fn args(extra: &[&str]) -> CliArgs {
        let mut argv = vec!["olap-export"];
        argv.extend_from_slice(extra);
        CliArgs::parse_from(argv)
    }

    fn write_report(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn order_range(config: &ExportConfig) -> (String, String) {
        match &config.report.filters[ORDER_DATE_FIELD] {
            Filter::DateRange { from, to, .. } => (from.clone(), to.clone()),
            other => panic!("unexpected filter: {:?}", other),
        }
    }

    #[test]
    fn test_builtin_report_matches_sales_export() {
        let spec = default_report_spec();
        assert_eq!(spec.report_type, ReportType::Sales);
        assert!(spec.build_summary);
        assert_eq!(spec.group_by_row_fields.len(), 7);
        assert!(spec.group_by_col_fields.is_empty());
        assert_eq!(spec.aggregate_fields.len(), 4);
        assert_eq!(spec.filters.len(), 3);
        assert!(validate_report_spec(&spec).is_ok());
    }

    #[test]
    fn test_api_config_from_args() {
        let config = build_export_config(&args(&[
            "--report",
            write_report("").path().to_str().unwrap(),
            "--base-url",
            "https://rms.example.com/resto/api/v2/",
            "--key",
            "abc",
            "--timeout",
            "5",
        ]))
        .unwrap();

        assert_eq!(config.api.base_url, "https://rms.example.com/resto/api/v2");
        assert_eq!(config.api.key, "abc");
        assert_eq!(config.api.timeout, std::time::Duration::from_secs(5));
    }

    #[test]
    fn test_empty_report_file_equals_builtin() {
        let file = write_report("");
        let config = build_export_config(&args(&["--report", file.path().to_str().unwrap()])).unwrap();
        assert_eq!(config.report, default_report_spec());
        assert_eq!(config.source, ReportSource::File(file.path().to_path_buf()));
    }

    #[test]
    fn test_report_file_overrides() {
        let file = write_report(
            r#"
report_type = "DELIVERIES"
build_summary = false
group_by_row_fields = ["Delivery.CustomerPhone"]
aggregate_fields = ["DishSumInt"]
wrap_columns = ["Телефон клиента"]
wrap_width = 12

[filters."OpenDate.Typed"]
filterType = "DateRange"
periodType = "CUSTOM"
from = "2024-01-01"
to = "2024-02-01"
includeLow = true
includeHigh = false

[filters.OrderDeleted]
filterType = "IncludeValues"
values = ["NOT_DELETED"]

[labels]
DishSumInt = "Revenue"
"#,
        );

        let config = build_export_config(&args(&["--report", file.path().to_str().unwrap()])).unwrap();
        assert_eq!(config.report.report_type, ReportType::Deliveries);
        assert!(!config.report.build_summary);
        assert_eq!(config.report.group_by_row_fields.len(), 1);
        assert_eq!(config.report.filters.len(), 2);
        assert_eq!(order_range(&config), ("2024-01-01".to_string(), "2024-02-01".to_string()));
        assert_eq!(config.present.labels.label_for("DishSumInt"), "Revenue");
        // Built-in labels survive alongside overrides
        assert_eq!(config.present.labels.label_for("GuestNum"), "Количество гостей");
        assert_eq!(config.present.wrap_columns, vec!["Телефон клиента"]);
        assert_eq!(config.present.wrap_width, 12);
    }

    #[test]
    fn test_report_file_unknown_key_is_rejected() {
        let file = write_report("groupByRowFields = []\n");
        let err = build_export_config(&args(&["--report", file.path().to_str().unwrap()])).unwrap_err();
        assert!(err.contains("Invalid report definition"), "{}", err);
    }

    #[test]
    fn test_missing_report_file() {
        let err = build_export_config(&args(&["--report", "/nonexistent/report.toml"])).unwrap_err();
        assert!(err.contains("Failed to read"));
    }

    #[test]
    fn test_date_overrides() {
        let file = write_report("");
        let config = build_export_config(&args(&[
            "--report",
            file.path().to_str().unwrap(),
            "--from",
            "2024-03-01",
            "--to",
            "2024-04-01",
        ]))
        .unwrap();
        assert_eq!(order_range(&config), ("2024-03-01".to_string(), "2024-04-01".to_string()));
    }

    #[test]
    fn test_single_date_override_keeps_other_bound() {
        let file = write_report("");
        let config =
            build_export_config(&args(&["--report", file.path().to_str().unwrap(), "--from", "2023-10-15"])).unwrap();
        assert_eq!(order_range(&config), ("2023-10-15".to_string(), "2023-11-01".to_string()));
    }

    #[test]
    fn test_date_override_creates_missing_filter() {
        let file = write_report("[filters.OrderDeleted]\nfilterType = \"IncludeValues\"\nvalues = [\"NOT_DELETED\"]\n");
        let path = file.path().to_str().unwrap();

        let err = build_export_config(&args(&["--report", path, "--from", "2024-01-01"])).unwrap_err();
        assert!(err.contains("pass both --from and --to"));

        let config =
            build_export_config(&args(&["--report", path, "--from", "2024-01-01", "--to", "2024-01-31"])).unwrap();
        match &config.report.filters[ORDER_DATE_FIELD] {
            Filter::DateRange { period_type, include_low, include_high, .. } => {
                assert_eq!(*period_type, PeriodType::Custom);
                assert!(*include_low);
                assert!(!*include_high);
            }
            other => panic!("unexpected filter: {:?}", other),
        }
    }

    #[test]
    fn test_date_override_after_end_is_rejected() {
        let file = write_report("");
        let err = build_export_config(&args(&["--report", file.path().to_str().unwrap(), "--from", "2024-06-01"]))
            .unwrap_err();
        assert!(err.contains("must be before"), "{}", err);
    }

    #[test]
    fn test_validate_rejects_bad_dates() {
        let mut spec = default_report_spec();
        spec.filters.insert(ORDER_DATE_FIELD.to_string(), Filter::custom_range("01.10.2023", "2023-11-01"));
        assert!(validate_report_spec(&spec).unwrap_err().contains("invalid 'from'"));
    }

    #[test]
    fn test_validate_rejects_empty_range() {
        let mut spec = default_report_spec();
        spec.filters.insert(ORDER_DATE_FIELD.to_string(), Filter::custom_range("2023-10-01", "2023-10-01"));
        assert!(validate_report_spec(&spec).unwrap_err().contains("must be before"));
    }

    #[test]
    fn test_validate_checks_every_period_type() {
        let mut spec = default_report_spec();
        spec.filters.insert(
            ORDER_DATE_FIELD.to_string(),
            Filter::DateRange {
                period_type: PeriodType::LastMonth,
                from: "last month".to_string(),
                to: "2023-11-01".to_string(),
                include_low: true,
                include_high: false,
            },
        );
        assert!(validate_report_spec(&spec).unwrap_err().contains("invalid 'from'"));
    }

    #[test]
    fn test_validate_rejects_empty_include_values() {
        let mut spec = default_report_spec();
        spec.filters.insert("OrderDeleted".to_string(), Filter::include_values(Vec::<String>::new()));
        assert!(validate_report_spec(&spec).is_err());
    }

    #[test]
    fn test_validate_rejects_no_fields() {
        let mut spec = default_report_spec();
        spec.group_by_row_fields.clear();
        spec.aggregate_fields.clear();
        assert!(validate_report_spec(&spec).is_err());
    }

    #[test]
    fn test_parse_date_bound_formats() {
        assert!(parse_date_bound("2023-10-01").is_some());
        assert!(parse_date_bound("2023-10-01T12:30:00.000").is_some());
        assert!(parse_date_bound("2023-10-01T12:30:00").is_some());
        assert!(parse_date_bound("yesterday").is_none());
    }
}
