use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/resto/api/v2";
pub const DEFAULT_OUTPUT: &str = "olap_report_sales.xlsx";
pub const DEFAULT_SHEET_NAME: &str = "Отчет";

/// Get the default location of the report definition file
/// Uses platform-specific config directories:
/// - Linux: ~/.config/olap-export/report.toml
/// - macOS: ~/Library/Application Support/olap-export/report.toml
/// - Windows: %APPDATA%/olap-export/report.toml
pub fn default_report_file() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("olap-export").join("report.toml"))
}

#[derive(Parser, Debug, Clone)]
#[command(name = "olap-export")]
#[command(about = "Fetch an OLAP sales report, print it and export it to a spreadsheet")]
#[command(version)]
pub struct CliArgs {
    /// Base URL of the back-office API
    #[arg(long, value_name = "URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Static API key, passed as the `key` query parameter
    #[arg(long, value_name = "KEY", default_value = "")]
    pub key: String,

    /// TOML report definition (fields, filters, labels)
    /// Default: ~/.config/olap-export/report.toml if it exists, else the built-in sales report
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,

    /// Override the start of the order date range (YYYY-MM-DD, inclusive)
    #[arg(long, value_name = "DATE")]
    pub from: Option<NaiveDate>,

    /// Override the end of the order date range (YYYY-MM-DD, exclusive)
    #[arg(long, value_name = "DATE")]
    pub to: Option<NaiveDate>,

    /// Spreadsheet output path
    #[arg(long, short = 'o', default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Worksheet name
    #[arg(long, default_value = DEFAULT_SHEET_NAME)]
    pub sheet_name: String,

    /// Also write the table and summary as JSON
    #[arg(long, value_name = "PATH")]
    pub json_output: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS", default_value = "60")]
    pub timeout: u64,

    /// Print the fields the server offers for the report type and exit
    #[arg(long)]
    pub list_columns: bool,

    /// Override console width (default: auto-detect)
    #[arg(long, value_name = "COLUMNS")]
    pub console_width: Option<usize>,

    /// Disable colored diagnostics
    #[arg(long)]
    pub no_color: bool,
}

impl CliArgs {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        CliArgs::parse()
    }

    /// Validate argument combinations
    pub fn validate(&self) -> Result<(), String> {
        if self.timeout == 0 {
            return Err("--timeout must be at least 1 second".to_string());
        }

        if let (Some(from), Some(to)) = (self.from, self.to)
            && from >= to
        {
            return Err(format!("--from ({}) must be before --to ({})", from, to));
        }

        if self.output.as_os_str().is_empty() {
            return Err("--output must not be empty".to_string());
        }

        validate_sheet_name(&self.sheet_name)?;

        if self.base_url.trim().is_empty() {
            return Err("--base-url must not be empty".to_string());
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

/// Spreadsheet applications reject sheet names that are empty, longer
/// than 31 characters, or contain any of `[]:*?/\`
pub fn validate_sheet_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("--sheet-name must not be empty".to_string());
    }
    if name.chars().count() > 31 {
        return Err(format!("--sheet-name '{}' is longer than 31 characters", name));
    }
    if let Some(c) = name.chars().find(|c| "[]:*?/\\".contains(*c)) {
        return Err(format!("--sheet-name '{}' contains forbidden character '{}'", name, c));
    }
    Ok(())
}
