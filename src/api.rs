/// API module for the back-office reporting service
///
/// This module provides the two calls the exporter makes:
/// - column discovery (`GET /reports/olap/columns`)
/// - report fetch (`POST /reports/olap`)
///
/// Both calls authenticate with a static key passed as a query parameter.
/// Nothing here prints; failures come back as `FetchError` and the caller
/// decides what to tell the user.
use crate::config::ApiConfig;
use crate::types::{ReportSpec, ReportType};
use log::debug;
use serde_json::Value;
use thiserror::Error;

const CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Why a request to the reporting service produced no result
#[derive(Debug, Error)]
pub enum FetchError {
    /// The server answered with a non-success status
    #[error("HTTP {code}: {body}")]
    Status { code: u16, body: String },

    /// The request never got a response (DNS, connect, timeout, TLS)
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body was not the JSON we expected
    #[error("invalid response body: {0}")]
    Decode(String),

    /// Reading the response body failed
    #[error("failed to read response: {0}")]
    Io(String),

    /// The request body could not be built
    #[error("failed to encode request: {0}")]
    Encode(String),
}

/// Parsed report response: row-level `data` and the optional `summary` record
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub data: Vec<Value>,
    pub summary: Option<Value>,
}

impl Report {
    /// Split a response body into data and summary; absent or null `data` means no rows
    pub fn from_value(value: Value) -> Result<Self, FetchError> {
        let Value::Object(mut body) = value else {
            return Err(FetchError::Decode("expected a JSON object with `data` and `summary`".to_string()));
        };

        let data = match body.remove("data") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(rows)) => rows,
            Some(other) => {
                return Err(FetchError::Decode(format!("`data` must be an array, got {}", short_kind(&other))));
            }
        };

        let summary = body.remove("summary").filter(|s| !s.is_null());

        Ok(Report { data, summary })
    }
}

/// Blocking client for the reporting endpoints
pub struct ApiClient {
    agent: ureq::Agent,
    base_url: String,
    key: String,
}

impl ApiClient {
    /// Create a client with the configured per-request timeout
    pub fn new(config: &ApiConfig) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(config.timeout).build();
        ApiClient { agent, base_url: config.base_url.trim_end_matches('/').to_string(), key: config.key.clone() }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Ask the server which fields a report type offers
    ///
    /// The body is returned unchanged; see `columns::ColumnCatalog` for interpretation.
    pub fn get_olap_columns(&self, report_type: ReportType) -> Result<Value, FetchError> {
        let url = self.url("reports/olap/columns");
        debug!("GET {} reportType={}", url, report_type);

        let request = self
            .agent
            .get(&url)
            .query("key", &self.key)
            .query("reportType", report_type.as_str())
            .set("Content-Type", CONTENT_TYPE);

        let body = read_body(request.call())?;
        parse_json(&body)
    }

    /// Submit a report specification and return the parsed report
    pub fn get_olap_report(&self, spec: &ReportSpec) -> Result<Report, FetchError> {
        let url = self.url("reports/olap");
        let request_body = spec.to_request_body().map_err(|e| FetchError::Encode(e.to_string()))?;
        debug!("POST {} body={}", url, request_body);

        let request = self.agent.post(&url).query("key", &self.key).set("Content-Type", CONTENT_TYPE);

        let body = read_body(request.send_string(&request_body))?;
        Report::from_value(parse_json(&body)?)
    }
}

/// Turn a ureq outcome into the response text or a `FetchError`
fn read_body(outcome: Result<ureq::Response, ureq::Error>) -> Result<String, FetchError> {
    match outcome {
        Ok(response) => {
            debug!("response status {}", response.status());
            response.into_string().map_err(|e| FetchError::Io(e.to_string()))
        }
        Err(ureq::Error::Status(code, response)) => {
            let body = response.into_string().unwrap_or_default();
            debug!("request failed with status {}", code);
            Err(FetchError::Status { code, body })
        }
        Err(ureq::Error::Transport(transport)) => Err(FetchError::Transport(transport.to_string())),
    }
}

fn parse_json(body: &str) -> Result<Value, FetchError> {
    serde_json::from_str(body).map_err(|e| FetchError::Decode(e.to_string()))
}

fn short_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;
