//! Access log format module
//!
//! Supports `combined`, `common`, `json` and custom `$variable` patterns.

use chrono::{DateTime, Local};
use serde_json::json;

const TIME_LOCAL_FORMAT: &str = "%d/%b/%Y:%H:%M:%S %z";

/// Access log line layout, parsed once from configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessLogFormat {
    Combined,
    Common,
    Json,
    Custom(String),
}

impl AccessLogFormat {
    pub fn parse(value: &str) -> Self {
        match value {
            "combined" => Self::Combined,
            "common" => Self::Common,
            "json" => Self::Json,
            custom => Self::Custom(custom.to_string()),
        }
    }
}

/// Access log entry containing all request/response information
#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    pub remote_addr: String,
    pub time: DateTime<Local>,
    pub method: String,
    pub path: String,
    /// Query string without the leading `?`
    pub query: Option<String>,
    pub http_version: String,
    pub status: u16,
    pub body_bytes: u64,
    pub referer: Option<String>,
    pub user_agent: Option<String>,
    pub request_time_us: u64,
}

impl AccessLogEntry {
    /// Create a new access log entry stamped with the current time
    pub fn new(remote_addr: String, method: String, path: String) -> Self {
        Self {
            remote_addr,
            time: Local::now(),
            method,
            path,
            query: None,
            http_version: "1.1".to_string(),
            status: 200,
            body_bytes: 0,
            referer: None,
            user_agent: None,
            request_time_us: 0,
        }
    }

    pub fn format(&self, format: &AccessLogFormat) -> String {
        match format {
            AccessLogFormat::Combined => format!(
                "{} \"{}\" \"{}\"",
                self.format_common(),
                self.referer.as_deref().unwrap_or("-"),
                self.user_agent.as_deref().unwrap_or("-"),
            ),
            AccessLogFormat::Common => self.format_common(),
            AccessLogFormat::Json => self.format_json(),
            AccessLogFormat::Custom(pattern) => self.format_custom(pattern),
        }
    }

    fn request_uri(&self) -> String {
        match &self.query {
            Some(q) => format!("{}?{q}", self.path),
            None => self.path.clone(),
        }
    }

    fn request_line(&self) -> String {
        format!(
            "{} {} HTTP/{}",
            self.method,
            self.request_uri(),
            self.http_version
        )
    }

    /// `$remote_addr - - [$time_local] "$request" $status $body_bytes_sent`
    fn format_common(&self) -> String {
        format!(
            "{} - - [{}] \"{}\" {} {}",
            self.remote_addr,
            self.time.format(TIME_LOCAL_FORMAT),
            self.request_line(),
            self.status,
            self.body_bytes,
        )
    }

    fn format_json(&self) -> String {
        json!({
            "remote_addr": self.remote_addr,
            "time": self.time.to_rfc3339(),
            "method": self.method,
            "path": self.path,
            "query": self.query,
            "http_version": self.http_version,
            "status": self.status,
            "body_bytes": self.body_bytes,
            "referer": self.referer,
            "user_agent": self.user_agent,
            "request_time_us": self.request_time_us,
        })
        .to_string()
    }

    /// Custom format with variable substitution
    ///
    /// Variables: `$remote_addr`, `$time_local`, `$time_iso8601`, `$request`,
    /// `$request_method`, `$request_uri`, `$request_time`, `$status`,
    /// `$body_bytes_sent`, `$http_referer`, `$http_user_agent`.
    fn format_custom(&self, pattern: &str) -> String {
        #[allow(clippy::cast_precision_loss)]
        let request_time = self.request_time_us as f64 / 1_000_000.0;

        // Longer names first: $request_time and $request_method before $request
        let substitutions = [
            ("$remote_addr", self.remote_addr.clone()),
            ("$time_local", self.time.format(TIME_LOCAL_FORMAT).to_string()),
            ("$time_iso8601", self.time.to_rfc3339()),
            ("$request_time", format!("{request_time:.3}")),
            ("$request_method", self.method.clone()),
            ("$request_uri", self.request_uri()),
            ("$request", self.request_line()),
            ("$status", self.status.to_string()),
            ("$body_bytes_sent", self.body_bytes.to_string()),
            ("$http_referer", self.referer.clone().unwrap_or_else(|| "-".to_string())),
            (
                "$http_user_agent",
                self.user_agent.clone().unwrap_or_else(|| "-".to_string()),
            ),
        ];

        substitutions
            .iter()
            .fold(pattern.to_string(), |acc, (name, value)| acc.replace(name, value))
    }
}
