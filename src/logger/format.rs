//! Access log format module
//!
//! Supports multiple log formats:
//! - `combined` (Apache/Nginx combined format)
//! - `common` (Common Log Format - CLF)
//! - `json` (JSON structured logging)
//! - Custom patterns with variables

use crate::http::{ApiRequest, ApiResponse};
use chrono::Local;
use serde_json::json;

/// Access log entry for one handled request
#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    /// Client address, or the platform request id on Lambda
    pub remote_addr: String,
    /// Request timestamp
    pub time: chrono::DateTime<Local>,
    /// Function that handled the request
    pub function: String,
    /// HTTP method (GET, POST, etc.)
    pub method: String,
    /// Request URI path
    pub path: String,
    /// Request body size in bytes
    pub request_bytes: usize,
    /// Response status code
    pub status: u16,
    /// Response body size in bytes
    pub body_bytes: usize,
    /// User-Agent header
    pub user_agent: Option<String>,
    /// Request processing time in microseconds
    pub request_time_us: u64,
}

impl AccessLogEntry {
    /// Create a new access log entry with current timestamp
    pub fn new(remote_addr: String, function: &str, request: &ApiRequest) -> Self {
        Self {
            remote_addr,
            time: Local::now(),
            function: function.to_string(),
            method: request.method.to_string(),
            path: request.path.clone(),
            request_bytes: request.body.len(),
            status: 0,
            body_bytes: 0,
            user_agent: None,
            request_time_us: 0,
        }
    }

    /// Record the response and elapsed time
    pub fn complete(&mut self, response: &ApiResponse, elapsed: std::time::Duration) {
        self.status = response.status;
        self.body_bytes = response.body.len();
        self.request_time_us = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);
    }

    /// Format the log entry according to the specified format
    pub fn format(&self, format: &str) -> String {
        match format {
            "combined" => self.format_combined(),
            "common" => self.format_common(),
            "json" => self.format_json(),
            custom => self.format_custom(custom),
        }
    }

    /// `$remote_addr - - [$time_local] "$request" $status $body_bytes_sent "-" "$http_user_agent"`
    fn format_combined(&self) -> String {
        format!(
            "{} \"-\" {}",
            self.format_common(),
            self.user_agent
                .as_deref()
                .map_or_else(|| "\"-\"".to_string(), |ua| format!("\"{ua}\"")),
        )
    }

    /// `$remote_addr - - [$time_local] "$request" $status $body_bytes_sent`
    fn format_common(&self) -> String {
        format!(
            "{} - - [{}] \"{} {}\" {} {}",
            self.remote_addr,
            self.time.format("%d/%b/%Y:%H:%M:%S %z"),
            self.method,
            self.path,
            self.status,
            self.body_bytes,
        )
    }

    /// JSON structured log format
    fn format_json(&self) -> String {
        json!({
            "remote_addr": self.remote_addr,
            "time": self.time.to_rfc3339(),
            "function": self.function,
            "method": self.method,
            "path": self.path,
            "request_bytes": self.request_bytes,
            "status": self.status,
            "body_bytes": self.body_bytes,
            "user_agent": self.user_agent,
            "request_time_us": self.request_time_us,
        })
        .to_string()
    }

    /// Custom format with variable substitution
    ///
    /// Supported variables: `$remote_addr`, `$time_local`, `$time_iso8601`,
    /// `$function`, `$request_method`, `$request_uri`, `$request_time`,
    /// `$request_length`, `$status`, `$body_bytes_sent`, `$http_user_agent`
    fn format_custom(&self, pattern: &str) -> String {
        #[allow(clippy::cast_precision_loss)]
        let request_time = self.request_time_us as f64 / 1_000_000.0;

        pattern
            .replace("$remote_addr", &self.remote_addr)
            .replace(
                "$time_local",
                &self.time.format("%d/%b/%Y:%H:%M:%S %z").to_string(),
            )
            .replace("$time_iso8601", &self.time.to_rfc3339())
            .replace("$function", &self.function)
            .replace("$request_time", &format!("{request_time:.3}"))
            .replace("$request_length", &self.request_bytes.to_string())
            .replace("$request_method", &self.method)
            .replace("$request_uri", &self.path)
            .replace("$status", &self.status.to_string())
            .replace("$body_bytes_sent", &self.body_bytes.to_string())
            .replace("$http_user_agent", self.user_agent.as_deref().unwrap_or("-"))
    }
}
