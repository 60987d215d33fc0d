//! HTTP response building module
//!
//! Provides builders for the responses the handlers return, decoupled from
//! the platform that finally delivers them.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use std::collections::BTreeMap;

/// HTTP-shaped response handed back to the invocation platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: BTreeMap::new(),
            body: body.into(),
        }
    }

    #[must_use]
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_string(), value.to_string());
        self
    }

    /// Header lookup, case-insensitive
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Convert into a hyper response for the local server
    pub fn into_hyper(self) -> Response<Full<Bytes>> {
        let status = self.status;
        let mut builder = Response::builder().status(status);
        for (name, value) in &self.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder.body(Full::new(Bytes::from(self.body))).unwrap_or_else(|e| {
            log_build_error(status, &e);
            let mut fallback = Response::new(Full::new(Bytes::from("500 Internal Server Error")));
            *fallback.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            fallback
        })
    }
}

/// Build generic HTML response
pub fn build_html_response(content: String) -> ApiResponse {
    ApiResponse::new(200, content).with_header("content-type", "text/html")
}

/// Build plain-text response with the given status
pub fn build_text_response(status: u16, message: impl Into<String>) -> ApiResponse {
    ApiResponse::new(status, message).with_header("Content-Type", "text/plain")
}

/// Build 200 JSON response
pub fn build_json_response(body: String) -> ApiResponse {
    ApiResponse::new(200, body).with_header("Content-Type", "application/json")
}

/// Build 404 Not Found response
pub fn build_404_response() -> ApiResponse {
    build_text_response(404, "404 Not Found")
}

/// Log response build error
fn log_build_error(status: u16, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
