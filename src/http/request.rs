//! Platform-neutral request model
//!
//! Both the Lambda adapter and the local server convert their native
//! requests into an `ApiRequest` before calling a handler.

use hyper::body::Bytes;
use hyper::Method;
use std::collections::HashMap;

/// HTTP-shaped request as delivered by the invocation platform
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    /// Query parameters, values kept in order of occurrence
    pub query: HashMap<String, Vec<String>>,
    pub body: Bytes,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: HashMap::new(),
            body: Bytes::new(),
        }
    }

    /// Replace the query parameters with those parsed from a raw query string
    #[must_use]
    pub fn with_query_string(mut self, query: Option<&str>) -> Self {
        self.query = query.map(parse_query).unwrap_or_default();
        self
    }

    /// Replace the query parameters with an already decoded map
    #[must_use]
    pub fn with_query(mut self, query: HashMap<String, Vec<String>>) -> Self {
        self.query = query;
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// First value of the first occurrence of `key`
    pub fn query_first(&self, key: &str) -> Option<&str> {
        self.query
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    pub fn path_ends_with(&self, suffix: &str) -> bool {
        self.path.ends_with(suffix)
    }
}

/// Parse an `application/x-www-form-urlencoded` query string.
///
/// Pairs that fail percent-decoding are kept verbatim.
pub fn parse_query(query: &str) -> HashMap<String, Vec<String>> {
    let mut params: HashMap<String, Vec<String>> = HashMap::new();

    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        params
            .entry(decode_component(key))
            .or_default()
            .push(decode_component(value));
    }

    params
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced).map_or(spaced.clone(), |decoded| decoded.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_query_multi_value() {
        let params = parse_query("filename=a.txt&filename=b.txt&x=1");
        assert_eq!(
            params.get("filename"),
            Some(&vec!["a.txt".to_string(), "b.txt".to_string()])
        );
        assert_eq!(params.get("x"), Some(&vec!["1".to_string()]));
    }

    #[test]
    fn test_parse_query_decoding() {
        let params = parse_query("filename=my%20file+v2.txt&flag");
        assert_eq!(params["filename"], vec!["my file v2.txt".to_string()]);
        assert_eq!(params["flag"], vec![String::new()]);
    }

    #[test]
    fn test_parse_query_invalid_escape_kept() {
        let params = parse_query("filename=%E0%A4%A");
        assert_eq!(params["filename"], vec!["%E0%A4%A".to_string()]);
    }

    #[test]
    fn test_query_first() {
        let req = ApiRequest::new(Method::POST, "/prod/upload")
            .with_query_string(Some("filename=first&filename=second"));
        assert_eq!(req.query_first("filename"), Some("first"));
        assert_eq!(req.query_first("missing"), None);
        assert!(req.path_ends_with("/upload"));
    }

    #[test]
    fn test_without_query() {
        let req = ApiRequest::new(Method::GET, "/upload").with_query_string(None);
        assert!(req.query.is_empty());
    }
}
