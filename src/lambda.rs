//! AWS Lambda adapter
//!
//! Converts `lambda_http` events into `ApiRequest`s, runs a `Function` and
//! converts the `ApiResponse` back.

use crate::config::LoggingConfig;
use crate::handler::Function;
use crate::http::{ApiRequest, ApiResponse};
use crate::logger::{self, AccessLogEntry};
use hyper::body::Bytes;
use lambda_http::{service_fn, Body, Error, Request, RequestExt, Response};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

/// Convert an API Gateway request into the handler model.
///
/// Query parameters come from the event's pre-decoded multi-value map; a
/// request without that extension falls back to the URI query string.
/// Base64 bodies have already been decoded into `Body::Binary`.
pub fn to_api_request(req: Request) -> ApiRequest {
    let query = req.query_string_parameters_ref().map(|params| {
        let mut query: HashMap<String, Vec<String>> = HashMap::new();
        for (key, value) in params.iter() {
            query.entry(key.to_string()).or_default().push(value.to_string());
        }
        query
    });

    let (parts, body) = req.into_parts();
    let api_req = ApiRequest::new(parts.method, parts.uri.path())
        .with_body(Bytes::copy_from_slice(body.as_ref()));

    match query {
        Some(query) => api_req.with_query(query),
        None => api_req.with_query_string(parts.uri.query()),
    }
}

pub fn to_lambda_response(resp: ApiResponse) -> Result<Response<Body>, Error> {
    let mut builder = Response::builder().status(resp.status);
    for (name, value) in &resp.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    Ok(builder.body(Body::from(resp.body))?)
}

/// Run `function` on the Lambda runtime until the runtime shuts down
pub async fn run<H>(function: H, logging: LoggingConfig) -> Result<(), Error>
where
    H: Function + 'static,
{
    let function = Arc::new(function);
    let logging = Arc::new(logging);

    lambda_http::run(service_fn(move |req: Request| {
        let function = Arc::clone(&function);
        let logging = Arc::clone(&logging);
        async move { invoke(function.as_ref(), req, &logging).await }
    }))
    .await
}

async fn invoke<H: Function>(
    function: &H,
    req: Request,
    logging: &LoggingConfig,
) -> Result<Response<Body>, Error> {
    let started = Instant::now();
    let request_id = req
        .lambda_context_ref()
        .map_or_else(|| "-".to_string(), |ctx| ctx.request_id.clone());
    let user_agent = req
        .headers()
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string);

    let api_req = to_api_request(req);
    let mut entry = AccessLogEntry::new(request_id, function.name(), &api_req);
    entry.user_agent = user_agent;

    let resp = function.call(&api_req).await;

    if logging.access_log {
        entry.complete(&resp, started.elapsed());
        logger::log_access(&entry, &logging.access_log_format);
    }

    to_lambda_response(resp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::build_json_response;
    use hyper::Method;

    #[test]
    fn test_to_api_request() {
        let req = lambda_http::http::Request::builder()
            .method("POST")
            .uri("https://example.com/prod/upload?filename=a%20b.txt&filename=c")
            .body(Body::Binary(vec![0, 159, 146, 150]))
            .unwrap();

        let api_req = to_api_request(req);
        assert_eq!(api_req.method, Method::POST);
        assert_eq!(api_req.path, "/prod/upload");
        assert_eq!(api_req.query_first("filename"), Some("a b.txt"));
        assert_eq!(api_req.body.as_ref(), &[0, 159, 146, 150]);
    }

    #[test]
    fn test_to_api_request_uses_event_query_parameters() {
        let params = HashMap::from([
            (
                "filename".to_string(),
                vec!["x&y=z.txt".to_string(), "second".to_string()],
            ),
            ("note".to_string(), vec!["100%".to_string()]),
        ]);
        let req = lambda_http::http::Request::builder()
            .method("POST")
            .uri("https://example.com/prod/upload?filename=stale")
            .body(Body::Text("data".to_string()))
            .unwrap()
            .with_query_string_parameters(params);

        let api_req = to_api_request(req);
        assert_eq!(api_req.query_first("filename"), Some("x&y=z.txt"));
        assert_eq!(api_req.query["filename"], vec!["x&y=z.txt", "second"]);
        assert_eq!(api_req.query_first("note"), Some("100%"));
    }

    #[test]
    fn test_to_api_request_text_body() {
        let req = lambda_http::http::Request::builder()
            .method("GET")
            .uri("/version")
            .body(Body::Text("ignored".to_string()))
            .unwrap();

        let api_req = to_api_request(req);
        assert_eq!(api_req.method, Method::GET);
        assert!(api_req.query.is_empty());
        assert_eq!(api_req.body.as_ref(), b"ignored");
    }

    #[test]
    fn test_to_lambda_response() {
        let resp = to_lambda_response(build_json_response("{}".to_string())).unwrap();
        assert_eq!(resp.status(), 200);
        assert_eq!(
            resp.headers().get("Content-Type").and_then(|v| v.to_str().ok()),
            Some("application/json")
        );
        assert!(matches!(resp.body(), Body::Text(s) if s == "{}"));
    }
}
