// Connection handling module
// Serves a single TCP connection with hyper and the local router

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;

use super::router::LocalRouter;
use crate::config::LoggingConfig;
use crate::http::{build_text_response, ApiRequest};
use crate::logger::{self, AccessLogEntry};
use crate::store::{FileStore, ParameterStore};

/// Handle a single connection in a spawned task.
///
/// The connection is dropped when it outlives `timeout`, standing in for
/// the invocation timeout the platform enforces on Lambda.
pub fn handle_connection<F, P>(
    stream: tokio::net::TcpStream,
    peer_addr: SocketAddr,
    router: Arc<LocalRouter<F, P>>,
    logging: Arc<LoggingConfig>,
    timeout: Duration,
) where
    F: FileStore + 'static,
    P: ParameterStore + 'static,
{
    tokio::spawn(async move {
        let io = TokioIo::new(stream);

        let conn = http1::Builder::new().serve_connection(
            io,
            service_fn(move |req| {
                let router = Arc::clone(&router);
                let logging = Arc::clone(&logging);
                async move { serve_request(req, peer_addr, &router, &logging).await }
            }),
        );

        match tokio::time::timeout(timeout, conn).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => logger::log_connection_error(&err),
            Err(_) => logger::log_warning(&format!(
                "Connection from {peer_addr} timed out after {} seconds",
                timeout.as_secs()
            )),
        }
    });
}

async fn serve_request<F: FileStore, P: ParameterStore>(
    req: Request<Incoming>,
    peer_addr: SocketAddr,
    router: &LocalRouter<F, P>,
    logging: &LoggingConfig,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let user_agent = req
        .headers()
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string);

    let api_req = match into_api_request(req).await {
        Ok(api_req) => api_req,
        Err(err) => {
            logger::log_warning(&format!("Failed to read request body from {peer_addr}: {err}"));
            return Ok(build_text_response(400, "failed to read request body").into_hyper());
        }
    };

    let (function, resp) = router.route(&api_req).await;

    if logging.access_log {
        let mut entry = AccessLogEntry::new(peer_addr.ip().to_string(), function, &api_req);
        entry.user_agent = user_agent;
        entry.complete(&resp, started.elapsed());
        logger::log_access(&entry, &logging.access_log_format);
    }

    Ok(resp.into_hyper())
}

/// Buffer the whole body; uploads are handled in one piece
async fn into_api_request(req: Request<Incoming>) -> Result<ApiRequest, hyper::Error> {
    let (parts, body) = req.into_parts();
    let body = body.collect().await?.to_bytes();
    Ok(ApiRequest::new(parts.method, parts.uri.path())
        .with_query_string(parts.uri.query())
        .with_body(body))
}
