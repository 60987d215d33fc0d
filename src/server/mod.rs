// Local development server
// Hosts both functions on one port, accepting until SIGINT/SIGTERM

pub mod connection;
pub mod listener;
pub mod router;

pub use listener::create_listener;
pub use router::LocalRouter;

use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use crate::config::Config;
use crate::logger;
use crate::store::{FileStore, ParameterStore};

/// Accept loop: one spawned task per connection, stops on shutdown signal
pub async fn run<F, P>(
    listener: TcpListener,
    router: LocalRouter<F, P>,
    config: &Config,
) -> std::io::Result<()>
where
    F: FileStore + 'static,
    P: ParameterStore + 'static,
{
    let router = Arc::new(router);
    let logging = Arc::new(config.logging.clone());
    let timeout = Duration::from_secs(config.server.request_timeout);

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        connection::handle_connection(
                            stream,
                            peer_addr,
                            Arc::clone(&router),
                            Arc::clone(&logging),
                            timeout,
                        );
                    }
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }

            () = &mut shutdown => {
                logger::log_info("Shutdown signal received, no longer accepting connections");
                return Ok(());
            }
        }
    }
}

/// Resolves on SIGINT (Ctrl+C) or SIGTERM
#[cfg(unix)]
async fn shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(s) => s,
        Err(e) => {
            logger::log_warning(&format!("Failed to register SIGTERM handler: {e}"));
            let _ = tokio::signal::ctrl_c().await;
            return;
        }
    };

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {}
        _ = sigterm.recv() => {}
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
