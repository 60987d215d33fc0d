//! Logger module
//!
//! Provides logging utilities for the functions and the local server:
//! - Subscriber setup (text or JSON, `tracing-subscriber`)
//! - Startup logging
//! - Access logging with multiple formats
//! - Error and warning logging

mod format;

pub use format::AccessLogEntry;

use crate::config::{Config, LoggingConfig};
use std::net::SocketAddr;
use thiserror::Error;
use tracing::Level;

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("invalid log level '{0}'")]
    InvalidLevel(String),
    #[error("failed to install log subscriber: {0}")]
    Install(String),
}

/// Initialize the global subscriber with configuration
///
/// Should be called once at application startup.
pub fn init(config: &LoggingConfig) -> Result<(), LoggerError> {
    let level: Level = config
        .level
        .parse()
        .map_err(|_| LoggerError::InvalidLevel(config.level.clone()))?;

    let builder = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false);

    let installed = match (config.format.as_str(), config.timestamps) {
        ("json", true) => builder.json().try_init(),
        ("json", false) => builder.json().without_time().try_init(),
        (_, true) => builder.try_init(),
        (_, false) => builder.without_time().try_init(),
    };

    installed.map_err(|e| LoggerError::Install(e.to_string()))
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    tracing::info!("======================================");
    tracing::info!("Local server started");
    tracing::info!("Listening on: http://{addr}");
    tracing::info!("  - GET/POST http://{addr}/upload");
    tracing::info!("  - GET      http://{addr}{}", config.server.version_path);
    tracing::info!("Upload directory: {}", config.upload.base_dir.display());
    tracing::info!("Parameter source: {:?}", config.version.source);
    tracing::info!("Log level: {}", config.logging.level);
    tracing::info!("======================================");
}

pub fn log_function_start(name: &str, config: &Config) {
    tracing::info!(
        function = name,
        upload_dir = %config.upload.base_dir.display(),
        region = config.version.region.as_deref().unwrap_or("default"),
        "function runtime starting"
    );
}

pub fn log_info(message: &str) {
    tracing::info!("{message}");
}

pub fn log_error(message: &str) {
    tracing::error!("{message}");
}

pub fn log_warning(message: &str) {
    tracing::warn!("{message}");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    tracing::error!("Failed to serve connection: {err:?}");
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    tracing::info!(target: "access", "{}", entry.format(format));
}
