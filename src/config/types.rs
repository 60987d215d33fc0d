// Configuration types module
// Defines all configuration-related data structures

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub upload: UploadConfig,
    pub version: VersionConfig,
}

/// Local development server configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Path served by the version handler (default: /version)
    pub version_path: String,
    /// Per-connection timeout in seconds
    pub request_timeout: u64,
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    /// Output format: "text" or "json"
    pub format: String,
    /// Emit timestamps (disable on Lambda, CloudWatch stamps every line)
    pub timestamps: bool,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Upload handler configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct UploadConfig {
    /// Directory uploads are listed from and written to
    pub base_dir: PathBuf,
    /// Mode for directories created on demand
    pub dir_mode: u32,
    /// Mode for uploaded files
    pub file_mode: u32,
}

/// Where the version handler reads its parameters from
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ParameterSource {
    /// AWS SSM Parameter Store
    #[default]
    Ssm,
    /// Fixed values from `version.static_values`
    Static,
}

/// Version handler configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct VersionConfig {
    #[serde(default)]
    pub source: ParameterSource,
    /// AWS region; the SDK default chain is used when unset
    #[serde(default)]
    pub region: Option<String>,
    /// Name of the parameter holding the release image tag
    pub image_tag_parameter: String,
    /// Name of the parameter holding the package version
    pub version_parameter: String,
    #[serde(default)]
    pub static_values: HashMap<String, String>,
}

impl VersionConfig {
    /// Reports an unset parameter name; lookups of an empty name fail per request
    pub fn validate(&self) -> Result<(), String> {
        if self.image_tag_parameter.trim().is_empty() {
            return Err("version.image_tag_parameter (IMAGE_TAG_PARAMETER_NAME) is not set".into());
        }
        if self.version_parameter.trim().is_empty() {
            return Err("version.version_parameter (VERSION_PARAMETER_NAME) is not set".into());
        }
        Ok(())
    }
}
