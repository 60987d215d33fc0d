// Configuration module entry point
// Loads layered configuration and captures the process identity once at startup

mod identity;
mod types;

pub use identity::RuntimeIdentity;
pub use types::{
    Config, LoggingConfig, ParameterSource, ServerConfig, UploadConfig, VersionConfig,
};

use std::net::SocketAddr;

/// Default config file path (without extension)
pub const DEFAULT_CONFIG_PATH: &str = "config";

/// Environment variable that overrides the config file path
pub const CONFIG_PATH_ENV: &str = "CMS_CONFIG";

/// Unprefixed variables set on the deployed functions, mapped onto config keys
const LEGACY_ENV_OVERRIDES: [(&str, &str); 3] = [
    ("REGION", "version.region"),
    ("IMAGE_TAG_PARAMETER_NAME", "version.image_tag_parameter"),
    ("VERSION_PARAMETER_NAME", "version.version_parameter"),
];

impl Config {
    /// Load configuration from the path in `CMS_CONFIG`, or "config.toml"
    pub fn load() -> Result<Self, config::ConfigError> {
        let path =
            std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(&path)
    }

    /// Load configuration from specified file path (without extension)
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        Self::load_with(config_path, std::env::vars().collect())
    }

    /// Same as `load_from`, with every environment layer read from `vars`
    pub fn load_with(
        config_path: &str,
        vars: config::Map<String, String>,
    ) -> Result<Self, config::ConfigError> {
        let legacy: Vec<(&str, Option<String>)> = LEGACY_ENV_OVERRIDES
            .iter()
            .map(|(var, key)| {
                let value = vars.get(*var).filter(|v| !v.trim().is_empty()).cloned();
                (*key, value)
            })
            .collect();

        let mut builder = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("CMS")
                    .prefix_separator("_")
                    .separator("__")
                    .source(Some(vars)),
            )
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("server.version_path", "/version")?
            .set_default("server.request_timeout", 30)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "text")?
            .set_default("logging.timestamps", true)?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("upload.base_dir", "/mnt/efs/apps/")?
            .set_default("upload.dir_mode", 0o755)?
            .set_default("upload.file_mode", 0o644)?
            .set_default("version.source", "ssm")?
            .set_default("version.image_tag_parameter", "")?
            .set_default("version.version_parameter", "")?;

        for (key, value) in legacy {
            builder = builder.set_override_option(key, value)?;
        }

        builder.build()?.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}
