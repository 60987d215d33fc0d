//! Storage capabilities injected into the handlers
//!
//! - `ParameterStore`: named string lookups (SSM, or a static map)
//! - `FileStore`: the upload directory (local/EFS filesystem, or memory)

pub mod fs;
pub mod memory;
pub mod path;
pub mod ssm;

pub use fs::LocalFileStore;
pub use memory::{MemoryFault, MemoryFileStore, MemoryParameterStore};
pub use path::{PathError, UploadName};
pub use ssm::SsmParameterStore;

use crate::config::{ParameterSource, VersionConfig};
use std::future::Future;
use std::io;
use thiserror::Error;

/// Parameter lookup failure
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("parameter {name} not found")]
    NotFound { name: String },
    #[error("parameter {name} has no value")]
    MissingValue { name: String },
    #[error("parameter store request for {name} failed: {message}")]
    Backend { name: String, message: String },
}

/// Upload write failure
#[derive(Debug, Error)]
pub enum WriteError {
    #[error(transparent)]
    Path(#[from] PathError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Read-only key lookup by name
pub trait ParameterStore: Send + Sync {
    fn get_parameter(&self, name: &str) -> impl Future<Output = Result<String, StoreError>> + Send;
}

/// Directory that uploads are listed from and written into
pub trait FileStore: Send + Sync {
    /// Create the directory if absent; not an error when it already exists
    fn ensure_dir(&self) -> impl Future<Output = io::Result<()>> + Send;

    /// Names of the immediate entries of the directory
    fn list(&self) -> impl Future<Output = io::Result<Vec<String>>> + Send;

    /// Create or truncate `name` and write `content` to it
    fn write(
        &self,
        name: &UploadName,
        content: &[u8],
    ) -> impl Future<Output = Result<(), WriteError>> + Send;
}

/// Parameter store selected by configuration
#[derive(Debug)]
pub enum ParameterBackend {
    Ssm(SsmParameterStore),
    Static(MemoryParameterStore),
}

impl ParameterBackend {
    /// Connect to the source named in `version.source`
    pub async fn from_config(config: &VersionConfig) -> Self {
        match config.source {
            ParameterSource::Ssm => {
                Self::Ssm(SsmParameterStore::connect(config.region.as_deref()).await)
            }
            ParameterSource::Static => {
                Self::Static(MemoryParameterStore::from_values(&config.static_values))
            }
        }
    }
}

impl ParameterStore for ParameterBackend {
    async fn get_parameter(&self, name: &str) -> Result<String, StoreError> {
        match self {
            Self::Ssm(store) => store.get_parameter(name).await,
            Self::Static(store) => store.get_parameter(name).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[tokio::test]
    async fn test_static_backend_from_config() {
        let config = VersionConfig {
            source: ParameterSource::Static,
            region: None,
            image_tag_parameter: "tag".to_string(),
            version_parameter: "version".to_string(),
            static_values: HashMap::from([("tag".to_string(), "abc123".to_string())]),
        };
        let backend = ParameterBackend::from_config(&config).await;
        assert!(matches!(backend, ParameterBackend::Static(_)));
        assert_eq!(backend.get_parameter("tag").await.unwrap(), "abc123");
        assert!(matches!(
            backend.get_parameter("version").await,
            Err(StoreError::NotFound { .. })
        ));
    }
}
