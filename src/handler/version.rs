//! Version handler
//!
//! Reports the deployed release: the image tag (commit) and the package
//! version, both read from the parameter store on every request.

use crate::config::VersionConfig;
use crate::error::HandlerError;
use crate::http::{build_json_response, ApiRequest, ApiResponse};
use crate::store::ParameterStore;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    pub commit: String,
    pub version: String,
}

pub struct VersionHandler<P> {
    store: P,
    image_tag_parameter: String,
    version_parameter: String,
}

impl<P: ParameterStore> VersionHandler<P> {
    pub fn new(
        store: P,
        image_tag_parameter: impl Into<String>,
        version_parameter: impl Into<String>,
    ) -> Self {
        Self {
            store,
            image_tag_parameter: image_tag_parameter.into(),
            version_parameter: version_parameter.into(),
        }
    }

    pub fn from_config(store: P, config: &VersionConfig) -> Self {
        Self::new(
            store,
            &config.image_tag_parameter,
            &config.version_parameter,
        )
    }

    pub const fn store(&self) -> &P {
        &self.store
    }

    /// Handle one request; method and path are ignored.
    pub async fn handle(&self, _req: &ApiRequest) -> ApiResponse {
        match self.fetch().await {
            Ok(info) => match serde_json::to_string(&info) {
                Ok(body) => build_json_response(body),
                Err(e) => HandlerError::from(e).into_response(),
            },
            Err(e) => e.into_response(),
        }
    }

    /// Tag first, then version; the first failure is reported
    async fn fetch(&self) -> Result<VersionInfo, HandlerError> {
        let commit = self
            .store
            .get_parameter(&self.image_tag_parameter)
            .await
            .map_err(|source| HandlerError::FetchTag {
                name: self.image_tag_parameter.clone(),
                source,
            })?;

        let version = self
            .store
            .get_parameter(&self.version_parameter)
            .await
            .map_err(|source| HandlerError::FetchVersion {
                name: self.version_parameter.clone(),
                source,
            })?;

        Ok(VersionInfo { commit, version })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryParameterStore;
    use hyper::Method;

    const TAG: &str = "/cms/site/release-tag";
    const VERSION: &str = "/cms/site/package-version";

    fn request() -> ApiRequest {
        ApiRequest::new(Method::GET, "/version")
    }

    #[tokio::test]
    async fn test_returns_commit_and_version() {
        let store = MemoryParameterStore::new()
            .with_value(TAG, "abc123")
            .with_value(VERSION, "1.2.3");
        let handler = VersionHandler::new(store, TAG, VERSION);

        let resp = handler.handle(&request()).await;
        assert_eq!(resp.status, 200);
        assert_eq!(resp.header("Content-Type"), Some("application/json"));
        assert_eq!(resp.body, r#"{"commit":"abc123","version":"1.2.3"}"#);

        let info: VersionInfo = serde_json::from_str(&resp.body).unwrap();
        assert_eq!(info.commit, "abc123");
        assert_eq!(info.version, "1.2.3");
    }

    #[tokio::test]
    async fn test_method_and_path_ignored() {
        let store = MemoryParameterStore::new()
            .with_value(TAG, "abc123")
            .with_value(VERSION, "1.2.3");
        let handler = VersionHandler::new(store, TAG, VERSION);

        let resp = handler
            .handle(&ApiRequest::new(Method::DELETE, "/anything"))
            .await;
        assert_eq!(resp.status, 200);
    }

    #[tokio::test]
    async fn test_tag_failure_wins_and_stops() {
        let store = MemoryParameterStore::new()
            .with_failure(TAG, "AccessDeniedException")
            .with_failure(VERSION, "AccessDeniedException");
        let handler = VersionHandler::new(store, TAG, VERSION);

        let resp = handler.handle(&request()).await;
        assert_eq!(resp.status, 500);
        assert!(resp.body.contains("retrieving commit tag"));
        assert!(resp.body.contains(TAG));
        assert_eq!(handler.store().lookups(), vec![TAG.to_string()]);
    }

    #[tokio::test]
    async fn test_version_failure() {
        let store = MemoryParameterStore::new().with_value(TAG, "abc123");
        let handler = VersionHandler::new(store, TAG, VERSION);

        let resp = handler.handle(&request()).await;
        assert_eq!(resp.status, 500);
        assert!(resp.body.starts_with("error in retrieving version"));
        assert!(resp.body.contains("not found"));
    }

    #[tokio::test]
    async fn test_unset_parameter_names_are_500() {
        let store = MemoryParameterStore::new().with_value(VERSION, "1.2.3");
        let handler = VersionHandler::new(store, "", "");

        let resp = handler.handle(&request()).await;
        assert_eq!(resp.status, 500);
        assert_eq!(resp.header("Content-Type"), Some("text/plain"));
        assert!(resp.body.starts_with("error in retrieving commit tag ()"));
        assert_eq!(handler.store().lookups(), vec![String::new()]);
    }

    #[tokio::test]
    async fn test_from_config() {
        let config = VersionConfig {
            source: crate::config::ParameterSource::Static,
            region: None,
            image_tag_parameter: TAG.to_string(),
            version_parameter: VERSION.to_string(),
            static_values: std::collections::HashMap::from([
                (TAG.to_string(), "def456".to_string()),
                (VERSION.to_string(), "2.0.0".to_string()),
            ]),
        };
        let store = MemoryParameterStore::from_values(&config.static_values);
        let handler = VersionHandler::from_config(store, &config);

        let resp = handler.handle(&request()).await;
        assert_eq!(resp.body, r#"{"commit":"def456","version":"2.0.0"}"#);
    }
}
