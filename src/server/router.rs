//! Local request routing
//!
//! On Lambda each function sits behind its own API Gateway integration; the
//! local server hosts both, so it picks the function by path.

use crate::handler::{Function, UploadHandler, VersionHandler};
use crate::http::{ApiRequest, ApiResponse};
use crate::store::{FileStore, ParameterStore};

pub struct LocalRouter<F, P> {
    upload: UploadHandler<F>,
    version: VersionHandler<P>,
    version_path: String,
}

impl<F: FileStore, P: ParameterStore> LocalRouter<F, P> {
    pub fn new(
        upload: UploadHandler<F>,
        version: VersionHandler<P>,
        version_path: impl Into<String>,
    ) -> Self {
        Self {
            upload,
            version,
            version_path: version_path.into(),
        }
    }

    /// Dispatch to the version function on an exact path match, otherwise
    /// to the upload function (which answers 404 for unknown paths)
    pub async fn route(&self, req: &ApiRequest) -> (&'static str, ApiResponse) {
        if req.path == self.version_path {
            (self.version.name(), self.version.call(req).await)
        } else {
            (self.upload.name(), self.upload.call(req).await)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuntimeIdentity;
    use crate::store::{MemoryFileStore, MemoryParameterStore};
    use hyper::Method;

    fn router(store: MemoryParameterStore) -> LocalRouter<MemoryFileStore, MemoryParameterStore> {
        let identity = RuntimeIdentity {
            user: "dev".to_string(),
            uid: 1000,
            gid: 1000,
        };
        LocalRouter::new(
            UploadHandler::new(MemoryFileStore::new(), identity),
            VersionHandler::new(store, "tag", "version"),
            "/version",
        )
    }

    #[tokio::test]
    async fn test_routes_by_path() {
        let store = MemoryParameterStore::new()
            .with_value("tag", "abc123")
            .with_value("version", "1.2.3");
        let router = router(store);

        let (name, resp) = router.route(&ApiRequest::new(Method::GET, "/version")).await;
        assert_eq!(name, "version");
        assert_eq!(resp.status, 200);

        let (name, resp) = router.route(&ApiRequest::new(Method::GET, "/upload")).await;
        assert_eq!(name, "upload");
        assert_eq!(resp.status, 200);

        let (_, resp) = router.route(&ApiRequest::new(Method::GET, "/nope")).await;
        assert_eq!(resp.status, 404);
    }

    #[tokio::test]
    async fn test_unconfigured_version_is_500() {
        let (name, resp) = router(MemoryParameterStore::new())
            .route(&ApiRequest::new(Method::GET, "/version"))
            .await;
        assert_eq!(name, "version");
        assert_eq!(resp.status, 500);
        assert!(resp.body.starts_with("error in retrieving commit tag"));
    }
}
