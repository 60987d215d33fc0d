//! Request handler module
//!
//! The two functions: the upload page/endpoint and the version endpoint.
//! Handlers take an `ApiRequest` and always produce an `ApiResponse`.

pub mod page;
pub mod upload;
pub mod version;

pub use upload::{UploadHandler, UPLOAD_SUFFIX};
pub use version::{VersionHandler, VersionInfo};

use crate::http::{ApiRequest, ApiResponse};
use crate::store::{FileStore, ParameterStore};
use std::future::Future;

/// A handler the invocation platform (Lambda or the local server) can call
pub trait Function: Send + Sync {
    /// Name used in access logs
    fn name(&self) -> &'static str;

    fn call(&self, req: &ApiRequest) -> impl Future<Output = ApiResponse> + Send;
}

impl<F: FileStore> Function for UploadHandler<F> {
    fn name(&self) -> &'static str {
        "upload"
    }

    async fn call(&self, req: &ApiRequest) -> ApiResponse {
        self.handle(req).await
    }
}

impl<P: ParameterStore> Function for VersionHandler<P> {
    fn name(&self) -> &'static str {
        "version"
    }

    async fn call(&self, req: &ApiRequest) -> ApiResponse {
        self.handle(req).await
    }
}
