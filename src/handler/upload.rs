//! Upload handler
//!
//! `GET …/upload` renders the directory listing page, `POST …/upload?filename=`
//! stores the raw request body. Anything else is a 404.

use crate::config::RuntimeIdentity;
use crate::error::HandlerError;
use crate::handler::page::render_upload_page;
use crate::http::{
    build_404_response, build_html_response, build_text_response, ApiRequest, ApiResponse,
};
use crate::logger;
use crate::store::{FileStore, UploadName, WriteError};
use hyper::Method;

/// Path suffix both routes are served on
pub const UPLOAD_SUFFIX: &str = "/upload";

pub struct UploadHandler<F> {
    store: F,
    identity: RuntimeIdentity,
}

impl<F: FileStore> UploadHandler<F> {
    pub const fn new(store: F, identity: RuntimeIdentity) -> Self {
        Self { store, identity }
    }

    pub const fn store(&self) -> &F {
        &self.store
    }

    /// Handle one request. Never fails: errors become error responses.
    pub async fn handle(&self, req: &ApiRequest) -> ApiResponse {
        let is_upload_path = req.path_ends_with(UPLOAD_SUFFIX);

        let result = match req.method {
            Method::GET if is_upload_path => self.listing_page(req).await,
            Method::POST if is_upload_path => self.save_upload(req).await,
            _ => {
                logger::log_warning(&format!("No route for {} {}", req.method, req.path));
                return build_404_response();
            }
        };

        result.unwrap_or_else(HandlerError::into_response)
    }

    async fn listing_page(&self, req: &ApiRequest) -> Result<ApiResponse, HandlerError> {
        self.store
            .ensure_dir()
            .await
            .map_err(HandlerError::EnsureDirectory)?;
        let files = self
            .store
            .list()
            .await
            .map_err(HandlerError::ListDirectory)?;

        Ok(build_html_response(render_upload_page(
            &req.path,
            &files,
            &self.identity,
        )))
    }

    async fn save_upload(&self, req: &ApiRequest) -> Result<ApiResponse, HandlerError> {
        let raw_name = req
            .query_first("filename")
            .filter(|name| !name.is_empty())
            .ok_or(HandlerError::MissingFilename)?;
        let name = UploadName::parse(raw_name)?;

        self.store
            .ensure_dir()
            .await
            .map_err(HandlerError::EnsureDirectory)?;
        self.store
            .write(&name, &req.body)
            .await
            .map_err(|err| match err {
                WriteError::Path(e) => HandlerError::InvalidFilename(e),
                WriteError::Io(e) => HandlerError::WriteFile(e),
            })?;

        logger::log_info(&format!("Saved {name} ({} bytes)", req.body.len()));
        Ok(build_text_response(200, "file saved"))
    }
}
