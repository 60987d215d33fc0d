//! Handler error taxonomy
//!
//! Every failure a handler can hit ends up here and is turned into a
//! plain-text response; nothing escapes to the invocation platform.

use crate::http::{build_text_response, ApiResponse};
use crate::logger;
use crate::store::{PathError, StoreError};
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("no filename provided")]
    MissingFilename,

    #[error("invalid filename: {0}")]
    InvalidFilename(#[from] PathError),

    #[error("failed to ensure directory existence: {0}")]
    EnsureDirectory(#[source] io::Error),

    #[error("failed to get file list: {0}")]
    ListDirectory(#[source] io::Error),

    #[error("failed to save file: {0}")]
    WriteFile(#[source] io::Error),

    #[error("error in retrieving commit tag ({name}): {source}")]
    FetchTag {
        name: String,
        #[source]
        source: StoreError,
    },

    #[error("error in retrieving version ({name}): {source}")]
    FetchVersion {
        name: String,
        #[source]
        source: StoreError,
    },

    #[error("error in creating response body: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl HandlerError {
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::MissingFilename | Self::InvalidFilename(_) => 400,
            _ => 500,
        }
    }

    /// Log the failure and render it as a plain-text response
    pub fn into_response(self) -> ApiResponse {
        let status = self.status_code();
        let message = self.to_string();
        if status >= 500 {
            logger::log_error(&message);
        } else {
            logger::log_warning(&message);
        }
        build_text_response(status, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(HandlerError::MissingFilename.status_code(), 400);
        assert_eq!(
            HandlerError::InvalidFilename(PathError::Separator).status_code(),
            400
        );
        let io_err = io::Error::new(io::ErrorKind::Other, "disk gone");
        assert_eq!(HandlerError::WriteFile(io_err).status_code(), 500);
    }

    #[test]
    fn test_fetch_error_names_parameter() {
        let err = HandlerError::FetchTag {
            name: "/cms/site/release-tag".to_string(),
            source: StoreError::NotFound {
                name: "/cms/site/release-tag".to_string(),
            },
        };
        let resp = err.into_response();
        assert_eq!(resp.status, 500);
        assert!(resp.body.starts_with("error in retrieving commit tag (/cms/site/release-tag)"));
        assert_eq!(resp.header("Content-Type"), Some("text/plain"));
    }
}
