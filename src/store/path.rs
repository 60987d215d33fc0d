//! Upload name validation
//!
//! Maps an untrusted client-supplied file name onto something that can only
//! ever name an entry directly inside the upload root.

use std::fmt;
use std::path::{Component, Path};
use thiserror::Error;

/// Why an upload name or its resolved path was refused
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("filename is empty")]
    Empty,
    #[error("filename '{0}' is reserved")]
    Reserved(String),
    #[error("filename must not contain path separators")]
    Separator,
    #[error("filename must not contain NUL bytes")]
    Nul,
    #[error("filename must not be an absolute path")]
    Absolute,
    #[error("resolved path escapes the upload directory")]
    OutsideRoot,
    #[error("refusing to write through a symbolic link")]
    Symlink,
}

/// A single, validated path segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadName(String);

impl UploadName {
    pub fn parse(raw: &str) -> Result<Self, PathError> {
        if raw.is_empty() {
            return Err(PathError::Empty);
        }
        if raw.contains('\0') {
            return Err(PathError::Nul);
        }
        if raw.starts_with('/') || raw.starts_with('\\') || Path::new(raw).is_absolute() {
            return Err(PathError::Absolute);
        }
        if raw.contains('/') || raw.contains('\\') {
            return Err(PathError::Separator);
        }
        if raw == "." || raw == ".." {
            return Err(PathError::Reserved(raw.to_string()));
        }

        let mut components = Path::new(raw).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(Self(raw.to_string())),
            _ => Err(PathError::Reserved(raw.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UploadName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
