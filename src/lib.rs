//! Upload and version functions for the CMS apps stack.
//!
//! The handlers are platform-neutral; `lambda` runs them on AWS Lambda and
//! `server` hosts them locally for development.

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod lambda;
pub mod logger;
pub mod server;
pub mod store;
