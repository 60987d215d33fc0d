//! HTTP model module
//!
//! Request and response types shared by the handlers and the platform
//! adapters, plus the response builders.

pub mod request;
pub mod response;

pub use request::{parse_query, ApiRequest};
pub use response::{
    build_404_response, build_html_response, build_json_response, build_text_response,
    ApiResponse,
};
