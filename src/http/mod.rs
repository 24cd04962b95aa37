//! HTTP protocol layer module
//!
//! Response builders and request body decoding, decoupled from the blog pages.

pub mod form;
pub mod response;

// Re-export commonly used types
pub use form::{parse_form, read_body, BodyError};
pub use response::{
    build_405_response, build_413_response, build_html_response, build_redirect_response,
    build_status_html_response,
};
