//! Request handler module
//!
//! Route resolution and the blog pages behind each route.

pub mod pages;
pub mod router;

pub use router::handle_request;
