//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: body size check, route
//! resolution, dispatch to a page, and access logging.

use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::HeaderValue;
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use crate::config::AppState;
use crate::handler::pages;
use crate::http;
use crate::logger::{self, AccessLogEntry};

/// One logical page per variant. Indexed variants carry the positional index
/// parsed from the path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Landing,
    List,
    View(usize),
    NewForm,
    NewSubmit,
    EditForm(usize),
    EditSubmit(usize),
    Delete(usize),
}

/// Outcome of matching a method and path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Page(Route),
    /// Path exists but not for this method; carries the `Allow` header value
    MethodNotAllowed(&'static str),
    NotFound,
}

const READ_METHODS: &str = "GET, HEAD, POST";
const FORM_METHODS: &str = "GET, HEAD, POST";
const DELETE_METHODS: &str = "GET, HEAD";

/// Map a method and path to a page
pub fn resolve(method: &Method, path: &str) -> Resolution {
    let is_read = *method == Method::GET || *method == Method::HEAD;
    let is_post = *method == Method::POST;

    let segments: Vec<&str> = path.strip_prefix('/').unwrap_or(path).split('/').collect();

    let (page, allow) = match segments.as_slice() {
        // "/" and "/blogs" answer POST the same as GET
        [""] => (
            (is_read || is_post).then_some(Route::Landing),
            READ_METHODS,
        ),
        ["blogs"] => ((is_read || is_post).then_some(Route::List), READ_METHODS),
        ["blogs", "new"] => (
            if is_post {
                Some(Route::NewSubmit)
            } else {
                is_read.then_some(Route::NewForm)
            },
            FORM_METHODS,
        ),
        ["blogs", index] => match parse_index(index) {
            Some(i) => ((is_read || is_post).then_some(Route::View(i)), READ_METHODS),
            None => return Resolution::NotFound,
        },
        ["blogs", index, "edit"] => match parse_index(index) {
            Some(i) => (
                if is_post {
                    Some(Route::EditSubmit(i))
                } else {
                    is_read.then_some(Route::EditForm(i))
                },
                FORM_METHODS,
            ),
            None => return Resolution::NotFound,
        },
        ["blogs", index, "delete"] => match parse_index(index) {
            Some(i) => (is_read.then_some(Route::Delete(i)), DELETE_METHODS),
            None => return Resolution::NotFound,
        },
        _ => return Resolution::NotFound,
    };

    page.map_or(Resolution::MethodNotAllowed(allow), Resolution::Page)
}

/// Non-negative decimal integer only; "+1" and "-1" do not match
fn parse_index(segment: &str) -> Option<usize> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    remote_addr: Option<SocketAddr>,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let mut entry = AccessLogEntry::from_request(&req, remote_addr);
    let is_head = *req.method() == Method::HEAD;

    let resolution = resolve(req.method(), req.uri().path());

    let mut response = match check_body_size(&req, state.config.http.max_body_size) {
        Some(resp) => resp,
        None => match resolution {
            Resolution::Page(route) => {
                let body = req.into_body();
                pages::serve(route, body, &state, is_head).await
            }
            Resolution::MethodNotAllowed(allow) => {
                logger::log_warning(&format!(
                    "Method not allowed: {} {}",
                    entry.method, entry.path
                ));
                http::build_405_response(allow)
            }
            Resolution::NotFound => pages::not_found(&state, &entry.path, is_head),
        },
    };

    if let Ok(value) = state.config.http.server_name.parse::<HeaderValue>() {
        response.headers_mut().insert(hyper::header::SERVER, value);
    }

    if state.cached_access_log.load(Ordering::Relaxed) {
        let body_bytes = response
            .body()
            .size_hint()
            .exact()
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(0);
        entry.finish(response.status().as_u16(), body_bytes);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size<B>(req: &Request<B>, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let content_length = req.headers().get("content-length")?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_error(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::build_413_response())
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}
