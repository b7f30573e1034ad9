//! HTTP response building module
//!
//! Builders for every response the asset binding and the host produce.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{self, HeaderValue};
use hyper::http::response::Builder;
use hyper::StatusCode;

use super::range::ByteRange;
use crate::logger;
use crate::worker::Response;

/// Representation headers shared by full and partial asset responses
pub struct AssetHeaders<'a> {
    pub content_type: &'a str,
    pub etag: &'a str,
    pub cache_control: &'a str,
}

impl AssetHeaders<'_> {
    fn apply(&self, builder: Builder) -> Builder {
        builder
            .header(header::CONTENT_TYPE, self.content_type)
            .header(header::ETAG, self.etag)
            .header(header::CACHE_CONTROL, self.cache_control)
            .header(header::ACCEPT_RANGES, "bytes")
    }
}

/// Full asset body with `status` (200, or 404 for a custom not-found page)
///
/// HEAD keeps Content-Length but drops the body.
pub fn build_asset_response(
    status: StatusCode,
    data: Bytes,
    headers: &AssetHeaders<'_>,
    is_head: bool,
) -> Response {
    let content_length = data.len();
    let body = if is_head { Bytes::new() } else { data };

    headers
        .apply(hyper::Response::builder().status(status))
        .header(header::CONTENT_LENGTH, content_length)
        .body(Full::new(body))
        .unwrap_or_else(|e| fallback(status, &e))
}

/// 206 Partial Content; `data` is already the sliced `range` of `total` bytes
pub fn build_partial_response(
    data: Bytes,
    range: ByteRange,
    total: u64,
    headers: &AssetHeaders<'_>,
    is_head: bool,
) -> Response {
    let body = if is_head { Bytes::new() } else { data };

    headers
        .apply(hyper::Response::builder().status(StatusCode::PARTIAL_CONTENT))
        .header(header::CONTENT_LENGTH, range.content_length())
        .header(header::CONTENT_RANGE, range.content_range(total))
        .body(Full::new(body))
        .unwrap_or_else(|e| fallback(StatusCode::PARTIAL_CONTENT, &e))
}

pub fn build_304_response(etag: &str, cache_control: &str) -> Response {
    hyper::Response::builder()
        .status(StatusCode::NOT_MODIFIED)
        .header(header::ETAG, etag)
        .header(header::CACHE_CONTROL, cache_control)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| fallback(StatusCode::NOT_MODIFIED, &e))
}

pub fn build_404_response() -> Response {
    plain_text(StatusCode::NOT_FOUND, "404 Not Found")
}

pub fn build_405_response() -> Response {
    let mut response = plain_text(StatusCode::METHOD_NOT_ALLOWED, "405 Method Not Allowed");
    response
        .headers_mut()
        .insert(header::ALLOW, HeaderValue::from_static("GET, HEAD"));
    response
}

pub fn build_416_response(total: u64) -> Response {
    let mut response = plain_text(StatusCode::RANGE_NOT_SATISFIABLE, "Range Not Satisfiable");
    if let Ok(value) = HeaderValue::from_str(&format!("bytes */{total}")) {
        response.headers_mut().insert(header::CONTENT_RANGE, value);
    }
    response
}

pub fn build_500_response() -> Response {
    plain_text(StatusCode::INTERNAL_SERVER_ERROR, "500 Internal Server Error")
}

fn plain_text(status: StatusCode, text: &'static str) -> Response {
    hyper::Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
        .header(header::CONTENT_LENGTH, text.len())
        .body(Full::new(Bytes::from_static(text.as_bytes())))
        .unwrap_or_else(|e| fallback(status, &e))
}

/// Log a build failure and return a bare response with the intended status
fn fallback(status: StatusCode, error: &hyper::http::Error) -> Response {
    logger::log_error(&format!("Failed to build {status} response: {error}"));
    let mut response = Response::new(Full::new(Bytes::new()));
    *response.status_mut() = status;
    response
}
