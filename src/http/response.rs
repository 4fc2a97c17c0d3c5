//! HTTP response building module
//!
//! Builders for the status codes the photo server emits. CORS headers are
//! added later by the dispatcher, not here.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{
    ACCEPT_RANGES, CACHE_CONTROL, CONTENT_LENGTH, CONTENT_RANGE, CONTENT_TYPE, ETAG, LAST_MODIFIED,
};
use hyper::{Response, StatusCode};

use super::range::ByteRange;

const CACHE_CONTROL_VALUE: &str = "public, max-age=3600";

/// Validators attached to file responses
#[derive(Debug, Clone)]
pub struct Validators<'a> {
    pub etag: &'a str,
    pub last_modified: Option<&'a str>,
}

/// Empty 200 answer to a preflight request
pub fn build_options_response() -> Response<Full<Bytes>> {
    empty_response(StatusCode::OK)
}

/// 404 Not Found with an empty body
pub fn build_404_response() -> Response<Full<Bytes>> {
    empty_response(StatusCode::NOT_FOUND)
}

/// 500 Internal Server Error with a short plain-text body
pub fn build_500_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::INTERNAL_SERVER_ERROR)
        .header(CONTENT_TYPE, "text/plain")
        .body(Full::new(Bytes::from_static(b"500 Internal Server Error")))
        .unwrap_or_else(|e| {
            log_build_error("500", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// 304 Not Modified
pub fn build_304_response(validators: &Validators<'_>) -> Response<Full<Bytes>> {
    let mut builder = Response::builder()
        .status(StatusCode::NOT_MODIFIED)
        .header(ETAG, validators.etag)
        .header(CACHE_CONTROL, CACHE_CONTROL_VALUE);
    if let Some(last_modified) = validators.last_modified {
        builder = builder.header(LAST_MODIFIED, last_modified);
    }

    builder.body(Full::new(Bytes::new())).unwrap_or_else(|e| {
        log_build_error("304", &e);
        Response::new(Full::new(Bytes::new()))
    })
}

/// 416 Range Not Satisfiable
pub fn build_416_response(file_size: u64) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::RANGE_NOT_SATISFIABLE)
        .header(CONTENT_RANGE, format!("bytes */{file_size}"))
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("416", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// 200 `application/json`
pub fn build_json_response(json: Vec<u8>, is_head: bool) -> Response<Full<Bytes>> {
    let content_length = json.len();
    let body = if is_head { Bytes::new() } else { Bytes::from(json) };

    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, "application/json")
        .header(CONTENT_LENGTH, content_length)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("JSON", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// 200 with the whole file
///
/// `body` is empty for HEAD; `content_length` is the size of the file either way.
pub fn build_file_response(
    body: Bytes,
    content_length: u64,
    content_type: &str,
    validators: &Validators<'_>,
) -> Response<Full<Bytes>> {
    file_headers(StatusCode::OK, content_type, validators)
        .header(CONTENT_LENGTH, content_length)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// 206 Partial Content for `range`; `body` is empty for HEAD
pub fn build_partial_response(
    body: Bytes,
    content_type: &str,
    validators: &Validators<'_>,
    range: ByteRange,
    total_size: u64,
) -> Response<Full<Bytes>> {
    file_headers(StatusCode::PARTIAL_CONTENT, content_type, validators)
        .header(CONTENT_LENGTH, range.content_length())
        .header(
            CONTENT_RANGE,
            format!("bytes {}-{}/{total_size}", range.start, range.end),
        )
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("206", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

fn file_headers(
    status: StatusCode,
    content_type: &str,
    validators: &Validators<'_>,
) -> hyper::http::response::Builder {
    let mut builder = Response::builder()
        .status(status)
        .header(CONTENT_TYPE, content_type)
        .header(ACCEPT_RANGES, "bytes")
        .header(ETAG, validators.etag)
        .header(CACHE_CONTROL, CACHE_CONTROL_VALUE);
    if let Some(last_modified) = validators.last_modified {
        builder = builder.header(LAST_MODIFIED, last_modified);
    }
    builder
}

fn empty_response(status: StatusCode) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
