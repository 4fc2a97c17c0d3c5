//! HTTP cache validation module
//!
//! `ETag` and `Last-Modified` generation plus conditional request checks.

use chrono::{DateTime, Utc};
use std::time::{SystemTime, UNIX_EPOCH};

/// IMF-fixdate, the preferred HTTP-date format
const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Generate an `ETag` from file size and modification time
///
/// Cheap to compute without reading the file, and changes whenever the file
/// is rewritten.
///
/// # Returns
/// Quoted `ETag` string, e.g., `"65f1a2b3-1f400"`
pub fn generate_etag(len: u64, modified: Option<SystemTime>) -> String {
    let secs = modified
        .and_then(|m| m.duration_since(UNIX_EPOCH).ok())
        .map_or(0, |d| d.as_secs());
    format!("\"{secs:x}-{len:x}\"")
}

/// Check if client's `If-None-Match` header matches the server's `ETag`
///
/// Supports a single tag, a comma-separated list, and the `*` wildcard.
pub fn check_etag_match(if_none_match: Option<&str>, etag: &str) -> bool {
    if_none_match.is_some_and(|client_etag| {
        client_etag
            .split(',')
            .any(|e| e.trim() == etag || e.trim() == "*")
    })
}

/// Format a timestamp as an HTTP-date
pub fn format_http_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).format(HTTP_DATE_FORMAT).to_string()
}

/// Parse an HTTP-date (IMF-fixdate)
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// True when the resource has not changed since the client's `If-Modified-Since`
///
/// HTTP dates have one-second resolution, so sub-second parts are ignored.
pub fn not_modified_since(if_modified_since: Option<&str>, modified: Option<SystemTime>) -> bool {
    let (Some(header), Some(modified)) = (if_modified_since, modified) else {
        return false;
    };
    let Some(since) = parse_http_date(header) else {
        return false;
    };
    DateTime::<Utc>::from(modified).timestamp() <= since.timestamp()
}

/// Decide whether a conditional GET can be answered with 304
///
/// `If-None-Match` takes precedence; `If-Modified-Since` is only consulted
/// when the client sent no entity tags.
pub fn is_not_modified(
    if_none_match: Option<&str>,
    if_modified_since: Option<&str>,
    etag: &str,
    modified: Option<SystemTime>,
) -> bool {
    if if_none_match.is_some() {
        return check_etag_match(if_none_match, etag);
    }
    not_modified_since(if_modified_since, modified)
}
