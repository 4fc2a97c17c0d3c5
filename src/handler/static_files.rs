//! Static file serving module
//!
//! Serves files from the photos root or the preview directory with
//! conditional GET and single byte-range support. Size and validators come
//! from metadata; HEAD and 304 never read the file, and a range reads only
//! its slice.

use crate::handler::router::RequestContext;
use crate::http::range::ByteRange;
use crate::http::response::{build_file_response, build_partial_response, Validators};
use crate::http::{self, cache, mime, RangeParseResult};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::io::{self, SeekFrom};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncSeekExt};

/// A regular file resolved below a root, not yet read
pub struct StaticFile {
    pub path: PathBuf,
    pub size: u64,
    pub content_type: &'static str,
    pub modified: Option<SystemTime>,
}

/// Serve `name` (URL-encoded, relative) from `root`
pub async fn serve_from_root(
    ctx: &RequestContext<'_>,
    root: &Path,
    name: &str,
) -> Response<Full<Bytes>> {
    match resolve_in_root(root, name).await {
        Some(file) => build_static_file_response(ctx, &file).await,
        None => http::build_404_response(),
    }
}

/// Resolve a file below `root` and stat it
///
/// Returns `None` for missing files, directories, undecodable names and
/// paths that resolve outside `root`.
pub async fn resolve_in_root(root: &Path, name: &str) -> Option<StaticFile> {
    let decoded = match urlencoding::decode(name) {
        Ok(d) => d,
        Err(e) => {
            logger::log_warning(&format!("Undecodable path '{name}': {e}"));
            return None;
        }
    };
    let relative = decoded.trim_start_matches('/');
    if relative.is_empty() {
        return None;
    }

    let root_canonical = match fs::canonicalize(root).await {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Directory not found or inaccessible '{}': {e}",
                root.display()
            ));
            return None;
        }
    };

    // Missing files are routine 404s, not worth a log line
    let file_canonical = fs::canonicalize(root.join(relative)).await.ok()?;
    if !file_canonical.starts_with(&root_canonical) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {name} -> {}",
            file_canonical.display()
        ));
        return None;
    }

    let metadata = fs::metadata(&file_canonical).await.ok()?;
    if !metadata.is_file() {
        return None;
    }

    Some(StaticFile {
        content_type: mime::content_type_for(Path::new(relative)),
        size: metadata.len(),
        modified: metadata.modified().ok(),
        path: file_canonical,
    })
}

/// Read the inclusive `range` of `path`
pub async fn read_range(path: &Path, range: ByteRange) -> io::Result<Bytes> {
    let len = usize::try_from(range.content_length())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "range too large"))?;
    let mut file = fs::File::open(path).await?;
    file.seek(SeekFrom::Start(range.start)).await?;
    let mut buf = vec![0; len];
    file.read_exact(&mut buf).await?;
    Ok(Bytes::from(buf))
}

/// Build static file response with validators and Range support
async fn build_static_file_response(
    ctx: &RequestContext<'_>,
    file: &StaticFile,
) -> Response<Full<Bytes>> {
    let etag = cache::generate_etag(file.size, file.modified);
    let last_modified = file.modified.map(cache::format_http_date);
    let validators = Validators {
        etag: &etag,
        last_modified: last_modified.as_deref(),
    };

    if cache::is_not_modified(
        ctx.if_none_match,
        ctx.if_modified_since,
        &etag,
        file.modified,
    ) {
        return http::build_304_response(&validators);
    }

    match http::parse_range_header(ctx.range_header, file.size) {
        RangeParseResult::Valid(range) => {
            let body = if ctx.is_head {
                Bytes::new()
            } else {
                match read_range(&file.path, range).await {
                    Ok(body) => body,
                    Err(e) => return read_failed(file, &e),
                }
            };
            build_partial_response(body, file.content_type, &validators, range, file.size)
        }
        RangeParseResult::NotSatisfiable => http::build_416_response(file.size),
        RangeParseResult::None => {
            if ctx.is_head {
                return build_file_response(
                    Bytes::new(),
                    file.size,
                    file.content_type,
                    &validators,
                );
            }
            match fs::read(&file.path).await {
                Ok(content) => {
                    let length = content.len() as u64;
                    build_file_response(Bytes::from(content), length, file.content_type, &validators)
                }
                Err(e) => read_failed(file, &e),
            }
        }
    }
}

fn read_failed(file: &StaticFile, error: &io::Error) -> Response<Full<Bytes>> {
    logger::log_error(&format!(
        "Failed to read file '{}': {error}",
        file.path.display()
    ));
    http::build_500_response()
}
