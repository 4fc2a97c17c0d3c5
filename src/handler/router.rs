//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: preflight short-circuit, prefix
//! routing to the three handlers, CORS headers and access logging.

use crate::config::AppState;
use crate::handler::{listing, static_files};
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body as _, Bytes};
use hyper::header::{
    HeaderMap, HeaderName, IF_MODIFIED_SINCE, IF_NONE_MATCH, RANGE, REFERER, USER_AGENT,
};
use hyper::http::request::Parts;
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

const LIST_PREFIX: &str = "/list";
const PREVIEW_PREFIX: &str = "/preview";
const ORIGIN_PREFIX: &str = "/origin";

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
    pub if_none_match: Option<&'a str>,
    pub if_modified_since: Option<&'a str>,
    pub range_header: Option<&'a str>,
}

impl<'a> RequestContext<'a> {
    pub fn from_parts(parts: &'a Parts) -> Self {
        Self {
            path: parts.uri.path(),
            is_head: parts.method == Method::HEAD,
            if_none_match: header_str(&parts.headers, IF_NONE_MATCH),
            if_modified_since: header_str(&parts.headers, IF_MODIFIED_SINCE),
            range_header: header_str(&parts.headers, RANGE),
        }
    }
}

/// Which handler a path belongs to
#[derive(Debug, PartialEq, Eq)]
pub enum Route<'a> {
    List,
    /// File name relative to the preview directory
    Preview(&'a str),
    /// File path relative to the photos root
    Origin(&'a str),
    NotFound,
}

/// Match a request path to a handler by its leading segment
pub fn match_route(path: &str) -> Route<'_> {
    if strip_segment(path, LIST_PREFIX).is_some() {
        Route::List
    } else if let Some(rest) = strip_segment(path, PREVIEW_PREFIX) {
        Route::Preview(rest)
    } else if let Some(rest) = strip_segment(path, ORIGIN_PREFIX) {
        Route::Origin(rest)
    } else {
        Route::NotFound
    }
}

/// `"/preview/a.jpg"` with prefix `"/preview"` gives `"a.jpg"`; `"/previews"` gives `None`
fn strip_segment<'a>(path: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = path.strip_prefix(prefix)?;
    if rest.is_empty() {
        Some(rest)
    } else {
        rest.strip_prefix('/')
    }
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    // Request bodies are never read
    let (parts, _) = req.into_parts();

    let mut response = if parts.method == Method::OPTIONS {
        http::build_options_response()
    } else {
        let ctx = RequestContext::from_parts(&parts);
        route_request(&ctx, &state).await
    };
    http::apply_cors_headers(response.headers_mut());

    if state.config.logging.access_log {
        log_access(&parts, &response, peer_addr, started, &state);
    }

    Ok(response)
}

/// Route request based on path
async fn route_request(ctx: &RequestContext<'_>, state: &Arc<AppState>) -> Response<Full<Bytes>> {
    match match_route(ctx.path) {
        Route::List => listing::serve_listing(ctx, state).await,
        Route::Preview(name) => static_files::serve_from_root(ctx, state.previews.dir(), name).await,
        Route::Origin(name) => static_files::serve_from_root(ctx, &state.photos_root, name).await,
        Route::NotFound => http::build_404_response(),
    }
}

fn header_str(headers: &HeaderMap, name: HeaderName) -> Option<&str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn log_access(
    parts: &Parts,
    response: &Response<Full<Bytes>>,
    peer_addr: SocketAddr,
    started: Instant,
    state: &AppState,
) {
    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        parts.method.to_string(),
        parts.uri.path().to_string(),
    );
    entry.query = parts.uri.query().map(ToString::to_string);
    entry.http_version = format!("{:?}", parts.version)
        .trim_start_matches("HTTP/")
        .to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = response.body().size_hint().exact().unwrap_or(0);
    entry.referer = header_str(&parts.headers, REFERER).map(ToString::to_string);
    entry.user_agent = header_str(&parts.headers, USER_AGENT).map(ToString::to_string);
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);

    logger::log_access(&entry, &state.access_log_format);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::http::cors::{ALLOW_HEADERS, ALLOW_METHODS};
    use crate::preview::test_support::write_image;
    use crate::preview::ListingEntry;
    use http_body_util::BodyExt;
    use hyper::header::{
        ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
        CONTENT_TYPE, ETAG,
    };
    use hyper::StatusCode;
    use std::path::Path;
    use std::time::SystemTime;
    use tempfile::TempDir;

    struct Fixture {
        origin: TempDir,
        previews: TempDir,
        state: Arc<AppState>,
    }

    fn fixture() -> Fixture {
        let origin = tempfile::tempdir().unwrap();
        let previews = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.logging.access_log = false;
        config.photos.path = Some(origin.path().to_string_lossy().into_owned());
        config.photos.preview_dir = Some(previews.path().to_string_lossy().into_owned());
        let state = Arc::new(AppState::new(config).unwrap());
        Fixture {
            origin,
            previews,
            state,
        }
    }

    fn peer() -> SocketAddr {
        "127.0.0.1:50000".parse().unwrap()
    }

    async fn send(state: &Arc<AppState>, req: Request<()>) -> (Response<Full<Bytes>>, Bytes) {
        let resp = handle_request(req, Arc::clone(state), peer()).await.unwrap();
        let (parts, body) = resp.into_parts();
        let bytes = body.collect().await.unwrap().to_bytes();
        (Response::from_parts(parts, Full::new(Bytes::new())), bytes)
    }

    fn get(path: &str) -> Request<()> {
        Request::builder().uri(path).body(()).unwrap()
    }

    async fn list(state: &Arc<AppState>) -> Vec<ListingEntry> {
        let (resp, body) = send(state, get("/list")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[CONTENT_TYPE], "application/json");
        serde_json::from_slice(&body).unwrap()
    }

    fn mtime(path: &Path) -> SystemTime {
        std::fs::metadata(path).unwrap().modified().unwrap()
    }

    #[test]
    fn test_match_route() {
        assert_eq!(match_route("/list"), Route::List);
        assert_eq!(match_route("/list/"), Route::List);
        assert_eq!(match_route("/preview/a.jpg"), Route::Preview("a.jpg"));
        assert_eq!(match_route("/origin/2024/a.jpg"), Route::Origin("2024/a.jpg"));
        assert_eq!(match_route("/origin"), Route::Origin(""));
        assert_eq!(match_route("/previews/a.jpg"), Route::NotFound);
        assert_eq!(match_route("/listing"), Route::NotFound);
        assert_eq!(match_route("/"), Route::NotFound);
        assert_eq!(match_route("/unknown"), Route::NotFound);
    }

    #[tokio::test]
    async fn test_unknown_path_is_empty_404() {
        let fx = fixture();
        let (resp, body) = send(&fx.state, get("/unknown")).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert!(body.is_empty());
        assert_eq!(resp.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    #[tokio::test]
    async fn test_options_preflight_on_any_path() {
        let fx = fixture();
        for path in ["/list", "/origin/a.jpg", "/nowhere"] {
            let req = Request::builder()
                .method(Method::OPTIONS)
                .uri(path)
                .body(())
                .unwrap();
            let (resp, body) = send(&fx.state, req).await;
            assert_eq!(resp.status(), StatusCode::OK);
            assert!(body.is_empty());
            assert_eq!(resp.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
            assert_eq!(resp.headers()[ACCESS_CONTROL_ALLOW_METHODS], ALLOW_METHODS);
            assert_eq!(resp.headers()[ACCESS_CONTROL_ALLOW_HEADERS], ALLOW_HEADERS);
        }
        // Preflight must not trigger a scan
        assert_eq!(std::fs::read_dir(fx.previews.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_list_generates_and_lists_preview() {
        let fx = fixture();
        write_image(&fx.origin.path().join("a.jpg"), 1600, 1200);

        let entries = list(&fx.state).await;

        assert_eq!(
            entries,
            vec![ListingEntry {
                src: "/preview/a.jpg".to_string(),
                width: 800,
                height: 600,
            }]
        );
        assert_eq!(
            crate::preview::read_dimensions(&fx.previews.path().join("a.jpg")).unwrap(),
            (800, 600)
        );
    }

    #[tokio::test]
    async fn test_list_is_idempotent() {
        let fx = fixture();
        write_image(&fx.origin.path().join("a.jpg"), 1600, 1200);
        write_image(&fx.origin.path().join("b.png"), 300, 200);

        let first = list(&fx.state).await;
        let before = mtime(&fx.previews.path().join("a.jpg"));
        let second = list(&fx.state).await;

        assert_eq!(first, second);
        assert_eq!(before, mtime(&fx.previews.path().join("a.jpg")));
        for entry in &second {
            assert!(entry.src.starts_with("/preview/"));
        }
    }

    #[tokio::test]
    async fn test_list_skips_corrupt_origin() {
        let fx = fixture();
        std::fs::write(fx.origin.path().join("broken.jpg"), b"definitely not jpeg").unwrap();
        write_image(&fx.origin.path().join("ok.png"), 1000, 700);

        let entries = list(&fx.state).await;

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].src, "/preview/ok.png");
    }

    #[tokio::test]
    async fn test_list_with_missing_origin_still_answers() {
        let previews = tempfile::tempdir().unwrap();
        write_image(&previews.path().join("old.png"), 20, 10);
        let mut config = Config::default();
        config.logging.access_log = false;
        config.photos.path = Some("/no/such/photos/dir".to_string());
        config.photos.preview_dir = Some(previews.path().to_string_lossy().into_owned());
        let state = Arc::new(AppState::new(config).unwrap());

        let entries = list(&state).await;

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].src, "/preview/old.png");
    }

    #[tokio::test]
    async fn test_head_list_has_no_body() {
        let fx = fixture();
        let req = Request::builder()
            .method(Method::HEAD)
            .uri("/list")
            .body(())
            .unwrap();
        let (resp, body) = send(&fx.state, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_origin_and_preview_bytes() {
        let fx = fixture();
        std::fs::write(fx.origin.path().join("raw.bin"), b"origin bytes").unwrap();
        std::fs::write(fx.previews.path().join("p.bin"), b"preview bytes").unwrap();

        let (resp, body) = send(&fx.state, get("/origin/raw.bin")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body, Bytes::from_static(b"origin bytes"));

        let (resp, body) = send(&fx.state, get("/preview/p.bin")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body, Bytes::from_static(b"preview bytes"));
        assert_eq!(resp.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    #[tokio::test]
    async fn test_missing_files_are_404() {
        let fx = fixture();
        let (resp, _) = send(&fx.state, get("/origin/nope.jpg")).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let (resp, _) = send(&fx.state, get("/preview/nope.jpg")).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_post_to_origin_still_served() {
        let fx = fixture();
        std::fs::write(fx.origin.path().join("a.txt"), b"hi").unwrap();
        let req = Request::builder()
            .method(Method::POST)
            .uri("/origin/a.txt")
            .body(())
            .unwrap();
        let (resp, body) = send(&fx.state, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body, Bytes::from_static(b"hi"));
    }

    #[tokio::test]
    async fn test_conditional_get_via_dispatcher() {
        let fx = fixture();
        std::fs::write(fx.origin.path().join("a.txt"), b"hello").unwrap();

        let (resp, _) = send(&fx.state, get("/origin/a.txt")).await;
        let etag = resp.headers()[ETAG].to_str().unwrap().to_string();

        let req = Request::builder()
            .uri("/origin/a.txt")
            .header(IF_NONE_MATCH, etag)
            .body(())
            .unwrap();
        let (resp, body) = send(&fx.state, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_MODIFIED);
        assert!(body.is_empty());
    }
}
