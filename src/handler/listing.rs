//! Listing handler
//!
//! Generates missing previews, then reports every preview with its size.

use crate::config::AppState;
use crate::handler::router::RequestContext;
use crate::http;
use crate::logger;
use crate::preview::ListingEntry;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::sync::Arc;

/// Serve `/list`
///
/// Decoding and resizing block, so the whole pass runs on the blocking pool.
pub async fn serve_listing(
    ctx: &RequestContext<'_>,
    state: &Arc<AppState>,
) -> Response<Full<Bytes>> {
    let state = Arc::clone(state);
    let entries = match tokio::task::spawn_blocking(move || build_listing(&state)).await {
        Ok(entries) => entries,
        Err(e) => {
            logger::log_error(&format!("Listing task failed: {e}"));
            return http::build_500_response();
        }
    };

    match serde_json::to_vec(&entries) {
        Ok(json) => http::build_json_response(json, ctx.is_head),
        Err(e) => {
            logger::log_error(&format!("Failed to serialize listing: {e}"));
            http::build_500_response()
        }
    }
}

/// Fill in missing previews, then list the preview directory
///
/// An aborted origin walk is logged; the listing still reflects whatever the
/// preview directory holds.
pub fn build_listing(state: &AppState) -> Vec<ListingEntry> {
    let summary = match state.previews.generate_missing(&state.photos_root) {
        Ok(summary) => Some(summary),
        Err(e) => {
            logger::log_error(&format!(
                "Origin walk aborted in '{}': {e}",
                state.photos_root.display()
            ));
            None
        }
    };

    let entries = state.previews.catalog();
    logger::log_listing(summary.as_ref(), entries.len());
    entries
}
