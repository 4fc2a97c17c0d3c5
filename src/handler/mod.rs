//! Request handler module
//!
//! Dispatches `/list`, `/preview/...` and `/origin/...` to their handlers.

pub mod listing;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
