//! HTTP protocol layer module
//!
//! Response builders, CORS headers, conditional GET and byte ranges, kept
//! apart from the photo-specific handlers.

pub mod cache;
pub mod cors;
pub mod mime;
pub mod range;
pub mod response;

pub use cors::apply_cors_headers;
pub use range::{parse_range_header, RangeParseResult};
pub use response::{
    build_304_response, build_404_response, build_416_response, build_500_response,
    build_json_response, build_options_response,
};
