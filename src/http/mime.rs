//! MIME type detection module
//!
//! Maps file extensions to a Content-Type, with photo formats covered first.

use std::path::Path;

/// Content-Type for the file at `path`, from its extension (case-insensitive)
pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    get_content_type(ext.as_deref())
}

/// Get MIME Content-Type based on a lowercase file extension
pub fn get_content_type(extension: Option<&str>) -> &'static str {
    match extension {
        // Raster images
        Some("jpg" | "jpeg" | "jpe") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("avif") => "image/avif",
        Some("bmp") => "image/bmp",
        Some("tif" | "tiff") => "image/tiff",
        Some("ico") => "image/x-icon",
        Some("heic") => "image/heic",
        Some("heif") => "image/heif",
        Some("svg") => "image/svg+xml",

        // Camera raw
        Some("dng") => "image/x-adobe-dng",
        Some("cr2") => "image/x-canon-cr2",
        Some("nef") => "image/x-nikon-nef",
        Some("arw") => "image/x-sony-arw",

        // Video clips often found next to photos
        Some("mp4") => "video/mp4",
        Some("mov") => "video/quicktime",

        // Sidecars
        Some("json") => "application/json",
        Some("xmp" | "xml") => "application/xml",
        Some("txt") => "text/plain; charset=utf-8",

        _ => "application/octet-stream",
    }
}
