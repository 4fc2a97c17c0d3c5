//! Preview generation
//!
//! Walks the origin root and writes a downscaled copy of every image that has
//! no preview of the same file name yet.

use std::collections::HashMap;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::io::Cursor;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader};
use walkdir::WalkDir;

use super::{read_dimensions, scale, PreviewError, PreviewStore};
use crate::logger;

/// Result of preparing the preview for one origin file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerateOutcome {
    /// A preview with this file name was already present
    Exists,
    /// The origin was resized to the given dimensions
    Resized { width: u32, height: u32 },
    /// The origin already fits the bounds and was copied as-is
    Copied { width: u32, height: u32 },
}

/// Counters for one pass over the origin root
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationSummary {
    pub generated: usize,
    pub existing: usize,
    pub failed: usize,
}

/// Per-file-name locks around check-then-write
///
/// Two concurrent listings that both find a preview missing serialize on the
/// file name; the second re-checks existence and finds the first one's output.
#[derive(Debug, Default)]
pub struct PreviewLocks {
    inner: Mutex<HashMap<OsString, Arc<Mutex<()>>>>,
}

impl PreviewLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_for(&self, name: &OsStr) -> Arc<Mutex<()>> {
        let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(map.entry(name.to_os_string()).or_default())
    }
}

impl PreviewStore {
    /// Generate every missing preview under `origin_root`
    ///
    /// Per-file failures are logged and skipped. A walk error stops the pass
    /// and is returned to the caller.
    pub fn generate_missing(&self, origin_root: &Path) -> Result<GenerationSummary, PreviewError> {
        let mut summary = GenerationSummary::default();

        for entry in WalkDir::new(origin_root).sort_by_file_name() {
            let entry = entry?;
            if entry.file_type().is_dir() {
                continue;
            }

            match self.ensure_preview(entry.path()) {
                Ok(GenerateOutcome::Exists) => summary.existing += 1,
                Ok(outcome) => {
                    summary.generated += 1;
                    logger::log_preview_generated(entry.path(), outcome);
                }
                Err(e) => {
                    summary.failed += 1;
                    logger::log_error(&format!(
                        "Failed to generate preview for '{}': {e}",
                        entry.path().display()
                    ));
                }
            }
        }

        Ok(summary)
    }

    /// Make sure a preview exists for `source`, generating it if absent
    pub fn ensure_preview(&self, source: &Path) -> Result<GenerateOutcome, PreviewError> {
        let name = source
            .file_name()
            .ok_or_else(|| PreviewError::NoFileName(source.to_path_buf()))?;
        let target = self.dir.join(name);

        if target.exists() {
            return Ok(GenerateOutcome::Exists);
        }

        let lock = self.locks.lock_for(name);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        // Another request may have finished it while we waited
        if target.exists() {
            return Ok(GenerateOutcome::Exists);
        }

        write_preview(source, &target, self.bounds)
    }
}

#[cfg(test)]
impl PreviewStore {
    /// The lock that serializes generation of the preview called `name`
    pub(crate) fn generation_lock(&self, name: &str) -> Arc<Mutex<()>> {
        self.locks.lock_for(OsStr::new(name))
    }
}

/// Decode `source`, downscale it, and write the result to `target`
fn write_preview(
    source: &Path,
    target: &Path,
    bounds: scale::PreviewBounds,
) -> Result<GenerateOutcome, PreviewError> {
    let (width, height) = read_dimensions(source)?;
    if scale::divisor(width, height, bounds) == 1 {
        fs::copy(source, target)?;
        return Ok(GenerateOutcome::Copied { width, height });
    }

    let reader = ImageReader::open(source)?.with_guessed_format()?;
    let source_format = reader.format();
    let image = reader.decode()?;

    let format = ImageFormat::from_path(target)
        .ok()
        .or(source_format)
        .ok_or_else(|| PreviewError::UnknownFormat(source.to_path_buf()))?;

    let (new_width, new_height) = scale::preview_size(width, height, bounds);
    let mut resized = image.resize_exact(new_width, new_height, FilterType::Lanczos3);
    if format == ImageFormat::Jpeg && resized.color().has_alpha() {
        resized = DynamicImage::ImageRgb8(resized.to_rgb8());
    }

    // Encode fully before touching the cache so a failed encode leaves no file behind
    let mut encoded = Vec::new();
    resized.write_to(&mut Cursor::new(&mut encoded), format)?;
    fs::write(target, encoded)?;

    Ok(GenerateOutcome::Resized {
        width: new_width,
        height: new_height,
    })
}
