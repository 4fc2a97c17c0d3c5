//! Preview cache module
//!
//! Owns the preview directory: generating downscaled copies of origin images
//! and listing what the directory currently holds.

mod catalog;
mod generator;
pub mod scale;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Local;
use image::ImageReader;

pub use catalog::ListingEntry;
pub use generator::{GenerateOutcome, GenerationSummary, PreviewLocks};
pub use scale::PreviewBounds;

/// URL prefix previews are served under
pub const PREVIEW_URL_PREFIX: &str = "/preview/";

/// Errors raised while generating or inspecting previews
#[derive(Debug, thiserror::Error)]
pub enum PreviewError {
    #[error("directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("path has no file name: {}", .0.display())]
    NoFileName(PathBuf),
    #[error("cannot determine image format for {}", .0.display())]
    UnknownFormat(PathBuf),
}

/// The preview cache directory and the settings used to fill it
#[derive(Debug)]
pub struct PreviewStore {
    dir: PathBuf,
    bounds: PreviewBounds,
    locks: PreviewLocks,
}

impl PreviewStore {
    /// Open the preview directory, creating it if needed
    ///
    /// Without an explicit directory a fresh `photos-<timestamp>` directory is
    /// created under the system temp dir.
    pub fn open(dir: Option<&Path>, bounds: PreviewBounds) -> io::Result<Self> {
        let dir = dir.map_or_else(default_preview_dir, Path::to_path_buf);
        fs::create_dir_all(&dir)?;

        Ok(Self {
            dir,
            bounds,
            locks: PreviewLocks::new(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Timestamped preview directory under the system temp dir
pub fn default_preview_dir() -> PathBuf {
    let stamp = Local::now().format("%Y%m%d-%H%M%S");
    std::env::temp_dir().join(format!("photos-{stamp}"))
}

/// Read pixel dimensions from the image header without decoding the pixels
pub fn read_dimensions(path: &Path) -> Result<(u32, u32), PreviewError> {
    let reader = ImageReader::open(path)?.with_guessed_format()?;
    Ok(reader.into_dimensions()?)
}


#[cfg(test)]
mod tests {
    use super::test_support::write_image;
    use super::*;

    #[test]
    fn test_open_creates_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("nested").join("previews");

        let store = PreviewStore::open(Some(&dir), PreviewBounds::default()).unwrap();

        assert!(dir.is_dir());
        assert_eq!(store.dir(), dir.as_path());
    }

    #[test]
    fn test_default_dir_is_timestamped() {
        let dir = default_preview_dir();
        let name = dir.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("photos-"));
        // photos-YYYYMMDD-HHMMSS
        assert_eq!(name.len(), "photos-".len() + 15);
    }

    #[test]
    fn test_read_dimensions() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("a.png");
        write_image(&path, 32, 20);

        assert_eq!(read_dimensions(&path).unwrap(), (32, 20));
    }

    #[test]
    fn test_read_dimensions_rejects_garbage() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("notes.txt");
        std::fs::write(&path, b"not an image").unwrap();

        assert!(read_dimensions(&path).is_err());
    }
}
