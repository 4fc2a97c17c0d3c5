//! Preview directory listing

use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use super::{read_dimensions, PreviewStore, PREVIEW_URL_PREFIX};
use crate::logger;

/// One preview as reported by `/list`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingEntry {
    pub src: String,
    pub width: u32,
    pub height: u32,
}

impl PreviewStore {
    /// List every readable preview, in file name order
    ///
    /// Files whose dimensions cannot be read are logged and left out. A walk
    /// error ends the listing early with whatever was collected so far.
    pub fn catalog(&self) -> Vec<ListingEntry> {
        let mut entries = Vec::new();

        for entry in WalkDir::new(&self.dir).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    logger::log_error(&format!(
                        "Preview directory walk aborted in '{}': {e}",
                        self.dir.display()
                    ));
                    break;
                }
            };
            if entry.file_type().is_dir() {
                continue;
            }

            match read_dimensions(entry.path()) {
                Ok((width, height)) => entries.push(ListingEntry {
                    src: format!("{PREVIEW_URL_PREFIX}{}", entry.file_name().to_string_lossy()),
                    width,
                    height,
                }),
                Err(e) => logger::log_error(&format!(
                    "Failed to read preview '{}': {e}",
                    entry.path().display()
                )),
            }
        }

        entries
    }
}
