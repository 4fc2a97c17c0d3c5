// Application state module
// Everything request handlers share, fixed before the listener accepts connections

use std::io;
use std::path::PathBuf;
use std::sync::atomic::AtomicUsize;

use super::types::Config;
use crate::logger::AccessLogFormat;
use crate::preview::PreviewStore;

/// Application state
pub struct AppState {
    pub config: Config,
    /// Origin photos directory
    pub photos_root: PathBuf,
    /// Preview cache, resolved once at startup
    pub previews: PreviewStore,
    pub access_log_format: AccessLogFormat,
    pub active_connections: AtomicUsize,
}

impl AppState {
    /// Build state from configuration, creating the preview directory
    pub fn new(config: Config) -> io::Result<Self> {
        let previews = PreviewStore::open(config.preview_dir().as_deref(), config.preview_bounds())?;
        let access_log_format = AccessLogFormat::parse(&config.logging.access_log_format);

        Ok(Self {
            photos_root: config.photos_root(),
            previews,
            access_log_format,
            active_connections: AtomicUsize::new(0),
            config,
        })
    }
}
