// Configuration module entry point
// Layers defaults, the config file, PHOTOS_* environment variables and CLI flags

mod state;
mod types;

use std::net::{SocketAddr, ToSocketAddrs};
use std::path::PathBuf;

use crate::cli::Cli;
use crate::preview::PreviewBounds;

pub use state::AppState;
pub use types::{
    Config, LoggingConfig, PerformanceConfig, PhotosConfig, PreviewConfig, ServerConfig,
};

/// Prefix for environment overrides, e.g. `PHOTOS_SERVER__PORT=9000`
const ENV_PREFIX: &str = "PHOTOS";

impl Config {
    /// Load configuration for the given command line
    ///
    /// Precedence, lowest first: built-in defaults, `<cli.config>.toml` (optional),
    /// `PHOTOS_*` environment variables, explicit CLI flags.
    pub fn load(cli: &Cli) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .set_default("server.host", types::DEFAULT_HOST)?
            .set_default("server.port", i64::from(types::DEFAULT_PORT))?
            .set_default("preview.long_edge", i64::from(PreviewBounds::default().long_edge))?
            .set_default("preview.short_edge", i64::from(PreviewBounds::default().short_edge))?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.header_read_timeout", 30)?
            .add_source(config::File::with_name(&cli.config).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("photos.path", cli.path.clone())?
            .set_override_option("photos.preview_dir", cli.preview_dir.clone())?
            .set_override_option("server.host", cli.host.clone())?
            .set_override_option("server.port", cli.port.map(i64::from))?
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make the server misbehave at runtime
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.preview.long_edge == 0 || self.preview.short_edge == 0 {
            return Err(config::ConfigError::Message(
                "preview.long_edge and preview.short_edge must be greater than 0".to_string(),
            ));
        }
        if self.server.workers == Some(0) {
            return Err(config::ConfigError::Message(
                "server.workers must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolve `server.host:server.port`; host names are looked up
    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        (self.server.host.as_str(), self.server.port)
            .to_socket_addrs()
            .map_err(|e| format!("Invalid address {}:{}: {e}", self.server.host, self.server.port))?
            .next()
            .ok_or_else(|| format!("No address for {}:{}", self.server.host, self.server.port))
    }

    /// Origin photos directory; the working directory when none was given
    pub fn photos_root(&self) -> PathBuf {
        self.photos
            .path
            .as_deref()
            .filter(|p| !p.is_empty())
            .map_or_else(|| PathBuf::from("."), PathBuf::from)
    }

    pub fn preview_dir(&self) -> Option<PathBuf> {
        self.photos
            .preview_dir
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
    }

    pub const fn preview_bounds(&self) -> PreviewBounds {
        PreviewBounds {
            long_edge: self.preview.long_edge,
            short_edge: self.preview.short_edge,
        }
    }
}
