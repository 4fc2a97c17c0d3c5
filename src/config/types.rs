// Configuration types module
// Defines all configuration-related data structures

use serde::{Deserialize, Serialize};

use crate::preview::scale::{DEFAULT_LONG_EDGE, DEFAULT_SHORT_EDGE};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8190;

/// Main configuration structure
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub photos: PhotosConfig,
    pub preview: PreviewConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Tokio worker threads, CPU cores when unset
    #[serde(default)]
    pub workers: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            workers: None,
        }
    }
}

/// Where photos live and where previews are cached
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct PhotosConfig {
    /// Origin photos directory
    #[serde(default)]
    pub path: Option<String>,
    /// Existing preview directory to reuse; a timestamped temp dir otherwise
    #[serde(default)]
    pub preview_dir: Option<String>,
}

/// Preview sizing bounds
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct PreviewConfig {
    pub long_edge: u32,
    pub short_edge: u32,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            long_edge: DEFAULT_LONG_EDGE,
            short_edge: DEFAULT_SHORT_EDGE,
        }
    }
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            access_log: true,
            access_log_format: default_access_log_format(),
            access_log_file: None,
            error_log_file: None,
        }
    }
}

/// Performance configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PerformanceConfig {
    /// Seconds; 0 disables keep-alive
    pub keep_alive_timeout: u64,
    /// Seconds allowed for a request's headers to arrive; 0 disables
    pub header_read_timeout: u64,
    #[serde(default)]
    pub max_connections: Option<u64>,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            keep_alive_timeout: 75,
            header_read_timeout: 30,
            max_connections: None,
        }
    }
}
