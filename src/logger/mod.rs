//! Logger module
//!
//! Provides logging utilities for the photo server including:
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - Error and warning logging
//! - File-based logging support

mod format;
pub mod writer;

pub use format::{AccessLogEntry, AccessLogFormat};

use crate::config::{Config, LoggingConfig};
use crate::preview::{GenerateOutcome, GenerationSummary};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::atomic::{AtomicU8, Ordering};

/// Verbosity threshold, ordered from quietest to chattiest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LogLevel {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    /// Parse a level name; unknown names fall back to `Info`
    pub fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "error" => Self::Error,
            "warn" | "warning" => Self::Warn,
            "debug" | "trace" => Self::Debug,
            _ => Self::Info,
        }
    }

    const fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Error,
            1 => Self::Warn,
            3 => Self::Debug,
            _ => Self::Info,
        }
    }
}

static LEVEL: AtomicU8 = AtomicU8::new(LogLevel::Info as u8);

fn enabled(level: LogLevel) -> bool {
    level <= LogLevel::from_u8(LEVEL.load(Ordering::Relaxed))
}

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &LoggingConfig) -> std::io::Result<()> {
    LEVEL.store(LogLevel::parse(&config.level) as u8, Ordering::Relaxed);
    writer::init(
        config.access_log_file.as_deref(),
        config.error_log_file.as_deref(),
    )
}

fn write_info(message: &str) {
    match writer::get() {
        Some(w) => w.write_access(message),
        None => println!("{message}"),
    }
}

fn write_error(message: &str) {
    match writer::get() {
        Some(w) => w.write_error(message),
        None => eprintln!("{message}"),
    }
}

pub fn log_server_start(addr: &SocketAddr, config: &Config, photos_root: &Path, preview_dir: &Path) {
    if !enabled(LogLevel::Info) {
        return;
    }
    write_info("======================================");
    write_info("Photo server started successfully");
    write_info(&format!("Listening on: http://{addr}"));
    write_info(&format!("Photos: {}", photos_root.display()));
    write_info(&format!("Previews: {}", preview_dir.display()));
    write_info(&format!(
        "Preview bounds: {}x{}",
        config.preview.long_edge, config.preview.short_edge
    ));
    write_info(&format!("Log level: {}", config.logging.level));
    if let Some(workers) = config.server.workers {
        write_info(&format!("Worker threads: {workers}"));
    }
    if let Some(ref path) = config.logging.access_log_file {
        write_info(&format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write_info(&format!("Error log: {path}"));
    }
    write_info("======================================\n");
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    if enabled(LogLevel::Debug) {
        write_info(&format!("[Connection] Accepted from: {peer_addr}"));
    }
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    if enabled(LogLevel::Warn) {
        write_error(&format!("[WARN] {message}"));
    }
}

pub fn log_info(message: &str) {
    if enabled(LogLevel::Info) {
        write_info(&format!("[INFO] {message}"));
    }
}

pub fn log_preview_generated(source: &Path, outcome: GenerateOutcome) {
    if !enabled(LogLevel::Info) {
        return;
    }
    match outcome {
        GenerateOutcome::Resized { width, height } => write_info(&format!(
            "[Preview] {} -> {width}x{height}",
            source.display()
        )),
        GenerateOutcome::Copied { width, height } => write_info(&format!(
            "[Preview] {} copied ({width}x{height} fits bounds)",
            source.display()
        )),
        GenerateOutcome::Exists => {}
    }
}

pub fn log_listing(summary: Option<&GenerationSummary>, entries: usize) {
    if !enabled(LogLevel::Debug) {
        return;
    }
    match summary {
        Some(s) => write_info(&format!(
            "[List] {entries} previews ({} generated, {} cached, {} failed)",
            s.generated, s.existing, s.failed
        )),
        None => write_info(&format!("[List] {entries} previews (origin walk aborted)")),
    }
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &AccessLogFormat) {
    let line = entry.format(format);
    match writer::get() {
        Some(w) => w.write_access(&line),
        None => println!("{line}"),
    }
}
