//! Log writer module
//!
//! Thread-safe log output to files or stdout/stderr, installed once at startup.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Mutex, OnceLock, PoisonError};

/// Global log writer instance
static LOG_WRITER: OnceLock<LogWriter> = OnceLock::new();

/// Log output target
enum LogTarget {
    Stdout,
    Stderr,
    File(Mutex<File>),
}

impl LogTarget {
    fn open(path: Option<&str>, fallback: Self) -> io::Result<Self> {
        match path {
            Some(p) => Ok(Self::File(Mutex::new(open_log_file(p)?))),
            None => Ok(fallback),
        }
    }

    fn write_line(&self, message: &str) {
        match self {
            Self::Stdout => println!("{message}"),
            Self::Stderr => eprintln!("{message}"),
            Self::File(file) => {
                let mut f = file.lock().unwrap_or_else(PoisonError::into_inner);
                // Nowhere left to report a failed log write
                let _ = writeln!(f, "{message}");
            }
        }
    }
}

/// Access/info lines and error lines, each to its own target
pub struct LogWriter {
    access: LogTarget,
    error: LogTarget,
}

impl LogWriter {
    fn new(access_log_file: Option<&str>, error_log_file: Option<&str>) -> io::Result<Self> {
        Ok(Self {
            access: LogTarget::open(access_log_file, LogTarget::Stdout)?,
            error: LogTarget::open(error_log_file, LogTarget::Stderr)?,
        })
    }

    /// Write to access log (also used for info lines)
    pub fn write_access(&self, message: &str) {
        self.access.write_line(message);
    }

    /// Write to error log
    pub fn write_error(&self, message: &str) {
        self.error.write_line(message);
    }
}

/// Open or create a log file for appending
fn open_log_file(path: &str) -> io::Result<File> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    OpenOptions::new().create(true).append(true).open(path)
}

/// Initialize the global log writer
///
/// Returns error if log files cannot be opened or the writer is already set.
pub fn init(access_log_file: Option<&str>, error_log_file: Option<&str>) -> io::Result<()> {
    let writer = LogWriter::new(access_log_file, error_log_file)?;
    LOG_WRITER.set(writer).map_err(|_| {
        io::Error::new(
            io::ErrorKind::AlreadyExists,
            "Log writer already initialized",
        )
    })
}

/// The global log writer, if `init` has run
pub fn get() -> Option<&'static LogWriter> {
    LOG_WRITER.get()
}
