//! Command line interface

use clap::Parser;

/// Serve a photo folder with lazily generated previews
#[derive(Parser, Debug)]
#[command(name = "photo_preview_server", version, about)]
pub struct Cli {
    #[arg(long, env = "PHOTOS_PATH", help = "path to the photos folder.")]
    pub path: Option<String>,
    #[arg(
        long,
        env = "PHOTOS_PREVIEW_DIR",
        help = "Preview cache directory to reuse (default: a new timestamped temp dir)"
    )]
    pub preview_dir: Option<String>,
    #[arg(
        short = 'c',
        long,
        default_value = "config",
        help = "Configuration file, extension optional"
    )]
    pub config: String,
    #[arg(long, help = "Bind address (overrides server.host)")]
    pub host: Option<String>,
    #[arg(short = 'p', long, help = "HTTP port (overrides server.port)")]
    pub port: Option<u16>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_flag() {
        let cli = Cli::parse_from(["photo_preview_server", "--path", "/srv/photos"]);
        assert_eq!(cli.path.as_deref(), Some("/srv/photos"));
        assert_eq!(cli.config, "config");
        assert_eq!(cli.port, None);
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::parse_from([
            "photo_preview_server",
            "--preview-dir",
            "/tmp/cache",
            "-p",
            "9000",
            "--host",
            "127.0.0.1",
        ]);
        assert_eq!(cli.preview_dir.as_deref(), Some("/tmp/cache"));
        assert_eq!(cli.port, Some(9000));
        assert_eq!(cli.host.as_deref(), Some("127.0.0.1"));
    }

    #[test]
    fn test_rejects_bad_port() {
        assert!(Cli::try_parse_from(["photo_preview_server", "--port", "http"]).is_err());
    }
}
