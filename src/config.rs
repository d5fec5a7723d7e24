//! Configuration resolution for weighpoint
//!
//! Resolution priority per field: command line → environment → TOML file →
//! built-in default. The TOML file is optional; a missing file never stops
//! startup, a malformed one does. The resolved [`Config`] is constructed once
//! in `main` and handed to the components that need it, never read from
//! ambient/global state.

use clap::Parser;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Default HTTP listen port
pub const DEFAULT_PORT: u16 = 5740;

/// Default SQLite database file, relative to the working directory
pub const DEFAULT_DATABASE: &str = "weighpoint.db";

/// Default TOML config file, loaded only if it exists
pub const DEFAULT_CONFIG_FILE: &str = "weighpoint.toml";

/// Command-line arguments (each flag also reads its environment variable)
#[derive(Parser, Debug)]
#[command(name = "weighpoint", version, about = "Body-weight ingestion service")]
pub struct Args {
    /// HTTP listen port
    #[arg(long, env = "WEIGHPOINT_PORT")]
    pub port: Option<u16>,

    /// Path to the SQLite database file (created if absent)
    #[arg(long, env = "WEIGHPOINT_DATABASE")]
    pub database: Option<PathBuf>,

    /// Bearer token required on write endpoints; auth is disabled when unset
    #[arg(long, env = "WEIGHPOINT_API_TOKEN")]
    pub api_token: Option<String>,

    /// Comma-separated CORS origin allow-list; empty allows every origin
    #[arg(long, env = "WEIGHPOINT_ALLOWED_ORIGINS")]
    pub allowed_origins: Option<String>,

    /// Require the bearer token on the read endpoint as well
    #[arg(long, env = "WEIGHPOINT_PROTECT_READS")]
    pub protect_reads: Option<bool>,

    /// TOML configuration file
    #[arg(long, env = "WEIGHPOINT_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,
}

/// Optional TOML configuration file contents
///
/// Every field is optional; anything absent falls through to the built-in
/// default. `allowed_origins` uses the same comma-separated form as the
/// environment variable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub port: Option<u16>,
    pub database_path: Option<PathBuf>,
    pub api_token: Option<String>,
    pub allowed_origins: Option<String>,
    pub protect_reads: Option<bool>,
}

/// Resolved service configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP listen port
    pub port: u16,

    /// SQLite database file path
    pub database_path: PathBuf,

    /// Bearer token for write endpoints; `None` disables the auth check
    pub api_token: Option<String>,

    /// CORS origin allow-list; empty allows every origin
    pub allowed_origins: Vec<String>,

    /// Whether the read endpoint requires the bearer token too
    pub protect_reads: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: DEFAULT_PORT,
            database_path: PathBuf::from(DEFAULT_DATABASE),
            api_token: None,
            allowed_origins: Vec::new(),
            protect_reads: false,
        }
    }
}

impl Config {
    /// Resolve configuration from parsed arguments (CLI/env via clap), the
    /// optional TOML file, and built-in defaults.
    pub fn load(args: Args) -> Result<Config> {
        let file = load_toml(&args.config)?;

        let port = args.port.or(file.port).unwrap_or(DEFAULT_PORT);
        let database_path = args
            .database
            .or(file.database_path)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE));

        // A blank token means "unset": auth stays disabled
        let api_token = args
            .api_token
            .or(file.api_token)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        let allowed_origins =
            split_origins(&args.allowed_origins.or(file.allowed_origins).unwrap_or_default());

        let protect_reads = args.protect_reads.or(file.protect_reads).unwrap_or(false);

        Ok(Config {
            port,
            database_path,
            api_token,
            allowed_origins,
            protect_reads,
        })
    }

    /// Loopback listen address for the configured port
    pub fn listen_addr(&self) -> String {
        format!("127.0.0.1:{}", self.port)
    }
}

/// Split a comma-separated origin list, trimming entries and dropping blanks
pub fn split_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn load_toml(path: &Path) -> Result<TomlConfig> {
    if !path.exists() {
        return Ok(TomlConfig::default());
    }
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("failed to parse {}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    fn no_args() -> Args {
        Args {
            port: None,
            database: None,
            api_token: None,
            allowed_origins: None,
            protect_reads: None,
            config: PathBuf::from("does-not-exist.toml"),
        }
    }

    #[test]
    fn test_defaults_when_nothing_is_configured() {
        let config = Config::load(no_args()).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.database_path, PathBuf::from(DEFAULT_DATABASE));
        assert_eq!(config.api_token, None);
        assert!(config.allowed_origins.is_empty());
        assert!(!config.protect_reads);
    }

    #[test]
    fn test_split_origins() {
        assert_eq!(
            split_origins("https://a.example, https://b.example ,,"),
            vec!["https://a.example".to_string(), "https://b.example".to_string()]
        );
        assert!(split_origins("").is_empty());
        assert!(split_origins(" , ").is_empty());
    }

    #[test]
    fn test_blank_api_token_disables_auth() {
        let args = Args {
            api_token: Some("   ".to_string()),
            ..no_args()
        };
        let config = Config::load(args).unwrap();
        assert_eq!(config.api_token, None);
    }

    #[test]
    fn test_toml_file_supplies_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "port = 6001\napi_token = \"secret\"\nallowed_origins = \"https://x.example\""
        )
        .unwrap();

        let args = Args {
            config: file.path().to_path_buf(),
            ..no_args()
        };
        let config = Config::load(args).unwrap();
        assert_eq!(config.port, 6001);
        assert_eq!(config.api_token.as_deref(), Some("secret"));
        assert_eq!(config.allowed_origins, vec!["https://x.example".to_string()]);
    }

    #[test]
    fn test_cli_overrides_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port = 6001").unwrap();

        let args = Args {
            port: Some(7002),
            config: file.path().to_path_buf(),
            ..no_args()
        };
        let config = Config::load(args).unwrap();
        assert_eq!(config.port, 7002);
    }

    #[test]
    fn test_malformed_toml_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port = \"not a number").unwrap();

        let args = Args {
            config: file.path().to_path_buf(),
            ..no_args()
        };
        assert!(Config::load(args).is_err());
    }

    #[test]
    #[serial]
    fn test_environment_feeds_arguments() {
        std::env::set_var("WEIGHPOINT_PORT", "9107");
        let args = Args::try_parse_from(["weighpoint"]).unwrap();
        std::env::remove_var("WEIGHPOINT_PORT");
        assert_eq!(args.port, Some(9107));
    }

    #[test]
    #[serial]
    fn test_cli_overrides_environment() {
        std::env::set_var("WEIGHPOINT_PORT", "9107");
        let args = Args::try_parse_from(["weighpoint", "--port", "9200"]).unwrap();
        std::env::remove_var("WEIGHPOINT_PORT");
        assert_eq!(args.port, Some(9200));
    }
}
