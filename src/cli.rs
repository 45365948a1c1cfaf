//! Command-line interface parsing for the restaurant ratings CLI
//!
//! This module handles parsing of CLI arguments using clap. Every option can
//! also come from the environment (or a `.env` file), which is where the
//! provider API keys normally live.

use clap::Parser;
use directories::ProjectDirs;
use std::path::PathBuf;
use thiserror::Error;

use crate::data::google::GOOGLE_BASE_URL;
use crate::data::yelp::YELP_BASE_URL;
use crate::db::DATABASE_FILE_NAME;

/// Error types for resolving the startup configuration
#[derive(Debug, Error)]
pub enum CliError {
    /// A provider API key was not given on the command line or in the environment
    #[error("Missing API key: pass --{flag} or set {env_var}")]
    MissingApiKey {
        flag: &'static str,
        env_var: &'static str,
    },

    /// No default location for cache or database files could be determined
    #[error("Could not determine a {0} directory; pass it explicitly")]
    NoDefaultDirectory(&'static str),
}

/// Restaurant ratings CLI - compare restaurant ratings by price level
#[derive(Parser, Debug)]
#[command(name = "restaurant-ratings")]
#[command(about = "Compare Google and Yelp restaurant ratings by price level for a U.S. city")]
#[command(version)]
pub struct Cli {
    /// Google Places API key
    #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true)]
    pub google_api_key: Option<String>,

    /// Yelp Fusion API key
    #[arg(long, env = "YELP_API_KEY", hide_env_values = true)]
    pub yelp_api_key: Option<String>,

    /// Directory for cached API responses (default: XDG cache directory)
    #[arg(long, env = "RESTAURANT_RATINGS_CACHE_DIR", value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// SQLite file for harvested listings (default: XDG data directory)
    #[arg(long, env = "RESTAURANT_RATINGS_DATABASE", value_name = "FILE")]
    pub database: Option<PathBuf>,

    /// Google Places text search endpoint
    #[arg(long, env = "GOOGLE_PLACES_URL", default_value = GOOGLE_BASE_URL, hide = true)]
    pub google_base_url: String,

    /// Yelp business search endpoint
    #[arg(long, env = "YELP_SEARCH_URL", default_value = YELP_BASE_URL, hide = true)]
    pub yelp_base_url: String,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupConfig {
    pub google_api_key: String,
    pub yelp_api_key: String,
    pub cache_dir: PathBuf,
    pub database_path: PathBuf,
    pub google_base_url: String,
    pub yelp_base_url: String,
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with defaults filled in for omitted paths
    /// * `Err(CliError)` if an API key is missing or no default directory exists
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let google_api_key = non_empty(&cli.google_api_key).ok_or(CliError::MissingApiKey {
            flag: "google-api-key",
            env_var: "GOOGLE_API_KEY",
        })?;
        let yelp_api_key = non_empty(&cli.yelp_api_key).ok_or(CliError::MissingApiKey {
            flag: "yelp-api-key",
            env_var: "YELP_API_KEY",
        })?;

        let cache_dir = match &cli.cache_dir {
            Some(dir) => dir.clone(),
            None => project_dirs("cache")?.cache_dir().to_path_buf(),
        };
        let database_path = match &cli.database {
            Some(path) => path.clone(),
            None => project_dirs("data")?.data_dir().join(DATABASE_FILE_NAME),
        };

        Ok(StartupConfig {
            google_api_key,
            yelp_api_key,
            cache_dir,
            database_path,
            google_base_url: cli.google_base_url.clone(),
            yelp_base_url: cli.yelp_base_url.clone(),
        })
    }
}

/// Maps the `-v` count to a log level
pub fn log_level(verbose: u8) -> tracing::Level {
    match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn project_dirs(kind: &'static str) -> Result<ProjectDirs, CliError> {
    ProjectDirs::from("", "", "restaurant-ratings").ok_or(CliError::NoDefaultDirectory(kind))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli_with_keys(extra: &[&str]) -> Cli {
        let mut args = vec![
            "restaurant-ratings",
            "--google-api-key",
            "g-key",
            "--yelp-api-key",
            "y-key",
        ];
        args.extend_from_slice(extra);
        Cli::parse_from(args)
    }

    #[test]
    fn test_cli_parse_explicit_paths() {
        let cli = cli_with_keys(&["--cache-dir", "/tmp/cache", "--database", "/tmp/db.sqlite"]);
        let config = StartupConfig::from_cli(&cli).unwrap();

        assert_eq!(config.google_api_key, "g-key");
        assert_eq!(config.yelp_api_key, "y-key");
        assert_eq!(config.cache_dir, PathBuf::from("/tmp/cache"));
        assert_eq!(config.database_path, PathBuf::from("/tmp/db.sqlite"));
    }

    #[test]
    fn test_default_database_file_name() {
        let cli = cli_with_keys(&["--cache-dir", "/tmp/cache"]);
        // Passes if no home directory is available (e.g., in CI)
        if let Ok(config) = StartupConfig::from_cli(&cli) {
            assert!(config.database_path.ends_with(DATABASE_FILE_NAME));
        }
    }

    #[test]
    fn test_missing_key_is_error() {
        let cli = Cli {
            google_api_key: None,
            yelp_api_key: Some("y-key".to_string()),
            cache_dir: None,
            database: None,
            google_base_url: GOOGLE_BASE_URL.to_string(),
            yelp_base_url: YELP_BASE_URL.to_string(),
            verbose: 0,
        };
        let err = StartupConfig::from_cli(&cli).unwrap_err();
        assert!(err.to_string().contains("GOOGLE_API_KEY"));
    }

    #[test]
    fn test_blank_key_is_error() {
        let cli = Cli {
            google_api_key: Some("g-key".to_string()),
            yelp_api_key: Some("   ".to_string()),
            cache_dir: None,
            database: None,
            google_base_url: GOOGLE_BASE_URL.to_string(),
            yelp_base_url: YELP_BASE_URL.to_string(),
            verbose: 0,
        };
        let err = StartupConfig::from_cli(&cli).unwrap_err();
        assert!(err.to_string().contains("YELP_API_KEY"));
    }

    #[test]
    fn test_endpoints_default_to_public_apis() {
        let cli = cli_with_keys(&["--cache-dir", "/tmp/c", "--database", "/tmp/d"]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        assert_eq!(config.google_base_url, GOOGLE_BASE_URL);
        assert_eq!(config.yelp_base_url, YELP_BASE_URL);
    }

    #[test]
    fn test_endpoint_override() {
        let cli = cli_with_keys(&[
            "--cache-dir",
            "/tmp/c",
            "--database",
            "/tmp/d",
            "--google-base-url",
            "http://127.0.0.1:8080/places",
        ]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        assert_eq!(config.google_base_url, "http://127.0.0.1:8080/places");
    }

    #[test]
    fn test_verbose_count() {
        let cli = cli_with_keys(&["-vv"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(log_level(cli.verbose), tracing::Level::DEBUG);
        assert_eq!(log_level(0), tracing::Level::WARN);
        assert_eq!(log_level(7), tracing::Level::TRACE);
    }
}
