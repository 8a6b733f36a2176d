//! Command-line arguments and the TOML config file.
//!
//! Precedence, highest first: command-line flag, `CODEREFINE_API_URL` (API URL
//! only), config file, built-in default. A missing or malformed file is a soft
//! failure: defaults are used and a warning goes to the log.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use serde::Deserialize;

use coderefine_core::client::{DEFAULT_API_URL, DEFAULT_TIMEOUT};
use coderefine_core::dashboard::DEFAULT_RECENT_LIMIT;
use coderefine_core::history::DEFAULT_HISTORY_LIMIT;

/// CodeRefine - AI code review and conversion in the terminal
#[derive(Parser, Debug, Default)]
#[command(name = "coderefine")]
#[command(about = "Terminal client for the CodeRefine review service", long_about = None)]
pub struct Cli {
    /// Backend root URL, e.g. http://localhost:8000/api
    #[arg(long, env = "CODEREFINE_API_URL", value_name = "URL")]
    pub api_url: Option<String>,

    /// Config file to read instead of the default location
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Colour theme: catppuccin-mocha or dark
    #[arg(long)]
    pub theme: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_url: String,
    pub timeout_secs: u64,
    pub theme: String,
    pub history_limit: usize,
    pub dashboard_recent_limit: usize,
    pub download_dir: PathBuf,
    pub storage_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_owned(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            theme: "catppuccin-mocha".to_owned(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            dashboard_recent_limit: DEFAULT_RECENT_LIMIT,
            download_dir: PathBuf::from("."),
            storage_path: default_storage_path(),
        }
    }
}

impl Config {
    /// Resolves the effective configuration for this run.
    pub fn load(cli: &Cli) -> Self {
        let path = cli.config.clone().unwrap_or_else(config_path);
        let mut config = Self::from_file(&path);
        config.apply_cli(cli);
        config
    }

    /// Reads `path`, falling back to defaults when it is absent or invalid.
    pub fn from_file(path: &Path) -> Self {
        let raw = match std::fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!("cannot read config {}: {e}", path.display());
                }
                return Self::default();
            }
        };
        match toml::from_str(&raw) {
            Ok(config) => {
                tracing::info!("config loaded from {}", path.display());
                config
            }
            Err(e) => {
                tracing::warn!("config parse error in {}: {e}", path.display());
                Self::default()
            }
        }
    }

    fn apply_cli(&mut self, cli: &Cli) {
        if let Some(url) = &cli.api_url {
            self.api_url = url.clone();
        }
        if let Some(secs) = cli.timeout_secs {
            self.timeout_secs = secs;
        }
        if let Some(theme) = &cli.theme {
            self.theme = theme.clone();
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

/// Returns the path to the config file.
///
/// Prefers `$XDG_CONFIG_HOME/coderefine/config.toml`; falls back to
/// `~/.config/coderefine/config.toml` when the env var is absent.
pub fn config_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(|| std::env::var("HOME").ok().map(|h| PathBuf::from(h).join(".config")))
        .unwrap_or_else(|| PathBuf::from(".config"));
    base.join("coderefine").join("config.toml")
}

fn default_storage_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("coderefine")
        .join("client.db")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "api_url = \"https://review.example.com/api\"\nhistory_limit = 20\n")
            .unwrap();

        let config = Config::from_file(&path);
        assert_eq!(config.api_url, "https://review.example.com/api");
        assert_eq!(config.history_limit, 20);
        assert_eq!(config.timeout_secs, 60);
        assert_eq!(config.dashboard_recent_limit, 5);
        assert_eq!(config.theme, "catppuccin-mocha");
    }

    #[test]
    fn malformed_or_missing_file_falls_back_to_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "timeout_secs = \"soon\"").unwrap();
        assert_eq!(Config::from_file(&path), Config::default());
        assert_eq!(Config::from_file(&dir.path().join("absent.toml")), Config::default());
    }

    #[test]
    fn flags_override_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "api_url = \"http://file\"\ntheme = \"dark\"\ntimeout_secs = 10\n")
            .unwrap();

        let cli = Cli {
            api_url: Some("http://flag".into()),
            config: Some(path),
            timeout_secs: Some(5),
            theme: None,
        };
        let config = Config::load(&cli);
        assert_eq!(config.api_url, "http://flag");
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.theme, "dark");
    }

    #[test]
    fn cli_parses_long_flags() {
        let cli = Cli::try_parse_from([
            "coderefine",
            "--api-url",
            "http://x/api",
            "--timeout-secs",
            "30",
            "--theme",
            "dark",
        ])
        .unwrap();
        assert_eq!(cli.api_url.as_deref(), Some("http://x/api"));
        assert_eq!(cli.timeout_secs, Some(30));
        assert_eq!(cli.theme.as_deref(), Some("dark"));
    }
}
