//! Application configuration loaded from environment variables.

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::cli::Cli;

/// Which backend the process talks to. Chosen once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Live,
    Snapshot,
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "live" | "dev" | "development" => Ok(Mode::Live),
            "snapshot" | "prod" | "production" => Ok(Mode::Snapshot),
            other => Err(format!("unknown mode '{other}' (expected live or snapshot)")),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Mode::Live => "live",
            Mode::Snapshot => "snapshot",
        })
    }
}

/// Where snapshot documents come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotLocation {
    Url(String),
    Dir(PathBuf),
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub mode: Mode,
    pub api_url: String,
    pub snapshot: SnapshotLocation,
    pub timeout: Duration,
    pub session_dir: PathBuf,
    /// `None` keeps cached results until a write invalidates them.
    pub cache_ttl: Option<Duration>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        let mode = match var("REVIEWHUB_MODE") {
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Ignoring REVIEWHUB_MODE, using live mode");
                Mode::Live
            }),
            None => Mode::Live,
        };

        let snapshot = match var("REVIEWHUB_SNAPSHOT_URL") {
            Some(url) => SnapshotLocation::Url(url),
            None => SnapshotLocation::Dir(
                var("REVIEWHUB_SNAPSHOT_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("public")),
            ),
        };

        let session_dir = var("REVIEWHUB_SESSION_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(default_session_dir);

        let cache_ttl_secs: u64 = var("REVIEWHUB_CACHE_TTL_SECS")
            .and_then(|s| s.parse().ok())
            .unwrap_or(60);

        Self {
            mode,
            api_url: var("REVIEWHUB_API_URL")
                .unwrap_or_else(|| "http://localhost:3001".to_string()),
            snapshot,
            timeout: Duration::from_millis(
                var("REVIEWHUB_TIMEOUT_MS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(5000),
            ),
            session_dir,
            cache_ttl: (cache_ttl_secs > 0).then(|| Duration::from_secs(cache_ttl_secs)),
        }
    }

    /// Command-line flags win over the environment.
    pub fn with_overrides(mut self, cli: &Cli) -> Self {
        if let Some(mode) = cli.mode {
            self.mode = mode;
        }
        if let Some(url) = &cli.api_url {
            self.api_url = url.clone();
        }
        if let Some(url) = &cli.snapshot_url {
            self.snapshot = SnapshotLocation::Url(url.clone());
        } else if let Some(dir) = &cli.snapshot_dir {
            self.snapshot = SnapshotLocation::Dir(dir.clone());
        }
        self
    }
}

fn default_session_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("reviewhub"))
        .unwrap_or_else(|| PathBuf::from(".reviewhub"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]);
        assert_eq!(config.mode, Mode::Live);
        assert_eq!(config.api_url, "http://localhost:3001");
        assert_eq!(config.snapshot, SnapshotLocation::Dir(PathBuf::from("public")));
        assert_eq!(config.timeout, Duration::from_millis(5000));
        assert_eq!(config.cache_ttl, Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_production_means_snapshot() {
        assert_eq!(config(&[("REVIEWHUB_MODE", "production")]).mode, Mode::Snapshot);
        assert_eq!(config(&[("REVIEWHUB_MODE", "PROD")]).mode, Mode::Snapshot);
        assert_eq!(config(&[("REVIEWHUB_MODE", "staging")]).mode, Mode::Live);
    }

    #[test]
    fn test_snapshot_url_beats_dir() {
        let config = config(&[
            ("REVIEWHUB_SNAPSHOT_URL", "https://example.org/reviewhub"),
            ("REVIEWHUB_SNAPSHOT_DIR", "dist"),
            ("REVIEWHUB_CACHE_TTL_SECS", "0"),
        ]);
        assert_eq!(
            config.snapshot,
            SnapshotLocation::Url("https://example.org/reviewhub".to_string())
        );
        assert_eq!(config.cache_ttl, None);
    }

    #[test]
    fn test_cli_overrides_env() {
        let cli = Cli::parse_from([
            "reviewhub",
            "--mode",
            "snapshot",
            "--snapshot-dir",
            "out",
            "whoami",
        ]);
        let config = config(&[("REVIEWHUB_MODE", "live")]).with_overrides(&cli);
        assert_eq!(config.mode, Mode::Snapshot);
        assert_eq!(config.snapshot, SnapshotLocation::Dir(PathBuf::from("out")));
    }
}
