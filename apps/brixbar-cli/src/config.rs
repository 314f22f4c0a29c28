//! CLI configuration.
//!
//! Loaded from `~/.config/brixbar/config.json` (or `--config`), then
//! overridden by `BRIXBAR_API_URL` and the `--api-url` flag.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Environment variable that overrides the API base URL.
pub const API_URL_ENV: &str = "BRIXBAR_API_URL";

const DEFAULT_API_BASE_URL: &str = "http://localhost:3001/api";

/// Gauge settings used when the command line leaves them out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaugeDefaults {
    pub max_brix: f64,
    pub threshold: f64,
    pub bar_height: f64,
}

impl Default for GaugeDefaults {
    fn default() -> Self {
        Self {
            max_brix: 24.0,
            threshold: 12.0,
            bar_height: 24.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    /// Per-request timeout; 0 disables it.
    pub request_timeout_secs: u64,
    pub gauge: GaugeDefaults,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.into(),
            request_timeout_secs: 10,
            gauge: GaugeDefaults::default(),
        }
    }
}

impl Config {
    /// Loads the config file at `path`, falling back to defaults when it is
    /// missing or unreadable as JSON.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        match serde_json::from_str::<Config>(&content) {
            Ok(config) => Ok(config),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to parse config, using defaults"
                );
                Ok(Self::default())
            }
        }
    }

    /// Writes the config as pretty JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        tracing::debug!(path = %path.display(), "configuration saved");
        Ok(())
    }

    /// Applies environment overrides through `lookup` (normally `std::env::var`).
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(API_URL_ENV).filter(|u| !u.trim().is_empty()) {
            tracing::debug!(url = %url, "API URL taken from environment");
            self.api_base_url = url;
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }
}

/// Default config file location.
pub fn config_path() -> PathBuf {
    config_base_dir().join("brixbar").join("config.json")
}

fn config_base_dir() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        let appdata =
            std::env::var("APPDATA").unwrap_or_else(|_| "C:\\Users\\Default\\AppData".into());
        PathBuf::from(appdata)
    }

    #[cfg(not(target_os = "windows"))]
    {
        if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME")
            && !xdg.is_empty()
        {
            return PathBuf::from(xdg);
        }
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        PathBuf::from(home).join(".config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"api_base_url":"https://brix.example.com/api","gauge":{"threshold":16}}"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.api_base_url, "https://brix.example.com/api");
        assert_eq!(config.request_timeout_secs, 10);
        assert_eq!(config.gauge.threshold, 16.0);
        assert_eq!(config.gauge.max_brix, 24.0);
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert_eq!(Config::load(&path).unwrap(), Config::default());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = Config::default();
        config.gauge.max_brix = 30.0;
        config.request_timeout_secs = 0;
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded, config);
        assert!(loaded.request_timeout().is_none());
    }

    #[test]
    fn env_overrides_url() {
        let mut config = Config::default();
        config.apply_env(|key| (key == API_URL_ENV).then(|| "http://10.0.0.2:3001/api".into()));
        assert_eq!(config.api_base_url, "http://10.0.0.2:3001/api");

        let mut config = Config::default();
        config.apply_env(|_| Some("   ".into()));
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
    }

    #[test]
    fn timeout_from_seconds() {
        assert_eq!(
            Config::default().request_timeout(),
            Some(Duration::from_secs(10))
        );
    }
}
