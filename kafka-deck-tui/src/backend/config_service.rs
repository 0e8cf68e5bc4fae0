//! Configuration service

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::config_dir;
use crate::view::theme::Theme;

const CONFIG_FILE: &str = "config.json";

/// Environment variable that overrides `log_level`
pub const LOG_ENV: &str = "KAFKA_DECK_LOG";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Event poll timeout of the main loop
    pub tick_rate_ms: u64,
    /// `tracing` filter directive, e.g. `info` or `kafka_deck_tui=debug`
    pub log_level: String,
    /// Messages fetched per browse
    pub message_limit: usize,
    /// Connect to the built-in demo cluster instead of a real broker
    pub demo_cluster: bool,
    pub theme: Theme,
}

impl AppConfig {
    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms.max(1))
    }

    /// `KAFKA_DECK_LOG` wins over the configured level.
    pub fn log_filter(&self) -> String {
        std::env::var(LOG_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| self.log_level.clone())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: 100,
            log_level: "info".to_string(),
            message_limit: 100,
            demo_cluster: true,
            theme: Theme::Dark,
        }
    }
}

/// Configuration service trait
pub trait ConfigService: Send + Sync {
    /// Load the configuration; a missing file yields defaults.
    fn load(&self) -> Result<AppConfig>;
}

/// File backed configuration service
pub struct LocalConfigService {
    path: PathBuf,
}

impl LocalConfigService {
    pub fn new() -> Self {
        Self::with_path(config_dir().join(CONFIG_FILE))
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Default for LocalConfigService {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigService for LocalConfigService {
    fn load(&self) -> Result<AppConfig> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(AppConfig::default()),
            Err(e) => {
                return Err(e).with_context(|| format!("reading {}", self.path.display()));
            }
        };

        serde_json::from_str(&content)
            .with_context(|| format!("parsing {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = LocalConfigService::with_path(dir.path().join("config.json"))
            .load()
            .unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.tick_rate(), Duration::from_millis(100));
    }

    #[test]
    fn partial_file_fills_remaining_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{ "message_limit": 25, "demo_cluster": false, "theme": "light" }"#,
        )
        .unwrap();

        let config = LocalConfigService::with_path(&path).load().unwrap();
        assert_eq!(config.message_limit, 25);
        assert!(!config.demo_cluster);
        assert_eq!(config.theme, Theme::Light);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn invalid_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "tick_rate_ms = 5").unwrap();
        assert!(LocalConfigService::with_path(&path).load().is_err());
    }
}
