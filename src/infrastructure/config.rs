//! Application configuration loading and management.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::info;

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub output: OutputConfig,
    pub http: HttpConfig,
    pub batch: BatchConfig,
    pub logging: LoggingConfig,
}

/// Where downloaded assets land.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Root directory for all downloaded images. One subdirectory is created
    /// per `brand_seo_url` value.
    pub output_dir: PathBuf,
}

/// HTTP client behavior for the CSV fetch and image downloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Request headers chosen to reduce anti-bot rejection by image hosts.
    pub user_agent: String,
    pub accept: String,
    pub accept_language: String,
    pub referer: String,

    /// Per-request timeout in seconds.
    pub timeout_seconds: u64,

    /// Whether to follow redirects.
    pub follow_redirects: bool,
}

/// Batch processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Maximum concurrent image downloads.
    pub max_concurrent_downloads: usize,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(defaults::OUTPUT_DIR),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::USER_AGENT.to_string(),
            accept: defaults::ACCEPT.to_string(),
            accept_language: defaults::ACCEPT_LANGUAGE.to_string(),
            referer: defaults::REFERER.to_string(),
            timeout_seconds: defaults::REQUEST_TIMEOUT_SECONDS,
            follow_redirects: true,
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_concurrent_downloads: defaults::MAX_CONCURRENT_DOWNLOADS,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
        }
    }
}

/// Default configuration values.
pub mod defaults {
    /// Default root directory for downloaded images.
    pub const OUTPUT_DIR: &str = "products";

    /// Browser-like User-Agent to avoid trivial bot rejection.
    pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

    /// Accept header matching what a browser sends for image navigation.
    pub const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8";

    pub const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.5";

    pub const REFERER: &str = "https://www.google.com/";

    /// Default request timeout in seconds.
    pub const REQUEST_TIMEOUT_SECONDS: u64 = 30;

    /// Default maximum concurrent image downloads.
    pub const MAX_CONCURRENT_DOWNLOADS: usize = 8;

    /// Default log level.
    pub const LOG_LEVEL: &str = "info";
}

/// Configuration manager for loading and saving settings as JSON.
pub struct ConfigManager {
    pub config_path: PathBuf,
}

impl ConfigManager {
    /// Get the application configuration directory.
    pub fn get_config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get user config directory")?
            .join("sheet-image-fetcher");

        Ok(config_dir)
    }

    /// Create a configuration manager rooted at the default config path.
    pub fn new() -> Result<Self> {
        let config_dir = Self::get_config_dir()?;
        let config_path = config_dir.join("config.json");

        Ok(Self { config_path })
    }

    /// Create a configuration manager for an explicit config file path.
    pub fn with_path(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    /// Load the configuration, writing defaults on first run.
    pub async fn load_config(&self) -> Result<AppConfig> {
        if !self.config_path.exists() {
            info!(
                "No configuration found at {} - writing defaults",
                self.config_path.display()
            );
            let config = AppConfig::default();
            self.save_config(&config).await?;
            return Ok(config);
        }

        let content = fs::read_to_string(&self.config_path)
            .await
            .with_context(|| format!("Failed to read config file {}", self.config_path.display()))?;

        let config: AppConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", self.config_path.display()))?;

        Ok(config)
    }

    /// Persist the configuration as pretty-printed JSON.
    pub async fn save_config(&self, config: &AppConfig) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create config directory {}", parent.display()))?;
        }

        let content =
            serde_json::to_string_pretty(config).context("Failed to serialize configuration")?;

        fs::write(&self.config_path, content)
            .await
            .with_context(|| format!("Failed to write config file {}", self.config_path.display()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = AppConfig::default();
        assert_eq!(config.output.output_dir, PathBuf::from("products"));
        assert_eq!(config.http.timeout_seconds, 30);
        assert!(config.http.follow_redirects);
        assert!(config.batch.max_concurrent_downloads > 0);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn partial_config_files_fill_in_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"batch": {"max_concurrent_downloads": 2}}"#).unwrap();
        assert_eq!(config.batch.max_concurrent_downloads, 2);
        assert_eq!(config.http.timeout_seconds, defaults::REQUEST_TIMEOUT_SECONDS);
    }

    #[tokio::test]
    async fn config_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::with_path(dir.path().join("config.json"));

        let mut config = AppConfig::default();
        config.batch.max_concurrent_downloads = 3;
        config.output.output_dir = PathBuf::from("assets");
        manager.save_config(&config).await.unwrap();

        let loaded = manager.load_config().await.unwrap();
        assert_eq!(loaded.batch.max_concurrent_downloads, 3);
        assert_eq!(loaded.output.output_dir, PathBuf::from("assets"));
    }

    #[tokio::test]
    async fn first_load_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let manager = ConfigManager::with_path(path.clone());

        let config = manager.load_config().await.unwrap();
        assert_eq!(config.output.output_dir, PathBuf::from("products"));
        assert!(path.exists());
    }
}
