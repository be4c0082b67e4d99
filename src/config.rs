//! Configuration file support for the WeatherLink scraper.
//!
//! Loads settings from `~/.config/weatherlink-scraper/config.toml` on Linux
//! (or platform-appropriate location on other OSes).

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::fetch::{FetchConfig, WEATHERLINK_BASE_URL};

/// Application configuration loaded from TOML file.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// WeatherLink service base URL.
    pub base_url: String,

    /// Connection timeout in seconds.
    pub connect_timeout: u64,

    /// Total request timeout in seconds.
    pub request_timeout: u64,

    /// Pretty-print the record JSON output.
    pub pretty: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: WEATHERLINK_BASE_URL.to_string(),
            connect_timeout: 30,
            request_timeout: 60,
            pretty: false,
        }
    }
}

impl Config {
    /// Load configuration from the default config file location.
    ///
    /// Returns default config if the file doesn't exist.
    /// Returns an error if the file exists but is malformed.
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) if path.exists() => {
                let content = fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read config file: {}", path.display()))?;
                toml::from_str(&content)
                    .with_context(|| format!("Invalid TOML in config file: {}", path.display()))
            }
            _ => Ok(Config::default()),
        }
    }

    /// Returns the path to the config file.
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("weatherlink-scraper/config.toml"))
    }

    /// Validate all configuration settings.
    pub fn validate(&self) -> Result<()> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            anyhow::bail!("base_url must start with http:// or https://");
        }
        if self.connect_timeout == 0 || self.request_timeout == 0 {
            anyhow::bail!("timeouts must be greater than zero");
        }
        Ok(())
    }

    /// The fetcher configuration derived from these settings.
    pub fn fetch_config(&self) -> FetchConfig {
        FetchConfig {
            base_url: self.base_url.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout),
            request_timeout: Duration::from_secs(self.request_timeout),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.base_url, WEATHERLINK_BASE_URL);
        assert_eq!(config.connect_timeout, 30);
        assert_eq!(config.request_timeout, 60);
        assert!(!config.pretty);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_minimal_toml() {
        let toml = r#"
            pretty = true
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert!(config.pretty);
        // Other fields should use defaults
        assert_eq!(config.base_url, WEATHERLINK_BASE_URL);
        assert_eq!(config.connect_timeout, 30);
    }

    #[test]
    fn test_parse_full_toml() {
        let toml = r#"
            base_url = "https://mirror.example.com"
            connect_timeout = 10
            request_timeout = 20
            pretty = true
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.base_url, "https://mirror.example.com");
        assert_eq!(config.connect_timeout, 10);
        assert_eq!(config.request_timeout, 20);
        assert!(config.pretty);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_base_url() {
        let config = Config {
            base_url: "ftp://example.com".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let config = Config {
            connect_timeout: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_fetch_config_conversion() {
        let config = Config {
            connect_timeout: 5,
            request_timeout: 15,
            ..Default::default()
        };
        let fetch = config.fetch_config();
        assert_eq!(fetch.base_url, WEATHERLINK_BASE_URL);
        assert_eq!(fetch.connect_timeout, Duration::from_secs(5));
        assert_eq!(fetch.request_timeout, Duration::from_secs(15));
    }
}
