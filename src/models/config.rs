//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Upstream feed settings
    #[serde(default)]
    pub feed: FeedConfig,

    /// Durable store settings
    #[serde(default)]
    pub store: StoreConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.feed.url.trim().is_empty() {
            return Err(AppError::validation("feed.url is empty"));
        }
        if self.feed.user_agent.trim().is_empty() {
            return Err(AppError::validation("feed.user_agent is empty"));
        }
        if self.feed.timeout_secs == 0 {
            return Err(AppError::validation("feed.timeout_secs must be > 0"));
        }
        if self.store.database_path.trim().is_empty() {
            return Err(AppError::validation("store.database_path is empty"));
        }
        Ok(())
    }
}

/// Upstream feed settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Feed endpoint URL
    #[serde(default = "defaults::feed_url")]
    pub url: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: defaults::feed_url(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Durable store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path to the SQLite database file
    #[serde(default = "defaults::database_path")]
    pub database_path: String,

    /// SQLite busy timeout in milliseconds
    #[serde(default = "defaults::busy_timeout")]
    pub busy_timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_path: defaults::database_path(),
            busy_timeout_ms: defaults::busy_timeout(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default log level filter
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

mod defaults {
    // Feed defaults
    pub fn feed_url() -> String {
        // Must be set in config; validate() rejects the empty default.
        String::new()
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; tops-ingest/0.1)".into()
    }
    pub fn timeout() -> u64 {
        10
    }

    // Store defaults
    pub fn database_path() -> String {
        "data/incidents.db".into()
    }
    pub fn busy_timeout() -> u64 {
        5000
    }

    // Logging defaults
    pub fn log_level() -> String {
        "info".into()
    }
}
