use super::server::ServerConfig;
use super::update::UpdateConfig;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Settings for the overlay configuration client and its helpers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientSettings {
    /// Base URL of the overlay server (no trailing path).
    #[serde(default = "crate::defaults::server_url")]
    pub server_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "crate::defaults::request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Skip re-sending updates that were already delivered.
    #[serde(default = "crate::defaults::enable_cache")]
    pub enable_cache: bool,

    /// Maximum number of remembered update fingerprints.
    #[serde(default = "crate::defaults::cache_capacity")]
    pub cache_capacity: usize,

    /// Delivery attempts per update, including the first one.
    #[serde(default = "crate::defaults::max_attempts")]
    pub max_attempts: u32,

    /// Backoff unit in milliseconds (waits are 1x, 2x, 4x ... this value).
    #[serde(default = "crate::defaults::backoff_unit_ms")]
    pub backoff_unit_ms: u64,

    /// Log level: off, error, warn, info, debug or trace.
    #[serde(default = "crate::defaults::log_level")]
    pub log_level: String,

    /// Also append log lines to this file.
    #[serde(default)]
    pub log_file: Option<PathBuf>,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub updates: UpdateConfig,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            server_url: crate::defaults::server_url(),
            request_timeout_secs: crate::defaults::request_timeout_secs(),
            enable_cache: crate::defaults::enable_cache(),
            cache_capacity: crate::defaults::cache_capacity(),
            max_attempts: crate::defaults::max_attempts(),
            backoff_unit_ms: crate::defaults::backoff_unit_ms(),
            log_level: crate::defaults::log_level(),
            log_file: None,
            server: ServerConfig::default(),
            updates: UpdateConfig::default(),
        }
    }
}

impl ClientSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn backoff_unit(&self) -> Duration {
        Duration::from_millis(self.backoff_unit_ms)
    }

    /// Builder: point at a different server.
    pub fn with_server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = url.into();
        self
    }

    /// Check values that would make the client unusable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server_url.trim().is_empty() {
            return Err(ConfigError::Invalid("server_url must not be empty".into()));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_secs must be at least 1".into(),
            ));
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::Invalid("max_attempts must be at least 1".into()));
        }
        if self.max_attempts > 10 {
            // 2^9 backoff units is already several minutes.
            return Err(ConfigError::Invalid(format!(
                "max_attempts must be at most 10 (got {})",
                self.max_attempts
            )));
        }
        if self.enable_cache && self.cache_capacity == 0 {
            return Err(ConfigError::Invalid(
                "cache_capacity must be at least 1 when the cache is enabled".into(),
            ));
        }
        Ok(())
    }
}
