//! Errors raised while constructing an [`OverlayConfigClient`](super::OverlayConfigClient).

use overlay_sync_config::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The base URL cannot address an HTTP server.
    #[error("invalid server URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("request timeout must be greater than zero")]
    InvalidTimeout,

    #[error("cache capacity must be greater than zero")]
    InvalidCacheCapacity,

    /// Persisted settings were rejected.
    #[error(transparent)]
    Settings(#[from] ConfigError),
}
