//! HTTP seam between the client and the overlay server.
//!
//! The client only needs two verbs and a status code, so the transport is a
//! small trait. [`crate::http::UreqTransport`] is the real implementation;
//! tests substitute a scripted one.

use thiserror::Error;

/// Status and body of a completed HTTP exchange (any status, including 4xx/5xx).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// An exchange that did not produce an HTTP status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The server could not be reached (refused, reset, unknown host).
    #[error("connection failed: {0}")]
    Connect(String),

    /// Anything else (TLS, protocol, malformed URL ...).
    #[error("{0}")]
    Other(String),
}

/// Blocking HTTP operations used by the overlay client.
///
/// Implementations apply their own per-request timeout and must return
/// non-2xx responses as `Ok(HttpReply)` rather than as errors.
pub trait OverlayTransport: Send + Sync {
    /// GET `url`.
    fn get(&self, url: &str) -> Result<HttpReply, TransportError>;

    /// POST `body` to `url` with `Content-Type: application/json`.
    fn post_json(&self, url: &str, body: &str) -> Result<HttpReply, TransportError>;
}
