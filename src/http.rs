//! `ureq` implementation of [`OverlayTransport`].
//!
//! Uses native-tls (system TLS library) so `https://` server URLs work the
//! same way the release checker's requests do.

use crate::client::{HttpReply, OverlayTransport, TransportError};
use std::io;
use std::time::Duration;
use ureq::Agent;
use ureq::tls::{RootCerts, TlsConfig, TlsProvider};

/// Largest response body read from the overlay server (1 MB).
pub const MAX_RESPONSE_SIZE: u64 = 1024 * 1024;

/// Create an agent with native-tls and a global per-request timeout.
///
/// HTTP error statuses are returned as responses, not errors; the client
/// decides which statuses to retry.
pub fn agent(timeout: Duration) -> Agent {
    let tls_config = TlsConfig::builder()
        .provider(TlsProvider::NativeTls)
        .root_certs(RootCerts::PlatformVerifier)
        .build();

    Agent::config_builder()
        .tls_config(tls_config)
        .timeout_global(Some(timeout))
        .http_status_as_error(false)
        .build()
        .into()
}

/// Blocking transport backed by a shared `ureq` agent.
pub struct UreqTransport {
    agent: Agent,
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        Self {
            agent: agent(timeout),
        }
    }
}

impl OverlayTransport for UreqTransport {
    fn get(&self, url: &str) -> Result<HttpReply, TransportError> {
        let response = self.agent.get(url).call().map_err(classify)?;
        read_reply(response)
    }

    fn post_json(&self, url: &str, body: &str) -> Result<HttpReply, TransportError> {
        let response = self
            .agent
            .post(url)
            .header("Content-Type", "application/json")
            .send(body)
            .map_err(classify)?;
        read_reply(response)
    }
}

fn read_reply(response: ureq::http::Response<ureq::Body>) -> Result<HttpReply, TransportError> {
    let status = response.status().as_u16();
    let body = response
        .into_body()
        .with_config()
        .limit(MAX_RESPONSE_SIZE)
        .read_to_string()
        .map_err(classify)?;
    Ok(HttpReply { status, body })
}

/// Sort a `ureq` error into the buckets the retry policy cares about.
pub(crate) fn classify(err: ureq::Error) -> TransportError {
    match err {
        ureq::Error::Timeout(_) => TransportError::Timeout,
        ureq::Error::HostNotFound | ureq::Error::ConnectionFailed => {
            TransportError::Connect(err.to_string())
        }
        ureq::Error::Io(e) => classify_io(e),
        other => TransportError::Other(other.to_string()),
    }
}

fn classify_io(err: io::Error) -> TransportError {
    match err.kind() {
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TransportError::Timeout,
        io::ErrorKind::ConnectionRefused
        | io::ErrorKind::ConnectionReset
        | io::ErrorKind::ConnectionAborted
        | io::ErrorKind::NotConnected
        | io::ErrorKind::AddrNotAvailable
        | io::ErrorKind::HostUnreachable
        | io::ErrorKind::NetworkUnreachable => TransportError::Connect(err.to_string()),
        _ => TransportError::Other(err.to_string()),
    }
}
