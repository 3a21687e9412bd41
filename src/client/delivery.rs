//! POST delivery with bounded retry and exponential backoff.
//!
//! Response handling:
//!
//! | Outcome                               | Action                          |
//! |---------------------------------------|---------------------------------|
//! | 200 + `{"success": true}`             | done                            |
//! | 200 + `success` missing or false      | `ServerRejected`, no retry      |
//! | 5xx                                   | retry                           |
//! | other status                          | `ClientStatus`, no retry        |
//! | timeout / connection failure          | retry                           |
//! | other transport error, bad JSON body  | `Unclassified`, no retry        |
//!
//! Backoff before attempt `n + 1` is `unit * 2^n`, and only happens when
//! another attempt follows.

use super::transport::{HttpReply, OverlayTransport, TransportError};
use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// How many times to attempt a delivery and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one. Always at least 1.
    pub max_attempts: u32,
    /// Base backoff; the wait after attempt `n` (0-based) is `unit * 2^n`.
    pub backoff_unit: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_unit: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff_unit: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff_unit,
        }
    }

    /// Wait before the attempt following `attempt` (0-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.backoff_unit.saturating_mul(factor)
    }

    /// Sum of all backoff sleeps when every attempt fails transiently.
    pub fn total_backoff(&self) -> Duration {
        (0..self.max_attempts.saturating_sub(1))
            .map(|attempt| self.delay_for(attempt))
            .fold(Duration::ZERO, Duration::saturating_add)
    }

    /// Worst-case wall time of one delivery with the given per-request timeout.
    pub fn worst_case(&self, timeout: Duration) -> Duration {
        timeout
            .saturating_mul(self.max_attempts)
            .saturating_add(self.total_backoff())
    }
}

/// Why the last attempt of an exhausted delivery failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransientCause {
    /// The server answered with a 5xx status.
    ServerStatus(u16),
    Timeout,
    Connect(String),
}

impl fmt::Display for TransientCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransientCause::ServerStatus(status) => write!(f, "HTTP {status}"),
            TransientCause::Timeout => f.write_str("timeout"),
            TransientCause::Connect(msg) => write!(f, "connection failed ({msg})"),
        }
    }
}

/// An update that was not confirmed applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryFailure {
    /// The server answered 200 but reported `success: false`.
    #[error("server rejected the update: {}", .error.as_deref().unwrap_or("no reason given"))]
    ServerRejected { error: Option<String> },

    /// A non-retryable HTTP status (4xx and other non-200, non-5xx codes).
    #[error("HTTP {0}")]
    ClientStatus(u16),

    /// Every attempt failed with a transient error.
    #[error("{last} after {attempts} attempts")]
    RetriesExhausted { attempts: u32, last: TransientCause },

    /// A failure that is neither transient nor an HTTP answer.
    #[error("delivery failed: {0}")]
    Unclassified(String),
}

/// Shape of the server's POST response. Extra fields (`config`) are ignored.
#[derive(Debug, Deserialize)]
struct UpdateResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    error: Option<String>,
}

fn interpret_ok_reply(reply: &HttpReply) -> Result<(), DeliveryFailure> {
    match serde_json::from_str::<UpdateResponse>(&reply.body) {
        Ok(UpdateResponse { success: true, .. }) => Ok(()),
        Ok(UpdateResponse { error, .. }) => {
            log::error!(
                "Server error: {}",
                error.as_deref().unwrap_or("no reason given")
            );
            Err(DeliveryFailure::ServerRejected { error })
        }
        Err(e) => {
            log::error!("Unreadable update response: {}", e);
            Err(DeliveryFailure::Unclassified(format!(
                "invalid response body: {e}"
            )))
        }
    }
}

/// POST `body` to `url`, retrying transient failures per `policy`.
///
/// `sleep` is called with each backoff delay; production code passes
/// `std::thread::sleep`.
pub(crate) fn deliver_with_retry(
    transport: &dyn OverlayTransport,
    url: &str,
    body: &str,
    policy: &RetryPolicy,
    sleep: &dyn Fn(Duration),
) -> Result<(), DeliveryFailure> {
    let attempts = policy.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        let cause = match transport.post_json(url, body) {
            Ok(reply) if reply.status == 200 => return interpret_ok_reply(&reply),
            Ok(reply) if reply.status >= 500 => TransientCause::ServerStatus(reply.status),
            Ok(reply) => {
                log::error!("HTTP {}", reply.status);
                return Err(DeliveryFailure::ClientStatus(reply.status));
            }
            Err(TransportError::Timeout) => TransientCause::Timeout,
            Err(TransportError::Connect(msg)) => TransientCause::Connect(msg),
            Err(TransportError::Other(msg)) => {
                log::error!("Error sending overlay config: {}", msg);
                return Err(DeliveryFailure::Unclassified(msg));
            }
        };

        if attempt + 1 >= attempts {
            log::error!("{} after {} attempts", cause, attempts);
            return Err(DeliveryFailure::RetriesExhausted {
                attempts,
                last: cause,
            });
        }

        let wait = policy.delay_for(attempt);
        log::warn!(
            "{}, retry {}/{} in {:?}",
            cause,
            attempt + 2,
            attempts,
            wait
        );
        sleep(wait);
        attempt += 1;
    }
}
