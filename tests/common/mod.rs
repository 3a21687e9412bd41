//! Shared integration test helpers for overlay-sync.
//!
//! # Usage
//!
//! ```ignore
//! mod common;
//! use common::{ScriptedTransport, client_with};
//! ```
//!
//! The `#[allow(dead_code)]` attribute suppresses warnings when only a
//! subset of helpers are used per file.

#![allow(dead_code)]

use overlay_sync::client::{
    HttpReply, OverlayConfigClient, OverlayTransport, RetryPolicy, TransportError,
};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

pub const BASE_URL: &str = "http://overlay.test:8082";

/// One request seen by a [`ScriptedTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recorded {
    pub method: &'static str,
    pub url: String,
    pub body: Option<String>,
}

impl Recorded {
    /// POST body parsed as JSON.
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(self.body.as_deref().unwrap_or("null"))
            .expect("recorded body is JSON")
    }
}

/// Transport that replays queued replies and records every request.
///
/// When a queue runs dry, GET answers 404 and POST answers
/// `{"success": true}`.
#[derive(Default)]
pub struct ScriptedTransport {
    gets: Mutex<VecDeque<Result<HttpReply, TransportError>>>,
    posts: Mutex<VecDeque<Result<HttpReply, TransportError>>>,
    requests: Mutex<Vec<Recorded>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_get(&self, reply: Result<HttpReply, TransportError>) {
        self.gets.lock().push_back(reply);
    }

    pub fn push_post(&self, reply: Result<HttpReply, TransportError>) {
        self.posts.lock().push_back(reply);
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().clone()
    }

    pub fn posts(&self) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == "POST")
            .collect()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }
}

impl OverlayTransport for ScriptedTransport {
    fn get(&self, url: &str) -> Result<HttpReply, TransportError> {
        self.requests.lock().push(Recorded {
            method: "GET",
            url: url.to_string(),
            body: None,
        });
        self.gets
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(HttpReply::new(404, "")))
    }

    fn post_json(&self, url: &str, body: &str) -> Result<HttpReply, TransportError> {
        self.requests.lock().push(Recorded {
            method: "POST",
            url: url.to_string(),
            body: Some(body.to_string()),
        });
        self.posts
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(success()))
    }
}

pub fn success() -> HttpReply {
    HttpReply::new(200, r#"{"success": true, "config": {}}"#)
}

pub fn status(code: u16) -> Result<HttpReply, TransportError> {
    Ok(HttpReply::new(code, ""))
}

/// Records every backoff delay instead of sleeping.
#[derive(Clone, Default)]
pub struct SleepLog(Arc<Mutex<Vec<Duration>>>);

impl SleepLog {
    pub fn delays(&self) -> Vec<Duration> {
        self.0.lock().clone()
    }
}

/// Client over `transport` with caching on, default retry policy and a
/// recording sleeper.
pub fn client_with(transport: &Arc<ScriptedTransport>) -> (OverlayConfigClient, SleepLog) {
    client_with_options(transport, true, RetryPolicy::default())
}

pub fn client_with_options(
    transport: &Arc<ScriptedTransport>,
    enable_cache: bool,
    retry: RetryPolicy,
) -> (OverlayConfigClient, SleepLog) {
    let sleeps = SleepLog::default();
    let recorder = sleeps.clone();
    let client = OverlayConfigClient::builder(BASE_URL)
        .enable_cache(enable_cache)
        .retry_policy(retry)
        .transport(transport.clone())
        .sleeper(move |d| recorder.0.lock().push(d))
        .build()
        .expect("client builds");
    (client, sleeps)
}
