//! Default value functions for settings.
//!
//! Used as `#[serde(default = "crate::defaults::...")]` attributes on
//! `ClientSettings` fields and by the `Default` impls.

use crate::types::UpdateCheckFrequency;

// ── Overlay server connection ──────────────────────────────────────────────

pub fn server_url() -> String {
    "http://localhost:8082".to_string()
}

pub fn request_timeout_secs() -> u64 {
    5
}

pub fn enable_cache() -> bool {
    true
}

pub fn cache_capacity() -> usize {
    256
}

// ── Delivery retry policy ──────────────────────────────────────────────────

pub fn max_attempts() -> u32 {
    3
}

/// Backoff unit: waits are 1x, 2x, 4x ... this value.
pub fn backoff_unit_ms() -> u64 {
    1000
}

// ── Logging ────────────────────────────────────────────────────────────────

pub fn log_level() -> String {
    "info".to_string()
}

// ── Supervised server process ──────────────────────────────────────────────

pub fn server_program() -> String {
    "node".to_string()
}

pub fn server_args() -> Vec<String> {
    vec!["server.js".to_string()]
}

pub fn startup_grace_ms() -> u64 {
    3000
}

pub fn health_timeout_secs() -> u64 {
    30
}

pub fn stop_timeout_secs() -> u64 {
    5
}

// ── Update checking ────────────────────────────────────────────────────────

pub fn update_check_frequency() -> UpdateCheckFrequency {
    UpdateCheckFrequency::Weekly
}

pub fn update_repository() -> String {
    "Bl0uD/AutoSubGoalTwitch".to_string()
}
