//! HTTP client helper with native-tls support.

use std::time::Duration;
use ureq::Agent;
use ureq::tls::{RootCerts, TlsConfig, TlsProvider};

/// Default timeout for release-check requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Maximum response body size for API responses (10 MB).
pub const MAX_API_RESPONSE_SIZE: u64 = 10 * 1024 * 1024;

/// User agent sent with every GitHub request (GitHub rejects requests without one).
///
/// `app_version` is the application's version, not this crate's.
pub fn user_agent(app_version: &str) -> String {
    format!("overlay-sync/{}", app_version)
}

/// Allowlisted hostnames for update-related network requests.
///
/// Only GitHub's API and web hosts are permitted.
const ALLOWED_HOSTS: &[&str] = &["github.com", "api.github.com"];

/// Validate that a URL is safe to use for release checks.
///
/// Enforces:
/// - HTTPS scheme only
/// - Host must be in the GitHub allowlist
pub fn validate_update_url(url: &str) -> Result<(), String> {
    let parsed = url::Url::parse(url).map_err(|e| format!("Invalid URL '{}': {}", url, e))?;

    match parsed.scheme() {
        "https" => {}
        scheme => {
            return Err(format!(
                "Insecure URL scheme '{}' rejected; only HTTPS is allowed. URL: {}",
                scheme, url
            ));
        }
    }

    let host = parsed.host_str().unwrap_or("");
    if !ALLOWED_HOSTS.contains(&host) {
        return Err(format!(
            "URL host '{}' is not in the allowed list for update checks. \
             Allowed hosts: {}. URL: {}",
            host,
            ALLOWED_HOSTS.join(", "),
            url
        ));
    }

    Ok(())
}

/// Create a new HTTP agent configured with native-tls and a global timeout.
///
/// Non-2xx statuses are returned as errors (ureq's default), which is what
/// the release checker wants: anything but 200 means "no information".
pub fn agent(timeout: Duration) -> Agent {
    let tls_config = TlsConfig::builder()
        .provider(TlsProvider::NativeTls)
        .root_certs(RootCerts::PlatformVerifier)
        .build();

    Agent::config_builder()
        .tls_config(tls_config)
        .timeout_global(Some(timeout))
        .build()
        .into()
}

/// GET `url` and parse the body as JSON.
///
/// The URL is checked against the allowlist before any request is made and
/// the body is capped at [`MAX_API_RESPONSE_SIZE`].
pub fn get_json(
    url: &str,
    user_agent: &str,
    timeout: Duration,
) -> Result<serde_json::Value, String> {
    validate_update_url(url)?;

    let body = agent(timeout)
        .get(url)
        .header("User-Agent", user_agent)
        .header("Accept", "application/vnd.github+json")
        .call()
        .map_err(|e| format!("Request to '{}' failed: {}", url, e))?
        .into_body()
        .with_config()
        .limit(MAX_API_RESPONSE_SIZE)
        .read_to_string()
        .map_err(|e| format!("Failed to read response body: {}", e))?;

    serde_json::from_str(&body).map_err(|e| format!("Failed to parse JSON: {}", e))
}
