//! Release checking for overlay-sync.
//!
//! Compares the running version against the latest GitHub release of the
//! configured repository. It respects the configured check frequency (daily,
//! weekly, monthly, or never) and a user-skipped version. This is a read-only
//! comparison: nothing is downloaded or replaced.

use crate::version::parse_lenient;
use chrono::{DateTime, Utc};
use overlay_sync_config::{UpdateCheckFrequency, UpdateConfig};
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Information about an available update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateInfo {
    /// The release version, without a leading `v`
    pub version: String,
    /// The version that is currently running
    pub current_version: String,
    /// Release notes/body from GitHub
    pub release_notes: Option<String>,
    /// URL to the release page
    pub release_url: String,
    /// When the release was published
    pub published_at: Option<String>,
    /// Download URL of the first release asset, if any
    pub download_url: Option<String>,
}

/// Result of an update check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateCheckResult {
    /// No update available - current version is latest
    UpToDate,
    /// A new version is available
    UpdateAvailable(UpdateInfo),
    /// Update check is disabled
    Disabled,
    /// Check was skipped (not enough time since last check)
    Skipped,
    /// Error occurred during check
    Error(String),
}

/// API URL of the latest release for `repository` (`owner/name`).
pub fn release_api_url(repository: &str) -> String {
    format!("https://api.github.com/repos/{}/releases/latest", repository)
}

/// Manages update checking with rate limiting
pub struct UpdateChecker {
    /// Current application version (passed in by the binary crate)
    current_version: &'static str,
    /// Last check result
    last_result: Arc<Mutex<Option<UpdateCheckResult>>>,
    /// Whether a check is currently in progress
    check_in_progress: Arc<AtomicBool>,
    /// Time of last check attempt (for rate limiting)
    last_check_time: Arc<Mutex<Option<Instant>>>,
    /// Minimum time between unforced checks
    min_check_interval: Duration,
    /// Per-request timeout
    timeout: Duration,
}

impl UpdateChecker {
    /// Create a new update checker.
    ///
    /// Pass `env!("CARGO_PKG_VERSION")` from the binary crate so the version
    /// resolves to the application's version rather than this crate's.
    pub fn new(current_version: &'static str) -> Self {
        Self {
            current_version,
            last_result: Arc::new(Mutex::new(None)),
            check_in_progress: Arc::new(AtomicBool::new(false)),
            last_check_time: Arc::new(Mutex::new(None)),
            min_check_interval: Duration::from_secs(3600),
            timeout: crate::http::DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Get the last check result
    pub fn last_result(&self) -> Option<UpdateCheckResult> {
        self.last_result.lock().clone()
    }

    /// Check if it's time to perform an update check based on config
    pub fn should_check(&self, config: &UpdateConfig) -> bool {
        let Some(check_interval_secs) = config.update_check_frequency.as_seconds() else {
            return false;
        };

        let Some(ref last_check_str) = config.last_update_check else {
            return true;
        };

        let Ok(last_check) = DateTime::parse_from_rfc3339(last_check_str) else {
            // Invalid timestamp, should check
            return true;
        };

        let elapsed = Utc::now().signed_duration_since(last_check.with_timezone(&Utc));
        elapsed.num_seconds() >= check_interval_secs as i64
    }

    fn is_rate_limited(&self) -> bool {
        let last_time = self.last_check_time.lock();
        if let Some(last) = *last_time {
            return last.elapsed() < self.min_check_interval;
        }
        false
    }

    /// Perform an update check (blocking)
    ///
    /// Returns the check result and whether the caller should persist a new
    /// `last_update_check` timestamp.
    pub fn check_now(&self, config: &UpdateConfig, force: bool) -> (UpdateCheckResult, bool) {
        if config.update_check_frequency == UpdateCheckFrequency::Never && !force {
            return (UpdateCheckResult::Disabled, false);
        }

        if !force && (!self.should_check(config) || self.is_rate_limited()) {
            return (UpdateCheckResult::Skipped, false);
        }

        // Prevent concurrent checks
        if self
            .check_in_progress
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return (UpdateCheckResult::Skipped, false);
        }

        *self.last_check_time.lock() = Some(Instant::now());

        let result = match fetch_latest_release(&config.repository, self.current_version, self.timeout) {
            Ok(release) => evaluate_release(self.current_version, release, config),
            Err(e) => UpdateCheckResult::Error(e),
        };

        *self.last_result.lock() = Some(result.clone());
        self.check_in_progress.store(false, Ordering::SeqCst);

        match &result {
            UpdateCheckResult::UpdateAvailable(info) => {
                log::info!(
                    "Update available: {} (current: {})",
                    info.version,
                    info.current_version
                );
            }
            UpdateCheckResult::UpToDate => log::info!("No updates available"),
            UpdateCheckResult::Error(e) => log::warn!("Update check failed: {}", e),
            _ => {}
        }

        let should_save = !matches!(result, UpdateCheckResult::Error(_));
        (result, should_save)
    }
}

/// Release data extracted from the GitHub API response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseInfo {
    /// `tag_name`, or `name` when the tag is missing
    pub tag: String,
    pub release_url: Option<String>,
    pub release_notes: Option<String>,
    pub published_at: Option<String>,
    pub download_url: Option<String>,
}

/// Fetch the latest release information from the GitHub API.
///
/// `app_version` goes into the `User-Agent` header.
pub fn fetch_latest_release(
    repository: &str,
    app_version: &str,
    timeout: Duration,
) -> Result<ReleaseInfo, String> {
    let url = release_api_url(repository);
    let user_agent = crate::http::user_agent(app_version);
    let json = crate::http::get_json(&url, &user_agent, timeout).map_err(|e| {
        format!(
            "Failed to fetch latest release info from GitHub: {}. \
             You can view the latest release at: https://github.com/{}/releases/latest",
            e, repository
        )
    })?;
    parse_release(&json)
}

/// Extract [`ReleaseInfo`] from a release JSON document.
pub fn parse_release(json: &Value) -> Result<ReleaseInfo, String> {
    let text = |key: &str| {
        json.get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    let tag = text("tag_name")
        .or_else(|| text("name"))
        .ok_or_else(|| "Could not find tag_name in release response".to_string())?;

    let download_url = json
        .get("assets")
        .and_then(Value::as_array)
        .and_then(|assets| assets.first())
        .and_then(|asset| asset.get("browser_download_url"))
        .and_then(Value::as_str)
        .map(str::to_string);

    Ok(ReleaseInfo {
        tag,
        release_url: text("html_url"),
        release_notes: text("body"),
        published_at: text("published_at"),
        download_url,
    })
}

/// Compare a fetched release against the running version.
pub fn evaluate_release(
    current_version: &str,
    release: ReleaseInfo,
    config: &UpdateConfig,
) -> UpdateCheckResult {
    let current = match parse_lenient(current_version) {
        Ok(v) => v,
        Err(e) => {
            return UpdateCheckResult::Error(format!("Failed to parse current version: {}", e));
        }
    };
    let latest = match parse_lenient(&release.tag) {
        Ok(v) => v,
        Err(e) => {
            return UpdateCheckResult::Error(format!("Failed to parse latest version: {}", e));
        }
    };

    if latest <= current {
        return UpdateCheckResult::UpToDate;
    }

    let version = release
        .tag
        .trim()
        .trim_start_matches(['v', 'V'])
        .to_string();

    if let Some(ref skipped) = config.skipped_version
        && (skipped == &version || skipped == &release.tag)
    {
        return UpdateCheckResult::UpToDate;
    }

    UpdateCheckResult::UpdateAvailable(UpdateInfo {
        release_url: release
            .release_url
            .unwrap_or_else(|| format!("https://github.com/{}/releases/latest", config.repository)),
        version,
        current_version: current_version.to_string(),
        release_notes: release.release_notes,
        published_at: release.published_at,
        download_url: release.download_url,
    })
}

/// Get the current timestamp in RFC 3339 format
pub fn current_timestamp() -> String {
    Utc::now().to_rfc3339()
}

/// Format a timestamp for display
pub fn format_timestamp(timestamp: &str) -> String {
    match DateTime::parse_from_rfc3339(timestamp) {
        Ok(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
        Err(_) => timestamp.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn release(tag: &str) -> ReleaseInfo {
        ReleaseInfo {
            tag: tag.to_string(),
            release_url: None,
            release_notes: Some("notes".to_string()),
            published_at: None,
            download_url: None,
        }
    }

    #[test]
    fn test_parse_release_full() {
        let doc = json!({
            "tag_name": "v2.4.0",
            "html_url": "https://github.com/o/r/releases/tag/v2.4.0",
            "body": "Release notes",
            "published_at": "2024-01-01T00:00:00Z",
            "assets": [
                {"browser_download_url": "https://github.com/o/r/releases/download/v2.4.0/a.zip"},
                {"browser_download_url": "https://github.com/o/r/releases/download/v2.4.0/b.zip"}
            ]
        });
        let info = parse_release(&doc).unwrap();
        assert_eq!(info.tag, "v2.4.0");
        assert_eq!(
            info.download_url.as_deref(),
            Some("https://github.com/o/r/releases/download/v2.4.0/a.zip")
        );
        assert_eq!(info.release_notes.as_deref(), Some("Release notes"));
    }

    #[test]
    fn test_parse_release_falls_back_to_name() {
        let info = parse_release(&json!({"tag_name": "", "name": "2.5.0"})).unwrap();
        assert_eq!(info.tag, "2.5.0");
        assert!(info.download_url.is_none());
    }

    #[test]
    fn test_parse_release_without_version_is_error() {
        assert!(parse_release(&json!({"body": "x"})).is_err());
    }

    #[test]
    fn test_evaluate_newer_release() {
        let config = UpdateConfig::default();
        match evaluate_release("2.3.0", release("v2.4.0"), &config) {
            UpdateCheckResult::UpdateAvailable(info) => {
                assert_eq!(info.version, "2.4.0");
                assert_eq!(info.current_version, "2.3.0");
                assert!(info.release_url.contains(&config.repository));
            }
            other => panic!("expected update, got {other:?}"),
        }
    }

    #[test]
    fn test_evaluate_same_or_older_release() {
        let config = UpdateConfig::default();
        assert_eq!(
            evaluate_release("2.3.0", release("2.3"), &config),
            UpdateCheckResult::UpToDate
        );
        assert_eq!(
            evaluate_release("2.3.0", release("v2.2.9"), &config),
            UpdateCheckResult::UpToDate
        );
    }

    #[test]
    fn test_evaluate_skipped_version() {
        let config = UpdateConfig {
            skipped_version: Some("2.4.0".to_string()),
            ..UpdateConfig::default()
        };
        assert_eq!(
            evaluate_release("2.3.0", release("v2.4.0"), &config),
            UpdateCheckResult::UpToDate
        );
    }

    #[test]
    fn test_evaluate_bad_tag_is_error() {
        let result = evaluate_release("2.3.0", release("nightly"), &UpdateConfig::default());
        assert!(matches!(result, UpdateCheckResult::Error(_)));
    }

    #[test]
    fn test_should_check_never() {
        let checker = UpdateChecker::new("0.0.0");
        let config = UpdateConfig {
            update_check_frequency: UpdateCheckFrequency::Never,
            ..UpdateConfig::default()
        };
        assert!(!checker.should_check(&config));
        assert_eq!(
            checker.check_now(&config, false),
            (UpdateCheckResult::Disabled, false)
        );
    }

    #[test]
    fn test_should_check_no_previous() {
        let checker = UpdateChecker::new("0.0.0");
        let config = UpdateConfig::default();
        assert!(checker.should_check(&config));
    }

    #[test]
    fn test_should_check_time_elapsed() {
        let checker = UpdateChecker::new("0.0.0");
        let mut config = UpdateConfig {
            update_check_frequency: UpdateCheckFrequency::Daily,
            ..UpdateConfig::default()
        };

        let two_days_ago = Utc::now() - chrono::Duration::days(2);
        config.last_update_check = Some(two_days_ago.to_rfc3339());
        assert!(checker.should_check(&config));

        let one_hour_ago = Utc::now() - chrono::Duration::hours(1);
        config.last_update_check = Some(one_hour_ago.to_rfc3339());
        assert!(!checker.should_check(&config));
        assert_eq!(
            checker.check_now(&config, false),
            (UpdateCheckResult::Skipped, false)
        );
    }

    #[test]
    fn test_release_api_url() {
        assert_eq!(
            release_api_url("o/r"),
            "https://api.github.com/repos/o/r/releases/latest"
        );
    }

    #[test]
    fn test_current_timestamp_format() {
        let ts = current_timestamp();
        assert!(DateTime::parse_from_rfc3339(&ts).is_ok());
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp("2024-01-01T09:30:00Z"), "2024-01-01 09:30");
        assert_eq!(format_timestamp("garbage"), "garbage");
    }
}
