use crate::types::UpdateCheckFrequency;
use serde::{Deserialize, Serialize};

/// Configuration for release checking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateConfig {
    /// How often to check for new releases
    /// - never: Disable automatic update checks
    /// - daily: Check once per day
    /// - weekly: Check once per week (default)
    /// - monthly: Check once per month
    #[serde(default = "crate::defaults::update_check_frequency")]
    pub update_check_frequency: UpdateCheckFrequency,

    /// GitHub repository (`owner/name`) whose releases are checked
    #[serde(default = "crate::defaults::update_repository")]
    pub repository: String,

    /// RFC 3339 timestamp of the last update check (auto-managed)
    #[serde(default)]
    pub last_update_check: Option<String>,

    /// Version that user chose to skip notifications for
    #[serde(default)]
    pub skipped_version: Option<String>,
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            update_check_frequency: crate::defaults::update_check_frequency(),
            repository: crate::defaults::update_repository(),
            last_update_check: None,
            skipped_version: None,
        }
    }
}
