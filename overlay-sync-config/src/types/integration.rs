use serde::{Deserialize, Serialize};

// ============================================================================
// Update Check Types
// ============================================================================

/// How often the release checker contacts GitHub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UpdateCheckFrequency {
    /// Never check for updates
    Never,
    /// Check once per day
    Daily,
    /// Check once per week (default)
    #[default]
    Weekly,
    /// Check once per month
    Monthly,
}

impl UpdateCheckFrequency {
    /// Get the duration in seconds for this frequency
    pub fn as_seconds(&self) -> Option<u64> {
        match self {
            UpdateCheckFrequency::Never => None,
            UpdateCheckFrequency::Daily => Some(24 * 60 * 60),
            UpdateCheckFrequency::Weekly => Some(7 * 24 * 60 * 60),
            UpdateCheckFrequency::Monthly => Some(30 * 24 * 60 * 60),
        }
    }

    /// Display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            UpdateCheckFrequency::Never => "Never",
            UpdateCheckFrequency::Daily => "Daily",
            UpdateCheckFrequency::Weekly => "Weekly",
            UpdateCheckFrequency::Monthly => "Monthly",
        }
    }
}
