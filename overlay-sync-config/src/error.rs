//! Typed error variants for the overlay-sync-config crate.
//!
//! [`ConfigError`] covers settings file I/O, while [`ValidationError`] is the
//! caller-facing error raised when an overlay style value is malformed.
//! Validation errors are always produced before any network activity.

use std::fmt;
use thiserror::Error;

/// Errors that can occur when loading or saving client settings.
///
/// `ClientSettings::load` and `ClientSettings::save` return `anyhow::Result`;
/// `ConfigError` values are coerced via the `From` impl that `anyhow`
/// provides for any `std::error::Error`, so callers can still downcast.
///
/// # Example
///
/// ```rust,no_run
/// use overlay_sync_config::ConfigError;
///
/// fn check_load_err(e: &anyhow::Error) {
///     if let Some(cfg_err) = e.downcast_ref::<ConfigError>() {
///         match cfg_err {
///             ConfigError::Io(io) => eprintln!("I/O error: {io}"),
///             ConfigError::Parse(p) => eprintln!("YAML parse error: {p}"),
///             ConfigError::Invalid(msg) => eprintln!("Invalid setting: {msg}"),
///         }
///     }
/// }
/// ```
#[derive(Debug)]
pub enum ConfigError {
    /// An I/O error occurred reading or writing the settings file.
    Io(std::io::Error),

    /// The settings file contained invalid YAML.
    Parse(serde_yaml_ng::Error),

    /// A setting value is out of range (e.g. zero retry attempts).
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "I/O error reading settings: {e}"),
            ConfigError::Parse(e) => write!(f, "YAML parse error in settings: {e}"),
            ConfigError::Invalid(msg) => write!(f, "Invalid setting: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_yaml_ng::Error> for ConfigError {
    fn from(e: serde_yaml_ng::Error) -> Self {
        ConfigError::Parse(e)
    }
}

/// A proposed overlay style value was rejected.
///
/// The caller must fix the input; these are never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Font size without a recognised CSS unit, or not a non-negative number.
    #[error("Invalid font size '{0}': expected a number followed by px, em, rem, % or pt (e.g. '64px')")]
    FontSize(String),

    /// Font weight outside the CSS keyword set and 100..=900 numeric range.
    #[error("Invalid font weight '{0}': expected normal, bold, lighter, bolder or 100-900")]
    FontWeight(String),

    /// A color field is not a recognised CSS color.
    #[error("Invalid color for '{field}': '{value}'")]
    Color {
        /// Name of the color field (`text`, `shadow`, `stroke`).
        field: String,
        /// The rejected value.
        value: String,
    },

    /// Animation duration without an `s` or `ms` unit.
    #[error("Invalid animation duration '{0}': expected e.g. '1s' or '500ms'")]
    Duration(String),

    /// The requested theme is not one of the built-in themes.
    #[error("Unknown theme '{0}'")]
    UnknownTheme(String),
}
