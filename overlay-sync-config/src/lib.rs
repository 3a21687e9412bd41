//! Style model and settings for the overlay-sync client.
//!
//! This crate provides the data types shared by the client, the CLI and the
//! release checker. It includes:
//!
//! - Overlay style sections (font, colors, animation, layout) and their
//!   partial-update types
//! - CSS value validation (colors, sizes, weights, durations)
//! - Built-in overlay themes
//! - Persisted client settings (server URL, timeouts, retry policy, update
//!   checking)

pub mod config;
pub mod defaults;
pub mod error;
pub mod themes;
mod types;
pub mod validation;

// Re-export main types for convenience
pub use config::{ClientSettings, ServerConfig, UpdateConfig};
pub use error::{ConfigError, ValidationError};
pub use themes::{OverlayTheme, builtin_theme, builtin_themes, default_theme};

pub use types::{
    AnimationUpdate, ColorsUpdate, FontUpdate, LayoutUpdate, OverlayConfig, OverlayUpdate,
    Section, SectionFields, UpdateCheckFrequency,
};
