//! Release checking for the overlay-sync toolkit.
//!
//! Provides:
//! - `http`: hardened `ureq` agent construction and update-URL allowlisting
//! - `version`: lenient `major.minor.patch` parsing and comparison
//! - `update_checker`: GitHub release polling with configurable frequency

pub mod http;
pub mod update_checker;
pub mod version;
