//! Validated, cached and retrying style synchronization for a streaming
//! overlay server.
//!
//! - [`client`]: [`OverlayConfigClient`] and its delivery/caching machinery
//! - [`http`]: the `ureq` transport
//! - [`supervisor`]: start/stop/health of the overlay server process
//! - [`cli`]: the `overlay-sync` command line
//! - [`debug`]: `log` backend used by the binary
//!
//! Style types, validation and settings come from `overlay-sync-config`;
//! release checking from `overlay-sync-update`.

/// Application version (root crate version, for use by sub-crates).
/// Sub-crates should receive this via parameter rather than using
/// `env!("CARGO_PKG_VERSION")` which resolves to the sub-crate's version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod debug;

pub mod cli;
pub mod client;
pub mod http;
pub mod supervisor;

pub use client::{
    ClientError, DeliveryFailure, OverlayConfigClient, OverlayTransport, RetryPolicy,
    UpdateOutcome,
};
pub use supervisor::{ServerCommand, ServerSupervisor, SupervisorError};

pub use overlay_sync_config as config;
pub use overlay_sync_update as update;
