//! Persisted client settings.
//!
//! # Sub-modules
//!
//! - [`settings`]: [`ClientSettings`]: connection, cache and retry settings
//! - [`server`]: [`ServerConfig`]: how the overlay server process is launched
//! - [`update`]: [`UpdateConfig`]: release checking
//! - [`persistence`]: YAML load/save and path helpers

mod persistence;
mod server;
mod settings;
mod update;

pub use server::ServerConfig;
pub use settings::ClientSettings;
pub use update::UpdateConfig;
