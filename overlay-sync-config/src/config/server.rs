use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// How the overlay server process is launched and probed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Working directory of the server (where `server.js` lives).
    /// Defaults to the current directory when unset.
    #[serde(default)]
    pub directory: Option<PathBuf>,

    /// Executable used to run the server.
    #[serde(default = "crate::defaults::server_program")]
    pub program: String,

    /// Arguments passed to `program`.
    #[serde(default = "crate::defaults::server_args")]
    pub args: Vec<String>,

    /// How long to wait after spawning before checking the process survived.
    #[serde(default = "crate::defaults::startup_grace_ms")]
    pub startup_grace_ms: u64,

    /// Upper bound when waiting for the health endpoint to answer.
    #[serde(default = "crate::defaults::health_timeout_secs")]
    pub health_timeout_secs: u64,

    /// How long `stop` waits for the server to exit after SIGTERM before
    /// killing it.
    #[serde(default = "crate::defaults::stop_timeout_secs")]
    pub stop_timeout_secs: u64,
}

impl ServerConfig {
    pub fn startup_grace(&self) -> Duration {
        Duration::from_millis(self.startup_grace_ms)
    }

    pub fn health_timeout(&self) -> Duration {
        Duration::from_secs(self.health_timeout_secs)
    }

    pub fn stop_timeout(&self) -> Duration {
        Duration::from_secs(self.stop_timeout_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            directory: None,
            program: crate::defaults::server_program(),
            args: crate::defaults::server_args(),
            startup_grace_ms: crate::defaults::startup_grace_ms(),
            health_timeout_secs: crate::defaults::health_timeout_secs(),
            stop_timeout_secs: crate::defaults::stop_timeout_secs(),
        }
    }
}
