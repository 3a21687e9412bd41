//! Overlay server process management.
//!
//! [`ServerSupervisor`] owns the Node.js overlay server child process:
//! start it, give it a startup grace period, poll its health endpoint and
//! stop it. Dropping the supervisor stops the child.

use crate::client::{HttpReply, OverlayTransport};
use crate::http::UreqTransport;
use overlay_sync_config::ServerConfig;
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Timeout of a single health probe.
const HEALTH_PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// How often `stop` checks whether the child has exited after SIGTERM.
const STOP_POLL: Duration = Duration::from_millis(50);

#[derive(Debug, Error)]
pub enum SupervisorError {
    #[error("overlay server is already running (pid {0})")]
    AlreadyRunning(u32),

    /// Something not owned by this supervisor already serves the health URL.
    #[error("a server is already answering at {0}")]
    AlreadyServing(String),

    #[error("failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The child exited during the startup grace period.
    #[error("overlay server exited during startup ({0})")]
    ExitedEarly(ExitStatus),

    #[error("failed to wait for overlay server: {0}")]
    Wait(#[source] std::io::Error),
}

/// Program, arguments and working directory of the overlay server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerCommand {
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: Option<PathBuf>,
}

impl ServerCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }
}

impl Default for ServerCommand {
    /// `node server.js` in the current directory.
    fn default() -> Self {
        Self::new("node").arg("server.js")
    }
}

impl From<&ServerConfig> for ServerCommand {
    fn from(config: &ServerConfig) -> Self {
        Self {
            program: config.program.clone(),
            args: config.args.clone(),
            working_dir: config.directory.clone(),
        }
    }
}

/// Runs the overlay server as a child process.
pub struct ServerSupervisor {
    command: ServerCommand,
    health_url: String,
    startup_grace: Duration,
    stop_timeout: Duration,
    transport: Arc<dyn OverlayTransport>,
    child: Option<Child>,
}

impl ServerSupervisor {
    /// Supervisor for `command`, probing `<base_url>/` for health.
    pub fn new(command: ServerCommand, base_url: &str) -> Self {
        Self {
            command,
            health_url: format!("{}/", base_url.trim_end_matches('/')),
            startup_grace: Duration::from_millis(overlay_sync_config::defaults::startup_grace_ms()),
            stop_timeout: Duration::from_secs(overlay_sync_config::defaults::stop_timeout_secs()),
            transport: Arc::new(UreqTransport::new(HEALTH_PROBE_TIMEOUT)),
            child: None,
        }
    }

    /// Supervisor configured from the `server` settings block.
    pub fn from_config(config: &ServerConfig, base_url: &str) -> Self {
        Self::new(ServerCommand::from(config), base_url)
            .with_startup_grace(config.startup_grace())
            .with_stop_timeout(config.stop_timeout())
    }

    pub fn with_startup_grace(mut self, grace: Duration) -> Self {
        self.startup_grace = grace;
        self
    }

    /// How long `stop` waits after SIGTERM before killing the child.
    pub fn with_stop_timeout(mut self, timeout: Duration) -> Self {
        self.stop_timeout = timeout;
        self
    }

    /// Probe health through `transport` instead of a fresh `ureq` agent.
    pub fn with_transport(mut self, transport: Arc<dyn OverlayTransport>) -> Self {
        self.transport = transport;
        self
    }

    pub fn command(&self) -> &ServerCommand {
        &self.command
    }

    /// PID of the running child, if any.
    pub fn pid(&self) -> Option<u32> {
        self.child.as_ref().map(Child::id)
    }

    /// Spawn the server and wait out the startup grace period.
    pub fn start(&mut self) -> Result<(), SupervisorError> {
        if self.is_running() {
            let pid = self.pid().unwrap_or_default();
            log::warn!("Overlay server already running (pid {})", pid);
            return Err(SupervisorError::AlreadyRunning(pid));
        }
        if self.is_healthy() {
            log::warn!(
                "Refusing to start: a server already answers at {}",
                self.health_url
            );
            return Err(SupervisorError::AlreadyServing(self.health_url.clone()));
        }

        let mut cmd = Command::new(&self.command.program);
        cmd.args(&self.command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::inherit());
        if let Some(dir) = &self.command.working_dir {
            cmd.current_dir(dir);
        }

        log::info!(
            "Starting overlay server: {} {}",
            self.command.program,
            self.command.args.join(" ")
        );
        let child = cmd.spawn().map_err(|source| SupervisorError::Spawn {
            program: self.command.program.clone(),
            source,
        })?;
        let pid = child.id();
        self.child = Some(child);

        std::thread::sleep(self.startup_grace);

        if let Some(child) = self.child.as_mut()
            && let Some(status) = child.try_wait().map_err(SupervisorError::Wait)?
        {
            self.child = None;
            log::error!("Overlay server exited during startup: {}", status);
            return Err(SupervisorError::ExitedEarly(status));
        }

        log::info!("Overlay server started (pid {})", pid);
        Ok(())
    }

    /// Ask the server to shut down, kill it if it has not exited within the
    /// stop timeout, and reap it.
    ///
    /// On Unix the request is SIGTERM so the server's shutdown handler runs.
    /// Elsewhere the child is killed straight away. Returns the exit status,
    /// or `None` when nothing was running.
    pub fn stop(&mut self) -> Option<ExitStatus> {
        let mut child = self.child.take()?;
        let pid = child.id();

        if request_shutdown(&child) {
            let deadline = Instant::now() + self.stop_timeout;
            loop {
                match child.try_wait() {
                    Ok(Some(status)) => {
                        log::info!("Overlay server stopped (pid {}): {}", pid, status);
                        return Some(status);
                    }
                    Ok(None) if Instant::now() < deadline => std::thread::sleep(STOP_POLL),
                    Ok(None) => {
                        log::warn!(
                            "Overlay server (pid {}) ignored SIGTERM for {:?}, killing",
                            pid,
                            self.stop_timeout
                        );
                        break;
                    }
                    Err(e) => {
                        log::warn!("Failed to poll overlay server (pid {}): {}", pid, e);
                        break;
                    }
                }
            }
        }

        let _ = child.kill();
        let status = child.wait().ok();
        log::info!("Overlay server killed (pid {})", pid);
        status
    }

    /// Whether the child is still alive. Never blocks.
    pub fn is_running(&mut self) -> bool {
        match self.child.as_mut() {
            Some(child) => match child.try_wait() {
                Ok(Some(_status)) => false,
                Ok(None) => true,
                Err(_) => false,
            },
            None => false,
        }
    }

    /// Whether the server answers `GET /` with 200.
    pub fn is_healthy(&self) -> bool {
        matches!(
            self.transport.get(&self.health_url),
            Ok(HttpReply { status: 200, .. })
        )
    }

    /// Poll [`is_healthy`](Self::is_healthy) every `poll` until it succeeds
    /// or `deadline` has elapsed.
    pub fn wait_until_healthy(&self, deadline: Duration, poll: Duration) -> bool {
        let start = Instant::now();
        loop {
            if self.is_healthy() {
                log::info!("Overlay server healthy after {:?}", start.elapsed());
                return true;
            }
            if start.elapsed() + poll > deadline {
                log::warn!("Overlay server not healthy after {:?}", deadline);
                return false;
            }
            std::thread::sleep(poll);
        }
    }

    /// Block until the child exits on its own.
    pub fn wait(&mut self) -> Result<Option<ExitStatus>, SupervisorError> {
        match self.child.take() {
            Some(mut child) => child.wait().map(Some).map_err(SupervisorError::Wait),
            None => Ok(None),
        }
    }
}

/// Send SIGTERM to `child`. Returns whether the signal was delivered.
#[cfg(unix)]
fn request_shutdown(child: &Child) -> bool {
    let Ok(pid) = libc::pid_t::try_from(child.id()) else {
        return false;
    };
    // SAFETY: `pid` belongs to a child we have not reaped yet, so it cannot
    // have been recycled for another process.
    unsafe { libc::kill(pid, libc::SIGTERM) == 0 }
}

#[cfg(not(unix))]
fn request_shutdown(_child: &Child) -> bool {
    false
}

impl Drop for ServerSupervisor {
    fn drop(&mut self) {
        self.stop();
    }
}
