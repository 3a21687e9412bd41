//! Subcommand implementations.
//!
//! Each handler prints a short human-readable result to stdout and returns
//! the exit code. Errors that prevent a handler from running at all (bad
//! settings file, invalid server URL, spawn failure) are returned as
//! `anyhow::Error`.

use super::{Commands, EXIT_FAILURE, EXIT_INVALID, EXIT_OK, RuntimeOptions};
use crate::client::{OverlayConfigClient, UpdateOutcome};
use crate::supervisor::ServerSupervisor;
use anyhow::{Context, Result};
use overlay_sync_config::{
    AnimationUpdate, ClientSettings, ColorsUpdate, FontUpdate, LayoutUpdate, ValidationError,
    builtin_themes,
};
use overlay_sync_update::update_checker::{
    UpdateCheckResult, UpdateChecker, current_timestamp, format_timestamp,
};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Interval between health probes while `serve` waits for the server.
const HEALTH_POLL: Duration = Duration::from_millis(500);

/// Effective settings plus the file they came from.
struct Session {
    settings: ClientSettings,
    path: PathBuf,
}

impl Session {
    fn load(options: &RuntimeOptions) -> Result<Self> {
        let path = options
            .config
            .clone()
            .unwrap_or_else(ClientSettings::config_path);
        let mut settings = ClientSettings::load_from(&path)
            .with_context(|| format!("loading settings from {}", path.display()))?;

        if let Some(server) = &options.server {
            settings.server_url = server.clone();
        }

        crate::debug::apply_settings_level(options.log_level, &settings.log_level);
        if let Some(log_file) = &settings.log_file
            && let Err(e) = crate::debug::attach_log_file(log_file)
        {
            log::warn!("Cannot open log file {}: {}", log_file.display(), e);
        }

        Ok(Self { settings, path })
    }

    fn client(&self) -> Result<OverlayConfigClient> {
        OverlayConfigClient::from_settings(&self.settings).context("creating overlay client")
    }

    /// Record the update check time in the settings file. Re-reads the file
    /// so CLI overrides such as `--server` are not persisted.
    fn save_last_check(&self, timestamp: String) -> Result<()> {
        let mut on_disk = ClientSettings::load_from(&self.path)?;
        on_disk.updates.last_update_check = Some(timestamp);
        on_disk.save_to(&self.path)
    }
}

/// Run one subcommand.
pub fn run(command: Commands, options: &RuntimeOptions) -> Result<i32> {
    // Listing themes needs neither settings nor a server.
    if matches!(command, Commands::Themes) {
        return Ok(list_themes());
    }

    let session = Session::load(options)?;

    match command {
        Commands::Get { fresh } => get(&session.client()?, fresh),
        Commands::Font {
            family,
            size,
            weight,
        } => {
            let update = FontUpdate {
                family,
                size,
                weight,
                ..FontUpdate::default()
            };
            Ok(report(session.client()?.update_font(update)))
        }
        Commands::Colors {
            text,
            shadow,
            stroke,
        } => {
            let update = ColorsUpdate {
                text,
                shadow,
                stroke,
                ..ColorsUpdate::default()
            };
            Ok(report(session.client()?.update_colors(update)))
        }
        Commands::Animation { duration, easing } => {
            let update = AnimationUpdate {
                duration,
                easing,
                ..AnimationUpdate::default()
            };
            Ok(report(session.client()?.update_animation(update)))
        }
        Commands::Layout { padding_left, gap } => {
            let update = LayoutUpdate {
                padding_left,
                gap,
                ..LayoutUpdate::default()
            };
            Ok(report(session.client()?.update_layout(update)))
        }
        Commands::Theme { name } => Ok(report(session.client()?.apply_theme(&name))),
        Commands::Reset => Ok(report(Ok(session.client()?.reset_to_defaults()))),
        Commands::Health => Ok(health(&session.client()?)),
        Commands::Serve => serve(&session.settings),
        Commands::CheckUpdate { force } => check_update(&session, force),
        Commands::Themes => Ok(list_themes()),
    }
}

/// Print an update outcome and map it to an exit code.
pub(crate) fn report(result: Result<UpdateOutcome, ValidationError>) -> i32 {
    match result {
        Ok(UpdateOutcome::Failed(failure)) => {
            eprintln!("overlay-sync: update failed: {failure}");
            EXIT_FAILURE
        }
        Ok(outcome) => {
            println!("{outcome}");
            EXIT_OK
        }
        Err(e) => {
            eprintln!("overlay-sync: {e}");
            EXIT_INVALID
        }
    }
}

fn get(client: &OverlayConfigClient, fresh: bool) -> Result<i32> {
    match client.get_config(!fresh) {
        Some(config) => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(EXIT_OK)
        }
        None => {
            eprintln!(
                "overlay-sync: could not fetch the overlay configuration from {}",
                client.base_url()
            );
            Ok(EXIT_FAILURE)
        }
    }
}

fn list_themes() -> i32 {
    for theme in builtin_themes() {
        println!("{:<10} {}", theme.name, theme.description);
    }
    EXIT_OK
}

fn health(client: &OverlayConfigClient) -> i32 {
    if client.is_server_healthy() {
        println!("{} is healthy", client.base_url());
        EXIT_OK
    } else {
        println!("{} is not responding", client.base_url());
        EXIT_FAILURE
    }
}

fn serve(settings: &ClientSettings) -> Result<i32> {
    let mut supervisor = ServerSupervisor::from_config(&settings.server, &settings.server_url);
    supervisor.start()?;

    if supervisor.wait_until_healthy(settings.server.health_timeout(), HEALTH_POLL) {
        println!("Overlay server ready at {}", settings.server_url);
    } else {
        eprintln!(
            "overlay-sync: server started but {} is not answering yet",
            settings.server_url
        );
    }

    match supervisor.wait()? {
        Some(status) if status.success() => Ok(EXIT_OK),
        Some(status) => {
            eprintln!("overlay-sync: overlay server exited ({status})");
            Ok(EXIT_FAILURE)
        }
        None => Ok(EXIT_OK),
    }
}

fn check_update(session: &Session, force: bool) -> Result<i32> {
    let checker = UpdateChecker::new(crate::VERSION);
    let (result, should_save) = checker.check_now(&session.settings.updates, force);

    if should_save
        && let Err(e) = session.save_last_check(current_timestamp())
    {
        log::warn!("Failed to record update check time: {e:#}");
    }

    Ok(describe_update(&result, &session.path))
}

fn describe_update(result: &UpdateCheckResult, settings_path: &Path) -> i32 {
    match result {
        UpdateCheckResult::UpToDate => {
            println!("overlay-sync {} is up to date", crate::VERSION);
            EXIT_OK
        }
        UpdateCheckResult::UpdateAvailable(info) => {
            println!(
                "Update available: {} (current: {})",
                info.version, info.current_version
            );
            println!("  {}", info.release_url);
            if let Some(published) = &info.published_at {
                println!("  published: {}", format_timestamp(published));
            }
            if let Some(url) = &info.download_url {
                println!("  download: {url}");
            }
            EXIT_OK
        }
        UpdateCheckResult::Disabled => {
            println!(
                "Update checks are disabled in {} (use --force)",
                settings_path.display()
            );
            EXIT_OK
        }
        UpdateCheckResult::Skipped => {
            println!("Checked recently; use --force to check again");
            EXIT_OK
        }
        UpdateCheckResult::Error(e) => {
            eprintln!("overlay-sync: update check failed: {e}");
            EXIT_FAILURE
        }
    }
}
