//! Command-line interface for overlay-sync.
//!
//! This module defines the argument parser and maps each subcommand to a
//! process exit code. The subcommand implementations live in the
//! [`commands`] submodule.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Exit code for success (including "already applied" and "nothing to do").
pub const EXIT_OK: i32 = 0;
/// Exit code when the server did not confirm an update or could not be reached.
pub const EXIT_FAILURE: i32 = 1;
/// Exit code for a malformed style value or unknown theme.
pub const EXIT_INVALID: i32 = 2;

/// overlay-sync - Push style updates to a streaming overlay server
#[derive(Parser, Debug)]
#[command(name = "overlay-sync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Settings file (default: ~/.config/overlay-sync/config.yaml)
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Overlay server URL (overrides the settings file)
    #[arg(long, value_name = "URL", global = true)]
    pub server: Option<String>,

    /// Set log level (overrides settings and RUST_LOG)
    #[arg(long, value_enum, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevelArg>,
}

/// Log level argument for CLI
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum LogLevelArg {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevelArg {
    /// Convert to `log::LevelFilter`
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevelArg::Off => log::LevelFilter::Off,
            LogLevelArg::Error => log::LevelFilter::Error,
            LogLevelArg::Warn => log::LevelFilter::Warn,
            LogLevelArg::Info => log::LevelFilter::Info,
            LogLevelArg::Debug => log::LevelFilter::Debug,
            LogLevelArg::Trace => log::LevelFilter::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the server's current overlay configuration as JSON
    Get {
        /// Always ask the server, even if a configuration was fetched before
        #[arg(long)]
        fresh: bool,
    },

    /// Update the font
    Font {
        #[arg(long)]
        family: Option<String>,

        /// CSS size with unit, e.g. 64px, 2em, 120%
        #[arg(long)]
        size: Option<String>,

        /// normal, bold, lighter, bolder or 100..900
        #[arg(long)]
        weight: Option<String>,
    },

    /// Update text, shadow and stroke colors
    Colors {
        #[arg(long)]
        text: Option<String>,

        #[arg(long)]
        shadow: Option<String>,

        #[arg(long)]
        stroke: Option<String>,
    },

    /// Update the animation
    Animation {
        /// Duration in s or ms, e.g. 1s, 250ms
        #[arg(long)]
        duration: Option<String>,

        /// CSS easing function
        #[arg(long)]
        easing: Option<String>,
    },

    /// Update the layout
    Layout {
        #[arg(long = "padding-left")]
        padding_left: Option<String>,

        #[arg(long)]
        gap: Option<String>,
    },

    /// Apply a built-in theme
    Theme {
        /// Theme name (see `themes`)
        name: String,
    },

    /// List built-in themes
    Themes,

    /// Restore the server's default style
    Reset,

    /// Check whether the overlay server is answering
    Health,

    /// Start the overlay server and keep it running until it exits
    Serve,

    /// Check GitHub for a newer release
    CheckUpdate {
        /// Ignore the configured check frequency
        #[arg(short, long)]
        force: bool,
    },
}

/// Options extracted from global flags, applied before any subcommand runs.
#[derive(Clone, Debug, Default)]
pub struct RuntimeOptions {
    /// Settings file override
    pub config: Option<PathBuf>,
    /// Server URL override
    pub server: Option<String>,
    /// Log level override from CLI
    pub log_level: Option<log::LevelFilter>,
}

impl Cli {
    pub fn runtime_options(&self) -> RuntimeOptions {
        RuntimeOptions {
            config: self.config.clone(),
            server: self.server.clone(),
            log_level: self.log_level.map(|l| l.to_level_filter()),
        }
    }
}

/// Parse arguments, run the subcommand and return the process exit code.
pub fn process_cli() -> i32 {
    let cli = Cli::parse();
    let options = cli.runtime_options();

    crate::debug::init_log_bridge(options.log_level);

    match commands::run(cli.command, &options) {
        Ok(code) => code,
        Err(e) => {
            log::error!("{e:#}");
            eprintln!("overlay-sync: error: {e:#}");
            EXIT_FAILURE
        }
    }
}
