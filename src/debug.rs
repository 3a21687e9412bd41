//! `log` facade backend for the overlay-sync binary.
//!
//! Every `log::info!()` etc. is written as a timestamped line to stderr and,
//! when a log file is attached, appended to that file as well.
//!
//! Level precedence: `--log-level` flag, then `RUST_LOG` (a plain level name
//! such as `debug`), then the `log_level` setting.

use log::{LevelFilter, Log, Metadata, Record};
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

struct LogBridge {
    file: Mutex<Option<File>>,
}

static BRIDGE: LogBridge = LogBridge {
    file: parking_lot::const_mutex(None),
};

impl LogBridge {
    fn write_raw(&self, msg: &str) {
        if let Some(file) = self.file.lock().as_mut() {
            let _ = file.write_all(msg.as_bytes());
        }
    }
}

impl Log for LogBridge {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!(
            "[{}] [{:<5}] [{}] {}\n",
            get_timestamp(),
            record.level(),
            record.target(),
            record.args()
        );
        eprint!("{line}");
        self.write_raw(&line);
    }

    fn flush(&self) {
        if let Some(file) = self.file.lock().as_mut() {
            let _ = file.flush();
        }
    }
}

fn get_timestamp() -> String {
    chrono::Local::now()
        .format("%Y-%m-%d %H:%M:%S%.3f")
        .to_string()
}

/// Parse a level name (`off`, `error`, `warn`, `info`, `debug`, `trace`).
pub fn parse_level(name: &str) -> Option<LevelFilter> {
    LevelFilter::from_str(name.trim()).ok()
}

fn env_level() -> Option<LevelFilter> {
    std::env::var("RUST_LOG")
        .ok()
        .and_then(|value| parse_level(&value))
}

/// Install the bridge as the global logger.
///
/// `cli_level` wins over `RUST_LOG`; with neither, `info` is used until
/// [`apply_settings_level`] runs. Calling this twice is harmless.
pub fn init_log_bridge(cli_level: Option<LevelFilter>) {
    if log::set_logger(&BRIDGE).is_err() {
        return;
    }
    log::set_max_level(cli_level.or_else(env_level).unwrap_or(LevelFilter::Info));
}

/// Apply the `log_level` setting unless the CLI flag or `RUST_LOG` already
/// chose a level.
pub fn apply_settings_level(cli_level: Option<LevelFilter>, settings_level: &str) {
    if cli_level.is_some() || env_level().is_some() {
        return;
    }
    match parse_level(settings_level) {
        Some(level) => log::set_max_level(level),
        None => log::warn!("Unknown log_level '{}' in settings", settings_level),
    }
}

/// Also append log lines to `path`.
pub fn attach_log_file(path: &Path) -> std::io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(
        file,
        "\n{}\noverlay-sync {} session started at {}\n{}",
        "=".repeat(80),
        crate::VERSION,
        get_timestamp(),
        "=".repeat(80)
    )?;
    *BRIDGE.file.lock() = Some(file);
    Ok(())
}
