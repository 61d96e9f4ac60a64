//! File logging via `tracing`.
//!
//! The terminal belongs to the UI, so log lines go to a file. `SEGUE_LOG`
//! overrides the configured filter (e.g. `SEGUE_LOG=segue=debug`).

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::{LoggingSettings, state_dir};

/// Where the log goes when no path is configured.
pub fn default_log_path() -> Option<PathBuf> {
    state_dir().map(|d| d.join("segue.log"))
}

/// Install the global subscriber. Returns the log file path, or `None` when
/// logging is off or could not be set up.
pub fn init(settings: &LoggingSettings) -> Option<PathBuf> {
    if !settings.enabled {
        return None;
    }

    let path = settings.path.clone().or_else(default_log_path)?;
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).ok()?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .ok()?;

    let filter = EnvFilter::try_from_env("SEGUE_LOG")
        .unwrap_or_else(|_| EnvFilter::new(&settings.level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .ok()?;

    Some(path)
}
