//! File-backed tracing for the binary.
//!
//! A full-screen TUI owns stdout, so events go to a log file instead. Logging
//! is off unless `RUST_LOG` is set, e.g. `RUST_LOG=bubbletea_pomodoro=debug`.

use anyhow::{anyhow, Context, Result};
use std::fs::OpenOptions;
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Default log file, created in the working directory.
pub const LOG_FILE: &str = "pomodoro.log";

/// Installs the global subscriber if `RUST_LOG` is set.
///
/// Returns `Ok(false)` when logging stays disabled.
pub fn init() -> Result<bool> {
    let Ok(filter) = EnvFilter::try_from_default_env() else {
        return Ok(false);
    };
    init_with_filter(filter, Path::new(LOG_FILE))?;
    Ok(true)
}

fn init_with_filter(filter: EnvFilter, path: &Path) -> Result<()> {
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::sync::Mutex::new(log_file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| anyhow!(err))
}
