//! File-based tracing setup. The terminal belongs to the UI, so logs go to
//! `<data_dir>/asistencia-tui/asistencia.log`.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::debug;
use tracing_subscriber::EnvFilter;

pub fn log_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("asistencia-tui").join("asistencia.log"))
}

/// Initialize tracing for the application. Returns the log file in use, if any.
pub fn init_logging(filter: &str) -> Option<PathBuf> {
    let path = log_path()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).ok()?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .ok()?;

    let env_filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .ok()?;

    debug!(path = %path.display(), "logging initialised");
    Some(path)
}
