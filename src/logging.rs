use std::fs;
use std::io;
use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const LOG_FILE: &str = "redstudio.log";

/// Log directory in the user cache directory
/// - Linux: ~/.cache/redstudio/
/// - macOS: ~/Library/Caches/redstudio/
/// - Windows: %LOCALAPPDATA%\redstudio\
pub fn log_dir() -> io::Result<PathBuf> {
    let mut dir = dirs::cache_dir().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::NotFound,
            "Unable to determine user cache directory",
        )
    })?;
    dir.push("redstudio");

    if !dir.exists() {
        fs::create_dir_all(&dir)?;
    }

    Ok(dir)
}

/// Initialize file logging.
///
/// The terminal belongs to the editor UI, so nothing is written to stderr.
/// The level comes from `RUST_LOG` and defaults to `info`. The returned guard
/// must be kept alive for the duration of the program.
pub fn init_logger() -> io::Result<WorkerGuard> {
    let log_path = log_dir()?.join(LOG_FILE);
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let (non_blocking, guard) = tracing_appender::non_blocking(file);
    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_filter(filter);

    match tracing_subscriber::registry().with(file_layer).try_init() {
        Ok(()) => Ok(guard),
        // A subscriber installed earlier (e.g. by a test harness) is fine
        Err(e) if e.to_string().contains("already been set") => Ok(guard),
        Err(e) => Err(io::Error::new(io::ErrorKind::Other, e)),
    }
}
