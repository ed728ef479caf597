use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_ENV: &str = "SORTLINE_LOG";

/// Keeps the background writer alive; drop it last
pub struct FileLogGuard {
    _guard: WorkerGuard,
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install a file-only subscriber. The terminal is owned by the TUI, so
/// nothing is written to stdout. Returns None if the log directory cannot
/// be created; the game then runs without logs.
pub fn init_tracing(log_dir: &Path) -> Option<FileLogGuard> {
    if let Err(err) = std::fs::create_dir_all(log_dir) {
        eprintln!("failed to create log directory {}: {err}", log_dir.display());
        return None;
    }

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, "sortline.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(true);

    let installed = tracing_subscriber::registry()
        .with(env_filter())
        .with(file_layer)
        .try_init();
    if installed.is_err() {
        return None;
    }

    Some(FileLogGuard { _guard: guard })
}
