use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

pub const LOG_FILE_NAME: &str = "pomodial.log";

/// Initialise file logging under `dir`. The terminal belongs to the TUI, so
/// nothing is written to stdout or stderr.
///
/// Without `debug` the level is forced to `info`; with it `RUST_LOG` may
/// override the default `debug` level. The returned guard flushes pending
/// lines when dropped and must be held for the lifetime of the program.
pub fn init(dir: &Path, debug: bool) -> Option<WorkerGuard> {
    let level = if debug { "debug" } else { "info" };

    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    } else {
        EnvFilter::new(level)
    };

    if std::fs::create_dir_all(dir).is_err() {
        return None;
    }
    let appender = tracing_appender::rolling::never(dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .ok()?;

    Some(guard)
}
