use std::fs;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;

use crate::config::Settings;

/// Install a file-backed `tracing` subscriber.
///
/// The terminal belongs to the UI, so logs go to a file. Returns the writer
/// guard, which must stay alive until shutdown so buffered lines are flushed.
pub fn init_logging(settings: &Settings) -> Option<WorkerGuard> {
    if !settings.logging.enabled {
        return None;
    }
    let path = settings.log_file()?;
    let dir = path.parent()?.to_path_buf();
    let file_name = path.file_name()?.to_owned();
    if fs::create_dir_all(&dir).is_err() {
        return None;
    }

    let level = settings
        .logging
        .level
        .parse::<LevelFilter>()
        .unwrap_or(LevelFilter::INFO);

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(false)
        .with_max_level(level)
        .with_target(false)
        .try_init()
        .ok()?;

    Some(guard)
}
