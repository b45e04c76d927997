//! Logging infrastructure for lovelang
//!
//! Logs rotate daily under `$XDG_STATE_HOME/lovelang/` as
//! `lovelang.YYYY-MM-DD.log`. Nothing is written to the terminal, which
//! belongs to the quiz.

use crate::config::{Config, LoggingConfig};
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

const LOG_FILE_PREFIX: &str = "lovelang";
const LOG_FILE_SUFFIX: &str = "log";

/// Initialize file logging in the XDG state directory.
///
/// `RUST_LOG` overrides `logging.level` when set.
pub fn init(config: &LoggingConfig) -> Result<LoggingGuard> {
    init_in(&Config::state_dir(), config)
}

/// Initialize file logging in `log_dir`.
///
/// The filter is checked before anything touches the filesystem, so a typo in
/// `logging.level` fails without creating the directory.
pub fn init_in(log_dir: &Path, config: &LoggingConfig) -> Result<LoggingGuard> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => level_filter(&config.level)?,
    };

    std::fs::create_dir_all(log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix(LOG_FILE_SUFFIX)
        .max_log_files(config.max_files.max(1))
        .build(log_dir)
        .map_err(|e| Error::Config(format!("failed to create log appender: {}", e)))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true);

    // Later calls keep the first subscriber
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init();

    tracing::info!(
        log_dir = %log_dir.display(),
        level = %config.level,
        database = %Config::database_path().display(),
        "Logging initialized"
    );

    Ok(LoggingGuard { _guard: guard })
}

/// Filter for a `logging.level` value.
///
/// Accepts a bare level (`warn`, `off`) or `target=level` directives
/// (`info,lovelang_core::session=debug`). A bare word that is not a level is
/// rejected rather than silently treated as a target name.
pub fn level_filter(level: &str) -> Result<EnvFilter> {
    let level = level.trim();
    if level.parse::<LevelFilter>().is_err() && !level.contains('=') {
        return Err(Error::Config(format!(
            "logging.level {:?} is not a level (trace, debug, info, warn, error, off)",
            level
        )));
    }
    EnvFilter::try_new(level)
        .map_err(|e| Error::Config(format!("invalid logging.level {:?}: {}", level, e)))
}

/// Most recent rotated log file in `log_dir`, if any.
pub fn latest_log_file(log_dir: &Path) -> Option<PathBuf> {
    let entries = std::fs::read_dir(log_dir).ok()?;
    let prefix = format!("{}.", LOG_FILE_PREFIX);
    let suffix = format!(".{}", LOG_FILE_SUFFIX);

    // Date-stamped names sort chronologically
    entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with(&prefix) && name.ends_with(&suffix))
        })
        .max()
}

/// Initialize logging for tests (captured by the test harness)
pub fn init_test() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("lovelang_core=debug"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// Keeps the background log writer alive; pending lines are flushed on drop.
pub struct LoggingGuard {
    _guard: tracing_appender::non_blocking::WorkerGuard,
}
