// src/log.rs
use std::{fs, io, path::Path};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::consts::{LOG_FILE, STORE_DIR};

/// Keeps the file writer alive. Drop it last.
pub struct LogGuard {
    _file: WorkerGuard,
}

/// Install the global subscriber: stderr + `.store/debug.log`.
/// Level comes from `RUST_LOG`, default `info`.
pub fn init() -> io::Result<LogGuard> {
    fs::create_dir_all(STORE_DIR)?;
    let appender = tracing_appender::rolling::never(Path::new(STORE_DIR), LOG_FILE);
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let console = fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .compact();

    let file = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(false);

    // A second init (tests, GUI re-run) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .try_init();

    Ok(LogGuard { _file: guard })
}

/// Info-level logging
#[macro_export]
macro_rules! logf {
    ($($arg:tt)*) => {
        ::tracing::info!($($arg)*)
    };
}

/// Debug-level logging
#[macro_export]
macro_rules! logd {
    ($($arg:tt)*) => {
        ::tracing::debug!($($arg)*)
    };
}

/// Warn-level logging
#[macro_export]
macro_rules! logw {
    ($($arg:tt)*) => {
        ::tracing::warn!($($arg)*)
    };
}

/// Error-level logging
#[macro_export]
macro_rules! loge {
    ($($arg:tt)*) => {
        ::tracing::error!($($arg)*)
    };
}
