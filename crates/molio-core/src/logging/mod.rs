//! # Logging Module
//!
//! The process-wide log sink of molio.
//!
//! Every message goes through a single [`Logger`], made of a verbosity
//! [`LogLevel`] and a [`LogTarget`]. The logger lives behind one global mutex,
//! so it can be reconfigured from any thread at any time.
//!
//! Internal code logs with the `tracing` macros. Events reach the logger
//! through the subscriber returned by [`dispatcher`]: a compact
//! `tracing_subscriber::fmt` layer writing to stdout, stderr or a file, and
//! [`SinkLayer`] for the level filter and callbacks. Nothing is installed
//! globally unless [`install`] is called; callers can instead scope the
//! dispatcher with `tracing::dispatcher::with_default`.
//!
//! Defaults are the [`LogLevel::Warning`] level and the standard error target.
//!
//! Callbacks are invoked while the sink is locked: a callback must not log
//! or reconfigure the logger itself.

mod config;
mod layer;
mod target;

pub use config::{LoggingConfig, TargetConfig};
pub use layer::{SinkLayer, SinkWriter, subscriber};
pub use target::{LogCallback, LogTarget};

use crate::core::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::{LazyLock, Mutex, MutexGuard, PoisonError};
use tracing::Dispatch;

static LOGGER: LazyLock<Mutex<Logger>> = LazyLock::new(|| Mutex::new(Logger::default()));

static DISPATCH: LazyLock<Dispatch> = LazyLock::new(|| Dispatch::new(subscriber()));

/// Severity of a message, from the most to the least important.
///
/// A logger set to some level emits messages of that level and of every more
/// important level.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error = 0,
    #[default]
    #[serde(alias = "warn")]
    Warning = 1,
    Info = 2,
    Debug = 3,
    Trace = 4,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warning => "warning",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warning),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(Error::InvalidArgument(format!(
                "unsupported log level `{other}`; expected error|warning|info|debug|trace"
            ))),
        }
    }
}

impl From<&tracing::Level> for LogLevel {
    fn from(level: &tracing::Level) -> Self {
        match *level {
            tracing::Level::ERROR => LogLevel::Error,
            tracing::Level::WARN => LogLevel::Warning,
            tracing::Level::INFO => LogLevel::Info,
            tracing::Level::DEBUG => LogLevel::Debug,
            tracing::Level::TRACE => LogLevel::Trace,
        }
    }
}

/// A log level together with the target receiving the messages.
#[derive(Debug, Default)]
pub struct Logger {
    level: LogLevel,
    target: LogTarget,
}

impl Logger {
    pub fn new(level: LogLevel, target: LogTarget) -> Self {
        Self { level, target }
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn set_level(&mut self, level: LogLevel) {
        self.level = level;
    }

    pub fn target(&self) -> &LogTarget {
        &self.target
    }

    /// Replaces the target, releasing the previous one.
    pub fn set_target(&mut self, target: LogTarget) {
        self.target = target;
    }

    pub fn enabled(&self, level: LogLevel) -> bool {
        level <= self.level
    }
}

fn logger() -> MutexGuard<'static, Logger> {
    LOGGER.lock().unwrap_or_else(PoisonError::into_inner)
}

/// The current level of the global logger.
pub fn level() -> LogLevel {
    logger().level()
}

pub fn set_level(level: LogLevel) {
    logger().set_level(level);
}

/// Sends all log messages to the file at `path`, opened in append mode.
///
/// # Errors
///
/// Returns [`Error::File`] if the file can not be opened. The previous target
/// stays active in that case.
pub fn to_file<P: AsRef<Path>>(path: P) -> Result<()> {
    let target = LogTarget::file(path)?;
    logger().set_target(target);
    Ok(())
}

pub fn to_stdout() {
    logger().set_target(LogTarget::Stdout);
}

pub fn to_stderr() {
    logger().set_target(LogTarget::Stderr);
}

/// Discards every message until another target is set.
pub fn silent() {
    logger().set_target(LogTarget::Silent);
}

/// Sends every message to `callback`.
///
/// The callback runs while the global logger is locked, it must not log.
pub fn to_callback<F>(callback: F)
where
    F: Fn(LogLevel, &str) + Send + 'static,
{
    logger().set_target(LogTarget::callback(callback));
}

/// Emits a message through the global logger.
pub fn log(level: LogLevel, message: &str) {
    tracing::dispatcher::with_default(&DISPATCH, || match level {
        LogLevel::Error => tracing::error!("{message}"),
        LogLevel::Warning => tracing::warn!("{message}"),
        LogLevel::Info => tracing::info!("{message}"),
        LogLevel::Debug => tracing::debug!("{message}"),
        LogLevel::Trace => tracing::trace!("{message}"),
    });
}

/// The dispatcher feeding `tracing` events into the global logger.
pub fn dispatcher() -> &'static Dispatch {
    &DISPATCH
}

/// Resets the global logger to its default level and target.
pub fn reset() {
    *logger() = Logger::default();
}

/// Routes `tracing` events of the whole process into the global logger.
///
/// Returns `false` if another global subscriber was already installed, in
/// which case molio events go to that subscriber instead.
pub fn install() -> bool {
    tracing::dispatcher::set_global_default(DISPATCH.clone()).is_ok()
}
