use super::LogLevel;
use crate::core::error::{Error, Result};
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// A user supplied function receiving every emitted message.
pub type LogCallback = Box<dyn Fn(LogLevel, &str) + Send>;

/// Where log messages end up.
///
/// Stdout, stderr and file targets receive lines formatted by the `fmt` layer
/// of the molio subscriber. Callbacks receive the bare message instead.
///
/// Dropping a target releases what it owns: files are closed.
#[derive(Default)]
pub enum LogTarget {
    /// Discard every message.
    Silent,
    Stdout,
    #[default]
    Stderr,
    /// Append to a file.
    File { path: PathBuf, file: File },
    /// Forward to a callback, without any formatting.
    Callback(LogCallback),
}

impl LogTarget {
    /// Opens `path` for appending, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::File`] if the file can not be opened.
    pub fn file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| Error::File {
                path: path.clone(),
                source,
            })?;
        Ok(LogTarget::File { path, file })
    }

    pub fn callback<F>(callback: F) -> Self
    where
        F: Fn(LogLevel, &str) + Send + 'static,
    {
        LogTarget::Callback(Box::new(callback))
    }

    /// Writes an already formatted line. Silent and callback targets ignore it.
    pub(crate) fn write_formatted(&mut self, line: &[u8]) -> io::Result<()> {
        match self {
            LogTarget::Stdout => io::stdout().lock().write_all(line),
            LogTarget::Stderr => io::stderr().lock().write_all(line),
            LogTarget::File { file, .. } => file.write_all(line),
            LogTarget::Silent | LogTarget::Callback(_) => Ok(()),
        }
    }

    /// Hands a bare message to the callback target, if this is one.
    pub(crate) fn forward(&self, level: LogLevel, message: &str) {
        if let LogTarget::Callback(callback) = self {
            callback(level, message);
        }
    }
}

impl fmt::Debug for LogTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogTarget::Silent => f.write_str("Silent"),
            LogTarget::Stdout => f.write_str("Stdout"),
            LogTarget::Stderr => f.write_str("Stderr"),
            LogTarget::File { path, .. } => f.debug_tuple("File").field(path).finish(),
            LogTarget::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}
