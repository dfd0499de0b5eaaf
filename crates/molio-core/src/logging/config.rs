use super::LogLevel;
use crate::core::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

/// Destination of the log messages in a [`LoggingConfig`].
///
/// In TOML, the simple targets are written as strings (`target = "stdout"`)
/// and files as a table (`target = { file = "molio.log" }`).
#[derive(Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TargetConfig {
    Silent,
    Stdout,
    #[default]
    Stderr,
    File(PathBuf),
}

/// Logging settings read from a TOML document.
///
/// ```toml
/// level = "info"
/// target = { file = "/tmp/molio.log" }
/// ```
///
/// Missing keys keep their defaults: `warning` level, standard error target.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    #[serde(default)]
    pub level: LogLevel,
    #[serde(default)]
    pub target: TargetConfig,
}

impl LoggingConfig {
    /// Reads the configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::File`] if the file can not be read and [`Error::Toml`]
    /// if it is not a valid configuration.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| Error::File {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| Error::Toml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Installs this configuration in the global logger.
    ///
    /// # Errors
    ///
    /// Returns [`Error::File`] if a file target can not be opened. The level is
    /// applied even in that case.
    pub fn apply(&self) -> Result<()> {
        debug!("Applying logging configuration: {:?}", self);
        super::set_level(self.level);
        match &self.target {
            TargetConfig::Silent => super::silent(),
            TargetConfig::Stdout => super::to_stdout(),
            TargetConfig::Stderr => super::to_stderr(),
            TargetConfig::File(path) => super::to_file(path)?,
        }
        Ok(())
    }
}

impl FromStr for LoggingConfig {
    type Err = toml::de::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        toml::from_str(s)
    }
}
