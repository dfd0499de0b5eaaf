use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of an [`Error`].
///
/// Callable layers map each kind onto a stable status code; the kind is the
/// only part of an error they are allowed to branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// An allocation could not be satisfied.
    Memory,
    /// A file could not be opened, read or written.
    File,
    /// Persisted data was malformed.
    Format,
    /// A selection could not be parsed or evaluated.
    Selection,
    /// A precondition of a geometry call was violated.
    InvalidOperation,
    /// Anything not covered by the kinds above.
    Generic,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Memory allocation failed: {0}")]
    Memory(String),

    #[error("Could not access file '{path}': {source}", path = path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Format error: {0}")]
    Format(String),

    #[error("TOML parsing error for '{path}': {source}", path = path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Selection error: {0}")]
    Selection(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{0}")]
    Generic(String),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Memory(_) => ErrorKind::Memory,
            Error::File { .. } => ErrorKind::File,
            Error::Format(_) | Error::Toml { .. } => ErrorKind::Format,
            Error::Selection(_) => ErrorKind::Selection,
            Error::InvalidOperation(_) => ErrorKind::InvalidOperation,
            Error::InvalidArgument(_) | Error::Generic(_) => ErrorKind::Generic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_variants() {
        assert_eq!(Error::Memory("x".into()).kind(), ErrorKind::Memory);
        assert_eq!(Error::Format("x".into()).kind(), ErrorKind::Format);
        assert_eq!(Error::Selection("x".into()).kind(), ErrorKind::Selection);
        assert_eq!(
            Error::InvalidOperation("x".into()).kind(),
            ErrorKind::InvalidOperation
        );
        assert_eq!(Error::InvalidArgument("x".into()).kind(), ErrorKind::Generic);
        assert_eq!(Error::Generic("x".into()).kind(), ErrorKind::Generic);
    }

    #[test]
    fn file_error_reports_path_and_cause() {
        let error = Error::File {
            path: PathBuf::from("/no/such/dir/molio.log"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert_eq!(error.kind(), ErrorKind::File);
        let message = error.to_string();
        assert!(message.contains("/no/such/dir/molio.log"));
        assert!(message.contains("missing"));
    }

    #[test]
    fn toml_errors_classify_as_format() {
        let source = toml::from_str::<toml::Table>("level = ").unwrap_err();
        let error = Error::Toml {
            path: PathBuf::from("molio.toml"),
            source,
        };
        assert_eq!(error.kind(), ErrorKind::Format);
    }
}
