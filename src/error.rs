//! Centralized error types for spoolcheck.

use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the spoolcheck library.
#[derive(Error, Debug)]
pub enum SpoolError {
    /// I/O error with the associated file path.
    #[error("I/O error reading '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The spool directory is missing, not a directory, or cannot be listed.
    #[error("Spool directory not found or not readable: {0}")]
    DirectoryNotFound(PathBuf),

    /// The spool exists but holds no messages to search.
    #[error("There are no email messages in {0}")]
    NoMessagesFound(String),

    /// A content region name could not be turned into a selector.
    #[error("Invalid content region '{0}'")]
    InvalidRegion(String),

    /// A message was expected but none matched.
    #[error("There is no email with subject '{subject}' and the expected content")]
    NoMatchingMessage { subject: String },

    /// No message was expected but one matched.
    #[error("There is an email with subject '{subject}' and the given content")]
    UnexpectedMatch { subject: String },
}

/// Convenience alias for `Result<T, SpoolError>`.
pub type Result<T> = std::result::Result<T, SpoolError>;

impl SpoolError {
    /// Create an `Io` variant from a path and an `io::Error`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assertion_messages_name_subject() {
        let missing = SpoolError::NoMatchingMessage {
            subject: "Welcome".into(),
        };
        assert!(missing.to_string().contains("'Welcome'"));
        let unexpected = SpoolError::UnexpectedMatch {
            subject: "Bye".into(),
        };
        assert!(unexpected.to_string().contains("'Bye'"));
    }

    #[test]
    fn test_display_includes_path() {
        let err = SpoolError::io(
            "/tmp/spool/a.eml",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("/tmp/spool/a.eml"));
    }
}
