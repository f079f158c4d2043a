//! Spooled message types.

use std::path::PathBuf;

/// One spool file, read and decoded to text but not yet parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMessage {
    /// Location of the spool file (or a synthetic name for in-memory spools).
    pub path: PathBuf,

    /// Full decoded text of the file.
    pub text: String,
}

impl RawMessage {
    /// Build a raw message from a path and its text.
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }
}

/// A raw message with its subject and HTML body extracted.
///
/// Missing fields are empty strings, never errors: a message without a
/// `Subject:` line or without body markers simply cannot match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpooledMessage {
    /// Location of the spool file.
    pub path: PathBuf,

    /// Full decoded text of the file.
    pub raw: String,

    /// Trimmed value of the first `Subject:` header.
    pub subject: String,

    /// HTML between the `--- HTML Body ---` and `--- End HTML Body ---` markers.
    pub html_body: String,
}

impl SpooledMessage {
    /// Whether the spool file carried an HTML body block.
    pub fn has_html_body(&self) -> bool {
        !self.html_body.is_empty()
    }
}
