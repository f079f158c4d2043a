//! Per-message match diagnostics.

use std::path::PathBuf;

use serde::Serialize;

/// How a single spooled message fared against a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageReport {
    /// Spool file the report describes.
    pub path: PathBuf,

    /// Subject parsed from the message (empty when absent).
    pub subject: String,

    /// Whether the parsed subject equals the expected one.
    pub subject_matches: bool,

    /// Whether the message had an HTML body block at all.
    pub has_html_body: bool,

    /// Fragments not found in the extracted content, in query order.
    pub missing_fragments: Vec<String>,
}

impl MessageReport {
    /// A message matches when the subject is equal and nothing is missing.
    pub fn is_match(&self) -> bool {
        self.subject_matches && self.missing_fragments.is_empty()
    }
}
