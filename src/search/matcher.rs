//! Subject and content matching over a message source.
//!
//! A message matches when its subject equals the expected one exactly and
//! every fragment occurs somewhere in its extracted content. Each fragment
//! is searched independently, so duplicates are fine and a hit at the very
//! start of the content counts like any other.

use tracing::{debug, info};

use crate::config::ExtractConfig;
use crate::error::{Result, SpoolError};
use crate::model::message::SpooledMessage;
use crate::model::query::MatchQuery;
use crate::model::report::MessageReport;
use crate::parser::html::ContentExtractor;
use crate::parser::parse_and_extract;
use crate::store::spool::MessageSource;

/// Evaluates [`MatchQuery`]s against spooled messages.
#[derive(Debug, Clone, Default)]
pub struct Matcher {
    extractor: ContentExtractor,
}

impl Matcher {
    /// Matcher using a specific content extractor.
    pub fn new(extractor: ContentExtractor) -> Self {
        Self { extractor }
    }

    /// Matcher using the regions from the `[extract]` config section.
    pub fn from_config(config: &ExtractConfig) -> Result<Self> {
        Ok(Self::new(ContentExtractor::new(&config.regions)?))
    }

    /// The extractor used to derive searchable content.
    pub fn extractor(&self) -> &ContentExtractor {
        &self.extractor
    }

    /// Whether any message in `source` matches `query`.
    ///
    /// Stops at the first match. Fails with [`SpoolError::NoMessagesFound`]
    /// when the source is empty, and with the first read error otherwise.
    pub fn find_match(&self, query: &MatchQuery, source: &dyn MessageSource) -> Result<bool> {
        let mut scanned = 0usize;

        for raw in source.messages()? {
            let (message, content) = parse_and_extract(raw?, &self.extractor);
            scanned += 1;

            if self.content_matches(query, &message, &content) {
                info!(
                    path = %message.path.display(),
                    scanned,
                    subject = %query.subject,
                    "Found matching email"
                );
                return Ok(true);
            }
        }

        if scanned == 0 {
            return Err(SpoolError::NoMessagesFound(source.describe()));
        }

        info!(scanned, subject = %query.subject, "No matching email");
        Ok(false)
    }

    /// Whether a single parsed message matches `query`.
    pub fn message_matches(&self, query: &MatchQuery, message: &SpooledMessage) -> bool {
        let content = self.extractor.extract(&message.html_body);
        self.content_matches(query, message, &content)
    }

    /// Report how every message in `source` fares against `query`.
    ///
    /// Unlike [`Matcher::find_match`] this never stops early.
    pub fn explain(
        &self,
        query: &MatchQuery,
        source: &dyn MessageSource,
    ) -> Result<Vec<MessageReport>> {
        let mut reports = Vec::new();

        for raw in source.messages()? {
            let (message, content) = parse_and_extract(raw?, &self.extractor);
            reports.push(MessageReport {
                subject_matches: message.subject == query.subject,
                has_html_body: message.has_html_body(),
                missing_fragments: missing_fragments(query, &content),
                path: message.path,
                subject: message.subject,
            });
        }

        if reports.is_empty() {
            return Err(SpoolError::NoMessagesFound(source.describe()));
        }
        Ok(reports)
    }

    fn content_matches(&self, query: &MatchQuery, message: &SpooledMessage, content: &str) -> bool {
        if message.subject != query.subject {
            debug!(
                path = %message.path.display(),
                subject = %message.subject,
                "Subject differs"
            );
            return false;
        }

        let found = query.fragments.iter().all(|f| content.contains(f.as_str()));
        debug!(path = %message.path.display(), found, "Checked body fragments");
        found
    }
}

/// Fragments of `query` that do not occur in `content`, in query order.
fn missing_fragments(query: &MatchQuery, content: &str) -> Vec<String> {
    query
        .fragments
        .iter()
        .filter(|f| !content.contains(f.as_str()))
        .cloned()
        .collect()
}
