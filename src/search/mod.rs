//! Searching the spool: matching queries and asserting on the outcome.

pub mod assert;
pub mod matcher;

use crate::error::Result;
use crate::model::query::MatchQuery;
use crate::store::spool::MessageSource;

use self::matcher::Matcher;

/// Whether any message in `source` matches `query`, using the default
/// post-header and main content regions.
pub fn find_match(query: &MatchQuery, source: &dyn MessageSource) -> Result<bool> {
    Matcher::default().find_match(query, source)
}
