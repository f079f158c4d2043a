//! Presence and absence checks for test steps.

use crate::error::{Result, SpoolError};
use crate::model::query::MatchQuery;
use crate::store::spool::MessageSource;

use super::matcher::Matcher;

/// Succeed only if some spooled email matches `query`.
pub fn assert_present(
    matcher: &Matcher,
    query: &MatchQuery,
    source: &dyn MessageSource,
) -> Result<()> {
    if matcher.find_match(query, source)? {
        Ok(())
    } else {
        Err(SpoolError::NoMatchingMessage {
            subject: query.subject.clone(),
        })
    }
}

/// Succeed only if no spooled email matches `query`.
///
/// An empty spool is still an error, same as for [`assert_present`].
pub fn assert_absent(
    matcher: &Matcher,
    query: &MatchQuery,
    source: &dyn MessageSource,
) -> Result<()> {
    if matcher.find_match(query, source)? {
        Err(SpoolError::UnexpectedMatch {
            subject: query.subject.clone(),
        })
    } else {
        Ok(())
    }
}
