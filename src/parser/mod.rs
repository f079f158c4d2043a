//! Parsers for spooled messages: the text envelope and the HTML body.

pub mod html;
pub mod spool;

use crate::model::message::RawMessage;

/// Subject, HTML body and extracted content of one raw spool file.
///
/// Convenience wrapper around [`spool::parse_message`] and
/// [`html::ContentExtractor::extract`].
pub fn parse_and_extract(
    raw: RawMessage,
    extractor: &html::ContentExtractor,
) -> (crate::model::message::SpooledMessage, String) {
    let message = spool::parse_message(raw);
    let content = extractor.extract(&message.html_body);
    (message, content)
}
