//! `spoolcheck`: find spooled outgoing emails by subject and body content.
//!
//! Applications under test write outgoing mail to a spool directory instead
//! of sending it. This crate reads that directory, pulls the subject and the
//! rendered HTML regions out of every file, and answers whether an email
//! with a given subject and content was sent.

pub mod config;
pub mod error;
pub mod i18n;
pub mod model;
pub mod parser;
pub mod search;
pub mod store;

pub use error::{Result, SpoolError};
pub use model::message::{RawMessage, SpooledMessage};
pub use model::query::MatchQuery;
pub use search::find_match;
pub use search::matcher::Matcher;
pub use store::spool::{MessageSource, ScanOptions, SpoolDir};
