//! Data model: spooled messages, queries, and match reports.

pub mod message;
pub mod query;
pub mod report;
