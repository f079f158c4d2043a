//! Spool storage: reading spooled files and managing the directory.

pub mod lifecycle;
pub mod spool;
