//! Infrastructure layer for faqchat.
//!
//! Contains implementations of the repository traits defined in `faqchat-core`
//! (SQLite storage) and the config file loader.

pub mod config;
pub mod sqlite;
