//! Shared domain types for faqchat.
//!
//! FAQ entries and options, chat sessions and messages, the request/reply
//! records exchanged with clients, configuration, and error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod faq;
