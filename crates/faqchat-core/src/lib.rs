//! Business logic and repository trait definitions for faqchat.
//!
//! This crate defines the "ports" (repository traits) that the infrastructure
//! layer implements, the message matcher, and the conversation engine. It
//! depends only on `faqchat-types` -- never on `faqchat-infra` or any
//! database/IO crate.

pub mod chat;
pub mod repository;
pub mod service;
