//! Chat turns: matching, session persistence, and the engine tying them
//! together.

pub mod engine;
pub mod id;
pub mod matcher;
pub mod repository;
