//! Session id generation.
//!
//! The engine never mints ids itself; it asks an injected generator so tests
//! can use predictable ids.

use faqchat_types::chat::SessionId;
use uuid::Uuid;

/// Source of fresh session ids.
pub trait SessionIdGenerator: Send + Sync {
    fn next_id(&self) -> SessionId;
}

/// Production generator: UUID v7 (time-sortable, random tail).
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidV7Generator;

impl SessionIdGenerator for UuidV7Generator {
    fn next_id(&self) -> SessionId {
        SessionId::from_uuid(Uuid::now_v7())
    }
}
