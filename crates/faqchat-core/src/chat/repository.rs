//! SessionRepository trait definition.
//!
//! Stores whole conversation transcripts keyed by session id. Follows the
//! same RPITIT pattern as FaqRepository.

use faqchat_types::chat::{ChatSession, SessionId, SessionSummary};
use faqchat_types::error::RepositoryError;

/// Repository trait for chat session persistence.
///
/// Implementations live in faqchat-infra (e.g., `SqliteSessionRepository`).
pub trait SessionRepository: Send + Sync {
    /// Store a new session together with its messages.
    fn create(
        &self,
        session: &ChatSession,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Get a session and its full transcript.
    fn get_by_id(
        &self,
        session_id: &SessionId,
    ) -> impl std::future::Future<Output = Result<Option<ChatSession>, RepositoryError>> + Send;

    /// Overwrite the stored transcript with `session`.
    ///
    /// This is a full-document replace, not an append: whatever was stored
    /// before is discarded. Returns `RepositoryError::NotFound` if no session
    /// with that id exists.
    fn replace(
        &self,
        session_id: &SessionId,
        session: &ChatSession,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Most recently active sessions first.
    fn list_recent(
        &self,
        limit: Option<i64>,
    ) -> impl std::future::Future<Output = Result<Vec<SessionSummary>, RepositoryError>> + Send;

    /// Delete a session and its messages.
    fn delete(
        &self,
        session_id: &SessionId,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Count stored sessions.
    fn count(&self) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;
}
