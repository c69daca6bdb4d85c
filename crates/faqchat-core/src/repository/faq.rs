//! FAQ entry repository trait definition.

use faqchat_types::error::RepositoryError;
use faqchat_types::faq::{EntryId, FaqEntry, FaqEntryRequest};

/// Repository trait for FAQ entry persistence.
///
/// Implementations live in faqchat-infra (e.g., SqliteFaqRepository).
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
pub trait FaqRepository: Send + Sync {
    /// All entries in insertion order.
    ///
    /// The order must be stable: the matcher picks the first entry that
    /// matches, so a reordering would change which reply is served.
    fn list_all(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<FaqEntry>, RepositoryError>> + Send;

    /// Get an entry by its unique ID.
    fn get_by_id(
        &self,
        id: &EntryId,
    ) -> impl std::future::Future<Output = Result<Option<FaqEntry>, RepositoryError>> + Send;

    /// Create an entry. The store assigns the id and returns the stored entry.
    fn create(
        &self,
        entry: &FaqEntryRequest,
    ) -> impl std::future::Future<Output = Result<FaqEntry, RepositoryError>> + Send;

    /// Create several entries atomically, preserving their order.
    fn create_many(
        &self,
        entries: &[FaqEntryRequest],
    ) -> impl std::future::Future<Output = Result<Vec<FaqEntry>, RepositoryError>> + Send;

    /// Replace an entry's query, response, and options. Returns
    /// `RepositoryError::NotFound` when the id does not exist.
    fn update(
        &self,
        entry: &FaqEntry,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Permanently delete an entry by ID.
    fn delete(
        &self,
        id: &EntryId,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Delete every entry. Returns the number removed.
    fn delete_all(&self) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;

    /// Number of stored entries.
    fn count(&self) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;
}
