//! FAQ entry management service.
//!
//! Validates create/update payloads and forwards them to the entry store.
//! None of this touches matching; it only keeps bad records out of the
//! store.

use std::collections::HashSet;

use faqchat_types::error::{FaqError, RepositoryError};
use faqchat_types::faq::{BulkFaqRequest, EntryId, FaqEntry, FaqEntryRequest};
use tracing::info;

use crate::repository::faq::FaqRepository;

/// Service for FAQ entry CRUD.
pub struct FaqService<R: FaqRepository> {
    repo: R,
}

impl<R: FaqRepository> FaqService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Access the entry repository.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// All entries in match order.
    pub async fn list_entries(&self) -> Result<Vec<FaqEntry>, FaqError> {
        self.repo.list_all().await.map_err(storage_error)
    }

    /// Get an entry by ID.
    pub async fn get_entry(&self, id: &EntryId) -> Result<FaqEntry, FaqError> {
        self.repo
            .get_by_id(id)
            .await
            .map_err(storage_error)?
            .ok_or(FaqError::NotFound)
    }

    /// Validate and store a single entry.
    pub async fn create_entry(&self, request: FaqEntryRequest) -> Result<FaqEntry, FaqError> {
        validate_entry(&request)?;
        let entry = self.repo.create(&request).await.map_err(storage_error)?;
        info!(entry_id = %entry.id, query = %entry.query, "FAQ entry created");
        Ok(entry)
    }

    /// Validate and store a batch of entries in one go.
    ///
    /// An empty batch is rejected. If any item is invalid nothing is stored.
    pub async fn create_many(&self, request: BulkFaqRequest) -> Result<Vec<FaqEntry>, FaqError> {
        if request.items.is_empty() {
            return Err(FaqError::Validation("No FAQ data provided.".to_string()));
        }
        for (i, item) in request.items.iter().enumerate() {
            validate_entry(item).map_err(|e| match e {
                FaqError::Validation(msg) => FaqError::Validation(format!("item {i}: {msg}")),
                other => other,
            })?;
        }

        let entries = self
            .repo
            .create_many(&request.items)
            .await
            .map_err(storage_error)?;
        info!(count = entries.len(), "FAQ entries created in bulk");
        Ok(entries)
    }

    /// Replace an entry's content, keeping its id.
    pub async fn update_entry(
        &self,
        id: &EntryId,
        request: FaqEntryRequest,
    ) -> Result<FaqEntry, FaqError> {
        validate_entry(&request)?;

        // Confirm existence first so a missing id is NotFound, not a no-op.
        self.get_entry(id).await?;

        let entry = request.into_entry(*id);
        self.repo.update(&entry).await.map_err(|e| match e {
            RepositoryError::NotFound => FaqError::NotFound,
            other => storage_error(other),
        })?;
        info!(entry_id = %id, "FAQ entry updated");
        Ok(entry)
    }

    /// Delete an entry.
    pub async fn delete_entry(&self, id: &EntryId) -> Result<(), FaqError> {
        self.repo.delete(id).await.map_err(|e| match e {
            RepositoryError::NotFound => FaqError::NotFound,
            other => storage_error(other),
        })?;
        info!(entry_id = %id, "FAQ entry deleted");
        Ok(())
    }

    /// Delete every entry. Returns how many were removed.
    pub async fn delete_all(&self) -> Result<u64, FaqError> {
        let deleted = self.repo.delete_all().await.map_err(storage_error)?;
        info!(deleted, "All FAQ entries deleted");
        Ok(deleted)
    }

    /// Number of stored entries.
    pub async fn count(&self) -> Result<u64, FaqError> {
        self.repo.count().await.map_err(storage_error)
    }
}

/// Check the required fields of an entry payload.
///
/// - `query` must not be blank
/// - every option needs a non-blank `subId` and `optionText`
/// - `subId`s must be unique within the entry
pub fn validate_entry(request: &FaqEntryRequest) -> Result<(), FaqError> {
    if request.query.trim().is_empty() {
        return Err(FaqError::Validation("query cannot be empty".to_string()));
    }

    let mut seen = HashSet::with_capacity(request.options.len());
    for option in &request.options {
        if option.sub_id.trim().is_empty() {
            return Err(FaqError::Validation("option subId cannot be empty".to_string()));
        }
        if option.option_text.trim().is_empty() {
            return Err(FaqError::Validation(format!(
                "option '{}' has empty optionText",
                option.sub_id
            )));
        }
        if !seen.insert(option.sub_id.as_str()) {
            return Err(FaqError::Validation(format!(
                "duplicate option subId '{}'",
                option.sub_id
            )));
        }
    }

    Ok(())
}

fn storage_error(e: RepositoryError) -> FaqError {
    FaqError::Storage(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use faqchat_types::faq::FaqOption;
    use std::sync::Mutex;

    /// Vec-backed entry store.
    #[derive(Default)]
    struct MockFaqRepo {
        entries: Mutex<Vec<FaqEntry>>,
    }

    impl FaqRepository for MockFaqRepo {
        async fn list_all(&self) -> Result<Vec<FaqEntry>, RepositoryError> {
            Ok(self.entries.lock().unwrap().clone())
        }

        async fn get_by_id(&self, id: &EntryId) -> Result<Option<FaqEntry>, RepositoryError> {
            Ok(self
                .entries
                .lock()
                .unwrap()
                .iter()
                .find(|e| e.id == *id)
                .cloned())
        }

        async fn create(&self, entry: &FaqEntryRequest) -> Result<FaqEntry, RepositoryError> {
            let entry = entry.clone().into_entry(EntryId::new());
            self.entries.lock().unwrap().push(entry.clone());
            Ok(entry)
        }

        async fn create_many(
            &self,
            entries: &[FaqEntryRequest],
        ) -> Result<Vec<FaqEntry>, RepositoryError> {
            let created: Vec<FaqEntry> = entries
                .iter()
                .map(|e| e.clone().into_entry(EntryId::new()))
                .collect();
            self.entries.lock().unwrap().extend(created.iter().cloned());
            Ok(created)
        }

        async fn update(&self, entry: &FaqEntry) -> Result<(), RepositoryError> {
            let mut entries = self.entries.lock().unwrap();
            match entries.iter_mut().find(|e| e.id == entry.id) {
                Some(stored) => {
                    *stored = entry.clone();
                    Ok(())
                }
                None => Err(RepositoryError::NotFound),
            }
        }

        async fn delete(&self, id: &EntryId) -> Result<(), RepositoryError> {
            let mut entries = self.entries.lock().unwrap();
            let before = entries.len();
            entries.retain(|e| e.id != *id);
            if entries.len() == before {
                return Err(RepositoryError::NotFound);
            }
            Ok(())
        }

        async fn delete_all(&self) -> Result<u64, RepositoryError> {
            let mut entries = self.entries.lock().unwrap();
            let n = entries.len() as u64;
            entries.clear();
            Ok(n)
        }

        async fn count(&self) -> Result<u64, RepositoryError> {
            Ok(self.entries.lock().unwrap().len() as u64)
        }
    }

    fn service() -> FaqService<MockFaqRepo> {
        FaqService::new(MockFaqRepo::default())
    }

    fn hours() -> FaqEntryRequest {
        FaqEntryRequest::new("hours", "We are open 9-5")
            .with_option(FaqOption::new("1", "weekends?", "Closed weekends"))
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let svc = service();
        let created = svc.create_entry(hours()).await.unwrap();

        let found = svc.get_entry(&created.id).await.unwrap();
        assert_eq!(found, created);
        assert_eq!(found.options[0].option_text, "weekends?");
    }

    #[tokio::test]
    async fn test_create_rejects_blank_query() {
        let svc = service();
        let err = svc
            .create_entry(FaqEntryRequest::new("  ", "x"))
            .await
            .unwrap_err();
        assert!(matches!(err, FaqError::Validation(_)));
        assert_eq!(svc.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_sub_ids() {
        let svc = service();
        let req = hours().with_option(FaqOption::new("1", "holidays?", "Closed"));
        let err = svc.create_entry(req).await.unwrap_err();
        assert!(err.to_string().contains("duplicate option subId '1'"));
    }

    #[tokio::test]
    async fn test_same_sub_id_allowed_across_entries() {
        let svc = service();
        svc.create_entry(hours()).await.unwrap();
        let other = FaqEntryRequest::new("returns", "30 days")
            .with_option(FaqOption::new("1", "receipt?", "Required"));
        assert!(svc.create_entry(other).await.is_ok());
    }

    #[tokio::test]
    async fn test_bulk_empty_rejected() {
        let svc = service();
        let err = svc.create_many(BulkFaqRequest::default()).await.unwrap_err();
        assert_eq!(err.to_string(), "invalid faq entry: No FAQ data provided.");
    }

    #[tokio::test]
    async fn test_bulk_invalid_item_stores_nothing() {
        let svc = service();
        let bulk = BulkFaqRequest {
            items: vec![hours(), FaqEntryRequest::new("", "empty")],
        };
        let err = svc.create_many(bulk).await.unwrap_err();
        assert!(err.to_string().contains("item 1"));
        assert_eq!(svc.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_bulk_preserves_order() {
        let svc = service();
        let bulk = BulkFaqRequest {
            items: vec![hours(), FaqEntryRequest::new("returns", "30 days")],
        };
        svc.create_many(bulk).await.unwrap();

        let queries: Vec<String> = svc
            .list_entries()
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.query)
            .collect();
        assert_eq!(queries, vec!["hours", "returns"]);
    }

    #[tokio::test]
    async fn test_update_keeps_id() {
        let svc = service();
        let created = svc.create_entry(hours()).await.unwrap();

        let updated = svc
            .update_entry(&created.id, FaqEntryRequest::new("opening hours", "8-6"))
            .await
            .unwrap();
        assert_eq!(updated.id, created.id);

        let found = svc.get_entry(&created.id).await.unwrap();
        assert_eq!(found.query, "opening hours");
        assert!(found.options.is_empty());
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let svc = service();
        let err = svc
            .update_entry(&EntryId::new(), hours())
            .await
            .unwrap_err();
        assert!(matches!(err, FaqError::NotFound));
    }

    #[tokio::test]
    async fn test_delete_and_delete_all() {
        let svc = service();
        let a = svc.create_entry(hours()).await.unwrap();
        svc.create_entry(FaqEntryRequest::new("returns", "30 days"))
            .await
            .unwrap();

        svc.delete_entry(&a.id).await.unwrap();
        assert!(matches!(
            svc.delete_entry(&a.id).await,
            Err(FaqError::NotFound)
        ));
        assert_eq!(svc.delete_all().await.unwrap(), 1);
        assert!(svc.list_entries().await.unwrap().is_empty());
    }
}
