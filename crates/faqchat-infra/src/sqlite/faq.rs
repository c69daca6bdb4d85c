//! SQLite FAQ entry repository implementation.
//!
//! Entries live in `faq_entries`, their options in `faq_options` keyed by
//! `(entry_id, position)`. Entries are always returned in insertion order
//! (`seq`), options in `position` order. Every multi-row write runs in one
//! transaction on the writer pool.

use std::collections::HashMap;

use chrono::Utc;
use faqchat_core::repository::faq::FaqRepository;
use faqchat_types::error::RepositoryError;
use faqchat_types::faq::{EntryId, FaqEntry, FaqEntryRequest, FaqOption};
use sqlx::{Row, Sqlite, Transaction};

use super::format_datetime;
use super::pool::DatabasePool;

/// SQLite-backed implementation of `FaqRepository`.
pub struct SqliteFaqRepository {
    pool: DatabasePool,
}

impl SqliteFaqRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Row mapping
// ---------------------------------------------------------------------------

fn row_to_entry(row: &sqlx::sqlite::SqliteRow) -> Result<FaqEntry, RepositoryError> {
    let id: String = row
        .try_get("id")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
    let id: EntryId = id
        .parse()
        .map_err(|e| RepositoryError::Query(format!("invalid entry id: {e}")))?;

    Ok(FaqEntry {
        id,
        query: row
            .try_get("query")
            .map_err(|e| RepositoryError::Query(e.to_string()))?,
        response: row
            .try_get("response")
            .map_err(|e| RepositoryError::Query(e.to_string()))?,
        options: Vec::new(),
    })
}

fn row_to_option(row: &sqlx::sqlite::SqliteRow) -> Result<(String, FaqOption), sqlx::Error> {
    Ok((
        row.try_get("entry_id")?,
        FaqOption {
            sub_id: row.try_get("sub_id")?,
            option_text: row.try_get("option_text")?,
            response: row.try_get("response")?,
        },
    ))
}

// ---------------------------------------------------------------------------
// Transaction helpers
// ---------------------------------------------------------------------------

async fn insert_entry(
    tx: &mut Transaction<'_, Sqlite>,
    entry: &FaqEntry,
) -> Result<(), RepositoryError> {
    let now = format_datetime(&Utc::now());
    sqlx::query(
        "INSERT INTO faq_entries (id, query, response, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(entry.id.to_string())
    .bind(&entry.query)
    .bind(&entry.response)
    .bind(&now)
    .bind(&now)
    .execute(&mut **tx)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.message().contains("UNIQUE") {
                return RepositoryError::Conflict(format!("entry {} already exists", entry.id));
            }
        }
        RepositoryError::Query(e.to_string())
    })?;

    insert_options(tx, entry).await
}

async fn insert_options(
    tx: &mut Transaction<'_, Sqlite>,
    entry: &FaqEntry,
) -> Result<(), RepositoryError> {
    for (position, option) in entry.options.iter().enumerate() {
        sqlx::query(
            "INSERT INTO faq_options (entry_id, position, sub_id, option_text, response)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(entry.id.to_string())
        .bind(position as i64)
        .bind(&option.sub_id)
        .bind(&option.option_text)
        .bind(&option.response)
        .execute(&mut **tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e {
                if db_err.message().contains("UNIQUE") {
                    return RepositoryError::Conflict(format!(
                        "duplicate option subId '{}' in entry {}",
                        option.sub_id, entry.id
                    ));
                }
            }
            RepositoryError::Query(e.to_string())
        })?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// FaqRepository implementation
// ---------------------------------------------------------------------------

impl FaqRepository for SqliteFaqRepository {
    async fn list_all(&self) -> Result<Vec<FaqEntry>, RepositoryError> {
        // Both reads in one transaction so entries and options agree.
        let mut tx = self
            .pool
            .reader
            .begin()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let entry_rows = sqlx::query("SELECT id, query, response FROM faq_entries ORDER BY seq ASC")
            .fetch_all(&mut *tx)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let option_rows = sqlx::query(
            "SELECT entry_id, sub_id, option_text, response FROM faq_options
             ORDER BY entry_id, position ASC",
        )
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut options: HashMap<String, Vec<FaqOption>> = HashMap::new();
        for row in &option_rows {
            let (entry_id, option) =
                row_to_option(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            options.entry(entry_id).or_default().push(option);
        }

        let mut entries = Vec::with_capacity(entry_rows.len());
        for row in &entry_rows {
            let mut entry = row_to_entry(row)?;
            entry.options = options.remove(&entry.id.to_string()).unwrap_or_default();
            entries.push(entry);
        }

        Ok(entries)
    }

    async fn get_by_id(&self, id: &EntryId) -> Result<Option<FaqEntry>, RepositoryError> {
        let row = sqlx::query("SELECT id, query, response FROM faq_entries WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let mut entry = row_to_entry(&row)?;

        let option_rows = sqlx::query(
            "SELECT entry_id, sub_id, option_text, response FROM faq_options
             WHERE entry_id = ? ORDER BY position ASC",
        )
        .bind(id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        for row in &option_rows {
            let (_, option) = row_to_option(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            entry.options.push(option);
        }

        Ok(Some(entry))
    }

    async fn create(&self, entry: &FaqEntryRequest) -> Result<FaqEntry, RepositoryError> {
        let entry = entry.clone().into_entry(EntryId::new());

        let mut tx = self
            .pool
            .writer
            .begin()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        insert_entry(&mut tx, &entry).await?;
        tx.commit()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(entry)
    }

    async fn create_many(
        &self,
        entries: &[FaqEntryRequest],
    ) -> Result<Vec<FaqEntry>, RepositoryError> {
        let entries: Vec<FaqEntry> = entries
            .iter()
            .map(|e| e.clone().into_entry(EntryId::new()))
            .collect();

        let mut tx = self
            .pool
            .writer
            .begin()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        for entry in &entries {
            insert_entry(&mut tx, entry).await?;
        }
        tx.commit()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(entries)
    }

    async fn update(&self, entry: &FaqEntry) -> Result<(), RepositoryError> {
        let mut tx = self
            .pool
            .writer
            .begin()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        // Updating in place keeps `seq`, so the entry keeps its match position.
        let result = sqlx::query(
            "UPDATE faq_entries SET query = ?, response = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&entry.query)
        .bind(&entry.response)
        .bind(format_datetime(&Utc::now()))
        .bind(entry.id.to_string())
        .execute(&mut *tx)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        sqlx::query("DELETE FROM faq_options WHERE entry_id = ?")
            .bind(entry.id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        insert_options(&mut tx, entry).await?;

        tx.commit()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn delete(&self, id: &EntryId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM faq_entries WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn delete_all(&self) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM faq_entries")
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(result.rows_affected())
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM faq_entries")
            .fetch_one(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(row.0 as u64)
    }
}
