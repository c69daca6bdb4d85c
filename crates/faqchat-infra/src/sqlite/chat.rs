//! SQLite chat session repository implementation.
//!
//! Implements `SessionRepository` from `faqchat-core`. A session is one row in
//! `chat_sessions` plus its transcript in `chat_messages`, ordered by `seq`.
//! Writes go through the writer pool inside a transaction so a transcript is
//! never half-stored.

use chrono::{DateTime, Utc};
use faqchat_core::chat::repository::SessionRepository;
use faqchat_types::chat::{ChatMessage, ChatSession, Sender, SessionId, SessionSummary};
use faqchat_types::error::RepositoryError;
use sqlx::{Row, Sqlite, Transaction};

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime};

/// SQLite-backed implementation of `SessionRepository`.
pub struct SqliteSessionRepository {
    pool: DatabasePool,
}

impl SqliteSessionRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Private Row types for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

struct MessageRow {
    sender: String,
    text: String,
    timestamp: String,
}

impl MessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            sender: row.try_get("sender")?,
            text: row.try_get("text")?,
            timestamp: row.try_get("timestamp")?,
        })
    }

    fn into_message(self) -> Result<ChatMessage, RepositoryError> {
        let sender: Sender = self
            .sender
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;

        Ok(ChatMessage {
            sender,
            text: self.text,
            timestamp: parse_datetime(&self.timestamp)?,
        })
    }
}

struct SummaryRow {
    id: String,
    started_at: String,
    updated_at: String,
    message_count: i64,
}

impl SummaryRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            started_at: row.try_get("started_at")?,
            updated_at: row.try_get("updated_at")?,
            message_count: row.try_get("message_count")?,
        })
    }

    fn into_summary(self) -> Result<SessionSummary, RepositoryError> {
        let session_id: SessionId = self
            .id
            .parse()
            .map_err(|e| RepositoryError::Query(format!("invalid session id: {e}")))?;

        Ok(SessionSummary {
            session_id,
            message_count: self.message_count as u32,
            started_at: parse_datetime(&self.started_at)?,
            last_activity_at: parse_datetime(&self.updated_at)?,
        })
    }
}

async fn insert_messages(
    tx: &mut Transaction<'_, Sqlite>,
    session: &ChatSession,
) -> Result<(), RepositoryError> {
    for (seq, message) in session.messages.iter().enumerate() {
        sqlx::query(
            "INSERT INTO chat_messages (session_id, seq, sender, text, timestamp)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(session.session_id.to_string())
        .bind(seq as i64)
        .bind(message.sender.to_string())
        .bind(&message.text)
        .bind(format_datetime(&message.timestamp))
        .execute(&mut **tx)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
    }
    Ok(())
}

/// Session-level timestamps: first and last message, or `now` when empty.
fn session_bounds(session: &ChatSession) -> (DateTime<Utc>, DateTime<Utc>) {
    let now = Utc::now();
    (
        session.started_at().unwrap_or(now),
        session.last_activity_at().unwrap_or(now),
    )
}

impl SessionRepository for SqliteSessionRepository {
    async fn create(&self, session: &ChatSession) -> Result<(), RepositoryError> {
        let (started_at, updated_at) = session_bounds(session);

        let mut tx = self
            .pool
            .writer
            .begin()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        sqlx::query("INSERT INTO chat_sessions (id, started_at, updated_at) VALUES (?, ?, ?)")
            .bind(session.session_id.to_string())
            .bind(format_datetime(&started_at))
            .bind(format_datetime(&updated_at))
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(ref db_err) = e {
                    if db_err.message().contains("UNIQUE") {
                        return RepositoryError::Conflict(format!(
                            "session {} already exists",
                            session.session_id
                        ));
                    }
                }
                RepositoryError::Query(e.to_string())
            })?;

        insert_messages(&mut tx, session).await?;

        tx.commit()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn get_by_id(&self, session_id: &SessionId) -> Result<Option<ChatSession>, RepositoryError> {
        let mut tx = self
            .pool
            .reader
            .begin()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let exists = sqlx::query("SELECT id FROM chat_sessions WHERE id = ?")
            .bind(session_id.to_string())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if exists.is_none() {
            return Ok(None);
        }

        let rows = sqlx::query(
            "SELECT sender, text, timestamp FROM chat_messages
             WHERE session_id = ? ORDER BY seq ASC",
        )
        .bind(session_id.to_string())
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut session = ChatSession::new(*session_id);
        session.messages.reserve(rows.len());
        for row in &rows {
            let message_row =
                MessageRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            session.messages.push(message_row.into_message()?);
        }

        Ok(Some(session))
    }

    async fn replace(
        &self,
        session_id: &SessionId,
        session: &ChatSession,
    ) -> Result<(), RepositoryError> {
        let (_, updated_at) = session_bounds(session);

        let mut tx = self
            .pool
            .writer
            .begin()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let result = sqlx::query("UPDATE chat_sessions SET updated_at = ? WHERE id = ?")
            .bind(format_datetime(&updated_at))
            .bind(session_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        sqlx::query("DELETE FROM chat_messages WHERE session_id = ?")
            .bind(session_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        // Stored under the key we were asked to replace, whatever the body says.
        let mut stored = session.clone();
        stored.session_id = *session_id;
        insert_messages(&mut tx, &stored).await?;

        tx.commit()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn list_recent(&self, limit: Option<i64>) -> Result<Vec<SessionSummary>, RepositoryError> {
        // LIMIT -1 means no limit in SQLite.
        let rows = sqlx::query(
            "SELECT s.id, s.started_at, s.updated_at, COUNT(m.seq) AS message_count
             FROM chat_sessions s
             LEFT JOIN chat_messages m ON m.session_id = s.id
             GROUP BY s.id
             ORDER BY s.updated_at DESC
             LIMIT ?",
        )
        .bind(limit.unwrap_or(-1))
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut summaries = Vec::with_capacity(rows.len());
        for row in &rows {
            let summary_row =
                SummaryRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            summaries.push(summary_row.into_summary()?);
        }

        Ok(summaries)
    }

    async fn delete(&self, session_id: &SessionId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM chat_sessions WHERE id = ?")
            .bind(session_id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM chat_sessions")
            .fetch_one(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(row.0 as u64)
    }
}
