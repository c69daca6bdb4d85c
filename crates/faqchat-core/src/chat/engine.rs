//! Conversation engine: one chat turn from inbound text to persisted reply.
//!
//! Every turn re-reads the FAQ entries and (for continuations) the stored
//! session, appends the user message and the bot reply, and writes the whole
//! session back. Nothing is cached between turns and no lock is held across
//! the read-modify-write, so two concurrent continuations of the same session
//! race and the later replace wins.

use chrono::Utc;
use faqchat_types::chat::{ChatReply, ChatSession, Sender, SessionId};
use faqchat_types::error::{ChatError, RepositoryError};
use tracing::{debug, info};

use crate::chat::id::SessionIdGenerator;
use crate::chat::matcher::{MatchMode, MatchOutcome, match_message};
use crate::chat::repository::SessionRepository;
use crate::repository::faq::FaqRepository;

/// Orchestrates chat turns over an entry store and a session store.
///
/// Generic over the repository traits and the id generator so it can run
/// against SQLite in production and in-memory fakes in tests.
pub struct ConversationEngine<F: FaqRepository, S: SessionRepository, G: SessionIdGenerator> {
    faq_repo: F,
    session_repo: S,
    ids: G,
}

impl<F: FaqRepository, S: SessionRepository, G: SessionIdGenerator> ConversationEngine<F, S, G> {
    pub fn new(faq_repo: F, session_repo: S, ids: G) -> Self {
        Self {
            faq_repo,
            session_repo,
            ids,
        }
    }

    /// Access the session repository.
    pub fn session_repo(&self) -> &S {
        &self.session_repo
    }

    /// Start a new conversation with its first message.
    ///
    /// The first message is matched in [`MatchMode::Start`]: a miss on every
    /// entry query goes straight to the fallback reply.
    pub async fn start_conversation(&self, message: &str) -> Result<ChatReply, ChatError> {
        let session_id = self.ids.next_id();
        let mut session = ChatSession::new(session_id);

        let outcome = self.run_turn(&mut session, message, MatchMode::Start).await?;

        self.session_repo
            .create(&session)
            .await
            .map_err(storage_error)?;

        info!(
            session_id = %session_id,
            matched = outcome.kind.as_str(),
            options = outcome.options.len(),
            "Conversation started"
        );

        Ok(reply(session_id, outcome))
    }

    /// Continue an existing conversation.
    ///
    /// Fails with [`ChatError::SessionNotFound`] if the session does not
    /// exist; a continuation never creates a session.
    pub async fn continue_conversation(
        &self,
        session_id: &SessionId,
        message: &str,
    ) -> Result<ChatReply, ChatError> {
        let mut session = self
            .session_repo
            .get_by_id(session_id)
            .await
            .map_err(storage_error)?
            .ok_or(ChatError::SessionNotFound)?;

        let outcome = self
            .run_turn(&mut session, message, MatchMode::Continuation)
            .await?;

        self.session_repo
            .replace(session_id, &session)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => ChatError::SessionNotFound,
                other => storage_error(other),
            })?;

        info!(
            session_id = %session_id,
            matched = outcome.kind.as_str(),
            options = outcome.options.len(),
            messages = session.messages.len(),
            "Conversation continued"
        );

        Ok(reply(*session_id, outcome))
    }

    /// Full transcript of a session.
    pub async fn get_transcript(&self, session_id: &SessionId) -> Result<ChatSession, ChatError> {
        self.session_repo
            .get_by_id(session_id)
            .await
            .map_err(storage_error)?
            .ok_or(ChatError::SessionNotFound)
    }

    /// Delete a session and its transcript.
    pub async fn delete_session(&self, session_id: &SessionId) -> Result<(), ChatError> {
        self.session_repo
            .delete(session_id)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => ChatError::SessionNotFound,
                other => storage_error(other),
            })?;
        info!(session_id = %session_id, "Session deleted");
        Ok(())
    }

    /// Append the user message, match against fresh entries, append the reply.
    async fn run_turn(
        &self,
        session: &mut ChatSession,
        message: &str,
        mode: MatchMode,
    ) -> Result<MatchOutcome, ChatError> {
        session.append(Sender::User, message, Utc::now());

        let entries = self.faq_repo.list_all().await.map_err(storage_error)?;
        let outcome = match_message(message, &entries, mode);
        debug!(
            session_id = %session.session_id,
            entries = entries.len(),
            mode = ?mode,
            matched = outcome.kind.as_str(),
            "Matched message"
        );

        session.append(Sender::Bot, outcome.reply.clone(), Utc::now());
        Ok(outcome)
    }
}

fn reply(session_id: SessionId, outcome: MatchOutcome) -> ChatReply {
    ChatReply {
        session_id,
        reply: outcome.reply,
        options: outcome.options,
    }
}

fn storage_error(e: RepositoryError) -> ChatError {
    ChatError::Storage(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::matcher::FALLBACK_REPLY;
    use faqchat_types::chat::SessionSummary;
    use faqchat_types::faq::{EntryId, FaqEntry, FaqEntryRequest, FaqOption};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use tokio::sync::Barrier;
    use uuid::Uuid;

    // --- In-memory fakes ---

    /// Entry store over a fixed list. Only `list_all` matters to the engine.
    struct FakeFaqRepo {
        entries: Vec<FaqEntry>,
        fail: bool,
    }

    impl FakeFaqRepo {
        fn new(entries: Vec<FaqEntry>) -> Self {
            Self {
                entries,
                fail: false,
            }
        }
    }

    impl FaqRepository for FakeFaqRepo {
        async fn list_all(&self) -> Result<Vec<FaqEntry>, RepositoryError> {
            if self.fail {
                return Err(RepositoryError::Connection);
            }
            Ok(self.entries.clone())
        }

        async fn get_by_id(&self, id: &EntryId) -> Result<Option<FaqEntry>, RepositoryError> {
            Ok(self.entries.iter().find(|e| e.id == *id).cloned())
        }

        async fn create(&self, _entry: &FaqEntryRequest) -> Result<FaqEntry, RepositoryError> {
            unimplemented!("read-only fake")
        }

        async fn create_many(
            &self,
            _entries: &[FaqEntryRequest],
        ) -> Result<Vec<FaqEntry>, RepositoryError> {
            unimplemented!("read-only fake")
        }

        async fn update(&self, _entry: &FaqEntry) -> Result<(), RepositoryError> {
            unimplemented!("read-only fake")
        }

        async fn delete(&self, _id: &EntryId) -> Result<(), RepositoryError> {
            unimplemented!("read-only fake")
        }

        async fn delete_all(&self) -> Result<u64, RepositoryError> {
            unimplemented!("read-only fake")
        }

        async fn count(&self) -> Result<u64, RepositoryError> {
            Ok(self.entries.len() as u64)
        }
    }

    /// Session store backed by a map. `gate`, when set, makes every read wait
    /// on a barrier after taking its snapshot so concurrent turns interleave.
    #[derive(Clone, Default)]
    struct FakeSessionRepo {
        sessions: Arc<Mutex<HashMap<SessionId, ChatSession>>>,
        creates: Arc<AtomicUsize>,
        replaces: Arc<AtomicUsize>,
        gate: Option<Arc<Barrier>>,
    }

    impl FakeSessionRepo {
        fn stored(&self, id: &SessionId) -> Option<ChatSession> {
            self.sessions.lock().unwrap().get(id).cloned()
        }

        fn len(&self) -> usize {
            self.sessions.lock().unwrap().len()
        }
    }

    impl SessionRepository for FakeSessionRepo {
        async fn create(&self, session: &ChatSession) -> Result<(), RepositoryError> {
            self.creates.fetch_add(1, Ordering::SeqCst);
            self.sessions
                .lock()
                .unwrap()
                .insert(session.session_id, session.clone());
            Ok(())
        }

        async fn get_by_id(
            &self,
            session_id: &SessionId,
        ) -> Result<Option<ChatSession>, RepositoryError> {
            let snapshot = self.stored(session_id);
            if let Some(gate) = &self.gate {
                gate.wait().await;
            }
            Ok(snapshot)
        }

        async fn replace(
            &self,
            session_id: &SessionId,
            session: &ChatSession,
        ) -> Result<(), RepositoryError> {
            self.replaces.fetch_add(1, Ordering::SeqCst);
            let mut sessions = self.sessions.lock().unwrap();
            match sessions.get_mut(session_id) {
                Some(stored) => {
                    *stored = session.clone();
                    Ok(())
                }
                None => Err(RepositoryError::NotFound),
            }
        }

        async fn list_recent(
            &self,
            _limit: Option<i64>,
        ) -> Result<Vec<SessionSummary>, RepositoryError> {
            Ok(Vec::new())
        }

        async fn delete(&self, session_id: &SessionId) -> Result<(), RepositoryError> {
            match self.sessions.lock().unwrap().remove(session_id) {
                Some(_) => Ok(()),
                None => Err(RepositoryError::NotFound),
            }
        }

        async fn count(&self) -> Result<u64, RepositoryError> {
            Ok(self.len() as u64)
        }
    }

    /// Deterministic ids: 1, 2, 3, ...
    #[derive(Default)]
    struct SequentialIds(AtomicU64);

    impl SessionIdGenerator for SequentialIds {
        fn next_id(&self) -> SessionId {
            let n = self.0.fetch_add(1, Ordering::SeqCst) + 1;
            SessionId::from_uuid(Uuid::from_u128(n as u128))
        }
    }

    // --- Helpers ---

    fn hours_entries() -> Vec<FaqEntry> {
        vec![
            FaqEntryRequest::new("hours", "We are open 9-5")
                .with_option(FaqOption::new("1", "weekends?", "Closed weekends"))
                .into_entry(EntryId::new()),
        ]
    }

    fn engine(
        entries: Vec<FaqEntry>,
        sessions: FakeSessionRepo,
    ) -> ConversationEngine<FakeFaqRepo, FakeSessionRepo, SequentialIds> {
        ConversationEngine::new(FakeFaqRepo::new(entries), sessions, SequentialIds::default())
    }

    fn assert_turns_well_formed(session: &ChatSession) {
        assert_eq!(session.messages.len() % 2, 0);
        for pair in session.messages.chunks(2) {
            assert_eq!(pair[0].sender, Sender::User);
            assert_eq!(pair[1].sender, Sender::Bot);
        }
        for w in session.messages.windows(2) {
            assert!(w[0].timestamp <= w[1].timestamp);
        }
    }

    // --- Tests ---

    #[tokio::test]
    async fn test_hours_scenario() {
        let sessions = FakeSessionRepo::default();
        let engine = engine(hours_entries(), sessions.clone());

        let first = engine.start_conversation("hours").await.unwrap();
        assert_eq!(first.reply, "We are open 9-5");
        assert_eq!(first.options, vec!["weekends?"]);

        let second = engine
            .continue_conversation(&first.session_id, "weekends?")
            .await
            .unwrap();
        assert_eq!(second.session_id, first.session_id);
        assert_eq!(second.reply, "Closed weekends");
        assert!(second.options.is_empty());

        let stored = sessions.stored(&first.session_id).unwrap();
        assert_eq!(stored.messages.len(), 4);
        assert_eq!(stored.messages[2].text, "weekends?");
        assert_eq!(stored.messages[3].text, "Closed weekends");
        assert_turns_well_formed(&stored);
    }

    #[tokio::test]
    async fn test_start_uses_generated_id_and_creates_session() {
        let sessions = FakeSessionRepo::default();
        let engine = engine(hours_entries(), sessions.clone());

        let reply = engine.start_conversation("HOURS").await.unwrap();
        assert_eq!(reply.session_id, SessionId::from_uuid(Uuid::from_u128(1)));
        assert_eq!(sessions.creates.load(Ordering::SeqCst), 1);
        assert_eq!(sessions.replaces.load(Ordering::SeqCst), 0);

        let stored = sessions.stored(&reply.session_id).unwrap();
        assert_eq!(stored.messages.len(), 2);
        assert_eq!(stored.messages[0].sender, Sender::User);
        assert_eq!(stored.messages[0].text, "HOURS");
        assert_eq!(stored.messages[1].sender, Sender::Bot);
        assert_eq!(stored.messages[1].text, "We are open 9-5");
    }

    #[tokio::test]
    async fn test_start_does_not_scan_other_options() {
        let engine = engine(hours_entries(), FakeSessionRepo::default());

        let reply = engine.start_conversation("weekends?").await.unwrap();
        assert_eq!(reply.reply, FALLBACK_REPLY);
        assert!(reply.options.is_empty());
    }

    #[tokio::test]
    async fn test_start_with_no_entries_falls_back() {
        let sessions = FakeSessionRepo::default();
        let engine = engine(Vec::new(), sessions.clone());

        let reply = engine.start_conversation("hello").await.unwrap();
        assert_eq!(reply.reply, FALLBACK_REPLY);
        assert!(reply.options.is_empty());
        // A fallback is still a successful turn and is persisted.
        assert_eq!(sessions.len(), 1);
    }

    #[tokio::test]
    async fn test_continue_scans_all_options() {
        let entries = vec![
            FaqEntryRequest::new("returns", "30 day returns")
                .with_option(FaqOption::new("1", "yes", "Confirmed"))
                .into_entry(EntryId::new()),
        ];
        let engine = engine(entries, FakeSessionRepo::default());

        let start = engine.start_conversation("yes").await.unwrap();
        assert_eq!(start.reply, FALLBACK_REPLY);

        let next = engine
            .continue_conversation(&start.session_id, "yes")
            .await
            .unwrap();
        assert_eq!(next.reply, "Confirmed");
        assert!(next.options.is_empty());
    }

    #[tokio::test]
    async fn test_continue_unknown_session_is_not_found() {
        let sessions = FakeSessionRepo::default();
        let engine = engine(hours_entries(), sessions.clone());
        let missing = SessionId::from_uuid(Uuid::from_u128(42));

        let err = engine
            .continue_conversation(&missing, "hours")
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::SessionNotFound));
        assert_eq!(sessions.len(), 0);
        assert_eq!(sessions.creates.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_each_turn_appends_two_messages() {
        let sessions = FakeSessionRepo::default();
        let engine = engine(hours_entries(), sessions.clone());

        let start = engine.start_conversation("hours").await.unwrap();
        for (i, msg) in ["weekends?", "nope", "Hours"].iter().enumerate() {
            engine
                .continue_conversation(&start.session_id, msg)
                .await
                .unwrap();
            let stored = sessions.stored(&start.session_id).unwrap();
            assert_eq!(stored.messages.len(), 2 * (i + 2));
            assert_turns_well_formed(&stored);
        }
        assert_eq!(sessions.replaces.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_blank_message_is_an_ordinary_turn() {
        let sessions = FakeSessionRepo::default();
        let engine = engine(hours_entries(), sessions.clone());

        let start = engine.start_conversation("").await.unwrap();
        assert_eq!(start.reply, FALLBACK_REPLY);
        assert!(start.options.is_empty());

        let stored = sessions.stored(&start.session_id).unwrap();
        assert_eq!(stored.messages.len(), 2);
        assert_eq!(stored.messages[0].text, "");
        assert_eq!(stored.messages[1].text, FALLBACK_REPLY);

        let next = engine
            .continue_conversation(&start.session_id, "   ")
            .await
            .unwrap();
        assert_eq!(next.reply, FALLBACK_REPLY);
        assert_eq!(sessions.stored(&start.session_id).unwrap().messages.len(), 4);
    }

    #[tokio::test]
    async fn test_delete_session() {
        let sessions = FakeSessionRepo::default();
        let engine = engine(hours_entries(), sessions.clone());
        let start = engine.start_conversation("hours").await.unwrap();

        engine.delete_session(&start.session_id).await.unwrap();
        assert_eq!(sessions.len(), 0);
        assert!(matches!(
            engine.delete_session(&start.session_id).await,
            Err(ChatError::SessionNotFound)
        ));
        assert!(matches!(
            engine.get_transcript(&start.session_id).await,
            Err(ChatError::SessionNotFound)
        ));
    }

    #[tokio::test]
    async fn test_entry_store_failure_propagates() {
        let sessions = FakeSessionRepo::default();
        let engine = ConversationEngine::new(
            FakeFaqRepo {
                entries: Vec::new(),
                fail: true,
            },
            sessions.clone(),
            SequentialIds::default(),
        );

        let err = engine.start_conversation("hours").await.unwrap_err();
        assert!(matches!(err, ChatError::Storage(_)));
        assert_eq!(sessions.len(), 0);
    }

    #[tokio::test]
    async fn test_get_transcript() {
        let engine = engine(hours_entries(), FakeSessionRepo::default());
        let start = engine.start_conversation("hours").await.unwrap();

        let transcript = engine.get_transcript(&start.session_id).await.unwrap();
        assert_eq!(transcript.session_id, start.session_id);
        assert_eq!(transcript.messages.len(), 2);

        let missing = SessionId::from_uuid(Uuid::from_u128(99));
        assert!(matches!(
            engine.get_transcript(&missing).await,
            Err(ChatError::SessionNotFound)
        ));
    }

    /// Known race: continuations of the same session are not serialized.
    /// Both turns read the same snapshot and the later replace overwrites
    /// the earlier one, so one turn is lost.
    #[tokio::test]
    async fn test_concurrent_continuations_can_lose_a_turn() {
        let sessions = FakeSessionRepo::default();
        let seed = engine(hours_entries(), sessions.clone());
        let start = seed.start_conversation("hours").await.unwrap();

        let gated = FakeSessionRepo {
            gate: Some(Arc::new(Barrier::new(2))),
            ..sessions.clone()
        };
        let engine = engine(hours_entries(), gated);

        let (a, b) = tokio::join!(
            engine.continue_conversation(&start.session_id, "weekends?"),
            engine.continue_conversation(&start.session_id, "hours"),
        );
        assert!(a.is_ok());
        assert!(b.is_ok());

        let stored = sessions.stored(&start.session_id).unwrap();
        // 2 (start) + 2 + 2 if serialized; last writer wins instead.
        assert_eq!(stored.messages.len(), 4);
        assert_turns_well_formed(&stored);
    }
}
