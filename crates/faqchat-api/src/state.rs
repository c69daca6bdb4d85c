//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by both CLI and REST API.
//! Services are generic over repository traits, but AppState pins them to the
//! SQLite implementations.

use std::path::PathBuf;
use std::sync::Arc;

use faqchat_core::chat::engine::ConversationEngine;
use faqchat_core::chat::id::UuidV7Generator;
use faqchat_core::service::faq::FaqService;
use faqchat_infra::config::{load_global_config, resolve_data_dir, resolve_database_url};
use faqchat_infra::sqlite::chat::SqliteSessionRepository;
use faqchat_infra::sqlite::faq::SqliteFaqRepository;
use faqchat_infra::sqlite::pool::DatabasePool;
use faqchat_types::config::GlobalConfig;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteFaqService = FaqService<SqliteFaqRepository>;

pub type ConcreteEngine =
    ConversationEngine<SqliteFaqRepository, SqliteSessionRepository, UuidV7Generator>;

/// Shared application state holding all services.
///
/// Used by both CLI commands and REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub faq_service: Arc<ConcreteFaqService>,
    pub engine: Arc<ConcreteEngine>,
    pub config: Arc<GlobalConfig>,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Resolve the data dir and load `config.toml` from it.
    pub async fn load_config() -> anyhow::Result<(PathBuf, GlobalConfig)> {
        let data_dir = resolve_data_dir();

        // Ensure data directory exists
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = load_global_config(&data_dir).await;
        Ok((data_dir, config))
    }

    /// Initialize the application state: connect to DB, wire services.
    pub async fn init(data_dir: PathBuf, config: GlobalConfig) -> anyhow::Result<Self> {
        let db_url = resolve_database_url(&config, &data_dir);
        let db_pool = DatabasePool::new(&db_url).await?;

        Ok(Self::from_pool(db_pool, data_dir, config))
    }

    /// Wire services on top of an already-open pool.
    pub fn from_pool(db_pool: DatabasePool, data_dir: PathBuf, config: GlobalConfig) -> Self {
        let faq_service = FaqService::new(SqliteFaqRepository::new(db_pool.clone()));

        // The engine reads entries through its own repository handle; both
        // share the same pool.
        let engine = ConversationEngine::new(
            SqliteFaqRepository::new(db_pool.clone()),
            SqliteSessionRepository::new(db_pool),
            UuidV7Generator,
        );

        Self {
            faq_service: Arc::new(faq_service),
            engine: Arc::new(engine),
            config: Arc::new(config),
            data_dir,
        }
    }
}
