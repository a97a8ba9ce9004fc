use std::sync::Arc;
use std::time::Duration;

use crate::cache::{CacheStore, PreviewCache};
use crate::config::Config;
use crate::db::DatabaseBackend;
use crate::services::{ChatService, ChunkService, QuestionService};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: Arc<dyn DatabaseBackend>,
    pub chunks: Arc<ChunkService>,
    pub questions: Arc<QuestionService>,
    pub chats: Arc<ChatService>,
}

impl AppState {
    /// Wire the services. The cache store is injected so deployments can
    /// swap the in-process LRU for a shared one.
    pub fn new(config: Config, db: Arc<dyn DatabaseBackend>, cache: Arc<dyn CacheStore>) -> Self {
        let config = Arc::new(config);
        let previews = PreviewCache::new(
            cache,
            Duration::from_secs(config.chunking.preview_ttl_secs),
        );

        let chunks = ChunkService::new(db.clone(), previews, config.pagination.clone());
        let questions = QuestionService::new(db.clone());
        let chats = ChatService::new(db.clone(), config.pagination.clone());

        Self {
            config,
            db,
            chunks: Arc::new(chunks),
            questions: Arc::new(questions),
            chats: Arc::new(chats),
        }
    }
}
