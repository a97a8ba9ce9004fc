use async_trait::async_trait;

use crate::db::connection::Database;
use crate::db::repository::{
    ChatRepository, ChunkRepository, DocumentRepository, QuestionRepository,
};
use crate::db::traits::{ChatStore, ChunkStore, DatabaseBackend, DocumentStore, QuestionStore};
use crate::error::Result;
use crate::models::{
    Chat, ChatCursor, ChatMessage, Chunk, ChunkListItem, Document, ListChunksRequest,
    MergeResult, Question, Vote,
};

pub struct LibSqlBackend {
    db: Database,
}

impl LibSqlBackend {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DocumentStore for LibSqlBackend {
    async fn create_document(&self, doc: &Document) -> Result<()> {
        let conn = self.db.connect().await?;
        DocumentRepository::create(&conn, doc).await
    }
    async fn get_document_by_id(&self, id: &str) -> Result<Option<Document>> {
        let conn = self.db.connect().await?;
        DocumentRepository::get_by_id(&conn, id).await
    }
    async fn get_documents_by_ids(&self, ids: &[String]) -> Result<Vec<Document>> {
        let conn = self.db.connect().await?;
        DocumentRepository::get_by_ids(&conn, ids).await
    }
}

#[async_trait]
impl ChunkStore for LibSqlBackend {
    async fn save_chunks(&self, chunks: &[Chunk]) -> Result<u64> {
        let conn = self.db.connect().await?;
        ChunkRepository::save_all(&conn, chunks).await
    }
    async fn get_chunk(&self, project_id: &str, id: &str) -> Result<Option<Chunk>> {
        let conn = self.db.connect().await?;
        ChunkRepository::get_by_id(&conn, project_id, id).await
    }
    async fn update_chunk(&self, chunk: &Chunk) -> Result<bool> {
        let conn = self.db.connect().await?;
        ChunkRepository::update(&conn, chunk).await
    }
    async fn delete_chunks(&self, project_id: &str, ids: &[String]) -> Result<u64> {
        let conn = self.db.connect().await?;
        ChunkRepository::delete_many(&conn, project_id, ids).await
    }
    async fn merge_chunks(
        &self,
        project_id: &str,
        source_id: &str,
        target_id: &str,
    ) -> Result<MergeResult> {
        let conn = self.db.connect().await?;
        ChunkRepository::merge(&conn, project_id, source_id, target_id).await
    }
    async fn list_chunks(
        &self,
        project_id: &str,
        req: &ListChunksRequest,
        limit: u32,
        offset: u32,
    ) -> Result<(Vec<ChunkListItem>, u32)> {
        let conn = self.db.connect().await?;
        ChunkRepository::list(&conn, project_id, req, limit, offset).await
    }
}

#[async_trait]
impl QuestionStore for LibSqlBackend {
    async fn create_question(&self, question: &Question) -> Result<()> {
        let conn = self.db.connect().await?;
        QuestionRepository::create(&conn, question).await
    }
    async fn list_questions_by_context(
        &self,
        project_id: &str,
        context_id: &str,
    ) -> Result<Vec<Question>> {
        let conn = self.db.connect().await?;
        QuestionRepository::list_by_context(&conn, project_id, context_id).await
    }
}

#[async_trait]
impl ChatStore for LibSqlBackend {
    async fn create_chat(&self, chat: &Chat) -> Result<()> {
        let conn = self.db.connect().await?;
        ChatRepository::create(&conn, chat).await
    }
    async fn get_chat(&self, project_id: &str, id: &str) -> Result<Option<Chat>> {
        let conn = self.db.connect().await?;
        ChatRepository::get_by_id(&conn, project_id, id).await
    }
    async fn delete_chat(&self, project_id: &str, id: &str) -> Result<bool> {
        let conn = self.db.connect().await?;
        ChatRepository::delete(&conn, project_id, id).await
    }
    async fn list_chats(
        &self,
        owner_id: &str,
        project_id: &str,
        limit: u32,
        cursor: Option<&ChatCursor>,
    ) -> Result<(Vec<Chat>, bool)> {
        let conn = self.db.connect().await?;
        ChatRepository::list_page(&conn, owner_id, project_id, limit, cursor).await
    }
    async fn save_messages(&self, messages: &[ChatMessage]) -> Result<()> {
        let conn = self.db.connect().await?;
        ChatRepository::save_messages(&conn, messages).await
    }
    async fn get_messages(&self, chat_id: &str) -> Result<Vec<ChatMessage>> {
        let conn = self.db.connect().await?;
        ChatRepository::get_messages(&conn, chat_id).await
    }
    async fn message_exists(&self, chat_id: &str, message_id: &str) -> Result<bool> {
        let conn = self.db.connect().await?;
        ChatRepository::message_exists(&conn, chat_id, message_id).await
    }
    async fn upsert_vote(&self, vote: &Vote) -> Result<()> {
        let conn = self.db.connect().await?;
        ChatRepository::upsert_vote(&conn, vote).await
    }
    async fn get_votes(&self, chat_id: &str) -> Result<Vec<Vote>> {
        let conn = self.db.connect().await?;
        ChatRepository::get_votes(&conn, chat_id).await
    }
}

#[async_trait]
impl DatabaseBackend for LibSqlBackend {
    async fn ping(&self) -> Result<()> {
        let conn = self.db.connect().await?;
        conn.query("SELECT 1", ()).await?;
        Ok(())
    }
}
