use async_trait::async_trait;

use crate::error::Result;
use crate::models::{
    Chat, ChatCursor, ChatMessage, Chunk, ChunkListItem, Document, ListChunksRequest,
    MergeResult, Question, Vote,
};

/// Registered source documents.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn create_document(&self, doc: &Document) -> Result<()>;
    async fn get_document_by_id(&self, id: &str) -> Result<Option<Document>>;
    async fn get_documents_by_ids(&self, ids: &[String]) -> Result<Vec<Document>>;
}

/// Chunk records and the atomic operations over them.
#[async_trait]
pub trait ChunkStore: Send + Sync {
    /// Insert all chunks in one transaction, skipping ids already stored.
    async fn save_chunks(&self, chunks: &[Chunk]) -> Result<u64>;
    async fn get_chunk(&self, project_id: &str, id: &str) -> Result<Option<Chunk>>;
    async fn update_chunk(&self, chunk: &Chunk) -> Result<bool>;
    /// Delete chunks and their questions in one transaction.
    async fn delete_chunks(&self, project_id: &str, ids: &[String]) -> Result<u64>;
    async fn merge_chunks(
        &self,
        project_id: &str,
        source_id: &str,
        target_id: &str,
    ) -> Result<MergeResult>;
    async fn list_chunks(
        &self,
        project_id: &str,
        req: &ListChunksRequest,
        limit: u32,
        offset: u32,
    ) -> Result<(Vec<ChunkListItem>, u32)>;
}

#[async_trait]
pub trait QuestionStore: Send + Sync {
    async fn create_question(&self, question: &Question) -> Result<()>;
    async fn list_questions_by_context(
        &self,
        project_id: &str,
        context_id: &str,
    ) -> Result<Vec<Question>>;
}

#[async_trait]
pub trait ChatStore: Send + Sync {
    async fn create_chat(&self, chat: &Chat) -> Result<()>;
    async fn get_chat(&self, project_id: &str, id: &str) -> Result<Option<Chat>>;
    async fn delete_chat(&self, project_id: &str, id: &str) -> Result<bool>;
    async fn list_chats(
        &self,
        owner_id: &str,
        project_id: &str,
        limit: u32,
        cursor: Option<&ChatCursor>,
    ) -> Result<(Vec<Chat>, bool)>;
    async fn save_messages(&self, messages: &[ChatMessage]) -> Result<()>;
    async fn get_messages(&self, chat_id: &str) -> Result<Vec<ChatMessage>>;
    async fn message_exists(&self, chat_id: &str, message_id: &str) -> Result<bool>;
    async fn upsert_vote(&self, vote: &Vote) -> Result<()>;
    async fn get_votes(&self, chat_id: &str) -> Result<Vec<Vote>>;
}

/// Everything the services need from storage.
#[async_trait]
pub trait DatabaseBackend: DocumentStore + ChunkStore + QuestionStore + ChatStore {
    /// Cheap round trip used by the health check.
    async fn ping(&self) -> Result<()>;
}
