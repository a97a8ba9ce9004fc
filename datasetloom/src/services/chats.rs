use std::sync::Arc;

use chrono::Duration;
use nanoid::nanoid;
use validator::Validate;

use crate::config::PaginationConfig;
use crate::db::DatabaseBackend;
use crate::error::{LoomError, Result};
use crate::models::{
    now, Chat, ChatMessage, ChatPage, CreateChatRequest, ListChatsRequest, NewChatMessage, Vote,
};

pub struct ChatService {
    db: Arc<dyn DatabaseBackend>,
    pagination: PaginationConfig,
}

impl ChatService {
    pub fn new(db: Arc<dyn DatabaseBackend>, pagination: PaginationConfig) -> Self {
        Self { db, pagination }
    }

    pub async fn create_chat(
        &self,
        project_id: &str,
        user_id: &str,
        req: CreateChatRequest,
    ) -> Result<Chat> {
        req.validate()?;

        let id = req.id.filter(|id| !id.trim().is_empty()).unwrap_or_else(|| nanoid!());
        let mut chat = Chat::new(id, user_id.to_string(), project_id.to_string(), req.title);
        chat.visibility = req.visibility;

        self.db.create_chat(&chat).await?;
        Ok(chat)
    }

    pub async fn get_chat(&self, project_id: &str, id: &str) -> Result<Chat> {
        self.db
            .get_chat(project_id, id)
            .await?
            .ok_or_else(|| LoomError::NotFound(format!("Chat {id} not found")))
    }

    pub async fn delete_chat(&self, project_id: &str, id: &str) -> Result<()> {
        if !self.db.delete_chat(project_id, id).await? {
            return Err(LoomError::NotFound(format!("Chat {id} not found")));
        }
        tracing::info!(project_id = %project_id, chat_id = %id, "Chat deleted");
        Ok(())
    }

    /// Cursor-paginated chats the owner can see, newest first.
    pub async fn get_chats_by_user_id(&self, req: &ListChatsRequest) -> Result<ChatPage> {
        let cursor = req.cursor()?;
        let limit = self.pagination.clamp(req.limit);

        let (chats, has_more) = self
            .db
            .list_chats(&req.owner_id, &req.project_id, limit, cursor.as_ref())
            .await?;

        Ok(ChatPage { chats, has_more })
    }

    /// Append messages to a chat. Timestamps are spaced one microsecond apart
    /// so the stored order matches the submitted order.
    pub async fn save_messages(
        &self,
        project_id: &str,
        chat_id: &str,
        messages: Vec<NewChatMessage>,
    ) -> Result<Vec<ChatMessage>> {
        self.get_chat(project_id, chat_id).await?;

        let base = now();
        let messages: Vec<ChatMessage> = messages
            .into_iter()
            .enumerate()
            .map(|(i, message)| ChatMessage {
                id: message.id.unwrap_or_else(|| nanoid!()),
                chat_id: chat_id.to_string(),
                role: message.role,
                content: message.content,
                created_at: base + Duration::microseconds(i as i64),
            })
            .collect();

        self.db.save_messages(&messages).await?;
        Ok(messages)
    }

    pub async fn get_messages(&self, project_id: &str, chat_id: &str) -> Result<Vec<ChatMessage>> {
        self.get_chat(project_id, chat_id).await?;
        self.db.get_messages(chat_id).await
    }

    pub async fn vote_message(
        &self,
        project_id: &str,
        chat_id: &str,
        message_id: &str,
        is_upvoted: bool,
    ) -> Result<Vote> {
        self.get_chat(project_id, chat_id).await?;
        if !self.db.message_exists(chat_id, message_id).await? {
            return Err(LoomError::NotFound(format!(
                "Message {message_id} not found in chat {chat_id}"
            )));
        }

        let vote = Vote {
            chat_id: chat_id.to_string(),
            message_id: message_id.to_string(),
            is_upvoted,
        };
        self.db.upsert_vote(&vote).await?;
        Ok(vote)
    }

    pub async fn get_votes(&self, project_id: &str, chat_id: &str) -> Result<Vec<Vote>> {
        self.get_chat(project_id, chat_id).await?;
        self.db.get_votes(chat_id).await
    }
}
