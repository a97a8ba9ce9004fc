//! Chat, message and vote DTOs for the v1 API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::{V1MessageRole, V1Visibility};
use crate::models;

// ---------------------------------------------------------------------------
// Request DTOs
// ---------------------------------------------------------------------------

/// Request body for `POST .../chats`.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateChatRequest {
    /// Client-chosen id. A nanoid is generated when absent.
    pub id: Option<String>,
    /// Owner of the chat.
    pub user_id: String,
    pub title: String,
    #[serde(default)]
    pub visibility: V1Visibility,
}

impl From<CreateChatRequest> for models::CreateChatRequest {
    fn from(req: CreateChatRequest) -> Self {
        Self {
            id: req.id,
            title: req.title,
            visibility: req.visibility.into(),
        }
    }
}

/// Query parameters for `GET .../chats`.
///
/// `startingAfter` and `endingBefore` are chat ids taken from a previous
/// page; at most one may be set.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListChatsQuery {
    /// Chats owned by this user, plus public chats in the project.
    pub user_id: String,
    /// Page size (default 20, max 100).
    pub limit: Option<u32>,
    /// Return chats older than this one.
    pub starting_after: Option<String>,
    /// Return chats newer than this one.
    pub ending_before: Option<String>,
}

impl ListChatsQuery {
    pub fn into_request(self, project_id: String) -> models::ListChatsRequest {
        models::ListChatsRequest {
            owner_id: self.user_id,
            project_id,
            limit: self.limit,
            starting_after: self.starting_after,
            ending_before: self.ending_before,
        }
    }
}

#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MessageInput {
    pub id: Option<String>,
    pub role: V1MessageRole,
    /// Message body. Usually a string or an array of content parts.
    #[schema(value_type = Object)]
    pub content: serde_json::Value,
}

/// Request body for `POST .../chats/{chatId}/messages`.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveMessagesRequest {
    pub messages: Vec<MessageInput>,
}

impl SaveMessagesRequest {
    pub fn into_messages(self) -> Vec<models::NewChatMessage> {
        self.messages
            .into_iter()
            .map(|m| models::NewChatMessage {
                id: m.id,
                role: m.role.into(),
                content: m.content,
            })
            .collect()
    }
}

/// Request body for `PATCH .../chats/{chatId}/votes`.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VoteMessageRequest {
    pub message_id: String,
    /// `"up"` or `"down"`.
    #[serde(rename = "type")]
    pub vote_type: VoteType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum VoteType {
    Up,
    Down,
}

// ---------------------------------------------------------------------------
// Response DTOs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub chat_id: String,
    pub user_id: String,
    pub project_id: String,
    pub title: String,
    pub visibility: V1Visibility,
    #[schema(value_type = String)]
    pub created_at: DateTime<Utc>,
}

impl From<models::Chat> for ChatResponse {
    fn from(chat: models::Chat) -> Self {
        Self {
            chat_id: chat.id,
            user_id: chat.user_id,
            project_id: chat.project_id,
            title: chat.title,
            visibility: chat.visibility.into(),
            created_at: chat.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListChatsResponse {
    pub chats: Vec<ChatResponse>,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub message_id: String,
    pub chat_id: String,
    pub role: V1MessageRole,
    #[schema(value_type = Object)]
    pub content: serde_json::Value,
    #[schema(value_type = String)]
    pub created_at: DateTime<Utc>,
}

impl From<models::ChatMessage> for MessageResponse {
    fn from(m: models::ChatMessage) -> Self {
        Self {
            message_id: m.id,
            chat_id: m.chat_id,
            role: m.role.into(),
            content: m.content,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListMessagesResponse {
    pub messages: Vec<MessageResponse>,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VoteResponse {
    pub chat_id: String,
    pub message_id: String,
    pub is_upvoted: bool,
}

impl From<models::Vote> for VoteResponse {
    fn from(v: models::Vote) -> Self {
        Self {
            chat_id: v.chat_id,
            message_id: v.message_id,
            is_upvoted: v.is_upvoted,
        }
    }
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListVotesResponse {
    pub votes: Vec<VoteResponse>,
}
