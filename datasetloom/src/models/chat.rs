use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{LoomError, Result};

use super::Visibility;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chat {
    pub id: String,
    pub user_id: String,
    pub project_id: String,
    pub title: String,
    pub visibility: Visibility,
    pub created_at: DateTime<Utc>,
}

impl Chat {
    pub fn new(id: String, user_id: String, project_id: String, title: String) -> Self {
        Self {
            id,
            user_id,
            project_id,
            title,
            visibility: Visibility::default(),
            created_at: super::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    User,
    Assistant,
    System,
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
            Self::System => write!(f, "system"),
        }
    }
}

impl std::str::FromStr for MessageRole {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Self::User),
            "assistant" => Ok(Self::Assistant),
            "system" => Ok(Self::System),
            _ => Err(format!("Unknown message role: {s}")),
        }
    }
}

/// A single chat turn. `content` holds the structured message parts as JSON.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub id: String,
    pub chat_id: String,
    pub role: MessageRole,
    pub content: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Vote {
    pub chat_id: String,
    pub message_id: String,
    pub is_upvoted: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateChatRequest {
    pub id: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[serde(default)]
    pub visibility: Visibility,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewChatMessage {
    pub id: Option<String>,
    pub role: MessageRole,
    pub content: serde_json::Value,
}

/// Position in the chat listing a page is anchored to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCursor {
    /// Records listed after this id (older).
    StartingAfter(String),
    /// Records listed before this id (newer).
    EndingBefore(String),
}

impl ChatCursor {
    pub fn id(&self) -> &str {
        match self {
            Self::StartingAfter(id) | Self::EndingBefore(id) => id,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListChatsRequest {
    pub owner_id: String,
    pub project_id: String,
    pub limit: Option<u32>,
    pub starting_after: Option<String>,
    pub ending_before: Option<String>,
}

impl ListChatsRequest {
    /// Resolve the cursor pair. Setting both is rejected before any query runs.
    pub fn cursor(&self) -> Result<Option<ChatCursor>> {
        match (&self.starting_after, &self.ending_before) {
            (Some(_), Some(_)) => Err(LoomError::InvalidOperation(
                "Only one of starting_after or ending_before may be provided".to_string(),
            )),
            (Some(id), None) => Ok(Some(ChatCursor::StartingAfter(id.clone()))),
            (None, Some(id)) => Ok(Some(ChatCursor::EndingBefore(id.clone()))),
            (None, None) => Ok(None),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatPage {
    pub chats: Vec<Chat>,
    pub has_more: bool,
}
