//! Shared DTO types used across multiple v1 API endpoints.

use serde::{Deserialize, Serialize};

use crate::models::{MessageRole, Visibility};

/// Who may see a chat besides its owner.
///
/// Wire format: `"public"` or `"private"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum V1Visibility {
    Public,
    #[default]
    Private,
}

impl From<Visibility> for V1Visibility {
    fn from(v: Visibility) -> Self {
        match v {
            Visibility::Public => V1Visibility::Public,
            Visibility::Private => V1Visibility::Private,
        }
    }
}

impl From<V1Visibility> for Visibility {
    fn from(v: V1Visibility) -> Self {
        match v {
            V1Visibility::Public => Visibility::Public,
            V1Visibility::Private => Visibility::Private,
        }
    }
}

/// Author of a chat message.
///
/// Wire format: `"user"`, `"assistant"` or `"system"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum V1MessageRole {
    User,
    Assistant,
    System,
}

impl From<MessageRole> for V1MessageRole {
    fn from(role: MessageRole) -> Self {
        match role {
            MessageRole::User => V1MessageRole::User,
            MessageRole::Assistant => V1MessageRole::Assistant,
            MessageRole::System => V1MessageRole::System,
        }
    }
}

impl From<V1MessageRole> for MessageRole {
    fn from(role: V1MessageRole) -> Self {
        match role {
            V1MessageRole::User => MessageRole::User,
            V1MessageRole::Assistant => MessageRole::Assistant,
            V1MessageRole::System => MessageRole::System,
        }
    }
}
