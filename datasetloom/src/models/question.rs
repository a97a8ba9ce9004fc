use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::ContextType;

/// A training question anchored to a chunk (or image) through `context_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Question {
    pub id: String,
    pub project_id: String,
    pub context_id: String,
    pub context_type: ContextType,
    pub context_data: Option<String>,
    pub context_name: String,
    pub question: String,
    pub real_question: Option<String>,
    pub label: Option<String>,
    pub answered: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Question {
    pub fn new(
        id: String,
        project_id: String,
        context_id: String,
        context_name: String,
        question: String,
    ) -> Self {
        let now = super::now();
        Self {
            id,
            project_id,
            context_id,
            context_type: ContextType::Text,
            context_data: None,
            context_name,
            question,
            real_question: None,
            label: None,
            answered: false,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateQuestionRequest {
    #[validate(length(min = 1, max = 4000))]
    pub question: String,
    pub real_question: Option<String>,
    pub label: Option<String>,
    pub context_data: Option<String>,
}
