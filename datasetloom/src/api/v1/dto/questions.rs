//! Question DTOs for the v1 API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models;

/// Request body for `POST .../chunks/{chunkId}/questions`.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuestionRequest {
    pub question: String,
    /// The question as originally phrased, before any rewriting.
    pub real_question: Option<String>,
    pub label: Option<String>,
    /// Extra context handed to answer generation.
    pub context_data: Option<String>,
}

impl From<CreateQuestionRequest> for models::CreateQuestionRequest {
    fn from(req: CreateQuestionRequest) -> Self {
        Self {
            question: req.question,
            real_question: req.real_question,
            label: req.label,
            context_data: req.context_data,
        }
    }
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResponse {
    pub question_id: String,
    pub project_id: String,
    /// The chunk this question was asked about.
    pub chunk_id: String,
    /// The chunk's name at the time of the last merge or creation.
    pub chunk_name: String,
    pub question: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub real_question: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_data: Option<String>,
    pub answered: bool,
    #[schema(value_type = String)]
    pub created_at: DateTime<Utc>,
}

impl From<models::Question> for QuestionResponse {
    fn from(q: models::Question) -> Self {
        Self {
            question_id: q.id,
            project_id: q.project_id,
            chunk_id: q.context_id,
            chunk_name: q.context_name,
            question: q.question,
            real_question: q.real_question,
            label: q.label,
            context_data: q.context_data,
            answered: q.answered,
            created_at: q.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListQuestionsResponse {
    pub questions: Vec<QuestionResponse>,
}
