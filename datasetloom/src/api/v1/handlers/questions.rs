//! v1 Question handlers.

use axum::extract::{Path, State};

use crate::api::v1::dto::{CreateQuestionRequest, ListQuestionsResponse, QuestionResponse};
use crate::api::v1::response::{ApiError, ApiResponse};
use crate::api::{AppJson, AppState};

/// `POST /api/v1/projects/{projectId}/chunks/{chunkId}/questions`
#[utoipa::path(
    post,
    path = "/api/v1/projects/{projectId}/chunks/{chunkId}/questions",
    tag = "questions",
    operation_id = "questions.create",
    params(
        ("projectId" = String, Path, description = "Project ID"),
        ("chunkId" = String, Path, description = "Chunk ID"),
    ),
    request_body = CreateQuestionRequest,
    responses(
        (status = 201, description = "Question created", body = QuestionResponse),
        (status = 404, description = "Chunk not found", body = ApiError),
    )
)]
pub async fn create_question(
    State(state): State<AppState>,
    Path((project_id, chunk_id)): Path<(String, String)>,
    AppJson(req): AppJson<CreateQuestionRequest>,
) -> ApiResponse<QuestionResponse> {
    match state
        .questions
        .create_question(&project_id, &chunk_id, req.into())
        .await
    {
        Ok(question) => ApiResponse::created(QuestionResponse::from(question)),
        Err(e) => e.into(),
    }
}

/// `GET /api/v1/projects/{projectId}/chunks/{chunkId}/questions`
#[utoipa::path(
    get,
    path = "/api/v1/projects/{projectId}/chunks/{chunkId}/questions",
    tag = "questions",
    operation_id = "questions.listByChunk",
    params(
        ("projectId" = String, Path, description = "Project ID"),
        ("chunkId" = String, Path, description = "Chunk ID"),
    ),
    responses(
        (status = 200, description = "Questions listed", body = ListQuestionsResponse),
        (status = 404, description = "Chunk not found", body = ApiError),
    )
)]
pub async fn list_questions(
    State(state): State<AppState>,
    Path((project_id, chunk_id)): Path<(String, String)>,
) -> ApiResponse<ListQuestionsResponse> {
    match state
        .questions
        .list_questions_by_chunk(&project_id, &chunk_id)
        .await
    {
        Ok(questions) => ApiResponse::success(ListQuestionsResponse {
            questions: questions.into_iter().map(QuestionResponse::from).collect(),
        }),
        Err(e) => e.into(),
    }
}
