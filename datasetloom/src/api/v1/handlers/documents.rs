//! v1 Document handlers.

use axum::extract::{Path, State};

use crate::api::v1::dto::{DocumentResponse, RegisterDocumentRequest};
use crate::api::v1::response::{ApiError, ApiResponse};
use crate::api::{AppJson, AppState};

/// `POST /api/v1/projects/{projectId}/documents`
#[utoipa::path(
    post,
    path = "/api/v1/projects/{projectId}/documents",
    tag = "documents",
    operation_id = "documents.register",
    params(("projectId" = String, Path, description = "Project ID")),
    request_body = RegisterDocumentRequest,
    responses(
        (status = 201, description = "Document registered", body = DocumentResponse),
        (status = 400, description = "Invalid request", body = ApiError),
    )
)]
pub async fn register_document(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
    AppJson(req): AppJson<RegisterDocumentRequest>,
) -> ApiResponse<DocumentResponse> {
    match state
        .chunks
        .register_document(&project_id, req.into())
        .await
    {
        Ok(doc) => ApiResponse::created(DocumentResponse::from(doc)),
        Err(e) => e.into(),
    }
}

/// `GET /api/v1/projects/{projectId}/documents/{documentId}`
#[utoipa::path(
    get,
    path = "/api/v1/projects/{projectId}/documents/{documentId}",
    tag = "documents",
    operation_id = "documents.get",
    params(
        ("projectId" = String, Path, description = "Project ID"),
        ("documentId" = String, Path, description = "Document ID"),
    ),
    responses(
        (status = 200, description = "Document found", body = DocumentResponse),
        (status = 404, description = "Document not found", body = ApiError),
    )
)]
pub async fn get_document(
    State(state): State<AppState>,
    Path((project_id, document_id)): Path<(String, String)>,
) -> ApiResponse<DocumentResponse> {
    match state.chunks.get_document(&project_id, &document_id).await {
        Ok(doc) => ApiResponse::success(DocumentResponse::from(doc)),
        Err(e) => e.into(),
    }
}
