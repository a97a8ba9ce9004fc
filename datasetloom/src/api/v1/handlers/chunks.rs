//! v1 Chunk handlers.
//!
//! Preview/save is a two-step commit: `chunks:preview` caches the generated
//! chunks under a config hash, `chunks:save` persists exactly that list.

use axum::extract::{Path, State};
use axum_extra::extract::Query;

use crate::api::v1::dto::{
    BatchDeleteChunksRequest, ChunkConfigRequest, ChunkListItemResponse, ChunkPreviewResponse,
    ChunkResponse, DeleteChunksResponse, GenerateChunksResponse, ListChunksQuery,
    ListChunksResponse, MergeChunksRequest, MergeChunksResponse, SaveChunksRequest,
    SaveChunksResponse, UpdateChunkRequest,
};
use crate::api::v1::response::{ApiError, ApiResponse, ErrorCode, ResponseMeta};
use crate::api::{AppJson, AppState};

/// `POST /api/v1/projects/{projectId}/chunks:preview`
#[utoipa::path(
    post,
    path = "/api/v1/projects/{projectId}/chunks:preview",
    tag = "chunks",
    operation_id = "chunks.preview",
    params(("projectId" = String, Path, description = "Project ID")),
    request_body = ChunkConfigRequest,
    responses(
        (status = 200, description = "Chunks generated or served from cache", body = ChunkPreviewResponse),
        (status = 400, description = "Invalid chunking configuration", body = ApiError),
    )
)]
pub async fn preview_chunks(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
    AppJson(req): AppJson<ChunkConfigRequest>,
) -> ApiResponse<ChunkPreviewResponse> {
    let config = req.into_config(&state.config.chunking);
    match state.chunks.create(&project_id, &config).await {
        Ok(preview) => ApiResponse::success(ChunkPreviewResponse::from(preview)),
        Err(e) => e.into(),
    }
}

/// `POST /api/v1/projects/{projectId}/chunks:save`
#[utoipa::path(
    post,
    path = "/api/v1/projects/{projectId}/chunks:save",
    tag = "chunks",
    operation_id = "chunks.save",
    params(("projectId" = String, Path, description = "Project ID")),
    request_body = SaveChunksRequest,
    responses(
        (status = 201, description = "Previewed chunks persisted", body = SaveChunksResponse),
        (status = 409, description = "Preview expired or never generated", body = ApiError),
    )
)]
pub async fn save_chunks(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
    AppJson(req): AppJson<SaveChunksRequest>,
) -> ApiResponse<SaveChunksResponse> {
    if req.hash.trim().is_empty() {
        return ApiResponse::error(ErrorCode::InvalidRequest, "hash cannot be empty");
    }

    match state.chunks.save(&project_id, &req.hash).await {
        Ok(saved) => ApiResponse::created(SaveChunksResponse::from(saved)),
        Err(e) => e.into(),
    }
}

/// `POST /api/v1/projects/{projectId}/chunks:generate`
///
/// Chunks and persists in one step, bypassing the preview cache.
#[utoipa::path(
    post,
    path = "/api/v1/projects/{projectId}/chunks:generate",
    tag = "chunks",
    operation_id = "chunks.generate",
    params(("projectId" = String, Path, description = "Project ID")),
    request_body = ChunkConfigRequest,
    responses(
        (status = 201, description = "Chunks generated and persisted", body = GenerateChunksResponse),
        (status = 400, description = "Invalid chunking configuration", body = ApiError),
    )
)]
pub async fn generate_chunks(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
    AppJson(req): AppJson<ChunkConfigRequest>,
) -> ApiResponse<GenerateChunksResponse> {
    let config = req.into_config(&state.config.chunking);
    match state.chunks.chunk_and_save(&project_id, &config).await {
        Ok(run) => ApiResponse::created(GenerateChunksResponse::from(run)),
        Err(e) => e.into(),
    }
}

/// `POST /api/v1/projects/{projectId}/chunks:merge`
#[utoipa::path(
    post,
    path = "/api/v1/projects/{projectId}/chunks:merge",
    tag = "chunks",
    operation_id = "chunks.merge",
    params(("projectId" = String, Path, description = "Project ID")),
    request_body = MergeChunksRequest,
    responses(
        (status = 200, description = "Source merged into target", body = MergeChunksResponse),
        (status = 400, description = "Source and target are the same chunk", body = ApiError),
        (status = 404, description = "Source or target not found", body = ApiError),
    )
)]
pub async fn merge_chunks(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
    AppJson(req): AppJson<MergeChunksRequest>,
) -> ApiResponse<MergeChunksResponse> {
    match state
        .chunks
        .merge_chunks(&project_id, &req.source_chunk_id, &req.target_chunk_id)
        .await
    {
        Ok(result) => ApiResponse::success(MergeChunksResponse::from(result)),
        Err(e) => e.into(),
    }
}

/// `POST /api/v1/projects/{projectId}/chunks:batchDelete`
#[utoipa::path(
    post,
    path = "/api/v1/projects/{projectId}/chunks:batchDelete",
    tag = "chunks",
    operation_id = "chunks.batchDelete",
    params(("projectId" = String, Path, description = "Project ID")),
    request_body = BatchDeleteChunksRequest,
    responses(
        (status = 200, description = "Chunks and their questions deleted", body = DeleteChunksResponse),
    )
)]
pub async fn batch_delete_chunks(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
    AppJson(req): AppJson<BatchDeleteChunksRequest>,
) -> ApiResponse<DeleteChunksResponse> {
    match state.chunks.delete_chunks(&project_id, &req.chunk_ids).await {
        Ok(deleted) => ApiResponse::success(DeleteChunksResponse { deleted }),
        Err(e) => e.into(),
    }
}

/// `GET /api/v1/projects/{projectId}/chunks`
#[utoipa::path(
    get,
    path = "/api/v1/projects/{projectId}/chunks",
    tag = "chunks",
    operation_id = "chunks.list",
    params(("projectId" = String, Path, description = "Project ID"), ListChunksQuery),
    responses(
        (status = 200, description = "Chunks listed", body = ListChunksResponse),
        (status = 400, description = "Invalid filter", body = ApiError),
    )
)]
pub async fn list_chunks(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
    Query(query): Query<ListChunksQuery>,
) -> ApiResponse<ListChunksResponse> {
    let req = match query.into_request() {
        Ok(req) => req,
        Err(msg) => return ApiResponse::error(ErrorCode::InvalidRequest, msg),
    };

    match state.chunks.get_list_pagination(&project_id, &req).await {
        Ok((items, pagination)) => ApiResponse::success_with_meta(
            ListChunksResponse {
                chunks: items.into_iter().map(ChunkListItemResponse::from).collect(),
            },
            ResponseMeta::from(pagination),
        ),
        Err(e) => e.into(),
    }
}

/// `GET /api/v1/projects/{projectId}/chunks/{chunkId}`
#[utoipa::path(
    get,
    path = "/api/v1/projects/{projectId}/chunks/{chunkId}",
    tag = "chunks",
    operation_id = "chunks.get",
    params(
        ("projectId" = String, Path, description = "Project ID"),
        ("chunkId" = String, Path, description = "Chunk ID"),
    ),
    responses(
        (status = 200, description = "Chunk found", body = ChunkResponse),
        (status = 404, description = "Chunk not found", body = ApiError),
    )
)]
pub async fn get_chunk(
    State(state): State<AppState>,
    Path((project_id, chunk_id)): Path<(String, String)>,
) -> ApiResponse<ChunkResponse> {
    match state.chunks.get_chunk(&project_id, &chunk_id).await {
        Ok(chunk) => ApiResponse::success(ChunkResponse::from(chunk)),
        Err(e) => e.into(),
    }
}

/// `PATCH /api/v1/projects/{projectId}/chunks/{chunkId}`
#[utoipa::path(
    patch,
    path = "/api/v1/projects/{projectId}/chunks/{chunkId}",
    tag = "chunks",
    operation_id = "chunks.update",
    params(
        ("projectId" = String, Path, description = "Project ID"),
        ("chunkId" = String, Path, description = "Chunk ID"),
    ),
    request_body = UpdateChunkRequest,
    responses(
        (status = 200, description = "Chunk updated", body = ChunkResponse),
        (status = 400, description = "Content empty after normalization", body = ApiError),
        (status = 404, description = "Chunk not found", body = ApiError),
    )
)]
pub async fn update_chunk(
    State(state): State<AppState>,
    Path((project_id, chunk_id)): Path<(String, String)>,
    AppJson(req): AppJson<UpdateChunkRequest>,
) -> ApiResponse<ChunkResponse> {
    match state
        .chunks
        .update_chunk(&project_id, &chunk_id, req.into())
        .await
    {
        Ok(chunk) => ApiResponse::success(ChunkResponse::from(chunk)),
        Err(e) => e.into(),
    }
}

/// `DELETE /api/v1/projects/{projectId}/chunks/{chunkId}`
#[utoipa::path(
    delete,
    path = "/api/v1/projects/{projectId}/chunks/{chunkId}",
    tag = "chunks",
    operation_id = "chunks.delete",
    params(
        ("projectId" = String, Path, description = "Project ID"),
        ("chunkId" = String, Path, description = "Chunk ID"),
    ),
    responses(
        (status = 200, description = "Chunk deleted", body = DeleteChunksResponse),
        (status = 404, description = "Chunk not found", body = ApiError),
    )
)]
pub async fn delete_chunk(
    State(state): State<AppState>,
    Path((project_id, chunk_id)): Path<(String, String)>,
) -> ApiResponse<DeleteChunksResponse> {
    match state.chunks.delete_chunk(&project_id, &chunk_id).await {
        Ok(()) => ApiResponse::success(DeleteChunksResponse { deleted: 1 }),
        Err(e) => e.into(),
    }
}
