//! Chunk request/response DTOs for the v1 API.
//!
//! Covers the preview/save workflow, merging, listing, and single-chunk CRUD.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::ChunkingConfig;
use crate::models;

// ---------------------------------------------------------------------------
// Request DTOs
// ---------------------------------------------------------------------------

/// Request body for `POST .../chunks:preview` and `POST .../chunks:generate`.
///
/// Omitted fields fall back to the server's chunking defaults.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChunkConfigRequest {
    /// Documents to chunk. Duplicates are ignored.
    pub file_ids: Vec<String>,
    /// `recursive`, `character`, `markdown`, `semantic` or `sentence`.
    pub strategy: Option<String>,
    /// Split boundaries, tried in order by the recursive strategy.
    pub separators: Option<Vec<String>>,
    /// Maximum chunk length in characters.
    pub chunk_size: Option<usize>,
    /// Characters shared between neighbouring chunks. Must be below `chunkSize`.
    pub chunk_overlap: Option<usize>,
}

impl ChunkConfigRequest {
    pub fn into_config(self, defaults: &ChunkingConfig) -> models::ChunkGenerationConfig {
        models::ChunkGenerationConfig {
            file_ids: self.file_ids,
            strategy: self
                .strategy
                .unwrap_or_else(|| defaults.default_strategy.clone()),
            separators: self
                .separators
                .unwrap_or_else(|| defaults.separators.clone()),
            chunk_size: self.chunk_size.unwrap_or(defaults.chunk_size),
            chunk_overlap: self.chunk_overlap.unwrap_or(defaults.chunk_overlap),
        }
    }
}

/// Request body for `POST .../chunks:save`.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveChunksRequest {
    /// Hash returned by a previous preview.
    pub hash: String,
}

/// Request body for `POST .../chunks:merge`.
///
/// The source chunk's content is appended to the target, its questions move
/// to the target, and the source is deleted.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MergeChunksRequest {
    pub source_chunk_id: String,
    pub target_chunk_id: String,
}

/// Request body for `POST .../chunks:batchDelete`.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BatchDeleteChunksRequest {
    pub chunk_ids: Vec<String>,
}

/// Request body for `PATCH .../chunks/{chunkId}`.
#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateChunkRequest {
    /// New content. Normalized before it is stored.
    pub content: Option<String>,
    pub tags: Option<String>,
    pub domain: Option<String>,
    pub sub_domain: Option<String>,
}

impl From<UpdateChunkRequest> for models::UpdateChunkRequest {
    fn from(req: UpdateChunkRequest) -> Self {
        Self {
            content: req.content,
            tags: req.tags,
            domain: req.domain,
            sub_domain: req.sub_domain,
        }
    }
}

/// Query parameters for `GET .../chunks`.
#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListChunksQuery {
    /// Restrict to these documents. Repeat the parameter for several ids.
    #[serde(default)]
    pub document_ids: Vec<String>,
    /// Substring match on chunk content or name.
    pub keyword: Option<String>,
    /// `all` (default), `generated` or `ungenerated`.
    pub status: Option<String>,
    /// 1-based page number.
    pub page: Option<u32>,
    /// Page size (default 20, max 100).
    pub limit: Option<u32>,
}

impl ListChunksQuery {
    pub fn into_request(self) -> Result<models::ListChunksRequest, String> {
        let status = match self.status.as_deref() {
            Some(s) => s.parse()?,
            None => models::ChunkQuestionStatus::All,
        };
        Ok(models::ListChunksRequest {
            document_ids: (!self.document_ids.is_empty()).then_some(self.document_ids),
            keyword: self.keyword.filter(|k| !k.trim().is_empty()),
            status,
            page: self.page,
            limit: self.limit,
        })
    }
}

// ---------------------------------------------------------------------------
// Response DTOs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChunkResponse {
    pub chunk_id: String,
    pub project_id: String,
    pub document_id: String,
    pub document_name: String,
    /// `{fileStem}-chunk-{n}`.
    pub name: String,
    pub content: String,
    /// Character count of `content`.
    pub size: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_domain: Option<String>,
    #[schema(value_type = String)]
    pub created_at: DateTime<Utc>,
    #[schema(value_type = String)]
    pub updated_at: DateTime<Utc>,
}

impl From<models::Chunk> for ChunkResponse {
    fn from(chunk: models::Chunk) -> Self {
        Self {
            chunk_id: chunk.id,
            project_id: chunk.project_id,
            document_id: chunk.document_id,
            document_name: chunk.document_name,
            name: chunk.name,
            content: chunk.content,
            size: chunk.size,
            tags: chunk.tags,
            domain: chunk.domain,
            sub_domain: chunk.sub_domain,
            created_at: chunk.created_at,
            updated_at: chunk.updated_at,
        }
    }
}

/// A document that contributed no chunks, and why.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SkippedDocumentResponse {
    pub document_id: String,
    /// `not_found`, `project_mismatch` or `no_source_path`.
    pub reason: String,
}

impl From<models::SkippedDocument> for SkippedDocumentResponse {
    fn from(skipped: models::SkippedDocument) -> Self {
        Self {
            document_id: skipped.document_id,
            reason: skipped.reason.to_string(),
        }
    }
}

fn skipped_list(skipped: Vec<models::SkippedDocument>) -> Vec<SkippedDocumentResponse> {
    skipped.into_iter().map(Into::into).collect()
}

fn chunk_list(chunks: Vec<models::Chunk>) -> Vec<ChunkResponse> {
    chunks.into_iter().map(Into::into).collect()
}

/// Response for `POST .../chunks:preview`.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChunkPreviewResponse {
    /// Pass this to `chunks:save` to commit the preview.
    pub hash: String,
    pub chunks: Vec<ChunkResponse>,
    pub skipped: Vec<SkippedDocumentResponse>,
    /// `true` when the chunks came from the preview cache.
    pub from_cache: bool,
}

impl From<models::ChunkPreview> for ChunkPreviewResponse {
    fn from(preview: models::ChunkPreview) -> Self {
        Self {
            hash: preview.hash,
            chunks: chunk_list(preview.chunks),
            skipped: skipped_list(preview.skipped),
            from_cache: preview.from_cache,
        }
    }
}

/// Response for `POST .../chunks:save`.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveChunksResponse {
    pub hash: String,
    pub chunks: Vec<ChunkResponse>,
    /// Rows written by this call. Zero when the preview was already saved.
    pub inserted: u64,
}

impl From<models::SavedChunks> for SaveChunksResponse {
    fn from(saved: models::SavedChunks) -> Self {
        Self {
            hash: saved.hash,
            chunks: chunk_list(saved.chunks),
            inserted: saved.inserted,
        }
    }
}

/// Response for `POST .../chunks:generate`.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateChunksResponse {
    pub chunks: Vec<ChunkResponse>,
    pub skipped: Vec<SkippedDocumentResponse>,
}

impl From<models::ChunkRun> for GenerateChunksResponse {
    fn from(run: models::ChunkRun) -> Self {
        Self {
            chunks: chunk_list(run.chunks),
            skipped: skipped_list(run.skipped),
        }
    }
}

/// Response for `POST .../chunks:merge`.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MergeChunksResponse {
    pub merged_chunk: ChunkResponse,
    pub deleted_chunk_id: String,
}

impl From<models::MergeResult> for MergeChunksResponse {
    fn from(result: models::MergeResult) -> Self {
        Self {
            merged_chunk: result.merged_chunk.into(),
            deleted_chunk_id: result.deleted_chunk_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChunkListItemResponse {
    #[serde(flatten)]
    pub chunk: ChunkResponse,
    pub question_count: i64,
}

impl From<models::ChunkListItem> for ChunkListItemResponse {
    fn from(item: models::ChunkListItem) -> Self {
        Self {
            chunk: item.chunk.into(),
            question_count: item.question_count,
        }
    }
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListChunksResponse {
    pub chunks: Vec<ChunkListItemResponse>,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteChunksResponse {
    pub deleted: u64,
}
