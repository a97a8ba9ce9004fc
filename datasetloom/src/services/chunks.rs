use std::sync::Arc;

use nanoid::nanoid;
use validator::Validate;

use crate::cache::PreviewCache;
use crate::config::PaginationConfig;
use crate::db::DatabaseBackend;
use crate::error::{LoomError, Result};
use crate::models::{
    now, Chunk, ChunkGenerationConfig, ChunkListItem, ChunkPreview, ChunkRun,
    CreateDocumentRequest, Document, ListChunksRequest, MergeResult, Pagination, SavedChunks,
    UpdateChunkRequest,
};
use crate::processing::{config_hash, ChunkPipeline};

/// Chunk lifecycle: preview, commit, direct generation, merge and CRUD.
pub struct ChunkService {
    db: Arc<dyn DatabaseBackend>,
    pipeline: ChunkPipeline,
    previews: PreviewCache,
    pagination: PaginationConfig,
}

impl ChunkService {
    pub fn new(
        db: Arc<dyn DatabaseBackend>,
        previews: PreviewCache,
        pagination: PaginationConfig,
    ) -> Self {
        Self {
            pipeline: ChunkPipeline::new(Arc::clone(&db)),
            db,
            previews,
            pagination,
        }
    }

    pub async fn register_document(
        &self,
        project_id: &str,
        req: CreateDocumentRequest,
    ) -> Result<Document> {
        req.validate()?;

        let mut doc = Document::new(nanoid!(), project_id.to_string(), req.file_name);
        doc.path = req.path;
        doc.parser_file_path = req.parser_file_path;
        doc.size = req.size;

        self.db.create_document(&doc).await?;
        tracing::info!(project_id = %project_id, document_id = %doc.id, "Document registered");
        Ok(doc)
    }

    pub async fn get_document(&self, project_id: &str, id: &str) -> Result<Document> {
        self.db
            .get_document_by_id(id)
            .await?
            .filter(|doc| doc.project_id == project_id)
            .ok_or_else(|| LoomError::NotFound(format!("Document {id} not found")))
    }

    /// Chunk the requested documents without persisting anything. Identical
    /// configurations within the cache TTL reuse the earlier result.
    pub async fn create(
        &self,
        project_id: &str,
        config: &ChunkGenerationConfig,
    ) -> Result<ChunkPreview> {
        config.check()?;
        let hash = config_hash(config)?;

        if let Some(chunks) = self.previews.get(project_id, &hash).await {
            if !chunks.is_empty() {
                tracing::debug!(project_id = %project_id, hash = %hash, "Preview cache hit");
                return Ok(ChunkPreview {
                    hash,
                    chunks,
                    skipped: Vec::new(),
                    from_cache: true,
                });
            }
        }

        let run = self.pipeline.gen_chunk_data(project_id, config).await?;
        self.previews.put(project_id, &hash, &run.chunks).await?;

        Ok(ChunkPreview {
            hash,
            chunks: run.chunks,
            skipped: run.skipped,
            from_cache: false,
        })
    }

    /// Commit a previewed chunk list exactly as it was previewed. The preview
    /// is consumed, so a second commit of the same hash is `StaleCache`.
    pub async fn save(&self, project_id: &str, hash: &str) -> Result<SavedChunks> {
        let chunks = self.previews.get(project_id, hash).await.ok_or_else(|| {
            LoomError::StaleCache(format!(
                "No preview for hash {hash}; it expired or was never generated"
            ))
        })?;

        let inserted = self.db.save_chunks(&chunks).await?;
        self.previews.consume(project_id, hash).await;
        tracing::info!(
            project_id = %project_id,
            hash = %hash,
            chunks = chunks.len(),
            inserted,
            "Preview committed"
        );

        Ok(SavedChunks {
            hash: hash.to_string(),
            chunks,
            inserted,
        })
    }

    /// Generate and persist in one step, without touching the preview cache.
    pub async fn chunk_and_save(
        &self,
        project_id: &str,
        config: &ChunkGenerationConfig,
    ) -> Result<ChunkRun> {
        config.check()?;
        let run = self.pipeline.gen_chunk_data(project_id, config).await?;
        self.db.save_chunks(&run.chunks).await?;
        Ok(run)
    }

    pub async fn merge_chunks(
        &self,
        project_id: &str,
        source_id: &str,
        target_id: &str,
    ) -> Result<MergeResult> {
        if source_id == target_id {
            return Err(LoomError::InvalidOperation(
                "Cannot merge a chunk into itself".to_string(),
            ));
        }

        let result = self
            .db
            .merge_chunks(project_id, source_id, target_id)
            .await?;
        tracing::info!(
            project_id = %project_id,
            source_id = %source_id,
            target_id = %target_id,
            "Chunks merged"
        );
        Ok(result)
    }

    pub async fn get_list_pagination(
        &self,
        project_id: &str,
        req: &ListChunksRequest,
    ) -> Result<(Vec<ChunkListItem>, Pagination)> {
        let page = req.page.unwrap_or(1).max(1);
        let limit = self.pagination.clamp(req.limit);
        let offset = (page - 1).saturating_mul(limit);

        let (items, total) = self.db.list_chunks(project_id, req, limit, offset).await?;
        Ok((items, Pagination::new(page, limit, total)))
    }

    pub async fn get_chunk(&self, project_id: &str, id: &str) -> Result<Chunk> {
        self.db
            .get_chunk(project_id, id)
            .await?
            .ok_or_else(|| LoomError::NotFound(format!("Chunk {id} not found")))
    }

    /// Apply a manual edit. New content is normalized and `size` follows it.
    pub async fn update_chunk(
        &self,
        project_id: &str,
        id: &str,
        req: UpdateChunkRequest,
    ) -> Result<Chunk> {
        let mut chunk = self.get_chunk(project_id, id).await?;

        if let Some(content) = req.content.as_deref() {
            chunk.set_content(content);
            if chunk.content.is_empty() {
                return Err(LoomError::Validation(
                    "Chunk content cannot be empty".to_string(),
                ));
            }
        }
        if req.tags.is_some() {
            chunk.tags = req.tags;
        }
        if req.domain.is_some() {
            chunk.domain = req.domain;
        }
        if req.sub_domain.is_some() {
            chunk.sub_domain = req.sub_domain;
        }
        chunk.updated_at = now();

        if !self.db.update_chunk(&chunk).await? {
            return Err(LoomError::NotFound(format!("Chunk {id} not found")));
        }
        Ok(chunk)
    }

    pub async fn delete_chunk(&self, project_id: &str, id: &str) -> Result<()> {
        let deleted = self.db.delete_chunks(project_id, &[id.to_string()]).await?;
        if deleted == 0 {
            return Err(LoomError::NotFound(format!("Chunk {id} not found")));
        }
        Ok(())
    }

    /// Batch delete. Unknown ids are ignored; returns how many were removed.
    pub async fn delete_chunks(&self, project_id: &str, ids: &[String]) -> Result<u64> {
        let deleted = self.db.delete_chunks(project_id, ids).await?;
        tracing::info!(
            project_id = %project_id,
            requested = ids.len(),
            deleted,
            "Chunks deleted"
        );
        Ok(deleted)
    }
}
