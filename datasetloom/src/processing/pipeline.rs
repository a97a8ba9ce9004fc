use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use nanoid::nanoid;

use crate::db::DatabaseBackend;
use crate::error::Result;
use crate::models::{
    Chunk, ChunkGenerationConfig, ChunkRun, Document, SkipReason, SkippedDocument,
};

use super::normalize::normalize_content;
use super::{ChunkContext, ChunkParams, ChunkStrategy, ChunkerRegistry, ContentChunker};

/// Turns a set of registered documents into chunk records. Nothing is
/// persisted here.
pub struct ChunkPipeline {
    db: Arc<dyn DatabaseBackend>,
}

impl ChunkPipeline {
    pub fn new(db: Arc<dyn DatabaseBackend>) -> Self {
        Self { db }
    }

    pub async fn gen_chunk_data(
        &self,
        project_id: &str,
        config: &ChunkGenerationConfig,
    ) -> Result<ChunkRun> {
        let strategy: ChunkStrategy = config.strategy.parse()?;
        let registry = ChunkerRegistry::new(&ChunkParams::from_request(config));
        let chunker = registry.get_chunker(&strategy);

        let mut seen = HashSet::new();
        let file_ids: Vec<String> = config
            .file_ids
            .iter()
            .filter(|id| seen.insert(id.as_str()))
            .cloned()
            .collect();

        let documents = self.db.get_documents_by_ids(&file_ids).await?;
        let by_id: HashMap<&str, &Document> =
            documents.iter().map(|d| (d.id.as_str(), d)).collect();

        let mut run = ChunkRun::default();

        for file_id in &file_ids {
            let Some(doc) = by_id.get(file_id.as_str()) else {
                run.skip(file_id, SkipReason::NotFound);
                continue;
            };

            if doc.project_id != project_id {
                run.skip(file_id, SkipReason::ProjectMismatch);
                continue;
            }

            let Some(path) = doc.source_path() else {
                run.skip(file_id, SkipReason::NoSourcePath);
                continue;
            };

            let text = tokio::fs::read_to_string(path).await?;
            let context = ChunkContext {
                source_path: Some(path.to_string()),
            };

            let chunks = Self::build_chunks(project_id, doc, chunker, &text, &context);
            tracing::debug!(
                document_id = %doc.id,
                strategy = %strategy,
                chunks = chunks.len(),
                "Document chunked"
            );
            run.chunks.extend(chunks);
        }

        tracing::info!(
            project_id = %project_id,
            strategy = %strategy,
            documents = file_ids.len(),
            chunks = run.chunks.len(),
            skipped = run.skipped.len(),
            "Chunk generation finished"
        );

        Ok(run)
    }

    fn build_chunks(
        project_id: &str,
        doc: &Document,
        chunker: &dyn ContentChunker,
        text: &str,
        context: &ChunkContext,
    ) -> Vec<Chunk> {
        let stem = doc.file_stem();
        chunker
            .chunk(text, Some(context))
            .into_iter()
            .map(|fragment| normalize_content(&fragment.content))
            .filter(|content| !content.is_empty())
            .enumerate()
            .map(|(i, content)| {
                Chunk::new(
                    nanoid!(),
                    project_id.to_string(),
                    doc.id.clone(),
                    doc.file_name.clone(),
                    format!("{stem}-chunk-{}", i + 1),
                    &content,
                )
            })
            .collect()
    }
}

impl ChunkRun {
    fn skip(&mut self, document_id: &str, reason: SkipReason) {
        tracing::warn!(document_id = %document_id, reason = %reason, "Skipping document");
        self.skipped.push(SkippedDocument {
            document_id: document_id.to_string(),
            reason,
        });
    }
}
