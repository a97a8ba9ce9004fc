use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::processing::normalize::{content_size, normalize_content};
use crate::processing::ChunkStrategy;

/// Separator placed between target and source content when two chunks merge.
pub const MERGE_SEPARATOR: &str = "\n\n";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    pub id: String,
    pub project_id: String,
    pub document_id: String,
    pub document_name: String,
    pub name: String,
    pub content: String,
    pub size: i64,
    pub tags: Option<String>,
    pub domain: Option<String>,
    pub sub_domain: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Chunk {
    /// Build a chunk from a raw fragment. Content is normalized and `size`
    /// derived from it.
    pub fn new(
        id: String,
        project_id: String,
        document_id: String,
        document_name: String,
        name: String,
        raw_content: &str,
    ) -> Self {
        let content = normalize_content(raw_content);
        let now = super::now();
        Self {
            id,
            project_id,
            document_id,
            document_name,
            name,
            size: content_size(&content),
            content,
            tags: None,
            domain: None,
            sub_domain: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace content after a manual edit, keeping `size` in step.
    pub fn set_content(&mut self, raw_content: &str) {
        self.content = normalize_content(raw_content);
        self.size = content_size(&self.content);
        self.updated_at = super::now();
    }
}

/// Content of `target` after `source` is merged into it. Target text comes first.
pub fn merged_content(target: &str, source: &str) -> String {
    format!("{target}{MERGE_SEPARATOR}{source}")
}

/// A chunking request as submitted by a client.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChunkGenerationConfig {
    pub file_ids: Vec<String>,
    #[validate(length(min = 1))]
    pub strategy: String,
    #[serde(default)]
    pub separators: Vec<String>,
    #[validate(range(min = 1))]
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl ChunkGenerationConfig {
    /// Field-level checks, the cross-field overlap rule and a known strategy.
    pub fn check(&self) -> crate::error::Result<()> {
        self.validate()?;
        self.strategy.parse::<ChunkStrategy>()?;
        if self.chunk_overlap >= self.chunk_size {
            return Err(crate::error::LoomError::Validation(format!(
                "chunkOverlap ({}) must be smaller than chunkSize ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The id did not resolve to a document.
    NotFound,
    /// The document belongs to a different project.
    ProjectMismatch,
    /// Neither a parsed path nor a raw path is set.
    NoSourcePath,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(f, "not_found"),
            Self::ProjectMismatch => write!(f, "project_mismatch"),
            Self::NoSourcePath => write!(f, "no_source_path"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SkippedDocument {
    pub document_id: String,
    pub reason: SkipReason,
}

/// Output of one chunking pass over a set of documents.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ChunkRun {
    pub chunks: Vec<Chunk>,
    pub skipped: Vec<SkippedDocument>,
}

/// Result of a preview request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkPreview {
    pub hash: String,
    pub chunks: Vec<Chunk>,
    pub skipped: Vec<SkippedDocument>,
    pub from_cache: bool,
}

/// Result of committing a preview.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedChunks {
    pub hash: String,
    pub chunks: Vec<Chunk>,
    /// Rows actually inserted; zero when the preview was already committed.
    pub inserted: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeResult {
    pub merged_chunk: Chunk,
    pub deleted_chunk_id: String,
}

/// Filter on whether a chunk already has questions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ChunkQuestionStatus {
    #[default]
    All,
    Generated,
    Ungenerated,
}

impl std::str::FromStr for ChunkQuestionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" | "" => Ok(Self::All),
            "generated" => Ok(Self::Generated),
            "ungenerated" => Ok(Self::Ungenerated),
            _ => Err(format!("Unknown chunk status: {s}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ListChunksRequest {
    pub document_ids: Option<Vec<String>>,
    pub keyword: Option<String>,
    pub status: ChunkQuestionStatus,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkListItem {
    #[serde(flatten)]
    pub chunk: Chunk,
    pub question_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateChunkRequest {
    pub content: Option<String>,
    pub tags: Option<String>,
    pub domain: Option<String>,
    pub sub_domain: Option<String>,
}
