//! Document request/response DTOs for the v1 API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models;

/// Request body for `POST /v1/projects/{projectId}/documents`.
///
/// Registers a file that has already been uploaded and, optionally, parsed
/// to plain text. Chunking reads the parsed file when it is present.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterDocumentRequest {
    /// Original file name, e.g. `"guide.md"`. Chunks are named after its stem.
    pub file_name: String,
    /// Path to the raw upload on the server's filesystem.
    pub path: Option<String>,
    /// Path to the parsed plain-text rendition, preferred over `path`.
    pub parser_file_path: Option<String>,
    /// File size in bytes.
    #[serde(default)]
    pub size: i64,
}

impl From<RegisterDocumentRequest> for models::CreateDocumentRequest {
    fn from(req: RegisterDocumentRequest) -> Self {
        Self {
            file_name: req.file_name,
            path: req.path,
            parser_file_path: req.parser_file_path,
            size: req.size,
        }
    }
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentResponse {
    pub document_id: String,
    pub project_id: String,
    pub file_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parser_file_path: Option<String>,
    pub size: i64,
    #[schema(value_type = String)]
    pub created_at: DateTime<Utc>,
    #[schema(value_type = String)]
    pub updated_at: DateTime<Utc>,
}

impl From<models::Document> for DocumentResponse {
    fn from(doc: models::Document) -> Self {
        Self {
            document_id: doc.id,
            project_id: doc.project_id,
            file_name: doc.file_name,
            path: doc.path,
            parser_file_path: doc.parser_file_path,
            size: doc.size,
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        }
    }
}
