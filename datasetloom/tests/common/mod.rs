// Shared setup for integration tests
#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, Once};
use std::time::Duration;

use datasetloom::cache::{LruCacheStore, PreviewCache};
use datasetloom::config::{DatabaseConfig, PaginationConfig};
use datasetloom::db::{Database, DatabaseBackend, LibSqlBackend};
use datasetloom::models::{CreateDocumentRequest, Document};
use datasetloom::services::ChunkService;
use tempfile::TempDir;

static INIT: Once = Once::new();

/// Initialize tracing subscriber once for tests
pub fn init_test_logger() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

/// File-backed database under a fresh temp dir.
pub async fn setup_backend() -> (TempDir, Arc<dyn DatabaseBackend>) {
    init_test_logger();
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let url = format!("file:{}", temp_dir.path().join("loom.db").display());
    let db = Database::new(&DatabaseConfig::local(url))
        .await
        .expect("Failed to open database");
    (temp_dir, Arc::new(LibSqlBackend::new(db)))
}

pub fn chunk_service(db: Arc<dyn DatabaseBackend>, ttl: Duration) -> ChunkService {
    let previews = PreviewCache::new(Arc::new(LruCacheStore::new(64)), ttl);
    ChunkService::new(db, previews, PaginationConfig::default())
}

/// Write `text` to `dir/name` and register it as a document of `project_id`.
pub async fn register_source(
    service: &ChunkService,
    dir: &Path,
    project_id: &str,
    name: &str,
    text: &str,
) -> Document {
    let path = dir.join(name);
    std::fs::write(&path, text).expect("Failed to write source file");
    service
        .register_document(
            project_id,
            CreateDocumentRequest {
                file_name: name.to_string(),
                path: None,
                parser_file_path: Some(path.display().to_string()),
                size: text.len() as i64,
            },
        )
        .await
        .expect("Failed to register document")
}
