mod chats;
mod chunks;
mod questions;

pub use chats::ChatService;
pub use chunks::ChunkService;
pub use questions::QuestionService;

#[cfg(test)]
pub(crate) mod test_support {
    use std::path::Path;
    use std::sync::Arc;

    use tempfile::TempDir;

    use crate::config::DatabaseConfig;
    use crate::db::{Database, DatabaseBackend, LibSqlBackend};

    /// File-backed database in a fresh temp dir. Keep the `TempDir` alive for
    /// the duration of the test.
    pub async fn test_backend() -> (TempDir, Arc<dyn DatabaseBackend>) {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("file:{}", dir.path().join("loom.db").display());
        let db = Database::new(&DatabaseConfig::local(url)).await.unwrap();
        (dir, Arc::new(LibSqlBackend::new(db)))
    }

    pub fn write_source(dir: &Path, name: &str, text: &str) -> String {
        let path = dir.join(name);
        std::fs::write(&path, text).unwrap();
        path.display().to_string()
    }
}
