use libsql::{params, Connection};

use crate::error::Result;
use crate::models::Document;

use super::{format_ts, parse_ts, placeholders};

const DOCUMENT_COLUMNS: &str =
    "id, project_id, file_name, path, parser_file_path, size, created_at, updated_at";

pub struct DocumentRepository;

impl DocumentRepository {
    pub async fn create(conn: &Connection, doc: &Document) -> Result<()> {
        conn.execute(
            r#"
            INSERT INTO documents (
                id, project_id, file_name, path, parser_file_path, size, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                doc.id.clone(),
                doc.project_id.clone(),
                doc.file_name.clone(),
                doc.path.clone(),
                doc.parser_file_path.clone(),
                doc.size,
                format_ts(&doc.created_at),
                format_ts(&doc.updated_at),
            ],
        )
        .await?;

        Ok(())
    }

    pub async fn get_by_id(conn: &Connection, id: &str) -> Result<Option<Document>> {
        let sql = format!("SELECT {DOCUMENT_COLUMNS} FROM documents WHERE id = ?1");
        let mut rows = conn.query(&sql, params![id]).await?;

        if let Some(row) = rows.next().await? {
            Ok(Some(Self::row_to_document(&row)?))
        } else {
            Ok(None)
        }
    }

    /// Documents for the given ids in no particular order. Unknown ids are
    /// simply absent from the result.
    pub async fn get_by_ids(conn: &Connection, ids: &[String]) -> Result<Vec<Document>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE id IN ({})",
            placeholders(ids.len())
        );
        let params: Vec<libsql::Value> =
            ids.iter().map(|id| libsql::Value::from(id.clone())).collect();

        let mut rows = conn.query(&sql, libsql::params_from_iter(params)).await?;
        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(Self::row_to_document(&row)?);
        }
        Ok(results)
    }

    fn row_to_document(row: &libsql::Row) -> Result<Document> {
        Ok(Document {
            id: row.get(0)?,
            project_id: row.get(1)?,
            file_name: row.get(2)?,
            path: row.get(3)?,
            parser_file_path: row.get(4)?,
            size: row.get(5)?,
            created_at: parse_ts(&row.get::<String>(6)?)?,
            updated_at: parse_ts(&row.get::<String>(7)?)?,
        })
    }
}
