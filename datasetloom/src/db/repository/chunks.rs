use libsql::{params, Connection};

use crate::error::{LoomError, Result};
use crate::models::{
    merged_content, now, Chunk, ChunkListItem, ChunkQuestionStatus, ListChunksRequest,
    MergeResult,
};
use crate::processing::content_size;

use super::{begin, finish, format_ts, parse_ts, placeholders, QuestionRepository};

const CHUNK_COLUMNS: &str = "c.id, c.project_id, c.document_id, c.document_name, c.name, \
     c.content, c.size, c.tags, c.domain, c.sub_domain, c.created_at, c.updated_at";

pub struct ChunkRepository;

impl ChunkRepository {
    /// Insert one chunk. An id that already exists is left untouched and
    /// counts as zero rows.
    pub async fn insert(conn: &Connection, chunk: &Chunk) -> Result<u64> {
        let inserted = conn
            .execute(
                r#"
                INSERT OR IGNORE INTO chunks (
                    id, project_id, document_id, document_name, name, content, size,
                    tags, domain, sub_domain, created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
                "#,
                params![
                    chunk.id.clone(),
                    chunk.project_id.clone(),
                    chunk.document_id.clone(),
                    chunk.document_name.clone(),
                    chunk.name.clone(),
                    chunk.content.clone(),
                    chunk.size,
                    chunk.tags.clone(),
                    chunk.domain.clone(),
                    chunk.sub_domain.clone(),
                    format_ts(&chunk.created_at),
                    format_ts(&chunk.updated_at),
                ],
            )
            .await?;
        Ok(inserted)
    }

    /// Insert a batch atomically. Returns the number of new rows.
    pub async fn save_all(conn: &Connection, chunks: &[Chunk]) -> Result<u64> {
        let tx = begin(conn, "save_chunks").await?;
        let result = async {
            let mut inserted = 0;
            for chunk in chunks {
                inserted += Self::insert(&tx, chunk).await?;
            }
            Ok::<u64, LoomError>(inserted)
        }
        .await;
        finish(tx, "save_chunks", result).await
    }

    pub async fn get_by_id(conn: &Connection, project_id: &str, id: &str) -> Result<Option<Chunk>> {
        let sql =
            format!("SELECT {CHUNK_COLUMNS} FROM chunks c WHERE c.id = ?1 AND c.project_id = ?2");
        let mut rows = conn.query(&sql, params![id, project_id]).await?;

        if let Some(row) = rows.next().await? {
            Ok(Some(Self::row_to_chunk(&row)?))
        } else {
            Ok(None)
        }
    }

    /// Persist content, size, labels and `updated_at`. Returns false when the
    /// chunk does not exist in the project.
    pub async fn update(conn: &Connection, chunk: &Chunk) -> Result<bool> {
        let updated = conn
            .execute(
                r#"
                UPDATE chunks SET
                    content = ?3,
                    size = ?4,
                    tags = ?5,
                    domain = ?6,
                    sub_domain = ?7,
                    updated_at = ?8
                WHERE id = ?1 AND project_id = ?2
                "#,
                params![
                    chunk.id.clone(),
                    chunk.project_id.clone(),
                    chunk.content.clone(),
                    chunk.size,
                    chunk.tags.clone(),
                    chunk.domain.clone(),
                    chunk.sub_domain.clone(),
                    format_ts(&chunk.updated_at),
                ],
            )
            .await?;
        Ok(updated > 0)
    }

    /// Delete chunks and the questions anchored to them in one transaction.
    /// Returns the number of chunks removed.
    pub async fn delete_many(conn: &Connection, project_id: &str, ids: &[String]) -> Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let tx = begin(conn, "delete_chunks").await?;
        let result = async {
            let questions = QuestionRepository::delete_by_context_ids(&tx, project_id, ids).await?;

            let sql = format!(
                "DELETE FROM chunks WHERE project_id = ? AND id IN ({})",
                placeholders(ids.len())
            );
            let mut values = vec![libsql::Value::from(project_id.to_string())];
            values.extend(ids.iter().map(|id| libsql::Value::from(id.clone())));
            let chunks = tx.execute(&sql, libsql::params_from_iter(values)).await?;

            tracing::debug!(project_id, chunks, questions, "Deleted chunks");
            Ok::<u64, LoomError>(chunks)
        }
        .await;
        finish(tx, "delete_chunks", result).await
    }

    /// Append `source` to `target`, move its questions over and delete it.
    /// Either every step lands or none does.
    pub async fn merge(
        conn: &Connection,
        project_id: &str,
        source_id: &str,
        target_id: &str,
    ) -> Result<MergeResult> {
        let tx = begin(conn, "merge").await?;
        let result = Self::merge_in_tx(&tx, project_id, source_id, target_id).await;
        finish(tx, "merge", result).await
    }

    async fn merge_in_tx(
        conn: &Connection,
        project_id: &str,
        source_id: &str,
        target_id: &str,
    ) -> Result<MergeResult> {
        let source = Self::get_by_id(conn, project_id, source_id)
            .await?
            .ok_or_else(|| LoomError::NotFound(format!("Chunk {source_id} not found")))?;
        let mut target = Self::get_by_id(conn, project_id, target_id)
            .await?
            .ok_or_else(|| LoomError::NotFound(format!("Chunk {target_id} not found")))?;

        target.content = merged_content(&target.content, &source.content);
        target.size = content_size(&target.content);
        target.updated_at = now();
        Self::update(conn, &target).await?;

        QuestionRepository::repoint_context(conn, project_id, source_id, target_id, &target.name)
            .await?;

        conn.execute(
            "DELETE FROM chunks WHERE id = ?1 AND project_id = ?2",
            params![source_id, project_id],
        )
        .await?;

        Ok(MergeResult {
            merged_chunk: target,
            deleted_chunk_id: source.id,
        })
    }

    /// One page of chunks with their question counts, plus the total number of
    /// matching chunks.
    pub async fn list(
        conn: &Connection,
        project_id: &str,
        req: &ListChunksRequest,
        limit: u32,
        offset: u32,
    ) -> Result<(Vec<ChunkListItem>, u32)> {
        let mut conditions = vec!["c.project_id = ?".to_string()];
        let mut values = vec![libsql::Value::from(project_id.to_string())];

        if let Some(document_ids) = req.document_ids.as_ref().filter(|ids| !ids.is_empty()) {
            conditions.push(format!(
                "c.document_id IN ({})",
                placeholders(document_ids.len())
            ));
            values.extend(
                document_ids
                    .iter()
                    .map(|id| libsql::Value::from(id.clone())),
            );
        }

        if let Some(keyword) = req.keyword.as_deref().map(str::trim).filter(|k| !k.is_empty()) {
            conditions.push("(c.content LIKE ? OR c.name LIKE ?)".to_string());
            let pattern = format!("%{keyword}%");
            values.push(libsql::Value::from(pattern.clone()));
            values.push(libsql::Value::from(pattern));
        }

        match req.status {
            ChunkQuestionStatus::All => {}
            ChunkQuestionStatus::Generated => conditions.push(
                "EXISTS (SELECT 1 FROM questions q WHERE q.context_id = c.id)".to_string(),
            ),
            ChunkQuestionStatus::Ungenerated => conditions.push(
                "NOT EXISTS (SELECT 1 FROM questions q WHERE q.context_id = c.id)".to_string(),
            ),
        }

        let where_clause = conditions.join(" AND ");

        let count_sql = format!("SELECT COUNT(*) FROM chunks c WHERE {where_clause}");
        let mut count_rows = conn
            .query(&count_sql, libsql::params_from_iter(values.clone()))
            .await?;
        let total: i64 = match count_rows.next().await? {
            Some(row) => row.get(0)?,
            None => 0,
        };

        let list_sql = format!(
            "SELECT {CHUNK_COLUMNS}, \
             (SELECT COUNT(*) FROM questions q WHERE q.context_id = c.id) AS question_count \
             FROM chunks c WHERE {where_clause} \
             ORDER BY c.created_at ASC, c.rowid ASC \
             LIMIT ? OFFSET ?"
        );
        values.push(libsql::Value::from(i64::from(limit)));
        values.push(libsql::Value::from(i64::from(offset)));

        let mut rows = conn
            .query(&list_sql, libsql::params_from_iter(values))
            .await?;
        let mut items = Vec::new();
        while let Some(row) = rows.next().await? {
            items.push(ChunkListItem {
                chunk: Self::row_to_chunk(&row)?,
                question_count: row.get(12)?,
            });
        }

        Ok((items, total as u32))
    }

    fn row_to_chunk(row: &libsql::Row) -> Result<Chunk> {
        Ok(Chunk {
            id: row.get(0)?,
            project_id: row.get(1)?,
            document_id: row.get(2)?,
            document_name: row.get(3)?,
            name: row.get(4)?,
            content: row.get(5)?,
            size: row.get(6)?,
            tags: row.get(7)?,
            domain: row.get(8)?,
            sub_domain: row.get(9)?,
            created_at: parse_ts(&row.get::<String>(10)?)?,
            updated_at: parse_ts(&row.get::<String>(11)?)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support::setup_test_db;
    use crate::models::Question;
    use pretty_assertions::assert_eq;

    fn chunk(id: &str, document_id: &str, content: &str) -> Chunk {
        Chunk::new(
            id.into(),
            "p1".into(),
            document_id.into(),
            format!("{document_id}.md"),
            format!("{document_id}-{id}"),
            content,
        )
    }

    async fn add_question(conn: &Connection, id: &str, context_id: &str) {
        let q = Question::new(
            id.into(),
            "p1".into(),
            context_id.into(),
            context_id.into(),
            "q?".into(),
        );
        QuestionRepository::create(conn, &q).await.unwrap();
    }

    #[tokio::test]
    async fn test_save_all_is_idempotent() {
        let conn = setup_test_db().await;
        let chunks = vec![chunk("c1", "d1", "one"), chunk("c2", "d1", "two")];

        assert_eq!(ChunkRepository::save_all(&conn, &chunks).await.unwrap(), 2);
        assert_eq!(ChunkRepository::save_all(&conn, &chunks).await.unwrap(), 0);

        let fetched = ChunkRepository::get_by_id(&conn, "p1", "c2").await.unwrap();
        assert_eq!(fetched, Some(chunks[1].clone()));
    }

    #[tokio::test]
    async fn test_get_by_id_is_project_scoped() {
        let conn = setup_test_db().await;
        ChunkRepository::insert(&conn, &chunk("c1", "d1", "one"))
            .await
            .unwrap();

        assert!(ChunkRepository::get_by_id(&conn, "other", "c1")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_merge_appends_and_repoints_questions() {
        let conn = setup_test_db().await;
        ChunkRepository::insert(&conn, &chunk("x", "d1", "x"))
            .await
            .unwrap();
        ChunkRepository::insert(&conn, &chunk("y", "d1", "y"))
            .await
            .unwrap();
        add_question(&conn, "q1", "x").await;
        add_question(&conn, "q2", "x").await;

        let result = ChunkRepository::merge(&conn, "p1", "x", "y").await.unwrap();

        assert_eq!(result.deleted_chunk_id, "x");
        assert_eq!(result.merged_chunk.content, "y\n\nx");
        assert_eq!(result.merged_chunk.size, 4);

        assert!(ChunkRepository::get_by_id(&conn, "p1", "x")
            .await
            .unwrap()
            .is_none());
        let stored = ChunkRepository::get_by_id(&conn, "p1", "y")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.content, "y\n\nx");
        assert_eq!(stored.size, 4);

        let moved = QuestionRepository::list_by_context(&conn, "p1", "y")
            .await
            .unwrap();
        assert_eq!(moved.len(), 2);
        assert!(QuestionRepository::list_by_context(&conn, "p1", "x")
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_merge_missing_chunk_changes_nothing() {
        let conn = setup_test_db().await;
        let y = chunk("y", "d1", "y");
        ChunkRepository::insert(&conn, &y).await.unwrap();
        add_question(&conn, "q1", "y").await;

        let err = ChunkRepository::merge(&conn, "p1", "ghost", "y")
            .await
            .unwrap_err();
        assert!(matches!(err, LoomError::NotFound(_)));

        let err = ChunkRepository::merge(&conn, "p1", "y", "ghost")
            .await
            .unwrap_err();
        assert!(matches!(err, LoomError::NotFound(_)));

        let stored = ChunkRepository::get_by_id(&conn, "p1", "y")
            .await
            .unwrap();
        assert_eq!(stored, Some(y));
        assert_eq!(
            QuestionRepository::list_by_context(&conn, "p1", "y")
                .await
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn test_merge_failure_rolls_back_earlier_steps() {
        let conn = setup_test_db().await;
        let x = chunk("x", "d1", "x");
        let y = chunk("y", "d1", "y");
        ChunkRepository::insert(&conn, &x).await.unwrap();
        ChunkRepository::insert(&conn, &y).await.unwrap();
        add_question(&conn, "q1", "x").await;
        conn.execute_batch(
            "CREATE TRIGGER block_chunk_delete BEFORE DELETE ON chunks \
             BEGIN SELECT RAISE(ABORT, 'chunk delete blocked'); END;",
        )
        .await
        .unwrap();

        let err = ChunkRepository::merge(&conn, "p1", "x", "y")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            LoomError::Transaction {
                operation: "merge",
                ..
            }
        ));

        let target = ChunkRepository::get_by_id(&conn, "p1", "y").await.unwrap();
        assert_eq!(target, Some(y));
        let source = ChunkRepository::get_by_id(&conn, "p1", "x").await.unwrap();
        assert_eq!(source, Some(x));
        assert_eq!(
            QuestionRepository::list_by_context(&conn, "p1", "x")
                .await
                .unwrap()
                .len(),
            1
        );
        assert!(QuestionRepository::list_by_context(&conn, "p1", "y")
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_delete_many_removes_questions() {
        let conn = setup_test_db().await;
        for id in ["c1", "c2", "c3"] {
            ChunkRepository::insert(&conn, &chunk(id, "d1", id))
                .await
                .unwrap();
            add_question(&conn, &format!("q-{id}"), id).await;
        }

        let deleted = ChunkRepository::delete_many(&conn, "p1", &["c1".into(), "c2".into()])
            .await
            .unwrap();
        assert_eq!(deleted, 2);

        let (remaining, total) =
            ChunkRepository::list(&conn, "p1", &ListChunksRequest::default(), 10, 0)
                .await
                .unwrap();
        assert_eq!(total, 1);
        assert_eq!(remaining[0].chunk.id, "c3");
        assert_eq!(remaining[0].question_count, 1);
        assert!(QuestionRepository::list_by_context(&conn, "p1", "c1")
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_list_filters() {
        let conn = setup_test_db().await;
        ChunkRepository::insert(&conn, &chunk("c1", "d1", "apples and pears"))
            .await
            .unwrap();
        ChunkRepository::insert(&conn, &chunk("c2", "d1", "bananas"))
            .await
            .unwrap();
        ChunkRepository::insert(&conn, &chunk("c3", "d2", "more apples"))
            .await
            .unwrap();
        add_question(&conn, "q1", "c3").await;

        let by_keyword = ListChunksRequest {
            keyword: Some("apples".into()),
            ..Default::default()
        };
        let (_, total) = ChunkRepository::list(&conn, "p1", &by_keyword, 10, 0)
            .await
            .unwrap();
        assert_eq!(total, 2);

        let by_document = ListChunksRequest {
            document_ids: Some(vec!["d1".into()]),
            ..Default::default()
        };
        let (items, _) = ChunkRepository::list(&conn, "p1", &by_document, 10, 0)
            .await
            .unwrap();
        assert!(items.iter().all(|i| i.chunk.document_id == "d1"));

        let generated = ListChunksRequest {
            status: ChunkQuestionStatus::Generated,
            ..Default::default()
        };
        let (items, total) = ChunkRepository::list(&conn, "p1", &generated, 10, 0)
            .await
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(items[0].chunk.id, "c3");

        let ungenerated = ListChunksRequest {
            status: ChunkQuestionStatus::Ungenerated,
            ..Default::default()
        };
        let (_, total) = ChunkRepository::list(&conn, "p1", &ungenerated, 10, 0)
            .await
            .unwrap();
        assert_eq!(total, 2);

        let (page, total) =
            ChunkRepository::list(&conn, "p1", &ListChunksRequest::default(), 2, 2)
                .await
                .unwrap();
        assert_eq!(total, 3);
        assert_eq!(page.len(), 1);
    }

    #[tokio::test]
    async fn test_list_keeps_insertion_order_on_equal_timestamps() {
        let conn = setup_test_db().await;
        let created_at = now();
        let chunks: Vec<Chunk> = (1..=11)
            .map(|n| {
                let mut c = chunk(&format!("id{n}"), "doc", &format!("part {n}"));
                c.name = format!("doc-chunk-{n}");
                c.created_at = created_at;
                c.updated_at = created_at;
                c
            })
            .collect();
        ChunkRepository::save_all(&conn, &chunks).await.unwrap();

        let (items, _) = ChunkRepository::list(&conn, "p1", &ListChunksRequest::default(), 20, 0)
            .await
            .unwrap();
        let names: Vec<&str> = items.iter().map(|i| i.chunk.name.as_str()).collect();
        let expected: Vec<String> = (1..=11).map(|n| format!("doc-chunk-{n}")).collect();
        assert_eq!(names, expected);
    }
}
