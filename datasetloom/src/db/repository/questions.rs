use libsql::{params, Connection};

use crate::error::Result;
use crate::models::{ContextType, Question};

use super::{format_ts, parse_ts, placeholders};

const QUESTION_COLUMNS: &str = "id, project_id, context_id, context_type, context_data, \
     context_name, question, real_question, label, answered, created_at, updated_at";

pub struct QuestionRepository;

impl QuestionRepository {
    pub async fn create(conn: &Connection, question: &Question) -> Result<()> {
        conn.execute(
            r#"
            INSERT INTO questions (
                id, project_id, context_id, context_type, context_data, context_name,
                question, real_question, label, answered, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
            params![
                question.id.clone(),
                question.project_id.clone(),
                question.context_id.clone(),
                question.context_type.to_string(),
                question.context_data.clone(),
                question.context_name.clone(),
                question.question.clone(),
                question.real_question.clone(),
                question.label.clone(),
                i64::from(question.answered),
                format_ts(&question.created_at),
                format_ts(&question.updated_at),
            ],
        )
        .await?;

        Ok(())
    }

    pub async fn list_by_context(
        conn: &Connection,
        project_id: &str,
        context_id: &str,
    ) -> Result<Vec<Question>> {
        let sql = format!(
            "SELECT {QUESTION_COLUMNS} FROM questions \
             WHERE project_id = ?1 AND context_id = ?2 \
             ORDER BY created_at ASC, id ASC"
        );
        let mut rows = conn.query(&sql, params![project_id, context_id]).await?;

        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(Self::row_to_question(&row)?);
        }
        Ok(results)
    }

    /// Move every question anchored at `from_id` onto `to_id`.
    pub async fn repoint_context(
        conn: &Connection,
        project_id: &str,
        from_id: &str,
        to_id: &str,
        to_name: &str,
    ) -> Result<u64> {
        let moved = conn
            .execute(
                "UPDATE questions SET context_id = ?3, context_name = ?4 \
                 WHERE project_id = ?1 AND context_id = ?2",
                params![project_id, from_id, to_id, to_name],
            )
            .await?;
        Ok(moved)
    }

    pub async fn delete_by_context_ids(
        conn: &Connection,
        project_id: &str,
        context_ids: &[String],
    ) -> Result<u64> {
        if context_ids.is_empty() {
            return Ok(0);
        }

        let sql = format!(
            "DELETE FROM questions WHERE project_id = ? AND context_id IN ({})",
            placeholders(context_ids.len())
        );
        let mut values = vec![libsql::Value::from(project_id.to_string())];
        values.extend(context_ids.iter().map(|id| libsql::Value::from(id.clone())));

        let deleted = conn
            .execute(&sql, libsql::params_from_iter(values))
            .await?;
        Ok(deleted)
    }

    fn row_to_question(row: &libsql::Row) -> Result<Question> {
        Ok(Question {
            id: row.get(0)?,
            project_id: row.get(1)?,
            context_id: row.get(2)?,
            context_type: row
                .get::<String>(3)?
                .parse()
                .unwrap_or(ContextType::Text),
            context_data: row.get(4)?,
            context_name: row.get(5)?,
            question: row.get(6)?,
            real_question: row.get(7)?,
            label: row.get(8)?,
            answered: row.get::<i64>(9)? != 0,
            created_at: parse_ts(&row.get::<String>(10)?)?,
            updated_at: parse_ts(&row.get::<String>(11)?)?,
        })
    }
}
