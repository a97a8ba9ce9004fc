use std::sync::Arc;

use nanoid::nanoid;
use validator::Validate;

use crate::db::DatabaseBackend;
use crate::error::{LoomError, Result};
use crate::models::{CreateQuestionRequest, Question};

pub struct QuestionService {
    db: Arc<dyn DatabaseBackend>,
}

impl QuestionService {
    pub fn new(db: Arc<dyn DatabaseBackend>) -> Self {
        Self { db }
    }

    /// Attach a question to an existing chunk.
    pub async fn create_question(
        &self,
        project_id: &str,
        chunk_id: &str,
        req: CreateQuestionRequest,
    ) -> Result<Question> {
        req.validate()?;

        let chunk = self
            .db
            .get_chunk(project_id, chunk_id)
            .await?
            .ok_or_else(|| LoomError::NotFound(format!("Chunk {chunk_id} not found")))?;

        let mut question = Question::new(
            nanoid!(),
            project_id.to_string(),
            chunk.id,
            chunk.name,
            req.question,
        );
        question.real_question = req.real_question;
        question.label = req.label;
        question.context_data = req.context_data;

        self.db.create_question(&question).await?;
        Ok(question)
    }

    pub async fn list_questions_by_chunk(
        &self,
        project_id: &str,
        chunk_id: &str,
    ) -> Result<Vec<Question>> {
        if self.db.get_chunk(project_id, chunk_id).await?.is_none() {
            return Err(LoomError::NotFound(format!("Chunk {chunk_id} not found")));
        }
        self.db.list_questions_by_context(project_id, chunk_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Chunk;
    use crate::services::test_support::test_backend;

    #[tokio::test]
    async fn test_create_and_list() {
        let (_dir, db) = test_backend().await;
        let chunk = Chunk::new(
            "c1".into(),
            "p1".into(),
            "d1".into(),
            "doc.md".into(),
            "doc-chunk-1".into(),
            "content",
        );
        db.save_chunks(&[chunk]).await.unwrap();
        let service = QuestionService::new(db);

        let question = service
            .create_question(
                "p1",
                "c1",
                CreateQuestionRequest {
                    question: "What is it?".into(),
                    real_question: None,
                    label: Some("basics".into()),
                    context_data: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(question.context_id, "c1");
        assert_eq!(question.context_name, "doc-chunk-1");

        let listed = service.list_questions_by_chunk("p1", "c1").await.unwrap();
        assert_eq!(listed, vec![question]);
    }

    #[tokio::test]
    async fn test_unknown_chunk_is_not_found() {
        let (_dir, db) = test_backend().await;
        let service = QuestionService::new(db);

        let err = service
            .create_question(
                "p1",
                "nope",
                CreateQuestionRequest {
                    question: "?".into(),
                    real_question: None,
                    label: None,
                    context_data: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, LoomError::NotFound(_)));
        assert!(service.list_questions_by_chunk("p1", "nope").await.is_err());
    }
}
