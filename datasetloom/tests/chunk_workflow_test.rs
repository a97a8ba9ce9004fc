mod common;

use std::sync::Arc;
use std::time::Duration;

use datasetloom::error::LoomError;
use datasetloom::models::{ChunkGenerationConfig, ChunkQuestionStatus, ListChunksRequest, Question};
use pretty_assertions::assert_eq;

use common::{chunk_service, register_source, setup_backend};

fn recursive(file_ids: Vec<String>, chunk_size: usize) -> ChunkGenerationConfig {
    ChunkGenerationConfig {
        file_ids,
        strategy: "recursive".to_string(),
        separators: vec!["\n\n".into(), "\n".into(), " ".into(), "".into()],
        chunk_size,
        chunk_overlap: 0,
    }
}

#[tokio::test]
async fn preview_save_commits_exactly_the_previewed_chunks() {
    let (dir, db) = setup_backend().await;
    let service = chunk_service(Arc::clone(&db), Duration::from_secs(300));
    let doc = register_source(
        &service,
        dir.path(),
        "p1",
        "handbook.md",
        "Welcome aboard.\n\nPlease read the safety rules.\n\nLunch is at noon.",
    )
    .await;

    let preview = service
        .create("p1", &recursive(vec![doc.id.clone()], 30))
        .await
        .unwrap();
    assert_eq!(preview.chunks.len(), 3);
    assert!(preview.skipped.is_empty());

    let saved = service.save("p1", &preview.hash).await.unwrap();
    assert_eq!(saved.chunks, preview.chunks);

    let (listed, pagination) = service
        .get_list_pagination("p1", &ListChunksRequest::default())
        .await
        .unwrap();
    assert_eq!(pagination.total_items, 3);
    let mut listed_ids: Vec<String> = listed.into_iter().map(|item| item.chunk.id).collect();
    let mut previewed_ids: Vec<String> = preview.chunks.iter().map(|c| c.id.clone()).collect();
    listed_ids.sort();
    previewed_ids.sort();
    assert_eq!(listed_ids, previewed_ids);
}

#[tokio::test]
async fn permuted_file_ids_hit_the_same_preview() {
    let (dir, db) = setup_backend().await;
    let service = chunk_service(db, Duration::from_secs(300));
    let a = register_source(&service, dir.path(), "p1", "a.txt", "alpha").await;
    let b = register_source(&service, dir.path(), "p1", "b.txt", "beta").await;

    let first = service
        .create("p1", &recursive(vec![a.id.clone(), b.id.clone()], 100))
        .await
        .unwrap();
    let second = service
        .create("p1", &recursive(vec![b.id, a.id], 100))
        .await
        .unwrap();

    assert_eq!(first.hash, second.hash);
    assert!(second.from_cache);
    assert_eq!(second.chunks, first.chunks);
}

#[tokio::test]
async fn save_after_ttl_is_stale() {
    let (dir, db) = setup_backend().await;
    let service = chunk_service(db, Duration::from_millis(40));
    let doc = register_source(&service, dir.path(), "p1", "a.txt", "short lived").await;

    let preview = service
        .create("p1", &recursive(vec![doc.id], 100))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(120)).await;

    let err = service.save("p1", &preview.hash).await.unwrap_err();
    assert!(matches!(err, LoomError::StaleCache(_)));
}

#[tokio::test]
async fn merge_appends_source_and_moves_questions() {
    let (dir, db) = setup_backend().await;
    let service = chunk_service(Arc::clone(&db), Duration::from_secs(300));
    let doc = register_source(&service, dir.path(), "p1", "notes.txt", "y\n\nx").await;

    // chunk size 1 splits the two paragraphs apart
    let run = service
        .chunk_and_save("p1", &recursive(vec![doc.id], 1))
        .await
        .unwrap();
    assert_eq!(run.chunks.len(), 2);
    let target = run.chunks[0].clone();
    let source = run.chunks[1].clone();
    assert_eq!(target.content, "y");
    assert_eq!(source.content, "x");

    db.create_question(&Question::new(
        "q1".into(),
        "p1".into(),
        source.id.clone(),
        source.name.clone(),
        "what is x?".into(),
    ))
    .await
    .unwrap();

    let result = service
        .merge_chunks("p1", &source.id, &target.id)
        .await
        .unwrap();
    assert_eq!(result.merged_chunk.content, "y\n\nx");
    assert_eq!(result.merged_chunk.size, 4);
    assert_eq!(result.deleted_chunk_id, source.id);

    assert!(matches!(
        service.get_chunk("p1", &source.id).await.unwrap_err(),
        LoomError::NotFound(_)
    ));
    let moved = db.list_questions_by_context("p1", &target.id).await.unwrap();
    assert_eq!(moved.len(), 1);
    assert_eq!(moved[0].context_name, target.name);

    let generated = ListChunksRequest {
        status: ChunkQuestionStatus::Generated,
        ..Default::default()
    };
    let (items, _) = service.get_list_pagination("p1", &generated).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].question_count, 1);
}

#[tokio::test]
async fn merge_with_unknown_chunk_changes_nothing() {
    let (dir, db) = setup_backend().await;
    let service = chunk_service(db, Duration::from_secs(300));
    let doc = register_source(&service, dir.path(), "p1", "a.txt", "keep me").await;
    let run = service
        .chunk_and_save("p1", &recursive(vec![doc.id], 100))
        .await
        .unwrap();
    let existing = run.chunks[0].clone();

    let err = service
        .merge_chunks("p1", "ghost", &existing.id)
        .await
        .unwrap_err();
    assert!(matches!(err, LoomError::NotFound(_)));

    let err = service
        .merge_chunks("p1", &existing.id, "ghost")
        .await
        .unwrap_err();
    assert!(matches!(err, LoomError::NotFound(_)));

    assert_eq!(service.get_chunk("p1", &existing.id).await.unwrap(), existing);
}

#[tokio::test]
async fn chunk_numbering_restarts_per_document() {
    let (dir, db) = setup_backend().await;
    let service = chunk_service(db, Duration::from_secs(300));
    let a = register_source(&service, dir.path(), "p1", "first.txt", "a1\n\na2").await;
    let b = register_source(&service, dir.path(), "p1", "second.txt", "b1\n\nb2").await;

    let preview = service
        .create("p1", &recursive(vec![a.id, b.id], 2))
        .await
        .unwrap();
    let mut names: Vec<&str> = preview.chunks.iter().map(|c| c.name.as_str()).collect();
    names.sort();
    assert_eq!(
        names,
        vec![
            "first-chunk-1",
            "first-chunk-2",
            "second-chunk-1",
            "second-chunk-2"
        ]
    );
}
