use libsql::Connection;

use crate::error::Result;

pub async fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        -- Source documents registered against a project
        CREATE TABLE IF NOT EXISTS documents (
            id TEXT PRIMARY KEY,
            project_id TEXT NOT NULL,
            file_name TEXT NOT NULL,
            path TEXT,
            parser_file_path TEXT,
            size INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_documents_project_id ON documents(project_id);

        -- Chunks produced from documents
        CREATE TABLE IF NOT EXISTS chunks (
            id TEXT PRIMARY KEY,
            project_id TEXT NOT NULL,
            document_id TEXT NOT NULL,
            document_name TEXT NOT NULL,
            name TEXT NOT NULL,
            content TEXT NOT NULL,
            size INTEGER NOT NULL,
            tags TEXT,
            domain TEXT,
            sub_domain TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_chunks_project_id ON chunks(project_id);
        CREATE INDEX IF NOT EXISTS idx_chunks_document_id ON chunks(document_id);
        CREATE INDEX IF NOT EXISTS idx_chunks_project_created
            ON chunks(project_id, created_at, name);

        -- Questions anchored to a chunk or image
        CREATE TABLE IF NOT EXISTS questions (
            id TEXT PRIMARY KEY,
            project_id TEXT NOT NULL,
            context_id TEXT NOT NULL,
            context_type TEXT NOT NULL DEFAULT 'text',
            context_data TEXT,
            context_name TEXT NOT NULL,
            question TEXT NOT NULL,
            real_question TEXT,
            label TEXT,
            answered INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_questions_context_id ON questions(context_id);
        CREATE INDEX IF NOT EXISTS idx_questions_project_id ON questions(project_id);

        -- Chats
        CREATE TABLE IF NOT EXISTS chats (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            project_id TEXT NOT NULL,
            title TEXT NOT NULL,
            visibility TEXT NOT NULL DEFAULT 'private',
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_chats_listing
            ON chats(project_id, created_at DESC, id DESC);
        CREATE INDEX IF NOT EXISTS idx_chats_user_id ON chats(user_id);

        CREATE TABLE IF NOT EXISTS chat_messages (
            id TEXT PRIMARY KEY,
            chat_id TEXT NOT NULL,
            role TEXT NOT NULL,
            content TEXT NOT NULL,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_chat_messages_chat_id
            ON chat_messages(chat_id, created_at);

        CREATE TABLE IF NOT EXISTS votes (
            chat_id TEXT NOT NULL,
            message_id TEXT NOT NULL,
            is_upvoted INTEGER NOT NULL,
            PRIMARY KEY (chat_id, message_id)
        );
        "#,
    )
    .await?;

    Ok(())
}
