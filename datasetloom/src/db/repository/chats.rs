use libsql::{params, Connection};

use crate::error::{LoomError, Result};
use crate::models::{Chat, ChatCursor, ChatMessage, MessageRole, Visibility, Vote};

use super::{begin, finish, format_ts, parse_ts};

const CHAT_COLUMNS: &str = "id, user_id, project_id, title, visibility, created_at";

/// Chats the owner may see in a project: their own plus every public one.
const VISIBLE_TO_OWNER: &str = "project_id = ?1 AND (user_id = ?2 OR visibility = 'public')";

pub struct ChatRepository;

impl ChatRepository {
    pub async fn create(conn: &Connection, chat: &Chat) -> Result<()> {
        conn.execute(
            r#"
            INSERT INTO chats (id, user_id, project_id, title, visibility, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                chat.id.clone(),
                chat.user_id.clone(),
                chat.project_id.clone(),
                chat.title.clone(),
                chat.visibility.to_string(),
                format_ts(&chat.created_at),
            ],
        )
        .await?;

        Ok(())
    }

    pub async fn get_by_id(conn: &Connection, project_id: &str, id: &str) -> Result<Option<Chat>> {
        let sql = format!("SELECT {CHAT_COLUMNS} FROM chats WHERE id = ?1 AND project_id = ?2");
        let mut rows = conn.query(&sql, params![id, project_id]).await?;

        if let Some(row) = rows.next().await? {
            Ok(Some(Self::row_to_chat(&row)?))
        } else {
            Ok(None)
        }
    }

    /// Delete a chat together with its messages and votes.
    pub async fn delete(conn: &Connection, project_id: &str, id: &str) -> Result<bool> {
        let tx = begin(conn, "delete_chat").await?;
        let result = async {
            let removed = tx
                .execute(
                    "DELETE FROM chats WHERE id = ?1 AND project_id = ?2",
                    params![id, project_id],
                )
                .await?;
            if removed == 0 {
                return Ok(false);
            }
            tx.execute("DELETE FROM votes WHERE chat_id = ?1", params![id])
                .await?;
            tx.execute("DELETE FROM chat_messages WHERE chat_id = ?1", params![id])
                .await?;
            Ok::<bool, LoomError>(true)
        }
        .await;
        finish(tx, "delete_chat", result).await
    }

    /// One page of chats ordered newest first (`created_at DESC, id DESC`).
    ///
    /// `StartingAfter` walks towards older chats, `EndingBefore` towards newer
    /// ones; either way the page comes back in listing order. Fetches one row
    /// past `limit` to tell whether more exist.
    pub async fn list_page(
        conn: &Connection,
        owner_id: &str,
        project_id: &str,
        limit: u32,
        cursor: Option<&ChatCursor>,
    ) -> Result<(Vec<Chat>, bool)> {
        let fetch = i64::from(limit) + 1;

        let (sql, values) = match cursor {
            None => (
                format!(
                    "SELECT {CHAT_COLUMNS} FROM chats WHERE {VISIBLE_TO_OWNER} \
                     ORDER BY created_at DESC, id DESC LIMIT ?3"
                ),
                vec![
                    libsql::Value::from(project_id.to_string()),
                    libsql::Value::from(owner_id.to_string()),
                    libsql::Value::from(fetch),
                ],
            ),
            Some(cursor) => {
                let anchor = Self::get_by_id(conn, project_id, cursor.id())
                    .await?
                    .ok_or_else(|| {
                        LoomError::NotFound(format!("Chat with id {} not found", cursor.id()))
                    })?;
                let (comparison, direction) = match cursor {
                    ChatCursor::StartingAfter(_) => ("<", "DESC"),
                    ChatCursor::EndingBefore(_) => (">", "ASC"),
                };
                (
                    format!(
                        "SELECT {CHAT_COLUMNS} FROM chats WHERE {VISIBLE_TO_OWNER} \
                         AND (created_at {comparison} ?3 OR (created_at = ?3 AND id {comparison} ?4)) \
                         ORDER BY created_at {direction}, id {direction} LIMIT ?5"
                    ),
                    vec![
                        libsql::Value::from(project_id.to_string()),
                        libsql::Value::from(owner_id.to_string()),
                        libsql::Value::from(format_ts(&anchor.created_at)),
                        libsql::Value::from(anchor.id),
                        libsql::Value::from(fetch),
                    ],
                )
            }
        };

        let mut rows = conn.query(&sql, libsql::params_from_iter(values)).await?;
        let mut chats = Vec::new();
        while let Some(row) = rows.next().await? {
            chats.push(Self::row_to_chat(&row)?);
        }

        let has_more = chats.len() > limit as usize;
        chats.truncate(limit as usize);

        if matches!(cursor, Some(ChatCursor::EndingBefore(_))) {
            chats.reverse();
        }

        Ok((chats, has_more))
    }

    /// Insert messages in order, atomically.
    pub async fn save_messages(conn: &Connection, messages: &[ChatMessage]) -> Result<()> {
        let tx = begin(conn, "save_messages").await?;
        let result = async {
            for message in messages {
                tx.execute(
                    r#"
                    INSERT INTO chat_messages (id, chat_id, role, content, created_at)
                    VALUES (?1, ?2, ?3, ?4, ?5)
                    "#,
                    params![
                        message.id.clone(),
                        message.chat_id.clone(),
                        message.role.to_string(),
                        serde_json::to_string(&message.content)?,
                        format_ts(&message.created_at),
                    ],
                )
                .await?;
            }
            Ok::<(), LoomError>(())
        }
        .await;
        finish(tx, "save_messages", result).await
    }

    pub async fn get_messages(conn: &Connection, chat_id: &str) -> Result<Vec<ChatMessage>> {
        let mut rows = conn
            .query(
                "SELECT id, chat_id, role, content, created_at FROM chat_messages \
                 WHERE chat_id = ?1 ORDER BY created_at ASC, rowid ASC",
                params![chat_id],
            )
            .await?;

        let mut messages = Vec::new();
        while let Some(row) = rows.next().await? {
            let role: String = row.get(2)?;
            messages.push(ChatMessage {
                id: row.get(0)?,
                chat_id: row.get(1)?,
                role: role.parse().unwrap_or(MessageRole::User),
                content: serde_json::from_str(&row.get::<String>(3)?)?,
                created_at: parse_ts(&row.get::<String>(4)?)?,
            });
        }
        Ok(messages)
    }

    pub async fn message_exists(conn: &Connection, chat_id: &str, message_id: &str) -> Result<bool> {
        let mut rows = conn
            .query(
                "SELECT 1 FROM chat_messages WHERE chat_id = ?1 AND id = ?2",
                params![chat_id, message_id],
            )
            .await?;
        Ok(rows.next().await?.is_some())
    }

    /// One vote per message; voting again replaces the previous value.
    pub async fn upsert_vote(conn: &Connection, vote: &Vote) -> Result<()> {
        conn.execute(
            r#"
            INSERT INTO votes (chat_id, message_id, is_upvoted)
            VALUES (?1, ?2, ?3)
            ON CONFLICT (chat_id, message_id) DO UPDATE SET is_upvoted = excluded.is_upvoted
            "#,
            params![
                vote.chat_id.clone(),
                vote.message_id.clone(),
                i64::from(vote.is_upvoted),
            ],
        )
        .await?;
        Ok(())
    }

    pub async fn get_votes(conn: &Connection, chat_id: &str) -> Result<Vec<Vote>> {
        let mut rows = conn
            .query(
                "SELECT chat_id, message_id, is_upvoted FROM votes \
                 WHERE chat_id = ?1 ORDER BY message_id ASC",
                params![chat_id],
            )
            .await?;

        let mut votes = Vec::new();
        while let Some(row) = rows.next().await? {
            votes.push(Vote {
                chat_id: row.get(0)?,
                message_id: row.get(1)?,
                is_upvoted: row.get::<i64>(2)? != 0,
            });
        }
        Ok(votes)
    }

    fn row_to_chat(row: &libsql::Row) -> Result<Chat> {
        Ok(Chat {
            id: row.get(0)?,
            user_id: row.get(1)?,
            project_id: row.get(2)?,
            title: row.get(3)?,
            visibility: row
                .get::<String>(4)?
                .parse()
                .unwrap_or(Visibility::Private),
            created_at: parse_ts(&row.get::<String>(5)?)?,
        })
    }
}
