mod chats;
mod chunks;
mod documents;
mod questions;

pub use chats::ChatRepository;
pub use chunks::ChunkRepository;
pub use documents::DocumentRepository;
pub use questions::QuestionRepository;

use chrono::{DateTime, SecondsFormat, Utc};
use libsql::Transaction;

use crate::error::{LoomError, Result};

/// Fixed-width UTC timestamp, so string order in SQL matches time order.
pub(crate) fn format_ts(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_ts(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| LoomError::Internal(format!("Invalid stored timestamp {value:?}: {e}")))
}

/// `?, ?, ?` for an `IN (...)` list of `n` values.
pub(crate) fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

/// Start a transaction, tagging a failure to begin with `operation`.
pub(crate) async fn begin(conn: &libsql::Connection, operation: &'static str) -> Result<Transaction> {
    conn.transaction()
        .await
        .map_err(|e| LoomError::in_transaction(operation, e.into()))
}

/// Commit on success, roll back on failure.
pub(crate) async fn finish<T>(
    tx: Transaction,
    operation: &'static str,
    result: Result<T>,
) -> Result<T> {
    match result {
        Ok(value) => {
            tx.commit()
                .await
                .map_err(|e| LoomError::in_transaction(operation, e.into()))?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                tracing::warn!(
                    operation,
                    error = %rollback_err,
                    "Rollback failed"
                );
            }
            Err(LoomError::in_transaction(operation, err))
        }
    }
}
