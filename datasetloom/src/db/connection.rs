use libsql::{Builder, Connection};
use std::sync::Arc;

use crate::config::DatabaseConfig;
use crate::error::Result;

use super::schema;

/// Handle to a libsql database. Cheap to clone.
#[derive(Clone)]
pub struct Database {
    db: Arc<libsql::Database>,
    busy_timeout_ms: u64,
    remote: bool,
}

impl Database {
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        let remote_url = config.url.starts_with("libsql://") || config.url.starts_with("https://");
        let db = if remote_url {
            let token = config.auth_token.clone().unwrap_or_default();
            match &config.local_path {
                Some(local_path) => {
                    let replica = Builder::new_remote_replica(local_path, config.url.clone(), token)
                        .build()
                        .await?;
                    let replicated = replica.sync().await?;
                    tracing::info!(replicated = ?replicated, "Embedded replica synced");
                    replica
                }
                None => Builder::new_remote(config.url.clone(), token).build().await?,
            }
        } else {
            let path = config.url.strip_prefix("file:").unwrap_or(&config.url);
            Builder::new_local(path).build().await?
        };

        let pragmas = vec![
            format!(
                "PRAGMA journal_mode = {}",
                normalize_journal_mode(&config.journal_mode)
            ),
            format!(
                "PRAGMA synchronous = {}",
                normalize_synchronous(&config.synchronous)
            ),
        ];

        let database = Self {
            db: Arc::new(db),
            busy_timeout_ms: config.busy_timeout_ms,
            // Replicas execute locally, only plain remote connections lack pragmas.
            remote: remote_url && config.local_path.is_none(),
        };

        let conn = database.connect().await?;
        apply_pragmas(&conn, &pragmas).await;
        schema::init_schema(&conn).await?;

        tracing::info!(url = %config.url, "Database ready");
        Ok(database)
    }

    /// Open a connection with the configured busy timeout applied.
    pub async fn connect(&self) -> Result<Connection> {
        let conn = self.db.connect()?;
        if !self.remote {
            conn.execute_batch(&format!("PRAGMA busy_timeout = {}", self.busy_timeout_ms))
                .await?;
        }
        Ok(conn)
    }
}

/// Best effort: remote databases reject most pragmas.
async fn apply_pragmas(conn: &Connection, pragmas: &[String]) {
    for pragma in pragmas {
        if let Err(error) = conn.execute_batch(pragma).await {
            tracing::warn!(pragma = %pragma, error = %error, "Failed to apply pragma");
        }
    }
}

fn normalize_journal_mode(value: &str) -> &'static str {
    match value.trim().to_uppercase().as_str() {
        "DELETE" => "DELETE",
        "TRUNCATE" => "TRUNCATE",
        "PERSIST" => "PERSIST",
        "MEMORY" => "MEMORY",
        "OFF" => "OFF",
        _ => "WAL",
    }
}

fn normalize_synchronous(value: &str) -> &'static str {
    match value.trim().to_uppercase().as_str() {
        "OFF" => "OFF",
        "FULL" => "FULL",
        "EXTRA" => "EXTRA",
        _ => "NORMAL",
    }
}
