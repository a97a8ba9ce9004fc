use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use datasetloom::api::{create_router, AppState};
use datasetloom::cache::{CacheStore, LruCacheStore};
use datasetloom::config::Config;
use datasetloom::db::{Database, DatabaseBackend, LibSqlBackend};

#[derive(Parser)]
#[command(name = "datasetloom")]
#[command(about = "Chunk documents and curate fine-tuning datasets")]
struct Args {
    /// Bind address, overrides LOOM_HOST
    #[arg(long)]
    host: Option<String>,

    /// Listen port, overrides LOOM_PORT
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "datasetloom=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = Config::from_env();
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    if config.server.api_keys.is_empty() {
        tracing::warn!(
            "LOOM_API_KEYS is not set, so every /projects route will answer 401. Set LOOM_API_KEYS to enable access."
        );
    }

    tracing::info!("Initializing database...");
    let raw_db = Database::new(&config.database).await?;
    let db: Arc<dyn DatabaseBackend> = Arc::new(LibSqlBackend::new(raw_db));

    tracing::info!(
        capacity = config.chunking.preview_cache_capacity,
        ttl_secs = config.chunking.preview_ttl_secs,
        "Initializing preview cache..."
    );
    let cache: Arc<dyn CacheStore> =
        Arc::new(LruCacheStore::new(config.chunking.preview_cache_capacity));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(config, db, cache);
    let app = create_router(state);

    tracing::info!("DatasetLoom starting on http://{}", addr);
    tracing::info!("  Health check: http://{}/api/v1/health", addr);
    tracing::info!("  API docs:     http://{}/api/v1/docs", addr);
    tracing::info!("  OpenAPI spec: http://{}/api/v1/openapi.json", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
