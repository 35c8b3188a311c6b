//! nota-api - HTTP API server for nota

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nota_api::{router, AppState};
use nota_core::NoteStore;
use nota_db::{Database, MemNoteStore};

/// Default trash retention window in days, matching the "30-day trash"
/// promise shown to users.
const DEFAULT_TRASH_RETENTION_DAYS: i64 = 30;

/// How often the reaper sweeps the trash.
const REAPER_INTERVAL_SECS: u64 = 3600;

/// Periodically purge trashed notes older than the retention window.
async fn trash_reaper(store: Arc<dyn NoteStore>, retention_days: i64) {
    let retention = chrono::Duration::days(retention_days);
    let mut interval = tokio::time::interval(std::time::Duration::from_secs(REAPER_INTERVAL_SECS));
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        interval.tick().await;
        match store.purge_expired(retention).await {
            Ok(0) => {}
            Ok(purged) => info!(purged, retention_days, "Trash reaper purged expired notes"),
            Err(e) => warn!(error = %e, "Trash reaper sweep failed"),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with configurable output
    //
    // Environment variables:
    //   LOG_FORMAT  - "json" or "text" (default: "text")
    //   LOG_FILE    - path to log file (optional, enables file logging)
    //   RUST_LOG    - standard env filter (default: "nota_api=debug,tower_http=debug")
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let log_file = std::env::var("LOG_FILE").ok();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "nota_api=debug,tower_http=debug".into());

    let registry = tracing_subscriber::registry().with(env_filter);

    // Optionally create a file appender with daily rotation
    let _file_guard = if let Some(ref path) = log_file {
        let file_dir = std::path::Path::new(path)
            .parent()
            .unwrap_or(std::path::Path::new("."));
        let file_name = std::path::Path::new(path)
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("nota-api.log");
        let file_appender = tracing_appender::rolling::daily(file_dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        if log_format == "json" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking),
                )
                .init();
        } else {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(non_blocking)
                        .with_ansi(false),
                )
                .init();
        }
        Some(guard)
    } else if log_format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
        None
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
        None
    };

    // Get configuration from environment
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse()
        .unwrap_or(3000);
    let retention_days: i64 = std::env::var("TRASH_RETENTION_DAYS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_TRASH_RETENTION_DAYS);

    // Pick the store backend. Without DATABASE_URL the server runs on the
    // in-memory store, losing everything on restart (dev mode).
    let store: Arc<dyn NoteStore> = match std::env::var("DATABASE_URL") {
        Ok(database_url) => {
            info!("Connecting to database...");
            let db = Database::connect(&database_url).await?;
            info!("Running database migrations...");
            db.migrate().await?;
            info!("Database ready");
            Arc::new(db.notes)
        }
        Err(_) => {
            warn!("DATABASE_URL not set; using in-memory store (notes are not persisted)");
            Arc::new(MemNoteStore::new())
        }
    };

    // Background trash reaper
    let reaper_store = store.clone();
    tokio::spawn(async move {
        trash_reaper(reaper_store, retention_days).await;
    });
    info!(retention_days, "Trash reaper scheduled");

    let app = router(AppState::new(store));

    // Start server
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
