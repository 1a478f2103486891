//! Droplink server — file sharing with access-controlled downloads.
//!
//! Entry point that wires configuration, database, blob storage, the
//! access engine, and the HTTP API together.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use droplink_api::AppState;
use droplink_auth::password::PasswordHasher;
use droplink_core::config::AppConfig;
use droplink_core::error::AppError;
use droplink_core::traits::clock::SystemClock;
use droplink_database::DatabasePool;
use droplink_database::repositories::{
    AuditRepository, FileRepository, PgAccessStore, ShareLinkRepository,
};
use droplink_engine::{
    AccessControlService, FileService, GrantEvaluator, ShareService, TokenGenerator,
};
use droplink_storage::local::LocalBlobStore;

#[tokio::main]
async fn main() {
    let env = std::env::var("DROPLINK_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging.
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Droplink v{}", env!("CARGO_PKG_VERSION"));

    // Database connection and migrations.
    let db = Arc::new(DatabasePool::connect(&config.database).await?);
    db.run_migrations().await?;

    // Blob storage.
    let blobs = Arc::new(LocalBlobStore::new(&config.storage.blob_root).await?);

    // Repositories and the access record store.
    let pool = db.pool().clone();
    let file_repo = FileRepository::new(pool.clone());
    let link_repo = ShareLinkRepository::new(pool.clone());
    let audit_repo = AuditRepository::new(pool.clone());
    let access_store = Arc::new(PgAccessStore::new(pool));

    // The access engine and services.
    let hasher = Arc::new(PasswordHasher::new(&config.security));
    let tokens = TokenGenerator::new(&config.security);
    let clock = Arc::new(SystemClock);

    let access_service = Arc::new(AccessControlService::new(
        access_store,
        GrantEvaluator::new(hasher.clone()),
        clock,
    ));
    let file_service = Arc::new(FileService::new(
        file_repo.clone(),
        blobs.clone(),
        hasher.clone(),
        tokens,
    ));
    let share_service = Arc::new(ShareService::new(link_repo, file_repo, hasher, tokens));

    let config = Arc::new(config);
    let state = AppState {
        config: config.clone(),
        db: db.clone(),
        blobs,
        access_service,
        file_service,
        share_service,
        audit_repo,
    };

    let app = droplink_api::build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("Droplink server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received, starting graceful shutdown...");
        })
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    db.close().await;
    tracing::info!("Droplink server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
