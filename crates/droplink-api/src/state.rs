//! Application state shared across all handlers.

use std::sync::Arc;

use droplink_core::config::AppConfig;
use droplink_core::traits::storage::BlobStore;
use droplink_database::DatabasePool;
use droplink_database::repositories::AuditRepository;
use droplink_engine::{AccessControlService, FileService, ShareService};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`. All fields are
/// `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// PostgreSQL connection pool wrapper, kept for health reporting.
    pub db: Arc<DatabasePool>,
    /// Blob store, kept for health reporting.
    pub blobs: Arc<dyn BlobStore>,
    /// Access evaluation and download accounting.
    pub access_service: Arc<AccessControlService>,
    /// File registration and lifecycle.
    pub file_service: Arc<FileService>,
    /// Share link issuance.
    pub share_service: Arc<ShareService>,
    /// Read access to the download audit trail.
    pub audit_repo: AuditRepository,
}
