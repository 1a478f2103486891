//! Download audit repository implementation.

use sqlx::PgPool;

use droplink_core::error::{AppError, ErrorKind};
use droplink_core::result::AppResult;
use droplink_core::types::FileId;
use droplink_entity::audit::AuditEntry;

/// Repository for download audit entries.
///
/// Entries are appended by the access store inside the consume
/// transaction; this repository only reads them.
#[derive(Debug, Clone)]
pub struct AuditRepository {
    pool: PgPool,
}

impl AuditRepository {
    /// Create a new audit repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List the download history of a file, newest first.
    pub async fn find_by_file(&self, file_id: FileId) -> AppResult<Vec<AuditEntry>> {
        sqlx::query_as::<_, AuditEntry>(
            "SELECT * FROM download_audit WHERE file_id = $1 ORDER BY created_at DESC",
        )
        .bind(file_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list audit entries", e))
    }
}
