//! Stored file repository implementation.

use droplink_core::error::{AppError, ErrorKind};
use droplink_core::result::AppResult;
use droplink_core::types::FileId;
use droplink_entity::file::{CreateStoredFile, StoredFile};

use chrono::{DateTime, Utc};
use sqlx::PgPool;

/// Repository for stored file rows.
#[derive(Debug, Clone)]
pub struct FileRepository {
    pool: PgPool,
}

impl FileRepository {
    /// Create a new file repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a file by ID.
    pub async fn find_by_id(&self, id: FileId) -> AppResult<Option<StoredFile>> {
        sqlx::query_as::<_, StoredFile>("SELECT * FROM files WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find file", e))
    }

    /// Register a new file. New files default to locked with a zero
    /// download counter.
    pub async fn create(&self, data: &CreateStoredFile) -> AppResult<StoredFile> {
        sqlx::query_as::<_, StoredFile>(
            "INSERT INTO files (name, storage_path, mime_type, size_bytes, share_code) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(&data.name)
        .bind(&data.storage_path)
        .bind(&data.mime_type)
        .bind(data.size_bytes)
        .bind(&data.share_code)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create file", e))
    }

    /// Update the owner-editable direct access settings.
    pub async fn update_access_settings(
        &self,
        id: FileId,
        is_public: bool,
        password_hash: Option<&str>,
        expires_at: Option<DateTime<Utc>>,
        download_limit: Option<i32>,
    ) -> AppResult<Option<StoredFile>> {
        sqlx::query_as::<_, StoredFile>(
            "UPDATE files SET is_public = $2, password_hash = $3, expires_at = $4, \
             download_limit = $5, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(is_public)
        .bind(password_hash)
        .bind(expires_at)
        .bind(download_limit)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update file", e))
    }

    /// Delete a file. Share links and audit entries referencing it are
    /// removed by `ON DELETE CASCADE`. Returns `true` if a row was deleted.
    pub async fn delete(&self, id: FileId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM files WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete file", e))?;
        Ok(result.rows_affected() > 0)
    }
}
