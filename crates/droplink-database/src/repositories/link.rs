//! Share link repository implementation.

use droplink_core::error::{AppError, ErrorKind};
use droplink_core::result::AppResult;
use droplink_core::types::{FileId, LinkId};
use droplink_entity::share::{CreateShareLink, ShareLink};

use sqlx::PgPool;

/// Repository for share link rows.
#[derive(Debug, Clone)]
pub struct ShareLinkRepository {
    pool: PgPool,
}

impl ShareLinkRepository {
    /// Create a new share link repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a link by ID.
    pub async fn find_by_id(&self, id: LinkId) -> AppResult<Option<ShareLink>> {
        sqlx::query_as::<_, ShareLink>("SELECT * FROM share_links WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find link", e))
    }

    /// Find a link by its token.
    pub async fn find_by_token(&self, token: &str) -> AppResult<Option<ShareLink>> {
        sqlx::query_as::<_, ShareLink>("SELECT * FROM share_links WHERE token = $1")
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find link by token", e)
            })
    }

    /// List the links issued for a file, newest first.
    pub async fn find_by_file(&self, file_id: FileId) -> AppResult<Vec<ShareLink>> {
        sqlx::query_as::<_, ShareLink>(
            "SELECT * FROM share_links WHERE file_id = $1 ORDER BY created_at DESC",
        )
        .bind(file_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list links", e))
    }

    /// Create a new share link.
    pub async fn create(&self, data: &CreateShareLink) -> AppResult<ShareLink> {
        sqlx::query_as::<_, ShareLink>(
            "INSERT INTO share_links (file_id, link_type, recipient_email, token, password_hash, \
             expires_at, download_limit) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(data.file_id)
        .bind(data.link_type)
        .bind(&data.recipient_email)
        .bind(&data.token)
        .bind(&data.password_hash)
        .bind(data.expires_at)
        .bind(data.download_limit)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create link", e))
    }
}
