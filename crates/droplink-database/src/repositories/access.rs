//! PostgreSQL implementation of the access record store.
//!
//! `consume` is the authoritative side of the download-limit invariant:
//! the increment is a conditional UPDATE whose WHERE clause re-checks the
//! restrictions against current row state, so concurrent requests
//! serialize at the row and the counter can never pass the limit, no
//! matter how many processes commit at once. The audit INSERT rides the
//! same transaction — counter and audit history cannot diverge.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use droplink_core::error::{AppError, ErrorKind};
use droplink_core::result::AppResult;
use droplink_core::types::{FileId, LinkId};
use droplink_entity::audit::CreateAuditEntry;
use droplink_entity::file::StoredFile;
use droplink_entity::share::{
    AccessKey, AccessRecordStore, ConsumeOutcome, ResolvedAccess, ShareLink, ShareTarget, TargetRef,
};

/// Access record store backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgAccessStore {
    pool: PgPool,
}

impl PgAccessStore {
    /// Create a new access store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn resolve_code(&self, code: &str) -> AppResult<Option<ResolvedAccess>> {
        let file = sqlx::query_as::<_, StoredFile>("SELECT * FROM files WHERE share_code = $1")
            .bind(code)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to resolve share code", e)
            })?;

        Ok(file.map(|file| ResolvedAccess {
            target: ShareTarget::DirectCode(file.clone()),
            file,
        }))
    }

    async fn resolve_token(&self, token: &str) -> AppResult<Option<ResolvedAccess>> {
        let link = sqlx::query_as::<_, ShareLink>("SELECT * FROM share_links WHERE token = $1")
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to resolve link token", e)
            })?;

        let Some(link) = link else {
            return Ok(None);
        };

        let file = sqlx::query_as::<_, StoredFile>("SELECT * FROM files WHERE id = $1")
            .bind(link.file_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to load linked file", e)
            })?;

        // A link without its file is a dangling row mid-cascade; treat as
        // unresolved.
        Ok(file.map(|file| ResolvedAccess {
            target: ShareTarget::IndirectLink(link),
            file,
        }))
    }

    async fn consume_file(
        &self,
        file_id: FileId,
        now: DateTime<Utc>,
        audit: &CreateAuditEntry,
    ) -> AppResult<ConsumeOutcome> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin consume transaction", e)
        })?;

        let count: Option<i32> = sqlx::query_scalar(
            "UPDATE files SET download_count = download_count + 1, updated_at = $2 \
             WHERE id = $1 AND is_public \
               AND (expires_at IS NULL OR expires_at >= $2) \
               AND (download_limit IS NULL OR download_count < download_limit) \
             RETURNING download_count",
        )
        .bind(file_id)
        .bind(now)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to increment file downloads", e)
        })?;

        let Some(download_count) = count else {
            tx.rollback().await.map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to roll back consume", e)
            })?;
            return Ok(ConsumeOutcome::Contended);
        };

        insert_audit(&mut tx, audit, now).await?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit consume", e)
        })?;

        Ok(ConsumeOutcome::Committed { download_count })
    }

    async fn consume_link(
        &self,
        link_id: LinkId,
        now: DateTime<Utc>,
        audit: &CreateAuditEntry,
    ) -> AppResult<ConsumeOutcome> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin consume transaction", e)
        })?;

        let count: Option<i32> = sqlx::query_scalar(
            "UPDATE share_links SET download_count = download_count + 1, last_accessed = $2 \
             WHERE id = $1 AND is_active \
               AND (expires_at IS NULL OR expires_at >= $2) \
               AND (download_limit IS NULL OR download_count < download_limit) \
             RETURNING download_count",
        )
        .bind(link_id)
        .bind(now)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to increment link downloads", e)
        })?;

        let Some(download_count) = count else {
            tx.rollback().await.map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to roll back consume", e)
            })?;
            return Ok(ConsumeOutcome::Contended);
        };

        insert_audit(&mut tx, audit, now).await?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit consume", e)
        })?;

        Ok(ConsumeOutcome::Committed { download_count })
    }
}

async fn insert_audit(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    audit: &CreateAuditEntry,
    now: DateTime<Utc>,
) -> AppResult<()> {
    sqlx::query(
        "INSERT INTO download_audit (file_id, link_id, ip_address, user_agent, access_method, created_at) \
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(audit.file_id)
    .bind(audit.link_id)
    .bind(&audit.ip_address)
    .bind(&audit.user_agent)
    .bind(audit.access_method)
    .bind(now)
    .execute(&mut **tx)
    .await
    .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to record audit entry", e))?;
    Ok(())
}

#[async_trait]
impl AccessRecordStore for PgAccessStore {
    async fn resolve(&self, key: &AccessKey) -> AppResult<Option<ResolvedAccess>> {
        match key {
            AccessKey::Code(code) => self.resolve_code(code).await,
            AccessKey::Token(token) => self.resolve_token(token).await,
        }
    }

    async fn consume(
        &self,
        target: TargetRef,
        now: DateTime<Utc>,
        audit: &CreateAuditEntry,
    ) -> AppResult<ConsumeOutcome> {
        match target {
            TargetRef::File(file_id) => self.consume_file(file_id, now, audit).await,
            TargetRef::Link(link_id) => self.consume_link(link_id, now, audit).await,
        }
    }

    async fn deactivate_link(&self, link_id: LinkId) -> AppResult<bool> {
        let result = sqlx::query("UPDATE share_links SET is_active = FALSE WHERE id = $1")
            .bind(link_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to deactivate link", e)
            })?;
        Ok(result.rows_affected() > 0)
    }
}
