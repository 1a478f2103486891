//! File lifecycle: register a blob, adjust its direct access settings,
//! delete it.

use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use droplink_auth::password::PasswordHasher;
use droplink_core::error::AppError;
use droplink_core::result::AppResult;
use droplink_core::traits::storage::{BlobStore, ByteStream};
use droplink_core::types::FileId;
use droplink_database::repositories::FileRepository;
use droplink_entity::file::{CreateStoredFile, StoredFile};

use crate::access::TokenGenerator;

/// Upload parameters for a new file.
#[derive(Debug, Clone)]
pub struct NewFile {
    /// Original file name.
    pub name: String,
    /// MIME type, if the uploader declared one.
    pub mime_type: Option<String>,
    /// File contents.
    pub data: Bytes,
}

/// Owner-editable direct access settings.
///
/// The whole set is replaced at once: omitting the password clears it,
/// same for expiry and limit. Partial patches invite stale-read bugs
/// when two updates race.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessSettingsUpdate {
    /// Whether direct access by share code is enabled.
    pub is_public: bool,
    /// New plaintext password, or None to remove protection.
    pub password: Option<String>,
    /// New expiry, or None for never.
    pub expires_at: Option<DateTime<Utc>>,
    /// New download limit, or None for unlimited.
    pub download_limit: Option<i32>,
}

/// Manages stored files and their blobs.
#[derive(Debug, Clone)]
pub struct FileService {
    files: FileRepository,
    blobs: Arc<dyn BlobStore>,
    hasher: Arc<PasswordHasher>,
    tokens: TokenGenerator,
}

impl FileService {
    /// Creates a new file service.
    pub fn new(
        files: FileRepository,
        blobs: Arc<dyn BlobStore>,
        hasher: Arc<PasswordHasher>,
        tokens: TokenGenerator,
    ) -> Self {
        Self {
            files,
            blobs,
            hasher,
            tokens,
        }
    }

    /// Register a new file: write the blob, then the database row.
    ///
    /// New files start locked (`is_public = false`) with a fresh share
    /// code and a zero download counter.
    #[instrument(skip(self, upload), fields(name = %upload.name, size = upload.data.len()))]
    pub async fn register(&self, upload: NewFile) -> AppResult<StoredFile> {
        if upload.name.trim().is_empty() {
            return Err(AppError::validation("File name must not be empty"));
        }

        let size_bytes = upload.data.len() as i64;
        let storage_path = sharded_path();
        self.blobs.write(&storage_path, upload.data).await?;

        let data = CreateStoredFile {
            name: upload.name,
            storage_path: storage_path.clone(),
            mime_type: upload.mime_type,
            size_bytes,
            share_code: self.tokens.generate_code(),
        };

        let created = self.files.create(&data).await;
        let file = unwind_blob_on_failure(self.blobs.as_ref(), &storage_path, created).await?;

        info!(file_id = %file.id, code = %file.share_code, "File registered");
        Ok(file)
    }

    /// Fetch a file record by ID.
    pub async fn get(&self, id: FileId) -> AppResult<Option<StoredFile>> {
        self.files.find_by_id(id).await
    }

    /// Open a file's contents as a byte stream.
    pub async fn open(&self, file: &StoredFile) -> AppResult<ByteStream> {
        self.blobs.read(&file.storage_path).await
    }

    /// Replace a file's direct access settings.
    #[instrument(skip(self, update))]
    pub async fn update_access_settings(
        &self,
        id: FileId,
        update: AccessSettingsUpdate,
    ) -> AppResult<StoredFile> {
        if let Some(limit) = update.download_limit {
            if limit < 1 {
                return Err(AppError::validation("Download limit must be at least 1"));
            }
        }

        let password_hash = match update.password {
            Some(password) if password.is_empty() => {
                return Err(AppError::validation("Password must not be empty"));
            }
            Some(password) => Some(self.hash_blocking(password).await?),
            None => None,
        };

        let updated = self
            .files
            .update_access_settings(
                id,
                update.is_public,
                password_hash.as_deref(),
                update.expires_at,
                update.download_limit,
            )
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))?;

        info!(file_id = %id, is_public = updated.is_public, "Access settings updated");
        Ok(updated)
    }

    /// Delete a file: the row first (cascading links and audit entries),
    /// then the blob.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: FileId) -> AppResult<()> {
        let file = self
            .files
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))?;

        self.files.delete(id).await?;
        self.blobs.delete(&file.storage_path).await?;

        info!(file_id = %id, "File deleted");
        Ok(())
    }

    async fn hash_blocking(&self, password: String) -> AppResult<String> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.hash_password(&password))
            .await
            .map_err(|e| AppError::internal(format!("Password hashing task failed: {e}")))?
    }
}

/// On a failed row insert, remove the just-written blob so a failed
/// registration leaves no orphan bytes behind. The original error wins
/// even when the cleanup itself fails.
async fn unwind_blob_on_failure(
    blobs: &dyn BlobStore,
    storage_path: &str,
    created: AppResult<StoredFile>,
) -> AppResult<StoredFile> {
    match created {
        Ok(file) => Ok(file),
        Err(e) => {
            if let Err(cleanup) = blobs.delete(storage_path).await {
                warn!(error = %cleanup, path = storage_path, "Failed to remove orphaned blob");
            }
            Err(e)
        }
    }
}

/// Two-level sharded blob path keyed by a fresh UUID, keeping any one
/// directory from growing unbounded.
fn sharded_path() -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("{}/{}/{}", &id[..2], &id[2..4], id)
}
