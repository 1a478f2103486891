//! Stored file entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use droplink_core::types::FileId;

/// A file registered with Droplink.
///
/// Every file is directly addressable by its `share_code` once the owner
/// marks it public. The access restrictions (password, expiry, download
/// limit) live on the row itself for direct-by-code access; share links
/// carry their own independent restrictions.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StoredFile {
    /// Unique file identifier.
    pub id: FileId,
    /// Original file name.
    pub name: String,
    /// Path of the blob in the blob store.
    pub storage_path: String,
    /// MIME type (if known).
    pub mime_type: Option<String>,
    /// Size in bytes.
    pub size_bytes: i64,
    /// Short code for direct access.
    pub share_code: String,
    /// Whether direct access by code is enabled. Defaults to false.
    pub is_public: bool,
    /// Password hash for direct access (Argon2id).
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    /// When direct access expires.
    pub expires_at: Option<DateTime<Utc>>,
    /// Maximum number of direct downloads (None = unlimited).
    pub download_limit: Option<i32>,
    /// Current direct download count. Monotonic, never past the limit.
    pub download_count: i32,
    /// When the file was registered.
    pub created_at: DateTime<Utc>,
    /// When the file record was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data required to register a new file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateStoredFile {
    /// Original file name.
    pub name: String,
    /// Blob store path.
    pub storage_path: String,
    /// MIME type (if known).
    pub mime_type: Option<String>,
    /// Size in bytes.
    pub size_bytes: i64,
    /// Generated share code.
    pub share_code: String,
}
