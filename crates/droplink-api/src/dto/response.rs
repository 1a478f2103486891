//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use droplink_entity::file::StoredFile;
use droplink_entity::share::{LinkType, ShareLink};

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Owner-facing file record.
#[derive(Debug, Clone, Serialize)]
pub struct FileResponse {
    /// File identifier.
    pub id: Uuid,
    /// Original file name.
    pub name: String,
    /// MIME type, if known.
    pub mime_type: Option<String>,
    /// Size in bytes.
    pub size_bytes: i64,
    /// Direct access share code.
    pub share_code: String,
    /// Whether direct access is enabled.
    pub is_public: bool,
    /// Whether direct access is password-protected.
    pub has_password: bool,
    /// Direct access expiry.
    pub expires_at: Option<DateTime<Utc>>,
    /// Direct download limit.
    pub download_limit: Option<i32>,
    /// Direct downloads so far.
    pub download_count: i32,
    /// Registration time.
    pub created_at: DateTime<Utc>,
}

impl From<StoredFile> for FileResponse {
    fn from(file: StoredFile) -> Self {
        Self {
            id: file.id.into(),
            name: file.name,
            mime_type: file.mime_type,
            size_bytes: file.size_bytes,
            share_code: file.share_code,
            is_public: file.is_public,
            has_password: file.password_hash.is_some(),
            expires_at: file.expires_at,
            download_limit: file.download_limit,
            download_count: file.download_count,
            created_at: file.created_at,
        }
    }
}

/// Owner-facing share link record. The token is included — the owner
/// needs it to hand the link out.
#[derive(Debug, Clone, Serialize)]
pub struct LinkResponse {
    /// Link identifier.
    pub id: Uuid,
    /// The shared file.
    pub file_id: Uuid,
    /// How the link was issued.
    pub link_type: LinkType,
    /// Recipient address for email links.
    pub recipient_email: Option<String>,
    /// Link token.
    pub token: String,
    /// Whether the link is password-protected.
    pub has_password: bool,
    /// Link expiry.
    pub expires_at: Option<DateTime<Utc>>,
    /// Link download limit.
    pub download_limit: Option<i32>,
    /// Downloads served so far.
    pub download_count: i32,
    /// Whether the link is still active.
    pub is_active: bool,
    /// Issuance time.
    pub created_at: DateTime<Utc>,
    /// Last granted download through this link.
    pub last_accessed: Option<DateTime<Utc>>,
}

impl From<ShareLink> for LinkResponse {
    fn from(link: ShareLink) -> Self {
        Self {
            id: link.id.into(),
            file_id: link.file_id.into(),
            link_type: link.link_type,
            recipient_email: link.recipient_email,
            token: link.token,
            has_password: link.password_hash.is_some(),
            expires_at: link.expires_at,
            download_limit: link.download_limit,
            download_count: link.download_count,
            is_active: link.is_active,
            created_at: link.created_at,
            last_accessed: link.last_accessed,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status.
    pub status: String,
    /// Server version.
    pub version: String,
    /// Database reachability.
    pub database: String,
    /// Blob store reachability.
    pub storage: String,
}
