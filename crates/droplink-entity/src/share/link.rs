//! Share link entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use droplink_core::types::{FileId, LinkId};

/// How a share link was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "link_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LinkType {
    /// A link anyone can open.
    Public,
    /// A link mailed to a specific recipient.
    Email,
    /// A link handed out as a one-time code.
    Code,
}

/// A generated link granting indirect access to a file.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ShareLink {
    /// Unique link identifier.
    pub id: LinkId,
    /// The file this link points at.
    pub file_id: FileId,
    /// How the link was issued.
    pub link_type: LinkType,
    /// Recipient address for email links.
    pub recipient_email: Option<String>,
    /// Unguessable token used in the link URL.
    pub token: String,
    /// Password hash (Argon2id).
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    /// When the link expires.
    pub expires_at: Option<DateTime<Utc>>,
    /// Maximum number of downloads (None = unlimited).
    pub download_limit: Option<i32>,
    /// Current download count. Monotonic, never past the limit.
    pub download_count: i32,
    /// Whether the link is active. Deactivation is permanent.
    pub is_active: bool,
    /// When the link was created.
    pub created_at: DateTime<Utc>,
    /// Last time the link served a download.
    pub last_accessed: Option<DateTime<Utc>>,
}

/// Data required to create a new share link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateShareLink {
    /// The file to share.
    pub file_id: FileId,
    /// How the link is issued.
    pub link_type: LinkType,
    /// Recipient address (email links only).
    pub recipient_email: Option<String>,
    /// Generated token.
    pub token: String,
    /// Password hash (if the link is password-protected).
    pub password_hash: Option<String>,
    /// Expiry time (None = never).
    pub expires_at: Option<DateTime<Utc>>,
    /// Max downloads (None = unlimited).
    pub download_limit: Option<i32>,
}
