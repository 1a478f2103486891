//! Request DTOs.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

/// Optional password carried in access request bodies.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccessRequest {
    /// Plaintext password for protected targets.
    pub password: Option<String>,
}

/// Optional password carried as a query parameter on GET access routes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccessQuery {
    /// Plaintext password for protected targets.
    pub password: Option<String>,
}

/// Upload query parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadQuery {
    /// Original file name.
    pub name: String,
}

/// Share link creation request.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateLinkRequest {
    /// The file to share.
    pub file_id: Uuid,
    /// Link kind: "public", "email", or "code".
    pub link_type: String,
    /// Recipient address, required for email links.
    pub recipient_email: Option<String>,
    /// Plaintext password to protect the link with.
    pub password: Option<String>,
    /// Expiry time.
    pub expires_at: Option<DateTime<Utc>>,
    /// Maximum downloads.
    pub download_limit: Option<i32>,
}

/// Direct access settings update request.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateAccessSettingsRequest {
    /// Whether direct access by code is enabled.
    pub is_public: bool,
    /// New plaintext password, or null to remove protection.
    pub password: Option<String>,
    /// New expiry, or null for never.
    pub expires_at: Option<DateTime<Utc>>,
    /// New download limit, or null for unlimited.
    pub download_limit: Option<i32>,
}
