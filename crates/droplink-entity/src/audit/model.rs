//! Download audit entry entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use droplink_core::types::{AuditEntryId, FileId, LinkId};

use crate::share::target::AccessMethod;

/// An immutable record of one granted download.
///
/// Created exactly once per grant, in the same transaction as the counter
/// increment. Never mutated; removed only by cascade when the owning file
/// is deleted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AuditEntry {
    /// Unique audit entry identifier.
    pub id: AuditEntryId,
    /// The file that was served.
    pub file_id: FileId,
    /// The share link used, for indirect access.
    pub link_id: Option<LinkId>,
    /// Network origin of the requester.
    pub ip_address: String,
    /// Requester client identity string (User-Agent).
    pub user_agent: Option<String>,
    /// How the file was reached.
    pub access_method: AccessMethod,
    /// When the download was granted.
    pub created_at: DateTime<Utc>,
}

/// Data required to record a granted download.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAuditEntry {
    /// The file being served.
    pub file_id: FileId,
    /// The share link used (indirect access only).
    pub link_id: Option<LinkId>,
    /// Requester network origin.
    pub ip_address: String,
    /// Requester client identity string.
    pub user_agent: Option<String>,
    /// How the file was reached.
    pub access_method: AccessMethod,
}
