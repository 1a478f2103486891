//! The share target sum type evaluated by the access engine.
//!
//! Both ways of reaching a file — directly by share code or indirectly
//! through a generated link — carry the same set of restrictions
//! (password hash, expiry, download limit, counter). Modeling them as one
//! tagged type lets the grant evaluator and the accounting ledger operate
//! on either kind without duplicated per-kind logic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use droplink_core::types::{FileId, LinkId};

use crate::file::StoredFile;
use crate::share::link::{LinkType, ShareLink};

/// An inbound access identifier, before resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessKey {
    /// A direct share code.
    Code(String),
    /// A share link token.
    Token(String),
}

impl AccessKey {
    /// The raw identifier string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Code(s) | Self::Token(s) => s,
        }
    }
}

/// How a granted access reached the file, recorded in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "access_method", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AccessMethod {
    /// Direct access by share code.
    DirectCode,
    /// Access through a public link.
    PublicLink,
    /// Access through an emailed link.
    EmailLink,
    /// Access through a code-type link.
    CodeLink,
}

/// A reference to the row the accounting ledger must update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetRef {
    /// Direct-by-code access counts against the file row.
    File(FileId),
    /// Link access counts against the link row.
    Link(LinkId),
}

/// A file made accessible either directly by code or indirectly by a
/// generated link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ShareTarget {
    /// The file itself, addressed by its share code.
    DirectCode(StoredFile),
    /// A share link referencing a file.
    IndirectLink(ShareLink),
}

impl ShareTarget {
    /// The file this target ultimately serves.
    pub fn file_id(&self) -> FileId {
        match self {
            Self::DirectCode(file) => file.id,
            Self::IndirectLink(link) => link.file_id,
        }
    }

    /// The link identifier, for indirect targets.
    pub fn link_id(&self) -> Option<LinkId> {
        match self {
            Self::DirectCode(_) => None,
            Self::IndirectLink(link) => Some(link.id),
        }
    }

    /// The row the ledger commits against.
    pub fn target_ref(&self) -> TargetRef {
        match self {
            Self::DirectCode(file) => TargetRef::File(file.id),
            Self::IndirectLink(link) => TargetRef::Link(link.id),
        }
    }

    /// The stored password hash, if the target is password-protected.
    pub fn password_hash(&self) -> Option<&str> {
        match self {
            Self::DirectCode(file) => file.password_hash.as_deref(),
            Self::IndirectLink(link) => link.password_hash.as_deref(),
        }
    }

    /// The expiry timestamp, if one is set.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::DirectCode(file) => file.expires_at,
            Self::IndirectLink(link) => link.expires_at,
        }
    }

    /// The download limit, if one is set.
    pub fn download_limit(&self) -> Option<i32> {
        match self {
            Self::DirectCode(file) => file.download_limit,
            Self::IndirectLink(link) => link.download_limit,
        }
    }

    /// The current download count.
    pub fn download_count(&self) -> i32 {
        match self {
            Self::DirectCode(file) => file.download_count,
            Self::IndirectLink(link) => link.download_count,
        }
    }

    /// Whether an indirect link has been deactivated. Always false for
    /// direct targets, which have no active flag.
    pub fn is_deactivated(&self) -> bool {
        match self {
            Self::DirectCode(_) => false,
            Self::IndirectLink(link) => !link.is_active,
        }
    }

    /// Whether a direct target is still locked (not public). Always false
    /// for links, whose visibility is governed by `is_active`.
    pub fn is_locked_direct(&self) -> bool {
        match self {
            Self::DirectCode(file) => !file.is_public,
            Self::IndirectLink(_) => false,
        }
    }

    /// The audit tag for a granted access through this target.
    pub fn access_method(&self) -> AccessMethod {
        match self {
            Self::DirectCode(_) => AccessMethod::DirectCode,
            Self::IndirectLink(link) => match link.link_type {
                LinkType::Public => AccessMethod::PublicLink,
                LinkType::Email => AccessMethod::EmailLink,
                LinkType::Code => AccessMethod::CodeLink,
            },
        }
    }
}
