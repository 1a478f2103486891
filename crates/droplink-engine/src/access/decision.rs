//! Access decisions.
//!
//! Denial is a normal outcome, not an exception, so decisions are plain
//! values that flow back to the transport layer. The variant order in
//! [`DenyReason`] mirrors the evaluation order: each check only runs once
//! every earlier check has passed, which pins down exactly what a caller
//! can learn from each response.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Why an access attempt was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DenyReason {
    /// No target matched the supplied identifier.
    NotFound,
    /// The share link has been deactivated.
    Inactive,
    /// The file is not published for direct access.
    NotPublic,
    /// The target's expiry timestamp has passed.
    Expired,
    /// The download limit has been exhausted.
    LimitReached,
    /// The target is password-protected and no password was supplied.
    PasswordRequired,
    /// The supplied password did not match.
    PasswordInvalid,
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Inactive => write!(f, "INACTIVE"),
            Self::NotPublic => write!(f, "NOT_PUBLIC"),
            Self::Expired => write!(f, "EXPIRED"),
            Self::LimitReached => write!(f, "LIMIT_REACHED"),
            Self::PasswordRequired => write!(f, "PASSWORD_REQUIRED"),
            Self::PasswordInvalid => write!(f, "PASSWORD_INVALID"),
        }
    }
}

impl DenyReason {
    /// The user-facing message for this denial.
    ///
    /// `NotFound`, `NotPublic`, and `PasswordInvalid` deliberately share
    /// one message so a caller probing identifiers cannot tell a
    /// protected target from a nonexistent one. The machine-readable
    /// reason code stays distinct.
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::NotFound | Self::NotPublic | Self::PasswordInvalid => {
                "File not found or access denied"
            }
            Self::Inactive => "This share link has been deactivated",
            Self::Expired => "This share has expired",
            Self::LimitReached => "This share has reached its download limit",
            Self::PasswordRequired => "A password is required to access this file",
        }
    }
}

/// The outcome of evaluating an access attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", tag = "decision")]
pub enum Decision {
    /// Access is granted.
    Allow,
    /// Access is denied for the given reason.
    Deny {
        /// The specific denial reason.
        reason: DenyReason,
    },
}

impl Decision {
    /// Shorthand constructor for a denial.
    pub fn deny(reason: DenyReason) -> Self {
        Self::Deny { reason }
    }

    /// Whether the decision grants access.
    pub fn is_allow(&self) -> bool {
        matches!(self, Self::Allow)
    }

    /// The denial reason, if denied.
    pub fn deny_reason(&self) -> Option<DenyReason> {
        match self {
            Self::Allow => None,
            Self::Deny { reason } => Some(*reason),
        }
    }
}
