//! The access record store port.
//!
//! The engine resolves identifiers and commits download grants through
//! this trait. The PostgreSQL implementation lives in
//! `droplink-database`; tests use an in-memory implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use droplink_core::result::AppResult;
use droplink_core::types::LinkId;

use crate::audit::CreateAuditEntry;
use crate::file::StoredFile;
use crate::share::target::{AccessKey, ShareTarget, TargetRef};

/// A resolved access target together with the file it serves.
///
/// For direct-by-code targets the file is the target; for link targets it
/// is the referenced file, fetched in the same lookup.
#[derive(Debug, Clone)]
pub struct ResolvedAccess {
    /// The target the evaluator decides against.
    pub target: ShareTarget,
    /// The owning file, carrying the blob storage path.
    pub file: StoredFile,
}

/// Outcome of the conditional consume update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumeOutcome {
    /// The counter was incremented and the audit entry recorded.
    Committed {
        /// The counter value after the increment.
        download_count: i32,
    },
    /// The commit-time predicate no longer held — a concurrent request
    /// won the race for the last remaining download. Expected, not a
    /// fault.
    Contended,
}

/// Persistence operations the access engine depends on.
///
/// `consume` is the only mutation the engine performs and it must be
/// atomic: the limit re-check, the counter increment, and the audit
/// insert succeed or fail as one unit against the backing store, so the
/// counter can never pass the limit even with many processes committing
/// against the same row.
#[async_trait]
pub trait AccessRecordStore: Send + Sync + std::fmt::Debug + 'static {
    /// Resolve a share code or link token to its target and owning file.
    ///
    /// Returns `Ok(None)` when the identifier matches nothing; that is a
    /// decision input, not an error.
    async fn resolve(&self, key: &AccessKey) -> AppResult<Option<ResolvedAccess>>;

    /// Atomically re-check restrictions, increment the download counter,
    /// and append the audit entry.
    ///
    /// The store applies the increment only while the row is still
    /// grantable (active, unexpired, under its limit) and inserts the
    /// audit entry in the same transaction.
    async fn consume(
        &self,
        target: TargetRef,
        now: DateTime<Utc>,
        audit: &CreateAuditEntry,
    ) -> AppResult<ConsumeOutcome>;

    /// Permanently deactivate a share link. Returns `false` when the link
    /// does not exist.
    async fn deactivate_link(&self, link_id: LinkId) -> AppResult<bool>;
}
