//! The accounting ledger — the authoritative commit step.
//!
//! The grant evaluator's answer is advisory: between evaluation and
//! commit another request may take the last remaining download. The
//! ledger therefore never trusts the snapshot it was handed; it asks the
//! store for a conditional increment that re-checks the restrictions at
//! commit time, and reports a predicate miss as a lost race rather than
//! an error.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use droplink_core::result::AppResult;
use droplink_entity::audit::CreateAuditEntry;
use droplink_entity::share::{AccessRecordStore, ConsumeOutcome, ShareTarget};

use crate::context::RequesterContext;

/// Outcome of committing a granted access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitResult {
    /// The download was accounted and audited.
    Committed {
        /// Counter value after the increment.
        download_count: i32,
    },
    /// A concurrent request consumed the grant first.
    RaceLost,
}

/// Commits granted accesses: one counter increment plus one audit entry,
/// atomically, per grant.
#[derive(Debug, Clone)]
pub struct AccountingLedger {
    store: Arc<dyn AccessRecordStore>,
}

impl AccountingLedger {
    /// Creates a new accounting ledger over the given store.
    pub fn new(store: Arc<dyn AccessRecordStore>) -> Self {
        Self { store }
    }

    /// Commit one granted download against the target.
    ///
    /// Must only be called after the evaluator returned `Allow`. The
    /// store re-validates the restrictions inside the same transaction
    /// as the increment, so even a stale `Allow` can never push the
    /// counter past its limit.
    pub async fn commit(
        &self,
        target: &ShareTarget,
        requester: &RequesterContext,
        now: DateTime<Utc>,
    ) -> AppResult<CommitResult> {
        let audit = CreateAuditEntry {
            file_id: target.file_id(),
            link_id: target.link_id(),
            ip_address: requester.ip_address.clone(),
            user_agent: requester.user_agent.clone(),
            access_method: target.access_method(),
        };

        match self.store.consume(target.target_ref(), now, &audit).await? {
            ConsumeOutcome::Committed { download_count } => {
                info!(
                    file_id = %audit.file_id,
                    method = ?audit.access_method,
                    download_count,
                    "Download committed"
                );
                Ok(CommitResult::Committed { download_count })
            }
            ConsumeOutcome::Contended => {
                debug!(
                    file_id = %audit.file_id,
                    "Commit predicate no longer held, grant lost to a concurrent request"
                );
                Ok(CommitResult::RaceLost)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::testing::{make_file, make_link, MemoryAccessStore};
    use droplink_entity::share::ShareTarget;

    fn requester() -> RequesterContext {
        RequesterContext::new("203.0.113.7".to_string(), Some("curl/8.5".to_string()))
    }

    #[tokio::test]
    async fn test_commit_increments_and_audits() {
        let store = Arc::new(MemoryAccessStore::new());
        let file = make_file("code1", true, None, None, Some(3), 0);
        let id = file.id;
        store.insert_file(file.clone());

        let ledger = AccountingLedger::new(store.clone());
        let result = ledger
            .commit(&ShareTarget::DirectCode(file), &requester(), Utc::now())
            .await
            .unwrap();

        assert_eq!(result, CommitResult::Committed { download_count: 1 });
        assert_eq!(store.file_count(id), 1);
        assert_eq!(store.audit_len(), 1);
    }

    #[tokio::test]
    async fn test_commit_at_limit_reports_race_without_audit() {
        let store = Arc::new(MemoryAccessStore::new());
        // Snapshot says one slot left, but the stored row is already full.
        let stale = make_file("code1", true, None, None, Some(2), 1);
        let mut current = stale.clone();
        current.download_count = 2;
        store.insert_file(current);

        let ledger = AccountingLedger::new(store.clone());
        let result = ledger
            .commit(&ShareTarget::DirectCode(stale.clone()), &requester(), Utc::now())
            .await
            .unwrap();

        assert_eq!(result, CommitResult::RaceLost);
        assert_eq!(store.file_count(stale.id), 2);
        assert_eq!(store.audit_len(), 0);
    }

    #[tokio::test]
    async fn test_commit_touches_link_last_accessed() {
        let store = Arc::new(MemoryAccessStore::new());
        let file = make_file("code1", true, None, None, None, 0);
        let link = make_link(file.id, "tok1", true, None, None, None, 0);
        let link_id = link.id;
        store.insert_file(file);
        store.insert_link(link.clone());

        let ledger = AccountingLedger::new(store.clone());
        let now = Utc::now();
        let result = ledger
            .commit(&ShareTarget::IndirectLink(link), &requester(), now)
            .await
            .unwrap();

        assert_eq!(result, CommitResult::Committed { download_count: 1 });
        let stored = store.links.lock().unwrap()[&link_id].clone();
        assert_eq!(stored.last_accessed, Some(now));
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let store = Arc::new(MemoryAccessStore::new());
        let file = make_file("code1", true, None, None, None, 0);
        store.insert_file(file.clone());
        store.set_fail_consume(true);

        let ledger = AccountingLedger::new(store);
        let err = ledger
            .commit(&ShareTarget::DirectCode(file), &requester(), Utc::now())
            .await;
        assert!(err.is_err());
    }
}
