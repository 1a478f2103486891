//! The access control service.
//!
//! Ties the pieces together: resolve the identifier through the store,
//! evaluate the grant, and — for downloads — commit through the
//! accounting ledger. Infrastructure faults surface as errors; denials
//! are ordinary return values.

use std::sync::Arc;

use serde::Serialize;
use tracing::instrument;

use chrono::{DateTime, Utc};

use droplink_core::error::AppError;
use droplink_core::result::AppResult;
use droplink_core::traits::clock::Clock;
use droplink_core::types::LinkId;
use droplink_entity::file::StoredFile;
use droplink_entity::share::{AccessKey, AccessMethod, AccessRecordStore, ShareTarget};

use crate::context::RequesterContext;

use super::decision::{Decision, DenyReason};
use super::evaluator::GrantEvaluator;
use super::ledger::{AccountingLedger, CommitResult};

/// Longest accepted share code or link token. Anything longer is noise
/// and is rejected before it reaches the database.
const MAX_KEY_LENGTH: usize = 128;

/// Metadata disclosed about a target once access has been granted.
#[derive(Debug, Clone, Serialize)]
pub struct TargetSummary {
    /// Original file name.
    pub file_name: String,
    /// MIME type, when recorded at upload.
    pub mime_type: Option<String>,
    /// File size in bytes.
    pub size_bytes: i64,
    /// Expiry timestamp, if the share carries one.
    pub expires_at: Option<DateTime<Utc>>,
    /// Download limit, if the share carries one.
    pub download_limit: Option<i32>,
    /// Grants still available under the limit.
    pub downloads_remaining: Option<i32>,
}

impl TargetSummary {
    fn from_resolved(target: &ShareTarget, file: &StoredFile) -> Self {
        Self {
            file_name: file.name.clone(),
            mime_type: file.mime_type.clone(),
            size_bytes: file.size_bytes,
            expires_at: target.expires_at(),
            download_limit: target.download_limit(),
            downloads_remaining: target
                .download_limit()
                .map(|limit| (limit - target.download_count()).max(0)),
        }
    }
}

/// Result of a non-consuming access check.
#[derive(Debug, Clone, Serialize)]
pub struct AccessCheck {
    /// The evaluated decision.
    pub decision: Decision,
    /// Target metadata, present only when access is granted.
    pub summary: Option<TargetSummary>,
}

/// A committed download grant.
#[derive(Debug, Clone)]
pub struct AccessGrant {
    /// The file to serve, including its blob storage path.
    pub file: StoredFile,
    /// Counter value after this grant.
    pub download_count: i32,
    /// How the file was reached.
    pub method: AccessMethod,
}

/// Outcome of a consuming access attempt.
#[derive(Debug, Clone)]
pub enum AccessOutcome {
    /// The download was granted, accounted, and audited.
    Granted(AccessGrant),
    /// The attempt was denied.
    Denied(DenyReason),
}

impl AccessOutcome {
    /// The denial reason, if denied.
    pub fn deny_reason(&self) -> Option<DenyReason> {
        match self {
            Self::Granted(_) => None,
            Self::Denied(reason) => Some(*reason),
        }
    }
}

/// Evaluates and commits access attempts against share codes and link
/// tokens.
#[derive(Debug, Clone)]
pub struct AccessControlService {
    store: Arc<dyn AccessRecordStore>,
    evaluator: GrantEvaluator,
    ledger: AccountingLedger,
    clock: Arc<dyn Clock>,
}

impl AccessControlService {
    /// Creates a new access control service.
    pub fn new(
        store: Arc<dyn AccessRecordStore>,
        evaluator: GrantEvaluator,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let ledger = AccountingLedger::new(store.clone());
        Self {
            store,
            evaluator,
            ledger,
            clock,
        }
    }

    /// Check whether an identifier would grant access, without consuming
    /// a download.
    ///
    /// Safe to call any number of times; nothing is incremented or
    /// recorded.
    #[instrument(skip(self, password))]
    pub async fn check_access(
        &self,
        key: &AccessKey,
        password: Option<&str>,
    ) -> AppResult<AccessCheck> {
        validate_key(key)?;
        let now = self.clock.now();

        let Some(resolved) = self.store.resolve(key).await? else {
            return Ok(AccessCheck {
                decision: Decision::deny(DenyReason::NotFound),
                summary: None,
            });
        };

        let decision = self.decide(&resolved.target, now, password).await?;
        let summary = decision
            .is_allow()
            .then(|| TargetSummary::from_resolved(&resolved.target, &resolved.file));

        Ok(AccessCheck { decision, summary })
    }

    /// Attempt a download: evaluate the grant and, on `Allow`, commit
    /// the counter increment and audit entry atomically.
    ///
    /// A commit lost to a concurrent request comes back as a
    /// `LimitReached` denial — by the time this request reached the row,
    /// the limit really was exhausted.
    #[instrument(skip(self, password, requester))]
    pub async fn consume_access(
        &self,
        key: &AccessKey,
        password: Option<&str>,
        requester: &RequesterContext,
    ) -> AppResult<AccessOutcome> {
        validate_key(key)?;
        let now = self.clock.now();

        let Some(resolved) = self.store.resolve(key).await? else {
            return Ok(AccessOutcome::Denied(DenyReason::NotFound));
        };

        let decision = self.decide(&resolved.target, now, password).await?;
        if let Some(reason) = decision.deny_reason() {
            return Ok(AccessOutcome::Denied(reason));
        }

        match self.ledger.commit(&resolved.target, requester, now).await? {
            CommitResult::Committed { download_count } => {
                Ok(AccessOutcome::Granted(AccessGrant {
                    method: resolved.target.access_method(),
                    file: resolved.file,
                    download_count,
                }))
            }
            CommitResult::RaceLost => Ok(AccessOutcome::Denied(DenyReason::LimitReached)),
        }
    }

    /// Permanently deactivate a share link. Returns `false` when no such
    /// link exists.
    #[instrument(skip(self))]
    pub async fn revoke_link(&self, link_id: LinkId) -> AppResult<bool> {
        self.store.deactivate_link(link_id).await
    }

    /// Run the evaluator, hopping to a blocking worker when the target
    /// carries a password hash (Argon2 verification is CPU-bound).
    async fn decide(
        &self,
        target: &ShareTarget,
        now: DateTime<Utc>,
        password: Option<&str>,
    ) -> AppResult<Decision> {
        if target.password_hash().is_none() {
            return Ok(self.evaluator.evaluate(Some(target), now, password));
        }

        let evaluator = self.evaluator.clone();
        let target = target.clone();
        let password = password.map(str::to_owned);
        tokio::task::spawn_blocking(move || {
            evaluator.evaluate(Some(&target), now, password.as_deref())
        })
        .await
        .map_err(|e| AppError::internal(format!("Password verification task failed: {e}")))
    }
}

fn validate_key(key: &AccessKey) -> AppResult<()> {
    let raw = key.as_str();
    if raw.is_empty() {
        return Err(AppError::validation("Access identifier must not be empty"));
    }
    if raw.len() > MAX_KEY_LENGTH {
        return Err(AppError::validation("Access identifier is too long"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::testing::{
        hours_ago, make_file, make_link, test_hasher, FixedClock, MemoryAccessStore,
    };
    use droplink_core::error::ErrorKind;

    fn service(store: Arc<MemoryAccessStore>) -> AccessControlService {
        AccessControlService::new(
            store,
            GrantEvaluator::new(Arc::new(test_hasher())),
            Arc::new(FixedClock(Utc::now())),
        )
    }

    fn requester() -> RequesterContext {
        RequesterContext::new("198.51.100.4".to_string(), Some("test-agent".to_string()))
    }

    #[tokio::test]
    async fn test_check_access_grants_with_summary() {
        let store = Arc::new(MemoryAccessStore::new());
        store.insert_file(make_file("abcd1234", true, None, None, Some(5), 2));

        let check = service(store.clone())
            .check_access(&AccessKey::Code("abcd1234".to_string()), None)
            .await
            .unwrap();

        assert!(check.decision.is_allow());
        let summary = check.summary.unwrap();
        assert_eq!(summary.downloads_remaining, Some(3));
        // A check never consumes.
        assert_eq!(store.audit_len(), 0);
    }

    #[tokio::test]
    async fn test_check_access_denies_without_summary() {
        let store = Arc::new(MemoryAccessStore::new());
        store.insert_file(make_file("abcd1234", false, None, None, None, 0));

        let svc = service(store);
        let check = svc
            .check_access(&AccessKey::Code("abcd1234".to_string()), None)
            .await
            .unwrap();
        assert_eq!(check.decision.deny_reason(), Some(DenyReason::NotPublic));
        assert!(check.summary.is_none());

        let missing = svc
            .check_access(&AccessKey::Code("zzzzzzzz".to_string()), None)
            .await
            .unwrap();
        assert_eq!(missing.decision.deny_reason(), Some(DenyReason::NotFound));
    }

    #[tokio::test]
    async fn test_invalid_keys_are_rejected_before_lookup() {
        let svc = service(Arc::new(MemoryAccessStore::new()));

        let err = svc
            .check_access(&AccessKey::Code(String::new()), None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        let err = svc
            .check_access(&AccessKey::Token("x".repeat(129)), None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_limit_of_two_grants_exactly_twice() {
        let store = Arc::new(MemoryAccessStore::new());
        let file = make_file("abcd1234", true, None, None, Some(2), 0);
        let file_id = file.id;
        store.insert_file(file);

        let svc = service(store.clone());
        let key = AccessKey::Code("abcd1234".to_string());

        for _ in 0..2 {
            let outcome = svc.consume_access(&key, None, &requester()).await.unwrap();
            assert!(matches!(outcome, AccessOutcome::Granted(_)));
        }

        let third = svc.consume_access(&key, None, &requester()).await.unwrap();
        assert_eq!(third.deny_reason(), Some(DenyReason::LimitReached));
        assert_eq!(store.file_count(file_id), 2);
        assert_eq!(store.audit_len(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_consumers_never_exceed_limit() {
        let store = Arc::new(MemoryAccessStore::new());
        let file = make_file("abcd1234", true, None, None, Some(5), 0);
        let file_id = file.id;
        store.insert_file(file);

        let svc = Arc::new(service(store.clone()));
        let mut handles = Vec::new();
        for _ in 0..25 {
            let svc = svc.clone();
            handles.push(tokio::spawn(async move {
                svc.consume_access(
                    &AccessKey::Code("abcd1234".to_string()),
                    None,
                    &requester(),
                )
                .await
                .unwrap()
            }));
        }

        let mut granted = 0;
        let mut limit_denied = 0;
        for handle in handles {
            match handle.await.unwrap() {
                AccessOutcome::Granted(_) => granted += 1,
                AccessOutcome::Denied(DenyReason::LimitReached) => limit_denied += 1,
                other => panic!("unexpected outcome: {other:?}"),
            }
        }

        assert_eq!(granted, 5);
        assert_eq!(limit_denied, 20);
        assert_eq!(store.file_count(file_id), 5);
        assert_eq!(store.audit_len(), 5);
    }

    #[tokio::test]
    async fn test_expired_link_denies_with_correct_password() {
        // An expired share stays denied no matter what credentials the
        // requester brings.
        let store = Arc::new(MemoryAccessStore::new());
        let hash = test_hasher().hash_password("secret").unwrap();
        let file = make_file("abcd1234", true, None, None, None, 0);
        let link = make_link(file.id, "tok1", true, Some(hash), Some(hours_ago(1)), None, 0);
        store.insert_file(file);
        store.insert_link(link);

        let outcome = service(store.clone())
            .consume_access(
                &AccessKey::Token("tok1".to_string()),
                Some("secret"),
                &requester(),
            )
            .await
            .unwrap();

        assert_eq!(outcome.deny_reason(), Some(DenyReason::Expired));
        assert_eq!(store.audit_len(), 0);
    }

    #[tokio::test]
    async fn test_password_protected_flow() {
        let store = Arc::new(MemoryAccessStore::new());
        let hash = test_hasher().hash_password("hunter2").unwrap();
        let file = make_file("abcd1234", true, Some(hash), None, None, 0);
        let file_id = file.id;
        store.insert_file(file);

        let svc = service(store.clone());
        let key = AccessKey::Code("abcd1234".to_string());

        let none = svc.consume_access(&key, None, &requester()).await.unwrap();
        assert_eq!(none.deny_reason(), Some(DenyReason::PasswordRequired));

        let wrong = svc
            .consume_access(&key, Some("wrong"), &requester())
            .await
            .unwrap();
        assert_eq!(wrong.deny_reason(), Some(DenyReason::PasswordInvalid));

        let right = svc
            .consume_access(&key, Some("hunter2"), &requester())
            .await
            .unwrap();
        match right {
            AccessOutcome::Granted(grant) => {
                assert_eq!(grant.download_count, 1);
                assert_eq!(grant.method, AccessMethod::DirectCode);
                assert_eq!(grant.file.id, file_id);
            }
            other => panic!("expected a grant, got {other:?}"),
        }
        // Only the successful attempt is accounted.
        assert_eq!(store.file_count(file_id), 1);
        assert_eq!(store.audit_len(), 1);
    }

    #[tokio::test]
    async fn test_revoked_link_denies_as_inactive() {
        let store = Arc::new(MemoryAccessStore::new());
        let file = make_file("abcd1234", true, None, None, None, 0);
        let link = make_link(file.id, "tok1", true, None, None, None, 0);
        let link_id = link.id;
        store.insert_file(file);
        store.insert_link(link);

        let svc = service(store.clone());
        assert!(svc.revoke_link(link_id).await.unwrap());

        let outcome = svc
            .consume_access(&AccessKey::Token("tok1".to_string()), None, &requester())
            .await
            .unwrap();
        assert_eq!(outcome.deny_reason(), Some(DenyReason::Inactive));

        // Revoking an unknown link reports false, not an error.
        assert!(!svc.revoke_link(LinkId::new()).await.unwrap());
    }

    #[tokio::test]
    async fn test_store_fault_is_an_error_not_a_grant() {
        let store = Arc::new(MemoryAccessStore::new());
        store.insert_file(make_file("abcd1234", true, None, None, None, 0));
        store.set_fail_consume(true);

        let result = service(store.clone())
            .consume_access(&AccessKey::Code("abcd1234".to_string()), None, &requester())
            .await;

        assert!(result.is_err());
        assert_eq!(store.audit_len(), 0);
    }
}
