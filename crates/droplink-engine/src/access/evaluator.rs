//! The grant evaluator — pure decision logic.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::error;

use droplink_auth::password::PasswordHasher;
use droplink_entity::share::ShareTarget;

use super::decision::{Decision, DenyReason};

/// Decides whether an access attempt against a share target is granted.
///
/// `evaluate` is pure and side-effect-free: it reads the target snapshot
/// and the injected "now", mutates nothing, and is safe to call any
/// number of times — the accounting ledger relies on this, treating the
/// evaluator's answer as advisory and re-checking at commit time.
///
/// The check order is a contract, not an accident. Existence, activity,
/// and visibility come first so a caller cannot distinguish a protected
/// target from a missing one; expiry and limit come before the password
/// checks so an exhausted or expired share never prompts for a password
/// (which would advertise that the secret is still worth guessing).
#[derive(Debug, Clone)]
pub struct GrantEvaluator {
    hasher: Arc<PasswordHasher>,
}

impl GrantEvaluator {
    /// Creates a new grant evaluator.
    pub fn new(hasher: Arc<PasswordHasher>) -> Self {
        Self { hasher }
    }

    /// Evaluate an access attempt.
    ///
    /// Password verification is Argon2 and therefore CPU-bound; async
    /// callers run this method on a blocking worker when the target
    /// carries a password hash.
    pub fn evaluate(
        &self,
        target: Option<&ShareTarget>,
        now: DateTime<Utc>,
        supplied_password: Option<&str>,
    ) -> Decision {
        let Some(target) = target else {
            return Decision::deny(DenyReason::NotFound);
        };

        if target.is_deactivated() {
            return Decision::deny(DenyReason::Inactive);
        }

        if target.is_locked_direct() {
            return Decision::deny(DenyReason::NotPublic);
        }

        if let Some(expires_at) = target.expires_at() {
            if now > expires_at {
                return Decision::deny(DenyReason::Expired);
            }
        }

        if let Some(limit) = target.download_limit() {
            if target.download_count() >= limit {
                return Decision::deny(DenyReason::LimitReached);
            }
        }

        if let Some(hash) = target.password_hash() {
            let Some(password) = supplied_password else {
                return Decision::deny(DenyReason::PasswordRequired);
            };
            match self.hasher.verify_password(password, hash) {
                Ok(true) => {}
                Ok(false) => return Decision::deny(DenyReason::PasswordInvalid),
                Err(e) => {
                    // A hashing subsystem fault must fail closed.
                    error!(error = %e, "Password verification errored, denying");
                    return Decision::deny(DenyReason::PasswordInvalid);
                }
            }
        }

        Decision::Allow
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::testing::{hours_ago, hours_from_now, link_target, make_file, test_hasher};
    use droplink_entity::share::ShareTarget;

    fn evaluator() -> GrantEvaluator {
        GrantEvaluator::new(Arc::new(test_hasher()))
    }

    fn direct(file: droplink_entity::file::StoredFile) -> ShareTarget {
        ShareTarget::DirectCode(file)
    }

    #[test]
    fn test_missing_target_is_not_found() {
        let d = evaluator().evaluate(None, Utc::now(), None);
        assert_eq!(d, Decision::deny(DenyReason::NotFound));
    }

    #[test]
    fn test_locked_direct_target_is_not_public() {
        let file = make_file("code1", false, None, None, None, 0);
        let d = evaluator().evaluate(Some(&direct(file)), Utc::now(), None);
        assert_eq!(d, Decision::deny(DenyReason::NotPublic));
    }

    #[test]
    fn test_open_public_target_allows() {
        let file = make_file("code1", true, None, None, None, 0);
        let d = evaluator().evaluate(Some(&direct(file)), Utc::now(), None);
        assert_eq!(d, Decision::Allow);
    }

    #[test]
    fn test_expired_target_denies_even_with_correct_password() {
        // Expiry dominance: the password is right and the limit has room,
        // but the expired check fires first.
        let hasher = test_hasher();
        let hash = hasher.hash_password("secret").unwrap();
        let file = make_file("code1", true, Some(hash), Some(hours_ago(1)), Some(10), 0);
        let d = evaluator().evaluate(Some(&direct(file)), Utc::now(), Some("secret"));
        assert_eq!(d, Decision::deny(DenyReason::Expired));
    }

    #[test]
    fn test_exhausted_limit_wins_over_password_prompt() {
        let hasher = test_hasher();
        let hash = hasher.hash_password("secret").unwrap();
        let file = make_file("code1", true, Some(hash), None, Some(3), 3);
        let d = evaluator().evaluate(Some(&direct(file)), Utc::now(), None);
        assert_eq!(d, Decision::deny(DenyReason::LimitReached));
    }

    #[test]
    fn test_password_required_when_none_supplied() {
        let hasher = test_hasher();
        let hash = hasher.hash_password("secret").unwrap();
        let file = make_file("code1", true, Some(hash), None, None, 0);
        let d = evaluator().evaluate(Some(&direct(file)), Utc::now(), None);
        assert_eq!(d, Decision::deny(DenyReason::PasswordRequired));
    }

    #[test]
    fn test_wrong_password_is_invalid() {
        let hasher = test_hasher();
        let hash = hasher.hash_password("secret").unwrap();
        let file = make_file("code1", true, Some(hash), None, None, 0);
        let d = evaluator().evaluate(Some(&direct(file)), Utc::now(), Some("wrong"));
        assert_eq!(d, Decision::deny(DenyReason::PasswordInvalid));
    }

    #[test]
    fn test_correct_password_allows() {
        let hasher = test_hasher();
        let hash = hasher.hash_password("secret").unwrap();
        let file = make_file(
            "code1",
            true,
            Some(hash),
            Some(hours_from_now(1)),
            None,
            0,
        );
        let d = evaluator().evaluate(Some(&direct(file)), Utc::now(), Some("secret"));
        assert_eq!(d, Decision::Allow);
    }

    #[test]
    fn test_malformed_stored_hash_fails_closed() {
        let file = make_file("code1", true, Some("garbage".into()), None, None, 0);
        let d = evaluator().evaluate(Some(&direct(file)), Utc::now(), Some("secret"));
        assert_eq!(d, Decision::deny(DenyReason::PasswordInvalid));
    }

    #[test]
    fn test_deactivated_link_dominates_everything() {
        // Scenario D: inactive wins even with a correct password and an
        // unexpired timestamp.
        let hasher = test_hasher();
        let hash = hasher.hash_password("secret").unwrap();
        let target = link_target(false, Some(hash), Some(hours_from_now(24)), None, 0);
        let d = evaluator().evaluate(Some(&target), Utc::now(), Some("secret"));
        assert_eq!(d, Decision::deny(DenyReason::Inactive));
    }

    #[test]
    fn test_active_link_allows() {
        let target = link_target(true, None, None, None, 0);
        let d = evaluator().evaluate(Some(&target), Utc::now(), None);
        assert_eq!(d, Decision::Allow);
    }

    #[test]
    fn test_evaluate_is_idempotent() {
        // Same target snapshot, same clock, same answer — callable twice
        // by design since the ledger re-validates at commit time.
        let file = make_file("code1", true, None, Some(hours_ago(2)), None, 0);
        let target = direct(file);
        let now = Utc::now();
        let e = evaluator();
        let first = e.evaluate(Some(&target), now, None);
        let second = e.evaluate(Some(&target), now, None);
        assert_eq!(first, second);
        assert_eq!(first, Decision::deny(DenyReason::Expired));
    }
}
