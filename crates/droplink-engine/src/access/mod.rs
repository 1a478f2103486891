//! The access control and download accounting engine.

pub mod decision;
pub mod evaluator;
pub mod ledger;
pub mod service;
pub mod token;

#[cfg(test)]
pub(crate) mod testing;

pub use decision::{Decision, DenyReason};
pub use evaluator::GrantEvaluator;
pub use ledger::{AccountingLedger, CommitResult};
pub use service::{AccessCheck, AccessControlService, AccessGrant, AccessOutcome, TargetSummary};
pub use token::TokenGenerator;
