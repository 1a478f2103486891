//! # droplink-engine
//!
//! The share access control and download accounting engine, plus the
//! share and file management services built around it.
//!
//! Services follow constructor injection — all dependencies are provided
//! at construction time via `Arc` references. The engine itself holds no
//! in-process mutable state: the only mutation it performs is the
//! accounting ledger's conditional update against the backing store, so
//! correctness survives multi-instance deployment.

pub mod access;
pub mod context;
pub mod file;
pub mod share;

pub use access::{
    AccessCheck, AccessControlService, AccessGrant, AccessOutcome, AccountingLedger, CommitResult,
    Decision, DenyReason, GrantEvaluator, TargetSummary, TokenGenerator,
};
pub use context::RequesterContext;
pub use file::{AccessSettingsUpdate, FileService, NewFile};
pub use share::{NewShareLink, ShareService};
