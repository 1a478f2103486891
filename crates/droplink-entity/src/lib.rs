//! # droplink-entity
//!
//! Domain entity models for Droplink: stored files, share links, the
//! [`ShareTarget`](share::ShareTarget) sum type the access engine
//! evaluates, download audit entries, and the
//! [`AccessRecordStore`](share::AccessRecordStore) port implemented by
//! the database crate.

pub mod audit;
pub mod file;
pub mod share;

pub use audit::{AuditEntry, CreateAuditEntry};
pub use file::StoredFile;
pub use share::{
    AccessKey, AccessMethod, AccessRecordStore, ConsumeOutcome, CreateShareLink, LinkType,
    ResolvedAccess, ShareLink, ShareTarget, TargetRef,
};
