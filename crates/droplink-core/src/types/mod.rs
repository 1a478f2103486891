//! Shared core types.

pub mod id;

pub use id::{AuditEntryId, FileId, LinkId};
