//! Share link entity, the share target sum type, and the access record
//! store port.

pub mod link;
pub mod store;
pub mod target;

pub use link::{CreateShareLink, LinkType, ShareLink};
pub use store::{AccessRecordStore, ConsumeOutcome, ResolvedAccess};
pub use target::{AccessKey, AccessMethod, ShareTarget, TargetRef};
