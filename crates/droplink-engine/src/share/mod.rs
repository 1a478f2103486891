//! Share link issuance and management.

pub mod service;

pub use service::{NewShareLink, ShareService};
