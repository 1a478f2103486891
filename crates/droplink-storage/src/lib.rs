//! # droplink-storage
//!
//! Blob store implementations for Droplink. The access engine only ever
//! sees the [`BlobStore`](droplink_core::traits::storage::BlobStore)
//! trait; this crate provides the local filesystem backend.

pub mod local;

pub use local::LocalBlobStore;
