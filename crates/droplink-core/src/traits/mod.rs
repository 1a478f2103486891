//! Core trait definitions.
//!
//! Traits are defined here in `droplink-core` and implemented in the
//! infrastructure crates so that business logic can be tested against
//! in-memory fakes.

pub mod clock;
pub mod storage;

pub use clock::{Clock, SystemClock};
pub use storage::{BlobStore, ByteStream};
