//! Stored file entity.

pub mod model;

pub use model::{CreateStoredFile, StoredFile};
