//! # droplink-core
//!
//! Core crate for Droplink. Contains configuration schemas, typed
//! identifiers, the clock and blob-store traits, and the unified
//! error system.
//!
//! This crate has **no** internal dependencies on other Droplink crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
