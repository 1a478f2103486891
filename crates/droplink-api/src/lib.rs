//! # droplink-api
//!
//! HTTP API layer for Droplink built on Axum.
//!
//! Public share access endpoints, owner-facing file and link management,
//! DTOs, and the mapping from access decisions and domain errors to HTTP
//! responses.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
