//! # droplink-database
//!
//! PostgreSQL pool management, embedded migrations, and concrete
//! repository implementations for all Droplink entities, including the
//! transactional access record store backing the accounting ledger.

pub mod connection;
pub mod repositories;

pub use connection::DatabasePool;
