//! # droplink-auth
//!
//! Share password hashing and verification for Droplink.

pub mod password;

pub use password::PasswordHasher;
