//! HTTP request handlers.

pub mod access;
pub mod file;
pub mod health;
pub mod link;
