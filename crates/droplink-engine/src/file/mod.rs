//! File registration, access settings, and removal.

pub mod service;

pub use service::{AccessSettingsUpdate, FileService, NewFile};
