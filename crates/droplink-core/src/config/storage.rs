//! Blob storage configuration.

use serde::{Deserialize, Serialize};

/// Blob storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory for all runtime data.
    #[serde(default = "default_data_root")]
    pub data_root: String,
    /// Root path for stored file blobs.
    #[serde(default = "default_blob_root")]
    pub blob_root: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_root: default_data_root(),
            blob_root: default_blob_root(),
        }
    }
}

fn default_data_root() -> String {
    "./data".to_string()
}

fn default_blob_root() -> String {
    "./data/blobs".to_string()
}
