//! Requester context carried into the accounting ledger.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Context for the current inbound request.
///
/// Extracted by the transport layer and passed into `consume_access` so
/// that every granted download is auditable: *where* the request came
/// from and *what* client made it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequesterContext {
    /// IP address of the request origin.
    pub ip_address: String,
    /// User-Agent header value.
    pub user_agent: Option<String>,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequesterContext {
    /// Creates a new requester context.
    pub fn new(ip_address: String, user_agent: Option<String>) -> Self {
        Self {
            ip_address,
            user_agent,
            request_time: Utc::now(),
        }
    }
}
