//! Database configuration.

use serde::{Deserialize, Serialize};

/// PostgreSQL pool configuration.
///
/// Defaults suit a single Droplink instance: download commits hold a
/// connection only for one conditional UPDATE plus an audit INSERT, so
/// the pool stays small and a slow acquire signals real trouble rather
/// than normal load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL. Required; there is no usable default.
    pub url: String,
    /// Upper pool bound.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Connections kept warm when idle.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// How long to wait for a connection before failing the request.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,
    /// Idle time after which a connection above the minimum is dropped.
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_seconds: u64,
}

fn default_max_connections() -> u32 {
    16
}

fn default_min_connections() -> u32 {
    2
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_idle_timeout() -> u64 {
    600
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_alone_yields_working_pool_bounds() {
        let config: DatabaseConfig =
            serde_json::from_str(r#"{"url": "postgres://localhost/droplink"}"#).unwrap();
        assert_eq!(config.max_connections, 16);
        assert_eq!(config.min_connections, 2);
        assert_eq!(config.connect_timeout_seconds, 10);
        assert_eq!(config.idle_timeout_seconds, 600);
    }

    #[test]
    fn test_explicit_values_override_defaults() {
        let config: DatabaseConfig = serde_json::from_str(
            r#"{"url": "postgres://localhost/droplink", "max_connections": 4}"#,
        )
        .unwrap();
        assert_eq!(config.max_connections, 4);
        assert_eq!(config.min_connections, 2);
    }
}
