//! Password hashing and token generation configuration.

use serde::{Deserialize, Serialize};

/// Security configuration for share passwords and identifiers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Argon2 memory cost in KiB.
    ///
    /// The defaults target tens of milliseconds per verification on
    /// commodity hardware, which keeps offline brute-forcing impractical.
    #[serde(default = "default_memory_kib")]
    pub argon2_memory_kib: u32,
    /// Argon2 iteration count.
    #[serde(default = "default_iterations")]
    pub argon2_iterations: u32,
    /// Argon2 lane count.
    #[serde(default = "default_parallelism")]
    pub argon2_parallelism: u32,
    /// Length of generated share codes in characters.
    #[serde(default = "default_code_length")]
    pub share_code_length: usize,
    /// Length of generated link tokens in random bytes (hex-encoded on the wire).
    #[serde(default = "default_token_bytes")]
    pub link_token_bytes: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            argon2_memory_kib: default_memory_kib(),
            argon2_iterations: default_iterations(),
            argon2_parallelism: default_parallelism(),
            share_code_length: default_code_length(),
            link_token_bytes: default_token_bytes(),
        }
    }
}

fn default_memory_kib() -> u32 {
    19_456 // 19 MiB, OWASP baseline for Argon2id
}

fn default_iterations() -> u32 {
    2
}

fn default_parallelism() -> u32 {
    1
}

fn default_code_length() -> usize {
    8
}

fn default_token_bytes() -> usize {
    32
}
