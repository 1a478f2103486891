//! Share code and link token generation.

use rand::distr::Alphanumeric;
use rand::RngExt;

use droplink_core::config::security::SecurityConfig;

/// Generates the opaque identifiers shares are addressed by.
///
/// Share codes are short and human-relayable; link tokens are long
/// random hex and act as capabilities. Both draw from the OS-seeded
/// thread-local generator.
#[derive(Debug, Clone, Copy)]
pub struct TokenGenerator {
    code_length: usize,
    token_bytes: usize,
}

impl TokenGenerator {
    /// Creates a generator from the security configuration.
    pub fn new(config: &SecurityConfig) -> Self {
        Self {
            code_length: config.share_code_length,
            token_bytes: config.link_token_bytes,
        }
    }

    /// A short alphanumeric share code.
    pub fn generate_code(&self) -> String {
        let mut rng = rand::rng();
        (0..self.code_length)
            .map(|_| rng.sample(Alphanumeric) as char)
            .collect()
    }

    /// A long hex-encoded link token.
    pub fn generate_token(&self) -> String {
        let mut rng = rand::rng();
        let mut out = String::with_capacity(self.token_bytes * 2);
        for _ in 0..self.token_bytes {
            let byte: u8 = rng.random();
            out.push_str(&format!("{byte:02x}"));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator() -> TokenGenerator {
        TokenGenerator::new(&SecurityConfig::default())
    }

    #[test]
    fn test_code_has_configured_length() {
        let code = generator().generate_code();
        assert_eq!(code.len(), SecurityConfig::default().share_code_length);
        assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_token_is_hex_of_configured_bytes() {
        let token = generator().generate_token();
        assert_eq!(token.len(), SecurityConfig::default().link_token_bytes * 2);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_generated_values_differ() {
        let g = generator();
        assert_ne!(g.generate_code(), g.generate_code());
        assert_ne!(g.generate_token(), g.generate_token());
    }
}
