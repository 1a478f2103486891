//! Argon2id hashing and verification for share passwords.
//!
//! This is the single credential path for both direct codes and share
//! links. There is no weaker legacy scheme and the share code itself is
//! never accepted as a password; a code is a lookup key, not a secret
//! that gates content.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        PasswordHash, PasswordHasher as ArgonHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};
use tracing::warn;

use droplink_core::config::security::SecurityConfig;
use droplink_core::error::AppError;

/// Handles share password hashing and verification using Argon2id.
///
/// Cost parameters come from [`SecurityConfig`] so deployments can tune
/// verification into the tens-of-milliseconds range. Hashing and
/// verification are CPU-bound; callers on an async executor run them via
/// `spawn_blocking`.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    memory_kib: u32,
    iterations: u32,
    parallelism: u32,
}

impl PasswordHasher {
    /// Creates a new password hasher from security configuration.
    pub fn new(config: &SecurityConfig) -> Self {
        Self {
            memory_kib: config.argon2_memory_kib,
            iterations: config.argon2_iterations,
            parallelism: config.argon2_parallelism,
        }
    }

    fn argon2(&self) -> Result<Argon2<'static>, AppError> {
        let params = Params::new(self.memory_kib, self.iterations, self.parallelism, None)
            .map_err(|e| AppError::internal(format!("Invalid Argon2 parameters: {e}")))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }

    /// Hashes a plaintext password with a fresh random salt.
    ///
    /// Salts are generated here, never caller-supplied, so two hashes of
    /// the same password are always distinct.
    pub fn hash_password(&self, password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()?
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;
        Ok(hash.to_string())
    }

    /// Verifies a plaintext password against a stored hash.
    ///
    /// Returns `Ok(true)` only on a positive match. A stored hash that
    /// fails to parse is reported as a mismatch — a corrupt hash must
    /// deny, never grant.
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> Result<bool, AppError> {
        let parsed_hash = match PasswordHash::new(stored_hash) {
            Ok(h) => h,
            Err(e) => {
                warn!(error = %e, "Stored password hash is malformed, denying");
                return Ok(false);
            }
        };

        match self
            .argon2()?
            .verify_password(password.as_bytes(), &parsed_hash)
        {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AppError::internal(format!(
                "Password verification failed: {e}"
            ))),
        }
    }
}
