//! Password hashing using Argon2.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
    Argon2, Params,
};
use koinonia_core::{KoinoniaError, KoinoniaResult};
use std::sync::Arc;
use tracing::debug;

/// Argon2id hasher for passwords and stored refresh tokens.
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Arc<Argon2<'static>>,
}

impl PasswordHasher {
    /// Creates a new password hasher with default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::with_params(Params::DEFAULT)
    }

    #[must_use]
    pub fn with_params(params: Params) -> Self {
        let argon2 = Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);
        Self {
            argon2: Arc::new(argon2),
        }
    }

    /// Creates a password hasher from a memory cost in MiB.
    #[must_use]
    pub fn with_cost(cost: u32) -> Self {
        let params = Params::new(
            cost.saturating_mul(1024), // KiB
            2,
            1,
            None,
        )
        .unwrap_or(Params::DEFAULT);

        Self::with_params(params)
    }

    /// Hashes a secret with a fresh salt.
    pub fn hash(&self, secret: &str) -> KoinoniaResult<String> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = self
            .argon2
            .hash_password(secret.as_bytes(), &salt)
            .map_err(|e| KoinoniaError::Internal(format!("Failed to hash password: {e}")))?;

        Ok(hash.to_string())
    }

    /// Verifies a secret against a PHC-formatted hash.
    pub fn verify(&self, secret: &str, hash: &str) -> KoinoniaResult<bool> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| KoinoniaError::Internal(format!("Invalid password hash format: {e}")))?;

        match self.argon2.verify_password(secret.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => {
                debug!("Password verification failed: incorrect password");
                Ok(false)
            }
            Err(e) => Err(KoinoniaError::Internal(format!(
                "Password verification error: {e}"
            ))),
        }
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHasher").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = PasswordHasher::with_cost(1);
        let hash = hasher.hash("MySecurePassword123!").unwrap();

        assert!(hasher.verify("MySecurePassword123!", &hash).unwrap());
        assert!(!hasher.verify("wrong-password", &hash).unwrap());
    }

    #[test]
    fn test_salted_hashes_differ() {
        let hasher = PasswordHasher::with_cost(1);
        let hash1 = hasher.hash("TestPassword123!").unwrap();
        let hash2 = hasher.hash("TestPassword123!").unwrap();

        assert_ne!(hash1, hash2);
        assert!(hasher.verify("TestPassword123!", &hash2).unwrap());
    }

    #[test]
    fn test_invalid_hash_format_returns_error() {
        let hasher = PasswordHasher::with_cost(1);
        assert!(hasher.verify("password", "not-a-valid-hash").is_err());
    }

    #[test]
    fn test_hasher_default() {
        let hasher = PasswordHasher::default();
        let hash = hasher.hash("test_password").unwrap();
        assert!(hasher.verify("test_password", &hash).unwrap());
    }

    #[test]
    fn test_debug_hides_internals() {
        let debug_str = format!("{:?}", PasswordHasher::with_cost(1));
        assert_eq!(debug_str, "PasswordHasher { .. }");
    }
}
