//! # plan-accion-adapter-password-argon2
//!
//! Password hashing adapter using [argon2](https://docs.rs/argon2).
//!
//! Hashes are stored in PHC string format (`$argon2id$v=19$...`), so the
//! algorithm parameters travel with every hash.
//!
//! ## Dependency rule
//! Depends on `plan-accion-app` (for the port trait) and `plan-accion-domain`.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{self, PasswordHash, SaltString};
use argon2::{Argon2, PasswordVerifier};

use plan_accion_app::ports::PasswordHasher;
use plan_accion_domain::error::PlanError;

/// Errors raised by the argon2 backend.
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// Hashing the plaintext failed.
    #[error("failed to hash password")]
    Hash(#[source] password_hash::Error),

    /// The stored value is not a valid PHC hash string.
    #[error("stored password hash is malformed")]
    MalformedHash(#[source] password_hash::Error),
}

impl From<PasswordError> for PlanError {
    fn from(err: PasswordError) -> Self {
        PlanError::Internal(Box::new(err))
    }
}

/// Argon2id hasher with the crate's default parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2PasswordHasher;

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &str) -> Result<String, PlanError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = argon2::PasswordHasher::hash_password(
            &Argon2::default(),
            password.as_bytes(),
            &salt,
        )
        .map_err(PasswordError::Hash)?;
        Ok(hash.to_string())
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, PlanError> {
        let parsed = PasswordHash::new(hash).map_err(PasswordError::MalformedHash)?;
        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(err) => {
                tracing::warn!(error = %err, "password verification failed");
                Err(PasswordError::MalformedHash(err).into())
            }
        }
    }
}
