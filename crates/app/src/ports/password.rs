//! Password hashing port.

use plan_accion_domain::error::PlanError;

/// One-way password hashing.
///
/// Hashes are self-describing strings (e.g. PHC format) so that parameters
/// can change without invalidating stored hashes.
pub trait PasswordHasher {
    /// Hash a plaintext password with a fresh salt.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::Internal`] if hashing fails.
    fn hash(&self, password: &str) -> Result<String, PlanError>;

    /// Check a plaintext password against a stored hash.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::Internal`] if `hash` is not a valid hash string.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, PlanError>;
}
