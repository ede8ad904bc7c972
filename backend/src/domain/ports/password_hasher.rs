//! Port for one-way password hashing.

use super::define_port_error;

define_port_error! {
    /// Failures raised while hashing a password.
    pub enum PasswordHashError {
        /// The hashing backend rejected the input or parameters.
        Hashing { message: String } => "password hashing failed: {message}",
    }
}

/// Hash and verify passwords. Implementations must salt every hash.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Produce a self-describing hash string for storage.
    fn hash(&self, password: &str) -> Result<String, PasswordHashError>;

    /// Check `password` against a stored hash. Malformed or unusable hashes
    /// never verify.
    fn verify(&self, password: &str, stored_hash: &str) -> bool;
}
