//! Credential issuance and storage.
//!
//! Temporary credentials are random alphanumeric strings; stored
//! credentials are salted argon2 hashes with constant-time verification.
//! Plaintext comparison is never an option here.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use rand::distributions::Alphanumeric;
use rand::Rng;
use thiserror::Error;

use crate::domain::foundation::ValidationError;

/// Length of generated temporary credentials.
pub const TEMP_PASSWORD_LEN: usize = 12;

/// Minimum accepted credential length (policy).
pub const MIN_PASSWORD_LEN: usize = 8;

/// Errors raised while hashing or verifying credentials.
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("failed to hash credential: {0}")]
    Hash(String),

    #[error("stored credential hash is malformed: {0}")]
    MalformedHash(String),
}

/// Generates a random temporary credential for provisioned accounts.
pub fn generate_temp_password() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TEMP_PASSWORD_LEN)
        .map(char::from)
        .collect()
}

/// Enforces the minimum credential length policy.
///
/// # Errors
///
/// Returns `ValidationError::TooShort` for credentials under
/// [`MIN_PASSWORD_LEN`] characters.
pub fn validate_password_policy(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::too_short("password", MIN_PASSWORD_LEN));
    }
    Ok(())
}

/// Salted one-way credential hashing (argon2id).
pub struct CredentialHasher;

impl CredentialHasher {
    /// Hashes a plaintext credential with a fresh random salt.
    pub fn hash(plain: &str) -> Result<String, CredentialError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(plain.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| CredentialError::Hash(e.to_string()))
    }

    /// Verifies a plaintext credential against a stored hash.
    ///
    /// Verification is constant-time by construction of the argon2
    /// implementation.
    pub fn verify(plain: &str, stored_hash: &str) -> Result<bool, CredentialError> {
        let parsed = PasswordHash::new(stored_hash)
            .map_err(|e| CredentialError::MalformedHash(e.to_string()))?;
        Ok(Argon2::default()
            .verify_password(plain.as_bytes(), &parsed)
            .is_ok())
    }
}
