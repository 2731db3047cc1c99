//! Identity store port (authentication records).
//!
//! The identity store owns the email/credential pair used for login.
//! It is the first phase of two-phase account creation: an identity is
//! created, then a profile; if the profile fails, the identity must be
//! deleted again (compensation).
//!
//! # Design
//!
//! - **Compensation-friendly**: `delete_identity` is best-effort cleanup
//!   and must succeed on already-deleted identities
//! - **Partial updates**: `update_identity` takes optional fields so the
//!   caller can change email and credential independently

use async_trait::async_trait;

use crate::domain::foundation::{AccountId, DomainError, EmailAddress};

/// A new authentication record to be created.
#[derive(Debug, Clone)]
pub struct NewIdentity {
    pub email: EmailAddress,
    /// Salted argon2 hash, never a plaintext credential.
    pub password_hash: String,
}

/// Port for the authentication record store.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Create an authentication record and return its account ID.
    ///
    /// # Errors
    ///
    /// - `DuplicateAccount` if the email is already registered
    /// - `DatabaseError` on persistence failure
    async fn create_identity(&self, identity: &NewIdentity) -> Result<AccountId, DomainError>;

    /// Delete an authentication record. Used as compensation when the
    /// second creation phase fails; deleting a missing identity is Ok.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn delete_identity(&self, id: &AccountId) -> Result<(), DomainError>;

    /// Update email and/or credential hash for an identity. Fields left
    /// as `None` are untouched.
    ///
    /// # Errors
    ///
    /// - `AccountNotFound` if the identity doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn update_identity(
        &self,
        id: &AccountId,
        email: Option<&EmailAddress>,
        password_hash: Option<&str>,
    ) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_store_is_object_safe() {
        fn _accepts_dyn(_store: &dyn IdentityStore) {}
    }
}
