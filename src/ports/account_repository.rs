//! Account repository port (profile and premium entitlement).
//!
//! Defines the contract for persisting and retrieving Account aggregates.
//! Implementations handle the actual database operations.
//!
//! # Design
//!
//! - **Email is the identity key**: the purchase pipeline dedupes on email,
//!   so `find_by_email` must be case-insensitive
//! - **Atomic provisioning**: `create` persists credential and profile
//!   together; on a duplicate email nothing is committed
//! - **Two-phase support**: `create_profile` persists only the profile
//!   half for flows that create the credential separately

use async_trait::async_trait;

use crate::domain::account::Account;
use crate::domain::foundation::{AccountId, DomainError, EmailAddress};

/// Outcome of an account creation attempt.
///
/// Duplicate email is a routine outcome of webhook redelivery, not an
/// error, so it gets its own variant rather than a `DomainError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    /// The account was persisted.
    Created,
    /// Another account already owns this email; nothing was written.
    DuplicateEmail,
}

/// Repository port for Account aggregate persistence.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Persist a new account, credential and profile atomically.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn create(&self, account: &Account) -> Result<CreateOutcome, DomainError>;

    /// Persist only the profile half of an account whose credential
    /// already exists in the identity store.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn create_profile(&self, account: &Account) -> Result<(), DomainError>;

    /// Update an existing account.
    ///
    /// # Errors
    ///
    /// - `AccountNotFound` if the account doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn update(&self, account: &Account) -> Result<(), DomainError>;

    /// Find an account by email. Case-insensitive.
    ///
    /// Returns `None` if no account owns the address.
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Account>, DomainError>;

    /// Find an account by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn AccountRepository) {}
    }
}
