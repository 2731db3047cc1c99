//! Password reset token repository port.
//!
//! # Design
//!
//! - **Atomic consumption**: `consume_and_apply` marks the token used and
//!   applies the new credential hash in a single transaction, so a token
//!   can never be burned without the credential changing (or vice versa)
//! - **Unbounded issuance**: issuing a token does not invalidate earlier
//!   ones; each is independently single-use

use async_trait::async_trait;

use crate::domain::account::PasswordResetToken;
use crate::domain::foundation::{AccountId, DomainError, TokenId};

/// Repository port for password reset tokens.
#[async_trait]
pub trait ResetTokenRepository: Send + Sync {
    /// Persist a freshly issued token.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn save(&self, token: &PasswordResetToken) -> Result<(), DomainError>;

    /// Look up a token by its opaque value.
    ///
    /// Returns `None` when no such token exists.
    async fn find_by_token(&self, token: &str) -> Result<Option<PasswordResetToken>, DomainError>;

    /// Atomically mark the token used and store the new credential hash
    /// for its account.
    ///
    /// # Errors
    ///
    /// - `TokenInvalid` if the token was consumed concurrently or is gone
    /// - `DatabaseError` on persistence failure
    async fn consume_and_apply(
        &self,
        token_id: &TokenId,
        account_id: &AccountId,
        new_password_hash: &str,
    ) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_token_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn ResetTokenRepository) {}
    }
}
