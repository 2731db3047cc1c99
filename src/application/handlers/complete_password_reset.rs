//! CompletePasswordResetHandler - Command handler for applying a reset.
//!
//! Validates the token, then consumes it and applies the new credential
//! in one repository transaction. A token that loses a concurrent race
//! comes back as `TokenInvalid` from the repository.

use std::sync::Arc;

use crate::domain::account::{validate_password_policy, CredentialHasher, TokenStatus};
use crate::domain::foundation::{AccountId, DomainError, ErrorCode, Timestamp};
use crate::ports::ResetTokenRepository;

/// Command to complete a password reset with a token from the email link.
#[derive(Debug, Clone)]
pub struct CompletePasswordResetCommand {
    pub token: String,
    pub new_password: String,
}

/// Result of a completed reset.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletePasswordResetResult {
    pub account_id: AccountId,
}

/// Handler for completing password resets.
pub struct CompletePasswordResetHandler {
    tokens: Arc<dyn ResetTokenRepository>,
}

impl CompletePasswordResetHandler {
    pub fn new(tokens: Arc<dyn ResetTokenRepository>) -> Self {
        Self { tokens }
    }

    pub async fn handle(
        &self,
        cmd: CompletePasswordResetCommand,
    ) -> Result<CompletePasswordResetResult, DomainError> {
        validate_password_policy(&cmd.new_password)
            .map_err(|e| DomainError::new(ErrorCode::WeakPassword, e.to_string()))?;

        let token = self
            .tokens
            .find_by_token(&cmd.token)
            .await?
            .ok_or_else(|| DomainError::new(ErrorCode::TokenInvalid, "token not recognized"))?;

        match token.status_at(Timestamp::now()) {
            TokenStatus::Usable => {}
            TokenStatus::Used => {
                return Err(DomainError::new(
                    ErrorCode::TokenInvalid,
                    "token already used",
                ));
            }
            TokenStatus::Expired => {
                return Err(DomainError::new(ErrorCode::TokenExpired, "token expired"));
            }
        }

        let new_hash = CredentialHasher::hash(&cmd.new_password)
            .map_err(|e| DomainError::new(ErrorCode::InternalError, e.to_string()))?;

        self.tokens
            .consume_and_apply(&token.id, &token.account_id, &new_hash)
            .await?;

        tracing::info!(account_id = %token.account_id, "password reset completed");
        Ok(CompletePasswordResetResult {
            account_id: token.account_id,
        })
    }
}
