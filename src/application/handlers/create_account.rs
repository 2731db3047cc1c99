//! CreateAccountHandler - Command handler for direct account creation.
//!
//! Two-phase creation: an authentication record first, then the profile.
//! If the profile phase fails, the authentication record is deleted again
//! so no half-created account can log in. Compensation is best-effort;
//! a compensation failure is logged and the original error is returned.

use std::sync::Arc;

use crate::domain::account::{validate_password_policy, Account, CredentialHasher};
use crate::domain::foundation::{
    AccountId, DomainError, EmailAddress, ErrorCode, Timestamp, ValidationError,
};
use crate::ports::{AccountRepository, IdentityStore, NewIdentity};

/// Command to create an account directly (admin / self-registration).
#[derive(Debug, Clone)]
pub struct CreateAccountCommand {
    pub email: String,
    pub display_name: String,
    pub phone: Option<String>,
    pub password: String,
}

/// Result of account creation.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateAccountResult {
    pub account_id: AccountId,
}

/// Handler for two-phase account creation.
pub struct CreateAccountHandler {
    accounts: Arc<dyn AccountRepository>,
    identities: Arc<dyn IdentityStore>,
}

impl CreateAccountHandler {
    pub fn new(accounts: Arc<dyn AccountRepository>, identities: Arc<dyn IdentityStore>) -> Self {
        Self {
            accounts,
            identities,
        }
    }

    pub async fn handle(
        &self,
        cmd: CreateAccountCommand,
    ) -> Result<CreateAccountResult, DomainError> {
        let email = EmailAddress::new(&cmd.email)?;
        if cmd.display_name.trim().is_empty() {
            return Err(ValidationError::empty_field("display_name").into());
        }
        validate_password_policy(&cmd.password)
            .map_err(|e| DomainError::new(ErrorCode::WeakPassword, e.to_string()))?;

        let password_hash = CredentialHasher::hash(&cmd.password)
            .map_err(|e| DomainError::new(ErrorCode::InternalError, e.to_string()))?;

        // Phase 1: authentication record. A duplicate email fails here
        // before anything else is written.
        let account_id = self
            .identities
            .create_identity(&NewIdentity {
                email: email.clone(),
                password_hash: password_hash.clone(),
            })
            .await?;

        // Phase 2: profile. On failure, compensate by removing the
        // phase 1 record.
        let account = Account::new(
            account_id,
            email,
            cmd.display_name.trim().to_string(),
            cmd.phone,
            password_hash,
            Timestamp::now(),
        );

        if let Err(profile_err) = self.accounts.create_profile(&account).await {
            if let Err(cleanup_err) = self.identities.delete_identity(&account_id).await {
                tracing::error!(
                    account_id = %account_id,
                    error = %cleanup_err,
                    "failed to compensate identity after profile failure"
                );
            }
            return Err(profile_err);
        }

        tracing::info!(account_id = %account_id, "account created");
        Ok(CreateAccountResult { account_id })
    }
}
