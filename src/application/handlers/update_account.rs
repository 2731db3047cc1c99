//! UpdateAccountHandler - Command handler for partial account updates.
//!
//! Fields left as `None` are untouched. Email and password changes go to
//! the identity store as well as the profile; the profile update runs
//! last so a profile read always reflects the credentials in force.

use std::sync::Arc;

use crate::domain::account::{validate_password_policy, CredentialHasher};
use crate::domain::foundation::{
    AccountId, DomainError, EmailAddress, ErrorCode, Timestamp, ValidationError,
};
use crate::ports::{AccountRepository, IdentityStore};

/// Command to update an existing account. `None` fields are untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateAccountCommand {
    pub account_id: AccountId,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub phone: Option<String>,
    pub password: Option<String>,
}

/// Result of an account update.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateAccountResult {
    pub account_id: AccountId,
}

/// Handler for partial account updates.
pub struct UpdateAccountHandler {
    accounts: Arc<dyn AccountRepository>,
    identities: Arc<dyn IdentityStore>,
}

impl UpdateAccountHandler {
    pub fn new(accounts: Arc<dyn AccountRepository>, identities: Arc<dyn IdentityStore>) -> Self {
        Self {
            accounts,
            identities,
        }
    }

    pub async fn handle(
        &self,
        cmd: UpdateAccountCommand,
    ) -> Result<UpdateAccountResult, DomainError> {
        let mut account = self
            .accounts
            .find_by_id(&cmd.account_id)
            .await?
            .ok_or_else(|| DomainError::new(ErrorCode::AccountNotFound, "account not found"))?;

        let new_email = match &cmd.email {
            Some(raw) => Some(EmailAddress::new(raw)?),
            None => None,
        };

        let new_hash = match &cmd.password {
            Some(password) => {
                validate_password_policy(password)
                    .map_err(|e| DomainError::new(ErrorCode::WeakPassword, e.to_string()))?;
                Some(
                    CredentialHasher::hash(password)
                        .map_err(|e| DomainError::new(ErrorCode::InternalError, e.to_string()))?,
                )
            }
            None => None,
        };

        if let Some(name) = &cmd.display_name {
            if name.trim().is_empty() {
                return Err(ValidationError::empty_field("display_name").into());
            }
        }

        // No transaction spans the two stores: a failed profile write
        // below leaves the identity already updated, and the caller
        // retries with the same values.
        if new_email.is_some() || new_hash.is_some() {
            self.identities
                .update_identity(&cmd.account_id, new_email.as_ref(), new_hash.as_deref())
                .await?;
        }

        if let Some(email) = new_email {
            account.email = email;
        }
        if let Some(hash) = new_hash {
            account.password_hash = hash;
        }
        if let Some(name) = cmd.display_name {
            account.display_name = name.trim().to_string();
        }
        if let Some(phone) = cmd.phone {
            account.phone = Some(phone);
        }
        account.updated_at = Timestamp::now();

        self.accounts.update(&account).await?;

        tracing::info!(account_id = %account.id, "account updated");
        Ok(UpdateAccountResult {
            account_id: account.id,
        })
    }
}
