//! ProcessPurchaseHandler - Command handler for approved purchase provisioning.
//!
//! Turns a verified, normalized purchase event into an account side
//! effect: upgrade an existing account to premium, or create a fresh
//! premium account and email temporary credentials. Redelivery of the
//! same event is harmless because the email lookup routes the second
//! delivery down the upgrade path.

use std::sync::Arc;

use crate::domain::account::{generate_temp_password, Account, CredentialHasher};
use crate::domain::foundation::{AccountId, DomainError, ErrorCode, Timestamp};
use crate::domain::provisioning::PurchaseEvent;
use crate::ports::{AccountRepository, CreateOutcome, Mailer};

/// Command to process one normalized purchase event.
#[derive(Debug, Clone)]
pub struct ProcessPurchaseCommand {
    pub event: PurchaseEvent,
}

/// Outcome of purchase processing.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessPurchaseResult {
    /// A new premium account was created. `notified` is false when the
    /// credentials email could not be delivered.
    Provisioned {
        account_id: AccountId,
        notified: bool,
    },
    /// The buyer already had an account; it now has premium.
    Upgraded { account_id: AccountId },
    /// The event's status is not an approval; nothing was done.
    Ignored,
    /// Provisioning could not complete; nothing was committed.
    Failed { message: String },
}

/// Handler for purchase provisioning.
pub struct ProcessPurchaseHandler {
    accounts: Arc<dyn AccountRepository>,
    mailer: Arc<dyn Mailer>,
}

impl ProcessPurchaseHandler {
    pub fn new(accounts: Arc<dyn AccountRepository>, mailer: Arc<dyn Mailer>) -> Self {
        Self { accounts, mailer }
    }

    pub async fn handle(
        &self,
        cmd: ProcessPurchaseCommand,
    ) -> Result<ProcessPurchaseResult, DomainError> {
        let event = cmd.event;

        if !event.status.is_approved() {
            tracing::info!(
                provider = %event.provider,
                status = ?event.status,
                "ignoring non-approved purchase event"
            );
            return Ok(ProcessPurchaseResult::Ignored);
        }

        let now = Timestamp::now();

        // Email lookup is the sole dedup mechanism: a redelivered event
        // finds the account it created the first time and upgrades it.
        if let Some(mut account) = self.accounts.find_by_email(&event.buyer_email).await? {
            account.grant_premium(&event.transaction_id, now);
            self.accounts.update(&account).await?;

            tracing::info!(
                account_id = %account.id,
                transaction = %event.transaction_id,
                "existing account upgraded to premium"
            );
            return Ok(ProcessPurchaseResult::Upgraded {
                account_id: account.id,
            });
        }

        let temp_password = generate_temp_password();
        let password_hash = CredentialHasher::hash(&temp_password)
            .map_err(|e| DomainError::new(ErrorCode::InternalError, e.to_string()))?;

        let display_name = if event.buyer_name.trim().is_empty() {
            // Hotmart omits the buyer name on some event shapes.
            event
                .buyer_email
                .as_str()
                .split('@')
                .next()
                .unwrap_or_default()
                .to_string()
        } else {
            event.buyer_name.clone()
        };

        let account = Account::provisioned(
            AccountId::new(),
            event.buyer_email.clone(),
            display_name,
            password_hash,
            event.transaction_id.clone(),
            now,
        );

        match self.accounts.create(&account).await? {
            CreateOutcome::Created => {}
            CreateOutcome::DuplicateEmail => {
                // Lost a race with a concurrent delivery. Nothing was
                // committed; the winning delivery did the work.
                return Ok(ProcessPurchaseResult::Failed {
                    message: format!("account for {} already exists", event.buyer_email),
                });
            }
        }

        // The account is kept even when the credentials email fails;
        // the buyer can recover access through the password reset flow.
        let notified = match self
            .mailer
            .send_welcome_credentials(&account.email, &account.display_name, &temp_password)
            .await
        {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(
                    account_id = %account.id,
                    error = %e,
                    "failed to send welcome credentials"
                );
                false
            }
        };

        tracing::info!(
            account_id = %account.id,
            transaction = %event.transaction_id,
            notified,
            "premium account provisioned"
        );

        Ok(ProcessPurchaseResult::Provisioned {
            account_id: account.id,
            notified,
        })
    }
}
