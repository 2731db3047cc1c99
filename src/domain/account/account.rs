//! Account aggregate.
//!
//! One account per email. The premium flag is monotonic under the purchase
//! pipeline: webhooks only ever upgrade, never downgrade.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AccountId, EmailAddress, Timestamp};

/// A user account with profile data and premium entitlement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub email: EmailAddress,
    pub display_name: String,
    pub phone: Option<String>,
    /// Premium entitlement flag. Only upgraded by the purchase pipeline.
    pub premium: bool,
    /// When premium was last activated. Overwritten on redelivery of an
    /// approved event for the same buyer; accepted drift.
    pub premium_since: Option<Timestamp>,
    /// Provider transaction reference from the most recent purchase.
    pub transaction_ref: Option<String>,
    /// Salted argon2 hash of the account credential.
    pub password_hash: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Account {
    /// Creates a non-premium account (self-registration / admin path).
    pub fn new(
        id: AccountId,
        email: EmailAddress,
        display_name: String,
        phone: Option<String>,
        password_hash: String,
        now: Timestamp,
    ) -> Self {
        Self {
            id,
            email,
            display_name,
            phone,
            premium: false,
            premium_since: None,
            transaction_ref: None,
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }

    /// Creates a premium account as a side effect of an approved purchase.
    pub fn provisioned(
        id: AccountId,
        email: EmailAddress,
        display_name: String,
        password_hash: String,
        transaction_ref: String,
        now: Timestamp,
    ) -> Self {
        Self {
            id,
            email,
            display_name,
            phone: None,
            premium: true,
            premium_since: Some(now),
            transaction_ref: Some(transaction_ref),
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }

    /// Grants (or refreshes) premium entitlement from an approved purchase.
    pub fn grant_premium(&mut self, transaction_ref: &str, now: Timestamp) {
        self.premium = true;
        self.premium_since = Some(now);
        self.transaction_ref = Some(transaction_ref.to_string());
        self.updated_at = now;
    }
}
