//! Password reset tokens.
//!
//! Per-token state machine: `Issued -> {Used, Expired}`, both terminal.
//! Issuing a new token does not invalidate prior outstanding tokens;
//! single-use is enforced at consumption time.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AccountId, Timestamp, TokenId};

/// Entropy of the opaque token value (32 bytes = 256 bits).
pub const RESET_TOKEN_BYTES: usize = 32;

/// Token lifetime: one hour from issuance.
pub const RESET_TOKEN_TTL_SECS: u64 = 3600;

/// Consumption status of a reset token at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenStatus {
    /// Unused and within its validity window.
    Usable,
    /// Already consumed; permanently invalid.
    Used,
    /// Past its expiry; permanently invalid.
    Expired,
}

/// A single-use, time-limited password reset token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PasswordResetToken {
    pub id: TokenId,
    pub account_id: AccountId,
    /// Opaque random token value, hex-encoded.
    pub token: String,
    pub expires_at: Timestamp,
    pub used: bool,
    pub created_at: Timestamp,
}

impl PasswordResetToken {
    /// Issues a fresh token for an account, valid for one hour.
    pub fn issue(account_id: AccountId, now: Timestamp) -> Self {
        let mut bytes = [0u8; RESET_TOKEN_BYTES];
        rand::Rng::fill(&mut rand::thread_rng(), &mut bytes[..]);

        Self {
            id: TokenId::new(),
            account_id,
            token: hex::encode(bytes),
            expires_at: now.plus_secs(RESET_TOKEN_TTL_SECS),
            used: false,
            created_at: now,
        }
    }

    /// Evaluates the token's status at `now`.
    ///
    /// A token is usable up to and including its expiry instant; the
    /// `used` flag wins over expiry so a consumed token never reports
    /// `Expired`.
    pub fn status_at(&self, now: Timestamp) -> TokenStatus {
        if self.used {
            TokenStatus::Used
        } else if now.is_after(&self.expires_at) {
            TokenStatus::Expired
        } else {
            TokenStatus::Usable
        }
    }
}
