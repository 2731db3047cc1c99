//! Email address value object.
//!
//! Email is the natural key for accounts, so comparison must be
//! case-insensitive. The value object lowercases on construction, which
//! makes every downstream lookup and uniqueness check trivially correct.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// A normalized (trimmed, lowercased) email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Creates a normalized email address.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the input is empty or is not a
    /// plausible address (missing `@` or missing local/domain part).
    pub fn new(raw: &str) -> Result<Self, ValidationError> {
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(ValidationError::empty_field("email"));
        }

        let Some((local, domain)) = normalized.split_once('@') else {
            return Err(ValidationError::invalid_format("email", "missing '@'"));
        };
        if local.is_empty() || domain.is_empty() || !domain.contains('.') {
            return Err(ValidationError::invalid_format(
                "email",
                "missing local part or domain",
            ));
        }

        Ok(Self(normalized))
    }

    /// Returns the normalized address.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
