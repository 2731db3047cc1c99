//! Shared domain primitives: identifiers, timestamps, email addresses
//! and the error vocabulary used across all layers.

mod email;
mod errors;
mod ids;
mod timestamp;

pub use email::EmailAddress;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{AccountId, AppointmentId, TokenId};
pub use timestamp::Timestamp;
