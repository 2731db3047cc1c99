//! Webhook error types for the provisioning pipeline.

use thiserror::Error;

/// Errors raised while authenticating or decoding an inbound webhook.
///
/// Authentication failures (`InvalidSignature`, `TimestampOutOfRange`,
/// `InvalidTimestamp`, `MissingHeader`) map to HTTP 401 and must never be
/// preceded by side effects. Decoding failures map to HTTP 400.
#[derive(Debug, Clone, Error)]
pub enum WebhookError {
    #[error("webhook signature verification failed")]
    InvalidSignature,

    #[error("webhook timestamp is too old")]
    TimestampOutOfRange,

    #[error("webhook timestamp is in the future")]
    InvalidTimestamp,

    #[error("missing required header: {0}")]
    MissingHeader(&'static str),

    #[error("failed to parse webhook payload: {0}")]
    ParseError(String),
}

impl WebhookError {
    /// True for failures of sender authentication, as opposed to payload
    /// decoding problems.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(
            self,
            WebhookError::InvalidSignature
                | WebhookError::TimestampOutOfRange
                | WebhookError::InvalidTimestamp
                | WebhookError::MissingHeader(_)
        )
    }
}
