//! HTTP DTOs (Data Transfer Objects) for the REST API.
//!
//! These types define the JSON request/response structure and are the
//! boundary between HTTP and the application layer. User-facing
//! messages are in Portuguese.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to create an account directly.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAccountRequest {
    pub email: String,
    pub display_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub password: String,
}

/// Request to update an account. Absent fields are untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAccountRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Request for a password reset link.
#[derive(Debug, Clone, Deserialize)]
pub struct RequestResetRequest {
    pub email: String,
}

/// Request to complete a password reset.
#[derive(Debug, Clone, Deserialize)]
pub struct CompleteResetRequest {
    pub token: String,
    pub new_password: String,
}

/// Query for a reminder run. Defaults to tomorrow.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RunRemindersQuery {
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Response after creating or updating an account.
#[derive(Debug, Clone, Serialize)]
pub struct AccountIdResponse {
    pub account_id: String,
}

/// Response identifying an appointment acted upon.
#[derive(Debug, Clone, Serialize)]
pub struct AppointmentIdResponse {
    pub appointment_id: String,
}

/// Generic message response (password reset acknowledgement).
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Acknowledgement returned to payment providers.
///
/// Providers only care about the HTTP status; the body is for humans
/// reading delivery logs. `success: false` with HTTP 200 tells the
/// provider not to redeliver an event we cannot ever process.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookAck {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
}

impl WebhookAck {
    pub fn ok(message: impl Into<String>, account_id: Option<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            account_id,
        }
    }

    pub fn failed(message: String) -> Self {
        Self {
            success: false,
            message,
            account_id: None,
        }
    }
}

/// Summary of a reminder run.
#[derive(Debug, Clone, Serialize)]
pub struct ReminderRunResponse {
    pub sent: usize,
    pub failed: usize,
}

/// Standard error response body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}
