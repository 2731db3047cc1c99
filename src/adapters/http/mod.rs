//! HTTP adapter - REST API built on axum.
//!
//! Routes connect to application command handlers through [`AppState`];
//! domain errors are mapped to HTTP statuses by [`ApiError`].

pub mod accounts;
pub mod dto;
pub mod password_reset;
pub mod reminders;
pub mod webhooks;

use std::sync::Arc;

use axum::extract::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;

use crate::application::handlers::{
    CompletePasswordResetHandler, CreateAccountHandler, ProcessPurchaseHandler,
    RequestPasswordResetHandler, ResendReminderHandler, SendDueRemindersHandler,
    UpdateAccountHandler,
};
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::provisioning::WebhookVerifier;
use crate::ports::{
    AccountRepository, AppointmentRepository, IdentityStore, Mailer, ResetTokenRepository,
};

use dto::ErrorResponse;

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state, cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<dyn AccountRepository>,
    pub identities: Arc<dyn IdentityStore>,
    pub reset_tokens: Arc<dyn ResetTokenRepository>,
    pub appointments: Arc<dyn AppointmentRepository>,
    pub mailer: Arc<dyn Mailer>,
    pub webhook_verifier: Arc<WebhookVerifier>,
    pub public_base_url: String,
}

impl AppState {
    /// Create handlers on demand from the shared state.
    pub fn process_purchase_handler(&self) -> ProcessPurchaseHandler {
        ProcessPurchaseHandler::new(self.accounts.clone(), self.mailer.clone())
    }

    pub fn create_account_handler(&self) -> CreateAccountHandler {
        CreateAccountHandler::new(self.accounts.clone(), self.identities.clone())
    }

    pub fn update_account_handler(&self) -> UpdateAccountHandler {
        UpdateAccountHandler::new(self.accounts.clone(), self.identities.clone())
    }

    pub fn request_reset_handler(&self) -> RequestPasswordResetHandler {
        RequestPasswordResetHandler::new(
            self.accounts.clone(),
            self.reset_tokens.clone(),
            self.mailer.clone(),
            self.public_base_url.clone(),
        )
    }

    pub fn complete_reset_handler(&self) -> CompletePasswordResetHandler {
        CompletePasswordResetHandler::new(self.reset_tokens.clone())
    }

    pub fn send_due_reminders_handler(&self) -> SendDueRemindersHandler {
        SendDueRemindersHandler::new(self.appointments.clone(), self.mailer.clone())
    }

    pub fn resend_reminder_handler(&self) -> ResendReminderHandler {
        ResendReminderHandler::new(self.appointments.clone(), self.mailer.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Router
// ════════════════════════════════════════════════════════════════════════════════

/// Create the complete API router.
///
/// # Routes
///
/// ## Webhook Endpoints (no auth, signature verified)
/// - `POST /webhooks/mercadopago` - Mercado Pago payment events
/// - `POST /webhooks/hotmart` - Hotmart purchase events
/// - `GET /webhooks/{provider}` - Liveness probe used by provider consoles
///
/// ## Account Endpoints
/// - `POST /api/accounts` - Create an account
/// - `PATCH /api/accounts/:id` - Update an account
///
/// ## Password Reset Endpoints
/// - `POST /api/password-reset/request` - Request a reset link
/// - `POST /api/password-reset/complete` - Apply a new password
///
/// ## Reminder Endpoints (operator)
/// - `GET /api/reminders/run` - Trigger a reminder run
/// - `POST /api/appointments/:id/reminder` - Resend one reminder
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/webhooks/mercadopago",
            post(webhooks::mercadopago).get(webhooks::liveness),
        )
        .route(
            "/webhooks/hotmart",
            post(webhooks::hotmart).get(webhooks::liveness),
        )
        .route("/api/accounts", post(accounts::create_account))
        .route("/api/accounts/:id", axum::routing::patch(accounts::update_account))
        .route(
            "/api/password-reset/request",
            post(password_reset::request_reset),
        )
        .route(
            "/api/password-reset/complete",
            post(password_reset::complete_reset),
        )
        .route("/api/reminders/run", get(reminders::run_reminders))
        .route(
            "/api/appointments/:id/reminder",
            post(reminders::resend_reminder),
        )
        .with_state(state)
}

/// GET /health - Liveness probe.
async fn health() -> StatusCode {
    StatusCode::OK
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts domain errors to HTTP responses.
pub struct ApiError(DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.0.code {
            ErrorCode::ValidationFailed
            | ErrorCode::EmptyField
            | ErrorCode::InvalidFormat
            | ErrorCode::WeakPassword
            | ErrorCode::TokenInvalid
            | ErrorCode::TokenExpired => StatusCode::BAD_REQUEST,
            ErrorCode::AccountNotFound | ErrorCode::AppointmentNotFound => StatusCode::NOT_FOUND,
            ErrorCode::DuplicateAccount => StatusCode::CONFLICT,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::DatabaseError | ErrorCode::MailError | ErrorCode::InternalError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if status.is_server_error() {
            tracing::error!(code = %self.0.code, message = %self.0.message, "request failed");
        }

        // Internal detail stays out of 5xx bodies.
        let body = if status.is_server_error() {
            ErrorResponse::new(self.0.code.to_string(), "Erro interno. Tente novamente.")
        } else {
            ErrorResponse::new(self.0.code.to_string(), self.0.message)
        };

        (status, Json(body)).into_response()
    }
}
