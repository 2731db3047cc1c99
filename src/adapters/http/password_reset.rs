//! Password reset endpoints.
//!
//! The request endpoint is deliberately uninformative: same status and
//! body whether or not the email maps to an account.

use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::handlers::{CompletePasswordResetCommand, RequestPasswordResetCommand};

use super::dto::{CompleteResetRequest, MessageResponse, RequestResetRequest};
use super::{ApiError, AppState};

/// POST /api/password-reset/request - Request a reset link by email.
pub async fn request_reset(
    State(state): State<AppState>,
    Json(request): Json<RequestResetRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .request_reset_handler()
        .handle(RequestPasswordResetCommand {
            email: request.email,
        })
        .await?;

    Ok(Json(MessageResponse {
        message: result.message,
    }))
}

/// POST /api/password-reset/complete - Apply a new password with a token.
pub async fn complete_reset(
    State(state): State<AppState>,
    Json(request): Json<CompleteResetRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .complete_reset_handler()
        .handle(CompletePasswordResetCommand {
            token: request.token,
            new_password: request.new_password,
        })
        .await?;

    Ok((
        StatusCode::OK,
        Json(MessageResponse {
            message: "Senha redefinida com sucesso.".to_string(),
        }),
    ))
}
