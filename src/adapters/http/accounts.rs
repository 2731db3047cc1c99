//! Account endpoints.

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use uuid::Uuid;

use crate::application::handlers::{CreateAccountCommand, UpdateAccountCommand};
use crate::domain::foundation::AccountId;

use super::dto::{AccountIdResponse, CreateAccountRequest, UpdateAccountRequest};
use super::{ApiError, AppState};

/// POST /api/accounts - Create an account.
pub async fn create_account(
    State(state): State<AppState>,
    Json(request): Json<CreateAccountRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .create_account_handler()
        .handle(CreateAccountCommand {
            email: request.email,
            display_name: request.display_name,
            phone: request.phone,
            password: request.password,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(AccountIdResponse {
            account_id: result.account_id.to_string(),
        }),
    ))
}

/// PATCH /api/accounts/:id - Update an account.
pub async fn update_account(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateAccountRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .update_account_handler()
        .handle(UpdateAccountCommand {
            account_id: AccountId::from_uuid(id),
            email: request.email,
            display_name: request.display_name,
            phone: request.phone,
            password: request.password,
        })
        .await?;

    Ok(Json(AccountIdResponse {
        account_id: result.account_id.to_string(),
    }))
}
