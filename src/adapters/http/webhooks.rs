//! Payment provider webhook endpoints.
//!
//! Verification happens before any parsing: Mercado Pago events carry an
//! HMAC signature header, Hotmart events a shared verification token.
//! Authentication failures get 401 and are redelivered by the provider;
//! a `Failed` processing outcome gets 200 with `success: false` so the
//! provider stops redelivering an event we can never process.

use axum::body::Bytes;
use axum::extract::{Json, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::application::handlers::{ProcessPurchaseCommand, ProcessPurchaseResult};
use crate::domain::provisioning::{PaymentProvider, ProviderPayload, WebhookError};

use super::dto::{ErrorResponse, WebhookAck};
use super::{ApiError, AppState};

/// Mercado Pago signature header (`ts=...,v1=...`).
const MP_SIGNATURE_HEADER: &str = "x-signature";

/// Hotmart verification token header.
const HOTMART_TOKEN_HEADER: &str = "x-hotmart-hottok";

/// GET /webhooks/{provider} - Liveness probe for provider consoles.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// POST /webhooks/mercadopago - Handle Mercado Pago payment events.
pub async fn mercadopago(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let signature = match header_value(&headers, MP_SIGNATURE_HEADER) {
        Some(value) => value,
        None => return Ok(missing_header_response(MP_SIGNATURE_HEADER)),
    };

    if let Err(e) = state.webhook_verifier.verify_mercadopago(&body, signature) {
        return Ok(webhook_error_response(e));
    }

    process(state, PaymentProvider::MercadoPago, &body).await
}

/// POST /webhooks/hotmart - Handle Hotmart purchase events.
pub async fn hotmart(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let hottok = match header_value(&headers, HOTMART_TOKEN_HEADER) {
        Some(value) => value,
        None => return Ok(missing_header_response(HOTMART_TOKEN_HEADER)),
    };

    if let Err(e) = state.webhook_verifier.verify_hotmart(hottok) {
        return Ok(webhook_error_response(e));
    }

    process(state, PaymentProvider::Hotmart, &body).await
}

async fn process(
    state: AppState,
    provider: PaymentProvider,
    body: &[u8],
) -> Result<Response, ApiError> {
    let payload = match ProviderPayload::parse(provider, body) {
        Ok(payload) => payload,
        Err(e) => return Ok(webhook_error_response(e)),
    };

    let event = match payload.normalize() {
        Ok(event) => event,
        Err(e) => return Ok(webhook_error_response(e)),
    };

    let result = state
        .process_purchase_handler()
        .handle(ProcessPurchaseCommand { event })
        .await?;

    let ack = match result {
        ProcessPurchaseResult::Provisioned { account_id, .. } => {
            WebhookAck::ok("provisioned", Some(account_id.to_string()))
        }
        ProcessPurchaseResult::Upgraded { account_id } => {
            WebhookAck::ok("upgraded", Some(account_id.to_string()))
        }
        ProcessPurchaseResult::Ignored => WebhookAck::ok("ignored", None),
        ProcessPurchaseResult::Failed { message } => WebhookAck::failed(message),
    };

    Ok((StatusCode::OK, Json(ack)).into_response())
}

fn header_value<'h>(headers: &'h HeaderMap, name: &str) -> Option<&'h str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn missing_header_response(header: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse::new(
            "MISSING_HEADER",
            format!("Cabeçalho obrigatório ausente: {}", header),
        )),
    )
        .into_response()
}

fn webhook_error_response(err: WebhookError) -> Response {
    if err.is_authentication_failure() {
        (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::new("INVALID_SIGNATURE", "Assinatura inválida.")),
        )
            .into_response()
    } else {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(
                "INVALID_PAYLOAD",
                format!("Payload inválido: {}", err),
            )),
        )
            .into_response()
    }
}
