//! Provider webhook payloads and their normalization into `PurchaseEvent`.
//!
//! Each payment provider delivers a differently shaped JSON body. Payloads
//! are modeled as a tagged union with one explicit adapter per provider;
//! the rest of the pipeline only ever sees the canonical `PurchaseEvent`.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::EmailAddress;

use super::errors::WebhookError;

/// Payment provider that originated a webhook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentProvider {
    MercadoPago,
    Hotmart,
}

impl fmt::Display for PaymentProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentProvider::MercadoPago => write!(f, "mercadopago"),
            PaymentProvider::Hotmart => write!(f, "hotmart"),
        }
    }
}

/// Normalized approval status of a purchase notification.
///
/// Only `Approved` triggers provisioning; every other variant is
/// acknowledged without side effects so provider redeliveries of
/// pending/cancelled states never amplify into errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApprovalStatus {
    Approved,
    Pending,
    Refused,
    Cancelled,
    Refunded,
    Unknown(String),
}

impl ApprovalStatus {
    /// Parses a provider status string into the canonical status.
    ///
    /// Providers disagree on vocabulary: `paid`, `approved`, `completed`
    /// and `complete` all mean the purchase went through.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "approved" | "paid" | "completed" | "complete" => ApprovalStatus::Approved,
            "pending" | "in_process" | "waiting_payment" => ApprovalStatus::Pending,
            "rejected" | "refused" => ApprovalStatus::Refused,
            "cancelled" | "canceled" => ApprovalStatus::Cancelled,
            "refunded" | "chargeback" => ApprovalStatus::Refunded,
            other => ApprovalStatus::Unknown(other.to_string()),
        }
    }

    /// True only for the approved/complete family of statuses.
    pub fn is_approved(&self) -> bool {
        matches!(self, ApprovalStatus::Approved)
    }
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApprovalStatus::Approved => write!(f, "approved"),
            ApprovalStatus::Pending => write!(f, "pending"),
            ApprovalStatus::Refused => write!(f, "refused"),
            ApprovalStatus::Cancelled => write!(f, "cancelled"),
            ApprovalStatus::Refunded => write!(f, "refunded"),
            ApprovalStatus::Unknown(s) => write!(f, "unknown({})", s),
        }
    }
}

/// Canonical purchase notification, independent of provider shape.
#[derive(Debug, Clone)]
pub struct PurchaseEvent {
    /// Provider that delivered the event.
    pub provider: PaymentProvider,
    /// Provider's event label (e.g. `PURCHASE_APPROVED`, `payment.updated`).
    pub event: String,
    /// Buyer email, normalized for case-insensitive lookup.
    pub buyer_email: EmailAddress,
    /// Buyer display name as reported by the provider.
    pub buyer_name: String,
    /// Provider's purchase/transaction identifier.
    pub transaction_id: String,
    /// Normalized approval status.
    pub status: ApprovalStatus,
}

// ─── Hotmart payload ────────────────────────────────────────────────────

/// Hotmart webhook body.
#[derive(Debug, Clone, Deserialize)]
pub struct HotmartPayload {
    pub event: String,
    pub data: HotmartData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HotmartData {
    pub buyer: HotmartBuyer,
    pub purchase: HotmartPurchase,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HotmartBuyer {
    pub email: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HotmartPurchase {
    pub transaction: String,
    pub status: String,
}

// ─── Mercado Pago payload ───────────────────────────────────────────────

/// Mercado Pago webhook body.
#[derive(Debug, Clone, Deserialize)]
pub struct MercadoPagoPayload {
    pub action: String,
    pub payment: MercadoPagoPayment,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MercadoPagoPayment {
    pub id: i64,
    pub status: String,
    pub payer: MercadoPagoPayer,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MercadoPagoPayer {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
}

// ─── Tagged union and adapters ──────────────────────────────────────────

/// Provider-specific payload, parsed but not yet normalized.
#[derive(Debug, Clone)]
pub enum ProviderPayload {
    MercadoPago(MercadoPagoPayload),
    Hotmart(HotmartPayload),
}

impl ProviderPayload {
    /// Parses a raw JSON body into the payload variant for `provider`.
    ///
    /// # Errors
    ///
    /// Returns `WebhookError::ParseError` when the body is not valid JSON
    /// of the expected shape.
    pub fn parse(provider: PaymentProvider, body: &[u8]) -> Result<Self, WebhookError> {
        match provider {
            PaymentProvider::MercadoPago => serde_json::from_slice(body)
                .map(ProviderPayload::MercadoPago)
                .map_err(|e| WebhookError::ParseError(e.to_string())),
            PaymentProvider::Hotmart => serde_json::from_slice(body)
                .map(ProviderPayload::Hotmart)
                .map_err(|e| WebhookError::ParseError(e.to_string())),
        }
    }

    /// Normalizes the provider payload into a canonical `PurchaseEvent`.
    ///
    /// # Errors
    ///
    /// Returns `WebhookError::ParseError` when the buyer email is not a
    /// plausible address.
    pub fn normalize(self) -> Result<PurchaseEvent, WebhookError> {
        match self {
            ProviderPayload::Hotmart(payload) => {
                let buyer_email = EmailAddress::new(&payload.data.buyer.email)
                    .map_err(|e| WebhookError::ParseError(e.to_string()))?;
                Ok(PurchaseEvent {
                    provider: PaymentProvider::Hotmart,
                    event: payload.event,
                    buyer_email,
                    buyer_name: payload.data.buyer.name,
                    transaction_id: payload.data.purchase.transaction,
                    status: ApprovalStatus::parse(&payload.data.purchase.status),
                })
            }
            ProviderPayload::MercadoPago(payload) => {
                let buyer_email = EmailAddress::new(&payload.payment.payer.email)
                    .map_err(|e| WebhookError::ParseError(e.to_string()))?;
                Ok(PurchaseEvent {
                    provider: PaymentProvider::MercadoPago,
                    event: payload.action,
                    buyer_email,
                    buyer_name: payload.payment.payer.name.unwrap_or_default(),
                    transaction_id: payload.payment.id.to_string(),
                    status: ApprovalStatus::parse(&payload.payment.status),
                })
            }
        }
    }
}
