//! Purchase provisioning domain: provider payloads, canonical purchase
//! events and webhook authentication.

mod errors;
mod purchase_event;
mod webhook_verifier;

pub use errors::WebhookError;
pub use purchase_event::{
    ApprovalStatus, HotmartPayload, MercadoPagoPayload, PaymentProvider, ProviderPayload,
    PurchaseEvent,
};
pub use webhook_verifier::{SignatureHeader, WebhookVerifier};
