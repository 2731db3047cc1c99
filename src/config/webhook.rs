//! Payment webhook configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

/// Payment webhook configuration (Mercado Pago and Hotmart)
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookConfig {
    /// Mercado Pago HMAC signing secret
    pub mercadopago_secret: SecretString,

    /// Hotmart verification token (hottok)
    pub hotmart_token: SecretString,
}

impl WebhookConfig {
    /// Validate webhook configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.mercadopago_secret.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("MERCADOPAGO_SECRET"));
        }
        if self.hotmart_token.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("HOTMART_TOKEN"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(mp: &str, hotmart: &str) -> WebhookConfig {
        WebhookConfig {
            mercadopago_secret: SecretString::new(mp.to_string()),
            hotmart_token: SecretString::new(hotmart.to_string()),
        }
    }

    #[test]
    fn validation_requires_both_secrets() {
        assert!(config("", "tok").validate().is_err());
        assert!(config("sec", "").validate().is_err());
        assert!(config("sec", "tok").validate().is_ok());
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let c = config("super-secret", "hottok-value");
        let debug = format!("{:?}", c);
        assert!(!debug.contains("super-secret"));
        assert!(!debug.contains("hottok-value"));
    }
}
