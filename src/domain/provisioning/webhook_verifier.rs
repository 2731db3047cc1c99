//! Webhook signature verification for payment providers.
//!
//! Every inbound payload is authenticated before it is parsed or trusted:
//!
//! - **Mercado Pago** sends an `x-signature` header of the form
//!   `ts=<unix>,v1=<hex hmac>`; the HMAC-SHA256 is computed over
//!   `"{ts}.{raw body}"` with a provider-issued secret. Timestamp
//!   validation bounds replay windows.
//! - **Hotmart** sends a static account token in `x-hotmart-hottok`,
//!   compared in constant time.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::errors::WebhookError;

/// Events older than this are rejected as replays (5 minutes).
const MAX_EVENT_AGE_SECS: i64 = 300;

/// Tolerated skew for timestamps ahead of our clock (1 minute).
const MAX_CLOCK_SKEW_SECS: i64 = 60;

/// Parsed components of the Mercado Pago `x-signature` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeader {
    /// Seconds since the epoch at signing time.
    pub timestamp: i64,
    /// Raw bytes of the v1 HMAC.
    pub v1_signature: Vec<u8>,
}

impl SignatureHeader {
    /// Parses a signature header string.
    ///
    /// Format: `ts=<timestamp>,v1=<hex signature>`. Unknown fields are
    /// ignored for forward compatibility.
    ///
    /// # Errors
    ///
    /// Returns `WebhookError::ParseError` if the header format is invalid.
    pub fn parse(header: &str) -> Result<Self, WebhookError> {
        let mut timestamp: Option<i64> = None;
        let mut v1_signature: Option<Vec<u8>> = None;

        for part in header.split(',') {
            let (key, value) = part
                .split_once('=')
                .ok_or_else(|| WebhookError::ParseError("invalid header format".to_string()))?;

            match key.trim() {
                "ts" => {
                    timestamp = Some(value.trim().parse().map_err(|_| {
                        WebhookError::ParseError("invalid timestamp".to_string())
                    })?);
                }
                "v1" => {
                    v1_signature = Some(hex::decode(value.trim()).map_err(|_| {
                        WebhookError::ParseError("invalid v1 signature hex".to_string())
                    })?);
                }
                _ => {}
            }
        }

        let timestamp =
            timestamp.ok_or_else(|| WebhookError::ParseError("missing timestamp".to_string()))?;
        let v1_signature = v1_signature
            .ok_or_else(|| WebhookError::ParseError("missing v1 signature".to_string()))?;

        Ok(SignatureHeader {
            timestamp,
            v1_signature,
        })
    }
}

/// Authenticates inbound webhook requests for both providers.
pub struct WebhookVerifier {
    mercadopago_secret: String,
    hotmart_token: String,
}

impl WebhookVerifier {
    /// Creates a verifier with the provider-issued secrets.
    pub fn new(mercadopago_secret: impl Into<String>, hotmart_token: impl Into<String>) -> Self {
        Self {
            mercadopago_secret: mercadopago_secret.into(),
            hotmart_token: hotmart_token.into(),
        }
    }

    /// Verifies a Mercado Pago webhook signature.
    ///
    /// The header's timestamp must fall inside the replay window, and
    /// the v1 value must equal the HMAC-SHA256 of `"{ts}.{body}"` under
    /// the configured secret. Comparison is constant-time.
    ///
    /// # Errors
    ///
    /// - `InvalidSignature` - signature mismatch
    /// - `TimestampOutOfRange` - event older than 5 minutes
    /// - `InvalidTimestamp` - event timestamp in the future
    /// - `ParseError` - malformed header
    pub fn verify_mercadopago(
        &self,
        payload: &[u8],
        signature_header: &str,
    ) -> Result<(), WebhookError> {
        let header = SignatureHeader::parse(signature_header)?;
        self.validate_timestamp(header.timestamp)?;

        let expected = self.compute_signature(header.timestamp, payload);
        if !constant_time_compare(&expected, &header.v1_signature) {
            return Err(WebhookError::InvalidSignature);
        }

        Ok(())
    }

    /// Verifies a Hotmart account token in constant time.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSignature` if the token does not match.
    pub fn verify_hotmart(&self, hottok: &str) -> Result<(), WebhookError> {
        if !constant_time_compare(self.hotmart_token.as_bytes(), hottok.as_bytes()) {
            return Err(WebhookError::InvalidSignature);
        }
        Ok(())
    }

    /// Bounds the event timestamp against the local clock.
    fn validate_timestamp(&self, timestamp: i64) -> Result<(), WebhookError> {
        let now = chrono::Utc::now().timestamp();
        let age = now - timestamp;

        if age > MAX_EVENT_AGE_SECS {
            return Err(WebhookError::TimestampOutOfRange);
        }
        if age < -MAX_CLOCK_SKEW_SECS {
            return Err(WebhookError::InvalidTimestamp);
        }

        Ok(())
    }

    /// HMAC-SHA256 over `"{ts}.{payload}"` with the Mercado Pago secret.
    fn compute_signature(&self, timestamp: i64, payload: &[u8]) -> Vec<u8> {
        let mut mac = Hmac::<Sha256>::new_from_slice(self.mercadopago_secret.as_bytes())
            .expect("HMAC accepts any key");
        mac.update(timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(payload);
        mac.finalize().into_bytes().to_vec()
    }
}

/// Constant-time equality for signatures and tokens.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

/// Computes a valid hex signature for use in test fixtures.
#[cfg(test)]
pub fn compute_test_signature(secret: &str, timestamp: i64, payload: &[u8]) -> String {
    let mut mac =
        Hmac::<Sha256>::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key");
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "mp_test_secret_12345";
    const TEST_HOTTOK: &str = "hottok_test_abcdef";

    fn verifier() -> WebhookVerifier {
        WebhookVerifier::new(TEST_SECRET, TEST_HOTTOK)
    }

    // ══════════════════════════════════════════════════════════════
    // SignatureHeader Parsing Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn parse_header_with_ts_and_v1() {
        let signature = "a".repeat(64);
        let header_str = format!("ts=1234567890,v1={}", signature);

        let header = SignatureHeader::parse(&header_str).unwrap();

        assert_eq!(header.timestamp, 1234567890);
        assert_eq!(header.v1_signature.len(), 32);
    }

    #[test]
    fn parse_header_ignores_unknown_fields() {
        let signature = "a".repeat(64);
        let header_str = format!("ts=1234567890,v1={},scheme=hmac", signature);

        let header = SignatureHeader::parse(&header_str).unwrap();

        assert_eq!(header.timestamp, 1234567890);
    }

    #[test]
    fn parse_header_missing_timestamp_fails() {
        let header_str = format!("v1={}", "a".repeat(64));
        assert!(matches!(
            SignatureHeader::parse(&header_str),
            Err(WebhookError::ParseError(_))
        ));
    }

    #[test]
    fn parse_header_missing_v1_fails() {
        assert!(matches!(
            SignatureHeader::parse("ts=1234567890"),
            Err(WebhookError::ParseError(_))
        ));
    }

    #[test]
    fn parse_header_invalid_hex_fails() {
        assert!(matches!(
            SignatureHeader::parse("ts=1234567890,v1=not_valid_hex"),
            Err(WebhookError::ParseError(_))
        ));
    }

    #[test]
    fn parse_header_no_equals_fails() {
        assert!(matches!(
            SignatureHeader::parse("ts1234567890"),
            Err(WebhookError::ParseError(_))
        ));
    }

    // ══════════════════════════════════════════════════════════════
    // Mercado Pago Signature Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn verify_valid_signature() {
        let payload = br#"{"action":"payment.updated"}"#;
        let timestamp = chrono::Utc::now().timestamp();
        let signature = compute_test_signature(TEST_SECRET, timestamp, payload);
        let header = format!("ts={},v1={}", timestamp, signature);

        assert!(verifier().verify_mercadopago(payload, &header).is_ok());
    }

    #[test]
    fn verify_wrong_secret_fails() {
        let payload = br#"{"action":"payment.updated"}"#;
        let timestamp = chrono::Utc::now().timestamp();
        let signature = compute_test_signature("wrong_secret", timestamp, payload);
        let header = format!("ts={},v1={}", timestamp, signature);

        assert!(matches!(
            verifier().verify_mercadopago(payload, &header),
            Err(WebhookError::InvalidSignature)
        ));
    }

    #[test]
    fn verify_tampered_payload_fails() {
        let original = br#"{"id":1}"#;
        let tampered = br#"{"id":2}"#;
        let timestamp = chrono::Utc::now().timestamp();
        let signature = compute_test_signature(TEST_SECRET, timestamp, original);
        let header = format!("ts={},v1={}", timestamp, signature);

        assert!(matches!(
            verifier().verify_mercadopago(tampered, &header),
            Err(WebhookError::InvalidSignature)
        ));
    }

    #[test]
    fn verify_timestamp_too_old_fails() {
        let payload = b"{}";
        let timestamp = chrono::Utc::now().timestamp() - 600;
        let signature = compute_test_signature(TEST_SECRET, timestamp, payload);
        let header = format!("ts={},v1={}", timestamp, signature);

        assert!(matches!(
            verifier().verify_mercadopago(payload, &header),
            Err(WebhookError::TimestampOutOfRange)
        ));
    }

    #[test]
    fn verify_timestamp_at_boundary_succeeds() {
        let payload = b"{}";
        let timestamp = chrono::Utc::now().timestamp() - MAX_EVENT_AGE_SECS;
        let signature = compute_test_signature(TEST_SECRET, timestamp, payload);
        let header = format!("ts={},v1={}", timestamp, signature);

        assert!(verifier().verify_mercadopago(payload, &header).is_ok());
    }

    #[test]
    fn verify_timestamp_from_future_beyond_skew_fails() {
        let payload = b"{}";
        let timestamp = chrono::Utc::now().timestamp() + 120;
        let signature = compute_test_signature(TEST_SECRET, timestamp, payload);
        let header = format!("ts={},v1={}", timestamp, signature);

        assert!(matches!(
            verifier().verify_mercadopago(payload, &header),
            Err(WebhookError::InvalidTimestamp)
        ));
    }

    #[test]
    fn verify_timestamp_within_skew_succeeds() {
        let payload = b"{}";
        let timestamp = chrono::Utc::now().timestamp() + 30;
        let signature = compute_test_signature(TEST_SECRET, timestamp, payload);
        let header = format!("ts={},v1={}", timestamp, signature);

        assert!(verifier().verify_mercadopago(payload, &header).is_ok());
    }

    // ══════════════════════════════════════════════════════════════
    // Hotmart Token Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn verify_correct_hottok_succeeds() {
        assert!(verifier().verify_hotmart(TEST_HOTTOK).is_ok());
    }

    #[test]
    fn verify_wrong_hottok_fails() {
        assert!(matches!(
            verifier().verify_hotmart("hottok_attacker"),
            Err(WebhookError::InvalidSignature)
        ));
    }

    #[test]
    fn verify_hottok_prefix_fails() {
        // Length mismatch must fail too, not just content mismatch.
        assert!(verifier().verify_hotmart(&TEST_HOTTOK[..5]).is_err());
    }

    // ══════════════════════════════════════════════════════════════
    // Constant Time Comparison Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn constant_time_compare_equal_values() {
        assert!(constant_time_compare(&[1, 2, 3], &[1, 2, 3]));
    }

    #[test]
    fn constant_time_compare_different_values() {
        assert!(!constant_time_compare(&[1, 2, 3], &[1, 2, 4]));
    }

    #[test]
    fn constant_time_compare_different_lengths() {
        assert!(!constant_time_compare(&[1, 2, 3], &[1, 2, 3, 4]));
    }
}
