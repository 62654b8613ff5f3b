//! Webhook token verification.
//!
//! The gateway reports payment outcomes through a signed compact token:
//! `base64url(header) . base64url(payload) . base64url(signature)`, signed
//! with HMAC-SHA256 over the first two segments. The verification key and
//! the expected algorithm are configuration, not logic.

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::str::FromStr;

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD as BASE64};
use hmac::{Hmac, Mac};
use rust_decimal::Decimal;
use serde::Deserialize;
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// The only signature algorithm the verifier accepts.
pub const EXPECTED_ALGORITHM: &str = "HS256";

/// Errors from webhook token verification.
///
/// Signature, parse, and algorithm failures all collapse into [`Invalid`]:
/// callers probing the endpoint must not learn which check failed.
///
/// [`Invalid`]: WebhookError::Invalid
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WebhookError {
    #[error("webhook token is invalid")]
    Invalid,

    #[error("unexpected webhook type {0:?}")]
    UnexpectedType(String),
}

/// The webhook vocabulary the gateway uses. Only
/// [`AcquiringInternetPayment`] completes orders; the rest are explicitly
/// out of scope for the order workflow.
///
/// [`AcquiringInternetPayment`]: WebhookType::AcquiringInternetPayment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookType {
    AcquiringInternetPayment,
    IncomingSbpPayment,
    IncomingTransfer,
    OutgoingPayment,
}

impl WebhookType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AcquiringInternetPayment => "acquiringInternetPayment",
            Self::IncomingSbpPayment => "incomingSbpPayment",
            Self::IncomingTransfer => "incomingTransfer",
            Self::OutgoingPayment => "outgoingPayment",
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown webhook type")]
pub struct ParseWebhookTypeError;

impl FromStr for WebhookType {
    type Err = ParseWebhookTypeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "acquiringInternetPayment" => Ok(Self::AcquiringInternetPayment),
            "incomingSbpPayment" => Ok(Self::IncomingSbpPayment),
            "incomingTransfer" => Ok(Self::IncomingTransfer),
            "outgoingPayment" => Ok(Self::OutgoingPayment),
            _ => Err(ParseWebhookTypeError),
        }
    }
}

/// Decoded payment-outcome payload.
#[derive(Debug, Clone, PartialEq)]
pub struct WebhookPayload {
    pub operation_id: String,
    pub webhook_type: WebhookType,
    pub amount: Option<Decimal>,
    pub purpose: Option<String>,
    pub customer_code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenHeader {
    alg: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPayload {
    operation_id: String,
    webhook_type: String,
    #[serde(default)]
    amount: Option<Decimal>,
    #[serde(default)]
    purpose: Option<String>,
    #[serde(default)]
    customer_code: Option<String>,
}

/// Verifies and decodes webhook tokens with a configured HMAC key.
#[derive(Clone)]
pub struct WebhookVerifier {
    key: Vec<u8>,
}

impl Debug for WebhookVerifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str("WebhookVerifier(**redacted**)")
    }
}

impl WebhookVerifier {
    #[must_use]
    pub fn new(key: impl Into<Vec<u8>>) -> Self {
        Self { key: key.into() }
    }

    /// Authenticate and decode a raw webhook token.
    ///
    /// # Errors
    ///
    /// Returns [`WebhookError::Invalid`] for any malformed, unparseable, or
    /// badly signed token, and [`WebhookError::UnexpectedType`] for a
    /// well-signed token whose type is not the payment-completed variant.
    pub fn verify(&self, raw_token: &str) -> Result<WebhookPayload, WebhookError> {
        let segments: Vec<&str> = raw_token.trim().split('.').collect();

        let [header_b64, payload_b64, signature_b64] = segments.as_slice() else {
            return Err(WebhookError::Invalid);
        };

        let header_bytes = BASE64
            .decode(header_b64)
            .map_err(|_| WebhookError::Invalid)?;

        let header: TokenHeader =
            serde_json::from_slice(&header_bytes).map_err(|_| WebhookError::Invalid)?;

        if header.alg != EXPECTED_ALGORITHM {
            return Err(WebhookError::Invalid);
        }

        let signature = BASE64
            .decode(signature_b64)
            .map_err(|_| WebhookError::Invalid)?;

        let mut mac =
            HmacSha256::new_from_slice(&self.key).map_err(|_| WebhookError::Invalid)?;

        mac.update(header_b64.as_bytes());
        mac.update(b".");
        mac.update(payload_b64.as_bytes());

        // Constant-time comparison.
        mac.verify_slice(&signature)
            .map_err(|_| WebhookError::Invalid)?;

        let payload_bytes = BASE64
            .decode(payload_b64)
            .map_err(|_| WebhookError::Invalid)?;

        let payload: RawPayload =
            serde_json::from_slice(&payload_bytes).map_err(|_| WebhookError::Invalid)?;

        let webhook_type = WebhookType::from_str(&payload.webhook_type)
            .map_err(|_| WebhookError::UnexpectedType(payload.webhook_type.clone()))?;

        if webhook_type != WebhookType::AcquiringInternetPayment {
            return Err(WebhookError::UnexpectedType(payload.webhook_type));
        }

        Ok(WebhookPayload {
            operation_id: payload.operation_id,
            webhook_type,
            amount: payload.amount,
            purpose: payload.purpose,
            customer_code: payload.customer_code,
        })
    }
}

/// Build a signed token the way the gateway does. Test-only.
#[cfg(test)]
pub(crate) fn sign_token(
    key: &[u8],
    header: &serde_json::Value,
    payload: &serde_json::Value,
) -> String {
    let mut mac = HmacSha256::new_from_slice(key).expect("any key length works");

    let header_b64 = BASE64.encode(header.to_string());
    let payload_b64 = BASE64.encode(payload.to_string());

    mac.update(header_b64.as_bytes());
    mac.update(b".");
    mac.update(payload_b64.as_bytes());

    let signature_b64 = BASE64.encode(mac.finalize().into_bytes());

    format!("{header_b64}.{payload_b64}.{signature_b64}")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const KEY: &[u8] = b"webhook-test-key";

    fn sign(key: &[u8], header: &serde_json::Value, payload: &serde_json::Value) -> String {
        sign_token(key, header, payload)
    }

    fn payment_payload() -> serde_json::Value {
        json!({
            "operationId": "op-1",
            "webhookType": "acquiringInternetPayment",
            "amount": "3000.00",
            "purpose": "Payment for order",
        })
    }

    fn header() -> serde_json::Value {
        json!({ "alg": "HS256", "typ": "JWT" })
    }

    #[test]
    fn accepts_a_well_signed_payment_token() {
        let verifier = WebhookVerifier::new(KEY);
        let token = sign(KEY, &header(), &payment_payload());

        let payload = verifier.verify(&token).expect("token should verify");

        assert_eq!(payload.operation_id, "op-1");
        assert_eq!(payload.webhook_type, WebhookType::AcquiringInternetPayment);
        assert_eq!(payload.amount.map(|a| a.to_string()), Some("3000.00".to_string()));
    }

    #[test]
    fn rejects_a_tampered_payload() {
        let verifier = WebhookVerifier::new(KEY);
        let token = sign(KEY, &header(), &payment_payload());

        let mut tampered = payment_payload();
        tampered["operationId"] = json!("op-2");

        let forged_payload_b64 = BASE64.encode(tampered.to_string());

        let parts: Vec<&str> = token.split('.').collect();
        let forged = format!("{}.{forged_payload_b64}.{}", parts[0], parts[2]);

        assert_eq!(verifier.verify(&forged), Err(WebhookError::Invalid));
    }

    #[test]
    fn rejects_a_token_signed_with_another_key() {
        let verifier = WebhookVerifier::new(KEY);
        let token = sign(b"some-other-key", &header(), &payment_payload());

        assert_eq!(verifier.verify(&token), Err(WebhookError::Invalid));
    }

    #[test]
    fn rejects_an_unexpected_algorithm() {
        let verifier = WebhookVerifier::new(KEY);
        let token = sign(KEY, &json!({ "alg": "none" }), &payment_payload());

        assert_eq!(verifier.verify(&token), Err(WebhookError::Invalid));
    }

    #[test]
    fn rejects_garbage_tokens() {
        let verifier = WebhookVerifier::new(KEY);

        for raw in ["", "not-a-token", "a.b", "a.b.c.d", "!!.??.!!"] {
            assert_eq!(verifier.verify(raw), Err(WebhookError::Invalid), "{raw:?}");
        }
    }

    #[test]
    fn rejects_unparseable_payload_with_valid_signature() {
        let verifier = WebhookVerifier::new(KEY);
        let token = sign(KEY, &header(), &json!({ "unexpected": true }));

        assert_eq!(verifier.verify(&token), Err(WebhookError::Invalid));
    }

    #[test]
    fn rejects_foreign_webhook_types() {
        let verifier = WebhookVerifier::new(KEY);

        for webhook_type in ["incomingSbpPayment", "incomingTransfer", "outgoingPayment"] {
            let token = sign(
                KEY,
                &header(),
                &json!({ "operationId": "op-1", "webhookType": webhook_type }),
            );

            assert_eq!(
                verifier.verify(&token),
                Err(WebhookError::UnexpectedType(webhook_type.to_string())),
                "{webhook_type}"
            );
        }
    }

    #[test]
    fn rejects_unknown_webhook_types() {
        let verifier = WebhookVerifier::new(KEY);
        let token = sign(
            KEY,
            &header(),
            &json!({ "operationId": "op-1", "webhookType": "somethingNew" }),
        );

        assert_eq!(
            verifier.verify(&token),
            Err(WebhookError::UnexpectedType("somethingNew".to_string()))
        );
    }
}
