//! HTTP client for the payment-acquiring gateway.

use std::time::Duration;

use async_trait::async_trait;
use mockall::automock;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{
    money::Price,
    orders::models::Quantity,
    products::models::UnitOfMeasure,
};

/// Configuration for connecting to the acquiring gateway.
#[derive(Debug, Clone)]
pub struct AcquiringConfig {
    /// Gateway base address, e.g. `"https://acquiring.example.com/uapi"`.
    pub addr: String,

    /// Bearer token for the gateway API.
    pub token: String,

    /// Merchant customer code the gateway issued.
    pub customer_code: String,

    /// Where the payer lands after a successful payment.
    pub redirect_url: String,

    /// Where the payer lands after a failed payment.
    pub fail_redirect_url: String,

    /// Per-request timeout for gateway calls.
    pub timeout: Duration,
}

/// Payment mode offered to the payer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMode {
    Card,
    Sbp,
}

impl PaymentMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Card => "card",
            Self::Sbp => "sbp",
        }
    }
}

/// One receipt line sent to the gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptItem {
    pub name: String,
    pub unit_price: Price,
    pub quantity: Quantity,
    pub measure: UnitOfMeasure,
    pub payment_method: Option<String>,
    pub vat_type: Option<String>,
}

/// A payment-intent creation request.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentRequest {
    pub customer_email: String,
    pub purpose: String,
    pub total: Price,
    pub items: Vec<ReceiptItem>,
    pub payment_modes: Vec<PaymentMode>,
    pub save_card: bool,
    pub consumer_id: Option<String>,
}

/// What the gateway returns for a created payment intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedPayment {
    /// The gateway's unique payment-intent identifier; stored on the order
    /// and matched against webhook payloads.
    pub operation_id: String,

    /// Where to send the payer to complete the payment.
    pub payment_link: String,
}

/// Errors that can occur when talking to the acquiring gateway.
#[derive(Debug, Error)]
pub enum AcquiringError {
    /// An HTTP transport or serialization error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The gateway returned a non-2xx response or an unexpected body.
    #[error("unexpected response from acquiring gateway: {0}")]
    UnexpectedResponse(String),

    /// The receipt had no items.
    #[error("receipt items must not be empty")]
    EmptyReceipt,
}

/// Port through which the order workflow creates payment intents.
#[automock]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a payment intent with an attached fiscal receipt.
    ///
    /// One outbound network call; not retried here. Any non-success response
    /// is fatal to the caller's use case.
    async fn create_payment_with_receipt(
        &self,
        request: PaymentRequest,
    ) -> Result<CreatedPayment, AcquiringError>;
}

/// HTTP client for the acquiring gateway.
#[derive(Debug, Clone)]
pub struct AcquiringClient {
    config: AcquiringConfig,
    http: Client,
}

impl AcquiringClient {
    /// Create a new client from the given configuration.
    #[must_use]
    pub fn new(config: AcquiringConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }
}

#[async_trait]
impl PaymentGateway for AcquiringClient {
    async fn create_payment_with_receipt(
        &self,
        request: PaymentRequest,
    ) -> Result<CreatedPayment, AcquiringError> {
        if request.items.is_empty() {
            return Err(AcquiringError::EmptyReceipt);
        }

        let url = format!("{}/acquiring/v1.0/payments_with_receipt", self.config.addr);

        let body = serde_json::json!({ "Data": PaymentData::new(&self.config, &request) });

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.token)
            .timeout(self.config.timeout)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(AcquiringError::UnexpectedResponse(format!(
                "payment creation failed with status {status}: {text}"
            )));
        }

        let parsed: PaymentResponse = response.json().await?;

        Ok(CreatedPayment {
            operation_id: parsed.data.operation_id,
            payment_link: parsed.data.payment_link,
        })
    }
}

/// Wire shape of the payment-creation request body under `Data`.
///
/// Amounts are major units at exact scale 2, derived from the same
/// minor-unit conversion the rest of the system uses, so the charged amount
/// can never drift from the recorded one.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PaymentData<'a> {
    customer_code: &'a str,
    customer_email: &'a str,
    amount: Decimal,
    purpose: &'a str,
    redirect_url: &'a str,
    fail_redirect_url: &'a str,
    payment_mode: Vec<&'static str>,
    save_card: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    consumer_id: Option<&'a str>,
    #[serde(rename = "Items")]
    items: Vec<ItemData<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ItemData<'a> {
    name: &'a str,
    amount: Decimal,
    quantity: u32,
    measure: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    payment_method: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    vat_type: Option<&'a str>,
}

impl<'a> PaymentData<'a> {
    fn new(config: &'a AcquiringConfig, request: &'a PaymentRequest) -> Self {
        Self {
            customer_code: &config.customer_code,
            customer_email: &request.customer_email,
            amount: request.total.to_major(),
            purpose: &request.purpose,
            redirect_url: &config.redirect_url,
            fail_redirect_url: &config.fail_redirect_url,
            payment_mode: request
                .payment_modes
                .iter()
                .map(|mode| mode.as_str())
                .collect(),
            save_card: request.save_card,
            consumer_id: request.consumer_id.as_deref(),
            items: request
                .items
                .iter()
                .map(|item| ItemData {
                    name: &item.name,
                    amount: item.unit_price.to_major(),
                    quantity: item.quantity.get(),
                    measure: item.measure.measure_code(),
                    payment_method: item.payment_method.as_deref(),
                    vat_type: item.vat_type.as_deref(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PaymentResponse {
    #[serde(rename = "Data")]
    data: PaymentResponseData,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaymentResponseData {
    operation_id: String,
    payment_link: String,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn config() -> AcquiringConfig {
        AcquiringConfig {
            addr: "https://acquiring.example.com/uapi".to_string(),
            token: "secret".to_string(),
            customer_code: "300000092".to_string(),
            redirect_url: "https://shop.example.com/paid".to_string(),
            fail_redirect_url: "https://shop.example.com/failed".to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    fn request() -> PaymentRequest {
        PaymentRequest {
            customer_email: "buyer@example.com".to_string(),
            purpose: "Payment for order".to_string(),
            total: Price::from_minor(300_000).expect("valid price"),
            items: vec![ReceiptItem {
                name: "Rose bouquet".to_string(),
                unit_price: Price::from_minor(150_000).expect("valid price"),
                quantity: Quantity::new(2).expect("valid quantity"),
                measure: UnitOfMeasure::Piece,
                payment_method: Some("full_payment".to_string()),
                vat_type: None,
            }],
            payment_modes: vec![PaymentMode::Card, PaymentMode::Sbp],
            save_card: false,
            consumer_id: None,
        }
    }

    #[test]
    fn request_serializes_major_unit_amounts() {
        let config = config();
        let request = request();

        let data = serde_json::to_value(PaymentData::new(&config, &request))
            .expect("serialization should succeed");

        assert_eq!(
            data,
            json!({
                "customerCode": "300000092",
                "customerEmail": "buyer@example.com",
                "amount": "3000.00",
                "purpose": "Payment for order",
                "redirectUrl": "https://shop.example.com/paid",
                "failRedirectUrl": "https://shop.example.com/failed",
                "paymentMode": ["card", "sbp"],
                "saveCard": false,
                "Items": [{
                    "name": "Rose bouquet",
                    "amount": "1500.00",
                    "quantity": 2,
                    "measure": "pcs",
                    "paymentMethod": "full_payment",
                }],
            })
        );
    }

    #[test]
    fn response_parses_operation_id_and_link() {
        let body = json!({
            "Data": {
                "operationId": "op-1",
                "paymentLink": "https://pay/op-1",
            }
        });

        let parsed: PaymentResponse =
            serde_json::from_value(body).expect("response should parse");

        assert_eq!(parsed.data.operation_id, "op-1");
        assert_eq!(parsed.data.payment_link, "https://pay/op-1");
    }

    #[tokio::test]
    async fn empty_receipt_is_rejected_before_any_network_call() {
        let client = AcquiringClient::new(config());

        let mut request = request();
        request.items.clear();

        let result = client.create_payment_with_receipt(request).await;

        assert!(
            matches!(result, Err(AcquiringError::EmptyReceipt)),
            "expected EmptyReceipt, got {result:?}"
        );
    }
}
