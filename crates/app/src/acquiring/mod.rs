//! Acquiring gateway integration: payment-intent creation and the signed
//! webhook callback that reports payment outcomes.

pub mod client;
pub mod webhook;

pub use client::{
    AcquiringClient, AcquiringConfig, AcquiringError, CreatedPayment, MockPaymentGateway,
    PaymentGateway, PaymentMode, PaymentRequest, ReceiptItem,
};
pub use webhook::{WebhookError, WebhookPayload, WebhookType, WebhookVerifier};
