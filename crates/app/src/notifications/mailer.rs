//! HTTP client for the transactional-mail service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;

use crate::{
    domain::orders::models::Order,
    notifications::{NotificationSender, render_order_confirmation},
};

/// Configuration for connecting to the mail-delivery service.
#[derive(Debug, Clone)]
pub struct MailerConfig {
    /// Mailer service address, e.g. `"https://mailer.example.com"`.
    pub addr: String,

    /// Bearer token for the mailer API.
    pub token: String,

    /// Sender address placed on outgoing messages.
    pub sender: String,

    /// Per-request timeout for mailer calls.
    pub timeout: Duration,
}

/// Errors that can occur when dispatching a notification.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// An HTTP transport or serialization error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The mailer returned a non-2xx response.
    #[error("unexpected response from mailer: {0}")]
    UnexpectedResponse(String),
}

/// HTTP client for the transactional-mail service.
#[derive(Debug, Clone)]
pub struct MailerClient {
    config: MailerConfig,
    http: Client,
}

impl MailerClient {
    /// Create a new client from the given configuration.
    #[must_use]
    pub fn new(config: MailerConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }
}

#[derive(Debug, Serialize)]
struct SendMessageBody<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

#[async_trait]
impl NotificationSender for MailerClient {
    async fn send_order_confirmation(
        &self,
        to: &str,
        order: &Order,
    ) -> Result<(), NotificationError> {
        let rendered = render_order_confirmation(order);

        let url = format!("{}/v1/send", self.config.addr);

        let body = SendMessageBody {
            from: &self.config.sender,
            to,
            subject: &rendered.subject,
            text: &rendered.body,
        };

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

            return Err(NotificationError::UnexpectedResponse(format!(
                "send request failed with status {status}: {text}"
            )));
        }

        Ok(())
    }
}
