//! Acquiring Webhook Handler
//!
//! The gateway POSTs the entire signed token as the raw request body and
//! redelivers on any non-2xx response. Status codes therefore encode retry
//! semantics, not just outcome: logically-terminal results (processed,
//! duplicate, foreign event type) answer 200 so the gateway stops, while
//! transient ones (order not yet committed, storage failure) answer non-2xx
//! to trigger redelivery.

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use storefront_app::domain::orders::{OrdersServiceError, models::WebhookOutcome};

use crate::{extensions::*, state::State};

/// Webhook processing response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct WebhookResponse {
    /// Processing outcome
    pub status: String,
}

impl WebhookResponse {
    fn new(status: &str) -> Json<Self> {
        Json(Self {
            status: status.to_string(),
        })
    }
}

/// Acquiring Webhook Handler
#[handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
) -> Result<Json<WebhookResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let body = req.payload().await.or_500("failed to read webhook body")?;

    let token = std::str::from_utf8(body)
        .map_err(|_| StatusError::bad_request().brief("Webhook body must be UTF-8"))?;

    match state.app.orders.handle_webhook(token).await {
        Ok(WebhookOutcome::Approved) => Ok(WebhookResponse::new("processed")),
        Ok(WebhookOutcome::AlreadyProcessed) => Ok(WebhookResponse::new("already_processed")),
        Err(OrdersServiceError::UnexpectedWebhookType(webhook_type)) => {
            // Terminal: answering non-2xx would make the gateway redeliver
            // foreign event types forever.
            warn!(%webhook_type, "acknowledging webhook of unexpected type");

            Ok(WebhookResponse::new("ignored"))
        }
        Err(OrdersServiceError::InvalidWebhook) => {
            Err(StatusError::unauthorized().brief("Invalid webhook token"))
        }
        Err(OrdersServiceError::NotFound) => {
            // Possibly a webhook racing the local commit; the gateway will
            // redeliver.
            Err(StatusError::not_found().brief("Order not found"))
        }
        Err(other) => {
            error!("webhook processing failed: {other}");

            Err(StatusError::internal_server_error())
        }
    }
}
