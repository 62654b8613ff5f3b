//! Orders service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::{
    acquiring::{client::AcquiringError, webhook::WebhookError},
    domain::{
        orders::{models::InvalidQuantity, pricing::PricingError},
        products::{ProductsServiceError, models::ProductUuid},
    },
};

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("order must contain at least one position")]
    EmptyOrder,

    #[error("product {0} appears in more than one order position")]
    DuplicatePosition(ProductUuid),

    #[error("products not found: {0:?}")]
    ProductsNotFound(Vec<ProductUuid>),

    #[error(transparent)]
    InvalidQuantity(#[from] InvalidQuantity),

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error("catalog lookup failed")]
    Catalog(#[source] ProductsServiceError),

    #[error("payment gateway request failed")]
    Gateway(#[source] AcquiringError),

    #[error("webhook token is invalid")]
    InvalidWebhook,

    #[error("unexpected webhook type {0:?}")]
    UnexpectedWebhookType(String),

    #[error("order not found")]
    NotFound,

    #[error("order already exists")]
    AlreadyExists,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for OrdersServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}

impl From<ProductsServiceError> for OrdersServiceError {
    fn from(error: ProductsServiceError) -> Self {
        Self::Catalog(error)
    }
}

impl From<AcquiringError> for OrdersServiceError {
    fn from(error: AcquiringError) -> Self {
        Self::Gateway(error)
    }
}

impl From<WebhookError> for OrdersServiceError {
    fn from(error: WebhookError) -> Self {
        match error {
            WebhookError::Invalid => Self::InvalidWebhook,
            WebhookError::UnexpectedType(webhook_type) => {
                Self::UnexpectedWebhookType(webhook_type)
            }
        }
    }
}
