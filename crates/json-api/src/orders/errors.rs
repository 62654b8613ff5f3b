//! Order Errors

use salvo::http::StatusError;
use tracing::error;

use storefront_app::domain::orders::OrdersServiceError;

pub(crate) fn into_status_error(error: OrdersServiceError) -> StatusError {
    match error {
        OrdersServiceError::EmptyOrder => {
            StatusError::bad_request().brief("Order must contain at least one position")
        }
        OrdersServiceError::DuplicatePosition(uuid) => StatusError::bad_request()
            .brief(format!("Product {uuid} appears in more than one position")),
        OrdersServiceError::ProductsNotFound(missing) => {
            let uuids: Vec<String> = missing.iter().map(ToString::to_string).collect();

            StatusError::bad_request().brief(format!("Products not found: {}", uuids.join(", ")))
        }
        OrdersServiceError::InvalidQuantity(_) => {
            StatusError::bad_request().brief("Quantity must be at least 1")
        }
        OrdersServiceError::Pricing(source) => {
            error!("order pricing failed: {source}");

            StatusError::internal_server_error()
        }
        OrdersServiceError::Catalog(source) => {
            error!("catalog lookup failed: {source}");

            StatusError::internal_server_error()
        }
        OrdersServiceError::Gateway(source) => {
            error!("payment gateway request failed: {source}");

            StatusError::bad_gateway().brief("Payment gateway unavailable")
        }
        OrdersServiceError::InvalidWebhook => {
            StatusError::unauthorized().brief("Invalid webhook token")
        }
        OrdersServiceError::UnexpectedWebhookType(webhook_type) => {
            StatusError::bad_request().brief(format!("Unexpected webhook type {webhook_type}"))
        }
        OrdersServiceError::NotFound => StatusError::not_found(),
        OrdersServiceError::AlreadyExists => {
            StatusError::conflict().brief("Order already exists")
        }
        OrdersServiceError::Sql(source) => {
            error!("order storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
