//! Create Order Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::orders::models::{NewOrder, NewOrderPosition};

use crate::{extensions::*, orders::errors::into_status_error, state::State};

/// Create Order Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateOrderRequest {
    /// Customer contact email
    pub customer_email: String,

    /// Shipping address
    pub shipping_address: String,

    /// Requested order lines
    pub items: Vec<OrderPositionRequest>,
}

/// One requested order line
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderPositionRequest {
    /// Catalog product
    pub product_uuid: Uuid,

    /// Requested quantity, at least 1
    pub quantity: u32,
}

impl From<CreateOrderRequest> for NewOrder {
    fn from(request: CreateOrderRequest) -> Self {
        NewOrder {
            customer_email: request.customer_email,
            shipping_address: request.shipping_address,
            positions: request
                .items
                .into_iter()
                .map(|item| NewOrderPosition {
                    product_uuid: item.product_uuid.into(),
                    quantity: item.quantity,
                })
                .collect(),
        }
    }
}

/// Order Created Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderCreatedResponse {
    /// Created order UUID
    pub uuid: Uuid,

    /// Payment gateway operation id
    pub operation_id: String,

    /// Where to send the payer to complete the payment
    pub payment_link: String,

    /// Order status
    pub status: String,
}

/// Create Order Handler
#[endpoint(
    tags("orders"),
    summary = "Create Order",
    responses(
        (status_code = StatusCode::CREATED, description = "Order created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid order payload"),
        (status_code = StatusCode::BAD_GATEWAY, description = "Payment gateway unavailable"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateOrderRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<OrderCreatedResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let created = state
        .app
        .orders
        .create_order(json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/orders/{}", created.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(OrderCreatedResponse {
        uuid: created.uuid.into(),
        operation_id: created.operation_id,
        payment_link: created.payment_link,
        status: created.status.as_str().to_string(),
    }))
}
