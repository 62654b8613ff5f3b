//! Update Order Handler
//!
//! Manual management edits: status and tracking number. The webhook-driven
//! CREATED→APPROVED transition does not go through here.

use std::{str::FromStr, sync::Arc};

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::orders::models::{OrderStatus, OrderUpdate};

use crate::{
    extensions::*,
    orders::{errors::into_status_error, models::OrderResponse},
    state::State,
};

/// Update Order Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateOrderRequest {
    /// New order status
    pub status: Option<String>,

    /// Shipment tracking number
    pub tracking_number: Option<String>,
}

/// Update Order Handler
#[endpoint(
    tags("orders"),
    summary = "Update Order",
    responses(
        (status_code = StatusCode::OK, description = "Order updated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid update payload"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    uuid: PathParam<Uuid>,
    json: JsonBody<UpdateOrderRequest>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let request = json.into_inner();

    let status = request
        .status
        .as_deref()
        .map(OrderStatus::from_str)
        .transpose()
        .map_err(|_| StatusError::bad_request().brief("Unknown order status"))?;

    let update = OrderUpdate {
        status,
        tracking_number: request.tracking_number,
    };

    let order = state
        .app
        .orders
        .update_order(uuid.into_inner().into(), update)
        .await
        .map_err(into_status_error)?;

    Ok(Json(order.into()))
}
