//! Order response models.

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::orders::models::{Order, OrderItem};

/// Order line item
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderItemResponse {
    /// The product this line refers to
    pub product_uuid: Uuid,

    /// Product name captured at order time
    pub name: String,

    /// Ordered quantity
    pub quantity: u32,

    /// Unit price in minor currency units, captured at order time
    pub unit_price: u64,
}

impl From<OrderItem> for OrderItemResponse {
    fn from(item: OrderItem) -> Self {
        OrderItemResponse {
            product_uuid: item.product_uuid.into(),
            name: item.name,
            quantity: item.quantity.get(),
            unit_price: item.unit_price.minor_units(),
        }
    }
}

/// Order
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderResponse {
    /// The unique identifier of the order
    pub uuid: Uuid,

    /// Customer contact email
    pub customer_email: String,

    /// Shipping address
    pub shipping_address: String,

    /// Payment gateway operation id
    pub operation_id: String,

    /// Shipment tracking number, if assigned
    pub tracking_number: Option<String>,

    /// Total price in minor currency units, frozen at creation
    pub total_price: u64,

    /// Order status
    pub status: String,

    /// Order line items
    pub items: Vec<OrderItemResponse>,

    /// The date and time the order was created
    pub created_at: String,

    /// The date and time the order was last updated
    pub updated_at: String,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        OrderResponse {
            uuid: order.uuid.into(),
            customer_email: order.customer_email,
            shipping_address: order.shipping_address,
            operation_id: order.operation_id,
            tracking_number: order.tracking_number,
            total_price: order.total_price.minor_units(),
            status: order.status.as_str().to_string(),
            items: order.items.into_iter().map(Into::into).collect(),
            created_at: order.created_at.to_string(),
            updated_at: order.updated_at.to_string(),
        }
    }
}
