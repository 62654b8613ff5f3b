//! Order Models

use std::str::FromStr;

use jiff::Timestamp;
use thiserror::Error;

use crate::{
    domain::{money::Price, products::models::ProductUuid},
    uuids::TypedUuid,
};

/// Order UUID
pub type OrderUuid = TypedUuid<Order>;

/// Order Model
///
/// The aggregate root of the order workflow. `total_price` is frozen at
/// creation time and never recomputed; `operation_id` is the acquiring
/// gateway's payment-intent identifier and the webhook correlation key.
#[derive(Debug, Clone)]
pub struct Order {
    pub uuid: OrderUuid,
    pub customer_email: String,
    pub shipping_address: String,
    pub operation_id: String,
    pub tracking_number: Option<String>,
    pub total_price: Price,
    pub status: OrderStatus,
    pub items: Vec<OrderItem>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Order line item.
///
/// Identity is (order, product). `name` and `unit_price` are copies captured
/// at order time so historical orders stay stable when the catalog changes.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderItem {
    pub order_uuid: OrderUuid,
    pub product_uuid: ProductUuid,
    pub name: String,
    pub quantity: Quantity,
    pub unit_price: Price,
}

/// Create-order input as received from the client.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub customer_email: String,
    pub shipping_address: String,
    pub positions: Vec<NewOrderPosition>,
}

/// One requested order line; the quantity is validated when the line is
/// constructed into a [`Quantity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewOrderPosition {
    pub product_uuid: ProductUuid,
    pub quantity: u32,
}

/// A fully priced order ready to persist, with the gateway operation id
/// already attached.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrderRecord {
    pub uuid: OrderUuid,
    pub customer_email: String,
    pub shipping_address: String,
    pub operation_id: String,
    pub total_price: Price,
    pub items: Vec<NewOrderItem>,
}

/// Line item of a [`NewOrderRecord`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrderItem {
    pub product_uuid: ProductUuid,
    pub name: String,
    pub quantity: Quantity,
    pub unit_price: Price,
}

/// Manual management edit of an order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OrderUpdate {
    pub status: Option<OrderStatus>,
    pub tracking_number: Option<String>,
}

/// What the caller gets back from order creation.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedOrder {
    pub uuid: OrderUuid,
    pub operation_id: String,
    pub payment_link: String,
    pub status: OrderStatus,
}

/// Result of processing a payment webhook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// The order transitioned to [`OrderStatus::Approved`].
    Approved,

    /// The order was already past CREATED; the delivery was a duplicate and
    /// nothing changed.
    AlreadyProcessed,
}

/// A line-item quantity. Always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quantity(u32);

#[derive(Debug, Error, PartialEq, Eq)]
#[error("quantity must be at least 1")]
pub struct InvalidQuantity;

impl Quantity {
    /// # Errors
    ///
    /// Returns [`InvalidQuantity`] for zero.
    pub const fn new(quantity: u32) -> Result<Self, InvalidQuantity> {
        if quantity == 0 {
            return Err(InvalidQuantity);
        }

        Ok(Self(quantity))
    }

    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

/// Order lifecycle status. Only CREATED→APPROVED is driven by the payment
/// webhook; the rest are administrative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Created,
    Approved,
    Processing,
    Shipped,
    Completed,
    Cancelled,
    Failed,
}

impl OrderStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Approved => "approved",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Failed => "failed",
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown order status")]
pub struct ParseOrderStatusError;

impl FromStr for OrderStatus {
    type Err = ParseOrderStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "created" => Ok(Self::Created),
            "approved" => Ok(Self::Approved),
            "processing" => Ok(Self::Processing),
            "shipped" => Ok(Self::Shipped),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            "failed" => Ok(Self::Failed),
            _ => Err(ParseOrderStatusError),
        }
    }
}
