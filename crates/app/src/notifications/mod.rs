//! Order notifications.

pub mod mailer;

use std::fmt::Write as _;

use async_trait::async_trait;
use mockall::automock;

pub use mailer::{MailerClient, MailerConfig, NotificationError};

use crate::domain::orders::models::Order;

/// Port through which the order workflow sends customer notifications.
///
/// Fire-and-forget from the caller's perspective: failures are reported but
/// must never affect the order state.
#[automock]
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// Send the order-confirmation message to `to`.
    async fn send_order_confirmation(
        &self,
        to: &str,
        order: &Order,
    ) -> Result<(), NotificationError>;
}

/// A rendered notification message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedNotification {
    pub subject: String,
    pub body: String,
}

/// Render the order-confirmation message with the order's line items.
#[must_use]
pub fn render_order_confirmation(order: &Order) -> RenderedNotification {
    let mut body = format!(
        "Your order {} is confirmed and paid.\n\nItems:\n",
        order.uuid
    );

    for item in &order.items {
        let _ = writeln!(
            body,
            "  {} x {} — {}",
            item.quantity.get(),
            item.name,
            item.unit_price.to_major(),
        );
    }

    let _ = write!(
        body,
        "\nTotal: {}\nShipping to: {}\n",
        order.total_price.to_major(),
        order.shipping_address
    );

    RenderedNotification {
        subject: format!("Order {} confirmed", order.uuid),
        body,
    }
}
