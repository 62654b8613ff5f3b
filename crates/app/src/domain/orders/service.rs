//! Orders service: the order/payment workflow.
//!
//! `create_order` prices the requested lines against the catalog, creates a
//! payment intent at the acquiring gateway, and persists the order with the
//! captured prices. The gateway call happens before the database write so
//! no transaction spans the network. `handle_webhook` performs the
//! idempotent CREATED→APPROVED transition driven by the gateway's signed
//! callback.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{error, warn};

use crate::{
    acquiring::{
        client::{PaymentGateway, PaymentMode, PaymentRequest, ReceiptItem},
        webhook::{WebhookError, WebhookVerifier},
    },
    domain::{
        orders::{
            errors::OrdersServiceError,
            models::{
                CreatedOrder, NewOrder, NewOrderItem, NewOrderRecord, Order, OrderStatus,
                OrderUpdate, OrderUuid, Quantity, WebhookOutcome,
            },
            pricing::price_order,
            repository::OrdersRepository,
        },
        products::{
            ProductsService,
            models::{Product, ProductUuid},
        },
    },
    notifications::NotificationSender,
};

/// Payment modes offered on every created payment.
const PAYMENT_MODES: [PaymentMode; 2] = [PaymentMode::Card, PaymentMode::Sbp];

/// Order workflow service backed by the acquiring gateway.
pub struct AcquiringOrdersService {
    repository: Arc<dyn OrdersRepository>,
    catalog: Arc<dyn ProductsService>,
    gateway: Arc<dyn PaymentGateway>,
    verifier: WebhookVerifier,
    notifications: Arc<dyn NotificationSender>,
}

impl std::fmt::Debug for AcquiringOrdersService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AcquiringOrdersService").finish_non_exhaustive()
    }
}

impl AcquiringOrdersService {
    #[must_use]
    pub fn new(
        repository: Arc<dyn OrdersRepository>,
        catalog: Arc<dyn ProductsService>,
        gateway: Arc<dyn PaymentGateway>,
        verifier: WebhookVerifier,
        notifications: Arc<dyn NotificationSender>,
    ) -> Self {
        Self {
            repository,
            catalog,
            gateway,
            verifier,
            notifications,
        }
    }

    /// Validate positions and resolve them against the catalog, keeping the
    /// requested order.
    async fn resolve_lines(
        &self,
        order: &NewOrder,
    ) -> Result<Vec<(Product, Quantity)>, OrdersServiceError> {
        if order.positions.is_empty() {
            return Err(OrdersServiceError::EmptyOrder);
        }

        let mut seen = FxHashSet::default();

        for position in &order.positions {
            if !seen.insert(position.product_uuid) {
                return Err(OrdersServiceError::DuplicatePosition(position.product_uuid));
            }
        }

        let mut quantities = Vec::with_capacity(order.positions.len());

        for position in &order.positions {
            quantities.push(Quantity::new(position.quantity)?);
        }

        let uuids: Vec<ProductUuid> = order
            .positions
            .iter()
            .map(|position| position.product_uuid)
            .collect();

        let lookup = self.catalog.get_many(&uuids).await?;

        if !lookup.missing.is_empty() {
            return Err(OrdersServiceError::ProductsNotFound(lookup.missing));
        }

        let mut by_uuid: FxHashMap<ProductUuid, Product> = lookup
            .found
            .into_iter()
            .map(|product| (product.uuid, product))
            .collect();

        let mut lines = Vec::with_capacity(order.positions.len());

        for (position, quantity) in order.positions.iter().zip(quantities) {
            let Some(product) = by_uuid.remove(&position.product_uuid) else {
                return Err(OrdersServiceError::ProductsNotFound(vec![
                    position.product_uuid,
                ]));
            };

            lines.push((product, quantity));
        }

        Ok(lines)
    }
}

#[async_trait]
impl OrdersService for AcquiringOrdersService {
    async fn create_order(&self, order: NewOrder) -> Result<CreatedOrder, OrdersServiceError> {
        let lines = self.resolve_lines(&order).await?;

        // Prices are captured here, once. They flow unchanged into the
        // gateway receipt and into persistence, so a catalog edit between
        // pricing and commit cannot skew the stored order.
        let priced = price_order(lines)?;

        let order_uuid = OrderUuid::new();

        let request = PaymentRequest {
            customer_email: order.customer_email.clone(),
            purpose: format!("Payment for order {order_uuid}"),
            total: priced.total,
            items: priced
                .lines
                .iter()
                .map(|line| ReceiptItem {
                    name: line.product.name.clone(),
                    unit_price: line.product.price,
                    quantity: line.quantity,
                    measure: line.product.unit,
                    payment_method: None,
                    vat_type: None,
                })
                .collect(),
            payment_modes: PAYMENT_MODES.to_vec(),
            save_card: false,
            consumer_id: None,
        };

        let payment = self.gateway.create_payment_with_receipt(request).await?;

        let record = NewOrderRecord {
            uuid: order_uuid,
            customer_email: order.customer_email,
            shipping_address: order.shipping_address,
            operation_id: payment.operation_id.clone(),
            total_price: priced.total,
            items: priced
                .lines
                .into_iter()
                .map(|line| NewOrderItem {
                    product_uuid: line.product.uuid,
                    name: line.product.name,
                    quantity: line.quantity,
                    unit_price: line.product.price,
                })
                .collect(),
        };

        // If this write fails after the gateway call succeeded, an orphaned
        // payment intent remains at the gateway with no local order. Known
        // gap, reconciled out of band; reordering the two steps would merely
        // move the orphan to the other side.
        let created = self.repository.create_order(&record).await?;

        Ok(CreatedOrder {
            uuid: created.uuid,
            operation_id: payment.operation_id,
            payment_link: payment.payment_link,
            status: created.status,
        })
    }

    async fn handle_webhook(
        &self,
        raw_token: &str,
    ) -> Result<WebhookOutcome, OrdersServiceError> {
        let payload = match self.verifier.verify(raw_token) {
            Ok(payload) => payload,
            Err(WebhookError::UnexpectedType(webhook_type)) => {
                warn!(%webhook_type, "ignoring webhook of unexpected type");

                return Err(OrdersServiceError::UnexpectedWebhookType(webhook_type));
            }
            Err(WebhookError::Invalid) => return Err(OrdersServiceError::InvalidWebhook),
        };

        let Some(order) = self
            .repository
            .get_by_operation_id(&payload.operation_id)
            .await?
        else {
            warn!(operation_id = %payload.operation_id, "webhook for unknown operation id");

            return Err(OrdersServiceError::NotFound);
        };

        // Webhooks may be delivered more than once; anything past CREATED
        // has already been processed.
        if order.status != OrderStatus::Created {
            return Ok(WebhookOutcome::AlreadyProcessed);
        }

        // Compare-and-swap in the database: concurrent duplicate deliveries
        // race here and exactly one wins.
        if !self.repository.approve_order(order.uuid).await? {
            return Ok(WebhookOutcome::AlreadyProcessed);
        }

        let order = Order {
            status: OrderStatus::Approved,
            ..order
        };

        // The order is already paid; a failed courtesy email must not roll
        // anything back.
        if let Err(send_error) = self
            .notifications
            .send_order_confirmation(&order.customer_email, &order)
            .await
        {
            error!(
                order = %order.uuid,
                to = %order.customer_email,
                "failed to send order confirmation: {send_error}"
            );
        }

        Ok(WebhookOutcome::Approved)
    }

    async fn get_order(&self, order: OrderUuid) -> Result<Order, OrdersServiceError> {
        let found = self.repository.get_order(order).await?;

        Ok(found)
    }

    async fn list_orders(&self) -> Result<Vec<Order>, OrdersServiceError> {
        let orders = self.repository.list_orders().await?;

        Ok(orders)
    }

    async fn update_order(
        &self,
        order: OrderUuid,
        update: OrderUpdate,
    ) -> Result<Order, OrdersServiceError> {
        let updated = self.repository.update_order(order, &update).await?;

        Ok(updated)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Create an order: validate positions, price them, obtain a payment
    /// intent, and persist the order with the captured prices.
    async fn create_order(&self, order: NewOrder) -> Result<CreatedOrder, OrdersServiceError>;

    /// Process a payment webhook: verify the token and perform the
    /// idempotent CREATED→APPROVED transition.
    async fn handle_webhook(&self, raw_token: &str)
    -> Result<WebhookOutcome, OrdersServiceError>;

    /// Retrieve a single order with its items.
    async fn get_order(&self, order: OrderUuid) -> Result<Order, OrdersServiceError>;

    /// List orders, newest first.
    async fn list_orders(&self) -> Result<Vec<Order>, OrdersServiceError>;

    /// Apply a manual status or tracking edit.
    async fn update_order(
        &self,
        order: OrderUuid,
        update: OrderUpdate,
    ) -> Result<Order, OrdersServiceError>;
}
