//! Orders Repository

use std::str::FromStr;

use async_trait::async_trait;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use mockall::automock;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::{
    database::Db,
    domain::{
        orders::models::{
            NewOrderRecord, Order, OrderItem, OrderStatus, OrderUpdate, OrderUuid, Quantity,
        },
        products::{
            models::ProductUuid,
            repository::{bind_amount, try_get_price},
        },
    },
};

const CREATE_ORDER_SQL: &str = include_str!("sql/create_order.sql");
const CREATE_ORDER_ITEM_SQL: &str = include_str!("sql/create_order_item.sql");
const GET_ORDER_SQL: &str = include_str!("sql/get_order.sql");
const GET_ORDER_BY_OPERATION_ID_SQL: &str = include_str!("sql/get_order_by_operation_id.sql");
const GET_ORDER_ITEMS_SQL: &str = include_str!("sql/get_order_items.sql");
const APPROVE_ORDER_SQL: &str = include_str!("sql/approve_order.sql");
const UPDATE_ORDER_SQL: &str = include_str!("sql/update_order.sql");
const LIST_ORDERS_SQL: &str = include_str!("sql/list_orders.sql");

/// Persistence port for the order aggregate.
///
/// Implementations own their transaction boundaries: `create_order` writes
/// the order and all its items atomically, and `approve_order` is a
/// compare-and-swap on the CREATED status.
#[automock]
#[async_trait]
pub trait OrdersRepository: Send + Sync {
    /// Persist an order together with its items in a single transaction.
    async fn create_order(&self, order: &NewOrderRecord) -> Result<Order, sqlx::Error>;

    /// Load an order and its items.
    async fn get_order(&self, order: OrderUuid) -> Result<Order, sqlx::Error>;

    /// Look an order up by the gateway operation id.
    async fn get_by_operation_id(&self, operation_id: &str)
    -> Result<Option<Order>, sqlx::Error>;

    /// Atomically transition CREATED→APPROVED. Returns `false` when the
    /// order was no longer in CREATED, i.e. a concurrent delivery won.
    async fn approve_order(&self, order: OrderUuid) -> Result<bool, sqlx::Error>;

    /// Apply a manual management edit.
    async fn update_order(
        &self,
        order: OrderUuid,
        update: &OrderUpdate,
    ) -> Result<Order, sqlx::Error>;

    /// List orders, newest first, without items.
    async fn list_orders(&self) -> Result<Vec<Order>, sqlx::Error>;
}

#[derive(Debug, Clone)]
pub struct PgOrdersRepository {
    db: Db,
}

impl PgOrdersRepository {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    async fn load_items(
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<Vec<OrderItem>, sqlx::Error> {
        query_as::<Postgres, OrderItem>(GET_ORDER_ITEMS_SQL)
            .bind(order.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }
}

#[async_trait]
impl OrdersRepository for PgOrdersRepository {
    async fn create_order(&self, order: &NewOrderRecord) -> Result<Order, sqlx::Error> {
        let mut tx = self.db.begin().await?;

        let mut created = query_as::<Postgres, Order>(CREATE_ORDER_SQL)
            .bind(order.uuid.into_uuid())
            .bind(&order.customer_email)
            .bind(&order.shipping_address)
            .bind(&order.operation_id)
            .bind(bind_amount(order.total_price)?)
            .fetch_one(&mut *tx)
            .await?;

        for item in &order.items {
            query(CREATE_ORDER_ITEM_SQL)
                .bind(order.uuid.into_uuid())
                .bind(item.product_uuid.into_uuid())
                .bind(&item.name)
                .bind(i64::from(item.quantity.get()))
                .bind(bind_amount(item.unit_price)?)
                .execute(&mut *tx)
                .await?;

            created.items.push(OrderItem {
                order_uuid: order.uuid,
                product_uuid: item.product_uuid,
                name: item.name.clone(),
                quantity: item.quantity,
                unit_price: item.unit_price,
            });
        }

        tx.commit().await?;

        Ok(created)
    }

    async fn get_order(&self, order: OrderUuid) -> Result<Order, sqlx::Error> {
        let mut tx = self.db.begin().await?;

        let mut found = query_as::<Postgres, Order>(GET_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut *tx)
            .await?;

        found.items = Self::load_items(&mut tx, order).await?;

        tx.commit().await?;

        Ok(found)
    }

    async fn get_by_operation_id(
        &self,
        operation_id: &str,
    ) -> Result<Option<Order>, sqlx::Error> {
        let mut tx = self.db.begin().await?;

        let found = query_as::<Postgres, Order>(GET_ORDER_BY_OPERATION_ID_SQL)
            .bind(operation_id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(mut order) = found else {
            tx.commit().await?;

            return Ok(None);
        };

        order.items = Self::load_items(&mut tx, order.uuid).await?;

        tx.commit().await?;

        Ok(Some(order))
    }

    async fn approve_order(&self, order: OrderUuid) -> Result<bool, sqlx::Error> {
        let mut tx = self.db.begin().await?;

        let rows_affected = query(APPROVE_ORDER_SQL)
            .bind(order.into_uuid())
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;

        Ok(rows_affected > 0)
    }

    async fn update_order(
        &self,
        order: OrderUuid,
        update: &OrderUpdate,
    ) -> Result<Order, sqlx::Error> {
        let mut tx = self.db.begin().await?;

        let mut updated = query_as::<Postgres, Order>(UPDATE_ORDER_SQL)
            .bind(order.into_uuid())
            .bind(update.status.map(OrderStatus::as_str))
            .bind(update.tracking_number.as_deref())
            .fetch_one(&mut *tx)
            .await?;

        updated.items = Self::load_items(&mut tx, order).await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn list_orders(&self) -> Result<Vec<Order>, sqlx::Error> {
        let mut tx = self.db.begin().await?;

        let orders = query_as::<Postgres, Order>(LIST_ORDERS_SQL)
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(orders)
    }
}

impl<'r> FromRow<'r, PgRow> for Order {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let status_str: String = row.try_get("status")?;

        let status = OrderStatus::from_str(&status_str).map_err(|e| sqlx::Error::ColumnDecode {
            index: "status".to_string(),
            source: Box::new(e),
        })?;

        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            customer_email: row.try_get("customer_email")?,
            shipping_address: row.try_get("shipping_address")?,
            operation_id: row.try_get("operation_id")?,
            tracking_number: row.try_get("tracking_number")?,
            total_price: try_get_price(row, "total_price")?,
            status,
            items: Vec::new(),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for OrderItem {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let quantity_i64: i64 = row.try_get("quantity")?;

        let quantity = u32::try_from(quantity_i64)
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "quantity".to_string(),
                source: Box::new(e),
            })
            .and_then(|q| {
                Quantity::new(q).map_err(|e| sqlx::Error::ColumnDecode {
                    index: "quantity".to_string(),
                    source: Box::new(e),
                })
            })?;

        Ok(Self {
            order_uuid: OrderUuid::from_uuid(row.try_get("order_uuid")?),
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            name: row.try_get("name")?,
            quantity,
            unit_price: try_get_price(row, "unit_price")?,
        })
    }
}
