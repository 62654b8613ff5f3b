//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{affix_state::inject, prelude::*};

use storefront_app::{
    context::AppContext,
    domain::{
        money::Price,
        orders::{
            MockOrdersService,
            models::{Order, OrderItem, OrderStatus, OrderUuid, Quantity},
        },
        products::{
            MockProductsService,
            models::{Product, ProductUuid, UnitOfMeasure},
        },
    },
};

use crate::state::State;

fn strict_orders_mock() -> MockOrdersService {
    let mut orders = MockOrdersService::new();

    orders.expect_create_order().never();
    orders.expect_handle_webhook().never();
    orders.expect_get_order().never();
    orders.expect_list_orders().never();
    orders.expect_update_order().never();

    orders
}

fn strict_products_mock() -> MockProductsService {
    let mut products = MockProductsService::new();

    products.expect_list_products().never();
    products.expect_get_product().never();
    products.expect_get_many().never();
    products.expect_create_product().never();
    products.expect_update_product().never();
    products.expect_delete_product().never();

    products
}

pub(crate) fn state_with_orders(orders: MockOrdersService) -> Arc<State> {
    Arc::new(State::new(AppContext {
        products: Arc::new(strict_products_mock()),
        orders: Arc::new(orders),
    }))
}

pub(crate) fn state_with_products(products: MockProductsService) -> Arc<State> {
    Arc::new(State::new(AppContext {
        products: Arc::new(products),
        orders: Arc::new(strict_orders_mock()),
    }))
}

pub(crate) fn orders_service(orders: MockOrdersService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_with_orders(orders)))
            .push(route),
    )
}

pub(crate) fn products_service(products: MockProductsService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_with_products(products)))
            .push(route),
    )
}

pub(crate) fn make_product(uuid: ProductUuid, price: u64) -> Product {
    Product {
        uuid,
        name: "Rose bouquet".to_string(),
        category: "bouquets".to_string(),
        description: String::new(),
        price: Price::from_minor(price).expect("valid price"),
        unit: UnitOfMeasure::Piece,
        photo: None,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
        deleted_at: None,
    }
}

pub(crate) fn make_order(status: OrderStatus) -> Order {
    let uuid = OrderUuid::new();

    Order {
        uuid,
        customer_email: "buyer@example.com".to_string(),
        shipping_address: "1 Main Street".to_string(),
        operation_id: "op-1".to_string(),
        tracking_number: None,
        total_price: Price::from_minor(300_000).expect("valid price"),
        status,
        items: vec![OrderItem {
            order_uuid: uuid,
            product_uuid: ProductUuid::new(),
            name: "Rose bouquet".to_string(),
            quantity: Quantity::new(2).expect("valid quantity"),
            unit_price: Price::from_minor(150_000).expect("valid price"),
        }],
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}
