//! Orders domain: the order aggregate and the payment workflow around it.

pub mod errors;
pub mod models;
pub mod pricing;
pub mod repository;
pub mod service;

pub use errors::OrdersServiceError;
pub use repository::{MockOrdersRepository, OrdersRepository, PgOrdersRepository};
pub use service::{AcquiringOrdersService, MockOrdersService, OrdersService};
