//! Product catalog domain.

pub mod errors;
pub mod models;
pub(crate) mod repository;
pub mod service;

pub use errors::ProductsServiceError;
pub use service::{MockProductsService, PgProductsService, ProductsService};
