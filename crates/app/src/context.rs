//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    acquiring::{AcquiringClient, AcquiringConfig, WebhookVerifier},
    database::{self, Db},
    domain::{
        orders::{AcquiringOrdersService, OrdersService, PgOrdersRepository},
        products::{PgProductsService, ProductsService},
    },
    notifications::{MailerClient, MailerConfig},
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),
}

#[derive(Clone)]
pub struct AppContext {
    pub products: Arc<dyn ProductsService>,
    pub orders: Arc<dyn OrdersService>,
}

impl AppContext {
    /// Build application context from a database URL and the integration
    /// configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails.
    pub async fn from_database_url(
        url: &str,
        acquiring: AcquiringConfig,
        webhook_verifier: WebhookVerifier,
        mailer: MailerConfig,
    ) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        let db = Db::new(pool);

        let products = Arc::new(PgProductsService::new(db.clone()));

        let orders = Arc::new(AcquiringOrdersService::new(
            Arc::new(PgOrdersRepository::new(db)),
            products.clone(),
            Arc::new(AcquiringClient::new(acquiring)),
            webhook_verifier,
            Arc::new(MailerClient::new(mailer)),
        ));

        Ok(Self { products, orders })
    }
}
