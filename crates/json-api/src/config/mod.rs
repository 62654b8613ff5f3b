//! Server configuration module

use clap::Parser;

use crate::config::{
    acquiring::AcquiringSettings, db::DatabaseConfig, mailer::MailerSettings,
    observability::LoggingConfig, server::ServerRuntimeConfig,
};

pub(crate) mod acquiring;
pub(crate) mod db;
pub(crate) mod mailer;
pub(crate) mod observability;
pub(crate) mod server;

/// Storefront JSON API Server configuration
#[derive(Debug, Parser)]
#[command(name = "storefront-json", about = "Storefront JSON API Server", long_about = None)]
pub struct ServerConfig {
    /// Server network settings.
    #[command(flatten)]
    pub server: ServerRuntimeConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Application database settings.
    #[command(flatten)]
    pub database: DatabaseConfig,

    /// Acquiring gateway settings.
    #[command(flatten)]
    pub acquiring: AcquiringSettings,

    /// Transactional mailer settings.
    #[command(flatten)]
    pub mailer: MailerSettings,
}

impl ServerConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Get the socket address for binding
    #[must_use]
    pub fn socket_addr(&self) -> String {
        self.server.socket_addr()
    }
}
