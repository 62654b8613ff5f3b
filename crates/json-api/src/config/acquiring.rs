//! Acquiring Gateway Config

use std::time::Duration;

use clap::Args;

use storefront_app::acquiring::{AcquiringConfig, WebhookVerifier};

/// Acquiring gateway settings.
#[derive(Debug, Args)]
pub struct AcquiringSettings {
    /// Gateway base address
    #[arg(long, env = "ACQUIRING_ADDR")]
    pub acquiring_addr: String,

    /// Gateway API bearer token
    #[arg(long, env = "ACQUIRING_TOKEN")]
    pub acquiring_token: String,

    /// Merchant customer code
    #[arg(long, env = "ACQUIRING_CUSTOMER_CODE")]
    pub acquiring_customer_code: String,

    /// Redirect URL after a successful payment
    #[arg(long, env = "ACQUIRING_REDIRECT_URL")]
    pub acquiring_redirect_url: String,

    /// Redirect URL after a failed payment
    #[arg(long, env = "ACQUIRING_FAIL_REDIRECT_URL")]
    pub acquiring_fail_redirect_url: String,

    /// Gateway request timeout in seconds
    #[arg(long, env = "ACQUIRING_TIMEOUT_SECS", default_value = "10")]
    pub acquiring_timeout_secs: u64,

    /// Key used to verify webhook token signatures
    #[arg(long, env = "ACQUIRING_WEBHOOK_KEY")]
    pub acquiring_webhook_key: String,
}

impl AcquiringSettings {
    /// Gateway client configuration.
    #[must_use]
    pub fn client_config(&self) -> AcquiringConfig {
        AcquiringConfig {
            addr: self.acquiring_addr.clone(),
            token: self.acquiring_token.clone(),
            customer_code: self.acquiring_customer_code.clone(),
            redirect_url: self.acquiring_redirect_url.clone(),
            fail_redirect_url: self.acquiring_fail_redirect_url.clone(),
            timeout: Duration::from_secs(self.acquiring_timeout_secs),
        }
    }

    /// Webhook verifier bound to the configured key.
    #[must_use]
    pub fn webhook_verifier(&self) -> WebhookVerifier {
        WebhookVerifier::new(self.acquiring_webhook_key.as_bytes())
    }
}
