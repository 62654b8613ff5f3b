//! Mailer Config

use std::time::Duration;

use clap::Args;

use storefront_app::notifications::MailerConfig;

/// Transactional mailer settings.
#[derive(Debug, Args)]
pub struct MailerSettings {
    /// Mailer service address
    #[arg(long, env = "MAILER_ADDR")]
    pub mailer_addr: String,

    /// Mailer API bearer token
    #[arg(long, env = "MAILER_TOKEN")]
    pub mailer_token: String,

    /// Sender address for outgoing messages
    #[arg(long, env = "MAILER_SENDER")]
    pub mailer_sender: String,

    /// Mailer request timeout in seconds
    #[arg(long, env = "MAILER_TIMEOUT_SECS", default_value = "10")]
    pub mailer_timeout_secs: u64,
}

impl MailerSettings {
    /// Mailer client configuration.
    #[must_use]
    pub fn client_config(&self) -> MailerConfig {
        MailerConfig {
            addr: self.mailer_addr.clone(),
            token: self.mailer_token.clone(),
            sender: self.mailer_sender.clone(),
            timeout: Duration::from_secs(self.mailer_timeout_secs),
        }
    }
}
