//! Email-sending collaborator.
//!
//! There is no real delivery anywhere in this system: the shipped
//! implementation logs the message, waits a fixed simulated network delay and
//! reports success. Callers treat failures as non-fatal (logged, never rolled
//! back into the triggering operation).

use std::time::Duration;

use async_trait::async_trait;
use mockall::automock;
use serde_json::Value;
use thiserror::Error;

/// Errors surfaced by an email provider.
#[derive(Debug, Error)]
pub enum MailerError {
    /// The provider rejected the message.
    #[error("email delivery failed: {0}")]
    Delivery(String),
}

/// A templated message handed to the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct EmailMessage {
    /// Recipient address.
    pub to: String,

    /// Subject line.
    pub subject: String,

    /// Provider-side template name.
    pub template: String,

    /// Template substitution data.
    pub data: Value,
}

/// Email-sending collaborator.
#[automock]
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver a message after whatever latency the provider incurs.
    ///
    /// # Errors
    ///
    /// Returns a [`MailerError`] when the provider rejects the message.
    async fn send(&self, message: EmailMessage) -> Result<(), MailerError>;
}

/// Mock delivery: log, wait, succeed.
#[derive(Debug, Clone)]
pub struct SimulatedMailer {
    delay: Duration,
}

impl SimulatedMailer {
    /// Mailer with the default one-second simulated delay.
    #[must_use]
    pub fn new() -> Self {
        Self::with_delay(Duration::from_secs(1))
    }

    /// Mailer with a custom simulated delay.
    #[must_use]
    pub fn with_delay(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for SimulatedMailer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Mailer for SimulatedMailer {
    async fn send(&self, message: EmailMessage) -> Result<(), MailerError> {
        tracing::debug!(
            to = %message.to,
            template = %message.template,
            "sending email"
        );

        tokio::time::sleep(self.delay).await;

        Ok(())
    }
}
