//! Restock notifications.
//!
//! Sends one plain-text email per available product to every configured
//! recipient, over SMTP with STARTTLS.

use std::time::Duration;

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::error::{AppError, Result};
use crate::models::{MailConfig, TrackedProduct};

/// Delivery channel for restock events.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Announce that `product` is available.
    async fn notify(&self, product: &TrackedProduct) -> Result<()>;
}

/// Subject and body of a restock email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestockEmail {
    pub subject: String,
    pub body: String,
}

impl RestockEmail {
    pub fn for_product(product: &TrackedProduct) -> Self {
        Self {
            subject: format!("{} is now in Stock!", product.name),
            body: format!("{} is now available: {}", product.name, product.url),
        }
    }
}

/// Email notifier backed by an authenticated SMTP relay.
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Vec<Mailbox>,
}

impl SmtpNotifier {
    /// Create a notifier from mail settings.
    ///
    /// Fails if the sender or any recipient is not a valid address, or if no
    /// recipient is configured.
    pub fn new(config: &MailConfig) -> Result<Self> {
        let from = parse_mailbox(&config.sender)?;
        let to = config
            .recipients
            .iter()
            .map(|r| parse_mailbox(r))
            .collect::<Result<Vec<_>>>()?;
        if to.is_empty() {
            return Err(AppError::config("No email recipients configured"));
        }

        // No pool feature: each send opens and closes its own connection.
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(Credentials::new(
                config.sender.clone(),
                config.password.clone(),
            ))
            .timeout(Some(Duration::from_secs(config.timeout_secs)))
            .build();

        Ok(Self {
            transport,
            from,
            to,
        })
    }

    /// Build the restock message for a product.
    pub fn message_for(&self, product: &TrackedProduct) -> Result<Message> {
        build_message(&self.from, &self.to, product)
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn notify(&self, product: &TrackedProduct) -> Result<()> {
        let message = self.message_for(product)?;
        self.transport.send(message).await?;
        log::info!("📧 Email sent for {}", product.name);
        Ok(())
    }
}

/// Assemble a plain-text restock message addressed to all recipients.
pub fn build_message(from: &Mailbox, to: &[Mailbox], product: &TrackedProduct) -> Result<Message> {
    let email = RestockEmail::for_product(product);

    let mut builder = Message::builder()
        .from(from.clone())
        .subject(email.subject)
        .header(ContentType::TEXT_PLAIN);
    for recipient in to {
        builder = builder.to(recipient.clone());
    }

    Ok(builder.body(email.body)?)
}

fn parse_mailbox(address: &str) -> Result<Mailbox> {
    address
        .trim()
        .parse()
        .map_err(|e| AppError::address(address, e))
}
