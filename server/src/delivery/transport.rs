use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::info;

use crate::delivery::DeliveryError;

/// Outbound channel for confirmation messages.
#[async_trait]
pub trait DeliveryTransport: Send + Sync {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<(), DeliveryError>;
}

#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    /// Without credentials the relay is used unauthenticated and unencrypted,
    /// which only suits a local mail catcher.
    pub credentials: Option<(String, String)>,
    pub from: String,
}

/// Sends HTML mail through an SMTP relay.
#[derive(Clone)]
pub struct SmtpTransport {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpTransport {
    pub fn new(settings: &SmtpSettings) -> Result<Self, DeliveryError> {
        let from: Mailbox = settings
            .from
            .parse()
            .map_err(|e| DeliveryError::Transport(format!("invalid sender address: {e}")))?;

        let mailer = match &settings.credentials {
            Some((username, password)) => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
                    .map_err(|e| DeliveryError::Transport(format!("SMTP relay error: {e}")))?
                    .port(settings.port)
                    .credentials(Credentials::new(username.clone(), password.clone()))
                    .build()
            }
            None => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&settings.host)
                .port(settings.port)
                .build(),
        };

        Ok(Self { mailer, from })
    }
}

#[async_trait]
impl DeliveryTransport for SmtpTransport {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<(), DeliveryError> {
        let to: Mailbox = recipient
            .parse()
            .map_err(|e| DeliveryError::InvalidRecipient(format!("{recipient}: {e}")))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(body.to_string())
            .map_err(|e| DeliveryError::Transport(format!("failed to build message: {e}")))?;

        self.mailer
            .send(message)
            .await
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        Ok(())
    }
}

/// Logs messages instead of sending them. For development setups without a
/// mail relay.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogTransport;

#[async_trait]
impl DeliveryTransport for LogTransport {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<(), DeliveryError> {
        info!(
            recipient = %recipient,
            subject = %subject,
            body_bytes = body.len(),
            "Confirmation prepared (log transport, not sent)"
        );
        Ok(())
    }
}
