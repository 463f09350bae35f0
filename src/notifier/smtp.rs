//! SMTP-backed notifier over lettre's async transport.

use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::SmtpConfig;
use crate::errors::{InkpostError, Result};
use crate::notifier::{EmailMessage, Notifier};

pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpNotifier {
    /// Build the transport from configuration. Fails fast at startup on a
    /// bad relay hostname or sender address rather than on first send.
    pub fn from_config(config: &SmtpConfig) -> Result<Self> {
        let host = config
            .host
            .as_deref()
            .ok_or_else(|| InkpostError::config("SMTP host is not configured"))?;
        let from_address = config
            .from_address
            .as_deref()
            .ok_or_else(|| InkpostError::config("SMTP sender address is not configured"))?;

        let from: Mailbox = from_address
            .parse()
            .map_err(|e| InkpostError::config(format!("Invalid SMTP sender address: {}", e)))?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::relay(host)
            .map_err(|e| InkpostError::config(format!("Invalid SMTP relay: {}", e)))?;

        if let Some(port) = config.port {
            builder = builder.port(port);
        }

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        Ok(Self { transport: builder.build(), from })
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, message: EmailMessage) -> Result<()> {
        let to: Mailbox = message
            .to
            .parse()
            .map_err(|e| InkpostError::internal(format!("Invalid recipient address: {}", e)))?;

        let email = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(message.subject)
            .multipart(MultiPart::alternative_plain_html(message.text_body, message.html_body))
            .map_err(|e| InkpostError::internal(format!("Failed to build email: {}", e)))?;

        self.transport
            .send(email)
            .await
            .map_err(|e| InkpostError::internal(format!("SMTP send failed: {}", e)))?;

        Ok(())
    }
}
