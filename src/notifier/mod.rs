//! # Notifier
//!
//! Out-of-band email delivery. Delivery is best-effort: senders run on a
//! spawned task and failures are logged, never surfaced to the request that
//! triggered them.

mod smtp;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::config::{ServerConfig, SmtpConfig};
use crate::errors::Result;

pub use smtp::SmtpNotifier;

/// A single outbound email with text and HTML bodies.
#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}

/// Email delivery collaborator.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, message: EmailMessage) -> Result<()>;
}

/// Notifier used when SMTP is not configured: logs the message instead of
/// delivering it, which keeps local development working without a relay.
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, message: EmailMessage) -> Result<()> {
        info!(
            to = %message.to,
            subject = %message.subject,
            "SMTP not configured, logging email instead of sending"
        );
        Ok(())
    }
}

/// Build the notifier matching the configuration: a real SMTP transport when
/// one is configured, the log-only fallback otherwise.
pub fn notifier_from_config(config: &SmtpConfig) -> Result<Arc<dyn Notifier>> {
    if config.is_configured() {
        Ok(Arc::new(SmtpNotifier::from_config(config)?))
    } else {
        Ok(Arc::new(LogNotifier))
    }
}

/// Fire-and-forget dispatch: the send runs on its own task and its result is
/// logged and dropped.
pub fn dispatch(notifier: Arc<dyn Notifier>, message: EmailMessage) {
    tokio::spawn(async move {
        let to = message.to.clone();
        let subject = message.subject.clone();
        if let Err(error) = notifier.send(message).await {
            warn!(%error, to = %to, subject = %subject, "Failed to send email");
        }
    });
}

/// Verification email carrying the one-time code link.
pub fn verification_email(server: &ServerConfig, to: &str, username: &str, code: &str) -> EmailMessage {
    let link = format!("{}/verify-now/{}", server.public_domain, code);
    EmailMessage {
        to: to.to_string(),
        subject: "Verify your account".to_string(),
        text_body: format!(
            "Hi {},\n\nPlease verify your account by visiting the link below:\n{}\n",
            username, link
        ),
        html_body: format!(
            "<p>Hi {},</p><p>Please verify your account by clicking the link below.</p>\
             <p><a href=\"{}\">Verify my account</a></p>",
            username, link
        ),
    }
}

/// Password-reset email carrying the time-bounded token link.
pub fn reset_link_email(server: &ServerConfig, to: &str, username: &str, token: &str) -> EmailMessage {
    let link = format!("{}/reset-password-now/{}", server.public_domain, token);
    EmailMessage {
        to: to.to_string(),
        subject: "Reset your password".to_string(),
        text_body: format!(
            "Hi {},\n\nA password reset was requested for your account. \
             Use the link below to choose a new password:\n{}\n\n\
             If you did not request this, you can ignore this email.\n",
            username, link
        ),
        html_body: format!(
            "<p>Hi {},</p><p>A password reset was requested for your account. \
             Click the link below to choose a new password.</p>\
             <p><a href=\"{}\">Reset my password</a></p>\
             <p>If you did not request this, you can ignore this email.</p>",
            username, link
        ),
    }
}

/// Confirmation email sent after a successful password reset.
pub fn reset_confirmation_email(to: &str, username: &str) -> EmailMessage {
    EmailMessage {
        to: to.to_string(),
        subject: "Your password was changed".to_string(),
        text_body: format!(
            "Hi {},\n\nYour password was just changed. If this was not you, \
             contact support immediately.\n",
            username
        ),
        html_body: format!(
            "<p>Hi {},</p><p>Your password was just changed. If this was not you, \
             contact support immediately.</p>",
            username
        ),
    }
}
