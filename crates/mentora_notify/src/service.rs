// --- File: crates/mentora_notify/src/service.rs ---
//! SMTP implementation of the notification seam.

use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use mentora_common::services::{BoxFuture, NotificationResult, NotificationService};
use mentora_config::SmtpConfig;
use tracing::info;
use uuid::Uuid;

use crate::error::NotifyError;

/// Notifier sending mail through a STARTTLS SMTP relay.
///
/// Host, port and the from address come from the config section;
/// credentials come from `SMTP_USERNAME` / `SMTP_PASSWORD` so they never
/// sit in a config file.
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpNotifier {
    pub fn from_config(config: &SmtpConfig) -> Result<Self, NotifyError> {
        let username = std::env::var("SMTP_USERNAME")
            .map_err(|_| NotifyError::ConfigError("SMTP_USERNAME is not set".to_string()))?;
        let password = std::env::var("SMTP_PASSWORD")
            .map_err(|_| NotifyError::ConfigError("SMTP_PASSWORD is not set".to_string()))?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
            .credentials(Credentials::new(username, password));
        if let Some(port) = config.port {
            builder = builder.port(port);
        }

        let from = match &config.from_name {
            Some(name) => format!("{} <{}>", name, config.from_email),
            None => config.from_email.clone(),
        }
        .parse::<Mailbox>()?;

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }

    async fn send(
        &self,
        to: String,
        subject: String,
        body: String,
        is_html: bool,
    ) -> Result<NotificationResult, NotifyError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(to.parse::<Mailbox>()?)
            .subject(&subject)
            .header(if is_html {
                ContentType::TEXT_HTML
            } else {
                ContentType::TEXT_PLAIN
            })
            .body(body)?;

        self.transport.send(message).await?;
        info!("Confirmation email sent to {} ('{}')", to, subject);

        Ok(NotificationResult {
            id: Uuid::new_v4().to_string(),
            status: "sent".to_string(),
        })
    }
}

impl NotificationService for SmtpNotifier {
    type Error = NotifyError;

    fn send_email(
        &self,
        to: &str,
        subject: &str,
        body: &str,
        is_html: bool,
    ) -> BoxFuture<'_, NotificationResult, Self::Error> {
        let to = to.to_string();
        let subject = subject.to_string();
        let body = body.to_string();
        Box::pin(self.send(to, subject, body, is_html))
    }
}
