// src/notifications/email.rs
use super::{MailSender, NotificationError};
use crate::config::MailConfig;
use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

/// SMTP delivery through lettre's pooled async transport.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn from_config(config: &MailConfig) -> AppResult<Self> {
        let mut builder = if config.use_tls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.server)
                .map_err(|e| AppError::ConfigError(format!("MAIL_SERVER '{}': {}", config.server, e)))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.server)
        };
        builder = builder.port(config.port);

        if let (Some(user), Some(pass)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        let from = config
            .default_sender
            .parse::<Mailbox>()
            .map_err(|e| AppError::ConfigError(format!("MAIL_DEFAULT_SENDER '{}': {}", config.default_sender, e)))?;

        tracing::info!(
            "✉️ SMTP configured: {}:{} (tls: {}), sender {}",
            config.server,
            config.port,
            config.use_tls,
            from
        );

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }
}

#[async_trait]
impl MailSender for SmtpMailer {
    async fn send_mail(&self, to: &str, subject: &str, html_body: &str) -> Result<(), NotificationError> {
        let recipient = to
            .parse::<Mailbox>()
            .map_err(|e| NotificationError::Mail(format!("invalid recipient '{}': {}", to, e)))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(recipient)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html_body.to_string())
            .map_err(|e| NotificationError::Mail(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| NotificationError::Mail(e.to_string()))?;
        Ok(())
    }
}
