// src/notifications/mod.rs
//
// Best-effort delivery of applicant notifications. Every send runs on its own
// detached task; failures end up in the log and nowhere else.
pub mod email;
pub mod messages;
pub mod sms;

use crate::{config::AppConfig, error::AppResult, models::student::Student};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;
use uuid::Uuid;

pub use messages::Notification;

#[derive(Error, Debug)]
pub enum NotificationError {
    #[error("Failed to send email: {0}")]
    Mail(String),

    #[error("Failed to send SMS: {0}")]
    Sms(String),

    #[error("Failed to render notification: {0}")]
    Template(#[from] askama::Error),
}

/// Anything able to deliver an HTML email.
#[async_trait]
pub trait MailSender: Send + Sync {
    async fn send_mail(&self, to: &str, subject: &str, html_body: &str) -> Result<(), NotificationError>;
}

/// Anything able to deliver a text message.
#[async_trait]
pub trait SmsSender: Send + Sync {
    async fn send_sms(&self, to: &str, body: &str) -> Result<(), NotificationError>;
}

/// Dispatches email and SMS notifications off the request path.
///
/// Cloning is cheap: the senders are shared behind `Arc` and never mutated.
#[derive(Clone)]
pub struct Notifier {
    mailer: Arc<dyn MailSender>,
    sms: Option<Arc<dyn SmsSender>>,
}

impl Notifier {
    /// SMTP mailer plus Twilio SMS when the account is configured.
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        let mailer = email::SmtpMailer::from_config(&config.mail)?;
        let sms: Option<Arc<dyn SmsSender>> = match &config.sms {
            Some(sms_config) => match sms::TwilioSms::new(sms_config.clone()) {
                Ok(client) => {
                    tracing::info!("📱 SMS notifications enabled (from {})", sms_config.from_number);
                    Some(Arc::new(client) as Arc<dyn SmsSender>)
                }
                Err(e) => {
                    tracing::error!("❌ SMS disabled: {}", e);
                    None
                }
            },
            None => {
                tracing::info!("SMS notifications disabled (Twilio not configured)");
                None
            }
        };
        Ok(Self::new(Arc::new(mailer), sms))
    }

    pub fn new(mailer: Arc<dyn MailSender>, sms: Option<Arc<dyn SmsSender>>) -> Self {
        Self { mailer, sms }
    }

    /// Fire-and-forget: spawns the deliveries and returns immediately.
    pub fn notify(&self, student: &Student, notification: Notification) {
        let _ = self.spawn_deliveries(student, notification);
    }

    // The handles are only awaited by tests, `notify` drops them (detaching the tasks).
    fn spawn_deliveries(&self, student: &Student, notification: Notification) -> Vec<JoinHandle<()>> {
        let dispatch_id = Uuid::new_v4();
        let Notification {
            subject,
            html_body,
            sms_body,
        } = notification;
        let mut handles = Vec::with_capacity(2);

        tracing::debug!(
            "📨 [{}] Dispatching '{}' to student {}",
            dispatch_id,
            subject,
            student.id
        );

        let mailer = Arc::clone(&self.mailer);
        let email = student.email.clone();
        handles.push(tokio::spawn(async move {
            match mailer.send_mail(&email, &subject, &html_body).await {
                Ok(()) => tracing::info!("✉️ [{}] Email sent to {}", dispatch_id, email),
                Err(e) => tracing::error!("❌ [{}] {}", dispatch_id, e),
            }
        }));

        match (&self.sms, student.sms_number()) {
            (Some(sms), Some(number)) => {
                let sms = Arc::clone(sms);
                let number = number.to_string();
                handles.push(tokio::spawn(async move {
                    match sms.send_sms(&number, &sms_body).await {
                        Ok(()) => tracing::info!("📱 [{}] SMS sent to {}", dispatch_id, number),
                        Err(e) => tracing::error!("❌ [{}] {}", dispatch_id, e),
                    }
                }));
            }
            (Some(_), None) => {
                tracing::debug!("[{}] Student {} has no phone, skipping SMS", dispatch_id, student.id);
            }
            (None, _) => {}
        }

        handles
    }
}
