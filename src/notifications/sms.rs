// src/notifications/sms.rs
use super::{NotificationError, SmsSender};
use crate::config::SmsConfig;
use async_trait::async_trait;
use std::time::Duration;

const TWILIO_API_BASE: &str = "https://api.twilio.com/2010-04-01";

/// Sends text messages through the Twilio REST API.
pub struct TwilioSms {
    client: reqwest::Client,
    config: SmsConfig,
}

impl TwilioSms {
    pub fn new(config: SmsConfig) -> Result<Self, NotificationError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| NotificationError::Sms(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/Accounts/{}/Messages.json",
            TWILIO_API_BASE, self.config.account_sid
        )
    }
}

#[async_trait]
impl SmsSender for TwilioSms {
    async fn send_sms(&self, to: &str, body: &str) -> Result<(), NotificationError> {
        let params = [
            ("To", to),
            ("From", self.config.from_number.as_str()),
            ("Body", body),
        ];

        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&params)
            .send()
            .await
            .map_err(|e| NotificationError::Sms(format!("request failed: {}", e)))?;

        if response.status().is_success() {
            Ok(())
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(NotificationError::Sms(format!("Twilio answered {}: {}", status, body)))
        }
    }
}
