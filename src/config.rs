// src/config.rs
use crate::error::{AppError, AppResult};
use std::net::SocketAddr;

const DEFAULT_DATABASE_URL: &str = "sqlite://student_portal.db";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";
const DEFAULT_ADMIN_USERNAME: &str = "admin";
const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

/// Everything the portal reads from the environment, resolved once at boot.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub session_secret: Option<String>,
    pub session_secure: bool,
    pub default_admin: DefaultAdmin,
    pub mail: MailConfig,
    pub sms: Option<SmsConfig>,
}

#[derive(Debug, Clone)]
pub struct DefaultAdmin {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct MailConfig {
    pub server: String,
    pub port: u16,
    pub use_tls: bool,
    pub username: Option<String>,
    pub password: Option<String>,
    pub default_sender: String,
}

/// Twilio account used for SMS. Absent when any of the three values is missing.
#[derive(Debug, Clone)]
pub struct SmsConfig {
    pub account_sid: String,
    pub auth_token: String,
    pub from_number: String,
}

impl AppConfig {
    /// Reads the process environment. `main` loads `.env` before calling this.
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let bind_raw = get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .parse::<SocketAddr>()
            .map_err(|e| AppError::ConfigError(format!("BIND_ADDR '{}': {}", bind_raw, e)))?;

        let session_secure = match get("SESSION_SECURE") {
            Some(raw) => parse_bool("SESSION_SECURE", &raw)?,
            None => false,
        };

        let server = get("MAIL_SERVER").unwrap_or_else(|| "localhost".to_string());
        let use_tls = match get("MAIL_USE_TLS") {
            Some(raw) => parse_bool("MAIL_USE_TLS", &raw)?,
            None => server != "localhost" && server != "127.0.0.1",
        };
        let port = match get("MAIL_PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|e| AppError::ConfigError(format!("MAIL_PORT '{}': {}", raw, e)))?,
            None if use_tls => 587,
            None => 25,
        };
        let username = get("MAIL_USERNAME");
        let default_sender = get("MAIL_DEFAULT_SENDER")
            .or_else(|| username.clone())
            .unwrap_or_else(|| "noreply@admissions.local".to_string());

        let mail = MailConfig {
            server,
            port,
            use_tls,
            username,
            password: get("MAIL_PASSWORD"),
            default_sender,
        };

        let sms = match (
            get("TWILIO_ACCOUNT_SID"),
            get("TWILIO_AUTH_TOKEN"),
            get("TWILIO_PHONE_NUMBER"),
        ) {
            (Some(account_sid), Some(auth_token), Some(from_number)) => Some(SmsConfig {
                account_sid,
                auth_token,
                from_number,
            }),
            _ => None,
        };

        Ok(AppConfig {
            database_url: get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            bind_addr,
            session_secret: get("SESSION_SECRET"),
            session_secure,
            default_admin: DefaultAdmin {
                username: get("ADMIN_USERNAME").unwrap_or_else(|| DEFAULT_ADMIN_USERNAME.to_string()),
                password: get("ADMIN_PASSWORD").unwrap_or_else(|| DEFAULT_ADMIN_PASSWORD.to_string()),
            },
            mail,
            sms,
        })
    }
}

fn parse_bool(key: &str, raw: &str) -> AppResult<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(AppError::ConfigError(format!("{} '{}' is not a boolean", key, raw))),
    }
}
