// src/error.rs
use axum::{http::StatusCode, response::Html, response::IntoResponse};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    SqlxMigrateError(#[from] sqlx::migrate::MigrateError),

    // Status transition failures
    #[error("Invalid status '{0}': expected Approved or Rejected")]
    InvalidStatus(String),

    #[error("Student {0} not found")]
    NotFound(i64),

    #[error("Student id in the path is not a number")]
    StudentIdMalformed,

    // Registration form
    #[error("Invalid form data: {0}")]
    Validation(String),

    // Email or phone already used by another application
    #[error("An application with this {0} already exists")]
    DuplicateApplicant(&'static str),

    // Login and session
    #[error("Error processing password")]
    PasswordHashingError,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Session error: {0}")]
    SessionError(String),

    #[error("Template rendering failed: {0}")]
    TemplateError(#[from] askama::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Unexpected internal error")]
    InternalServerError,
}

impl AppError {
    /// HTTP status and the message safe to show to the user.
    pub fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            AppError::InvalidStatus(_) => (StatusCode::BAD_REQUEST, "Invalid status".to_string()),
            AppError::NotFound(_) | AppError::StudentIdMalformed => {
                (StatusCode::NOT_FOUND, "Student not found".to_string())
            }
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::DuplicateApplicant(_) => (StatusCode::CONFLICT, self.to_string()),
            AppError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Invalid username or password".to_string())
            }
            AppError::SqlxError(_) | AppError::SqlxMigrateError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error accessing application data".to_string(),
            ),
            AppError::PasswordHashingError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error processing credentials".to_string(),
            ),
            AppError::SessionError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error managing your session".to_string(),
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Something went wrong! Please try again later.".to_string(),
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        // Full detail goes to the log; the page only gets the safe message
        tracing::error!("Request failed: {:?}", self);

        let (status, user_message) = self.status_and_message();

        (status, Html(format!(r#"
            <!DOCTYPE html><html><head><title>Error</title><style>body{{font-family:sans-serif;}}</style></head>
            <body><h1>Error {status_code}</h1><p>{message}</p><a href="javascript:history.back()">Back</a></body></html>
         "#, status_code = status.as_u16(), message = user_message))).into_response()
    }
}

pub type AppResult<T = ()> = Result<T, AppError>;
