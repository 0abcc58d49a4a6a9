// src/models/student.rs
use crate::error::AppError;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

/// Review decision of an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 3] = [
        ApplicationStatus::Pending,
        ApplicationStatus::Approved,
        ApplicationStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "Pending",
            ApplicationStatus::Approved => "Approved",
            ApplicationStatus::Rejected => "Rejected",
        }
    }

    /// Parses a status an admin is allowed to set. Only the two decisions are accepted,
    /// an application can never be put back to Pending.
    pub fn parse_decision(raw: &str) -> Result<Self, AppError> {
        match raw {
            "Approved" => Ok(ApplicationStatus::Approved),
            "Rejected" => Ok(ApplicationStatus::Rejected),
            other => Err(AppError::InvalidStatus(other.to_string())),
        }
    }

    pub fn is_decided(&self) -> bool {
        !matches!(self, ApplicationStatus::Pending)
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for ApplicationStatus {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ApplicationStatus::ALL
            .into_iter()
            .find(|s| s.as_str() == value)
            .ok_or(AppError::InvalidStatus(value))
    }
}

// Row of the 'students' table
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Student {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub dob: NaiveDate,
    pub address: String,
    pub course: String,
    pub documents: Option<String>,
    pub photo: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: ApplicationStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Student {
    /// Phone number usable for SMS, if one was recorded.
    pub fn sms_number(&self) -> Option<&str> {
        self.phone.as_deref().map(str::trim).filter(|p| !p.is_empty())
    }
}

/// Fields submitted through the registration form.
/// Missing fields come through empty so validation can report them on the form.
#[derive(Debug, Clone, Deserialize)]
pub struct RegistrationForm {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub dob: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub course: String,
}

/// Registration data after trimming and validation.
#[derive(Debug, Clone)]
pub struct NewStudent {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub dob: NaiveDate,
    pub address: String,
    pub course: String,
}

impl TryFrom<RegistrationForm> for NewStudent {
    type Error = AppError;

    fn try_from(form: RegistrationForm) -> Result<Self, Self::Error> {
        let required = |value: String, label: &str| {
            let value = value.trim().to_string();
            if value.is_empty() {
                Err(AppError::Validation(format!("{} is required", label)))
            } else {
                Ok(value)
            }
        };

        let full_name = required(form.full_name, "Full name")?;
        let email = required(form.email, "Email")?;
        if !email.contains('@') {
            return Err(AppError::Validation("Email address is not valid".to_string()));
        }
        let course = required(form.course, "Course")?;
        let dob = NaiveDate::parse_from_str(form.dob.trim(), "%Y-%m-%d")
            .map_err(|_| AppError::Validation("Date of birth must be YYYY-MM-DD".to_string()))?;
        let phone = form
            .phone
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());

        Ok(NewStudent {
            full_name,
            email,
            phone,
            dob,
            address: form.address.trim().to_string(),
            course,
        })
    }
}

/// JSON body of the status-change API.
#[derive(Debug, Deserialize)]
pub struct StatusChangeRequest {
    #[serde(default)]
    pub status: Option<serde_json::Value>,
}

impl StatusChangeRequest {
    /// The requested status as text. Non-string values are kept verbatim so they fail validation.
    pub fn requested_status(&self) -> String {
        match &self.status {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        }
    }
}
