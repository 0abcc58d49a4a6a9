// src/notifications/messages.rs
use super::NotificationError;
use crate::models::student::{ApplicationStatus, Student};
use askama::Template;

/// What gets sent to an applicant: one subject, an HTML email body and a short SMS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub subject: String,
    pub html_body: String,
    pub sms_body: String,
}

#[derive(Template)]
#[template(path = "email/application_received.html")]
struct ApplicationReceivedEmail<'a> {
    student: &'a Student,
}

#[derive(Template)]
#[template(path = "email/application_approved.html")]
struct ApplicationApprovedEmail<'a> {
    student: &'a Student,
}

#[derive(Template)]
#[template(path = "email/application_rejected.html")]
struct ApplicationRejectedEmail<'a> {
    student: &'a Student,
}

impl Notification {
    /// Sent right after a registration is stored.
    pub fn application_received(student: &Student) -> Result<Self, NotificationError> {
        Ok(Notification {
            subject: "🎓 Application Received - Thank you!".to_string(),
            html_body: ApplicationReceivedEmail { student }.render()?,
            sms_body: format!(
                "Hello {}, we received your application for {}. Status: Pending.",
                student.full_name, student.course
            ),
        })
    }

    /// Sent after an admin decision. Pending has no message of its own.
    pub fn decision(student: &Student, status: ApplicationStatus) -> Result<Self, NotificationError> {
        let (html_body, sms_body) = match status {
            ApplicationStatus::Approved => (
                ApplicationApprovedEmail { student }.render()?,
                format!(
                    "🎉 Congratulations {}! Your application for {} is APPROVED.",
                    student.full_name, student.course
                ),
            ),
            ApplicationStatus::Rejected => (
                ApplicationRejectedEmail { student }.render()?,
                format!(
                    "⚠️ Hello {}, we regret to inform you that your application for {} was not approved.",
                    student.full_name, student.course
                ),
            ),
            ApplicationStatus::Pending => return Self::application_received(student),
        };

        Ok(Notification {
            subject: format!("Application {}", status),
            html_body,
            sms_body,
        })
    }
}
