// src/templates.rs
use crate::{
    models::{stats::StatusCounts, student::Student},
    web::flash::Flash,
};
use askama::Template;

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexPage {
    pub flash: Option<Flash>,
}

#[derive(Template)]
#[template(path = "register.html")]
pub struct RegisterPage {
    pub error: Option<String>,
    pub form: RegisterFormValues,
}

/// Values echoed back into the form after a failed submission.
#[derive(Debug, Clone, Default)]
pub struct RegisterFormValues {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub dob: String,
    pub address: String,
    pub course: String,
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginPage {
    pub flash: Option<Flash>,
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "admin_dashboard.html")]
pub struct AdminDashboardPage {
    pub admin_username: String,
    pub students: Vec<Student>,
    pub counts: StatusCounts,
    pub flash: Option<Flash>,
}
