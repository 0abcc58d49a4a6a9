// src/models/admin.rs
use serde::Deserialize;
use sqlx::FromRow;

// Row of the 'admins' table
#[derive(Debug, Clone, FromRow)]
pub struct Admin {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}
