// src/services/admin_service.rs
use crate::{
    config::DefaultAdmin,
    error::{AppError, AppResult},
    models::admin::Admin,
    services::auth_service,
};
use sqlx::SqlitePool;

pub async fn find_admin_by_username(db_pool: &SqlitePool, username: &str) -> AppResult<Option<Admin>> {
    tracing::debug!("Looking up admin '{}'", username);
    let admin = sqlx::query_as::<_, Admin>(
        r#"
        SELECT id, username, password_hash
        FROM admins
        WHERE username = ?1
        "#,
    )
    .bind(username)
    .fetch_optional(db_pool)
    .await?;
    Ok(admin)
}

/// Inserts an admin with an already hashed password.
pub async fn create_admin(db_pool: &SqlitePool, username: &str, password_hash: &str) -> AppResult<i64> {
    let id = sqlx::query(
        r#"
        INSERT INTO admins (username, password_hash) VALUES (?1, ?2)
        "#,
    )
    .bind(username)
    .bind(password_hash)
    .execute(db_pool)
    .await?
    .last_insert_rowid();
    tracing::info!("✅ Admin '{}' created.", username);
    Ok(id)
}

/// Creates the configured default admin when the table is empty.
/// Returns true when an admin was created.
pub async fn ensure_default_admin(db_pool: &SqlitePool, default_admin: &DefaultAdmin) -> AppResult<bool> {
    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM admins")
        .fetch_one(db_pool)
        .await?;
    if existing > 0 {
        tracing::debug!("{} admin account(s) present, skipping default admin", existing);
        return Ok(false);
    }

    let hash = auth_service::hash_password(&default_admin.password).await?;
    create_admin(db_pool, &default_admin.username, &hash).await?;
    tracing::warn!(
        "⚠️ Default admin '{}' created with the configured default password. Change it before going live!",
        default_admin.username
    );
    Ok(true)
}

/// Verifies a username/password pair. Unknown users and wrong passwords look the same.
pub async fn authenticate(db_pool: &SqlitePool, username: &str, password: &str) -> AppResult<Admin> {
    let Some(admin) = find_admin_by_username(db_pool, username).await? else {
        tracing::warn!("Login attempt for unknown admin '{}'", username);
        return Err(AppError::InvalidCredentials);
    };

    if auth_service::verify_password(password, &admin.password_hash).await? {
        Ok(admin)
    } else {
        tracing::warn!("Wrong password for admin '{}'", username);
        Err(AppError::InvalidCredentials)
    }
}
