// src/state.rs
use crate::notifications::Notifier;
use sqlx::SqlitePool;
use tower_cookies::Key;

/// Shared by every handler. All fields are cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub notifier: Notifier,
    // Signs the flash cookie
    pub cookie_key: Key,
}

impl AppState {
    /// Flash cookie key from the configured secret. A missing or short secret
    /// falls back to a random key, which invalidates pending flashes on restart.
    pub fn cookie_key_from(secret: Option<&str>) -> Key {
        match secret.map(|s| Key::try_from(s.as_bytes())) {
            Some(Ok(key)) => key,
            Some(Err(_)) => {
                tracing::warn!("⚠️ SESSION_SECRET is shorter than 64 bytes, using a random cookie key");
                Key::generate()
            }
            None => {
                tracing::warn!("⚠️ SESSION_SECRET not set, using a random cookie key");
                Key::generate()
            }
        }
    }
}

impl axum::extract::FromRef<AppState> for SqlitePool {
    fn from_ref(state: &AppState) -> SqlitePool {
        state.db_pool.clone()
    }
}

impl axum::extract::FromRef<AppState> for Notifier {
    fn from_ref(state: &AppState) -> Notifier {
        state.notifier.clone()
    }
}

impl axum::extract::FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Key {
        state.cookie_key.clone()
    }
}
