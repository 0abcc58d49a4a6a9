// src/web/mw_auth.rs
use crate::{
    error::AppError,
    state::AppState,
    web::flash::{set_flash, Flash, FlashLevel},
};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_cookies::Cookies;
use tower_sessions::Session;

// Session key written at login and removed at logout
pub const SESSION_ADMIN_KEY: &str = "admin_username";

// Logged-in admin, placed in the request extensions by `require_admin_login`
#[derive(Clone, Debug)]
pub struct AdminUsername(pub String);

/// Lets the request through only when the session belongs to a logged-in admin.
pub async fn require_admin_login(
    State(state): State<AppState>,
    session: Session,
    cookies: Cookies,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // The username is only present after a successful login
    match session.get::<String>(SESSION_ADMIN_KEY).await {
        Ok(Some(username)) => {
            tracing::debug!("Auth MW: admin '{}' authenticated", username);
            // Handlers behind this layer read it with Extension<AdminUsername>
            request.extensions_mut().insert(AdminUsername(username));
            Ok(next.run(request).await)
        }
        Ok(None) => {
            // Not logged in: warn on the login page and send them there
            tracing::debug!("Auth MW: no admin session, redirecting to /admin/login");
            set_flash(
                &cookies,
                &state.cookie_key,
                Flash::new(FlashLevel::Warning, "Please login to access dashboard."),
            );
            Ok(Redirect::to("/admin/login").into_response())
        }
        Err(e) => {
            // Session store unreachable or the record is corrupt
            tracing::error!("Auth MW: failed to read session: {:?}", e);
            Err(AppError::SessionError(format!("Failed to check session: {}", e)))
        }
    }
}
