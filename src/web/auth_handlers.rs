// src/web/auth_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::admin::LoginForm,
    services::admin_service,
    state::AppState,
    templates::LoginPage,
    web::{
        flash::{set_flash, take_flash, Flash, FlashLevel},
        mw_auth::SESSION_ADMIN_KEY,
    },
};
use askama::Template;
use axum::{
    extract::{Form, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect},
};
use tower_cookies::Cookies;
use tower_sessions::Session;

// GET /admin/login
pub async fn show_login_form(
    State(state): State<AppState>,
    session: Session,
    cookies: Cookies,
) -> AppResult<impl IntoResponse> {
    if session.get::<String>(SESSION_ADMIN_KEY).await.ok().flatten().is_some() {
        tracing::debug!("GET /admin/login: already logged in, redirecting to dashboard");
        return Ok(Redirect::to("/admin/dashboard").into_response());
    }

    let page = LoginPage {
        flash: take_flash(&cookies, &state.cookie_key),
        error: None,
    };
    Ok(Html(page.render()?).into_response())
}

// POST /admin/login
pub async fn handle_login(
    State(state): State<AppState>,
    session: Session,
    cookies: Cookies,
    Form(form): Form<LoginForm>,
) -> AppResult<impl IntoResponse> {
    tracing::info!("Login attempt for admin '{}'", form.username);

    match admin_service::authenticate(&state.db_pool, form.username.trim(), &form.password).await {
        Ok(admin) => {
            session
                .cycle_id()
                .await
                .map_err(|e| AppError::SessionError(format!("Failed to cycle id: {}", e)))?;
            session
                .insert(SESSION_ADMIN_KEY, &admin.username)
                .await
                .map_err(|e| AppError::SessionError(format!("Failed to write session: {}", e)))?;

            tracing::info!("✅ Admin '{}' logged in", admin.username);
            set_flash(
                &cookies,
                &state.cookie_key,
                Flash::new(FlashLevel::Success, "🎉 Welcome back, Admin!"),
            );
            Ok(Redirect::to("/admin/dashboard").into_response())
        }
        Err(AppError::InvalidCredentials) => {
            let page = LoginPage {
                flash: None,
                error: Some("❌ Invalid username or password".to_string()),
            };
            Ok((StatusCode::UNAUTHORIZED, Html(page.render()?)).into_response())
        }
        Err(e) => Err(e),
    }
}

// GET /admin/logout
pub async fn handle_logout(
    State(state): State<AppState>,
    session: Session,
    cookies: Cookies,
) -> AppResult<Redirect> {
    let username: Option<String> = session.get(SESSION_ADMIN_KEY).await.ok().flatten();

    session
        .delete()
        .await
        .map_err(|e| AppError::SessionError(format!("Failed to delete session: {}", e)))?;

    match username {
        Some(name) => tracing::info!("🚪 Admin '{}' logged out.", name),
        None => tracing::info!("🚪 Anonymous session closed."),
    }

    set_flash(
        &cookies,
        &state.cookie_key,
        Flash::new(FlashLevel::Info, "🔒 Logged out successfully."),
    );
    Ok(Redirect::to("/admin/login"))
}
