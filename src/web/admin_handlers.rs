// src/web/admin_handlers.rs
use crate::{
    error::AppResult,
    services::student_service,
    state::AppState,
    templates::AdminDashboardPage,
    web::{flash::take_flash, mw_auth::AdminUsername},
};
use askama::Template;
use axum::{
    extract::{Extension, State},
    response::Html,
};
use tower_cookies::Cookies;

// GET /admin/dashboard
pub async fn show_dashboard(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminUsername>,
    cookies: Cookies,
) -> AppResult<Html<String>> {
    tracing::debug!("GET /admin/dashboard for '{}'", admin.0);

    let students = student_service::find_all_students(&state.db_pool).await?;
    let counts = student_service::status_counts(&state.db_pool).await?;

    let page = AdminDashboardPage {
        admin_username: admin.0,
        students,
        counts,
        flash: take_flash(&cookies, &state.cookie_key),
    };
    Ok(Html(page.render()?))
}
