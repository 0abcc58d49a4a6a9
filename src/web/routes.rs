// src/web/routes.rs
use crate::{
    state::AppState,
    web::{admin_handlers, api_handlers, auth_handlers, mw_auth, public_handlers},
};
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use time::Duration;
use tower::ServiceBuilder;
use tower_cookies::CookieManagerLayer;
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, SessionManagerLayer, SessionStore};

pub fn create_router(app_state: AppState) -> Router {
    // --- Public routes ---
    let public_routes = Router::new()
        .route("/", get(public_handlers::index_page))
        .route(
            "/register",
            get(public_handlers::show_register_form).post(public_handlers::handle_register),
        )
        .route(
            "/admin/login",
            get(auth_handlers::show_login_form).post(auth_handlers::handle_login),
        )
        .route("/admin/logout", get(auth_handlers::handle_logout));

    // --- Admin routes (session required) ---
    let admin_routes = Router::new()
        .route("/admin/dashboard", get(admin_handlers::show_dashboard))
        .route(
            "/admin/api/student/{id}/status",
            post(api_handlers::change_student_status),
        )
        .route("/admin/api/stats", get(api_handlers::admission_stats))
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            mw_auth::require_admin_login,
        ));

    Router::new()
        .merge(public_routes)
        .merge(admin_routes)
        .with_state(app_state)
}

/// Router with tracing, cookie and session layers applied.
pub fn build_app<S>(app_state: AppState, session_store: S, secure_cookies: bool) -> Router
where
    S: SessionStore + Clone,
{
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(secure_cookies)
        .with_http_only(true)
        .with_expiry(Expiry::OnInactivity(Duration::days(1)));

    create_router(app_state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CookieManagerLayer::new())
            .layer(session_layer),
    )
}
