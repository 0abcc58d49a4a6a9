// src/web/mod.rs
pub mod admin_handlers;
pub mod api_handlers;
pub mod auth_handlers;
pub mod flash;
pub mod mw_auth;
pub mod public_handlers;
pub mod routes;
