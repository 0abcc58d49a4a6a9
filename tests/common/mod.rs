// tests/common/mod.rs
#![allow(dead_code)]

use admission_portal::{
    db,
    notifications::{MailSender, NotificationError, Notifier, SmsSender},
    services::{admin_service, auth_service},
    state::AppState,
    web::routes::build_app,
};
use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, Response, StatusCode},
    Router,
};
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::ServiceExt;
use tower_cookies::Key;
use tower_sessions::MemoryStore;

pub const ADMIN_USER: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin123";

#[derive(Default)]
pub struct FakeMailer {
    pub subjects: Mutex<Vec<(String, String)>>,
    pub fail: bool,
}

#[async_trait]
impl MailSender for FakeMailer {
    async fn send_mail(&self, to: &str, subject: &str, _html_body: &str) -> Result<(), NotificationError> {
        self.subjects
            .lock()
            .unwrap()
            .push((to.to_string(), subject.to_string()));
        if self.fail {
            Err(NotificationError::Mail("connection refused".to_string()))
        } else {
            Ok(())
        }
    }
}

#[derive(Default)]
pub struct FakeSms {
    pub texts: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl SmsSender for FakeSms {
    async fn send_sms(&self, to: &str, body: &str) -> Result<(), NotificationError> {
        self.texts.lock().unwrap().push((to.to_string(), body.to_string()));
        Ok(())
    }
}

pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
    pub mailer: Arc<FakeMailer>,
    pub sms: Arc<FakeSms>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::with_mailer(FakeMailer::default()).await
    }

    pub async fn with_mailer(mailer: FakeMailer) -> Self {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory sqlite opens");
        db::run_migrations(&pool).await.expect("migrations apply");

        let hash = auth_service::hash_password_with_cost(ADMIN_PASSWORD, 4)
            .await
            .expect("hash");
        admin_service::create_admin(&pool, ADMIN_USER, &hash)
            .await
            .expect("admin created");

        let mailer = Arc::new(mailer);
        let sms = Arc::new(FakeSms::default());
        let state = AppState {
            db_pool: pool.clone(),
            notifier: Notifier::new(mailer.clone(), Some(sms.clone())),
            cookie_key: Key::generate(),
        };

        TestApp {
            router: build_app(state, MemoryStore::default(), false),
            pool,
            mailer,
            sms,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    /// Logs in and returns the Cookie header to reuse.
    pub async fn login(&self) -> String {
        let response = self
            .send(form_request(
                "/admin/login",
                &format!("username={}&password={}", ADMIN_USER, ADMIN_PASSWORD),
                None,
            ))
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/admin/dashboard");
        cookie_header(&response)
    }

    pub fn mail_subjects(&self) -> Vec<(String, String)> {
        self.mailer.subjects.lock().unwrap().clone()
    }

    pub fn sms_texts(&self) -> Vec<(String, String)> {
        self.sms.texts.lock().unwrap().clone()
    }
}

pub fn form_request(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::post(uri).header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn json_request(uri: &str, body: serde_json::Value, cookie: &str) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::COOKIE, cookie)
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get_request(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::get(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn location(response: &Response<Body>) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// Turns every Set-Cookie of a response into one Cookie request header.
pub fn cookie_header(response: &Response<Body>) -> String {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.split(';').next())
        .collect::<Vec<_>>()
        .join("; ")
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

// Notifications run on detached tasks.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(100)).await;
}
