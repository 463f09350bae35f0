use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request},
    Router,
};
use chrono::{DateTime, Utc};
use hyper::Response;
use inkpost::{
    api::routes::build_router,
    config::AppConfig,
    notifier::{LogNotifier, Notifier},
    storage::{self, DbPool},
};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;

pub struct TestApp {
    pub pool: DbPool,
    pub config: AppConfig,
    pub notifier: Arc<dyn Notifier>,
}

impl TestApp {
    pub fn router(&self) -> Router {
        build_router(self.pool.clone(), &self.config, self.notifier.clone())
    }
}

pub async fn setup_test_app() -> TestApp {
    // A single connection keeps one private in-memory database alive for the
    // lifetime of the pool, isolated from other tests.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("create sqlite pool");

    storage::run_migrations(&pool).await.expect("run migrations for tests");

    TestApp { pool, config: AppConfig::default(), notifier: Arc::new(LogNotifier) }
}

pub async fn send_request(
    app: &TestApp,
    method: Method,
    path: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }

    let request = if let Some(json) = body {
        let bytes = serde_json::to_vec(&json).expect("serialize body");
        builder
            .header("content-type", "application/json")
            .body(Body::from(bytes))
            .expect("build request")
    } else {
        builder.body(Body::empty()).expect("build request")
    };

    app.router().oneshot(request).await.expect("request")
}

pub async fn read_json<T: DeserializeOwned>(response: Response<Body>) -> T {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("read body");
    serde_json::from_slice(&bytes).expect("parse json")
}

pub async fn read_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("read body");
    String::from_utf8(bytes.to_vec()).expect("utf8 body")
}

/// Register an account through the public API.
pub async fn register_account(app: &TestApp, username: &str, email: &str, password: &str) {
    use axum::http::StatusCode;

    let response = send_request(
        app,
        Method::POST,
        "/register",
        None,
        Some(json!({ "username": username, "email": email, "password": password })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED, "failed to register {}", username);
}

/// Read the pending verification code straight from the store.
pub async fn verification_code_for(pool: &DbPool, username: &str) -> Option<String> {
    sqlx::query_scalar("SELECT verification_code FROM accounts WHERE username = $1")
        .bind(username)
        .fetch_one(pool)
        .await
        .expect("fetch verification code")
}

/// Read the pending reset token straight from the store.
pub async fn reset_token_for(pool: &DbPool, email: &str) -> Option<String> {
    sqlx::query_scalar("SELECT reset_password_token FROM accounts WHERE email = $1")
        .bind(email)
        .fetch_one(pool)
        .await
        .expect("fetch reset token")
}

/// Read the reset token expiry straight from the store.
pub async fn reset_expiry_for(pool: &DbPool, email: &str) -> Option<DateTime<Utc>> {
    sqlx::query_scalar("SELECT reset_password_expires_at FROM accounts WHERE email = $1")
        .bind(email)
        .fetch_one(pool)
        .await
        .expect("fetch reset expiry")
}
