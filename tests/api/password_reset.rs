use axum::http::{Method, StatusCode};
use chrono::{Duration, Utc};
use serde_json::{json, Value};

use crate::support::{
    read_json, read_text, register_account, reset_expiry_for, reset_token_for, send_request,
    setup_test_app,
};

#[tokio::test]
async fn request_sets_token_and_expiry() {
    let app = setup_test_app().await;
    register_account(&app, "amy", "a@x.com", "Secret1!").await;

    let response = send_request(
        &app,
        Method::PUT,
        "/reset-password",
        None,
        Some(json!({ "email": "a@x.com" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let token = reset_token_for(&app.pool, "a@x.com").await;
    let expiry = reset_expiry_for(&app.pool, "a@x.com").await;
    assert!(token.is_some());

    // Expiry honors the configured TTL
    let ttl = Duration::seconds(app.config.auth.reset_token_ttl_seconds as i64);
    let expiry = expiry.expect("expiry present");
    assert!(expiry > Utc::now() + ttl - Duration::seconds(60));
    assert!(expiry <= Utc::now() + ttl);
}

#[tokio::test]
async fn unknown_email_reports_not_found() {
    let app = setup_test_app().await;

    let response = send_request(
        &app,
        Method::PUT,
        "/reset-password",
        None,
        Some(json!({ "email": "nobody@x.com" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn second_request_invalidates_previous_token() {
    let app = setup_test_app().await;
    register_account(&app, "amy", "a@x.com", "Secret1!").await;

    send_request(&app, Method::PUT, "/reset-password", None, Some(json!({ "email": "a@x.com" })))
        .await;
    let old_token = reset_token_for(&app.pool, "a@x.com").await.expect("first token");

    send_request(&app, Method::PUT, "/reset-password", None, Some(json!({ "email": "a@x.com" })))
        .await;
    let new_token = reset_token_for(&app.pool, "a@x.com").await.expect("second token");
    assert_ne!(old_token, new_token);

    let stale =
        send_request(&app, Method::GET, &format!("/reset-password-now/{}", old_token), None, None)
            .await;
    assert_eq!(stale.status(), StatusCode::UNAUTHORIZED);

    let fresh =
        send_request(&app, Method::GET, &format!("/reset-password-now/{}", new_token), None, None)
            .await;
    assert_eq!(fresh.status(), StatusCode::OK);
    assert!(read_text(fresh).await.contains("new password"));
}

#[tokio::test]
async fn confirm_replaces_password_exactly_once() {
    let app = setup_test_app().await;
    register_account(&app, "amy", "a@x.com", "Secret1!").await;

    send_request(&app, Method::PUT, "/reset-password", None, Some(json!({ "email": "a@x.com" })))
        .await;
    let token = reset_token_for(&app.pool, "a@x.com").await.expect("token");

    let confirm = send_request(
        &app,
        Method::POST,
        "/reset-password-now",
        None,
        Some(json!({ "resetPasswordToken": token, "password": "NewSecret1!" })),
    )
    .await;
    assert_eq!(confirm.status(), StatusCode::OK);
    let body: Value = read_json(confirm).await;
    assert_eq!(body["success"], json!(true));

    // Both reset fields cleared together
    assert!(reset_token_for(&app.pool, "a@x.com").await.is_none());
    assert!(reset_expiry_for(&app.pool, "a@x.com").await.is_none());

    // Old password no longer works, new one does
    let old_login = send_request(
        &app,
        Method::POST,
        "/authenticate",
        None,
        Some(json!({ "username": "amy", "password": "Secret1!" })),
    )
    .await;
    assert_eq!(old_login.status(), StatusCode::UNAUTHORIZED);

    let new_login = send_request(
        &app,
        Method::POST,
        "/authenticate",
        None,
        Some(json!({ "username": "amy", "password": "NewSecret1!" })),
    )
    .await;
    assert_eq!(new_login.status(), StatusCode::OK);

    // Token cannot be replayed
    let replay = send_request(
        &app,
        Method::POST,
        "/reset-password-now",
        None,
        Some(json!({ "resetPasswordToken": token, "password": "AnotherSecret1!" })),
    )
    .await;
    assert_eq!(replay.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn expired_token_is_rejected_even_when_it_matches() {
    let app = setup_test_app().await;
    register_account(&app, "amy", "a@x.com", "Secret1!").await;

    send_request(&app, Method::PUT, "/reset-password", None, Some(json!({ "email": "a@x.com" })))
        .await;
    let token = reset_token_for(&app.pool, "a@x.com").await.expect("token");

    // Force the expiry into the past
    sqlx::query("UPDATE accounts SET reset_password_expires_at = $1 WHERE email = 'a@x.com'")
        .bind(Utc::now() - Duration::seconds(1))
        .execute(&app.pool)
        .await
        .expect("expire token");

    let page =
        send_request(&app, Method::GET, &format!("/reset-password-now/{}", token), None, None)
            .await;
    assert_eq!(page.status(), StatusCode::UNAUTHORIZED);

    let confirm = send_request(
        &app,
        Method::POST,
        "/reset-password-now",
        None,
        Some(json!({ "resetPasswordToken": token, "password": "NewSecret1!" })),
    )
    .await;
    assert_eq!(confirm.status(), StatusCode::UNAUTHORIZED);
}
