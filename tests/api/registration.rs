use axum::http::{Method, StatusCode};
use serde_json::{json, Value};

use crate::support::{
    read_json, read_text, register_account, send_request, setup_test_app, verification_code_for,
};

#[tokio::test]
async fn register_creates_unverified_account_with_code() {
    let app = setup_test_app().await;

    let response = send_request(
        &app,
        Method::POST,
        "/register",
        None,
        Some(json!({
            "username": "amy",
            "email": "a@x.com",
            "password": "Secret1!",
            "name": "Amy"
        })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = read_json(response).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["user"]["username"], json!("amy"));
    assert_eq!(body["user"]["name"], json!("Amy"));
    assert_eq!(body["user"]["verified"], json!(false));
    // Sensitive fields never leave the server
    assert!(body["user"].get("passwordHash").is_none());
    assert!(body["user"].get("verificationCode").is_none());

    let code = verification_code_for(&app.pool, "amy").await;
    assert!(code.is_some());
    assert_eq!(code.unwrap().len(), 40);
}

#[tokio::test]
async fn duplicate_username_and_email_are_rejected() {
    let app = setup_test_app().await;
    register_account(&app, "amy", "a@x.com", "Secret1!").await;

    let duplicate_username = send_request(
        &app,
        Method::POST,
        "/register",
        None,
        Some(json!({ "username": "amy", "email": "other@x.com", "password": "Secret1!" })),
    )
    .await;
    assert_eq!(duplicate_username.status(), StatusCode::BAD_REQUEST);
    let body: Value = read_json(duplicate_username).await;
    assert_eq!(body["success"], json!(false));

    let duplicate_email = send_request(
        &app,
        Method::POST,
        "/register",
        None,
        Some(json!({ "username": "bob", "email": "a@x.com", "password": "Secret1!" })),
    )
    .await;
    assert_eq!(duplicate_email.status(), StatusCode::BAD_REQUEST);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM accounts")
        .fetch_one(&app.pool)
        .await
        .expect("count accounts");
    assert_eq!(count, 1);
}

#[tokio::test]
async fn malformed_registration_is_a_validation_error() {
    let app = setup_test_app().await;

    let response = send_request(
        &app,
        Method::POST,
        "/register",
        None,
        Some(json!({ "username": "amy", "email": "not-an-email", "password": "Secret1!" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn verification_code_is_single_use() {
    let app = setup_test_app().await;
    register_account(&app, "amy", "a@x.com", "Secret1!").await;

    // Wrong code renders the failure page
    let wrong = send_request(&app, Method::GET, "/verify-now/deadbeef", None, None).await;
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
    assert!(read_text(wrong).await.contains("Verification failed"));

    let code = verification_code_for(&app.pool, "amy").await.expect("code present");

    let success =
        send_request(&app, Method::GET, &format!("/verify-now/{}", code), None, None).await;
    assert_eq!(success.status(), StatusCode::OK);
    assert!(read_text(success).await.contains("verified"));

    let verified: bool = sqlx::query_scalar("SELECT verified FROM accounts WHERE username = 'amy'")
        .fetch_one(&app.pool)
        .await
        .expect("fetch verified");
    assert!(verified);
    assert!(verification_code_for(&app.pool, "amy").await.is_none());

    // The now-stale code cannot be presented again
    let replay =
        send_request(&app, Method::GET, &format!("/verify-now/{}", code), None, None).await;
    assert_eq!(replay.status(), StatusCode::UNAUTHORIZED);
}
