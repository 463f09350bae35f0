//! End-to-end walk through the whole credential lifecycle for one account.

use axum::http::{Method, StatusCode};
use serde_json::{json, Value};

use crate::support::{read_json, send_request, setup_test_app, verification_code_for};

#[tokio::test]
async fn amy_registers_verifies_and_logs_in() {
    let app = setup_test_app().await;

    // Register
    let register = send_request(
        &app,
        Method::POST,
        "/register",
        None,
        Some(json!({ "username": "amy", "email": "a@x.com", "password": "Secret1!" })),
    )
    .await;
    assert_eq!(register.status(), StatusCode::CREATED);

    let verified: bool = sqlx::query_scalar("SELECT verified FROM accounts WHERE username = 'amy'")
        .fetch_one(&app.pool)
        .await
        .expect("fetch verified");
    assert!(!verified);

    // Verify with the wrong code first, then the correct one
    let wrong = send_request(&app, Method::GET, "/verify-now/0000", None, None).await;
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);

    let code = verification_code_for(&app.pool, "amy").await.expect("code present");
    let verify = send_request(&app, Method::GET, &format!("/verify-now/{}", code), None, None).await;
    assert_eq!(verify.status(), StatusCode::OK);

    let verified: bool = sqlx::query_scalar("SELECT verified FROM accounts WHERE username = 'amy'")
        .fetch_one(&app.pool)
        .await
        .expect("fetch verified");
    assert!(verified);

    // Authenticate with the right password, then the wrong one
    let login = send_request(
        &app,
        Method::POST,
        "/authenticate",
        None,
        Some(json!({ "username": "amy", "password": "Secret1!" })),
    )
    .await;
    assert_eq!(login.status(), StatusCode::OK);
    let body: Value = read_json(login).await;
    assert!(body["token"].as_str().is_some());

    let bad_login = send_request(
        &app,
        Method::POST,
        "/authenticate",
        None,
        Some(json!({ "username": "amy", "password": "nope" })),
    )
    .await;
    assert_eq!(bad_login.status(), StatusCode::UNAUTHORIZED);
}
