use axum::http::{Method, StatusCode};
use serde_json::{json, Value};

use crate::support::{read_json, register_account, send_request, setup_test_app};

#[tokio::test]
async fn login_issues_token_that_resolves_identity() {
    let app = setup_test_app().await;
    register_account(&app, "amy", "a@x.com", "Secret1!").await;

    let response = send_request(
        &app,
        Method::POST,
        "/authenticate",
        None,
        Some(json!({ "username": "amy", "password": "Secret1!" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = read_json(response).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["user"]["username"], json!("amy"));
    let token = body["token"].as_str().expect("token present").to_string();

    let whoami = send_request(&app, Method::GET, "/authenticate", Some(&token), None).await;
    assert_eq!(whoami.status(), StatusCode::OK);
    let identity: Value = read_json(whoami).await;
    assert_eq!(identity["user"]["username"], json!("amy"));
    assert_eq!(identity["user"]["email"], json!("a@x.com"));
}

#[tokio::test]
async fn unknown_username_reports_not_found() {
    let app = setup_test_app().await;

    let response = send_request(
        &app,
        Method::POST,
        "/authenticate",
        None,
        Some(json!({ "username": "nobody", "password": "Secret1!" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = read_json(response).await;
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let app = setup_test_app().await;
    register_account(&app, "amy", "a@x.com", "Secret1!").await;

    let response = send_request(
        &app,
        Method::POST,
        "/authenticate",
        None,
        Some(json!({ "username": "amy", "password": "wrong-password" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn protected_route_rejects_missing_and_garbage_tokens() {
    let app = setup_test_app().await;

    let missing = send_request(&app, Method::GET, "/authenticate", None, None).await;
    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

    let garbage = send_request(&app, Method::GET, "/authenticate", Some("not.a.token"), None).await;
    assert_eq!(garbage.status(), StatusCode::UNAUTHORIZED);
}
