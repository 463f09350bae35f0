use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::error::ApiError;
use crate::api::pages;
use crate::api::routes::ApiState;
use crate::auth::models::{Account, CurrentAccount, LoginRequest, RegisterRequest};
use crate::errors::InkpostError;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterBody {
    #[validate(length(min = 3, max = 32, message = "Username must be 3 to 32 characters"))]
    pub username: String,
    #[validate(email(message = "Email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    pub name: Option<String>,
}

impl RegisterBody {
    fn into_request(self) -> RegisterRequest {
        RegisterRequest {
            username: self.username,
            email: self.email,
            password: self.password,
            name: self.name,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginBody {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub success: bool,
    pub message: String,
    pub user: Account,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub user: Account,
    pub token: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IdentityResponse {
    pub success: bool,
    pub user: CurrentAccount,
}

#[utoipa::path(
    post,
    path = "/register",
    request_body = RegisterBody,
    responses(
        (status = 201, description = "Account created, verification email dispatched", body = RegisterResponse),
        (status = 400, description = "Validation error or duplicate username/email")
    ),
    tag = "accounts"
)]
pub async fn register_handler(
    State(state): State<ApiState>,
    Json(payload): Json<RegisterBody>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    payload.validate().map_err(|err| ApiError::from(InkpostError::from(err)))?;

    let account = state.registration.register(payload.into_request()).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            success: true,
            message: "Your account was created. Please check your email to verify it.".to_string(),
            user: account,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/verify-now/{verificationCode}",
    params(("verificationCode" = String, Path, description = "One-time verification code from the email link")),
    responses(
        (status = 200, description = "Account verified, terminal HTML page", content_type = "text/html"),
        (status = 401, description = "Unknown or already-consumed code, terminal HTML page", content_type = "text/html")
    ),
    tag = "accounts"
)]
pub async fn verify_email_handler(
    State(state): State<ApiState>,
    Path(code): Path<String>,
) -> Response {
    match state.registration.verify_email(&code).await {
        Ok(_) => (StatusCode::OK, Html(pages::VERIFY_SUCCESS_PAGE)).into_response(),
        Err(InkpostError::Auth { .. }) => {
            (StatusCode::UNAUTHORIZED, Html(pages::VERIFY_FAILURE_PAGE)).into_response()
        }
        Err(error) => {
            tracing::error!(%error, "verification lookup failed");
            (StatusCode::INTERNAL_SERVER_ERROR, Html(pages::VERIFY_FAILURE_PAGE)).into_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/authenticate",
    request_body = LoginBody,
    responses(
        (status = 200, description = "Authenticated, bearer token issued", body = LoginResponse),
        (status = 404, description = "Username not found"),
        (status = 401, description = "Incorrect password")
    ),
    tag = "accounts"
)]
pub async fn login_handler(
    State(state): State<ApiState>,
    Json(payload): Json<LoginBody>,
) -> Result<Json<LoginResponse>, ApiError> {
    payload.validate().map_err(|err| ApiError::from(InkpostError::from(err)))?;

    let request = LoginRequest { username: payload.username, password: payload.password };
    let (account, token) = state.login.login(&request).await?;

    Ok(Json(LoginResponse {
        success: true,
        message: "You are now logged in".to_string(),
        user: account,
        token,
    }))
}

#[utoipa::path(
    get,
    path = "/authenticate",
    responses(
        (status = 200, description = "The authenticated account's identity", body = IdentityResponse),
        (status = 401, description = "Missing, malformed, invalid, or expired bearer token")
    ),
    security(("bearerAuth" = [])),
    tag = "accounts"
)]
pub async fn whoami_handler(
    Extension(account): Extension<CurrentAccount>,
) -> Json<IdentityResponse> {
    Json(IdentityResponse { success: true, user: account })
}
