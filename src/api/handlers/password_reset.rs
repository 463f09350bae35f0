use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::error::ApiError;
use crate::api::pages;
use crate::api::routes::ApiState;
use crate::errors::InkpostError;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResetRequestBody {
    #[validate(email(message = "Email must be a valid address"))]
    pub email: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResetConfirmBody {
    #[validate(length(min = 1, message = "Reset token is required"))]
    pub reset_password_token: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

#[utoipa::path(
    put,
    path = "/reset-password",
    request_body = ResetRequestBody,
    responses(
        (status = 200, description = "Reset link dispatched", body = MessageResponse),
        (status = 404, description = "No account with that email")
    ),
    tag = "password-reset"
)]
pub async fn request_reset_handler(
    State(state): State<ApiState>,
    Json(payload): Json<ResetRequestBody>,
) -> Result<Json<MessageResponse>, ApiError> {
    payload.validate().map_err(|err| ApiError::from(InkpostError::from(err)))?;

    state.reset.request_reset(&payload.email).await?;

    Ok(Json(MessageResponse {
        success: true,
        message: "A password-reset link was sent to your email".to_string(),
    }))
}

#[utoipa::path(
    get,
    path = "/reset-password-now/{token}",
    params(("token" = String, Path, description = "Reset token from the email link")),
    responses(
        (status = 200, description = "Static reset page", content_type = "text/html"),
        (status = 401, description = "Invalid or expired token, terminal HTML page", content_type = "text/html")
    ),
    tag = "password-reset"
)]
pub async fn reset_page_handler(
    State(state): State<ApiState>,
    Path(token): Path<String>,
) -> Response {
    match state.reset.token_is_valid(&token).await {
        Ok(true) => (StatusCode::OK, Html(pages::RESET_FORM_PAGE)).into_response(),
        Ok(false) => (StatusCode::UNAUTHORIZED, Html(pages::RESET_FAILURE_PAGE)).into_response(),
        Err(error) => {
            tracing::error!(%error, "reset token lookup failed");
            (StatusCode::INTERNAL_SERVER_ERROR, Html(pages::RESET_FAILURE_PAGE)).into_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/reset-password-now",
    request_body = ResetConfirmBody,
    responses(
        (status = 200, description = "Password replaced", body = MessageResponse),
        (status = 401, description = "Invalid or expired reset token")
    ),
    tag = "password-reset"
)]
pub async fn confirm_reset_handler(
    State(state): State<ApiState>,
    Json(payload): Json<ResetConfirmBody>,
) -> Result<Json<MessageResponse>, ApiError> {
    payload.validate().map_err(|err| ApiError::from(InkpostError::from(err)))?;

    state.reset.confirm_reset(&payload.reset_password_token, &payload.password).await?;

    Ok(Json(MessageResponse {
        success: true,
        message: "Your password was changed. You can now log in with it.".to_string(),
    }))
}
