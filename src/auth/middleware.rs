//! Axum middleware guarding protected routes with bearer authentication.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::api::error::ApiError;
use crate::auth::auth_service::AuthService;

/// Authenticate the request's bearer token and attach the resolved
/// [`CurrentAccount`](crate::auth::models::CurrentAccount) as an extension.
pub async fn authenticate(
    State(auth_service): State<Arc<AuthService>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string());

    let account = auth_service.authenticate(header.as_deref()).await?;

    request.extensions_mut().insert(account);
    Ok(next.run(request).await)
}
