use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use crate::errors::InkpostError;

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized(String),
    NotFound(String),
    Internal(String),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let message = match self {
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::NotFound(msg)
            | ApiError::Internal(msg) => msg,
        };

        (status, Json(ErrorBody { success: false, message })).into_response()
    }
}

impl From<InkpostError> for ApiError {
    fn from(err: InkpostError) -> Self {
        match err {
            InkpostError::Validation { message, .. } => ApiError::BadRequest(message),
            // Duplicate username/email registrations report as 400 on this API
            InkpostError::Conflict { message, .. } => ApiError::BadRequest(message),
            InkpostError::NotFound { resource_type, id } => {
                ApiError::NotFound(format!("{} '{}' not found", resource_type, id))
            }
            InkpostError::Auth { message, .. } => ApiError::Unauthorized(message),
            InkpostError::Database { source, context } => {
                // Uniqueness races lose at the UNIQUE constraint and surface here
                if let Some(db_err) = source.as_database_error() {
                    if let Some(code) = db_err.code() {
                        if code.as_ref() == "2067" || code.as_ref().starts_with("SQLITE_CONSTRAINT")
                        {
                            return ApiError::BadRequest(
                                "Username or email is already taken".to_string(),
                            );
                        }
                    }
                }
                ApiError::Internal(context)
            }
            InkpostError::Serialization { context, .. } => ApiError::BadRequest(context),
            InkpostError::Config { message } | InkpostError::Internal { message } => {
                ApiError::Internal(message)
            }
            InkpostError::Io { context, .. } => ApiError::Internal(context),
        }
    }
}
