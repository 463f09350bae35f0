use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{
    auth_service::AuthService, login_service::LoginService, middleware::authenticate,
    password_reset_service::PasswordResetService, registration_service::RegistrationService,
};
use crate::config::AppConfig;
use crate::notifier::Notifier;
use crate::storage::DbPool;

use super::{
    docs,
    handlers::{
        confirm_reset_handler, health_handler, login_handler, register_handler,
        request_reset_handler, reset_page_handler, verify_email_handler, whoami_handler,
    },
};

#[derive(Clone)]
pub struct ApiState {
    pub pool: DbPool,
    pub registration: RegistrationService,
    pub login: LoginService,
    pub reset: PasswordResetService,
}

pub fn build_router(pool: DbPool, config: &AppConfig, notifier: Arc<dyn Notifier>) -> Router {
    let api_state = ApiState {
        pool: pool.clone(),
        registration: RegistrationService::with_sqlx(
            pool.clone(),
            notifier.clone(),
            config.server.clone(),
        ),
        login: LoginService::with_sqlx(pool.clone(), &config.auth),
        reset: PasswordResetService::with_sqlx(
            pool.clone(),
            notifier,
            config.server.clone(),
            &config.auth,
        ),
    };

    let auth_layer = {
        let auth_service = Arc::new(AuthService::with_sqlx(pool, &config.auth));
        middleware::from_fn_with_state(auth_service, authenticate)
    };

    let public = Router::new()
        .route("/register", post(register_handler))
        .route("/verify-now/{code}", get(verify_email_handler))
        .route("/authenticate", post(login_handler))
        .route("/reset-password", put(request_reset_handler))
        .route("/reset-password-now/{token}", get(reset_page_handler))
        .route("/reset-password-now", post(confirm_reset_handler))
        .route("/health", get(health_handler));

    // GET /authenticate shares a path with the public login POST; merging
    // separate routers lets only the GET carry the bearer-auth layer.
    let protected =
        Router::new().route("/authenticate", get(whoami_handler)).route_layer(auth_layer);

    Router::new()
        .merge(public)
        .merge(protected)
        .with_state(api_state)
        .merge(docs::docs_router())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
