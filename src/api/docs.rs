use axum::Router;
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::handlers::health::health_handler,
        crate::api::handlers::accounts::register_handler,
        crate::api::handlers::accounts::verify_email_handler,
        crate::api::handlers::accounts::login_handler,
        crate::api::handlers::accounts::whoami_handler,
        crate::api::handlers::password_reset::request_reset_handler,
        crate::api::handlers::password_reset::reset_page_handler,
        crate::api::handlers::password_reset::confirm_reset_handler
    ),
    components(schemas(
        crate::api::handlers::health::HealthResponse,
        crate::api::handlers::accounts::RegisterBody,
        crate::api::handlers::accounts::RegisterResponse,
        crate::api::handlers::accounts::LoginBody,
        crate::api::handlers::accounts::LoginResponse,
        crate::api::handlers::accounts::IdentityResponse,
        crate::api::handlers::password_reset::ResetRequestBody,
        crate::api::handlers::password_reset::ResetConfirmBody,
        crate::api::handlers::password_reset::MessageResponse,
        crate::auth::models::Account,
        crate::auth::models::CurrentAccount,
        crate::domain::AccountId
    )),
    tags(
        (name = "accounts", description = "Registration, verification, and login"),
        (name = "password-reset", description = "Two-phase password reset"),
        (name = "health", description = "Service readiness")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};

        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearerAuth",
            SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
        );
    }
}

pub fn docs_router() -> Router {
    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()).into()
}
