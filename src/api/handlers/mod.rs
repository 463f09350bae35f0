pub mod accounts;
pub mod health;
pub mod password_reset;

pub use accounts::{
    login_handler, register_handler, verify_email_handler, whoami_handler, IdentityResponse,
    LoginBody, LoginResponse, RegisterBody, RegisterResponse,
};
pub use health::{health_handler, HealthResponse};
pub use password_reset::{
    confirm_reset_handler, request_reset_handler, reset_page_handler, MessageResponse,
    ResetConfirmBody, ResetRequestBody,
};
