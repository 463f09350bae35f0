//! # Authentication and Credential Lifecycle
//!
//! Registration with email verification, username/password login issuing a
//! bearer token, and the two-phase password-reset flow. All flows operate
//! over the account repository in [`crate::storage`].

pub mod auth_service;
pub mod hashing;
pub mod jwt;
pub mod login_service;
pub mod middleware;
pub mod models;
pub mod password_reset_service;
pub mod registration_service;

pub use auth_service::AuthService;
pub use jwt::{Claims, TokenIssuer};
pub use login_service::LoginService;
pub use models::{Account, CurrentAccount, LoginRequest, NewAccount, RegisterRequest};
pub use password_reset_service::PasswordResetService;
pub use registration_service::RegistrationService;
