//! # Configuration Management
//!
//! Typed application configuration built once at startup from the process
//! environment and injected into every component.

mod settings;

pub use settings::{AppConfig, AuthConfig, DatabaseConfig, ServerConfig, SmtpConfig};
