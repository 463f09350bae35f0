//! # Configuration Settings
//!
//! Defines the configuration structure for the Inkpost backend.

use crate::errors::{InkpostError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use validator::Validate;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
pub struct AppConfig {
    /// HTTP server configuration
    #[validate(nested)]
    pub server: ServerConfig,

    /// Database configuration
    #[validate(nested)]
    pub database: DatabaseConfig,

    /// Authentication configuration
    #[validate(nested)]
    pub auth: AuthConfig,

    /// Outbound email configuration
    #[validate(nested)]
    pub smtp: SmtpConfig,
}

impl AppConfig {
    /// Build the full configuration from environment variables and validate it.
    pub fn from_env() -> Result<Self> {
        let config = Self {
            server: ServerConfig::from_env(),
            database: DatabaseConfig::from_env(),
            auth: AuthConfig::from_env(),
            smtp: SmtpConfig::from_env(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        Validate::validate(self).map_err(InkpostError::from)?;
        self.validate_custom()?;
        Ok(())
    }

    /// Custom validation logic that goes beyond what the validator crate can do
    fn validate_custom(&self) -> Result<()> {
        if !self.database.url.starts_with("sqlite://") && !self.database.url.starts_with("sqlite:")
        {
            return Err(InkpostError::validation("Database URL must start with 'sqlite:'"));
        }

        if self.auth.jwt_secret.len() < 32 {
            return Err(InkpostError::validation(
                "JWT secret must be at least 32 characters long",
            ));
        }

        Ok(())
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ServerConfig {
    /// Server bind address
    #[validate(length(min = 1, message = "Host cannot be empty"))]
    pub host: String,

    /// Server port
    #[validate(range(min = 1, max = 65535, message = "Port must be between 1 and 65535"))]
    pub port: u16,

    /// Public base URL embedded in email links, e.g. `https://blog.example.com`
    #[validate(length(min = 1, message = "Public domain cannot be empty"))]
    pub public_domain: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            public_domain: "http://localhost:5000".to_string(),
        }
    }
}

impl ServerConfig {
    /// Get the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Create ServerConfig from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let host = std::env::var("HOST").unwrap_or(defaults.host);
        let port = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(defaults.port);
        let public_domain = std::env::var("APP_DOMAIN")
            .unwrap_or_else(|_| format!("http://{}:{}", host, port));

        Self { host, port, public_domain }
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DatabaseConfig {
    /// Database connection URL
    #[validate(length(min = 1, message = "Database URL cannot be empty"))]
    pub url: String,

    /// Maximum number of connections in the pool
    #[validate(range(min = 1, max = 100, message = "Max connections must be between 1 and 100"))]
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    #[validate(range(max = 50, message = "Min connections must be at most 50"))]
    pub min_connections: u32,

    /// Connection timeout in seconds
    #[validate(range(
        min = 1,
        max = 60,
        message = "Connect timeout must be between 1 and 60 seconds"
    ))]
    pub connect_timeout_seconds: u64,

    /// Idle timeout in seconds (0 = no timeout)
    pub idle_timeout_seconds: u64,

    /// Enable automatic migrations on startup
    pub auto_migrate: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://./data/inkpost.db".to_string(),
            max_connections: 10,
            min_connections: 0,
            connect_timeout_seconds: 10,
            idle_timeout_seconds: 600,
            auto_migrate: true,
        }
    }
}

impl DatabaseConfig {
    /// Get connection timeout as Duration
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_seconds)
    }

    /// Get idle timeout as Duration (None if 0)
    pub fn idle_timeout(&self) -> Option<Duration> {
        if self.idle_timeout_seconds == 0 {
            None
        } else {
            Some(Duration::from_secs(self.idle_timeout_seconds))
        }
    }

    /// Create DatabaseConfig from environment variables
    pub fn from_env() -> Self {
        let url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://./data/inkpost.db".to_string());

        let max_connections = std::env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(10);

        let min_connections = std::env::var("DATABASE_MIN_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(0);

        let connect_timeout_seconds = std::env::var("DATABASE_CONNECT_TIMEOUT_SECONDS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(10);

        let idle_timeout_seconds = std::env::var("DATABASE_IDLE_TIMEOUT_SECONDS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(600);

        let auto_migrate = std::env::var("DATABASE_AUTO_MIGRATE")
            .map(|s| s.to_lowercase() == "true" || s == "1")
            .unwrap_or(true);

        Self {
            url,
            max_connections,
            min_connections,
            connect_timeout_seconds,
            idle_timeout_seconds,
            auto_migrate,
        }
    }
}

/// Authentication and credential configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AuthConfig {
    /// Secret used to sign and verify bearer tokens
    #[validate(length(min = 1, message = "JWT secret cannot be empty"))]
    pub jwt_secret: String,

    /// Bearer token expiry in seconds
    #[validate(range(
        min = 300,
        max = 604800,
        message = "Token expiry must be between 5 minutes and 7 days"
    ))]
    pub token_expiry_seconds: u64,

    /// Password-reset token validity window in seconds
    #[validate(range(
        min = 60,
        max = 86400,
        message = "Reset token TTL must be between 1 minute and 24 hours"
    ))]
    pub reset_token_ttl_seconds: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "inkpost-default-secret-please-change-in-production".to_string(),
            token_expiry_seconds: 3600,
            reset_token_ttl_seconds: 3600,
        }
    }
}

impl AuthConfig {
    /// Get token expiry as Duration
    pub fn token_expiry(&self) -> Duration {
        Duration::from_secs(self.token_expiry_seconds)
    }

    /// Get reset-token TTL as Duration
    pub fn reset_token_ttl(&self) -> Duration {
        Duration::from_secs(self.reset_token_ttl_seconds)
    }

    /// Create AuthConfig from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let jwt_secret = std::env::var("JWT_SECRET").unwrap_or(defaults.jwt_secret);

        let token_expiry_seconds = std::env::var("TOKEN_EXPIRY_SECONDS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(defaults.token_expiry_seconds);

        let reset_token_ttl_seconds = std::env::var("RESET_TOKEN_TTL_SECONDS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(defaults.reset_token_ttl_seconds);

        Self { jwt_secret, token_expiry_seconds, reset_token_ttl_seconds }
    }
}

/// Outbound email (SMTP) configuration.
///
/// When `host` is unset the server falls back to a log-only notifier, which
/// keeps local development working without a mail relay.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
pub struct SmtpConfig {
    /// SMTP relay hostname (None disables real delivery)
    pub host: Option<String>,

    /// SMTP relay port
    pub port: Option<u16>,

    /// SMTP username
    pub username: Option<String>,

    /// SMTP password
    pub password: Option<String>,

    /// Sender address for all outgoing mail
    pub from_address: Option<String>,
}

impl SmtpConfig {
    /// Whether enough settings are present to build a real SMTP transport
    pub fn is_configured(&self) -> bool {
        self.host.is_some() && self.from_address.is_some()
    }

    /// Create SmtpConfig from environment variables
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("SMTP_HOST").ok(),
            port: std::env::var("SMTP_PORT").ok().and_then(|s| s.parse::<u16>().ok()),
            username: std::env::var("SMTP_USERNAME").ok(),
            password: std::env::var("SMTP_PASSWORD").ok(),
            from_address: std::env::var("SMTP_FROM").ok(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validation() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_server_config_bind_address() {
        let config = ServerConfig { host: "0.0.0.0".to_string(), port: 5000, ..Default::default() };
        assert_eq!(config.bind_address(), "0.0.0.0:5000");
    }

    #[test]
    fn test_database_config_timeouts() {
        let config = DatabaseConfig {
            connect_timeout_seconds: 15,
            idle_timeout_seconds: 300,
            ..Default::default()
        };
        assert_eq!(config.connect_timeout(), Duration::from_secs(15));
        assert_eq!(config.idle_timeout(), Some(Duration::from_secs(300)));

        let config_no_idle = DatabaseConfig { idle_timeout_seconds: 0, ..Default::default() };
        assert_eq!(config_no_idle.idle_timeout(), None);
    }

    #[test]
    fn test_auth_config_ttls() {
        let config = AuthConfig {
            token_expiry_seconds: 7200,
            reset_token_ttl_seconds: 1800,
            ..Default::default()
        };
        assert_eq!(config.token_expiry(), Duration::from_secs(7200));
        assert_eq!(config.reset_token_ttl(), Duration::from_secs(1800));
    }

    #[test]
    fn test_smtp_config_is_configured() {
        let unconfigured = SmtpConfig::default();
        assert!(!unconfigured.is_configured());

        let configured = SmtpConfig {
            host: Some("smtp.example.com".to_string()),
            from_address: Some("noreply@example.com".to_string()),
            ..Default::default()
        };
        assert!(configured.is_configured());
    }

    #[test]
    fn test_config_validation_errors() {
        // Short JWT secret
        let mut config = AppConfig::default();
        config.auth.jwt_secret = "short".to_string();
        assert!(config.validate().is_err());

        // Invalid database URL scheme
        let mut config = AppConfig::default();
        config.database.url = "postgresql://localhost/test".to_string();
        assert!(config.validate().is_err());

        // Invalid max connections
        let mut config = AppConfig::default();
        config.database.max_connections = 0;
        assert!(config.validate().is_err());
    }
}
