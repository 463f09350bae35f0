//! Two-phase password-reset flow: request a time-bounded token by email,
//! then consume it exactly once to set a new password.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{info, instrument};

use crate::auth::hashing;
use crate::auth::models::Account;
use crate::config::{AuthConfig, ServerConfig};
use crate::errors::{AuthErrorType, InkpostError, Result};
use crate::notifier::{self, Notifier};
use crate::storage::repositories::{AccountRepository, SqlxAccountRepository};
use crate::storage::DbPool;

#[derive(Clone)]
pub struct PasswordResetService {
    accounts: Arc<dyn AccountRepository>,
    notifier: Arc<dyn Notifier>,
    server: ServerConfig,
    token_ttl: Duration,
}

impl PasswordResetService {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        notifier: Arc<dyn Notifier>,
        server: ServerConfig,
        auth: &AuthConfig,
    ) -> Self {
        Self { accounts, notifier, server, token_ttl: auth.reset_token_ttl() }
    }

    pub fn with_sqlx(
        pool: DbPool,
        notifier: Arc<dyn Notifier>,
        server: ServerConfig,
        auth: &AuthConfig,
    ) -> Self {
        Self::new(Arc::new(SqlxAccountRepository::new(pool)), notifier, server, auth)
    }

    /// Request phase: issue a reset token for the account behind `email` and
    /// dispatch the reset link. A second request before confirmation replaces
    /// the previous token.
    #[instrument(skip(self), fields(email = %email))]
    pub async fn request_reset(&self, email: &str) -> Result<()> {
        let account = self
            .accounts
            .find_by_email(email)
            .await?
            .ok_or_else(|| InkpostError::not_found("account", email))?;

        let token = hashing::generate_one_time_code();
        let expires_at = Utc::now() + self.token_ttl;

        self.accounts.set_reset_token(&account.id, &token, expires_at).await?;

        notifier::dispatch(
            self.notifier.clone(),
            notifier::reset_link_email(&self.server, &account.email, &account.username, &token),
        );

        info!(account_id = %account.id, "password reset requested");
        Ok(())
    }

    /// Whether `token` currently validates, for rendering the reset page.
    #[instrument(skip(self, token))]
    pub async fn token_is_valid(&self, token: &str) -> Result<bool> {
        let account = self.accounts.find_by_valid_reset_token(token, Utc::now()).await?;
        Ok(account.is_some())
    }

    /// Confirm phase: atomically replace the password hash and clear the
    /// reset fields. A wrong token and an expired token are deliberately
    /// indistinguishable.
    #[instrument(skip(self, token, new_password))]
    pub async fn confirm_reset(&self, token: &str, new_password: &str) -> Result<Account> {
        let password_hash = hashing::hash_password(new_password)?;

        let account = self
            .accounts
            .consume_reset_token(token, Utc::now(), &password_hash)
            .await?
            .ok_or_else(|| {
                InkpostError::auth(
                    "Reset token is invalid or has expired",
                    AuthErrorType::InvalidResetToken,
                )
            })?;

        notifier::dispatch(
            self.notifier.clone(),
            notifier::reset_confirmation_email(&account.email, &account.username),
        );

        info!(account_id = %account.id, "password reset completed");
        Ok(account)
    }
}
