//! Registration and email-verification flows.

use std::sync::Arc;

use tracing::{info, instrument};

use crate::auth::hashing;
use crate::auth::models::{Account, NewAccount, RegisterRequest};
use crate::config::ServerConfig;
use crate::domain::AccountId;
use crate::errors::{AuthErrorType, InkpostError, Result};
use crate::notifier::{self, Notifier};
use crate::storage::repositories::{AccountRepository, SqlxAccountRepository};
use crate::storage::DbPool;

/// Service creating unverified accounts and consuming verification codes.
#[derive(Clone)]
pub struct RegistrationService {
    accounts: Arc<dyn AccountRepository>,
    notifier: Arc<dyn Notifier>,
    server: ServerConfig,
}

impl RegistrationService {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        notifier: Arc<dyn Notifier>,
        server: ServerConfig,
    ) -> Self {
        Self { accounts, notifier, server }
    }

    pub fn with_sqlx(pool: DbPool, notifier: Arc<dyn Notifier>, server: ServerConfig) -> Self {
        Self::new(Arc::new(SqlxAccountRepository::new(pool)), notifier, server)
    }

    /// Create a fresh unverified account and dispatch the verification email.
    ///
    /// # Errors
    ///
    /// Returns a conflict error when the username or email is already taken.
    /// Email dispatch failures never fail the registration.
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn register(&self, request: RegisterRequest) -> Result<Account> {
        if self.accounts.find_by_username(&request.username).await?.is_some() {
            return Err(InkpostError::conflict(
                format!("Username '{}' is already taken", request.username),
                "username",
            ));
        }

        if self.accounts.find_by_email(&request.email).await?.is_some() {
            return Err(InkpostError::conflict(
                format!("Email '{}' is already registered", request.email),
                "email",
            ));
        }

        let verification_code = hashing::generate_one_time_code();
        let password_hash = hashing::hash_password(&request.password)?;

        let account = self
            .accounts
            .create_account(NewAccount {
                id: AccountId::new(),
                username: request.username,
                email: request.email,
                name: request.name,
                password_hash,
                verification_code: verification_code.clone(),
            })
            .await?;

        notifier::dispatch(
            self.notifier.clone(),
            notifier::verification_email(
                &self.server,
                &account.email,
                &account.username,
                &verification_code,
            ),
        );

        info!(account_id = %account.id, username = %account.username, "account registered");
        Ok(account)
    }

    /// Consume a verification code, promoting its account to verified.
    ///
    /// One-shot: a code that was already consumed (or never existed) is
    /// rejected, with no distinction between the two cases.
    #[instrument(skip(self, code))]
    pub async fn verify_email(&self, code: &str) -> Result<Account> {
        let account = self.accounts.consume_verification_code(code).await?.ok_or_else(|| {
            InkpostError::auth(
                "Verification code is invalid or was already used",
                AuthErrorType::InvalidVerificationCode,
            )
        })?;

        info!(account_id = %account.id, username = %account.username, "account verified");
        Ok(account)
    }
}
