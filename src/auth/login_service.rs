//! Login service for username/password authentication.

use std::sync::{Arc, LazyLock};

use tracing::{info, instrument, warn};

use crate::auth::hashing;
use crate::auth::jwt::TokenIssuer;
use crate::auth::models::{Account, LoginRequest};
use crate::config::AuthConfig;
use crate::errors::{AuthErrorType, InkpostError, Result};
use crate::storage::repositories::{AccountRepository, SqlxAccountRepository};
use crate::storage::DbPool;

/// Pre-computed dummy hash for timing-safe behavior on unknown usernames.
/// When a non-existent username is submitted we still run Argon2 verification
/// against this hash so the response time matches real verification.
static DUMMY_HASH: LazyLock<String> = LazyLock::new(|| {
    hashing::hash_password("dummy_startup_value")
        .unwrap_or_else(|_| "$argon2id$v=19$m=768,t=1,p=1$dW5rbm93bg$dW5rbm93bg".to_string())
});

/// Service for handling username/password authentication.
#[derive(Clone)]
pub struct LoginService {
    accounts: Arc<dyn AccountRepository>,
    issuer: Arc<TokenIssuer>,
}

impl LoginService {
    pub fn new(accounts: Arc<dyn AccountRepository>, issuer: Arc<TokenIssuer>) -> Self {
        Self { accounts, issuer }
    }

    pub fn with_sqlx(pool: DbPool, config: &AuthConfig) -> Self {
        let issuer =
            Arc::new(TokenIssuer::new(config.jwt_secret.as_bytes(), config.token_expiry()));
        Self::new(Arc::new(SqlxAccountRepository::new(pool)), issuer)
    }

    /// Authenticate with username and password, returning the account and a
    /// freshly signed bearer token.
    ///
    /// # Errors
    ///
    /// An unknown username reports not-found, distinct from a wrong password.
    /// That distinction is a deliberate product choice carried over from the
    /// public API contract.
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn login(&self, request: &LoginRequest) -> Result<(Account, String)> {
        let (account, password_hash) =
            match self.accounts.find_by_username_with_password(&request.username).await? {
                Some(result) => result,
                None => {
                    // Keep response time in line with real verification
                    if let Err(e) = hashing::verify_password(&request.password, &DUMMY_HASH) {
                        warn!(error = %e, "dummy hash verification failed unexpectedly");
                    }
                    warn!(username = %request.username, "login attempt for non-existent account");
                    return Err(InkpostError::not_found("account", &request.username));
                }
            };

        let password_matches = hashing::verify_password(&request.password, &password_hash)?;
        if !password_matches {
            warn!(
                account_id = %account.id,
                username = %account.username,
                "login attempt with incorrect password"
            );
            return Err(InkpostError::auth(
                "Incorrect password",
                AuthErrorType::InvalidCredentials,
            ));
        }

        let token = self.issuer.issue(&account.id)?;

        info!(account_id = %account.id, username = %account.username, "account logged in");
        Ok((account, token))
    }
}
