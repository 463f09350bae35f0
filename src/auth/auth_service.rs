//! Bearer-token authentication: resolves an `Authorization` header to the
//! account it identifies.

use std::str::FromStr;
use std::sync::Arc;

use tracing::instrument;

use crate::auth::jwt::TokenIssuer;
use crate::auth::models::CurrentAccount;
use crate::config::AuthConfig;
use crate::domain::AccountId;
use crate::errors::{AuthErrorType, InkpostError, Result};
use crate::storage::repositories::{AccountRepository, SqlxAccountRepository};
use crate::storage::DbPool;

/// Service that verifies bearer tokens and loads the authenticated account.
#[derive(Clone)]
pub struct AuthService {
    accounts: Arc<dyn AccountRepository>,
    issuer: Arc<TokenIssuer>,
}

impl AuthService {
    pub fn new(accounts: Arc<dyn AccountRepository>, issuer: Arc<TokenIssuer>) -> Self {
        Self { accounts, issuer }
    }

    pub fn with_sqlx(pool: DbPool, config: &AuthConfig) -> Self {
        let issuer =
            Arc::new(TokenIssuer::new(config.jwt_secret.as_bytes(), config.token_expiry()));
        Self::new(Arc::new(SqlxAccountRepository::new(pool)), issuer)
    }

    /// Resolve an `Authorization: Bearer <token>` header to the account it
    /// identifies.
    #[instrument(skip(self, authorization_header))]
    pub async fn authenticate(
        &self,
        authorization_header: Option<&str>,
    ) -> Result<CurrentAccount> {
        let header = authorization_header.ok_or_else(|| {
            InkpostError::auth("Missing authorization header", AuthErrorType::MissingToken)
        })?;

        let token = header.strip_prefix("Bearer ").ok_or_else(|| {
            InkpostError::auth("Malformed authorization header", AuthErrorType::MissingToken)
        })?;

        let claims = self.issuer.verify(token)?;

        let account_id = AccountId::from_str(&claims.sub).map_err(|_| {
            InkpostError::auth("Token subject is not a valid account id", AuthErrorType::InvalidToken)
        })?;

        let account = self.accounts.find_by_id(&account_id).await?.ok_or_else(|| {
            // The token verified but its account is gone; report it at the
            // lookup stage rather than as a signature failure.
            InkpostError::auth(
                "Account for this token no longer exists",
                AuthErrorType::InvalidToken,
            )
        })?;

        Ok(CurrentAccount::from(account))
    }
}
