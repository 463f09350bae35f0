//! Account repository for the credential store.
//!
//! Owns identity, password hash, verification state, and reset-token state.
//! One-time codes (verification, password reset) are consumed with single
//! conditional UPDATEs so that two racing requests cannot both redeem the
//! same code.

use crate::auth::models::{Account, NewAccount};
use crate::domain::AccountId;
use crate::errors::{InkpostError, Result};
use crate::storage::DbPool;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use tracing::instrument;

const ACCOUNT_COLUMNS: &str = "id, username, email, name, password_hash, verified, \
     verification_code, reset_password_token, reset_password_expires_at, created_at, updated_at";

#[derive(Debug, Clone, FromRow)]
struct AccountRow {
    pub id: String,
    pub username: String,
    pub email: String,
    pub name: Option<String>,
    pub password_hash: String,
    pub verified: bool,
    #[allow(dead_code)]
    pub verification_code: Option<String>,
    #[allow(dead_code)]
    pub reset_password_token: Option<String>,
    #[allow(dead_code)]
    pub reset_password_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Create a new account. Uniqueness of username/email is enforced by the
    /// store; a constraint violation surfaces as a database error.
    async fn create_account(&self, account: NewAccount) -> Result<Account>;

    /// Get an account by ID
    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>>;

    /// Get an account by username
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>>;

    /// Get an account by email
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>>;

    /// Get an account with its password hash for authentication
    async fn find_by_username_with_password(
        &self,
        username: &str,
    ) -> Result<Option<(Account, String)>>;

    /// Get an account by its pending verification code
    async fn find_by_verification_code(&self, code: &str) -> Result<Option<Account>>;

    /// Get an account whose reset token matches and has not expired
    async fn find_by_valid_reset_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Account>>;

    /// Atomically mark an account verified and clear its verification code.
    /// Returns None when the code does not match any account (unknown or
    /// already consumed).
    async fn consume_verification_code(&self, code: &str) -> Result<Option<Account>>;

    /// Store a reset token and its expiry, replacing any previous token
    async fn set_reset_token(
        &self,
        id: &AccountId,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<()>;

    /// Atomically replace the password hash and clear both reset fields,
    /// provided the token matches and has not expired. Returns None when no
    /// account qualifies (wrong token or expired).
    async fn consume_reset_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
        new_password_hash: &str,
    ) -> Result<Option<Account>>;
}

#[derive(Debug, Clone)]
pub struct SqlxAccountRepository {
    pool: DbPool,
}

impl SqlxAccountRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn row_to_account(&self, row: AccountRow) -> Account {
        Account {
            id: AccountId::from_string(row.id),
            username: row.username,
            email: row.email,
            name: row.name,
            verified: row.verified,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }

    async fn fetch_by_column(&self, column: &str, value: &str) -> Result<Option<AccountRow>> {
        let query =
            format!("SELECT {} FROM accounts WHERE {} = $1", ACCOUNT_COLUMNS, column);

        sqlx::query_as::<_, AccountRow>(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| InkpostError::Database {
                source: err,
                context: format!("Failed to fetch account by {}", column),
            })
    }
}

#[async_trait]
impl AccountRepository for SqlxAccountRepository {
    #[instrument(
        skip(self, account),
        fields(username = %account.username, account_id = %account.id),
        name = "db_create_account"
    )]
    async fn create_account(&self, account: NewAccount) -> Result<Account> {
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO accounts
                (id, username, email, name, password_hash, verified, verification_code,
                 created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(account.id.as_str())
        .bind(&account.username)
        .bind(&account.email)
        .bind(&account.name)
        .bind(&account.password_hash)
        .bind(false)
        .bind(&account.verification_code)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|err| InkpostError::Database {
            source: err,
            context: "Failed to create account".to_string(),
        })?;

        self.find_by_id(&account.id)
            .await?
            .ok_or_else(|| InkpostError::internal("Account not found after creation"))
    }

    #[instrument(skip(self), fields(account_id = %id), name = "db_find_account")]
    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>> {
        let row = self.fetch_by_column("id", id.as_str()).await?;
        Ok(row.map(|r| self.row_to_account(r)))
    }

    #[instrument(skip(self), fields(username = %username), name = "db_find_account_by_username")]
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>> {
        let row = self.fetch_by_column("username", username).await?;
        Ok(row.map(|r| self.row_to_account(r)))
    }

    #[instrument(skip(self), fields(email = %email), name = "db_find_account_by_email")]
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>> {
        let row = self.fetch_by_column("email", email).await?;
        Ok(row.map(|r| self.row_to_account(r)))
    }

    #[instrument(
        skip(self),
        fields(username = %username),
        name = "db_find_account_with_password"
    )]
    async fn find_by_username_with_password(
        &self,
        username: &str,
    ) -> Result<Option<(Account, String)>> {
        let row = self.fetch_by_column("username", username).await?;

        if let Some(row) = row {
            let password_hash = row.password_hash.clone();
            let account = self.row_to_account(row);
            Ok(Some((account, password_hash)))
        } else {
            Ok(None)
        }
    }

    #[instrument(skip(self, code), name = "db_find_account_by_verification_code")]
    async fn find_by_verification_code(&self, code: &str) -> Result<Option<Account>> {
        let row = self.fetch_by_column("verification_code", code).await?;
        Ok(row.map(|r| self.row_to_account(r)))
    }

    #[instrument(skip(self, token), name = "db_find_account_by_reset_token")]
    async fn find_by_valid_reset_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Account>> {
        let query = format!(
            "SELECT {} FROM accounts WHERE reset_password_token = $1 AND reset_password_expires_at > $2",
            ACCOUNT_COLUMNS
        );

        let row = sqlx::query_as::<_, AccountRow>(&query)
            .bind(token)
            .bind(now)
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| InkpostError::Database {
                source: err,
                context: "Failed to fetch account by reset token".to_string(),
            })?;

        Ok(row.map(|r| self.row_to_account(r)))
    }

    #[instrument(skip(self, code), name = "db_consume_verification_code")]
    async fn consume_verification_code(&self, code: &str) -> Result<Option<Account>> {
        // Single conditional UPDATE: the WHERE clause both locates the
        // account and guarantees the code has not been consumed already.
        let query = format!(
            "UPDATE accounts SET verified = $1, verification_code = NULL, updated_at = $2 \
             WHERE verification_code = $3 RETURNING {}",
            ACCOUNT_COLUMNS
        );

        let row = sqlx::query_as::<_, AccountRow>(&query)
            .bind(true)
            .bind(Utc::now())
            .bind(code)
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| InkpostError::Database {
                source: err,
                context: "Failed to consume verification code".to_string(),
            })?;

        Ok(row.map(|r| self.row_to_account(r)))
    }

    #[instrument(
        skip(self, token),
        fields(account_id = %id, expires_at = %expires_at),
        name = "db_set_reset_token"
    )]
    async fn set_reset_token(
        &self,
        id: &AccountId,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        sqlx::query(
            "UPDATE accounts SET reset_password_token = $1, reset_password_expires_at = $2, \
             updated_at = $3 WHERE id = $4",
        )
        .bind(token)
        .bind(expires_at)
        .bind(Utc::now())
        .bind(id.as_str())
        .execute(&self.pool)
        .await
        .map_err(|err| InkpostError::Database {
            source: err,
            context: "Failed to set reset token".to_string(),
        })?;

        Ok(())
    }

    #[instrument(skip(self, token, new_password_hash), name = "db_consume_reset_token")]
    async fn consume_reset_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
        new_password_hash: &str,
    ) -> Result<Option<Account>> {
        // The expiry check lives in the WHERE clause so an expired token and
        // a wrong token are indistinguishable to the caller.
        let query = format!(
            "UPDATE accounts SET password_hash = $1, reset_password_token = NULL, \
             reset_password_expires_at = NULL, updated_at = $2 \
             WHERE reset_password_token = $3 AND reset_password_expires_at > $4 RETURNING {}",
            ACCOUNT_COLUMNS
        );

        let row = sqlx::query_as::<_, AccountRow>(&query)
            .bind(new_password_hash)
            .bind(Utc::now())
            .bind(token)
            .bind(now)
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| InkpostError::Database {
                source: err,
                context: "Failed to consume reset token".to_string(),
            })?;

        Ok(row.map(|r| self.row_to_account(r)))
    }
}
