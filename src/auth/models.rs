//! Account models shared across the auth flows.

use crate::domain::AccountId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A persisted account's public view. Never carries the password hash or any
/// one-time code.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: AccountId,
    pub username: String,
    pub email: String,
    pub name: Option<String>,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data needed to insert a fresh, unverified account.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub id: AccountId,
    pub username: String,
    pub email: String,
    pub name: Option<String>,
    pub password_hash: String,
    pub verification_code: String,
}

/// The identity attached to a request after bearer-token authentication.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CurrentAccount {
    pub id: AccountId,
    pub username: String,
    pub email: String,
    pub name: Option<String>,
    pub verified: bool,
}

impl From<Account> for CurrentAccount {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            username: account.username,
            email: account.email,
            name: account.name,
            verified: account.verified,
        }
    }
}

/// Input to the registration flow.
#[derive(Debug, Clone)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub name: Option<String>,
}

/// Input to the authentication flow.
#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}
