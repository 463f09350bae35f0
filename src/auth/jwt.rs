//! JWT issuing and verification for bearer authentication.

use crate::domain::AccountId;
use crate::errors::{AuthErrorType, InkpostError, Result};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub iat: usize,
    pub exp: usize,
}

/// Issues and verifies HS256-signed bearer tokens bound to an account id.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenIssuer {
    /// Create a new issuer with the given signing secret and token lifetime.
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::default();
        // Expiry is the only revocation mechanism, so no grace window
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    /// Sign a token for the given account.
    pub fn issue(&self, account_id: &AccountId) -> Result<String> {
        let now = chrono::Utc::now().timestamp() as usize;

        let claims = Claims {
            sub: account_id.to_string(),
            iat: now,
            exp: now + self.ttl.as_secs() as usize,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| InkpostError::internal(format!("Failed to sign token: {}", e)))
    }

    /// Verify a token's signature and expiry, returning its claims.
    pub fn verify(&self, token: &str) -> Result<Claims> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    InkpostError::auth("Token has expired", AuthErrorType::ExpiredToken)
                }
                _ => InkpostError::auth("Invalid token", AuthErrorType::InvalidToken),
            })
    }
}
