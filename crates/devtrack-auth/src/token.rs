//! HS256 bearer-token issuance and verification.

use chrono::Utc;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};

use crate::{AuthConfig, error::AuthError};

/// The identity extracted from a validated token.
///
/// Inserted into request extensions by the auth middleware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminUser {
    /// The `sub` claim, the admin username the token was issued to.
    pub username: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    #[serde(default)]
    sub: Option<String>,
    exp: i64,
}

/// Issues tokens after checking the configured admin credential pair.
#[derive(Clone)]
pub struct TokenIssuer {
    config: AuthConfig,
}

impl TokenIssuer {
    /// Creates an issuer from the auth config.
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    /// Checks the credential pair and, on match, issues a signed token with
    /// the username as subject and the configured lifetime.
    pub fn issue(&self, username: &str, password: &str) -> Result<String, AuthError> {
        if username != self.config.admin_username || password != self.config.admin_password {
            return Err(AuthError::InvalidCredentials);
        }

        let lifetime = chrono::Duration::from_std(self.config.token_lifetime)
            .unwrap_or_else(|_| chrono::Duration::minutes(30));
        let claims = Claims {
            sub: Some(username.to_string()),
            exp: (Utc::now() + lifetime).timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.secret.as_bytes()),
        )
        .map_err(|e| AuthError::InvalidFormat(e.to_string()))
    }
}

/// Verifies tokens: signature, expiry, and presence of a subject.
#[derive(Clone)]
pub struct TokenVerifier {
    secret: String,
}

impl TokenVerifier {
    /// Creates a verifier over the signing secret.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Decodes and verifies a token, returning the authenticated admin.
    pub fn verify(&self, token: &str) -> Result<AdminUser, AuthError> {
        let validation = Validation::new(Algorithm::HS256);
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::Expired,
            ErrorKind::InvalidSignature => AuthError::InvalidSignature(e.to_string()),
            _ => AuthError::InvalidFormat(e.to_string()),
        })?;

        let username = data
            .claims
            .sub
            .filter(|s| !s.is_empty())
            .ok_or(AuthError::MissingSubject)?;
        Ok(AdminUser { username })
    }
}
