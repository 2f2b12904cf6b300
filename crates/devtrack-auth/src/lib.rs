//! Authentication for the Devtrack API.
//!
//! Provides:
//! - [`TokenIssuer`]: checks the fixed admin credential pair and issues
//!   signed, time-limited bearer tokens
//! - [`TokenVerifier`]: verifies signature, expiry, and subject claim
//! - [`AuthLayer`] / [`AuthService`]: Tower middleware gating routes on a
//!   valid bearer token
//! - [`ApiKeyGate`]: legacy static-key check, kept available but wired to
//!   no route
//! - [`AuthError`]: auth-specific error types
//!
//! There is exactly one account: the configured admin pair. Tokens carry the
//! username as the `sub` claim and default to a 30-minute lifetime.

mod apikey;
mod error;
mod middleware;
mod token;

pub use apikey::ApiKeyGate;
pub use error::AuthError;
pub use middleware::{AuthLayer, AuthService};
pub use token::{AdminUser, TokenIssuer, TokenVerifier};

use std::time::Duration;

/// Default bearer-token lifetime.
pub const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(30 * 60);

/// Configuration for the auth gate.
#[derive(Clone, Debug)]
pub struct AuthConfig {
    /// HMAC secret the tokens are signed with.
    pub secret: String,
    /// The single admin username.
    pub admin_username: String,
    /// The single admin password.
    pub admin_password: String,
    /// How long issued tokens stay valid.
    pub token_lifetime: Duration,
}

impl AuthConfig {
    /// Creates a config with the default token lifetime.
    pub fn new(
        secret: impl Into<String>,
        admin_username: impl Into<String>,
        admin_password: impl Into<String>,
    ) -> Self {
        Self {
            secret: secret.into(),
            admin_username: admin_username.into(),
            admin_password: admin_password.into(),
            token_lifetime: DEFAULT_TOKEN_LIFETIME,
        }
    }
}
