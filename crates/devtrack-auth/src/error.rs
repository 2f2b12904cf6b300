//! Auth-specific error types.

/// Errors that can occur during authentication.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The supplied username/password pair does not match the admin pair.
    #[error("incorrect username or password")]
    InvalidCredentials,

    /// No Authorization header or bearer token present.
    #[error("missing authentication token")]
    MissingToken,

    /// Token is not a structurally valid JWT.
    #[error("invalid token format: {0}")]
    InvalidFormat(String),

    /// JWT signature verification failed.
    #[error("invalid token signature: {0}")]
    InvalidSignature(String),

    /// Token has expired.
    #[error("token has expired")]
    Expired,

    /// Token carries no subject claim.
    #[error("token missing subject claim")]
    MissingSubject,

    /// Static API key does not match the configured secret.
    #[error("invalid API key")]
    InvalidApiKey,
}

impl AuthError {
    /// Whether this failure maps to a 401 rather than a 403.
    pub fn is_unauthenticated(&self) -> bool {
        !matches!(self, AuthError::InvalidApiKey)
    }
}
