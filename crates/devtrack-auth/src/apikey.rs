//! Legacy static API-key gate.
//!
//! The deployed system configured this alongside the bearer gate but never
//! mounted it on a project route; the bearer token is the single wired
//! mechanism. Kept available for operators that still distribute the static
//! key to trusted tooling.

use crate::error::AuthError;

/// Header the static key is expected in.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Compares a request-supplied key against one fixed configured secret.
#[derive(Clone)]
pub struct ApiKeyGate {
    key: String,
}

impl ApiKeyGate {
    /// Creates a gate around the configured secret.
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    /// Checks a presented key. Fails with `InvalidApiKey` (forbidden) on
    /// mismatch. Comparison does not short-circuit on the first differing
    /// byte.
    pub fn check(&self, presented: &str) -> Result<(), AuthError> {
        let expected = self.key.as_bytes();
        let presented = presented.as_bytes();

        let mut diff = expected.len() ^ presented.len();
        for i in 0..expected.len().min(presented.len()) {
            diff |= usize::from(expected[i] ^ presented[i]);
        }

        if diff == 0 {
            Ok(())
        } else {
            Err(AuthError::InvalidApiKey)
        }
    }
}
