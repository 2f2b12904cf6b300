//! Shared application state.

use std::sync::Arc;

use devtrack_auth::{TokenIssuer, TokenVerifier};
use devtrack_store::DatasetStore;

use crate::ratelimit::RateLimiter;

/// State every handler and middleware sees. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    /// The dataset store; handlers reload from it on every request.
    pub store: DatasetStore,
    /// Issues bearer tokens for `/token`.
    pub issuer: TokenIssuer,
    /// Verifies bearer tokens on the project routes.
    pub verifier: Arc<TokenVerifier>,
    /// Shared request counters.
    pub limiter: Arc<RateLimiter>,
    /// The one origin CORS admits.
    pub frontend_origin: String,
}

impl AppState {
    /// Assembles the state from its parts.
    pub fn new(
        store: DatasetStore,
        issuer: TokenIssuer,
        verifier: TokenVerifier,
        limiter: RateLimiter,
        frontend_origin: impl Into<String>,
    ) -> Self {
        Self {
            store,
            issuer,
            verifier: Arc::new(verifier),
            limiter: Arc::new(limiter),
            frontend_origin: frontend_origin.into(),
        }
    }
}
