//! The Devtrack HTTP API.
//!
//! Composes the dataset store, auth gate, and rate limiter into an axum
//! application. Request flow: rate limiter → auth gate → handler →
//! repository operation over a freshly loaded snapshot → store (on
//! mutation) → response.

pub mod config;
pub mod cors;
pub mod error;
pub mod ratelimit;
pub mod routes;
pub mod state;

pub use config::{Config, ConfigError};
pub use error::ApiError;
pub use routes::app;
pub use state::AppState;
