//! Devtrack API server binary.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use devtrack_auth::{AuthConfig, TokenIssuer, TokenVerifier};
use devtrack_server::ratelimit::{RateLimiter, RateLimits};
use devtrack_server::{AppState, Config, app};
use devtrack_store::{AzureBlobClient, DatasetStore, StorageAccount};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env().context("reading environment configuration")?;

    let account = StorageAccount::from_connection_string(&config.connection_string)
        .context("parsing storage connection string")?;
    let client = AzureBlobClient::new(account, config.container.clone(), config.blob_name.clone());
    let store = DatasetStore::new(Arc::new(client));

    let auth = AuthConfig::new(
        config.secret.clone(),
        config.admin_username.clone(),
        config.admin_password.clone(),
    );
    let state = AppState::new(
        store,
        TokenIssuer::new(auth),
        TokenVerifier::new(config.secret.clone()),
        RateLimiter::new(RateLimits {
            read_per_window: config.read_limit_per_minute,
            write_per_window: config.write_limit_per_minute,
            ..RateLimits::default()
        }),
        config.frontend_origin.clone(),
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.bind_addr))?;
    tracing::info!(addr = %config.bind_addr, "devtrack API listening");

    axum::serve(
        listener,
        app(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("serving")?;

    Ok(())
}
