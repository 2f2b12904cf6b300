//! Devtrack web UI binary.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use devtrack_store::{AzureBlobClient, DEFAULT_BLOB_NAME, DatasetStore, StorageAccount};
use devtrack_web::{WebState, routes};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let connection_string = std::env::var("AZURE_STORAGE_CONNECTION_STRING")
        .context("AZURE_STORAGE_CONNECTION_STRING is not set")?;
    let container = std::env::var("AZURE_STORAGE_CONTAINER_NAME")
        .context("AZURE_STORAGE_CONTAINER_NAME is not set")?;
    let blob_name =
        std::env::var("DEVTRACK_BLOB_NAME").unwrap_or_else(|_| DEFAULT_BLOB_NAME.to_string());
    let bind_addr: SocketAddr = std::env::var("DEVTRACK_WEB_BIND_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
        .parse()
        .context("parsing DEVTRACK_WEB_BIND_ADDR")?;

    let account = StorageAccount::from_connection_string(&connection_string)
        .context("parsing storage connection string")?;
    let client = AzureBlobClient::new(account, container, blob_name);
    let state = WebState::new(DatasetStore::new(Arc::new(client)));

    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("binding {bind_addr}"))?;
    tracing::info!(addr = %bind_addr, "devtrack web UI listening");

    axum::serve(listener, routes::app(state))
        .await
        .context("serving")?;

    Ok(())
}
