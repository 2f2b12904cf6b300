//! Devtrack admin CLI.
//!
//! Seeds and inspects the dataset blob that the API server and web UI share.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use devtrack_core::{ProjectView, columns};
use devtrack_store::{
    AzureBlobClient, BlobClient, DEFAULT_BLOB_NAME, DatasetStore, StorageAccount, codec,
};

/// Devtrack dataset administration.
#[derive(Parser, Debug)]
#[command(name = "devtrack", version, about = "Devtrack dataset administration tool")]
struct Args {
    /// Azure storage connection string.
    #[arg(long, env = "AZURE_STORAGE_CONNECTION_STRING", hide_env_values = true)]
    connection_string: String,

    /// Blob container holding the dataset.
    #[arg(long, env = "AZURE_STORAGE_CONTAINER_NAME")]
    container: String,

    /// Name of the dataset blob.
    #[arg(long, env = "DEVTRACK_BLOB_NAME", default_value = DEFAULT_BLOB_NAME)]
    blob_name: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Upload a local CSV file as the dataset, creating the container if
    /// it does not exist.
    Upload {
        /// Path to the CSV file to upload.
        #[arg(default_value = DEFAULT_BLOB_NAME)]
        file: PathBuf,
    },
    /// Load the dataset and print a per-category summary.
    Show,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();

    let account = StorageAccount::from_connection_string(&args.connection_string)
        .context("parsing storage connection string")?;
    let client = AzureBlobClient::new(account, args.container, args.blob_name.clone());

    match args.command {
        Command::Upload { file } => upload(client, &args.blob_name, &file).await,
        Command::Show => show(client).await,
    }
}

async fn upload(client: AzureBlobClient, blob_name: &str, file: &PathBuf) -> anyhow::Result<()> {
    let bytes = tokio::fs::read(file)
        .await
        .with_context(|| format!("reading {}", file.display()))?;

    // Reject files the server could not decode later.
    let snapshot = codec::decode(&bytes).context("local file is not a valid dataset CSV")?;
    tracing::info!(
        records = snapshot.len(),
        columns = snapshot.schema.len(),
        "validated local dataset"
    );

    client.ensure_container().await.context("creating container")?;
    client.upload(bytes).await.context("uploading dataset")?;

    println!(
        "Uploaded {} as {blob_name} ({} records)",
        file.display(),
        snapshot.len()
    );
    Ok(())
}

async fn show(client: AzureBlobClient) -> anyhow::Result<()> {
    let store = DatasetStore::new(Arc::new(client));
    let snapshot = store.load_all().await.context("loading dataset")?;

    println!("{} records, {} columns", snapshot.len(), snapshot.schema.len());
    for category in columns::CATEGORIES {
        let projects: Vec<ProjectView> = snapshot
            .records
            .iter()
            .map(ProjectView::new)
            .filter(|v| v.category() == Some(category))
            .collect();
        println!("\n{category} ({})", projects.len());
        for project in projects {
            let due = match project.comments_due() {
                Some(date) => format!("comments due {}", date.format("%m/%d/%Y")),
                None => "awaiting resubmittal".to_string(),
            };
            println!("  {:<30} {due}", project.name().unwrap_or("(unnamed)"));
        }
    }
    Ok(())
}
