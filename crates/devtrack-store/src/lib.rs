//! Durable storage of the project collection as a single CSV blob.
//!
//! The whole dataset lives in one object in Azure Blob Storage. There is no
//! cache and no partial read: [`DatasetStore::load_all`] fetches and decodes
//! everything, [`DatasetStore::save_all`] re-serializes and overwrites
//! everything (last-writer-wins at the blob level).
//!
//! Transport is behind the [`BlobClient`] trait so the store logic tests
//! against [`MemoryBlobClient`] without a network; [`AzureBlobClient`]
//! implements the Blob REST API with Shared Key or SAS authentication.

pub mod azure;
pub mod blob;
pub mod codec;
pub mod dataset;
pub mod error;
pub mod memory;

pub use azure::{AzureBlobClient, StorageAccount};
pub use blob::BlobClient;
pub use dataset::{DEFAULT_BLOB_NAME, DatasetStore};
pub use error::{Error, Result};
pub use memory::MemoryBlobClient;
