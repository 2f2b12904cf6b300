//! The dataset store: load-all / save-all over the blob transport.

use std::sync::Arc;

use devtrack_core::Snapshot;

use crate::blob::BlobClient;
use crate::codec;
use crate::error::Result;

/// Object name of the dataset blob, matching what deployments already have.
pub const DEFAULT_BLOB_NAME: &str = "Development_Status.csv";

/// Durable storage of the project collection as a single CSV object.
///
/// Every read loads the full collection; every write replaces the full
/// object. Cheap to clone.
#[derive(Clone)]
pub struct DatasetStore {
    client: Arc<dyn BlobClient>,
}

impl DatasetStore {
    /// Creates a store over the given blob transport.
    pub fn new(client: Arc<dyn BlobClient>) -> Self {
        Self { client }
    }

    /// Loads the entire dataset: fetch, decode, normalize empties to absent.
    pub async fn load_all(&self) -> Result<Snapshot> {
        let bytes = self.client.download().await?;
        let snapshot = codec::decode(&bytes)?;
        tracing::info!(records = snapshot.len(), "loaded dataset");
        Ok(snapshot)
    }

    /// Serializes the snapshot against its schema and overwrites the object.
    ///
    /// An empty record set is a no-op: the object is left untouched. This
    /// guards against truncating the dataset when a caller accidentally
    /// passes an empty collection; deleting all data on purpose requires
    /// going around this method.
    pub async fn save_all(&self, snapshot: &Snapshot) -> Result<()> {
        if snapshot.is_empty() {
            tracing::warn!("save_all called with empty record set, skipping");
            return Ok(());
        }

        let bytes = codec::encode(snapshot)?;
        self.client.upload(bytes).await?;
        tracing::info!(records = snapshot.len(), "saved dataset");
        Ok(())
    }

    /// Creates the backing container if missing. Seeding helper.
    pub async fn ensure_container(&self) -> Result<()> {
        self.client.ensure_container().await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::memory::MemoryBlobClient;
    use devtrack_core::{Record, Schema};

    const SAMPLE: &str = "\
Category,Project Name,Comments Due Date
Rezoning,Oak St,
Final Plat,Elm St,03/15/2025
";

    fn store_with(client: MemoryBlobClient) -> DatasetStore {
        DatasetStore::new(Arc::new(client))
    }

    #[tokio::test]
    async fn test_load_save_load_round_trip() {
        let client = MemoryBlobClient::with_bytes(SAMPLE.as_bytes().to_vec());
        let store = store_with(client);

        let snapshot = store.load_all().await.unwrap();
        store.save_all(&snapshot).await.unwrap();
        let again = store.load_all().await.unwrap();
        assert_eq!(again, snapshot);
    }

    #[tokio::test]
    async fn test_save_all_empty_leaves_object_untouched() {
        let client = MemoryBlobClient::with_bytes(SAMPLE.as_bytes().to_vec());
        let store = store_with(client.clone());

        let empty = Snapshot::new(Schema::from(["Category", "Project Name"]), Vec::new());
        store.save_all(&empty).await.unwrap();
        assert_eq!(client.bytes(), Some(SAMPLE.as_bytes().to_vec()));
    }

    #[tokio::test]
    async fn test_save_all_overwrites_whole_object() {
        let client = MemoryBlobClient::with_bytes(SAMPLE.as_bytes().to_vec());
        let store = store_with(client.clone());

        let mut snapshot = store.load_all().await.unwrap();
        snapshot.records.truncate(1);
        store.save_all(&snapshot).await.unwrap();

        let again = store.load_all().await.unwrap();
        assert_eq!(again.len(), 1);
    }

    #[tokio::test]
    async fn test_load_missing_object_fails() {
        let store = store_with(MemoryBlobClient::new());
        assert!(store.load_all().await.is_err());
    }

    #[tokio::test]
    async fn test_save_new_record_appears_on_reload() {
        let client = MemoryBlobClient::with_bytes(SAMPLE.as_bytes().to_vec());
        let store = store_with(client);

        let mut snapshot = store.load_all().await.unwrap();
        let record = Record::from([
            ("Category", Some("Rezoning".to_string())),
            ("Project Name", Some("Maple Ave".to_string())),
        ]);
        devtrack_core::repository::insert(&mut snapshot, record);
        store.save_all(&snapshot).await.unwrap();

        let again = store.load_all().await.unwrap();
        assert_eq!(again.len(), 3);
        assert!(devtrack_core::repository::find_one(&again, "Rezoning", "Maple Ave").is_some());
    }
}
