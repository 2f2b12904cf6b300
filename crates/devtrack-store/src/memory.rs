//! In-process blob backend for tests.

use std::sync::{Arc, Mutex};

use crate::blob::BlobClient;
use crate::error::{Error, Result};

/// A [`BlobClient`] holding the object in memory.
///
/// Cheap to clone; clones share the same object, so a test can hand one
/// clone to the store and inspect the raw bytes through another.
#[derive(Clone, Default)]
pub struct MemoryBlobClient {
    object: Arc<Mutex<Option<Vec<u8>>>>,
}

impl MemoryBlobClient {
    /// Creates a client with no object stored yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a client pre-seeded with object bytes.
    pub fn with_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            object: Arc::new(Mutex::new(Some(bytes.into()))),
        }
    }

    /// The current object bytes, if any. For test assertions.
    pub fn bytes(&self) -> Option<Vec<u8>> {
        self.object.lock().ok().and_then(|guard| guard.clone())
    }
}

#[async_trait::async_trait]
impl BlobClient for MemoryBlobClient {
    async fn download(&self) -> Result<Vec<u8>> {
        let guard = self
            .object
            .lock()
            .map_err(|_| Error::unavailable("memory blob lock poisoned"))?;
        guard
            .clone()
            .ok_or_else(|| Error::read_failed("object does not exist"))
    }

    async fn upload(&self, bytes: Vec<u8>) -> Result<()> {
        let mut guard = self
            .object
            .lock()
            .map_err(|_| Error::unavailable("memory blob lock poisoned"))?;
        *guard = Some(bytes);
        Ok(())
    }

    async fn ensure_container(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_download_missing_object_is_read_failed() {
        let client = MemoryBlobClient::new();
        let err = client.download().await.unwrap_err();
        assert!(matches!(err, Error::ReadFailed { .. }));
    }

    #[tokio::test]
    async fn test_upload_then_download() {
        let client = MemoryBlobClient::new();
        client.upload(b"a,b\n1,2\n".to_vec()).await.unwrap();
        assert_eq!(client.download().await.unwrap(), b"a,b\n1,2\n");
    }

    #[tokio::test]
    async fn test_clones_share_the_object() {
        let client = MemoryBlobClient::with_bytes(*b"x");
        let other = client.clone();
        other.upload(b"y".to_vec()).await.unwrap();
        assert_eq!(client.bytes(), Some(b"y".to_vec()));
    }
}
