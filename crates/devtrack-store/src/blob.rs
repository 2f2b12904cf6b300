//! Transport abstraction over the single dataset object.

use crate::error::Result;

/// Read/write access to one fixed blob object.
///
/// Implementations carry their own addressing (container and object name);
/// the dataset layer only ever deals in whole-object bytes.
#[async_trait::async_trait]
pub trait BlobClient: Send + Sync {
    /// Fetches the object's current bytes.
    async fn download(&self) -> Result<Vec<u8>>;

    /// Overwrites the object unconditionally with `bytes`.
    async fn upload(&self, bytes: Vec<u8>) -> Result<()>;

    /// Creates the containing container if it does not exist yet.
    ///
    /// Used by the seeding CLI; serving paths assume the container exists.
    async fn ensure_container(&self) -> Result<()>;
}
