//! In-process blob store used by tests.

use async_trait::async_trait;
use opendal::{services::Memory, Operator};
use picprompt_core::{Error, Result};

use crate::BlobStore;

/// Blob store backed by an in-process opendal memory operator.
///
/// Same observable contract as [`crate::S3BlobStore`] (silent overwrite,
/// idempotent delete), without the network.
#[derive(Clone, Debug)]
pub struct MemoryBlobStore {
    bucket: String,
    op: Operator,
}

impl MemoryBlobStore {
    pub fn new(bucket: impl Into<String>) -> Result<Self> {
        let builder = Memory::default();
        let op = Operator::new(builder)
            .map_err(|e| Error::Storage(format!("failed to build memory operator: {}", e)))?
            .finish();
        Ok(Self {
            bucket: bucket.into(),
            op,
        })
    }

    /// Whether an object currently exists under `key`.
    pub async fn contains(&self, key: &str) -> Result<bool> {
        self.op
            .is_exist(key)
            .await
            .map_err(|e| Error::Storage(format!("failed to stat {}: {}", key, e)))
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<()> {
        self.op
            .write(key, bytes)
            .await
            .map_err(|e| Error::Storage(format!("failed to upload {}: {}", key, e)))
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>> {
        let buffer = self
            .op
            .read(key)
            .await
            .map_err(|e| Error::Storage(format!("failed to read {}: {}", key, e)))?;
        Ok(buffer.to_vec())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.op
            .delete(key)
            .await
            .map_err(|e| Error::Storage(format!("failed to delete {}: {}", key, e)))
    }
}
