//! S3-backed blob store.

use std::time::Duration;

use async_trait::async_trait;
use opendal::layers::TimeoutLayer;
use opendal::{services::S3, Operator};
use picprompt_core::{Error, Result};
use tracing::debug;

use crate::{BlobStore, S3Config};

/// Blob store backed by an S3 bucket via an opendal operator.
#[derive(Clone, Debug)]
pub struct S3BlobStore {
    bucket: String,
    op: Operator,
}

impl S3BlobStore {
    pub fn new(config: S3Config) -> Result<Self> {
        let mut builder = S3::default();
        builder.bucket(&config.bucket);
        builder.root("/");
        if let Some(ref region) = config.region {
            builder.region(region);
        }
        if let Some(ref endpoint) = config.endpoint {
            builder.endpoint(endpoint);
        }
        // Explicit credentials win; otherwise opendal resolves the
        // ambient AWS chain.
        if let Some(ref key_id) = config.access_key_id {
            builder.access_key_id(key_id);
        }
        if let Some(ref secret) = config.secret_access_key {
            builder.secret_access_key(secret);
        }

        // Each operation is bounded; a timed-out call surfaces through
        // the same Error::Storage mapping as any other opendal failure.
        let op = Operator::new(builder)
            .map_err(|e| Error::Storage(format!("failed to build S3 operator: {}", e)))?
            .layer(
                TimeoutLayer::new().with_timeout(Duration::from_secs(config.timeout_seconds)),
            )
            .finish();

        Ok(Self {
            bucket: config.bucket,
            op,
        })
    }

    /// Create from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(S3Config::from_env())
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<()> {
        debug!(
            subsystem = "storage",
            component = "s3",
            op = "put",
            key = key,
            size_bytes = bytes.len(),
        );
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
        debug!(
            subsystem = "storage",
            component = "s3",
            op = "delete",
            key = key,
        );
        self.op
            .delete(key)
            .await
            .map_err(|e| Error::Storage(format!("failed to delete {}: {}", key, e)))
    }
}
