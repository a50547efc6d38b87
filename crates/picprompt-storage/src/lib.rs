//! # picprompt-storage
//!
//! Blob store client for picprompt's in-flight image objects.
//!
//! The pipeline persists each uploaded image to a bucket for exactly the
//! duration of one label-detection call and deletes it afterwards. This
//! crate provides the [`BlobStore`] trait plus two implementations:
//!
//! - [`S3BlobStore`]: the deployment backend, an opendal S3 operator
//! - [`MemoryBlobStore`]: an in-process operator for tests

pub mod config;
pub mod memory;
pub mod s3;

use async_trait::async_trait;
use picprompt_core::Result;

pub use config::S3Config;
pub use memory::MemoryBlobStore;
pub use s3::S3BlobStore;

/// A remote key/value store for binary objects, addressed by bucket + key.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Bucket this store writes into (fixed per deployment).
    fn bucket(&self) -> &str;

    /// Upload a binary object under `key`. Overwrites silently if the key
    /// already exists.
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<()>;

    /// Fetch the object stored under `key`.
    async fn get(&self, key: &str) -> Result<Vec<u8>>;

    /// Remove the object stored under `key`. Idempotent: deleting a
    /// non-existent key is not an error.
    async fn delete(&self, key: &str) -> Result<()>;
}
