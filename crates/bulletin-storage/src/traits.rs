//! Storage abstraction trait
//!
//! This module defines the BlobStore trait that storage backends implement.

use async_trait::async_trait;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Durable blob store abstraction
///
/// The media ingestion engine only depends on this trait, so storage can be
/// backed by any directory-like namespace. Contract: `delete` is idempotent
/// (deleting a missing key is not an error), and a failed `create` must not
/// leave a partial blob behind.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Write a blob under the given filename and return (storage_key, public_url).
    ///
    /// The storage key is the internal identifier used for later reads and
    /// deletes; the public URL is the externally visible path to the blob.
    async fn create(&self, filename: &str, data: Vec<u8>) -> StorageResult<(String, String)>;

    /// Read back the full contents of a blob by its storage key
    async fn open_for_read(&self, storage_key: &str) -> StorageResult<Vec<u8>>;

    /// Delete a blob by its storage key. Deleting a missing key succeeds.
    async fn delete(&self, storage_key: &str) -> StorageResult<()>;

    /// Check whether a blob exists
    async fn exists(&self, storage_key: &str) -> StorageResult<bool>;
}
