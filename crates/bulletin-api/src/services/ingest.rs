//! Media ingestion engine
//!
//! Accepts uploaded files, validates them against a policy, stores each one
//! under a freshly minted UUID name, and verifies the stored bytes actually
//! decode as an image. Batches are all-or-nothing: a failure on any item
//! rolls back every blob the batch already committed, so storage is never
//! left holding a partial batch.

use std::io::Cursor;
use std::sync::Arc;

use bulletin_core::Config;
use bulletin_storage::{BlobStore, StorageError};
use uuid::Uuid;

/// A single uploaded file as received from the client
#[derive(Debug, Clone)]
pub struct UploadCandidate {
    /// Client-supplied filename, used for extension checks and error reporting
    pub filename: String,
    pub data: Vec<u8>,
}

/// A successfully ingested file
#[derive(Debug, Clone)]
pub struct StoredAsset {
    pub file_id: Uuid,
    /// Lowercased extension with leading dot (e.g. ".png")
    pub extension: String,
    /// Key the blob lives under in the store
    pub storage_key: String,
    /// Externally visible URL for the blob
    pub public_url: String,
}

/// Limits applied to every ingestion
#[derive(Debug, Clone)]
pub struct IngestPolicy {
    /// Allowed extensions, lowercase with leading dot
    pub allowed_extensions: Vec<String>,
    pub max_file_size: usize,
    pub max_batch_size: usize,
}

impl IngestPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            allowed_extensions: config.allowed_extensions.clone(),
            max_file_size: config.max_file_size_bytes,
            max_batch_size: config.max_batch_size,
        }
    }

    /// Check a candidate against the policy and return its normalized
    /// extension on success.
    fn validate(&self, candidate: &UploadCandidate) -> Result<String, IngestError> {
        // A dot needs a non-empty stem before it; ".png" is a bare name,
        // not an extension.
        let extension = match candidate.filename.rfind('.') {
            Some(idx) if idx > 0 && idx + 1 < candidate.filename.len() => {
                candidate.filename[idx..].to_lowercase()
            }
            _ => {
                return Err(IngestError::InvalidFile {
                    filename: candidate.filename.clone(),
                    reason: "missing file extension".to_string(),
                })
            }
        };

        if !self.allowed_extensions.contains(&extension) {
            return Err(IngestError::InvalidFile {
                filename: candidate.filename.clone(),
                reason: format!(
                    "extension '{}' not allowed, expected one of: {}",
                    extension,
                    self.allowed_extensions.join(", ")
                ),
            });
        }

        if candidate.data.is_empty() {
            return Err(IngestError::InvalidFile {
                filename: candidate.filename.clone(),
                reason: "file is empty".to_string(),
            });
        }

        if candidate.data.len() > self.max_file_size {
            return Err(IngestError::InvalidFile {
                filename: candidate.filename.clone(),
                reason: format!(
                    "file size {} exceeds maximum {} bytes",
                    candidate.data.len(),
                    self.max_file_size
                ),
            });
        }

        Ok(extension)
    }
}

/// Ingestion failures, reported per offending file
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("Invalid file '{filename}': {reason}")]
    InvalidFile { filename: String, reason: String },

    #[error("File '{filename}' is not a valid image")]
    NotAnImage { filename: String },

    #[error("Storage failure while ingesting '{filename}': {source}")]
    StorageFailure {
        filename: String,
        #[source]
        source: StorageError,
    },

    #[error("Batch of {count} files exceeds maximum of {max}")]
    BatchTooLarge { count: usize, max: usize },
}

/// The ingestion engine. Depends only on the [`BlobStore`] abstraction.
#[derive(Clone)]
pub struct MediaIngestService {
    store: Arc<dyn BlobStore>,
    policy: IngestPolicy,
}

impl MediaIngestService {
    pub fn new(store: Arc<dyn BlobStore>, policy: IngestPolicy) -> Self {
        Self { store, policy }
    }

    /// Ingest a single file: validate, store under a UUID name, then re-read
    /// the blob and verify the bytes that actually landed in storage decode
    /// as an image. The blob is deleted again if verification fails, so a
    /// failed ingest leaves storage unchanged.
    pub async fn ingest_one(&self, candidate: UploadCandidate) -> Result<StoredAsset, IngestError> {
        let extension = self.policy.validate(&candidate)?;
        let UploadCandidate { filename, data } = candidate;

        let file_id = Uuid::new_v4();
        let stored_name = format!("{}{}", file_id, extension);

        let (storage_key, public_url) = self
            .store
            .create(&stored_name, data)
            .await
            .map_err(|source| IngestError::StorageFailure {
                filename: filename.clone(),
                source,
            })?;

        let stored = match self.store.open_for_read(&storage_key).await {
            Ok(bytes) => bytes,
            Err(source) => {
                self.remove_blob(&storage_key).await;
                return Err(IngestError::StorageFailure { filename, source });
            }
        };

        if let Err(reason) = verify_image(stored).await {
            tracing::warn!(
                filename = %filename,
                key = %storage_key,
                reason = %reason,
                "Stored file failed image verification, removing blob"
            );
            self.remove_blob(&storage_key).await;
            return Err(IngestError::NotAnImage { filename });
        }

        tracing::info!(
            filename = %filename,
            file_id = %file_id,
            key = %storage_key,
            "File ingested"
        );

        Ok(StoredAsset {
            file_id,
            extension,
            storage_key,
            public_url,
        })
    }

    /// Ingest a batch of files, all-or-nothing. Files are processed in
    /// order and the returned assets preserve that order. On the first
    /// failure every blob already committed by this batch is deleted and
    /// the item's error is returned.
    pub async fn ingest_batch(
        &self,
        candidates: Vec<UploadCandidate>,
    ) -> Result<Vec<StoredAsset>, IngestError> {
        if candidates.len() > self.policy.max_batch_size {
            return Err(IngestError::BatchTooLarge {
                count: candidates.len(),
                max: self.policy.max_batch_size,
            });
        }

        let mut committed: Vec<StoredAsset> = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            match self.ingest_one(candidate).await {
                Ok(asset) => committed.push(asset),
                Err(err) => {
                    tracing::warn!(
                        committed = committed.len(),
                        error = %err,
                        "Batch ingestion failed, rolling back committed blobs"
                    );
                    self.rollback(&committed).await;
                    return Err(err);
                }
            }
        }

        Ok(committed)
    }

    /// Best-effort removal of blobs committed by a failed batch. Delete
    /// failures are logged and skipped so every blob gets one attempt.
    async fn rollback(&self, committed: &[StoredAsset]) {
        for asset in committed {
            self.remove_blob(&asset.storage_key).await;
        }
    }

    /// Best-effort delete; a failure here is logged, never returned, so it
    /// cannot mask the error that triggered the cleanup.
    async fn remove_blob(&self, storage_key: &str) {
        if let Err(err) = self.store.delete(storage_key).await {
            tracing::warn!(
                key = %storage_key,
                error = %err,
                "Failed to remove blob during cleanup"
            );
        }
    }
}

/// Decode the image header on a blocking thread. Returns the reason on
/// failure; any bytes that do not parse as a known image format are
/// rejected, regardless of their extension.
async fn verify_image(data: Vec<u8>) -> Result<(), String> {
    let result = tokio::task::spawn_blocking(move || {
        image::ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| e.to_string())?
            .into_dimensions()
            .map_err(|e| e.to_string())
    })
    .await;

    match result {
        Ok(Ok(_dimensions)) => Ok(()),
        Ok(Err(reason)) => Err(reason),
        Err(join_err) => Err(format!("image verification task failed: {}", join_err)),
    }
}
