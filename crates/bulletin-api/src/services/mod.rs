//! Application services

pub mod ingest;

pub use ingest::{IngestError, IngestPolicy, MediaIngestService, StoredAsset, UploadCandidate};
