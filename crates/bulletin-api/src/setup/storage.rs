//! Blob store setup

use std::sync::Arc;

use anyhow::{Context, Result};
use bulletin_core::Config;
use bulletin_storage::{BlobStore, LocalStorage};

/// Create the blob store rooted at the configured upload path
pub async fn setup_storage(config: &Config) -> Result<Arc<dyn BlobStore>> {
    let storage = LocalStorage::new(
        config.upload_path.clone(),
        config.upload_base_url.clone(),
    )
    .await
    .context("Failed to initialize local storage")?;

    tracing::info!(
        path = %config.upload_path,
        base_url = %config.upload_base_url,
        "Local storage ready"
    );

    Ok(Arc::new(storage))
}
