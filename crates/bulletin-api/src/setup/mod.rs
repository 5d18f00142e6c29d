//! Application setup and initialization
//!
//! All startup logic lives here rather than in main.rs so integration tests
//! can assemble the same application against their own config.

pub mod database;
pub mod routes;
pub mod server;
pub mod storage;

use std::sync::Arc;

use anyhow::Result;
use bulletin_core::Config;

use crate::state::AppState;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    crate::telemetry::init_telemetry();

    tracing::info!(environment = %config.environment, "Configuration loaded");

    let pool = database::setup_database(&config).await?;
    let blob_store = storage::setup_storage(&config).await?;

    let state = Arc::new(AppState::new(config, pool, blob_store));
    let router = routes::setup_routes(state.clone())?;

    Ok((state, router))
}
