//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p bulletin-api`. Each test gets an
//! in-memory database and a temporary upload directory.

pub mod auth;
pub mod fixtures;

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use axum_test::TestServer;
use bulletin_api::setup::routes::setup_routes;
use bulletin_api::state::AppState;
use bulletin_core::Config;
use bulletin_storage::{BlobStore, LocalStorage};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tempfile::TempDir;

/// Test application: server, pool, and owned resources.
pub struct TestApp {
    pub server: TestServer,
    pub pool: sqlx::SqlitePool,
    pub upload_dir: PathBuf,
    pub _temp_dir: TempDir,
}

impl TestApp {
    /// Number of blobs currently in the upload directory
    pub fn stored_file_count(&self) -> usize {
        std::fs::read_dir(&self.upload_dir)
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}

fn test_config(upload_path: &std::path::Path) -> Config {
    Config {
        server_port: 0,
        cors_origins: vec!["*".to_string()],
        environment: "test".to_string(),
        database_url: "sqlite::memory:".to_string(),
        db_max_connections: 1,
        jwt_secret: "test-secret-not-for-production".to_string(),
        jwt_expiry_minutes: 30,
        upload_path: upload_path.to_string_lossy().into_owned(),
        upload_base_url: "/uploads".to_string(),
        max_file_size_bytes: 2 * 1024 * 1024,
        allowed_extensions: vec![
            ".jpg".to_string(),
            ".jpeg".to_string(),
            ".png".to_string(),
            ".gif".to_string(),
        ],
        max_batch_size: 5,
    }
}

/// Setup a test app with an isolated in-memory DB and temp-dir storage.
pub async fn setup_test_app() -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let upload_dir = temp_dir.path().join("uploads");
    let config = test_config(&upload_dir);

    // A single connection keeps the in-memory database alive and shared
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("connect options")
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("Failed to open in-memory database");

    sqlx::migrate!("../../migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    let storage: Arc<dyn BlobStore> = Arc::new(
        LocalStorage::new(&upload_dir, "/uploads".to_string())
            .await
            .expect("Failed to create local storage"),
    );

    let state = Arc::new(AppState::new(config, pool.clone(), storage));
    let router = setup_routes(state).expect("Failed to build router");
    let server = TestServer::new(router).expect("Failed to start test server");

    TestApp {
        server,
        pool,
        upload_dir,
        _temp_dir: temp_dir,
    }
}
