//! Shared application state

use std::sync::Arc;

use bulletin_core::Config;
use bulletin_db::{CommentRepository, PostRepository, UserRepository};
use bulletin_storage::BlobStore;
use sqlx::SqlitePool;

use crate::auth::JwtService;
use crate::services::{IngestPolicy, MediaIngestService};

/// Everything handlers need, cloned cheaply behind an Arc by axum
pub struct AppState {
    pub config: Config,
    pub pool: SqlitePool,
    pub users: UserRepository,
    pub posts: PostRepository,
    pub comments: CommentRepository,
    pub ingest: MediaIngestService,
    pub jwt: JwtService,
}

impl AppState {
    pub fn new(config: Config, pool: SqlitePool, storage: Arc<dyn BlobStore>) -> Self {
        let ingest = MediaIngestService::new(storage, IngestPolicy::from_config(&config));
        let jwt = JwtService::new(&config.jwt_secret, config.jwt_expiry_minutes);

        Self {
            users: UserRepository::new(pool.clone()),
            posts: PostRepository::new(pool.clone()),
            comments: CommentRepository::new(pool.clone()),
            pool,
            ingest,
            jwt,
            config,
        }
    }
}
