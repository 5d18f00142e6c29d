//! Configuration module
//!
//! Environment-driven configuration with sensible defaults, loaded once at
//! startup. A `.env` file is honored when present (dotenvy).

use std::env;

use anyhow::Context;

const DEFAULT_MAX_FILE_SIZE_MB: usize = 20;
const DEFAULT_MAX_BATCH_SIZE: usize = 10;
const DEFAULT_JWT_EXPIRY_MINUTES: i64 = 30;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    pub database_url: String,
    pub db_max_connections: u32,
    pub jwt_secret: String,
    pub jwt_expiry_minutes: i64,
    /// Root directory of the blob store
    pub upload_path: String,
    /// Mount prefix public URLs are derived from (e.g. "/uploads")
    pub upload_base_url: String,
    pub max_file_size_bytes: usize,
    /// Allowed image extensions, with leading dot, lowercase
    pub allowed_extensions: Vec<String>,
    pub max_batch_size: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let max_file_size_mb = env::var("MAX_FILE_SIZE_MB")
            .ok()
            .map(|v| v.parse::<usize>())
            .transpose()
            .context("MAX_FILE_SIZE_MB must be an integer")?
            .unwrap_or(DEFAULT_MAX_FILE_SIZE_MB);

        let allowed_extensions = env::var("ALLOWED_EXTENSIONS")
            .unwrap_or_else(|_| ".jpg,.jpeg,.png,.gif".to_string())
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Config {
            server_port: env::var("PORT")
                .ok()
                .map(|v| v.parse::<u16>())
                .transpose()
                .context("PORT must be a valid port number")?
                .unwrap_or(8000),
            cors_origins,
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://bulletin.db".to_string()),
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .ok()
                .map(|v| v.parse::<u32>())
                .transpose()
                .context("DB_MAX_CONNECTIONS must be an integer")?
                .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS),
            jwt_secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| "change-this-secret-in-production".to_string()),
            jwt_expiry_minutes: env::var("JWT_EXPIRY_MINUTES")
                .ok()
                .map(|v| v.parse::<i64>())
                .transpose()
                .context("JWT_EXPIRY_MINUTES must be an integer")?
                .unwrap_or(DEFAULT_JWT_EXPIRY_MINUTES),
            upload_path: env::var("UPLOAD_PATH").unwrap_or_else(|_| "uploads".to_string()),
            upload_base_url: env::var("UPLOAD_BASE_URL")
                .unwrap_or_else(|_| "/uploads".to_string()),
            max_file_size_bytes: max_file_size_mb * 1024 * 1024,
            allowed_extensions,
            max_batch_size: env::var("MAX_BATCH_SIZE")
                .ok()
                .map(|v| v.parse::<usize>())
                .transpose()
                .context("MAX_BATCH_SIZE must be an integer")?
                .unwrap_or(DEFAULT_MAX_BATCH_SIZE),
        })
    }

    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        // Only assert values no env override is expected to touch in CI
        let config = Config {
            server_port: 8000,
            cors_origins: vec!["http://localhost:3000".to_string()],
            environment: "development".to_string(),
            database_url: "sqlite://bulletin.db".to_string(),
            db_max_connections: DEFAULT_DB_MAX_CONNECTIONS,
            jwt_secret: "test".to_string(),
            jwt_expiry_minutes: DEFAULT_JWT_EXPIRY_MINUTES,
            upload_path: "uploads".to_string(),
            upload_base_url: "/uploads".to_string(),
            max_file_size_bytes: DEFAULT_MAX_FILE_SIZE_MB * 1024 * 1024,
            allowed_extensions: vec![
                ".jpg".to_string(),
                ".jpeg".to_string(),
                ".png".to_string(),
                ".gif".to_string(),
            ],
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
        };
        assert!(!config.is_production());
        assert_eq!(config.max_file_size_bytes, 20 * 1024 * 1024);
        assert_eq!(config.max_batch_size, 10);
    }

    #[test]
    fn test_is_production() {
        let mut config = Config {
            server_port: 8000,
            cors_origins: vec![],
            environment: "production".to_string(),
            database_url: String::new(),
            db_max_connections: 1,
            jwt_secret: String::new(),
            jwt_expiry_minutes: 30,
            upload_path: String::new(),
            upload_base_url: String::new(),
            max_file_size_bytes: 0,
            allowed_extensions: vec![],
            max_batch_size: 0,
        };
        assert!(config.is_production());
        config.environment = "Prod".to_string();
        assert!(config.is_production());
    }
}
