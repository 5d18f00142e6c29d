//! Image upload endpoints
//!
//! Thin HTTP face over [`crate::services::MediaIngestService`]; all policy
//! enforcement, storage, and rollback lives in the engine.

use std::sync::Arc;

use axum::{extract::{Multipart, State}, Json};
use bulletin_core::AppError;
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::CurrentUser;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::utils::upload::{extract_file_batch, extract_single_file};

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    /// Public URL of the stored image
    pub url: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BatchUploadResponse {
    /// Public URLs in the order the files were sent
    pub urls: Vec<String>,
}

/// Upload a single image
#[utoipa::path(
    post,
    path = "/api/upload/image",
    tag = "upload",
    security(("bearer_auth" = [])),
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Image stored", body = UploadResponse),
        (status = 400, description = "Invalid or non-image file", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(user_id = %current_user.user.id))]
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    current_user: CurrentUser,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, HttpAppError> {
    let candidate = extract_single_file(multipart).await?;
    let asset = state.ingest.ingest_one(candidate).await?;

    Ok(Json(UploadResponse {
        url: asset.public_url,
    }))
}

/// Upload a batch of images, all-or-nothing
#[utoipa::path(
    post,
    path = "/api/upload/images",
    tag = "upload",
    security(("bearer_auth" = [])),
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "All images stored", body = BatchUploadResponse),
        (status = 400, description = "Batch rejected, nothing stored", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 500, description = "Storage failure, batch rolled back", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(user_id = %current_user.user.id))]
pub async fn upload_images(
    State(state): State<Arc<AppState>>,
    current_user: CurrentUser,
    multipart: Multipart,
) -> Result<Json<BatchUploadResponse>, HttpAppError> {
    let candidates = extract_file_batch(multipart).await?;
    if candidates.is_empty() {
        return Err(AppError::InvalidInput("No files provided".to_string()).into());
    }

    let assets = state.ingest.ingest_batch(candidates).await?;

    Ok(Json(BatchUploadResponse {
        urls: assets.into_iter().map(|a| a.public_url).collect(),
    }))
}
