//! Common utilities for file upload handlers

use axum::extract::Multipart;
use bulletin_core::AppError;

use crate::services::UploadCandidate;

/// Extract a single file from a multipart form. Exactly one field named
/// "file" is accepted; multiple file fields are rejected.
pub async fn extract_single_file(mut multipart: Multipart) -> Result<UploadCandidate, AppError> {
    let mut candidate: Option<UploadCandidate> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Failed to read multipart: {}", e)))?
    {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();

        if field_name == "file" {
            if candidate.is_some() {
                return Err(AppError::InvalidInput(
                    "Multiple file fields are not allowed; send exactly one field named 'file'"
                        .to_string(),
                ));
            }

            let filename = field
                .file_name()
                .map(|s: &str| s.to_string())
                .ok_or_else(|| AppError::InvalidInput("File field has no filename".to_string()))?;

            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::InvalidInput(format!("Failed to read file data: {}", e)))?;

            candidate = Some(UploadCandidate {
                filename,
                data: data.to_vec(),
            });
        }
    }

    candidate.ok_or_else(|| AppError::InvalidInput("No file provided".to_string()))
}

/// Extract every "files" field from a multipart form, preserving order
pub async fn extract_file_batch(mut multipart: Multipart) -> Result<Vec<UploadCandidate>, AppError> {
    let mut candidates = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Failed to read multipart: {}", e)))?
    {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();

        if field_name == "files" {
            let filename = field
                .file_name()
                .map(|s: &str| s.to_string())
                .ok_or_else(|| AppError::InvalidInput("File field has no filename".to_string()))?;

            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::InvalidInput(format!("Failed to read file data: {}", e)))?;

            candidates.push(UploadCandidate {
                filename,
                data: data.to_vec(),
            });
        }
    }

    Ok(candidates)
}
