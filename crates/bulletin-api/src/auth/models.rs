use axum::extract::FromRequestParts;
use axum::http::{request::Parts, StatusCode};
use axum::Json;
use bulletin_core::models::{User, UserRole};

use crate::error::ErrorResponse;

/// Authenticated user extracted from a verified token and stored in request
/// extensions by the auth middleware.
///
/// Implemented via FromRequestParts rather than Extension because Extension
/// cannot be combined with Multipart extractors.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.user.role == UserRole::Admin
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(ErrorResponse {
                        error: "Not authenticated".to_string(),
                        details: None,
                        error_type: None,
                        code: "UNAUTHORIZED".to_string(),
                    }),
                )
            })
    }
}
