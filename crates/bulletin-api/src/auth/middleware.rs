//! Authentication and authorization middleware
//!
//! `auth_middleware` verifies the bearer token, loads the user, and stores a
//! [`CurrentUser`] in request extensions. `admin_middleware` runs after it
//! on admin-only route groups.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use bulletin_core::AppError;
use uuid::Uuid;

use crate::auth::models::CurrentUser;
use crate::error::HttpAppError;
use crate::state::AppState;

pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    // Owned copy of the header so the request is not borrowed across awaits
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .map(str::to_owned);

    match authenticate(&state, auth_header).await {
        Ok(current_user) => {
            request.extensions_mut().insert(current_user);
            next.run(request).await
        }
        Err(err) => HttpAppError::from(err).into_response(),
    }
}

async fn authenticate(
    state: &AppState,
    auth_header: Option<String>,
) -> Result<CurrentUser, AppError> {
    let header = auth_header
        .ok_or_else(|| AppError::Unauthorized("Missing authorization header".to_string()))?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("Expected bearer token".to_string()))?;

    let claims = state.jwt.verify(token)?;
    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| AppError::Unauthorized("Invalid token subject".to_string()))?;

    let user = state
        .users
        .get_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User no longer exists".to_string()))?;

    if user.is_blocked {
        tracing::warn!(user_id = %user.id, "Blocked user attempted access");
        return Err(AppError::Forbidden("Account is blocked".to_string()));
    }

    Ok(CurrentUser { user })
}

/// Rejects requests whose authenticated user is not an admin. Must be
/// layered after `auth_middleware`.
pub async fn admin_middleware(request: Request, next: Next) -> Response {
    let Some(current_user) = request.extensions().get::<CurrentUser>() else {
        return HttpAppError(AppError::Unauthorized("Not authenticated".to_string()))
            .into_response();
    };

    if !current_user.is_admin() {
        return HttpAppError(AppError::Forbidden(
            "Admin privileges required".to_string(),
        ))
        .into_response();
    }

    next.run(request).await
}
