//! Registration, login, and current-user endpoints

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use bulletin_core::models::{
    LoginRequest, RegisterRequest, TokenResponse, UserResponse, UserRole,
};
use bulletin_core::AppError;

use crate::auth::{password, CurrentUser};
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;

/// Register a new user account
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 409, description = "Username or email already taken", body = ErrorResponse)
    )
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), HttpAppError> {
    if state.users.get_by_username(&request.username).await?.is_some() {
        return Err(AppError::Conflict("Username already registered".to_string()).into());
    }
    if state.users.get_by_email(&request.email).await?.is_some() {
        return Err(AppError::Conflict("Email already registered".to_string()).into());
    }

    let hashed = password::hash_password(request.password).await?;
    let user = state
        .users
        .create(&request.username, &request.email, &hashed, UserRole::User)
        .await?;

    tracing::info!(user_id = %user.id, username = %user.username, "User registered");

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Log in with username and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 401, description = "Incorrect credentials", body = ErrorResponse),
        (status = 403, description = "Account is blocked", body = ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, HttpAppError> {
    let user = state
        .users
        .get_by_username(&request.username)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Incorrect username or password".to_string()))?;

    let valid =
        password::verify_password(request.password, user.hashed_password.clone()).await?;
    if !valid {
        return Err(AppError::Unauthorized("Incorrect username or password".to_string()).into());
    }

    if user.is_blocked {
        return Err(AppError::Forbidden("Account is blocked".to_string()).into());
    }

    let access_token = state.jwt.issue(&user)?;

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
        user: user.into(),
    }))
}

/// The authenticated user's own profile
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    )
)]
pub async fn me(current_user: CurrentUser) -> Json<UserResponse> {
    Json(current_user.user.into())
}
