//! Moderation endpoints, reachable only through the admin middleware

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use bulletin_core::models::{Comment, Post, UserResponse};
use bulletin_core::AppError;
use uuid::Uuid;

use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::posts::ListQuery;
use crate::state::AppState;

/// List all user accounts
#[utoipa::path(
    get,
    path = "/api/admin/users",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(ListQuery),
    responses(
        (status = 200, description = "Users", body = [UserResponse]),
        (status = 403, description = "Admin privileges required", body = ErrorResponse)
    )
)]
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<UserResponse>>, HttpAppError> {
    let offset = query.offset.max(0);
    let limit = query.limit.clamp(1, 100);
    let users = state.users.list(offset, limit).await?;
    Ok(Json(users.into_iter().map(Into::into).collect()))
}

/// Block a user account
#[utoipa::path(
    put,
    path = "/api/admin/users/{id}/block",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "User blocked", body = UserResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn block_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserResponse>, HttpAppError> {
    let user = state
        .users
        .set_blocked(id, true)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    tracing::info!(user_id = %id, "User blocked");
    Ok(Json(user.into()))
}

/// Unblock a user account
#[utoipa::path(
    put,
    path = "/api/admin/users/{id}/unblock",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "User unblocked", body = UserResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn unblock_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserResponse>, HttpAppError> {
    let user = state
        .users
        .set_blocked(id, false)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    tracing::info!(user_id = %id, "User unblocked");
    Ok(Json(user.into()))
}

/// All posts, hidden included
#[utoipa::path(
    get,
    path = "/api/admin/posts",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(ListQuery),
    responses(
        (status = 200, description = "Posts", body = [Post]),
        (status = 403, description = "Admin privileges required", body = ErrorResponse)
    )
)]
pub async fn list_all_posts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Post>>, HttpAppError> {
    let offset = query.offset.max(0);
    let limit = query.limit.clamp(1, 100);
    let posts = state.posts.list_all(offset, limit).await?;
    Ok(Json(posts))
}

/// Hide a post from public queries
#[utoipa::path(
    put,
    path = "/api/admin/posts/{id}/hide",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Post id")),
    responses(
        (status = 204, description = "Post hidden"),
        (status = 404, description = "Post not found", body = ErrorResponse)
    )
)]
pub async fn hide_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, HttpAppError> {
    if !state.posts.hide(id).await? {
        return Err(AppError::NotFound("Post not found".to_string()).into());
    }
    tracing::info!(post_id = %id, "Post hidden");
    Ok(StatusCode::NO_CONTENT)
}

/// Delete any post
#[utoipa::path(
    delete,
    path = "/api/admin/posts/{id}",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Post id")),
    responses(
        (status = 204, description = "Post deleted"),
        (status = 404, description = "Post not found", body = ErrorResponse)
    )
)]
pub async fn delete_any_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, HttpAppError> {
    if !state.posts.delete(id).await? {
        return Err(AppError::NotFound("Post not found".to_string()).into());
    }
    tracing::info!(post_id = %id, "Post deleted by admin");
    Ok(StatusCode::NO_CONTENT)
}

/// All comments, hidden included
#[utoipa::path(
    get,
    path = "/api/admin/comments",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(ListQuery),
    responses(
        (status = 200, description = "Comments", body = [Comment]),
        (status = 403, description = "Admin privileges required", body = ErrorResponse)
    )
)]
pub async fn list_all_comments(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Comment>>, HttpAppError> {
    let offset = query.offset.max(0);
    let limit = query.limit.clamp(1, 100);
    let comments = state.comments.list_all(offset, limit).await?;
    Ok(Json(comments))
}

/// Hide a comment from public queries
#[utoipa::path(
    put,
    path = "/api/admin/comments/{id}/hide",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Comment id")),
    responses(
        (status = 204, description = "Comment hidden"),
        (status = 404, description = "Comment not found", body = ErrorResponse)
    )
)]
pub async fn hide_comment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, HttpAppError> {
    if !state.comments.hide(id).await? {
        return Err(AppError::NotFound("Comment not found".to_string()).into());
    }
    tracing::info!(comment_id = %id, "Comment hidden");
    Ok(StatusCode::NO_CONTENT)
}

/// Delete any comment
#[utoipa::path(
    delete,
    path = "/api/admin/comments/{id}",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Comment id")),
    responses(
        (status = 204, description = "Comment deleted"),
        (status = 404, description = "Comment not found", body = ErrorResponse)
    )
)]
pub async fn delete_any_comment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, HttpAppError> {
    if !state.comments.delete(id).await? {
        return Err(AppError::NotFound("Comment not found".to_string()).into());
    }
    tracing::info!(comment_id = %id, "Comment deleted by admin");
    Ok(StatusCode::NO_CONTENT)
}
