//! Comment CRUD endpoints

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use bulletin_core::models::{Comment, CreateCommentRequest, UpdateCommentRequest};
use bulletin_core::AppError;
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::handlers::posts::ListQuery;
use crate::state::AppState;

/// Visible comments on a post, oldest first
#[utoipa::path(
    get,
    path = "/api/comments/post/{post_id}",
    tag = "comments",
    params(("post_id" = Uuid, Path, description = "Post id")),
    responses(
        (status = 200, description = "Comments", body = [Comment]),
        (status = 404, description = "Post not found", body = ErrorResponse)
    )
)]
pub async fn comments_for_post(
    State(state): State<Arc<AppState>>,
    Path(post_id): Path<Uuid>,
) -> Result<Json<Vec<Comment>>, HttpAppError> {
    state
        .posts
        .get_visible(post_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

    let comments = state.comments.list_for_post(post_id).await?;
    Ok(Json(comments))
}

/// Comment on a post
#[utoipa::path(
    post,
    path = "/api/comments/post/{post_id}",
    tag = "comments",
    security(("bearer_auth" = [])),
    params(("post_id" = Uuid, Path, description = "Post id")),
    request_body = CreateCommentRequest,
    responses(
        (status = 201, description = "Comment created", body = Comment),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "Post not found", body = ErrorResponse)
    )
)]
pub async fn create_comment(
    State(state): State<Arc<AppState>>,
    current_user: CurrentUser,
    Path(post_id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<CreateCommentRequest>,
) -> Result<(StatusCode, Json<Comment>), HttpAppError> {
    state
        .posts
        .get_visible(post_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

    let comment = state
        .comments
        .create(post_id, current_user.user.id, &request)
        .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// Edit a comment (author only)
#[utoipa::path(
    put,
    path = "/api/comments/{id}",
    tag = "comments",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Comment id")),
    request_body = UpdateCommentRequest,
    responses(
        (status = 200, description = "Updated comment", body = Comment),
        (status = 403, description = "Not the author", body = ErrorResponse),
        (status = 404, description = "Comment not found", body = ErrorResponse)
    )
)]
pub async fn update_comment(
    State(state): State<Arc<AppState>>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateCommentRequest>,
) -> Result<Json<Comment>, HttpAppError> {
    let comment = state
        .comments
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))?;

    if comment.author_id != current_user.user.id {
        return Err(
            AppError::Forbidden("Only the author can edit this comment".to_string()).into(),
        );
    }

    let updated = state
        .comments
        .update(id, &request)
        .await?
        .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))?;
    Ok(Json(updated))
}

/// Delete a comment (author only)
#[utoipa::path(
    delete,
    path = "/api/comments/{id}",
    tag = "comments",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Comment id")),
    responses(
        (status = 204, description = "Comment deleted"),
        (status = 403, description = "Not the author", body = ErrorResponse),
        (status = 404, description = "Comment not found", body = ErrorResponse)
    )
)]
pub async fn delete_comment(
    State(state): State<Arc<AppState>>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, HttpAppError> {
    let comment = state
        .comments
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))?;

    if comment.author_id != current_user.user.id {
        return Err(
            AppError::Forbidden("Only the author can delete this comment".to_string()).into(),
        );
    }

    state.comments.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// A user's visible comments
#[utoipa::path(
    get,
    path = "/api/comments/user/{user_id}",
    tag = "comments",
    params(
        ("user_id" = Uuid, Path, description = "Author id"),
        ListQuery
    ),
    responses(
        (status = 200, description = "Comments by the user", body = [Comment])
    )
)]
pub async fn comments_by_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Comment>>, HttpAppError> {
    let offset = query.offset.max(0);
    let limit = query.limit.clamp(1, 100);
    let comments = state
        .comments
        .list_by_author(user_id, offset, limit)
        .await?;
    Ok(Json(comments))
}
