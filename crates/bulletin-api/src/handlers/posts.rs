//! Post CRUD endpoints

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use bulletin_core::models::{
    CreatePostRequest, Post, PostWithComments, UpdatePostRequest,
};
use bulletin_core::AppError;
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;

const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListQuery {
    /// Number of posts to skip
    #[serde(default)]
    pub offset: i64,
    /// Page size, capped at 100
    #[serde(default = "default_limit")]
    pub limit: i64,
    /// Substring match over title and content
    pub search: Option<String>,
}

fn default_limit() -> i64 {
    20
}

fn clamp_page(offset: i64, limit: i64) -> (i64, i64) {
    (offset.max(0), limit.clamp(1, MAX_PAGE_SIZE))
}

/// List visible posts, newest first
#[utoipa::path(
    get,
    path = "/api/posts",
    tag = "posts",
    params(ListQuery),
    responses(
        (status = 200, description = "Posts", body = [Post])
    )
)]
pub async fn list_posts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Post>>, HttpAppError> {
    let (offset, limit) = clamp_page(query.offset, query.limit);
    let posts = state
        .posts
        .list(offset, limit, query.search.as_deref())
        .await?;
    Ok(Json(posts))
}

/// A single post with its comments
#[utoipa::path(
    get,
    path = "/api/posts/{id}",
    tag = "posts",
    params(("id" = Uuid, Path, description = "Post id")),
    responses(
        (status = 200, description = "Post with comments", body = PostWithComments),
        (status = 404, description = "Post not found", body = ErrorResponse)
    )
)]
pub async fn get_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<PostWithComments>, HttpAppError> {
    let post = state
        .posts
        .get_with_comments(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;
    Ok(Json(post))
}

/// Create a post
#[utoipa::path(
    post,
    path = "/api/posts",
    tag = "posts",
    security(("bearer_auth" = [])),
    request_body = CreatePostRequest,
    responses(
        (status = 201, description = "Post created", body = Post),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    )
)]
pub async fn create_post(
    State(state): State<Arc<AppState>>,
    current_user: CurrentUser,
    ValidatedJson(request): ValidatedJson<CreatePostRequest>,
) -> Result<(StatusCode, Json<Post>), HttpAppError> {
    let post = state.posts.create(current_user.user.id, &request).await?;
    tracing::info!(post_id = %post.id, author_id = %post.author_id, "Post created");
    Ok((StatusCode::CREATED, Json(post)))
}

/// Update a post (author only)
#[utoipa::path(
    put,
    path = "/api/posts/{id}",
    tag = "posts",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Post id")),
    request_body = UpdatePostRequest,
    responses(
        (status = 200, description = "Updated post", body = Post),
        (status = 403, description = "Not the author", body = ErrorResponse),
        (status = 404, description = "Post not found", body = ErrorResponse)
    )
)]
pub async fn update_post(
    State(state): State<Arc<AppState>>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdatePostRequest>,
) -> Result<Json<Post>, HttpAppError> {
    let post = state
        .posts
        .get_any(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

    if post.author_id != current_user.user.id {
        return Err(AppError::Forbidden("Only the author can edit this post".to_string()).into());
    }

    let updated = state
        .posts
        .update(id, &request)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;
    Ok(Json(updated))
}

/// Delete a post (author only)
#[utoipa::path(
    delete,
    path = "/api/posts/{id}",
    tag = "posts",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Post id")),
    responses(
        (status = 204, description = "Post deleted"),
        (status = 403, description = "Not the author", body = ErrorResponse),
        (status = 404, description = "Post not found", body = ErrorResponse)
    )
)]
pub async fn delete_post(
    State(state): State<Arc<AppState>>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, HttpAppError> {
    let post = state
        .posts
        .get_any(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

    if post.author_id != current_user.user.id {
        return Err(
            AppError::Forbidden("Only the author can delete this post".to_string()).into(),
        );
    }

    state.posts.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// A user's visible posts
#[utoipa::path(
    get,
    path = "/api/posts/user/{user_id}",
    tag = "posts",
    params(
        ("user_id" = Uuid, Path, description = "Author id"),
        ListQuery
    ),
    responses(
        (status = 200, description = "Posts by the user", body = [Post])
    )
)]
pub async fn posts_by_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Post>>, HttpAppError> {
    let (offset, limit) = clamp_page(query.offset, query.limit);
    let posts = state.posts.list_by_author(user_id, offset, limit).await?;
    Ok(Json(posts))
}
