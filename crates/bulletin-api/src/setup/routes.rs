//! Route configuration and setup

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use bulletin_core::Config;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

use crate::api_doc::ApiDoc;
use crate::auth::middleware::{admin_middleware, auth_middleware};
use crate::handlers::{admin, auth, comments, health, posts, upload};
use crate::state::AppState;

/// Setup all application routes
pub fn setup_routes(state: Arc<AppState>) -> Result<Router> {
    let cors = setup_cors(&state.config)?;

    let public_routes = Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/posts", get(posts::list_posts))
        .route("/api/posts/{id}", get(posts::get_post))
        .route("/api/posts/user/{user_id}", get(posts::posts_by_user))
        .route(
            "/api/comments/post/{post_id}",
            get(comments::comments_for_post),
        )
        .route(
            "/api/comments/user/{user_id}",
            get(comments::comments_by_user),
        )
        .route("/health", get(health::health));

    let protected_routes = Router::new()
        .route("/api/auth/me", get(auth::me))
        .route("/api/posts", post(posts::create_post))
        .route(
            "/api/posts/{id}",
            put(posts::update_post).delete(posts::delete_post),
        )
        .route("/api/comments/post/{post_id}", post(comments::create_comment))
        .route(
            "/api/comments/{id}",
            put(comments::update_comment).delete(comments::delete_comment),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // A whole batch can arrive in one request body, so the limit covers the
    // worst case plus multipart overhead.
    let upload_body_limit =
        state.config.max_file_size_bytes * state.config.max_batch_size + 1024 * 1024;
    let upload_routes = Router::new()
        .route("/api/upload/image", post(upload::upload_image))
        .route("/api/upload/images", post(upload::upload_images))
        .layer(DefaultBodyLimit::max(upload_body_limit))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Admin routes check the role after authentication
    let admin_routes = Router::new()
        .route("/api/admin/users", get(admin::list_users))
        .route("/api/admin/users/{id}/block", put(admin::block_user))
        .route("/api/admin/users/{id}/unblock", put(admin::unblock_user))
        .route("/api/admin/posts", get(admin::list_all_posts))
        .route("/api/admin/posts/{id}/hide", put(admin::hide_post))
        .route(
            "/api/admin/posts/{id}",
            axum::routing::delete(admin::delete_any_post),
        )
        .route("/api/admin/comments", get(admin::list_all_comments))
        .route("/api/admin/comments/{id}/hide", put(admin::hide_comment))
        .route(
            "/api/admin/comments/{id}",
            axum::routing::delete(admin::delete_any_comment),
        )
        .route_layer(axum::middleware::from_fn(admin_middleware))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let app = public_routes
        .merge(protected_routes)
        .merge(upload_routes)
        .merge(admin_routes)
        .merge(RapiDoc::with_openapi("/api/openapi.json", ApiDoc::openapi()).path("/docs"))
        .nest_service(
            "/uploads",
            ServeDir::new(&state.config.upload_path),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

fn setup_cors(config: &Config) -> Result<CorsLayer> {
    if config.cors_origins.iter().any(|origin| origin == "*") {
        return Ok(CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any));
    }

    let origins = config
        .cors_origins
        .iter()
        .map(|origin| origin.parse::<HeaderValue>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .context("Invalid CORS origin")?;

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any))
}
