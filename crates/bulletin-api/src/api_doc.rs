//! OpenAPI documentation

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::error;
use crate::handlers;
use bulletin_core::models;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bulletin API",
        version = "0.1.0",
        description = "Forum API with authenticated posting, comments, moderation, and all-or-nothing image upload batches."
    ),
    paths(
        // Auth
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::me,
        // Posts
        handlers::posts::list_posts,
        handlers::posts::get_post,
        handlers::posts::create_post,
        handlers::posts::update_post,
        handlers::posts::delete_post,
        handlers::posts::posts_by_user,
        // Comments
        handlers::comments::comments_for_post,
        handlers::comments::create_comment,
        handlers::comments::update_comment,
        handlers::comments::delete_comment,
        handlers::comments::comments_by_user,
        // Uploads
        handlers::upload::upload_image,
        handlers::upload::upload_images,
        // Admin
        handlers::admin::list_users,
        handlers::admin::block_user,
        handlers::admin::unblock_user,
        handlers::admin::list_all_posts,
        handlers::admin::hide_post,
        handlers::admin::delete_any_post,
        handlers::admin::list_all_comments,
        handlers::admin::hide_comment,
        handlers::admin::delete_any_comment,
        // Health
        handlers::health::health,
    ),
    components(schemas(
        models::UserRole,
        models::UserResponse,
        models::RegisterRequest,
        models::LoginRequest,
        models::TokenResponse,
        models::Post,
        models::PostWithComments,
        models::CreatePostRequest,
        models::UpdatePostRequest,
        models::Comment,
        models::CreateCommentRequest,
        models::UpdateCommentRequest,
        handlers::upload::UploadResponse,
        handlers::upload::BatchUploadResponse,
        error::ErrorResponse,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "auth", description = "Registration and login"),
        (name = "posts", description = "Forum posts"),
        (name = "comments", description = "Post comments"),
        (name = "upload", description = "Image uploads"),
        (name = "admin", description = "Moderation"),
        (name = "health", description = "Liveness")
    )
)]
pub struct ApiDoc;
