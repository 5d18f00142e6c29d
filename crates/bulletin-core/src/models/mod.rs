//! Domain models shared across Bulletin components

pub mod comment;
pub mod post;
pub mod user;

pub use comment::{Comment, CreateCommentRequest, UpdateCommentRequest};
pub use post::{CreatePostRequest, Post, PostWithComments, UpdatePostRequest};
pub use user::{
    LoginRequest, RegisterRequest, TokenResponse, User, UserResponse, UserRole,
};
