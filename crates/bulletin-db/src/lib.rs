//! Database repositories for the data access layer
//!
//! Each repository owns a pool handle and is responsible for one domain
//! entity, providing CRUD operations and specialized queries. Rows are
//! fetched into plain row structs and converted to domain models at the
//! boundary, so callers never see storage representations.

pub mod db;

pub use db::comment::CommentRepository;
pub use db::post::PostRepository;
pub use db::user::UserRepository;
