//! Post repository
//!
//! Visible queries exclude hidden posts; the `_all` variants exist for
//! moderation and include them.

use bulletin_core::models::{
    CreatePostRequest, Post, PostWithComments, UpdatePostRequest, UserResponse, UserRole,
};
use bulletin_core::AppError;
use chrono::{DateTime, Utc};
use sqlx::{Sqlite, SqlitePool};
use uuid::Uuid;

use super::comment::CommentRepository;

const POST_COLUMNS: &str = "p.id, p.title, p.content, p.image_urls, p.author_id, p.is_hidden, \
     p.created_at, p.updated_at, u.username AS author_username, u.email AS author_email, \
     u.role AS author_role, u.is_blocked AS author_is_blocked, u.created_at AS author_created_at";

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct PostRow {
    pub id: String,
    pub title: String,
    pub content: String,
    pub image_urls: String,
    pub author_id: String,
    pub is_hidden: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub author_username: String,
    pub author_email: String,
    pub author_role: String,
    pub author_is_blocked: bool,
    pub author_created_at: DateTime<Utc>,
}

impl PostRow {
    fn into_post(self) -> Result<Post, AppError> {
        let author_id = Uuid::parse_str(&self.author_id)
            .map_err(|e| AppError::Internal(format!("Corrupt author id: {}", e)))?;
        Ok(Post {
            id: Uuid::parse_str(&self.id)
                .map_err(|e| AppError::Internal(format!("Corrupt post id: {}", e)))?,
            title: self.title,
            content: self.content,
            image_urls: serde_json::from_str(&self.image_urls)
                .map_err(|e| AppError::Internal(format!("Corrupt image_urls: {}", e)))?,
            author_id,
            is_hidden: self.is_hidden,
            created_at: self.created_at,
            updated_at: self.updated_at,
            author: UserResponse {
                id: author_id,
                username: self.author_username,
                email: self.author_email,
                role: UserRole::parse(&self.author_role),
                is_blocked: self.author_is_blocked,
                created_at: self.author_created_at,
            },
        })
    }
}

fn rows_to_posts(rows: Vec<PostRow>) -> Result<Vec<Post>, AppError> {
    rows.into_iter().map(PostRow::into_post).collect()
}

/// Repository for forum posts
#[derive(Clone)]
pub struct PostRepository {
    pool: SqlitePool,
    comments: CommentRepository,
}

impl PostRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool: pool.clone(),
            comments: CommentRepository::new(pool),
        }
    }

    pub async fn create(
        &self,
        author_id: Uuid,
        request: &CreatePostRequest,
    ) -> Result<Post, AppError> {
        let id = Uuid::new_v4();
        let created_at = Utc::now();
        let image_urls = serde_json::to_string(&request.image_urls)?;

        sqlx::query(
            "INSERT INTO posts (id, title, content, image_urls, author_id, is_hidden, created_at)
             VALUES (?, ?, ?, ?, ?, 0, ?)",
        )
        .bind(id.to_string())
        .bind(&request.title)
        .bind(&request.content)
        .bind(image_urls)
        .bind(author_id.to_string())
        .bind(created_at)
        .execute(&self.pool)
        .await?;

        self.get_any(id)
            .await?
            .ok_or_else(|| AppError::Internal("Post vanished after insert".to_string()))
    }

    /// Fetch a post regardless of its hidden flag (moderation and internal use)
    pub async fn get_any(&self, id: Uuid) -> Result<Option<Post>, AppError> {
        let query = format!(
            "SELECT {POST_COLUMNS} FROM posts p JOIN users u ON u.id = p.author_id WHERE p.id = ?"
        );
        let row: Option<PostRow> = sqlx::query_as::<Sqlite, PostRow>(&query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(PostRow::into_post).transpose()
    }

    /// Fetch a visible post by id; hidden posts are reported as absent
    pub async fn get_visible(&self, id: Uuid) -> Result<Option<Post>, AppError> {
        let query = format!(
            "SELECT {POST_COLUMNS} FROM posts p JOIN users u ON u.id = p.author_id \
             WHERE p.id = ? AND p.is_hidden = 0"
        );
        let row: Option<PostRow> = sqlx::query_as::<Sqlite, PostRow>(&query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(PostRow::into_post).transpose()
    }

    /// Fetch a visible post together with its visible comments
    pub async fn get_with_comments(&self, id: Uuid) -> Result<Option<PostWithComments>, AppError> {
        let Some(post) = self.get_visible(id).await? else {
            return Ok(None);
        };
        let comments = self.comments.list_for_post(id).await?;
        Ok(Some(PostWithComments { post, comments }))
    }

    /// List visible posts, newest first, optionally filtered by a search
    /// term matched against title and content.
    pub async fn list(
        &self,
        offset: i64,
        limit: i64,
        search: Option<&str>,
    ) -> Result<Vec<Post>, AppError> {
        let rows: Vec<PostRow> = match search {
            Some(term) => {
                let pattern = format!("%{}%", term);
                let query = format!(
                    "SELECT {POST_COLUMNS} FROM posts p JOIN users u ON u.id = p.author_id \
                     WHERE p.is_hidden = 0 AND (p.title LIKE ? OR p.content LIKE ?) \
                     ORDER BY p.created_at DESC LIMIT ? OFFSET ?"
                );
                sqlx::query_as::<Sqlite, PostRow>(&query)
                    .bind(&pattern)
                    .bind(&pattern)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let query = format!(
                    "SELECT {POST_COLUMNS} FROM posts p JOIN users u ON u.id = p.author_id \
                     WHERE p.is_hidden = 0 ORDER BY p.created_at DESC LIMIT ? OFFSET ?"
                );
                sqlx::query_as::<Sqlite, PostRow>(&query)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        rows_to_posts(rows)
    }

    /// List all posts including hidden ones, newest first (moderation)
    pub async fn list_all(&self, offset: i64, limit: i64) -> Result<Vec<Post>, AppError> {
        let query = format!(
            "SELECT {POST_COLUMNS} FROM posts p JOIN users u ON u.id = p.author_id \
             ORDER BY p.created_at DESC LIMIT ? OFFSET ?"
        );
        let rows: Vec<PostRow> = sqlx::query_as::<Sqlite, PostRow>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        rows_to_posts(rows)
    }

    /// List a user's visible posts, newest first
    pub async fn list_by_author(
        &self,
        author_id: Uuid,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Post>, AppError> {
        let query = format!(
            "SELECT {POST_COLUMNS} FROM posts p JOIN users u ON u.id = p.author_id \
             WHERE p.author_id = ? AND p.is_hidden = 0 \
             ORDER BY p.created_at DESC LIMIT ? OFFSET ?"
        );
        let rows: Vec<PostRow> = sqlx::query_as::<Sqlite, PostRow>(&query)
            .bind(author_id.to_string())
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        rows_to_posts(rows)
    }

    /// Apply the provided fields and stamp updated_at; returns the updated
    /// post, or None if it does not exist.
    pub async fn update(
        &self,
        id: Uuid,
        request: &UpdatePostRequest,
    ) -> Result<Option<Post>, AppError> {
        let Some(current) = self.get_any(id).await? else {
            return Ok(None);
        };

        let title = request.title.as_deref().unwrap_or(&current.title);
        let content = request.content.as_deref().unwrap_or(&current.content);
        let image_urls = request
            .image_urls
            .as_ref()
            .unwrap_or(&current.image_urls);
        let image_urls = serde_json::to_string(image_urls)?;

        sqlx::query(
            "UPDATE posts SET title = ?, content = ?, image_urls = ?, updated_at = ? WHERE id = ?",
        )
        .bind(title)
        .bind(content)
        .bind(image_urls)
        .bind(Utc::now())
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        self.get_any(id).await
    }

    /// Delete a post; its comments go with it. Returns false if missing.
    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Hide a post from public queries. Returns false if missing.
    pub async fn hide(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE posts SET is_hidden = 1 WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::setup_pool;
    use crate::db::user::UserRepository;
    use bulletin_core::models::CreateCommentRequest;

    async fn seed_user(pool: &SqlitePool, name: &str) -> Uuid {
        UserRepository::new(pool.clone())
            .create(name, &format!("{name}@example.com"), "hash", UserRole::User)
            .await
            .unwrap()
            .id
    }

    fn new_post(title: &str, content: &str) -> CreatePostRequest {
        CreatePostRequest {
            title: title.to_string(),
            content: content.to_string(),
            image_urls: vec![],
        }
    }

    #[tokio::test]
    async fn test_create_and_get_post() {
        let pool = setup_pool().await;
        let author = seed_user(&pool, "alice").await;
        let repo = PostRepository::new(pool);

        let post = repo
            .create(author, &new_post("Hello", "First post"))
            .await
            .unwrap();
        assert_eq!(post.author.username, "alice");
        assert_eq!(post.image_urls, Vec::<String>::new());

        let fetched = repo.get_visible(post.id).await.unwrap().unwrap();
        assert_eq!(fetched.title, "Hello");
    }

    #[tokio::test]
    async fn test_hidden_posts_excluded_from_public_queries() {
        let pool = setup_pool().await;
        let author = seed_user(&pool, "bob").await;
        let repo = PostRepository::new(pool);

        let post = repo
            .create(author, &new_post("Visible", "body"))
            .await
            .unwrap();
        assert!(repo.hide(post.id).await.unwrap());

        assert!(repo.get_visible(post.id).await.unwrap().is_none());
        assert!(repo.list(0, 20, None).await.unwrap().is_empty());
        assert_eq!(repo.list_all(0, 20).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_search_matches_title_and_content() {
        let pool = setup_pool().await;
        let author = seed_user(&pool, "carol").await;
        let repo = PostRepository::new(pool);

        repo.create(author, &new_post("Rust tips", "borrow checker"))
            .await
            .unwrap();
        repo.create(author, &new_post("Cooking", "rust removal from pans"))
            .await
            .unwrap();
        repo.create(author, &new_post("Gardening", "tomatoes"))
            .await
            .unwrap();

        let hits = repo.list(0, 20, Some("rust")).await.unwrap();
        assert_eq!(hits.len(), 2);

        let none = repo.list(0, 20, Some("quantum")).await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_update_post_partial_fields() {
        let pool = setup_pool().await;
        let author = seed_user(&pool, "dave").await;
        let repo = PostRepository::new(pool);

        let post = repo
            .create(author, &new_post("Original", "body"))
            .await
            .unwrap();
        assert!(post.updated_at.is_none());

        let updated = repo
            .update(
                post.id,
                &UpdatePostRequest {
                    title: Some("Edited".to_string()),
                    content: None,
                    image_urls: None,
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.title, "Edited");
        assert_eq!(updated.content, "body");
        assert!(updated.updated_at.is_some());
    }

    #[tokio::test]
    async fn test_delete_post_cascades_comments() {
        let pool = setup_pool().await;
        let author = seed_user(&pool, "erin").await;
        let repo = PostRepository::new(pool.clone());
        let comments = CommentRepository::new(pool);

        let post = repo
            .create(author, &new_post("Doomed", "body"))
            .await
            .unwrap();
        comments
            .create(
                post.id,
                author,
                &CreateCommentRequest {
                    content: "first!".to_string(),
                },
            )
            .await
            .unwrap();

        assert!(repo.delete(post.id).await.unwrap());
        assert!(!repo.delete(post.id).await.unwrap());
        assert!(comments.list_for_post(post.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_with_comments() {
        let pool = setup_pool().await;
        let author = seed_user(&pool, "fred").await;
        let repo = PostRepository::new(pool.clone());
        let comments = CommentRepository::new(pool);

        let post = repo
            .create(author, &new_post("Thread", "body"))
            .await
            .unwrap();
        let c1 = comments
            .create(
                post.id,
                author,
                &CreateCommentRequest {
                    content: "reply".to_string(),
                },
            )
            .await
            .unwrap();
        comments.hide(c1.id).await.unwrap();
        comments
            .create(
                post.id,
                author,
                &CreateCommentRequest {
                    content: "visible reply".to_string(),
                },
            )
            .await
            .unwrap();

        let detail = repo.get_with_comments(post.id).await.unwrap().unwrap();
        assert_eq!(detail.comments.len(), 1);
        assert_eq!(detail.comments[0].content, "visible reply");
    }
}
