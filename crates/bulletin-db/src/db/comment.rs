use bulletin_core::models::{
    Comment, CreateCommentRequest, UpdateCommentRequest, UserResponse, UserRole,
};
use bulletin_core::AppError;
use chrono::{DateTime, Utc};
use sqlx::{Sqlite, SqlitePool};
use uuid::Uuid;

const COMMENT_COLUMNS: &str = "c.id, c.content, c.post_id, c.author_id, c.is_hidden, \
     c.created_at, c.updated_at, u.username AS author_username, u.email AS author_email, \
     u.role AS author_role, u.is_blocked AS author_is_blocked, u.created_at AS author_created_at";

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct CommentRow {
    pub id: String,
    pub content: String,
    pub post_id: String,
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

impl CommentRow {
    fn into_comment(self) -> Result<Comment, AppError> {
        let author_id = Uuid::parse_str(&self.author_id)
            .map_err(|e| AppError::Internal(format!("Corrupt author id: {}", e)))?;
        Ok(Comment {
            id: Uuid::parse_str(&self.id)
                .map_err(|e| AppError::Internal(format!("Corrupt comment id: {}", e)))?,
            content: self.content,
            post_id: Uuid::parse_str(&self.post_id)
                .map_err(|e| AppError::Internal(format!("Corrupt post id: {}", e)))?,
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

/// Repository for post comments
#[derive(Clone)]
pub struct CommentRepository {
    pool: SqlitePool,
}

impl CommentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        post_id: Uuid,
        author_id: Uuid,
        request: &CreateCommentRequest,
    ) -> Result<Comment, AppError> {
        let id = Uuid::new_v4();
        let created_at = Utc::now();

        sqlx::query(
            "INSERT INTO comments (id, content, post_id, author_id, is_hidden, created_at)
             VALUES (?, ?, ?, ?, 0, ?)",
        )
        .bind(id.to_string())
        .bind(&request.content)
        .bind(post_id.to_string())
        .bind(author_id.to_string())
        .bind(created_at)
        .execute(&self.pool)
        .await?;

        self.get(id)
            .await?
            .ok_or_else(|| AppError::Internal("Comment vanished after insert".to_string()))
    }

    /// Fetch a comment regardless of its hidden flag (ownership checks)
    pub async fn get(&self, id: Uuid) -> Result<Option<Comment>, AppError> {
        let query = format!(
            "SELECT {COMMENT_COLUMNS} FROM comments c JOIN users u ON u.id = c.author_id \
             WHERE c.id = ?"
        );
        let row: Option<CommentRow> = sqlx::query_as::<Sqlite, CommentRow>(&query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(CommentRow::into_comment).transpose()
    }

    /// Visible comments on a post, oldest first
    pub async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, AppError> {
        let query = format!(
            "SELECT {COMMENT_COLUMNS} FROM comments c JOIN users u ON u.id = c.author_id \
             WHERE c.post_id = ? AND c.is_hidden = 0 ORDER BY c.created_at ASC"
        );
        let rows: Vec<CommentRow> = sqlx::query_as::<Sqlite, CommentRow>(&query)
            .bind(post_id.to_string())
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(CommentRow::into_comment).collect()
    }

    /// A user's visible comments, newest first
    pub async fn list_by_author(
        &self,
        author_id: Uuid,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Comment>, AppError> {
        let query = format!(
            "SELECT {COMMENT_COLUMNS} FROM comments c JOIN users u ON u.id = c.author_id \
             WHERE c.author_id = ? AND c.is_hidden = 0 \
             ORDER BY c.created_at DESC LIMIT ? OFFSET ?"
        );
        let rows: Vec<CommentRow> = sqlx::query_as::<Sqlite, CommentRow>(&query)
            .bind(author_id.to_string())
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(CommentRow::into_comment).collect()
    }

    /// All comments including hidden ones, newest first (moderation)
    pub async fn list_all(&self, offset: i64, limit: i64) -> Result<Vec<Comment>, AppError> {
        let query = format!(
            "SELECT {COMMENT_COLUMNS} FROM comments c JOIN users u ON u.id = c.author_id \
             ORDER BY c.created_at DESC LIMIT ? OFFSET ?"
        );
        let rows: Vec<CommentRow> = sqlx::query_as::<Sqlite, CommentRow>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(CommentRow::into_comment).collect()
    }

    /// Replace the comment body and stamp updated_at; returns the updated
    /// comment, or None if it does not exist.
    pub async fn update(
        &self,
        id: Uuid,
        request: &UpdateCommentRequest,
    ) -> Result<Option<Comment>, AppError> {
        let Some(current) = self.get(id).await? else {
            return Ok(None);
        };
        let content = request.content.as_deref().unwrap_or(&current.content);

        sqlx::query("UPDATE comments SET content = ?, updated_at = ? WHERE id = ?")
            .bind(content)
            .bind(Utc::now())
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        self.get(id).await
    }

    /// Delete a comment. Returns false if missing.
    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM comments WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Hide a comment from public queries. Returns false if missing.
    pub async fn hide(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE comments SET is_hidden = 1 WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::post::PostRepository;
    use crate::db::test_support::setup_pool;
    use crate::db::user::UserRepository;
    use bulletin_core::models::CreatePostRequest;

    async fn seed_post(pool: &SqlitePool) -> (Uuid, Uuid) {
        let user = UserRepository::new(pool.clone())
            .create("gina", "gina@example.com", "hash", UserRole::User)
            .await
            .unwrap();
        let post = PostRepository::new(pool.clone())
            .create(
                user.id,
                &CreatePostRequest {
                    title: "Thread".to_string(),
                    content: "body".to_string(),
                    image_urls: vec![],
                },
            )
            .await
            .unwrap();
        (user.id, post.id)
    }

    fn comment_body(text: &str) -> CreateCommentRequest {
        CreateCommentRequest {
            content: text.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_list_comments_in_order() {
        let pool = setup_pool().await;
        let (author, post_id) = seed_post(&pool).await;
        let repo = CommentRepository::new(pool);

        repo.create(post_id, author, &comment_body("first"))
            .await
            .unwrap();
        repo.create(post_id, author, &comment_body("second"))
            .await
            .unwrap();

        let comments = repo.list_for_post(post_id).await.unwrap();
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].content, "first");
        assert_eq!(comments[1].content, "second");
        assert_eq!(comments[0].author.username, "gina");
    }

    #[tokio::test]
    async fn test_hidden_comment_excluded_but_fetchable() {
        let pool = setup_pool().await;
        let (author, post_id) = seed_post(&pool).await;
        let repo = CommentRepository::new(pool);

        let comment = repo
            .create(post_id, author, &comment_body("spam"))
            .await
            .unwrap();
        assert!(repo.hide(comment.id).await.unwrap());

        assert!(repo.list_for_post(post_id).await.unwrap().is_empty());
        let fetched = repo.get(comment.id).await.unwrap().unwrap();
        assert!(fetched.is_hidden);
    }

    #[tokio::test]
    async fn test_update_and_delete_comment() {
        let pool = setup_pool().await;
        let (author, post_id) = seed_post(&pool).await;
        let repo = CommentRepository::new(pool);

        let comment = repo
            .create(post_id, author, &comment_body("typo"))
            .await
            .unwrap();

        let updated = repo
            .update(
                comment.id,
                &UpdateCommentRequest {
                    content: Some("fixed".to_string()),
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.content, "fixed");
        assert!(updated.updated_at.is_some());

        assert!(repo.delete(comment.id).await.unwrap());
        assert!(repo.get(comment.id).await.unwrap().is_none());
        assert!(!repo.delete(comment.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_comment_on_missing_post_rejected() {
        let pool = setup_pool().await;
        let (author, _) = seed_post(&pool).await;
        let repo = CommentRepository::new(pool);

        let result = repo
            .create(Uuid::new_v4(), author, &comment_body("orphan"))
            .await;
        assert!(matches!(result, Err(AppError::Database(_))));
    }
}
