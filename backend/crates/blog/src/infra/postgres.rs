//! PostgreSQL Repository Implementations

use auth::{AuthResult, AuthoredContentRepository, CascadeCounts, UserId};
use chrono::{DateTime, Utc};
use kernel::id::{CommentId, PostId};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entities::{Comment, LikeState, Post};
use crate::domain::repository::{CommentRepository, PostPage, PostQuery, PostRepository};
use crate::domain::value_objects::{Content, PostTitle};
use crate::error::BlogResult;

/// PostgreSQL-backed blog repository
#[derive(Clone)]
pub struct PgBlogRepository {
    pool: PgPool,
}

impl PgBlogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// `ILIKE` pattern matching `needle` anywhere, with wildcards escaped
fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

const POST_SELECT: &str = r#"
    SELECT
        p.post_id,
        p.author_id,
        p.title,
        p.content,
        ARRAY(
            SELECT l.user_id FROM post_likes l
            WHERE l.post_id = p.post_id
            ORDER BY l.created_at, l.user_id
        ) AS likes,
        p.created_at,
        p.updated_at
    FROM posts p
"#;

const POST_FILTER: &str = r#"
    WHERE ($1::uuid IS NULL OR p.author_id = $1)
      AND ($2::text IS NULL
           OR p.title ILIKE $2 ESCAPE '\'
           OR p.content ILIKE $2 ESCAPE '\')
"#;

// ============================================================================
// Post Repository Implementation
// ============================================================================

impl PostRepository for PgBlogRepository {
    async fn create(&self, post: &Post) -> BlogResult<()> {
        sqlx::query(
            r#"
            INSERT INTO posts (
                post_id,
                author_id,
                title,
                content,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(post.post_id.as_uuid())
        .bind(post.author_id.as_uuid())
        .bind(post.title.as_str())
        .bind(post.content.as_str())
        .bind(post.created_at)
        .bind(post.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, post_id: &PostId) -> BlogResult<Option<Post>> {
        let row = sqlx::query_as::<_, PostRow>(&format!("{POST_SELECT} WHERE p.post_id = $1"))
            .bind(post_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(PostRow::into_post))
    }

    async fn list(&self, query: &PostQuery) -> BlogResult<PostPage> {
        let author = query.author_id.map(|id| id.into_uuid());
        let pattern = query.search.as_deref().map(contains_pattern);

        let rows = sqlx::query_as::<_, PostRow>(&format!(
            "{POST_SELECT} {POST_FILTER} ORDER BY p.created_at DESC, p.post_id DESC LIMIT $3 OFFSET $4"
        ))
        .bind(author)
        .bind(pattern.as_deref())
        .bind(i64::from(query.pagination.limit))
        .bind(query.pagination.offset() as i64)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 =
            sqlx::query_scalar(&format!("SELECT COUNT(*) FROM posts p {POST_FILTER}"))
                .bind(author)
                .bind(pattern.as_deref())
                .fetch_one(&self.pool)
                .await?;

        Ok(PostPage {
            posts: rows.into_iter().map(PostRow::into_post).collect(),
            total: total.max(0) as u64,
        })
    }

    async fn update(&self, post: &Post) -> BlogResult<()> {
        sqlx::query(
            r#"
            UPDATE posts SET
                title = $2,
                content = $3,
                updated_at = $4
            WHERE post_id = $1
            "#,
        )
        .bind(post.post_id.as_uuid())
        .bind(post.title.as_str())
        .bind(post.content.as_str())
        .bind(post.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, post_id: &PostId) -> BlogResult<bool> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM comments WHERE post_id = $1")
            .bind(post_id.as_uuid())
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM post_likes WHERE post_id = $1")
            .bind(post_id.as_uuid())
            .execute(&mut *tx)
            .await?;

        let deleted = sqlx::query("DELETE FROM posts WHERE post_id = $1")
            .bind(post_id.as_uuid())
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;

        Ok(deleted > 0)
    }

    async fn toggle_like(
        &self,
        post_id: &PostId,
        user_id: &UserId,
    ) -> BlogResult<Option<LikeState>> {
        let mut tx = self.pool.begin().await?;

        // Row lock serializes concurrent toggles on the same post
        let exists = sqlx::query("SELECT post_id FROM posts WHERE post_id = $1 FOR UPDATE")
            .bind(post_id.as_uuid())
            .fetch_optional(&mut *tx)
            .await?
            .is_some();
        if !exists {
            return Ok(None);
        }

        let removed = sqlx::query("DELETE FROM post_likes WHERE post_id = $1 AND user_id = $2")
            .bind(post_id.as_uuid())
            .bind(user_id.as_uuid())
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let liked_by_user = removed == 0;
        if liked_by_user {
            sqlx::query(
                "INSERT INTO post_likes (post_id, user_id, created_at) VALUES ($1, $2, $3)",
            )
            .bind(post_id.as_uuid())
            .bind(user_id.as_uuid())
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;
        }

        let likes_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM post_likes WHERE post_id = $1")
            .bind(post_id.as_uuid())
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Some(LikeState {
            likes_count: likes_count.max(0) as u64,
            liked_by_user,
        }))
    }
}

// ============================================================================
// Comment Repository Implementation
// ============================================================================

impl CommentRepository for PgBlogRepository {
    async fn create(&self, comment: &Comment) -> BlogResult<()> {
        sqlx::query(
            r#"
            INSERT INTO comments (
                comment_id,
                post_id,
                author_id,
                content,
                created_at
            ) VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(comment.comment_id.as_uuid())
        .bind(comment.post_id.as_uuid())
        .bind(comment.author_id.as_uuid())
        .bind(comment.content.as_str())
        .bind(comment.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, comment_id: &CommentId) -> BlogResult<Option<Comment>> {
        let row = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT comment_id, post_id, author_id, content, created_at
            FROM comments
            WHERE comment_id = $1
            "#,
        )
        .bind(comment_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(CommentRow::into_comment))
    }

    async fn list_by_post(&self, post_id: &PostId) -> BlogResult<Vec<Comment>> {
        let rows = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT comment_id, post_id, author_id, content, created_at
            FROM comments
            WHERE post_id = $1
            ORDER BY created_at ASC, comment_id ASC
            "#,
        )
        .bind(post_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(CommentRow::into_comment).collect())
    }

    async fn delete(&self, comment_id: &CommentId) -> BlogResult<bool> {
        let deleted = sqlx::query("DELETE FROM comments WHERE comment_id = $1")
            .bind(comment_id.as_uuid())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }
}

// ============================================================================
// Cascade for admin user deletion
// ============================================================================

impl AuthoredContentRepository for PgBlogRepository {
    async fn delete_authored_by(&self, author_id: &UserId) -> AuthResult<CascadeCounts> {
        let mut tx = self.pool.begin().await?;

        // Dependents first: comments by the author and comments on their posts
        let comments_deleted = sqlx::query(
            r#"
            DELETE FROM comments
            WHERE author_id = $1
               OR post_id IN (SELECT post_id FROM posts WHERE author_id = $1)
            "#,
        )
        .bind(author_id.as_uuid())
        .execute(&mut *tx)
        .await?
        .rows_affected();

        sqlx::query(
            r#"
            DELETE FROM post_likes
            WHERE user_id = $1
               OR post_id IN (SELECT post_id FROM posts WHERE author_id = $1)
            "#,
        )
        .bind(author_id.as_uuid())
        .execute(&mut *tx)
        .await?;

        let posts_deleted = sqlx::query("DELETE FROM posts WHERE author_id = $1")
            .bind(author_id.as_uuid())
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;

        tracing::info!(
            author_id = %author_id,
            posts_deleted,
            comments_deleted,
            "Deleted authored content"
        );

        Ok(CascadeCounts {
            posts_deleted,
            comments_deleted,
        })
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct PostRow {
    post_id: Uuid,
    author_id: Uuid,
    title: String,
    content: String,
    likes: Vec<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PostRow {
    fn into_post(self) -> Post {
        Post {
            post_id: PostId::from_uuid(self.post_id),
            author_id: UserId::from_uuid(self.author_id),
            title: PostTitle::from_db(self.title),
            content: Content::from_db(self.content),
            likes: self.likes.into_iter().map(UserId::from_uuid).collect(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CommentRow {
    comment_id: Uuid,
    post_id: Uuid,
    author_id: Uuid,
    content: String,
    created_at: DateTime<Utc>,
}

impl CommentRow {
    fn into_comment(self) -> Comment {
        Comment {
            comment_id: CommentId::from_uuid(self.comment_id),
            post_id: PostId::from_uuid(self.post_id),
            author_id: UserId::from_uuid(self.author_id),
            content: Content::from_db(self.content),
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("rust"), "%rust%");
        assert_eq!(contains_pattern("100%"), "%100\\%%");
        assert_eq!(contains_pattern("a_b"), "%a\\_b%");
        assert_eq!(contains_pattern("c:\\"), "%c:\\\\%");
    }
}
