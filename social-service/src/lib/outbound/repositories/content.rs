use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::FromRow;
use sqlx::PgPool;

use crate::content::errors::ContentError;
use crate::content::models::Comment;
use crate::content::models::CommentContent;
use crate::content::models::CommentId;
use crate::content::models::CreatePostCommand;
use crate::content::models::Page;
use crate::content::models::PageRequest;
use crate::content::models::Post;
use crate::content::models::PostContent;
use crate::content::models::PostId;
use crate::content::ports::ContentRepository;
use crate::identity::errors::IdentityError;
use crate::identity::models::IdentityId;
use crate::identity::ports::AuthorActivity;

const POST_COLUMNS: &str = r#"
    p.id, p.user_id, u.username AS author_username, p.content, p.image,
    (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id) AS comment_count,
    p.created_at, p.updated_at
"#;

const COMMENT_COLUMNS: &str = r#"
    c.id, c.post_id, c.user_id, u.username AS author_username, c.content, c.created_at
"#;

/// Posts and comments in PostgreSQL. Also answers the activity counters
/// shown on identity profiles.
pub struct PostgresContentRepository {
    pool: PgPool,
}

impl PostgresContentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn count_by_author(&self, table: &str, author: IdentityId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM {} WHERE user_id = $1",
            table
        ))
        .bind(author.0)
        .fetch_one(&self.pool)
        .await
    }
}

#[derive(Debug, FromRow)]
struct PostRow {
    id: i64,
    user_id: i64,
    author_username: String,
    content: String,
    image: Option<String>,
    comment_count: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PostRow> for Post {
    type Error = ContentError;

    fn try_from(row: PostRow) -> Result<Self, Self::Error> {
        Ok(Post {
            id: PostId(row.id),
            author_id: IdentityId(row.user_id),
            author_username: row.author_username,
            content: PostContent::new(row.content).map_err(ContentError::InvalidPostContent)?,
            image: row.image,
            comment_count: row.comment_count,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct CommentRow {
    id: i64,
    post_id: i64,
    user_id: i64,
    author_username: String,
    content: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<CommentRow> for Comment {
    type Error = ContentError;

    fn try_from(row: CommentRow) -> Result<Self, Self::Error> {
        Ok(Comment {
            id: CommentId(row.id),
            post_id: PostId(row.post_id),
            author_id: IdentityId(row.user_id),
            author_username: row.author_username,
            content: CommentContent::new(row.content)
                .map_err(ContentError::InvalidCommentContent)?,
            created_at: row.created_at,
        })
    }
}

fn database_error(e: sqlx::Error) -> ContentError {
    ContentError::DatabaseError(e.to_string())
}

#[async_trait]
impl ContentRepository for PostgresContentRepository {
    async fn create_post(
        &self,
        author: IdentityId,
        command: CreatePostCommand,
    ) -> Result<Post, ContentError> {
        let row = sqlx::query_as::<_, PostRow>(&format!(
            r#"
            WITH p AS (
                INSERT INTO posts (user_id, content, image)
                VALUES ($1, $2, $3)
                RETURNING *
            )
            SELECT {} FROM p JOIN users u ON u.id = p.user_id
            "#,
            POST_COLUMNS
        ))
        .bind(author.0)
        .bind(command.content.as_str())
        .bind(command.image.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(database_error)?;

        Post::try_from(row)
    }

    async fn find_post(&self, id: PostId) -> Result<Option<Post>, ContentError> {
        let row = sqlx::query_as::<_, PostRow>(&format!(
            r#"
            SELECT {} FROM posts p JOIN users u ON u.id = p.user_id
            WHERE p.id = $1
            "#,
            POST_COLUMNS
        ))
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;

        row.map(Post::try_from).transpose()
    }

    async fn list_posts(&self, page: PageRequest) -> Result<Page<Post>, ContentError> {
        let rows = sqlx::query_as::<_, PostRow>(&format!(
            r#"
            SELECT {} FROM posts p JOIN users u ON u.id = p.user_id
            ORDER BY p.created_at DESC, p.id DESC
            LIMIT $1 OFFSET $2
            "#,
            POST_COLUMNS
        ))
        .bind(i64::from(page.size()))
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(database_error)?;

        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM posts")
            .fetch_one(&self.pool)
            .await
            .map_err(database_error)?;

        let items = rows
            .into_iter()
            .map(Post::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page::new(items, page, total))
    }

    async fn update_post(&self, post: Post) -> Result<Post, ContentError> {
        let row = sqlx::query_as::<_, PostRow>(&format!(
            r#"
            WITH p AS (
                UPDATE posts
                SET content = $2, image = $3, updated_at = $4
                WHERE id = $1
                RETURNING *
            )
            SELECT {} FROM p JOIN users u ON u.id = p.user_id
            "#,
            POST_COLUMNS
        ))
        .bind(post.id.0)
        .bind(post.content.as_str())
        .bind(post.image.as_deref())
        .bind(post.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;

        row.map(Post::try_from)
            .transpose()?
            .ok_or(ContentError::PostNotFound(post.id))
    }

    async fn delete_post(&self, id: PostId) -> Result<(), ContentError> {
        // Comments go with the post through ON DELETE CASCADE.
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(database_error)?;

        if result.rows_affected() == 0 {
            return Err(ContentError::PostNotFound(id));
        }
        Ok(())
    }

    async fn create_comment(
        &self,
        post_id: PostId,
        author: IdentityId,
        content: CommentContent,
    ) -> Result<Comment, ContentError> {
        let row = sqlx::query_as::<_, CommentRow>(&format!(
            r#"
            WITH c AS (
                INSERT INTO comments (post_id, user_id, content)
                VALUES ($1, $2, $3)
                RETURNING *
            )
            SELECT {} FROM c JOIN users u ON u.id = c.user_id
            "#,
            COMMENT_COLUMNS
        ))
        .bind(post_id.0)
        .bind(author.0)
        .bind(content.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e.as_database_error() {
            Some(db_err) if db_err.is_foreign_key_violation() => {
                ContentError::PostNotFound(post_id)
            }
            _ => database_error(e),
        })?;

        Comment::try_from(row)
    }

    async fn find_comment(&self, id: CommentId) -> Result<Option<Comment>, ContentError> {
        let row = sqlx::query_as::<_, CommentRow>(&format!(
            r#"
            SELECT {} FROM comments c JOIN users u ON u.id = c.user_id
            WHERE c.id = $1
            "#,
            COMMENT_COLUMNS
        ))
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;

        row.map(Comment::try_from).transpose()
    }

    async fn list_comments(&self, post_id: PostId) -> Result<Vec<Comment>, ContentError> {
        let rows = sqlx::query_as::<_, CommentRow>(&format!(
            r#"
            SELECT {} FROM comments c JOIN users u ON u.id = c.user_id
            WHERE c.post_id = $1
            ORDER BY c.created_at ASC, c.id ASC
            "#,
            COMMENT_COLUMNS
        ))
        .bind(post_id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(database_error)?;

        rows.into_iter().map(Comment::try_from).collect()
    }

    async fn delete_comment(&self, id: CommentId) -> Result<(), ContentError> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(database_error)?;

        if result.rows_affected() == 0 {
            return Err(ContentError::CommentNotFound(id));
        }
        Ok(())
    }
}

#[async_trait]
impl AuthorActivity for PostgresContentRepository {
    async fn count_posts_by_author(&self, author: IdentityId) -> Result<i64, IdentityError> {
        self.count_by_author("posts", author)
            .await
            .map_err(|e| IdentityError::DatabaseError(e.to_string()))
    }

    async fn count_comments_by_author(&self, author: IdentityId) -> Result<i64, IdentityError> {
        self.count_by_author("comments", author)
            .await
            .map_err(|e| IdentityError::DatabaseError(e.to_string()))
    }
}
