use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::map_sqlx_error;
use crate::data::post_repository::{NewComment, NewPost, PostPatch, PostQuery, PostRepository};
use crate::domain::error::DomainError;
use crate::domain::post::{Comment, Post, PostStatus, SortBy};
use crate::domain::stats::PostStats;

const POST_COLUMNS: &str =
    "id, title, body, image_url, author_id, likes, deleted, created_at, updated_at";

#[derive(Debug, Clone)]
pub(crate) struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_comments(&self, post_ids: &[i64]) -> Result<HashMap<i64, Vec<Comment>>, DomainError> {
        if post_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT id, post_id, author_id, text, edited, created_at
            FROM post_comments
            WHERE post_id = ANY($1)
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(post_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        let mut grouped: HashMap<i64, Vec<Comment>> = HashMap::new();
        for row in rows {
            grouped.entry(row.post_id).or_default().push(row.into());
        }
        Ok(grouped)
    }

    async fn attach_comments(&self, rows: Vec<PostRow>) -> Result<Vec<Post>, DomainError> {
        let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
        let mut comments = self.load_comments(&ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let post_comments = comments.remove(&row.id).unwrap_or_default();
                map_row_to_post(row, post_comments)
            })
            .collect())
    }

    async fn attach_one(&self, row: Option<PostRow>) -> Result<Option<Post>, DomainError> {
        match row {
            Some(row) => Ok(self.attach_comments(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }
}

#[derive(sqlx::FromRow)]
struct PostRow {
    id: i64,
    title: String,
    body: String,
    image_url: Option<String>,
    author_id: i64,
    likes: Vec<i64>,
    deleted: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct CommentRow {
    id: i64,
    post_id: i64,
    author_id: i64,
    text: String,
    edited: bool,
    created_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct PostStatsRow {
    total_posts: i64,
    deleted_posts: i64,
    total_comments: i64,
    total_likes: i64,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Self {
            id: row.id,
            text: row.text,
            author_id: row.author_id,
            created_at: row.created_at,
            edited: row.edited,
        }
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn insert_post(&self, input: NewPost) -> Result<Post, DomainError> {
        let row = sqlx::query_as::<_, PostRow>(&format!(
            r#"
            INSERT INTO posts (title, body, image_url, author_id)
            VALUES ($1, $2, $3, $4)
            RETURNING {POST_COLUMNS}
            "#
        ))
        .bind(&input.title)
        .bind(&input.body)
        .bind(&input.image_url)
        .bind(input.author_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        Ok(map_row_to_post(row, Vec::new()))
    }

    async fn find_post(&self, id: i64) -> Result<Option<Post>, DomainError> {
        let row = sqlx::query_as::<_, PostRow>(&format!(
            r#"
            SELECT {POST_COLUMNS}
            FROM posts
            WHERE id = $1
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        self.attach_one(row).await
    }

    async fn find_posts(&self, query: PostQuery) -> Result<Vec<Post>, DomainError> {
        let order_by = match query.sort_by {
            SortBy::Date => "created_at DESC, id DESC",
            SortBy::Likes => "cardinality(likes) DESC, created_at DESC, id DESC",
        };

        let rows = sqlx::query_as::<_, PostRow>(&format!(
            r#"
            SELECT {POST_COLUMNS}
            FROM posts
            WHERE deleted = FALSE
              AND ($1::BIGINT IS NULL OR author_id = $1)
            ORDER BY {order_by}
            LIMIT $2
            OFFSET $3
            "#
        ))
        .bind(query.author_id)
        .bind(i64::from(query.limit))
        .bind(i64::from(query.offset))
        .fetch_all(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        self.attach_comments(rows).await
    }

    async fn update_post(&self, id: i64, patch: PostPatch) -> Result<Option<Post>, DomainError> {
        let row = sqlx::query_as::<_, PostRow>(&format!(
            r#"
            UPDATE posts
            SET title = COALESCE($2, title),
                body = COALESCE($3, body),
                image_url = COALESCE($4, image_url),
                updated_at = NOW()
            WHERE id = $1 AND deleted = FALSE
            RETURNING {POST_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(patch.title)
        .bind(patch.body)
        .bind(patch.image_url)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        self.attach_one(row).await
    }

    async fn mark_deleted(&self, id: i64) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE posts
            SET deleted = TRUE,
                updated_at = NOW()
            WHERE id = $1 AND deleted = FALSE
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn add_like(&self, id: i64, user_id: i64) -> Result<Option<Post>, DomainError> {
        let row = sqlx::query_as::<_, PostRow>(&format!(
            r#"
            UPDATE posts
            SET likes = CASE
                    WHEN $2 = ANY(likes) THEN likes
                    ELSE array_append(likes, $2)
                END
            WHERE id = $1 AND deleted = FALSE
            RETURNING {POST_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        self.attach_one(row).await
    }

    async fn remove_like(&self, id: i64, user_id: i64) -> Result<Option<Post>, DomainError> {
        let row = sqlx::query_as::<_, PostRow>(&format!(
            r#"
            UPDATE posts
            SET likes = array_remove(likes, $2)
            WHERE id = $1 AND deleted = FALSE
            RETURNING {POST_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        self.attach_one(row).await
    }

    async fn push_comment(
        &self,
        id: i64,
        comment: NewComment,
    ) -> Result<Option<Post>, DomainError> {
        let inserted = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO post_comments (post_id, author_id, text)
            SELECT id, $2, $3
            FROM posts
            WHERE id = $1 AND deleted = FALSE
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(comment.author_id)
        .bind(&comment.text)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        if inserted.is_none() {
            return Ok(None);
        }
        self.find_post(id).await
    }

    async fn update_comment_text(
        &self,
        post_id: i64,
        comment_id: i64,
        text: String,
    ) -> Result<Option<Comment>, DomainError> {
        let row = sqlx::query_as::<_, CommentRow>(
            r#"
            UPDATE post_comments AS c
            SET text = $3,
                edited = TRUE
            FROM posts AS p
            WHERE c.id = $2
              AND c.post_id = $1
              AND p.id = c.post_id
              AND p.deleted = FALSE
            RETURNING c.id, c.post_id, c.author_id, c.text, c.edited, c.created_at
            "#,
        )
        .bind(post_id)
        .bind(comment_id)
        .bind(text)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        Ok(row.map(Comment::from))
    }

    async fn post_stats(&self) -> Result<PostStats, DomainError> {
        let row = sqlx::query_as::<_, PostStatsRow>(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE NOT deleted) AS total_posts,
                COUNT(*) FILTER (WHERE deleted) AS deleted_posts,
                COALESCE(SUM(cardinality(likes)) FILTER (WHERE NOT deleted), 0)::BIGINT AS total_likes,
                (
                    SELECT COUNT(*)
                    FROM post_comments AS c
                    JOIN posts AS p ON p.id = c.post_id
                    WHERE NOT p.deleted
                ) AS total_comments
            FROM posts
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        Ok(PostStats {
            total_posts: row.total_posts,
            deleted_posts: row.deleted_posts,
            total_comments: row.total_comments,
            total_likes: row.total_likes,
        })
    }
}

fn map_row_to_post(row: PostRow, comments: Vec<Comment>) -> Post {
    let mut likes = row.likes;
    likes.sort_unstable();
    likes.dedup();

    Post {
        id: row.id,
        title: row.title,
        body: row.body,
        image_url: row.image_url,
        author_id: row.author_id,
        likes,
        comments,
        created_at: row.created_at,
        updated_at: row.updated_at,
        status: PostStatus::from_deleted_flag(row.deleted),
    }
}

fn map_post_db_error(err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.code().as_deref() == Some("23503")
    {
        return DomainError::NotFound("author".to_string());
    }
    map_sqlx_error(err)
}
