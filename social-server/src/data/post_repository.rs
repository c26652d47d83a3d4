use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::post::{Comment, Post, SortBy};
use crate::domain::stats::PostStats;

#[derive(Debug, Clone)]
pub(crate) struct NewPost {
    pub(crate) title: String,
    pub(crate) body: String,
    pub(crate) image_url: Option<String>,
    pub(crate) author_id: i64,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PostPatch {
    pub(crate) title: Option<String>,
    pub(crate) body: Option<String>,
    pub(crate) image_url: Option<String>,
}

#[derive(Debug, Clone)]
pub(crate) struct NewComment {
    pub(crate) text: String,
    pub(crate) author_id: i64,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct PostQuery {
    pub(crate) sort_by: SortBy,
    pub(crate) author_id: Option<i64>,
    pub(crate) offset: u32,
    pub(crate) limit: u32,
}

/// Document-store contract for posts and their embedded comments.
///
/// Every mutation targets a single post. Methods returning `Option` yield
/// `None` when the post is missing or soft-deleted.
#[async_trait]
pub(crate) trait PostRepository: Send + Sync {
    async fn insert_post(&self, input: NewPost) -> Result<Post, DomainError>;
    /// Includes soft-deleted posts.
    async fn find_post(&self, id: i64) -> Result<Option<Post>, DomainError>;
    async fn find_posts(&self, query: PostQuery) -> Result<Vec<Post>, DomainError>;
    async fn update_post(&self, id: i64, patch: PostPatch) -> Result<Option<Post>, DomainError>;
    async fn mark_deleted(&self, id: i64) -> Result<bool, DomainError>;
    /// Adds `user_id` to the like set if absent.
    async fn add_like(&self, id: i64, user_id: i64) -> Result<Option<Post>, DomainError>;
    async fn remove_like(&self, id: i64, user_id: i64) -> Result<Option<Post>, DomainError>;
    async fn push_comment(&self, id: i64, comment: NewComment)
    -> Result<Option<Post>, DomainError>;
    /// Replaces the text and flags the comment as edited.
    async fn update_comment_text(
        &self,
        post_id: i64,
        comment_id: i64,
        text: String,
    ) -> Result<Option<Comment>, DomainError>;
    async fn post_stats(&self) -> Result<PostStats, DomainError>;
}

pub(crate) type DynPostRepository = Arc<dyn PostRepository>;

#[async_trait]
impl<T: PostRepository + ?Sized> PostRepository for Arc<T> {
    async fn insert_post(&self, input: NewPost) -> Result<Post, DomainError> {
        (**self).insert_post(input).await
    }

    async fn find_post(&self, id: i64) -> Result<Option<Post>, DomainError> {
        (**self).find_post(id).await
    }

    async fn find_posts(&self, query: PostQuery) -> Result<Vec<Post>, DomainError> {
        (**self).find_posts(query).await
    }

    async fn update_post(&self, id: i64, patch: PostPatch) -> Result<Option<Post>, DomainError> {
        (**self).update_post(id, patch).await
    }

    async fn mark_deleted(&self, id: i64) -> Result<bool, DomainError> {
        (**self).mark_deleted(id).await
    }

    async fn add_like(&self, id: i64, user_id: i64) -> Result<Option<Post>, DomainError> {
        (**self).add_like(id, user_id).await
    }

    async fn remove_like(&self, id: i64, user_id: i64) -> Result<Option<Post>, DomainError> {
        (**self).remove_like(id, user_id).await
    }

    async fn push_comment(
        &self,
        id: i64,
        comment: NewComment,
    ) -> Result<Option<Post>, DomainError> {
        (**self).push_comment(id, comment).await
    }

    async fn update_comment_text(
        &self,
        post_id: i64,
        comment_id: i64,
        text: String,
    ) -> Result<Option<Comment>, DomainError> {
        (**self).update_comment_text(post_id, comment_id, text).await
    }

    async fn post_stats(&self) -> Result<PostStats, DomainError> {
        (**self).post_stats().await
    }
}
