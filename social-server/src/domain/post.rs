use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::user::AuthorSummary;

const MAX_TITLE_LEN: usize = 255;
const MAX_COMMENT_LEN: usize = 2000;
const MAX_URL_LEN: usize = 2048;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PostStatus {
    Active,
    Deleted,
}

impl PostStatus {
    pub(crate) fn from_deleted_flag(deleted: bool) -> Self {
        if deleted {
            PostStatus::Deleted
        } else {
            PostStatus::Active
        }
    }

    pub(crate) fn is_deleted(self) -> bool {
        self == PostStatus::Deleted
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Comment {
    pub(crate) id: i64,
    pub(crate) text: String,
    pub(crate) author_id: i64,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) edited: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct Post {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) body: String,
    pub(crate) image_url: Option<String>,
    pub(crate) author_id: i64,
    /// Set semantics; kept sorted so equality and output are stable.
    pub(crate) likes: Vec<i64>,
    /// Insertion order.
    pub(crate) comments: Vec<Comment>,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
    pub(crate) status: PostStatus,
}

impl Post {
    pub(crate) fn is_active(&self) -> bool {
        !self.status.is_deleted()
    }

    pub(crate) fn is_liked_by(&self, user_id: i64) -> bool {
        self.likes.contains(&user_id)
    }

    pub(crate) fn like_count(&self) -> usize {
        self.likes.len()
    }

    pub(crate) fn comment(&self, comment_id: i64) -> Option<&Comment> {
        self.comments.iter().find(|comment| comment.id == comment_id)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum SortBy {
    #[default]
    Date,
    Likes,
}

#[derive(Debug, Clone)]
pub(crate) struct CreatePostRequest {
    pub(crate) title: String,
    pub(crate) body: String,
    pub(crate) image_url: Option<String>,
}

impl CreatePostRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        Ok(Self {
            title: normalize_title(&self.title)?,
            body: normalize_body(&self.body)?,
            image_url: self.image_url.map(|url| normalize_image_url(&url)).transpose()?,
        })
    }
}

/// Partial update. Author, likes, comments and creation time are not patchable.
#[derive(Debug, Clone, Default)]
pub(crate) struct UpdatePostRequest {
    pub(crate) title: Option<String>,
    pub(crate) body: Option<String>,
    pub(crate) image_url: Option<String>,
}

impl UpdatePostRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        if self.title.is_none() && self.body.is_none() && self.image_url.is_none() {
            return Err(DomainError::Validation {
                field: "patch",
                message: "at least one field must be provided",
            });
        }

        Ok(Self {
            title: self.title.map(|title| normalize_title(&title)).transpose()?,
            body: self.body.map(|body| normalize_body(&body)).transpose()?,
            image_url: self.image_url.map(|url| normalize_image_url(&url)).transpose()?,
        })
    }
}

pub(crate) fn normalize_comment_text(text: &str) -> Result<String, DomainError> {
    let text = text.trim();
    if text.is_empty() || text.chars().count() > MAX_COMMENT_LEN {
        return Err(DomainError::Validation {
            field: "text",
            message: "must be 1..2000 chars",
        });
    }
    Ok(text.to_string())
}

fn normalize_title(title: &str) -> Result<String, DomainError> {
    let title = title.trim();
    if title.is_empty() || title.chars().count() > MAX_TITLE_LEN {
        return Err(DomainError::Validation {
            field: "title",
            message: "must be 1..255 chars",
        });
    }
    Ok(title.to_string())
}

fn normalize_body(body: &str) -> Result<String, DomainError> {
    let body = body.trim();
    if body.is_empty() {
        return Err(DomainError::Validation {
            field: "body",
            message: "must not be empty",
        });
    }
    Ok(body.to_string())
}

fn normalize_image_url(url: &str) -> Result<String, DomainError> {
    let url = url.trim();
    if url.is_empty() || url.len() > MAX_URL_LEN {
        return Err(DomainError::Validation {
            field: "image_url",
            message: "must be 1..2048 chars",
        });
    }
    Ok(url.to_string())
}

/// A post joined with its author and comment authors, ready for display.
#[derive(Debug, Clone)]
pub(crate) struct PostView {
    pub(crate) post: Post,
    pub(crate) author: Option<AuthorSummary>,
    pub(crate) like_count: usize,
    pub(crate) comments: Vec<CommentView>,
}

#[derive(Debug, Clone)]
pub(crate) struct CommentView {
    pub(crate) comment: Comment,
    pub(crate) author: Option<AuthorSummary>,
}

#[derive(Debug, Clone)]
pub(crate) struct CommentPage {
    pub(crate) items: Vec<CommentView>,
    pub(crate) total: usize,
    pub(crate) offset: usize,
    pub(crate) limit: usize,
}
