use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::data::post_repository::{NewComment, NewPost, PostPatch, PostQuery, PostRepository};
use crate::domain::error::DomainError;
use crate::domain::post::{Comment, Post, PostStatus, SortBy};
use crate::domain::stats::PostStats;

#[derive(Default)]
struct PostCollection {
    last_post_id: i64,
    last_comment_id: i64,
    posts: BTreeMap<i64, Post>,
}

impl PostCollection {
    fn active_mut(&mut self, id: i64) -> Option<&mut Post> {
        self.posts.get_mut(&id).filter(|post| post.is_active())
    }
}

/// Posts kept in process memory. Data is lost on restart.
#[derive(Default)]
pub(crate) struct MemoryPostRepository {
    collection: RwLock<PostCollection>,
}

impl MemoryPostRepository {
    pub(crate) fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostRepository for MemoryPostRepository {
    async fn insert_post(&self, input: NewPost) -> Result<Post, DomainError> {
        let mut collection = self.collection.write().await;
        collection.last_post_id += 1;

        let now = Utc::now();
        let post = Post {
            id: collection.last_post_id,
            title: input.title,
            body: input.body,
            image_url: input.image_url,
            author_id: input.author_id,
            likes: Vec::new(),
            comments: Vec::new(),
            created_at: now,
            updated_at: now,
            status: PostStatus::Active,
        };
        collection.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn find_post(&self, id: i64) -> Result<Option<Post>, DomainError> {
        Ok(self.collection.read().await.posts.get(&id).cloned())
    }

    async fn find_posts(&self, query: PostQuery) -> Result<Vec<Post>, DomainError> {
        let collection = self.collection.read().await;
        let mut posts: Vec<&Post> = collection
            .posts
            .values()
            .filter(|post| post.is_active())
            .filter(|post| query.author_id.is_none_or(|author| post.author_id == author))
            .collect();

        posts.sort_by(|a, b| match query.sort_by {
            SortBy::Date => b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)),
            SortBy::Likes => b
                .like_count()
                .cmp(&a.like_count())
                .then(b.created_at.cmp(&a.created_at))
                .then(b.id.cmp(&a.id)),
        });

        Ok(posts
            .into_iter()
            .skip(query.offset as usize)
            .take(query.limit as usize)
            .cloned()
            .collect())
    }

    async fn update_post(&self, id: i64, patch: PostPatch) -> Result<Option<Post>, DomainError> {
        let mut collection = self.collection.write().await;
        let Some(post) = collection.active_mut(id) else {
            return Ok(None);
        };

        if let Some(title) = patch.title {
            post.title = title;
        }
        if let Some(body) = patch.body {
            post.body = body;
        }
        if let Some(image_url) = patch.image_url {
            post.image_url = Some(image_url);
        }
        post.updated_at = Utc::now();
        Ok(Some(post.clone()))
    }

    async fn mark_deleted(&self, id: i64) -> Result<bool, DomainError> {
        let mut collection = self.collection.write().await;
        let Some(post) = collection.active_mut(id) else {
            return Ok(false);
        };
        post.status = PostStatus::Deleted;
        post.updated_at = Utc::now();
        Ok(true)
    }

    async fn add_like(&self, id: i64, user_id: i64) -> Result<Option<Post>, DomainError> {
        let mut collection = self.collection.write().await;
        let Some(post) = collection.active_mut(id) else {
            return Ok(None);
        };
        if let Err(position) = post.likes.binary_search(&user_id) {
            post.likes.insert(position, user_id);
        }
        Ok(Some(post.clone()))
    }

    async fn remove_like(&self, id: i64, user_id: i64) -> Result<Option<Post>, DomainError> {
        let mut collection = self.collection.write().await;
        let Some(post) = collection.active_mut(id) else {
            return Ok(None);
        };
        post.likes.retain(|liked_by| *liked_by != user_id);
        Ok(Some(post.clone()))
    }

    async fn push_comment(
        &self,
        id: i64,
        comment: NewComment,
    ) -> Result<Option<Post>, DomainError> {
        let mut collection = self.collection.write().await;
        let comment_id = collection.last_comment_id + 1;
        let Some(post) = collection.active_mut(id) else {
            return Ok(None);
        };

        post.comments.push(Comment {
            id: comment_id,
            text: comment.text,
            author_id: comment.author_id,
            created_at: Utc::now(),
            edited: false,
        });
        let post = post.clone();
        collection.last_comment_id = comment_id;
        Ok(Some(post))
    }

    async fn update_comment_text(
        &self,
        post_id: i64,
        comment_id: i64,
        text: String,
    ) -> Result<Option<Comment>, DomainError> {
        let mut collection = self.collection.write().await;
        let comment = collection.active_mut(post_id).and_then(|post| {
            post.comments
                .iter_mut()
                .find(|comment| comment.id == comment_id)
        });

        Ok(comment.map(|comment| {
            comment.text = text;
            comment.edited = true;
            comment.clone()
        }))
    }

    async fn post_stats(&self) -> Result<PostStats, DomainError> {
        let collection = self.collection.read().await;
        let mut stats = PostStats::default();
        for post in collection.posts.values() {
            if post.is_active() {
                stats.total_posts += 1;
                stats.total_comments += post.comments.len() as i64;
                stats.total_likes += post.like_count() as i64;
            } else {
                stats.deleted_posts += 1;
            }
        }
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryPostRepository;
    use crate::data::post_repository::{NewComment, NewPost, PostQuery, PostRepository};
    use crate::domain::post::SortBy;

    fn new_post(author_id: i64, title: &str) -> NewPost {
        NewPost {
            title: title.to_string(),
            body: "body".to_string(),
            image_url: None,
            author_id,
        }
    }

    #[tokio::test]
    async fn add_like_keeps_set_semantics() {
        let repo = MemoryPostRepository::new();
        let post = repo.insert_post(new_post(1, "a")).await.expect("insert");

        repo.add_like(post.id, 5).await.expect("like");
        let liked = repo
            .add_like(post.id, 5)
            .await
            .expect("like again")
            .expect("post exists");

        assert_eq!(liked.likes, vec![5]);
    }

    #[tokio::test]
    async fn deleted_posts_reject_mutations() {
        let repo = MemoryPostRepository::new();
        let post = repo.insert_post(new_post(1, "a")).await.expect("insert");

        assert!(repo.mark_deleted(post.id).await.expect("delete"));
        assert!(!repo.mark_deleted(post.id).await.expect("delete twice"));
        assert!(repo.add_like(post.id, 2).await.expect("like").is_none());
        let comment = NewComment {
            text: "hi".to_string(),
            author_id: 2,
        };
        assert!(
            repo.push_comment(post.id, comment)
                .await
                .expect("comment")
                .is_none()
        );

        let stored = repo
            .find_post(post.id)
            .await
            .expect("find")
            .expect("soft-deleted post is still stored");
        assert!(!stored.is_active());
    }

    #[tokio::test]
    async fn find_posts_filters_by_author_and_paginates() {
        let repo = MemoryPostRepository::new();
        for i in 0..5 {
            repo.insert_post(new_post(1, &format!("p{i}")))
                .await
                .expect("insert");
        }
        repo.insert_post(new_post(2, "other")).await.expect("insert");

        let page = repo
            .find_posts(PostQuery {
                sort_by: SortBy::Date,
                author_id: Some(1),
                offset: 1,
                limit: 2,
            })
            .await
            .expect("find");

        let titles: Vec<&str> = page.iter().map(|post| post.title.as_str()).collect();
        assert_eq!(titles, vec!["p3", "p2"]);
    }
}
