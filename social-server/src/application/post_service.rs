use std::collections::HashMap;

use tracing::{debug, info};

use crate::data::post_repository::{NewComment, NewPost, PostPatch, PostQuery, PostRepository};
use crate::data::user_repository::UserRepository;
use crate::domain::error::DomainError;
use crate::domain::post::{
    Comment, CommentPage, CommentView, CreatePostRequest, Post, PostView, SortBy,
    UpdatePostRequest, normalize_comment_text,
};
use crate::domain::user::{AuthorSummary, Role};

#[derive(Debug, Clone, Copy)]
pub(crate) struct ListPostsParams {
    pub(crate) sort_by: SortBy,
    pub(crate) author_id: Option<i64>,
    pub(crate) offset: u32,
    pub(crate) limit: u32,
}

pub(crate) struct PostService<P: PostRepository, U: UserRepository> {
    posts: P,
    users: U,
}

impl<P: PostRepository, U: UserRepository> PostService<P, U> {
    pub(crate) fn new(posts: P, users: U) -> Self {
        Self { posts, users }
    }

    pub(crate) async fn create_post(
        &self,
        author_id: i64,
        req: CreatePostRequest,
    ) -> Result<PostView, DomainError> {
        let req = req.validate()?;

        let new_post = NewPost {
            title: req.title,
            body: req.body,
            image_url: req.image_url,
            author_id,
        };
        let post = self.posts.insert_post(new_post).await?;
        info!(post_id = post.id, author_id, "post created");

        self.populate_one(post).await
    }

    pub(crate) async fn list_posts(
        &self,
        params: ListPostsParams,
    ) -> Result<Vec<PostView>, DomainError> {
        if params.limit == 0 {
            return Err(DomainError::Validation {
                field: "limit",
                message: "must be > 0",
            });
        }

        let query = PostQuery {
            sort_by: params.sort_by,
            author_id: params.author_id,
            offset: params.offset,
            limit: params.limit,
        };
        let posts = self.posts.find_posts(query).await?;
        self.populate(posts).await
    }

    pub(crate) async fn list_by_author(
        &self,
        author_id: i64,
        offset: u32,
        limit: u32,
    ) -> Result<Vec<PostView>, DomainError> {
        self.list_posts(ListPostsParams {
            sort_by: SortBy::Date,
            author_id: Some(author_id),
            offset,
            limit,
        })
        .await
    }

    pub(crate) async fn get_post(&self, id: i64) -> Result<PostView, DomainError> {
        let post = self.active_post(id).await?;
        self.populate_one(post).await
    }

    pub(crate) async fn update_post(
        &self,
        actor_user_id: i64,
        post_id: i64,
        req: UpdatePostRequest,
    ) -> Result<PostView, DomainError> {
        let req = req.validate()?;
        let original_post = self.active_post(post_id).await?;

        if original_post.author_id != actor_user_id {
            debug!(post_id, actor_user_id, "update rejected: not the author");
            return Err(DomainError::forbidden("only the author can edit this post"));
        }

        let patch = PostPatch {
            title: req.title,
            body: req.body,
            image_url: req.image_url,
        };
        let post = self
            .posts
            .update_post(post_id, patch)
            .await?
            .ok_or_else(|| DomainError::post_not_found(post_id))?;
        info!(post_id, actor_user_id, "post updated");

        self.populate_one(post).await
    }

    pub(crate) async fn delete_post(
        &self,
        actor_user_id: i64,
        actor_role: Role,
        post_id: i64,
    ) -> Result<(), DomainError> {
        let original_post = self.active_post(post_id).await?;

        if original_post.author_id != actor_user_id && !actor_role.can_moderate() {
            debug!(post_id, actor_user_id, "delete rejected: not the author");
            return Err(DomainError::forbidden(
                "only the author or a moderator can delete this post",
            ));
        }

        let deleted = self.posts.mark_deleted(post_id).await?;
        if !deleted {
            return Err(DomainError::post_not_found(post_id));
        }
        info!(post_id, actor_user_id, role = actor_role.as_str(), "post deleted");
        Ok(())
    }

    pub(crate) async fn like_post(&self, user_id: i64, post_id: i64) -> Result<PostView, DomainError> {
        let post = self.active_post(post_id).await?;
        if post.is_liked_by(user_id) {
            return Err(DomainError::forbidden("post already liked"));
        }

        let post = self
            .posts
            .add_like(post_id, user_id)
            .await?
            .ok_or_else(|| DomainError::post_not_found(post_id))?;
        info!(post_id, user_id, "post liked");

        self.populate_one(post).await
    }

    pub(crate) async fn unlike_post(
        &self,
        user_id: i64,
        post_id: i64,
    ) -> Result<PostView, DomainError> {
        let post = self.active_post(post_id).await?;
        if !post.is_liked_by(user_id) {
            return Err(DomainError::forbidden("post is not liked"));
        }

        let post = self
            .posts
            .remove_like(post_id, user_id)
            .await?
            .ok_or_else(|| DomainError::post_not_found(post_id))?;
        info!(post_id, user_id, "post unliked");

        self.populate_one(post).await
    }

    pub(crate) async fn add_comment(
        &self,
        author_id: i64,
        post_id: i64,
        text: &str,
    ) -> Result<PostView, DomainError> {
        let text = normalize_comment_text(text)?;
        self.active_post(post_id).await?;

        let comment = NewComment { text, author_id };
        let post = self
            .posts
            .push_comment(post_id, comment)
            .await?
            .ok_or_else(|| DomainError::post_not_found(post_id))?;
        info!(post_id, author_id, "comment added");

        self.populate_one(post).await
    }

    /// Most recent comments first, unlike the insertion order of [`PostView::comments`].
    pub(crate) async fn list_comments(
        &self,
        post_id: i64,
        offset: usize,
        limit: usize,
    ) -> Result<CommentPage, DomainError> {
        if limit == 0 {
            return Err(DomainError::Validation {
                field: "limit",
                message: "must be > 0",
            });
        }

        let post = self.active_post(post_id).await?;
        let total = post.comments.len();

        let mut comments = post.comments;
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        let page: Vec<Comment> = comments.into_iter().skip(offset).take(limit).collect();

        let authors = self
            .load_authors(page.iter().map(|comment| comment.author_id).collect())
            .await?;
        let items = page
            .into_iter()
            .map(|comment| comment_view(comment, &authors))
            .collect();

        Ok(CommentPage {
            items,
            total,
            offset,
            limit,
        })
    }

    pub(crate) async fn edit_comment(
        &self,
        actor_user_id: i64,
        post_id: i64,
        comment_id: i64,
        text: &str,
    ) -> Result<CommentView, DomainError> {
        let text = normalize_comment_text(text)?;
        let post = self.active_post(post_id).await?;
        let comment = post
            .comment(comment_id)
            .ok_or_else(|| DomainError::NotFound(format!("comment id: {comment_id}")))?;

        if comment.author_id != actor_user_id {
            debug!(post_id, comment_id, actor_user_id, "comment edit rejected");
            return Err(DomainError::forbidden(
                "only the author can edit this comment",
            ));
        }

        let updated = self
            .posts
            .update_comment_text(post_id, comment_id, text)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("comment id: {comment_id}")))?;
        info!(post_id, comment_id, actor_user_id, "comment edited");

        let authors = self.load_authors(vec![updated.author_id]).await?;
        Ok(comment_view(updated, &authors))
    }

    async fn active_post(&self, id: i64) -> Result<Post, DomainError> {
        self.posts
            .find_post(id)
            .await?
            .filter(Post::is_active)
            .ok_or_else(|| DomainError::post_not_found(id))
    }

    async fn populate_one(&self, post: Post) -> Result<PostView, DomainError> {
        let mut views = self.populate(vec![post]).await?;
        views
            .pop()
            .ok_or_else(|| DomainError::Unexpected("populate dropped a post".to_string()))
    }

    async fn populate(&self, posts: Vec<Post>) -> Result<Vec<PostView>, DomainError> {
        let referenced: Vec<i64> = posts
            .iter()
            .flat_map(|post| {
                std::iter::once(post.author_id)
                    .chain(post.comments.iter().map(|comment| comment.author_id))
            })
            .collect();
        let authors = self.load_authors(referenced).await?;

        Ok(posts
            .into_iter()
            .map(|mut post| {
                let comments = std::mem::take(&mut post.comments)
                    .into_iter()
                    .map(|comment| comment_view(comment, &authors))
                    .collect();
                PostView {
                    author: authors.get(&post.author_id).cloned(),
                    like_count: post.like_count(),
                    comments,
                    post,
                }
            })
            .collect())
    }

    async fn load_authors(
        &self,
        mut ids: Vec<i64>,
    ) -> Result<HashMap<i64, AuthorSummary>, DomainError> {
        ids.sort_unstable();
        ids.dedup();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let authors = self.users.find_authors(&ids).await?;
        Ok(authors
            .into_iter()
            .map(|author| (author.id, author))
            .collect())
    }
}

fn comment_view(comment: Comment, authors: &HashMap<i64, AuthorSummary>) -> CommentView {
    CommentView {
        author: authors.get(&comment.author_id).cloned(),
        comment,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::NaiveDate;

    use super::{ListPostsParams, PostService};
    use crate::data::post_repository::PostRepository;
    use crate::data::repositories::memory::post_repository::MemoryPostRepository;
    use crate::data::repositories::memory::user_repository::MemoryUserRepository;
    use crate::data::user_repository::{
        NewUser, ProfilePatch, UserCredentials, UserRepository,
    };
    use crate::domain::error::DomainError;
    use crate::domain::post::{CreatePostRequest, SortBy, UpdatePostRequest};
    use crate::domain::stats::UserStats;
    use crate::domain::user::{AuthorSummary, Role, User};

    type Service = PostService<Arc<MemoryPostRepository>, Arc<MemoryUserRepository>>;

    struct Fixture {
        service: Service,
        posts: Arc<MemoryPostRepository>,
        u1: i64,
        u2: i64,
        u3: i64,
    }

    async fn fixture() -> Fixture {
        let posts = Arc::new(MemoryPostRepository::new());
        let users = Arc::new(MemoryUserRepository::new());
        let u1 = create_user(&users, "user_one").await;
        let u2 = create_user(&users, "user_two").await;
        let u3 = create_user(&users, "user_three").await;

        Fixture {
            service: PostService::new(posts.clone(), users),
            posts,
            u1,
            u2,
            u3,
        }
    }

    async fn create_user(users: &MemoryUserRepository, username: &str) -> i64 {
        users
            .create_user(NewUser {
                name: "Name".to_string(),
                last_name: "Last".to_string(),
                email: format!("{username}@example.com"),
                username: username.to_string(),
                password_hash: "hash".to_string(),
                birth_date: NaiveDate::from_ymd_opt(1995, 1, 1).expect("valid date"),
                bio: None,
                profile_image_url: None,
                role: Role::User,
            })
            .await
            .expect("user must be created")
            .id
    }

    fn hello_world() -> CreatePostRequest {
        CreatePostRequest {
            title: "Hello".to_string(),
            body: "World".to_string(),
            image_url: None,
        }
    }

    fn params(sort_by: SortBy, offset: u32, limit: u32) -> ListPostsParams {
        ListPostsParams {
            sort_by,
            author_id: None,
            offset,
            limit,
        }
    }

    #[tokio::test]
    async fn like_and_unlike_follow_reject_on_duplicate_policy() {
        let f = fixture().await;
        let created = f
            .service
            .create_post(f.u2, hello_world())
            .await
            .expect("create must succeed");
        assert_eq!(created.like_count, 0);
        assert_eq!(
            created.author.as_ref().map(|a| a.username.as_str()),
            Some("user_two")
        );
        let id = created.post.id;

        let liked = f.service.like_post(f.u1, id).await.expect("first like");
        assert_eq!(liked.post.likes, vec![f.u1]);
        assert_eq!(liked.like_count, 1);

        let err = f.service.like_post(f.u1, id).await.expect_err("second like");
        assert!(matches!(err, DomainError::Forbidden(_)));

        let unliked = f.service.unlike_post(f.u1, id).await.expect("unlike");
        assert!(unliked.post.likes.is_empty());

        let err = f
            .service
            .unlike_post(f.u1, id)
            .await
            .expect_err("second unlike");
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[tokio::test]
    async fn unlike_without_like_is_forbidden() {
        let f = fixture().await;
        let post = f.service.create_post(f.u1, hello_world()).await.expect("create");

        let err = f
            .service
            .unlike_post(f.u2, post.post.id)
            .await
            .expect_err("must be forbidden");
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[tokio::test]
    async fn deleted_posts_disappear_from_every_read() {
        let f = fixture().await;
        let kept = f.service.create_post(f.u1, hello_world()).await.expect("create");
        let gone = f.service.create_post(f.u1, hello_world()).await.expect("create");
        f.service.like_post(f.u2, gone.post.id).await.expect("like");
        let commented = f
            .service
            .add_comment(f.u2, gone.post.id, "before delete")
            .await
            .expect("comment");
        let comment_id = commented.comments[0].comment.id;

        f.service
            .delete_post(f.u1, Role::User, gone.post.id)
            .await
            .expect("delete must succeed");

        for sort_by in [SortBy::Date, SortBy::Likes] {
            let listed = f
                .service
                .list_posts(params(sort_by, 0, 10))
                .await
                .expect("list");
            let ids: Vec<i64> = listed.iter().map(|view| view.post.id).collect();
            assert_eq!(ids, vec![kept.post.id]);
        }

        let err = f
            .service
            .get_post(gone.post.id)
            .await
            .expect_err("must be hidden");
        assert!(matches!(err, DomainError::NotFound(_)));
        let err = f
            .service
            .like_post(f.u3, gone.post.id)
            .await
            .expect_err("must be hidden");
        assert!(matches!(err, DomainError::NotFound(_)));
        let err = f
            .service
            .add_comment(f.u3, gone.post.id, "late")
            .await
            .expect_err("must be hidden");
        assert!(matches!(err, DomainError::NotFound(_)));
        let err = f
            .service
            .delete_post(f.u1, Role::User, gone.post.id)
            .await
            .expect_err("already deleted");
        assert!(matches!(err, DomainError::NotFound(_)));
        let err = f
            .service
            .list_comments(gone.post.id, 0, 10)
            .await
            .expect_err("comments of a deleted post are hidden");
        assert!(matches!(err, DomainError::NotFound(_)));
        let err = f
            .service
            .edit_comment(f.u2, gone.post.id, comment_id, "after delete")
            .await
            .expect_err("comments of a deleted post are frozen");
        assert!(matches!(err, DomainError::NotFound(_)));
        let err = f
            .service
            .unlike_post(f.u2, gone.post.id)
            .await
            .expect_err("must be hidden");
        assert!(matches!(err, DomainError::NotFound(_)));
        let err = f
            .service
            .update_post(
                f.u1,
                gone.post.id,
                UpdatePostRequest {
                    title: Some("revived".to_string()),
                    ..Default::default()
                },
            )
            .await
            .expect_err("must be hidden");
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn populated_reads_run_on_spawned_tasks() {
        let f = fixture().await;
        let (u1, u2) = (f.u1, f.u2);
        let service = Arc::new(f.service);
        let post = service.create_post(u1, hello_world()).await.expect("create");
        let post_id = post.post.id;
        let comment_id = service
            .add_comment(u2, post_id, "spawned")
            .await
            .expect("comment")
            .comments[0]
            .comment
            .id;

        let lister = service.clone();
        let listed =
            tokio::spawn(async move { lister.list_posts(params(SortBy::Likes, 0, 10)).await })
                .await
                .expect("task must not panic")
                .expect("list");
        assert_eq!(listed.len(), 1);

        let reader = service.clone();
        let page = tokio::spawn(async move { reader.list_comments(post_id, 0, 10).await })
            .await
            .expect("task must not panic")
            .expect("comments");
        assert_eq!(page.total, 1);

        let editor = service.clone();
        let edited = tokio::spawn(async move {
            editor.edit_comment(u2, post_id, comment_id, "edited").await
        })
        .await
        .expect("task must not panic")
        .expect("edit");
        assert!(edited.comment.edited);
        assert_eq!(edited.author.map(|author| author.id), Some(u2));
    }

    #[tokio::test]
    async fn delete_requires_author_or_moderator() {
        let f = fixture().await;
        let post = f.service.create_post(f.u1, hello_world()).await.expect("create");

        let err = f
            .service
            .delete_post(f.u2, Role::User, post.post.id)
            .await
            .expect_err("stranger must be rejected");
        assert!(matches!(err, DomainError::Forbidden(_)));

        f.service
            .delete_post(f.u2, Role::Moderator, post.post.id)
            .await
            .expect("moderator may delete");

        let stored = f
            .posts
            .find_post(post.post.id)
            .await
            .expect("find")
            .expect("soft delete keeps the document");
        assert!(!stored.is_active());
    }

    #[tokio::test]
    async fn update_is_owner_only_and_partial() {
        let f = fixture().await;
        let post = f.service.create_post(f.u1, hello_world()).await.expect("create");

        for stranger in [f.u2, f.u3] {
            let err = f
                .service
                .update_post(
                    stranger,
                    post.post.id,
                    UpdatePostRequest {
                        title: Some("hijack".to_string()),
                        ..Default::default()
                    },
                )
                .await
                .expect_err("must be forbidden");
            assert!(matches!(err, DomainError::Forbidden(_)));
        }

        let updated = f
            .service
            .update_post(
                f.u1,
                post.post.id,
                UpdatePostRequest {
                    title: Some("  Hola  ".to_string()),
                    ..Default::default()
                },
            )
            .await
            .expect("owner may update");
        assert_eq!(updated.post.title, "Hola");
        assert_eq!(updated.post.body, "World");
        assert_eq!(updated.post.author_id, f.u1);
    }

    #[tokio::test]
    async fn update_of_missing_post_is_not_found() {
        let f = fixture().await;
        let err = f
            .service
            .update_post(
                f.u1,
                999,
                UpdatePostRequest {
                    body: Some("x".to_string()),
                    ..Default::default()
                },
            )
            .await
            .expect_err("must be missing");
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn comment_is_listed_with_page_metadata() {
        let f = fixture().await;
        let post = f.service.create_post(f.u1, hello_world()).await.expect("create");

        let with_comment = f
            .service
            .add_comment(f.u2, post.post.id, "nice!")
            .await
            .expect("comment");
        assert_eq!(with_comment.comments.len(), 1);

        let page = f
            .service
            .list_comments(post.post.id, 0, 10)
            .await
            .expect("list comments");
        assert_eq!(page.total, 1);
        assert_eq!(page.offset, 0);
        assert_eq!(page.limit, 10);
        let item = &page.items[0];
        assert_eq!(item.comment.text, "nice!");
        assert!(!item.comment.edited);
        assert_eq!(item.comment.author_id, f.u2);
        assert_eq!(
            item.author.as_ref().map(|a| a.username.as_str()),
            Some("user_two")
        );
    }

    #[tokio::test]
    async fn comment_orderings_differ_between_embedded_and_listed() {
        let f = fixture().await;
        let post = f.service.create_post(f.u1, hello_world()).await.expect("create");
        for text in ["first", "second", "third"] {
            f.service
                .add_comment(f.u2, post.post.id, text)
                .await
                .expect("comment");
        }

        let embedded = f.service.get_post(post.post.id).await.expect("get");
        let embedded: Vec<&str> = embedded
            .comments
            .iter()
            .map(|view| view.comment.text.as_str())
            .collect();
        assert_eq!(embedded, vec!["first", "second", "third"]);

        let page = f
            .service
            .list_comments(post.post.id, 1, 5)
            .await
            .expect("list");
        let listed: Vec<&str> = page
            .items
            .iter()
            .map(|view| view.comment.text.as_str())
            .collect();
        assert_eq!(listed, vec!["second", "first"]);
        assert_eq!(page.total, 3);
    }

    #[tokio::test]
    async fn edit_comment_is_author_only_and_keeps_identity() {
        let f = fixture().await;
        let post = f.service.create_post(f.u1, hello_world()).await.expect("create");
        let view = f
            .service
            .add_comment(f.u2, post.post.id, "nice!")
            .await
            .expect("comment");
        let original = view.comments[0].comment.clone();

        let err = f
            .service
            .edit_comment(f.u3, post.post.id, original.id, "nice post!")
            .await
            .expect_err("must be forbidden");
        assert!(matches!(err, DomainError::Forbidden(_)));

        let edited = f
            .service
            .edit_comment(f.u2, post.post.id, original.id, "nice post!")
            .await
            .expect("author may edit");
        assert_eq!(edited.comment.text, "nice post!");
        assert!(edited.comment.edited);
        assert_eq!(edited.comment.author_id, original.author_id);
        assert_eq!(edited.comment.created_at, original.created_at);

        let err = f
            .service
            .edit_comment(f.u2, post.post.id, original.id + 100, "x")
            .await
            .expect_err("unknown comment");
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn consecutive_pages_are_disjoint_and_ordered() {
        let f = fixture().await;
        let mut ids = Vec::new();
        for i in 0..7 {
            let view = f
                .service
                .create_post(f.u1, hello_world())
                .await
                .expect("create");
            // every other post gets a like so the two sort orders differ
            if i % 2 == 0 {
                f.service.like_post(f.u2, view.post.id).await.expect("like");
            }
            ids.push(view.post.id);
        }

        for sort_by in [SortBy::Date, SortBy::Likes] {
            let all = f
                .service
                .list_posts(params(sort_by, 0, 100))
                .await
                .expect("list all");
            let first = f
                .service
                .list_posts(params(sort_by, 0, 3))
                .await
                .expect("page 1");
            let second = f
                .service
                .list_posts(params(sort_by, 3, 3))
                .await
                .expect("page 2");

            let paged: Vec<i64> = first
                .iter()
                .chain(second.iter())
                .map(|view| view.post.id)
                .collect();
            let expected: Vec<i64> = all.iter().take(6).map(|view| view.post.id).collect();
            assert_eq!(paged, expected);
        }

        let by_likes = f
            .service
            .list_posts(params(SortBy::Likes, 0, 100))
            .await
            .expect("list");
        let counts: Vec<usize> = by_likes.iter().map(|view| view.like_count).collect();
        assert_eq!(counts, vec![1, 1, 1, 1, 0, 0, 0]);
        assert_eq!(by_likes[0].post.id, ids[6]);
    }

    #[tokio::test]
    async fn list_filters_by_author() {
        let f = fixture().await;
        f.service.create_post(f.u1, hello_world()).await.expect("create");
        let mine = f.service.create_post(f.u2, hello_world()).await.expect("create");

        let listed = f
            .service
            .list_posts(ListPostsParams {
                author_id: Some(f.u2),
                ..params(SortBy::Likes, 0, 10)
            })
            .await
            .expect("list");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].post.id, mine.post.id);

        let by_author = f
            .service
            .list_by_author(f.u2, 0, 10)
            .await
            .expect("list by author");
        let ids: Vec<i64> = by_author.iter().map(|view| view.post.id).collect();
        assert_eq!(ids, vec![mine.post.id]);
    }

    #[derive(Clone, Default)]
    struct RecordingDirectory {
        lookups: Arc<Mutex<Vec<Vec<i64>>>>,
    }

    #[async_trait]
    impl UserRepository for RecordingDirectory {
        async fn create_user(&self, _input: NewUser) -> Result<User, DomainError> {
            Err(DomainError::Unexpected("not used".to_string()))
        }

        async fn find_by_id(&self, _id: i64) -> Result<Option<User>, DomainError> {
            Ok(None)
        }

        async fn find_by_username(
            &self,
            _username: &str,
        ) -> Result<Option<UserCredentials>, DomainError> {
            Ok(None)
        }

        async fn find_by_email(
            &self,
            _email: &str,
        ) -> Result<Option<UserCredentials>, DomainError> {
            Ok(None)
        }

        async fn find_by_login(
            &self,
            _login: &str,
        ) -> Result<Option<UserCredentials>, DomainError> {
            Ok(None)
        }

        async fn update_profile(
            &self,
            _id: i64,
            _patch: ProfilePatch,
        ) -> Result<Option<User>, DomainError> {
            Ok(None)
        }

        async fn set_active(&self, _id: i64, _active: bool) -> Result<Option<User>, DomainError> {
            Ok(None)
        }

        async fn list_users(&self) -> Result<Vec<User>, DomainError> {
            Ok(Vec::new())
        }

        async fn find_authors(&self, ids: &[i64]) -> Result<Vec<AuthorSummary>, DomainError> {
            self.lookups
                .lock()
                .expect("lookups mutex poisoned")
                .push(ids.to_vec());
            Ok(Vec::new())
        }

        async fn user_stats(&self) -> Result<UserStats, DomainError> {
            Ok(UserStats::default())
        }
    }

    #[tokio::test]
    async fn populate_does_one_deduplicated_lookup_and_tolerates_missing_authors() {
        let directory = RecordingDirectory::default();
        let service = PostService::new(Arc::new(MemoryPostRepository::new()), directory.clone());

        let post = service.create_post(7, hello_world()).await.expect("create");
        assert!(post.author.is_none());
        service
            .add_comment(7, post.post.id, "self reply")
            .await
            .expect("comment");
        service
            .add_comment(8, post.post.id, "reply")
            .await
            .expect("comment");

        directory
            .lookups
            .lock()
            .expect("lookups mutex poisoned")
            .clear();
        service.get_post(post.post.id).await.expect("get");

        let lookups = directory
            .lookups
            .lock()
            .expect("lookups mutex poisoned")
            .clone();
        assert_eq!(lookups, vec![vec![7, 8]]);
    }
}
