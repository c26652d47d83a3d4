use crate::data::post_repository::PostRepository;
use crate::data::user_repository::UserRepository;
use crate::domain::error::DomainError;
use crate::domain::stats::DashboardStats;

pub(crate) struct StatsService<P: PostRepository, U: UserRepository> {
    posts: P,
    users: U,
}

impl<P: PostRepository, U: UserRepository> StatsService<P, U> {
    pub(crate) fn new(posts: P, users: U) -> Self {
        Self { posts, users }
    }

    pub(crate) async fn dashboard(&self) -> Result<DashboardStats, DomainError> {
        let (users, posts) = tokio::try_join!(self.users.user_stats(), self.posts.post_stats())?;
        Ok(DashboardStats { users, posts })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;

    use super::StatsService;
    use crate::data::post_repository::{NewComment, NewPost, PostRepository};
    use crate::data::repositories::memory::post_repository::MemoryPostRepository;
    use crate::data::repositories::memory::user_repository::MemoryUserRepository;
    use crate::data::user_repository::{NewUser, UserRepository};
    use crate::domain::stats::{PostStats, UserStats};
    use crate::domain::user::Role;

    #[tokio::test]
    async fn dashboard_counts_users_posts_and_interactions() {
        let posts = Arc::new(MemoryPostRepository::new());
        let users = Arc::new(MemoryUserRepository::new());

        let mut user_ids = Vec::new();
        for username in ["alpha", "beta"] {
            let user = users
                .create_user(NewUser {
                    name: "Name".to_string(),
                    last_name: "Last".to_string(),
                    email: format!("{username}@example.com"),
                    username: username.to_string(),
                    password_hash: "hash".to_string(),
                    birth_date: NaiveDate::from_ymd_opt(1999, 3, 3).expect("valid date"),
                    bio: None,
                    profile_image_url: None,
                    role: Role::User,
                })
                .await
                .expect("create user");
            user_ids.push(user.id);
        }
        users
            .set_active(user_ids[1], false)
            .await
            .expect("deactivate");

        let mut post_ids = Vec::new();
        for title in ["kept", "removed"] {
            let post = posts
                .insert_post(NewPost {
                    title: title.to_string(),
                    body: "body".to_string(),
                    image_url: None,
                    author_id: user_ids[0],
                })
                .await
                .expect("insert post");
            post_ids.push(post.id);
        }
        posts.add_like(post_ids[0], user_ids[1]).await.expect("like");
        posts
            .push_comment(
                post_ids[0],
                NewComment {
                    text: "hi".to_string(),
                    author_id: user_ids[1],
                },
            )
            .await
            .expect("comment");
        posts.mark_deleted(post_ids[1]).await.expect("delete");

        let service = StatsService::new(posts, users);
        let stats = service.dashboard().await.expect("dashboard");

        assert_eq!(
            stats.users,
            UserStats {
                total_users: 2,
                active_users: 1,
            }
        );
        assert_eq!(
            stats.posts,
            PostStats {
                total_posts: 1,
                deleted_posts: 1,
                total_comments: 1,
                total_likes: 1,
            }
        );
    }
}
