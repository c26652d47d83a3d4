use std::time::{SystemTime, UNIX_EPOCH};

use chrono::NaiveDate;
use social_client::{
    ListPostsQuery, PostPatch, Registration, SocialClient, SocialClientError, SortBy,
};

fn unique_suffix() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock must be after unix epoch")
        .as_nanos();
    format!("{nanos}")
}

fn registration(suffix: &str) -> Registration {
    Registration {
        name: "Smoke".to_string(),
        last_name: "Test".to_string(),
        email: format!("smoke_{suffix}@example.com"),
        username: format!("smoke_{suffix}"),
        password: "Password123".to_string(),
        birth_date: NaiveDate::from_ymd_opt(1995, 5, 17).expect("valid date"),
        bio: None,
        profile_image_url: None,
    }
}

#[tokio::test]
#[ignore = "requires running HTTP server"]
async fn http_smoke_flow() {
    let base_url =
        std::env::var("SOCIAL_HTTP_URL").unwrap_or_else(|_| "http://127.0.0.1:8080".to_string());
    let mut client = SocialClient::new(base_url).expect("client must build");

    let suffix = unique_suffix();
    let input = registration(&suffix);

    let register = client
        .register(&input)
        .await
        .expect("register must succeed");
    assert!(!register.access_token.is_empty());
    assert_eq!(register.user.username, input.username);
    assert_eq!(register.user.role, "user");

    let login = client
        .login(&input.email, &input.password)
        .await
        .expect("login by email must succeed");
    assert_eq!(login.user.id, register.user.id);

    let created = client
        .create_post("smoke title", "smoke body", None)
        .await
        .expect("create_post must succeed");
    assert_eq!(created.author_id, register.user.id);
    assert_eq!(created.like_count, 0);

    let liked = client.like_post(created.id).await.expect("like must succeed");
    assert_eq!(liked.likes, vec![register.user.id]);
    assert!(matches!(
        client.like_post(created.id).await,
        Err(SocialClientError::Forbidden(_))
    ));

    let commented = client
        .add_comment(created.id, "first")
        .await
        .expect("add_comment must succeed");
    let comment_id = commented.comments[0].id;
    let edited = client
        .edit_comment(created.id, comment_id, "first, edited")
        .await
        .expect("edit_comment must succeed");
    assert!(edited.edited);

    let page = client
        .list_comments(created.id, 10, 0)
        .await
        .expect("list_comments must succeed");
    assert_eq!(page.total, 1);

    let updated = client
        .update_post(
            created.id,
            &PostPatch {
                title: Some("smoke title updated".to_string()),
                ..PostPatch::default()
            },
        )
        .await
        .expect("update_post must succeed");
    assert_eq!(updated.title, "smoke title updated");
    assert_eq!(updated.body, "smoke body");

    let listed = client
        .list_posts(&ListPostsQuery {
            sort_by: SortBy::Likes,
            author_id: Some(register.user.id),
            ..ListPostsQuery::default()
        })
        .await
        .expect("list_posts must succeed");
    assert!(listed.iter().any(|post| post.id == created.id));

    client
        .delete_post(created.id)
        .await
        .expect("delete_post must succeed");

    let after_delete = client.get_post(created.id).await;
    assert!(matches!(after_delete, Err(SocialClientError::NotFound)));

    assert!(matches!(
        client.dashboard().await,
        Err(SocialClientError::Forbidden(_))
    ));
}
