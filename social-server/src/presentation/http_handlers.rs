use axum::{Json, Router, routing::get};
use serde::Serialize;

use super::{AppState, routes};

pub(crate) fn routes(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(health_handler))
        .merge(routes::router(state.clone()))
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct HealthzResponse {
    status: &'static str,
}

async fn health_handler() -> Json<HealthzResponse> {
    Json(HealthzResponse { status: "ok" })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::{Method, Request, StatusCode, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::routes;
    use crate::application::user_service::AdminSeed;
    use crate::data::repositories::memory::post_repository::MemoryPostRepository;
    use crate::data::repositories::memory::user_repository::MemoryUserRepository;
    use crate::infrastructure::jwt::JwtService;
    use crate::presentation::AppState;

    const SEED_SECRET: &str = "let-me-seed";

    fn test_app() -> Router {
        let state = AppState::new(
            Arc::new(MemoryPostRepository::new()),
            Arc::new(MemoryUserRepository::new()),
            Arc::new(JwtService::new("0123456789abcdef0123456789abcdef", 3600)),
            AdminSeed {
                secret: Some(SEED_SECRET.to_string()),
                password: "Admin123".to_string(),
            },
        );
        routes(state)
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request must build");

        let response = app
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body must be readable");
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    async fn register(app: &Router, username: &str) -> (i64, String) {
        let (status, body) = send(
            app,
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({
                "name": "Test",
                "lastName": "User",
                "email": format!("{username}@example.com"),
                "username": username,
                "password": "Passw0rdX",
                "birthDate": "1995-06-15"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
        let id = body["user"]["id"].as_i64().expect("user id");
        let token = body["access_token"]
            .as_str()
            .expect("access token")
            .to_string();
        (id, token)
    }

    #[tokio::test]
    async fn healthz_is_public() {
        let app = test_app();
        let (status, body) = send(&app, Method::GET, "/healthz", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn protected_routes_require_a_valid_bearer_token() {
        let app = test_app();
        let payload = json!({"title": "Hello", "body": "World"});

        let (status, _) = send(&app, Method::POST, "/api/posts", None, Some(payload.clone())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/posts",
            Some("not-a-jwt"),
            Some(payload),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "unauthorized");
    }

    #[tokio::test]
    async fn post_lifecycle_over_http() {
        let app = test_app();
        let (u1, t1) = register(&app, "first_user").await;
        let (u2, t2) = register(&app, "second_user").await;
        let (_, t3) = register(&app, "third_user").await;

        let (status, post) = send(
            &app,
            Method::POST,
            "/api/posts",
            Some(&t1),
            Some(json!({"title": "Hello", "body": "World"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(post["like_count"], 0);
        assert_eq!(post["author"]["username"], "first_user");
        let post_id = post["id"].as_i64().expect("post id");

        let like_uri = format!("/api/posts/{post_id}/like");
        let (status, liked) = send(&app, Method::POST, &like_uri, Some(&t2), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(liked["likes"], json!([u2]));
        let (status, _) = send(&app, Method::POST, &like_uri, Some(&t2), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, listed) = send(
            &app,
            Method::GET,
            "/api/posts?sortBy=likes&limit=5",
            None,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed.as_array().map(Vec::len), Some(1));

        let comments_uri = format!("/api/posts/{post_id}/comments");
        let (status, commented) = send(
            &app,
            Method::POST,
            &comments_uri,
            Some(&t2),
            Some(json!({"text": "nice!"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let comment_id = commented["comments"][0]["id"].as_i64().expect("comment id");

        let (status, page) = send(&app, Method::GET, &comments_uri, None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(page["total"], 1);
        assert_eq!(page["limit"], 10);
        assert_eq!(page["items"][0]["text"], "nice!");
        assert_eq!(page["items"][0]["author_id"], u2);

        let comment_uri = format!("/api/posts/{post_id}/comments/{comment_id}");
        let (status, _) = send(
            &app,
            Method::PUT,
            &comment_uri,
            Some(&t3),
            Some(json!({"text": "hijacked"})),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        let (status, edited) = send(
            &app,
            Method::PATCH,
            &comment_uri,
            Some(&t2),
            Some(json!({"text": "nice post!"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(edited["edited"], true);

        let post_uri = format!("/api/posts/{post_id}");
        let (status, _) = send(&app, Method::DELETE, &post_uri, Some(&t2), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        let (status, deleted) = send(&app, Method::DELETE, &post_uri, Some(&t1), None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(deleted["message"].is_string());

        let (status, _) = send(&app, Method::GET, &post_uri, None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (_, listed) = send(
            &app,
            Method::GET,
            &format!("/api/posts/author/{u1}"),
            None,
            None,
        )
        .await;
        assert_eq!(listed, json!([]));
    }

    #[tokio::test]
    async fn list_rejects_bad_query_parameters() {
        let app = test_app();

        let (status, _) = send(&app, Method::GET, "/api/posts?limit=0", None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, _) = send(&app, Method::GET, "/api/posts?limit=101", None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, body) =
            send(&app, Method::GET, "/api/posts?sort_by=oldest", None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn admin_routes_are_role_gated() {
        let app = test_app();
        let (user_id, user_token) = register(&app, "plain_user").await;

        let (status, _) = send(&app, Method::GET, "/api/admin/stats", Some(&user_token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/seed/admin",
            None,
            Some(json!({"secret": "guess"})),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        let (status, admin) = send(
            &app,
            Method::POST,
            "/api/seed/admin",
            None,
            Some(json!({"secret": SEED_SECRET})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(admin["role"], "admin");

        let (status, login) = send(
            &app,
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"login": "admin", "password": "Admin123"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let admin_token = login["access_token"].as_str().expect("token").to_string();

        let (status, stats) =
            send(&app, Method::GET, "/api/admin/stats", Some(&admin_token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(stats["total_users"], 2);

        let (status, deactivated) = send(
            &app,
            Method::DELETE,
            &format!("/api/users/{user_id}"),
            Some(&admin_token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(deactivated["active"], false);

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"username": "plain_user", "password": "Passw0rdX"})),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn profile_can_be_read_and_patched() {
        let app = test_app();
        let (_, token) = register(&app, "profile_user").await;

        let (status, patched) = send(
            &app,
            Method::PATCH,
            "/api/users/me",
            Some(&token),
            Some(json!({"bio": "hola"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(patched["bio"], "hola");

        let (status, me) = send(&app, Method::GET, "/api/users/me", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(me["username"], "profile_user");
        assert_eq!(me["role"], "user");
    }
}
