use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::post_service::ListPostsParams;
use crate::domain::post::{CommentView, CreatePostRequest, PostView, SortBy, UpdatePostRequest};
use crate::domain::user::AuthorSummary;
use crate::presentation::AppState;
use crate::presentation::app_error::{AppError, AppResult};
use crate::presentation::middleware::auth::AuthenticatedUser;

pub(crate) const DEFAULT_PAGE_LIMIT: u32 = 10;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct CreatePostDto {
    #[validate(length(min = 1, max = 255))]
    pub(crate) title: String,
    #[validate(length(min = 1))]
    pub(crate) body: String,
    #[serde(alias = "imageUrl")]
    #[validate(url)]
    pub(crate) image_url: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct UpdatePostDto {
    #[validate(length(min = 1, max = 255))]
    pub(crate) title: Option<String>,
    #[validate(length(min = 1))]
    pub(crate) body: Option<String>,
    #[serde(alias = "imageUrl")]
    #[validate(url)]
    pub(crate) image_url: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct PaginationQuery {
    #[validate(range(min = 1, max = 100))]
    pub(crate) limit: Option<u32>,
    pub(crate) offset: Option<u32>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct ListPostsQuery {
    /// `date` (default) or `likes`.
    #[serde(alias = "sortBy")]
    pub(crate) sort_by: Option<String>,
    #[serde(alias = "authorId")]
    pub(crate) author_id: Option<i64>,
    #[validate(range(min = 1, max = 100))]
    pub(crate) limit: Option<u32>,
    pub(crate) offset: Option<u32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct AuthorDto {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) last_name: String,
    pub(crate) username: String,
    pub(crate) profile_image_url: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct CommentDto {
    pub(crate) id: i64,
    pub(crate) text: String,
    pub(crate) author_id: i64,
    /// `null` when the author no longer exists.
    pub(crate) author: Option<AuthorDto>,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) edited: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct PostDto {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) body: String,
    pub(crate) image_url: Option<String>,
    pub(crate) author_id: i64,
    pub(crate) author: Option<AuthorDto>,
    pub(crate) likes: Vec<i64>,
    pub(crate) like_count: usize,
    pub(crate) comments: Vec<CommentDto>,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct MessageDto {
    pub(crate) message: String,
}

impl From<AuthorSummary> for AuthorDto {
    fn from(author: AuthorSummary) -> Self {
        Self {
            id: author.id,
            name: author.name,
            last_name: author.last_name,
            username: author.username,
            profile_image_url: author.profile_image_url,
        }
    }
}

impl From<CommentView> for CommentDto {
    fn from(view: CommentView) -> Self {
        Self {
            id: view.comment.id,
            text: view.comment.text,
            author_id: view.comment.author_id,
            author: view.author.map(AuthorDto::from),
            created_at: view.comment.created_at,
            edited: view.comment.edited,
        }
    }
}

impl From<PostView> for PostDto {
    fn from(view: PostView) -> Self {
        let post = view.post;
        Self {
            id: post.id,
            title: post.title,
            body: post.body,
            image_url: post.image_url,
            author_id: post.author_id,
            author: view.author.map(AuthorDto::from),
            likes: post.likes,
            like_count: view.like_count,
            comments: view.comments.into_iter().map(CommentDto::from).collect(),
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

fn parse_sort_by(raw: Option<&str>) -> AppResult<SortBy> {
    match raw.map(str::trim) {
        None | Some("") | Some("date") => Ok(SortBy::Date),
        Some("likes") => Ok(SortBy::Likes),
        Some(other) => Err(AppError::BadRequest(format!(
            "sort_by must be 'date' or 'likes', got '{other}'"
        ))),
    }
}

#[utoipa::path(
    get,
    path = "/api/posts",
    tag = "posts",
    params(
        ("sort_by" = Option<String>, Query, description = "`date` (default) or `likes`; alias `sortBy`"),
        ("author_id" = Option<i64>, Query, description = "Only posts by this author; alias `authorId`"),
        ("limit" = Option<u32>, Query, description = "Items per page (1..=100, default 10)"),
        ("offset" = Option<u32>, Query, description = "Offset from the beginning (>= 0)")
    ),
    responses(
        (status = 200, description = "Posts listed", body = Vec<PostDto>),
        (status = 400, description = "Validation error"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<ListPostsQuery>,
) -> AppResult<Json<Vec<PostDto>>> {
    query.validate()?;
    let params = ListPostsParams {
        sort_by: parse_sort_by(query.sort_by.as_deref())?,
        author_id: query.author_id,
        offset: query.offset.unwrap_or(0),
        limit: query.limit.unwrap_or(DEFAULT_PAGE_LIMIT),
    };

    let posts = state.post_service.list_posts(params).await?;
    Ok(Json(posts.into_iter().map(PostDto::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/posts/author/{author_id}",
    tag = "posts",
    params(
        ("author_id" = i64, Path, description = "Author id"),
        ("limit" = Option<u32>, Query, description = "Items per page (1..=100, default 10)"),
        ("offset" = Option<u32>, Query, description = "Offset from the beginning (>= 0)")
    ),
    responses(
        (status = 200, description = "Posts by author, newest first", body = Vec<PostDto>),
        (status = 400, description = "Validation error"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn list_posts_by_author(
    State(state): State<AppState>,
    Path(author_id): Path<i64>,
    Query(query): Query<PaginationQuery>,
) -> AppResult<Json<Vec<PostDto>>> {
    query.validate()?;
    let posts = state
        .post_service
        .list_by_author(
            author_id,
            query.offset.unwrap_or(0),
            query.limit.unwrap_or(DEFAULT_PAGE_LIMIT),
        )
        .await?;
    Ok(Json(posts.into_iter().map(PostDto::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/posts/{id}",
    tag = "posts",
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    responses(
        (status = 200, description = "Post found", body = PostDto),
        (status = 404, description = "Post not found or deleted"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<PostDto>> {
    let view = state.post_service.get_post(id).await?;
    Ok(Json(PostDto::from(view)))
}

#[utoipa::path(
    post,
    path = "/api/posts",
    tag = "posts",
    security(
        ("bearer_auth" = [])
    ),
    request_body = CreatePostDto,
    responses(
        (status = 201, description = "Post created", body = PostDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn create_post(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Json(dto): Json<CreatePostDto>,
) -> AppResult<(StatusCode, Json<PostDto>)> {
    dto.validate()?;
    let req = CreatePostRequest {
        title: dto.title,
        body: dto.body,
        image_url: dto.image_url,
    };

    let view = state.post_service.create_post(auth.user_id, req).await?;
    Ok((StatusCode::CREATED, Json(PostDto::from(view))))
}

#[utoipa::path(
    patch,
    path = "/api/posts/{id}",
    tag = "posts",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    request_body = UpdatePostDto,
    responses(
        (status = 200, description = "Post updated", body = PostDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn update_post(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<i64>,
    Json(dto): Json<UpdatePostDto>,
) -> AppResult<Json<PostDto>> {
    dto.validate()?;
    let req = UpdatePostRequest {
        title: dto.title,
        body: dto.body,
        image_url: dto.image_url,
    };

    let view = state
        .post_service
        .update_post(auth.user_id, id, req)
        .await?;
    Ok(Json(PostDto::from(view)))
}

#[utoipa::path(
    delete,
    path = "/api/posts/{id}",
    tag = "posts",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    responses(
        (status = 200, description = "Post deleted", body = MessageDto),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the author or a moderator"),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn delete_post(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Json<MessageDto>> {
    state
        .post_service
        .delete_post(auth.user_id, auth.role, id)
        .await?;
    Ok(Json(MessageDto {
        message: "post deleted".to_string(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/posts/{id}/like",
    tag = "posts",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    responses(
        (status = 200, description = "Post liked", body = PostDto),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Already liked"),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn like_post(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Json<PostDto>> {
    let view = state.post_service.like_post(auth.user_id, id).await?;
    Ok(Json(PostDto::from(view)))
}

#[utoipa::path(
    delete,
    path = "/api/posts/{id}/like",
    tag = "posts",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    responses(
        (status = 200, description = "Like removed", body = PostDto),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not liked"),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn unlike_post(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Json<PostDto>> {
    let view = state.post_service.unlike_post(auth.user_id, id).await?;
    Ok(Json(PostDto::from(view)))
}
