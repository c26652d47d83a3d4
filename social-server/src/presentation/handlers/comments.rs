use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::posts::{CommentDto, DEFAULT_PAGE_LIMIT, PaginationQuery, PostDto};
use crate::domain::post::CommentPage;
use crate::presentation::AppState;
use crate::presentation::app_error::AppResult;
use crate::presentation::middleware::auth::AuthenticatedUser;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct CommentTextDto {
    #[validate(length(min = 1, max = 2000))]
    pub(crate) text: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct CommentPageDto {
    pub(crate) items: Vec<CommentDto>,
    pub(crate) total: usize,
    pub(crate) offset: usize,
    pub(crate) limit: usize,
}

impl From<CommentPage> for CommentPageDto {
    fn from(page: CommentPage) -> Self {
        Self {
            items: page.items.into_iter().map(CommentDto::from).collect(),
            total: page.total,
            offset: page.offset,
            limit: page.limit,
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/posts/{id}/comments",
    tag = "comments",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    request_body = CommentTextDto,
    responses(
        (status = 201, description = "Comment added, full post returned", body = PostDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn add_comment(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(post_id): Path<i64>,
    Json(dto): Json<CommentTextDto>,
) -> AppResult<(StatusCode, Json<PostDto>)> {
    dto.validate()?;

    let view = state
        .post_service
        .add_comment(auth.user_id, post_id, &dto.text)
        .await?;
    Ok((StatusCode::CREATED, Json(PostDto::from(view))))
}

#[utoipa::path(
    get,
    path = "/api/posts/{id}/comments",
    tag = "comments",
    params(
        ("id" = i64, Path, description = "Post id"),
        ("limit" = Option<u32>, Query, description = "Items per page (1..=100, default 10)"),
        ("offset" = Option<u32>, Query, description = "Offset from the beginning (>= 0)")
    ),
    responses(
        (status = 200, description = "Comments, most recent first", body = CommentPageDto),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn list_comments(
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
    Query(query): Query<PaginationQuery>,
) -> AppResult<Json<CommentPageDto>> {
    query.validate()?;
    let offset = query.offset.unwrap_or(0) as usize;
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_LIMIT) as usize;

    let page = state
        .post_service
        .list_comments(post_id, offset, limit)
        .await?;
    Ok(Json(CommentPageDto::from(page)))
}

#[utoipa::path(
    patch,
    path = "/api/posts/{id}/comments/{comment_id}",
    tag = "comments",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "Post id"),
        ("comment_id" = i64, Path, description = "Comment id")
    ),
    request_body = CommentTextDto,
    responses(
        (status = 200, description = "Comment edited", body = CommentDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the comment author"),
        (status = 404, description = "Post or comment not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn edit_comment(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path((post_id, comment_id)): Path<(i64, i64)>,
    Json(dto): Json<CommentTextDto>,
) -> AppResult<Json<CommentDto>> {
    dto.validate()?;

    let view = state
        .post_service
        .edit_comment(auth.user_id, post_id, comment_id, &dto.text)
        .await?;
    Ok(Json(CommentDto::from(view)))
}
