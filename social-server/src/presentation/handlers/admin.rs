use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::auth::UserDto;
use crate::domain::stats::DashboardStats;
use crate::presentation::AppState;
use crate::presentation::app_error::AppResult;

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct DashboardDto {
    pub(crate) total_users: i64,
    pub(crate) active_users: i64,
    pub(crate) total_posts: i64,
    pub(crate) deleted_posts: i64,
    pub(crate) total_comments: i64,
    pub(crate) total_likes: i64,
}

impl From<DashboardStats> for DashboardDto {
    fn from(stats: DashboardStats) -> Self {
        Self {
            total_users: stats.users.total_users,
            active_users: stats.users.active_users,
            total_posts: stats.posts.total_posts,
            deleted_posts: stats.posts.deleted_posts,
            total_comments: stats.posts.total_comments,
            total_likes: stats.posts.total_likes,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct SeedAdminDto {
    #[validate(length(min = 1))]
    pub(crate) secret: String,
}

#[utoipa::path(
    get,
    path = "/api/admin/stats",
    tag = "admin",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Dashboard counters", body = DashboardDto),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin role required"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn dashboard(State(state): State<AppState>) -> AppResult<Json<DashboardDto>> {
    let stats = state.stats_service.dashboard().await?;
    Ok(Json(stats.into()))
}

#[utoipa::path(
    post,
    path = "/api/seed/admin",
    tag = "admin",
    request_body = SeedAdminDto,
    responses(
        (status = 201, description = "Bootstrap admin created", body = UserDto),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Seeding disabled or wrong secret"),
        (status = 409, description = "Admin already exists"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn seed_admin(
    State(state): State<AppState>,
    Json(dto): Json<SeedAdminDto>,
) -> AppResult<(StatusCode, Json<UserDto>)> {
    dto.validate()?;

    let admin = state.user_service.seed_admin(&dto.secret).await?;
    Ok((StatusCode::CREATED, Json(admin.into())))
}
