use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use super::auth::{RegisterDto, UserDto};
use crate::domain::user::{Role, UpdateProfileRequest};
use crate::presentation::AppState;
use crate::presentation::app_error::AppResult;
use crate::presentation::middleware::auth::AuthenticatedUser;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct UpdateProfileDto {
    #[validate(length(min = 1, max = 100))]
    pub(crate) name: Option<String>,
    #[serde(alias = "lastName")]
    #[validate(length(min = 1, max = 100))]
    pub(crate) last_name: Option<String>,
    #[validate(length(max = 500))]
    pub(crate) bio: Option<String>,
    #[serde(alias = "profileImageUrl")]
    #[validate(url)]
    pub(crate) profile_image_url: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct CreateUserDto {
    #[serde(flatten)]
    #[validate(nested)]
    pub(crate) account: RegisterDto,
    /// `user` (default), `moderator` or `admin`.
    pub(crate) role: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "users",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Current user", body = UserDto),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User no longer exists"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn me(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
) -> AppResult<Json<UserDto>> {
    let user = state.user_service.me(auth.user_id).await?;
    Ok(Json(user.into()))
}

#[utoipa::path(
    patch,
    path = "/api/users/me",
    tag = "users",
    security(
        ("bearer_auth" = [])
    ),
    request_body = UpdateProfileDto,
    responses(
        (status = 200, description = "Profile updated", body = UserDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User no longer exists"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn update_me(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Json(dto): Json<UpdateProfileDto>,
) -> AppResult<Json<UserDto>> {
    dto.validate()?;
    let req = UpdateProfileRequest {
        name: dto.name,
        last_name: dto.last_name,
        bio: dto.bio,
        profile_image_url: dto.profile_image_url,
    };

    let user = state.user_service.update_profile(auth.user_id, req).await?;
    Ok(Json(user.into()))
}

#[utoipa::path(
    get,
    path = "/api/users",
    tag = "admin",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "All users, newest first", body = Vec<UserDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin role required"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<UserDto>>> {
    let users = state.user_service.list_users().await?;
    Ok(Json(users.into_iter().map(UserDto::from).collect()))
}

#[utoipa::path(
    post,
    path = "/api/users",
    tag = "admin",
    security(
        ("bearer_auth" = [])
    ),
    request_body = CreateUserDto,
    responses(
        (status = 201, description = "User created", body = UserDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin role required"),
        (status = 409, description = "Email or username already taken"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn create_user(
    State(state): State<AppState>,
    Json(dto): Json<CreateUserDto>,
) -> AppResult<(StatusCode, Json<UserDto>)> {
    dto.validate()?;
    let role = match dto.role.as_deref() {
        Some(raw) => Role::parse(raw.trim())?,
        None => Role::User,
    };

    let user = state
        .user_service
        .create_user(dto.account.into(), role)
        .await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "admin",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "User id")
    ),
    responses(
        (status = 200, description = "User deactivated", body = UserDto),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn deactivate_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<UserDto>> {
    let user = state.user_service.deactivate(id).await?;
    Ok(Json(user.into()))
}

#[utoipa::path(
    post,
    path = "/api/users/{id}/activate",
    tag = "admin",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "User id")
    ),
    responses(
        (status = 200, description = "User activated", body = UserDto),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn activate_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<UserDto>> {
    let user = state.user_service.activate(id).await?;
    Ok(Json(user.into()))
}
