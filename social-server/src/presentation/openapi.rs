use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::presentation::handlers::admin::{DashboardDto, SeedAdminDto};
use crate::presentation::handlers::auth::{AuthResponseDto, LoginDto, RegisterDto, UserDto};
use crate::presentation::handlers::comments::{CommentPageDto, CommentTextDto};
use crate::presentation::handlers::posts::{
    AuthorDto, CommentDto, CreatePostDto, ListPostsQuery, MessageDto, PaginationQuery, PostDto,
    UpdatePostDto,
};
use crate::presentation::handlers::users::{CreateUserDto, UpdateProfileDto};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::presentation::handlers::auth::register,
        crate::presentation::handlers::auth::login,
        crate::presentation::handlers::users::me,
        crate::presentation::handlers::users::update_me,
        crate::presentation::handlers::users::list_users,
        crate::presentation::handlers::users::create_user,
        crate::presentation::handlers::users::deactivate_user,
        crate::presentation::handlers::users::activate_user,
        crate::presentation::handlers::admin::dashboard,
        crate::presentation::handlers::admin::seed_admin,
        crate::presentation::handlers::posts::list_posts,
        crate::presentation::handlers::posts::list_posts_by_author,
        crate::presentation::handlers::posts::get_post,
        crate::presentation::handlers::posts::create_post,
        crate::presentation::handlers::posts::update_post,
        crate::presentation::handlers::posts::delete_post,
        crate::presentation::handlers::posts::like_post,
        crate::presentation::handlers::posts::unlike_post,
        crate::presentation::handlers::comments::add_comment,
        crate::presentation::handlers::comments::list_comments,
        crate::presentation::handlers::comments::edit_comment
    ),
    components(
        schemas(
            RegisterDto,
            LoginDto,
            AuthResponseDto,
            UserDto,
            UpdateProfileDto,
            CreateUserDto,
            DashboardDto,
            SeedAdminDto,
            AuthorDto,
            CreatePostDto,
            UpdatePostDto,
            PaginationQuery,
            ListPostsQuery,
            PostDto,
            MessageDto,
            CommentDto,
            CommentTextDto,
            CommentPageDto
        )
    ),
    tags(
        (name = "auth", description = "Registration and login"),
        (name = "users", description = "Own profile"),
        (name = "admin", description = "User management and dashboard, admin role only"),
        (name = "posts", description = "Posts and likes"),
        (name = "comments", description = "Comments on posts")
    ),
    modifiers(&SecurityAddon)
)]
pub(crate) struct ApiDoc;

pub(crate) struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let mut components = openapi.components.take().unwrap_or_default();
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
        openapi.components = Some(components);
    }
}
