use std::sync::Arc;

use crate::application::auth_service::AuthService;
use crate::application::post_service::PostService;
use crate::application::stats_service::StatsService;
use crate::application::user_service::{AdminSeed, UserService};
use crate::data::post_repository::DynPostRepository;
use crate::data::user_repository::DynUserRepository;
use crate::infrastructure::jwt::JwtService;

pub(crate) mod app_error;
pub(crate) mod handlers;
pub(crate) mod http_handlers;
pub(crate) mod middleware;
pub(crate) mod openapi;
pub(crate) mod routes;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) auth_service: Arc<AuthService<DynUserRepository>>,
    pub(crate) post_service: Arc<PostService<DynPostRepository, DynUserRepository>>,
    pub(crate) user_service: Arc<UserService<DynUserRepository>>,
    pub(crate) stats_service: Arc<StatsService<DynPostRepository, DynUserRepository>>,
    pub(crate) jwt: Arc<JwtService>,
}

impl AppState {
    pub(crate) fn new(
        posts: DynPostRepository,
        users: DynUserRepository,
        jwt: Arc<JwtService>,
        seed: AdminSeed,
    ) -> Self {
        Self {
            auth_service: Arc::new(AuthService::new(users.clone(), jwt.clone())),
            post_service: Arc::new(PostService::new(posts.clone(), users.clone())),
            user_service: Arc::new(UserService::new(users.clone(), seed)),
            stats_service: Arc::new(StatsService::new(posts, users)),
            jwt,
        }
    }
}
