use axum::Router;
use axum::routing::post;

use super::AppState;
use super::handlers::admin::seed_admin;
use super::handlers::auth::{login, register};

pub(crate) mod admin;
pub(crate) mod posts;
pub(crate) mod users;

pub(crate) fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/seed/admin", post(seed_admin))
        .nest("/api/posts", posts::router(state.clone()))
        .nest("/api/users", users::router(state.clone()))
        .nest("/api/admin", admin::router(state))
}
