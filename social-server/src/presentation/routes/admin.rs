use axum::Router;
use axum::middleware;
use axum::routing::get;

use crate::presentation::AppState;
use crate::presentation::handlers::admin::dashboard;
use crate::presentation::middleware::auth::{jwt_auth_middleware, require_admin};

pub(crate) fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/stats", get(dashboard))
        .layer(middleware::from_fn(require_admin))
        .layer(middleware::from_fn_with_state(state, jwt_auth_middleware))
}
