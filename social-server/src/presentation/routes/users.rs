use axum::Router;
use axum::middleware;
use axum::routing::{delete, get, post};

use crate::presentation::AppState;
use crate::presentation::handlers::users::{
    activate_user, create_user, deactivate_user, list_users, me, update_me,
};
use crate::presentation::middleware::auth::{jwt_auth_middleware, require_admin};

pub(crate) fn router(state: AppState) -> Router<AppState> {
    let own_profile = Router::new()
        .route("/me", get(me).patch(update_me))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_middleware,
        ));

    let managed = Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/{id}", delete(deactivate_user))
        .route("/{id}/activate", post(activate_user))
        .layer(middleware::from_fn(require_admin))
        .layer(middleware::from_fn_with_state(state, jwt_auth_middleware));

    own_profile.merge(managed)
}
