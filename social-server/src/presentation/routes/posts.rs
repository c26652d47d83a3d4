use axum::Router;
use axum::middleware;
use axum::routing::{get, patch, post};

use crate::presentation::AppState;
use crate::presentation::handlers::comments::{add_comment, edit_comment, list_comments};
use crate::presentation::handlers::posts::{
    create_post, delete_post, get_post, like_post, list_posts, list_posts_by_author, unlike_post,
    update_post,
};
use crate::presentation::middleware::auth::jwt_auth_middleware;

pub(crate) fn router(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/", get(list_posts))
        .route("/author/{author_id}", get(list_posts_by_author))
        .route("/{id}", get(get_post))
        .route("/{id}/comments", get(list_comments));

    let protected = Router::new()
        .route("/", post(create_post))
        .route("/{id}", patch(update_post).delete(delete_post))
        .route("/{id}/like", post(like_post).delete(unlike_post))
        .route("/{id}/comments", post(add_comment))
        .route(
            "/{id}/comments/{comment_id}",
            patch(edit_comment).put(edit_comment),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_middleware,
        ));

    public.merge(protected)
}
