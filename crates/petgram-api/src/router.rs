use axum::routing::{delete, get, post, put};
use axum::{Router, middleware};
use tower_http::services::ServeDir;

use crate::middleware::require_auth;
use crate::state::AppState;
use crate::{
    auth, chats, comments, direct_messages, follows, liked_comments, liked_posts, posts,
    saved_posts, shared_posts, stories,
};

async fn liveness() -> &'static str {
    "Server is running"
}

/// Assemble the full application router. Registration, login, the
/// mailed-link endpoints and the liveness probe are public; everything
/// else sits behind the bearer check.
pub fn router(state: AppState) -> Router {
    // The mailed links carry a trailing slash, the in-page form action
    // does not, so both spellings are registered.
    let public = Router::new()
        .route("/", get(liveness))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/forgot-password/{email}", get(auth::forgot_password))
        .route("/auth/verify-account", get(auth::verify_account))
        .route("/auth/verify-account/", get(auth::verify_account))
        .route(
            "/auth/reset-password",
            get(auth::reset_password_form).post(auth::reset_password),
        )
        .route(
            "/auth/reset-password/",
            get(auth::reset_password_form).post(auth::reset_password),
        );

    let protected = Router::new()
        .route(
            "/auth/{id}",
            put(auth::edit_account).delete(auth::delete_account),
        )
        .route("/auth/{id}/change-password", put(auth::change_password))
        .route("/auth/{id}/check-password", get(auth::check_password))
        .route("/posts", post(posts::create))
        .route(
            "/posts/{id}",
            get(posts::list).put(posts::edit).delete(posts::delete),
        )
        .route("/stories", post(stories::create))
        .route(
            "/stories/{id}",
            get(stories::list).delete(stories::delete),
        )
        .route("/comments", post(comments::create))
        .route(
            "/comments/{id}",
            get(comments::list)
                .put(comments::edit)
                .delete(comments::delete),
        )
        .route("/follows", post(follows::create))
        .route("/follows/{id}", delete(follows::delete))
        .route("/follows/{id}/followers", get(follows::followers))
        .route("/follows/{id}/following", get(follows::following))
        .route("/liked-posts", post(liked_posts::create))
        .route(
            "/liked-posts/{id}",
            get(liked_posts::list).delete(liked_posts::delete),
        )
        .route("/liked-comments", post(liked_comments::create))
        .route(
            "/liked-comments/{id}",
            get(liked_comments::list).delete(liked_comments::delete),
        )
        .route("/shared-posts", post(shared_posts::create))
        .route("/shared-posts/{id}", delete(shared_posts::delete))
        .route(
            "/shared-posts/{id}/posts",
            get(shared_posts::posts_by_account),
        )
        .route(
            "/shared-posts/{id}/accounts",
            get(shared_posts::accounts_by_post),
        )
        .route("/saved-posts", post(saved_posts::create))
        .route(
            "/saved-posts/{id}",
            get(saved_posts::list).delete(saved_posts::delete),
        )
        .route("/chats", post(chats::create))
        .route(
            "/chats/{id}",
            get(chats::list).put(chats::edit).delete(chats::delete),
        )
        .route("/direct-messages", post(direct_messages::create))
        .route(
            "/direct-messages/{id}",
            get(direct_messages::list)
                .put(direct_messages::edit)
                .delete(direct_messages::delete),
        )
        .layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(public)
        .merge(protected)
        .nest_service("/uploads", ServeDir::new(&state.uploads_dir))
        .with_state(state)
}
