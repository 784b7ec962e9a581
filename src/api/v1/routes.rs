/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - public routes and bearer-protected routes are built separately, then merged;
 *   the same path may carry a public GET and a protected POST/PUT/DELETE
 */
use axum::{
    Router,
    routing::{get, patch, post, put},
};

use crate::api::v1::handlers::{
    follows::{follow, list_followers, list_following, unfollow},
    health::health,
    notifications::{list_notifications, mark_all_read, mark_notification_read, update_notification},
    posts::{create_post, delete_post, get_post, list_posts, update_post},
    profiles::{check_username, create_profile, get_own_profile, get_profile_by_username, update_profile},
    search::search_users,
    timeline::timeline,
};
use crate::error::AppError;
use crate::middleware;
use crate::state::AppState;

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/check-username", get(check_username))
        .route("/followers", get(list_followers))
        .route("/following", get(list_following))
        .route("/profiles/{username}", get(get_profile_by_username))
        .route("/posts", get(list_posts))
        .route("/posts/{post_id}", get(get_post))
        .route("/search-users", get(search_users))
}

fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/follow", post(follow).delete(unfollow))
        .route(
            "/profile",
            get(get_own_profile).post(create_profile).put(update_profile),
        )
        .route("/posts", post(create_post))
        .route("/posts/{post_id}", put(update_post).delete(delete_post))
        .route("/timeline", get(timeline))
        .route("/notifications", get(list_notifications))
        .route("/notifications/{notification_id}", patch(update_notification))
        .route(
            "/notifications/{notification_id}/read",
            post(mark_notification_read),
        )
        .route("/mark-notifications-as-read", post(mark_all_read))
}

async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

pub fn routes(state: AppState) -> Router<AppState> {
    let protected = middleware::auth::access::apply(protected_routes(), state);
    // On shared paths the merged method router keeps the last router's fallback;
    // merging public last keeps the auth layer off it. The explicit fallback then
    // answers 405 with the JSON error body on every path.
    protected
        .merge(public_routes())
        .method_not_allowed_fallback(method_not_allowed)
}
