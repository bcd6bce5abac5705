//! API endpoints.

mod comments;
mod hashtags;
mod notifications;
mod posts;
mod reactions;
mod users;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/reactions", reactions::router())
        .nest("/posts", posts::router())
        .nest("/comments", comments::router())
        .nest("/hashtags", hashtags::router())
        .nest("/notifications", notifications::router())
        .nest("/users", users::router())
}
