//! Comments endpoints.

use agora_common::AppResult;
use agora_core::CommentView;
use axum::{
    Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
};

use crate::{
    extractors::{AuthUser, MaybeAuthUser},
    middleware::AppState,
    response::{ApiResponse, no_content},
};

async fn show(
    viewer: MaybeAuthUser,
    State(state): State<AppState>,
    Path(comment_id): Path<i32>,
) -> AppResult<ApiResponse<CommentView>> {
    let comment = state
        .comment_service
        .get_comment(comment_id, viewer.id())
        .await?;
    Ok(ApiResponse::ok(comment))
}

async fn delete(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(comment_id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    state
        .comment_service
        .delete_comment(user.id, comment_id)
        .await?;
    Ok(no_content())
}

/// The comments leading from the thread root down to this one.
async fn thread(
    viewer: MaybeAuthUser,
    State(state): State<AppState>,
    Path(comment_id): Path<i32>,
) -> AppResult<ApiResponse<Vec<CommentView>>> {
    let chain = state
        .comment_service
        .thread(comment_id, viewer.id())
        .await?;
    Ok(ApiResponse::ok(chain))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(show).delete(delete))
        .route("/{id}/thread", get(thread))
}
