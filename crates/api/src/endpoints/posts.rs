//! Posts endpoints.

use agora_common::AppResult;
use agora_core::{
    CommentNode, CommentView, CreateCommentInput, CreatePostInput, Page, PostDetail,
    PostSummary, UpdatePostInput,
};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;

use crate::{
    extractors::{AuthUser, MaybeAuthUser, PageParams},
    middleware::AppState,
    response::{ApiResponse, Message, no_content},
};

/// Feed query.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPostsQuery {
    pub hashtag: Option<String>,
    pub page: Option<u64>,
    #[serde(alias = "perPage")]
    pub limit: Option<u64>,
}

/// Newest posts, optionally filtered by hashtag.
async fn list(
    viewer: MaybeAuthUser,
    State(state): State<AppState>,
    Query(query): Query<ListPostsQuery>,
) -> AppResult<ApiResponse<Page<PostSummary>>> {
    let per_page = state.api.page_size(query.limit);
    let page_number = query.page.unwrap_or(1).max(1);
    let hashtag = query.hashtag.as_deref().filter(|h| !h.trim().is_empty());

    let page = state
        .post_service
        .list_posts(hashtag, page_number, per_page, viewer.id())
        .await?;

    Ok(ApiResponse::ok(page))
}

/// Publish a post.
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreatePostInput>,
) -> AppResult<ApiResponse<PostSummary>> {
    let post = state.post_service.create_post(&user, input).await?;
    Ok(ApiResponse::created(post))
}

/// A post with its comment tree.
async fn show(
    viewer: MaybeAuthUser,
    State(state): State<AppState>,
    Path(post_id): Path<i32>,
) -> AppResult<ApiResponse<PostDetail>> {
    let detail = state.post_service.get_post(post_id, viewer.id()).await?;
    Ok(ApiResponse::ok(detail))
}

/// Edit a post.
async fn update(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(post_id): Path<i32>,
    Json(input): Json<UpdatePostInput>,
) -> AppResult<ApiResponse<PostSummary>> {
    let post = state
        .post_service
        .update_post(user.id, post_id, input)
        .await?;
    Ok(ApiResponse::ok(post))
}

/// Delete a post.
async fn delete(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(post_id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    state.post_service.delete_post(user.id, post_id).await?;
    Ok(no_content())
}

/// Posts by one user.
async fn by_user(
    viewer: MaybeAuthUser,
    State(state): State<AppState>,
    Path(username): Path<String>,
    Query(paging): Query<PageParams>,
) -> AppResult<ApiResponse<Page<PostSummary>>> {
    let per_page = state.api.page_size(paging.per_page);
    let page = state
        .post_service
        .list_user_posts(&username, paging.page(), per_page, viewer.id())
        .await?;
    Ok(ApiResponse::ok(page))
}

async fn bookmark(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(post_id): Path<i32>,
) -> AppResult<ApiResponse<Message>> {
    state.bookmark_service.bookmark(user.id, post_id).await?;
    Ok(ApiResponse::created(Message::new("Post bookmarked")))
}

async fn unbookmark(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(post_id): Path<i32>,
) -> AppResult<ApiResponse<Message>> {
    state.bookmark_service.unbookmark(user.id, post_id).await?;
    Ok(ApiResponse::ok(Message::new("Bookmark removed")))
}

/// The post's comments as a tree.
async fn comments(
    viewer: MaybeAuthUser,
    State(state): State<AppState>,
    Path(post_id): Path<i32>,
) -> AppResult<ApiResponse<Vec<CommentNode<CommentView>>>> {
    let tree = state
        .comment_service
        .comment_tree(post_id, viewer.id())
        .await?;
    Ok(ApiResponse::ok(tree))
}

/// Comment on the post.
async fn add_comment(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(post_id): Path<i32>,
    Json(input): Json<CreateCommentInput>,
) -> AppResult<ApiResponse<CommentView>> {
    let comment = state
        .comment_service
        .create_comment(&user, post_id, input)
        .await?;
    Ok(ApiResponse::created(comment))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/user/{username}", get(by_user))
        .route("/{id}", get(show).put(update).delete(delete))
        .route("/{id}/bookmark", post(bookmark).delete(unbookmark))
        .route("/{id}/comments", get(comments).post(add_comment))
}
