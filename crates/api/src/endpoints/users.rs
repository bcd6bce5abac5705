//! User endpoints.

use agora_common::AppResult;
use agora_core::{CommunitySummary, FavoriteItem, Page, PostSummary, UserProfile};
use axum::{
    Router,
    extract::{Query, State},
    routing::get,
};

use crate::{
    extractors::{AuthUser, PageParams},
    middleware::AppState,
    response::ApiResponse,
};

/// The caller's profile with activity stats.
async fn me(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<UserProfile>> {
    let profile = state.user_service.get_me(&user).await?;
    Ok(ApiResponse::ok(profile))
}

async fn communities(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<CommunitySummary>>> {
    let communities = state.community_service.my_communities(user.id).await?;
    Ok(ApiResponse::ok(communities))
}

async fn favorites(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<FavoriteItem>>> {
    let favorites = state.favorite_service.list_favorites(user.id).await?;
    Ok(ApiResponse::ok(favorites))
}

/// Bookmarked posts, most recently bookmarked first.
async fn bookmarks(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(paging): Query<PageParams>,
) -> AppResult<ApiResponse<Page<PostSummary>>> {
    let per_page = state.api.page_size(paging.per_page);
    let bookmarks = state
        .bookmark_service
        .list_bookmarks(user.id, paging.page(), per_page)
        .await?;

    let post_ids: Vec<i32> = bookmarks.items.iter().map(|b| b.post_id).collect();
    let posts = state
        .post_service
        .summaries_by_ids(&post_ids, Some(user.id))
        .await?;

    Ok(ApiResponse::ok(Page::new(
        posts,
        bookmarks.total,
        bookmarks.page,
        bookmarks.per_page,
    )))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(me))
        .route("/me/communities", get(communities))
        .route("/me/favorites", get(favorites))
        .route("/me/bookmarks", get(bookmarks))
}
