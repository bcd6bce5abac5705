//! Hashtag endpoints.

use agora_common::AppResult;
use agora_core::{HashtagSummary, Page};
use agora_db::repositories::HashtagSort;
use axum::{
    Router,
    extract::{Query, State},
    routing::get,
};
use serde::Deserialize;

use crate::{middleware::AppState, response::ApiResponse};

/// Hashtag listing query.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListHashtagsQuery {
    /// `popular` (default), `recent` or `alphabetical`
    pub sort: Option<String>,
    pub search: Option<String>,
    pub page: Option<u64>,
    #[serde(alias = "limit")]
    pub per_page: Option<u64>,
}

/// Hashtags with their post counts.
async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListHashtagsQuery>,
) -> AppResult<ApiResponse<Page<HashtagSummary>>> {
    let sort = match query.sort.as_deref() {
        Some(raw) => raw.parse::<HashtagSort>()?,
        None => HashtagSort::default(),
    };
    let per_page = state.api.page_size(query.per_page);

    let page = state
        .hashtag_service
        .list_hashtags(
            sort,
            query.search.as_deref(),
            query.page.unwrap_or(1).max(1),
            per_page,
        )
        .await?;

    Ok(ApiResponse::ok(page))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list))
}
