//! Hashtag service.

use std::collections::HashMap;
use std::sync::LazyLock;

use agora_common::{AppError, AppResult};
use agora_db::repositories::{HashtagRepository, HashtagSort};
use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::pagination::Page;

#[allow(clippy::expect_used)]
static HASHTAG_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{L}\p{N}_]{1,50}$").expect("valid hashtag pattern"));

/// A hashtag and how many posts use it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HashtagSummary {
    pub name: String,
    pub count: u64,
}

/// Hashtag service for business logic.
#[derive(Clone)]
pub struct HashtagService {
    hashtag_repo: HashtagRepository,
}

impl HashtagService {
    /// Create a new hashtag service.
    #[must_use]
    pub const fn new(hashtag_repo: HashtagRepository) -> Self {
        Self { hashtag_repo }
    }

    /// Normalize user supplied tags: trim, strip a leading `#`, lowercase, dedupe.
    ///
    /// Empty entries are skipped; anything else that is not letters, digits or `_`
    /// (up to 50 of them) is rejected.
    pub fn normalize(raw: &[String]) -> AppResult<Vec<String>> {
        let mut names: Vec<String> = Vec::with_capacity(raw.len());

        for tag in raw {
            let name = tag.trim().trim_start_matches('#').to_lowercase();
            if name.is_empty() {
                continue;
            }
            if !HASHTAG_NAME.is_match(&name) {
                return Err(AppError::Validation(format!("Invalid hashtag: {tag}")));
            }
            if !names.contains(&name) {
                names.push(name);
            }
        }

        Ok(names)
    }

    /// Link a post to exactly the given tags, creating tags as needed.
    pub async fn set_post_hashtags(&self, post_id: i32, raw: &[String]) -> AppResult<Vec<String>> {
        let names = Self::normalize(raw)?;

        let mut ids = Vec::with_capacity(names.len());
        for name in &names {
            ids.push(self.hashtag_repo.get_or_create(name).await?.id);
        }

        self.hashtag_repo.set_post_hashtags(post_id, &ids).await?;
        debug!(post_id, hashtags = ?names, "Post hashtags set");

        Ok(names)
    }

    /// Tag names for each of the given posts.
    pub async fn names_for_posts(&self, post_ids: &[i32]) -> AppResult<HashMap<i32, Vec<String>>> {
        self.hashtag_repo.names_for_posts(post_ids).await
    }

    /// Look up a tag's ID by (unnormalized) name.
    pub async fn find_id(&self, raw: &str) -> AppResult<Option<i32>> {
        let name = raw.trim().trim_start_matches('#').to_lowercase();
        if name.is_empty() {
            return Ok(None);
        }
        Ok(self.hashtag_repo.find_by_name(&name).await?.map(|t| t.id))
    }

    /// List hashtags with usage counts.
    pub async fn list_hashtags(
        &self,
        sort: HashtagSort,
        search: Option<&str>,
        page: u64,
        per_page: u64,
    ) -> AppResult<Page<HashtagSummary>> {
        let (items, total) = self
            .hashtag_repo
            .list_with_counts(sort, search, page, per_page)
            .await?;

        Ok(Page::new(items, total, page, per_page).map(|tag| HashtagSummary {
            name: tag.name,
            count: tag.count.max(0) as u64,
        }))
    }
}
