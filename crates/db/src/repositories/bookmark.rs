//! Bookmark repository.

use std::collections::HashMap;
use std::sync::Arc;

use crate::entities::{Bookmark, bookmark};
use crate::map_write_err;
use agora_common::{AppError, AppResult};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

/// Bookmark repository for database operations.
#[derive(Clone)]
pub struct BookmarkRepository {
    db: Arc<DatabaseConnection>,
}

impl BookmarkRepository {
    /// Create a new bookmark repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a bookmark by user and post.
    pub async fn find_by_user_and_post(
        &self,
        user_id: i32,
        post_id: i32,
    ) -> AppResult<Option<bookmark::Model>> {
        Bookmark::find()
            .filter(bookmark::Column::UserId.eq(user_id))
            .filter(bookmark::Column::PostId.eq(post_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Check if a post is bookmarked by a user.
    pub async fn is_bookmarked(&self, user_id: i32, post_id: i32) -> AppResult<bool> {
        Ok(self.find_by_user_and_post(user_id, post_id).await?.is_some())
    }

    /// Create a new bookmark. A duplicate surfaces as [`AppError::Conflict`].
    pub async fn create(&self, user_id: i32, post_id: i32) -> AppResult<bookmark::Model> {
        let model = bookmark::ActiveModel {
            user_id: Set(user_id),
            post_id: Set(post_id),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };

        model.insert(self.db.as_ref()).await.map_err(map_write_err)
    }

    /// Delete a bookmark by user and post, returning the number of rows removed.
    pub async fn delete_by_user_and_post(&self, user_id: i32, post_id: i32) -> AppResult<u64> {
        let result = Bookmark::delete_many()
            .filter(bookmark::Column::UserId.eq(user_id))
            .filter(bookmark::Column::PostId.eq(post_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected)
    }

    /// Get a page of a user's bookmarks, newest first, with the total count.
    pub async fn find_by_user(
        &self,
        user_id: i32,
        page: u64,
        per_page: u64,
    ) -> AppResult<(Vec<bookmark::Model>, u64)> {
        let paginator = Bookmark::find()
            .filter(bookmark::Column::UserId.eq(user_id))
            .order_by_desc(bookmark::Column::CreatedAt)
            .order_by_desc(bookmark::Column::Id)
            .paginate(self.db.as_ref(), per_page);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        let bookmarks = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok((bookmarks, total))
    }

    /// Count bookmarks on each of the given posts.
    pub async fn count_by_posts(&self, post_ids: &[i32]) -> AppResult<HashMap<i32, u64>> {
        if post_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(i32, i64)> = Bookmark::find()
            .select_only()
            .column(bookmark::Column::PostId)
            .column_as(bookmark::Column::Id.count(), "count")
            .filter(bookmark::Column::PostId.is_in(post_ids.iter().copied()))
            .group_by(bookmark::Column::PostId)
            .into_tuple()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|(post_id, count)| (post_id, count.max(0) as u64))
            .collect())
    }

    /// Count bookmarks made by a user.
    pub async fn count_by_user(&self, user_id: i32) -> AppResult<u64> {
        Bookmark::find()
            .filter(bookmark::Column::UserId.eq(user_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
