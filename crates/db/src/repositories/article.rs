//! Article repository.

use std::sync::Arc;

use crate::entities::{Article, article};
use agora_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
};

/// Article repository for database operations.
#[derive(Clone)]
pub struct ArticleRepository {
    db: Arc<DatabaseConnection>,
}

impl ArticleRepository {
    /// Create a new article repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Check whether an article exists.
    pub async fn exists(&self, id: i32) -> AppResult<bool> {
        let count = Article::find()
            .filter(article::Column::Id.eq(id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(count > 0)
    }

    /// Find articles by IDs.
    pub async fn find_by_ids(&self, ids: &[i32]) -> AppResult<Vec<article::Model>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        Article::find()
            .filter(article::Column::Id.is_in(ids.iter().copied()))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new article.
    pub async fn create(&self, model: article::ActiveModel) -> AppResult<article::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
