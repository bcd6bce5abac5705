//! Post repository.

use std::sync::Arc;

use crate::entities::{Comment, Post, comment, post, post_hashtag};
use crate::entity_ref::EntityKind;
use crate::repositories::reaction::delete_for_entities;
use agora_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, JoinType, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, TransactionTrait,
};

/// Post repository for database operations.
#[derive(Clone)]
pub struct PostRepository {
    db: Arc<DatabaseConnection>,
}

impl PostRepository {
    /// Create a new post repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a post by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<post::Model>> {
        Post::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a post by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: i32) -> AppResult<post::Model> {
        self.find_by_id(id)
            .await?
            .ok_or(AppError::PostNotFound(id))
    }

    /// Find posts by IDs.
    pub async fn find_by_ids(&self, ids: &[i32]) -> AppResult<Vec<post::Model>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        Post::find()
            .filter(post::Column::Id.is_in(ids.iter().copied()))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Check whether a post exists.
    pub async fn exists(&self, id: i32) -> AppResult<bool> {
        let count = Post::find()
            .filter(post::Column::Id.eq(id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(count > 0)
    }

    /// Create a new post.
    pub async fn create(&self, model: post::ActiveModel) -> AppResult<post::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a post.
    pub async fn update(&self, model: post::ActiveModel) -> AppResult<post::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a post together with the reactions on it and on its comments.
    ///
    /// Comments, bookmarks and tag links follow through their foreign keys.
    /// Returns the number of reactions removed.
    pub async fn delete(&self, id: i32) -> AppResult<u64> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let comment_ids: Vec<i32> = Comment::find()
            .select_only()
            .column(comment::Column::Id)
            .filter(comment::Column::PostId.eq(id))
            .into_tuple()
            .all(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let removed = delete_for_entities(&txn, EntityKind::Comment, &comment_ids)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            + delete_for_entities(&txn, EntityKind::Post, &[id])
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;

        Post::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(removed)
    }

    /// Get a page of posts, newest first, optionally restricted to one author or hashtag.
    ///
    /// Returns the page and the total number of matching posts.
    pub async fn find_page(
        &self,
        user_id: Option<i32>,
        hashtag_id: Option<i32>,
        page: u64,
        per_page: u64,
    ) -> AppResult<(Vec<post::Model>, u64)> {
        let mut query = Post::find();

        if let Some(user_id) = user_id {
            query = query.filter(post::Column::UserId.eq(user_id));
        }

        if let Some(hashtag_id) = hashtag_id {
            query = query
                .join(JoinType::InnerJoin, post::Relation::PostHashtag.def())
                .filter(post_hashtag::Column::HashtagId.eq(hashtag_id));
        }

        let paginator = query
            .order_by_desc(post::Column::CreatedAt)
            .order_by_desc(post::Column::Id)
            .paginate(self.db.as_ref(), per_page);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        let posts = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok((posts, total))
    }

    /// Count posts written by a user.
    pub async fn count_by_user(&self, user_id: i32) -> AppResult<u64> {
        Post::find()
            .filter(post::Column::UserId.eq(user_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_post(id: i32, user_id: i32, body: &str) -> post::Model {
        post::Model {
            id,
            user_id,
            body: body.to_string(),
            image_url: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_get_by_id_found() {
        let post = create_test_post(1, 10, "hello");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[post.clone()]])
                .into_connection(),
        );

        let repo = PostRepository::new(db);
        let found = repo.get_by_id(1).await.unwrap();

        assert_eq!(found.body, "hello");
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<post::Model>::new()])
                .into_connection(),
        );

        let repo = PostRepository::new(db);
        let result = repo.get_by_id(99).await;

        assert!(matches!(result, Err(AppError::PostNotFound(99))));
    }

    #[tokio::test]
    async fn test_exists() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(1))
                }]])
                .into_connection(),
        );

        let repo = PostRepository::new(db);
        assert!(repo.exists(1).await.unwrap());
    }
}
