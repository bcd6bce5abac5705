//! Comment repository.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::entities::{Comment, comment};
use crate::entity_ref::EntityKind;
use crate::repositories::reaction::delete_for_entities;
use agora_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, TransactionTrait,
};

/// Comment repository for database operations.
#[derive(Clone)]
pub struct CommentRepository {
    db: Arc<DatabaseConnection>,
}

impl CommentRepository {
    /// Create a new comment repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a comment by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<comment::Model>> {
        Comment::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a comment by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: i32) -> AppResult<comment::Model> {
        self.find_by_id(id)
            .await?
            .ok_or(AppError::CommentNotFound(id))
    }

    /// Check whether a comment exists.
    pub async fn exists(&self, id: i32) -> AppResult<bool> {
        let count = Comment::find()
            .filter(comment::Column::Id.eq(id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(count > 0)
    }

    /// Find comments by IDs.
    pub async fn find_by_ids(&self, ids: &[i32]) -> AppResult<Vec<comment::Model>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        Comment::find()
            .filter(comment::Column::Id.is_in(ids.iter().copied()))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// All comments of a post in display order: oldest first, ties broken by ID.
    pub async fn find_by_post(&self, post_id: i32) -> AppResult<Vec<comment::Model>> {
        Comment::find()
            .filter(comment::Column::PostId.eq(post_id))
            .order_by_asc(comment::Column::CreatedAt)
            .order_by_asc(comment::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new comment.
    pub async fn create(&self, model: comment::ActiveModel) -> AppResult<comment::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a comment together with the reactions on it and on its replies.
    ///
    /// Replies go through the cascading foreign key. Returns the number of reactions
    /// removed.
    pub async fn delete(&self, id: i32) -> AppResult<u64> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        // Walk the reply subtree level by level.
        let mut seen: HashSet<i32> = HashSet::from([id]);
        let mut subtree = vec![id];
        let mut frontier = vec![id];
        while !frontier.is_empty() {
            let children: Vec<i32> = Comment::find()
                .select_only()
                .column(comment::Column::Id)
                .filter(comment::Column::ParentCommentId.is_in(frontier))
                .into_tuple()
                .all(&txn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;

            frontier = children.into_iter().filter(|c| seen.insert(*c)).collect();
            subtree.extend_from_slice(&frontier);
        }

        let removed = delete_for_entities(&txn, EntityKind::Comment, &subtree)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Comment::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(removed)
    }

    /// Count comments on each of the given posts.
    pub async fn count_by_posts(&self, post_ids: &[i32]) -> AppResult<HashMap<i32, u64>> {
        if post_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(i32, i64)> = Comment::find()
            .select_only()
            .column(comment::Column::PostId)
            .column_as(comment::Column::Id.count(), "count")
            .filter(comment::Column::PostId.is_in(post_ids.iter().copied()))
            .group_by(comment::Column::PostId)
            .into_tuple()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|(post_id, count)| (post_id, count.max(0) as u64))
            .collect())
    }

    /// Count direct replies to each of the given comments.
    pub async fn count_replies(&self, comment_ids: &[i32]) -> AppResult<HashMap<i32, u64>> {
        if comment_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(Option<i32>, i64)> = Comment::find()
            .select_only()
            .column(comment::Column::ParentCommentId)
            .column_as(comment::Column::Id.count(), "count")
            .filter(comment::Column::ParentCommentId.is_in(comment_ids.iter().copied()))
            .group_by(comment::Column::ParentCommentId)
            .into_tuple()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(rows
            .into_iter()
            .filter_map(|(parent, count)| parent.map(|p| (p, count.max(0) as u64)))
            .collect())
    }

    /// Count comments written by a user.
    pub async fn count_by_user(&self, user_id: i32) -> AppResult<u64> {
        Comment::find()
            .filter(comment::Column::UserId.eq(user_id))
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

    fn create_test_comment(id: i32, post_id: i32, parent: Option<i32>) -> comment::Model {
        comment::Model {
            id,
            user_id: 1,
            post_id,
            body: format!("comment {id}"),
            parent_comment_id: parent,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_by_post() {
        let c1 = create_test_comment(1, 7, None);
        let c2 = create_test_comment(2, 7, Some(1));

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[c1, c2]])
                .into_connection(),
        );

        let repo = CommentRepository::new(db);
        let comments = repo.find_by_post(7).await.unwrap();

        assert_eq!(comments.len(), 2);
        assert_eq!(comments[1].parent_comment_id, Some(1));
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<comment::Model>::new()])
                .into_connection(),
        );

        let repo = CommentRepository::new(db);
        let result = repo.get_by_id(3).await;

        assert!(matches!(result, Err(AppError::CommentNotFound(3))));
    }

    #[tokio::test]
    async fn test_count_by_posts_empty() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let repo = CommentRepository::new(db);
        assert!(repo.count_by_posts(&[]).await.unwrap().is_empty());
        assert!(repo.count_replies(&[]).await.unwrap().is_empty());
    }
}
