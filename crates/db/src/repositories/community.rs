//! Community repository.

use std::collections::HashMap;
use std::sync::Arc;

use crate::entities::{
    Community, CommunityMember, community,
    community_member::{self, MemberRole},
};
use agora_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QuerySelect,
};

/// Community repository for database operations.
#[derive(Clone)]
pub struct CommunityRepository {
    db: Arc<DatabaseConnection>,
}

impl CommunityRepository {
    /// Create a new community repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Check whether a community exists.
    pub async fn exists(&self, id: i32) -> AppResult<bool> {
        let count = Community::find()
            .filter(community::Column::Id.eq(id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(count > 0)
    }

    /// Find communities by IDs.
    pub async fn find_by_ids(&self, ids: &[i32]) -> AppResult<Vec<community::Model>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        Community::find()
            .filter(community::Column::Id.is_in(ids.iter().copied()))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new community.
    pub async fn create(&self, model: community::ActiveModel) -> AppResult<community::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(crate::map_write_err)
    }

    /// Add a member to a community.
    pub async fn add_member(
        &self,
        model: community_member::ActiveModel,
    ) -> AppResult<community_member::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(crate::map_write_err)
    }

    /// Communities a user belongs to, with the user's role in each.
    pub async fn memberships_of(
        &self,
        user_id: i32,
    ) -> AppResult<Vec<(community::Model, MemberRole)>> {
        let rows: Vec<(i32, MemberRole)> = CommunityMember::find()
            .select_only()
            .column(community_member::Column::CommunityId)
            .column(community_member::Column::Role)
            .filter(community_member::Column::UserId.eq(user_id))
            .into_tuple()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let ids: Vec<i32> = rows.iter().map(|(id, _)| *id).collect();
        let communities: HashMap<i32, community::Model> = self
            .find_by_ids(&ids)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        Ok(rows
            .into_iter()
            .filter_map(|(id, role)| communities.get(&id).cloned().map(|c| (c, role)))
            .collect())
    }

    /// Member counts for each of the given communities.
    pub async fn member_counts(&self, community_ids: &[i32]) -> AppResult<HashMap<i32, u64>> {
        if community_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(i32, i64)> = CommunityMember::find()
            .select_only()
            .column(community_member::Column::CommunityId)
            .column_as(community_member::Column::UserId.count(), "count")
            .filter(community_member::Column::CommunityId.is_in(community_ids.iter().copied()))
            .group_by(community_member::Column::CommunityId)
            .into_tuple()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|(id, count)| (id, count.max(0) as u64))
            .collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_exists_true() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(1))
                }]])
                .into_connection(),
        );

        let repo = CommunityRepository::new(db);
        assert!(repo.exists(1).await.unwrap());
    }

    #[tokio::test]
    async fn test_member_counts_empty() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let repo = CommunityRepository::new(db);
        assert!(repo.member_counts(&[]).await.unwrap().is_empty());
    }
}
