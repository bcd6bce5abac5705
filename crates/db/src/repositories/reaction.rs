//! Reaction repository.

use std::collections::HashMap;
use std::sync::Arc;

use crate::entities::{
    Reaction,
    reaction::{self, Vote},
};
use crate::entity_ref::{EntityKind, EntityRef};
use crate::map_write_err;
use agora_common::{AppError, AppResult};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, sea_query::Expr,
};

/// Like and dislike totals for one entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VoteCounts {
    pub likes: u64,
    pub dislikes: u64,
}

impl VoteCounts {
    fn add(&mut self, vote: Vote, count: i64) {
        let count = count.max(0) as u64;
        match vote {
            Vote::Like => self.likes += count,
            Vote::Dislike => self.dislikes += count,
        }
    }
}

/// Remove every reaction on the given entities of one kind.
///
/// Reactions have no foreign key to their target, so whoever deletes a reactable row
/// calls this inside the same transaction.
pub(crate) async fn delete_for_entities<C: ConnectionTrait>(
    db: &C,
    kind: EntityKind,
    ids: &[i32],
) -> Result<u64, DbErr> {
    if ids.is_empty() {
        return Ok(0);
    }

    let result = Reaction::delete_many()
        .filter(reaction::Column::EntityType.eq(kind))
        .filter(reaction::Column::EntityId.is_in(ids.iter().copied()))
        .exec(db)
        .await?;

    Ok(result.rows_affected)
}

/// Reaction repository for database operations.
#[derive(Clone)]
pub struct ReactionRepository {
    db: Arc<DatabaseConnection>,
}

impl ReactionRepository {
    /// Create a new reaction repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find the reaction a user left on an entity.
    pub async fn find_by_user_and_entity(
        &self,
        user_id: i32,
        entity: EntityRef,
    ) -> AppResult<Option<reaction::Model>> {
        Reaction::find()
            .filter(reaction::Column::UserId.eq(user_id))
            .filter(reaction::Column::EntityType.eq(entity.kind))
            .filter(reaction::Column::EntityId.eq(entity.id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a new reaction.
    ///
    /// A concurrent insert for the same `(user, entity)` pair trips the unique index
    /// and surfaces as [`AppError::Conflict`].
    pub async fn create(
        &self,
        user_id: i32,
        entity: EntityRef,
        vote: Vote,
    ) -> AppResult<reaction::Model> {
        let model = reaction::ActiveModel {
            user_id: Set(user_id),
            entity_type: Set(entity.kind),
            entity_id: Set(entity.id),
            vote: Set(vote),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };

        model.insert(self.db.as_ref()).await.map_err(map_write_err)
    }

    /// Delete a reaction, but only if it still holds `expected`.
    ///
    /// Returns the number of rows removed; zero means the row was removed or flipped
    /// by another request.
    pub async fn delete_vote(&self, id: i32, expected: Vote) -> AppResult<u64> {
        let result = Reaction::delete_many()
            .filter(reaction::Column::Id.eq(id))
            .filter(reaction::Column::Vote.eq(expected))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }

    /// Flip a reaction's vote, but only if it still holds `expected`.
    ///
    /// Returns the number of rows changed; zero means another request got there first.
    pub async fn update_vote(&self, id: i32, expected: Vote, vote: Vote) -> AppResult<u64> {
        let result = Reaction::update_many()
            .col_expr(reaction::Column::Vote, Expr::value(vote))
            .filter(reaction::Column::Id.eq(id))
            .filter(reaction::Column::Vote.eq(expected))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }

    /// Count likes and dislikes on one entity with a single grouped query.
    pub async fn count_by_vote(&self, entity: EntityRef) -> AppResult<VoteCounts> {
        let rows: Vec<(Vote, i64)> = Reaction::find()
            .select_only()
            .column(reaction::Column::Vote)
            .column_as(reaction::Column::Id.count(), "count")
            .filter(reaction::Column::EntityType.eq(entity.kind))
            .filter(reaction::Column::EntityId.eq(entity.id))
            .group_by(reaction::Column::Vote)
            .into_tuple()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut counts = VoteCounts::default();
        for (vote, count) in rows {
            counts.add(vote, count);
        }
        Ok(counts)
    }

    /// Count likes and dislikes for many entities of one kind.
    ///
    /// Entities without reactions are absent from the map.
    pub async fn count_by_entities(
        &self,
        kind: EntityKind,
        ids: &[i32],
    ) -> AppResult<HashMap<i32, VoteCounts>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(i32, Vote, i64)> = Reaction::find()
            .select_only()
            .column(reaction::Column::EntityId)
            .column(reaction::Column::Vote)
            .column_as(reaction::Column::Id.count(), "count")
            .filter(reaction::Column::EntityType.eq(kind))
            .filter(reaction::Column::EntityId.is_in(ids.iter().copied()))
            .group_by(reaction::Column::EntityId)
            .group_by(reaction::Column::Vote)
            .into_tuple()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut counts: HashMap<i32, VoteCounts> = HashMap::new();
        for (entity_id, vote, count) in rows {
            counts.entry(entity_id).or_default().add(vote, count);
        }
        Ok(counts)
    }

    /// The votes a user cast on many entities of one kind.
    pub async fn votes_for_user(
        &self,
        user_id: i32,
        kind: EntityKind,
        ids: &[i32],
    ) -> AppResult<HashMap<i32, Vote>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(i32, Vote)> = Reaction::find()
            .select_only()
            .column(reaction::Column::EntityId)
            .column(reaction::Column::Vote)
            .filter(reaction::Column::UserId.eq(user_id))
            .filter(reaction::Column::EntityType.eq(kind))
            .filter(reaction::Column::EntityId.is_in(ids.iter().copied()))
            .into_tuple()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(rows.into_iter().collect())
    }

    /// Count the likes a user has given.
    pub async fn count_likes_by_user(&self, user_id: i32) -> AppResult<u64> {
        Reaction::find()
            .filter(reaction::Column::UserId.eq(user_id))
            .filter(reaction::Column::Vote.eq(Vote::Like))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Every like a user has given, newest first.
    pub async fn find_likes_by_user(&self, user_id: i32) -> AppResult<Vec<reaction::Model>> {
        Reaction::find()
            .filter(reaction::Column::UserId.eq(user_id))
            .filter(reaction::Column::Vote.eq(Vote::Like))
            .order_by_desc(reaction::Column::CreatedAt)
            .order_by_desc(reaction::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
