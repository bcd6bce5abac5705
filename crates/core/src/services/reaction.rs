//! Reaction service.
//!
//! Likes and dislikes on any reactable entity. A user holds at most one reaction per
//! entity: voting again with the same vote takes it back, voting the other way flips
//! it in place.

use std::collections::HashMap;

use crate::resolver::SharedResolver;
use agora_common::{AppError, AppResult};
use agora_db::{
    EntityKind, EntityRef,
    entities::reaction::{self, Vote},
    repositories::ReactionRepository,
};
use serde::Serialize;
use tracing::{debug, warn};

/// What a submitted vote did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionStatus {
    Added,
    Removed,
    Updated,
}

impl ReactionStatus {
    /// Human readable confirmation.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Added => "Reaction added",
            Self::Removed => "Reaction removed",
            Self::Updated => "Reaction updated",
        }
    }
}

/// Result of [`ReactionService::submit_reaction`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionOutcome {
    pub status: ReactionStatus,
    /// The reaction as it now stands; `None` once removed.
    pub reaction: Option<reaction::Model>,
}

/// Vote totals for one entity, plus the viewer's own vote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionCounts {
    pub likes: u64,
    pub dislikes: u64,
    pub viewer_vote: Option<Vote>,
}

/// Reaction service for business logic.
#[derive(Clone)]
pub struct ReactionService {
    reaction_repo: ReactionRepository,
    resolver: SharedResolver,
}

impl ReactionService {
    /// Create a new reaction service.
    #[must_use]
    pub fn new(reaction_repo: ReactionRepository, resolver: SharedResolver) -> Self {
        Self {
            reaction_repo,
            resolver,
        }
    }

    /// Add, remove or flip a user's vote on an entity.
    ///
    /// The unique `(user, entity)` index arbitrates between concurrent requests. If
    /// another writer slips in between our read and our write, the whole decision is
    /// made once more against fresh state; a second collision is reported as
    /// [`AppError::Conflict`].
    pub async fn submit_reaction(
        &self,
        user_id: i32,
        entity: EntityRef,
        vote: Vote,
    ) -> AppResult<ReactionOutcome> {
        self.ensure_exists(entity).await?;

        match self.apply(user_id, entity, vote).await {
            Err(AppError::Conflict(detail)) => {
                warn!(user_id, %entity, %detail, "Reaction changed concurrently, retrying");
                self.apply(user_id, entity, vote).await
            }
            result => result,
        }
    }

    async fn apply(&self, user_id: i32, entity: EntityRef, vote: Vote) -> AppResult<ReactionOutcome> {
        let existing = self
            .reaction_repo
            .find_by_user_and_entity(user_id, entity)
            .await?;

        match existing {
            None => {
                let created = self.reaction_repo.create(user_id, entity, vote).await?;
                debug!(user_id, %entity, ?vote, reaction_id = created.id, "Reaction added");
                Ok(ReactionOutcome {
                    status: ReactionStatus::Added,
                    reaction: Some(created),
                })
            }
            Some(current) if current.vote == vote => {
                if self.reaction_repo.delete_vote(current.id, vote).await? == 0 {
                    return Err(Self::raced(entity));
                }
                debug!(user_id, %entity, ?vote, reaction_id = current.id, "Reaction removed");
                Ok(ReactionOutcome {
                    status: ReactionStatus::Removed,
                    reaction: None,
                })
            }
            Some(mut current) => {
                let changed = self
                    .reaction_repo
                    .update_vote(current.id, current.vote, vote)
                    .await?;
                if changed == 0 {
                    return Err(Self::raced(entity));
                }
                debug!(user_id, %entity, ?vote, reaction_id = current.id, "Reaction updated");
                current.vote = vote;
                Ok(ReactionOutcome {
                    status: ReactionStatus::Updated,
                    reaction: Some(current),
                })
            }
        }
    }

    fn raced(entity: EntityRef) -> AppError {
        AppError::Conflict(format!("Reaction on {entity} was changed by another request"))
    }

    async fn ensure_exists(&self, entity: EntityRef) -> AppResult<()> {
        if self.resolver.exists(entity).await? {
            Ok(())
        } else {
            Err(AppError::NotFound(format!("{} {} not found", entity.kind, entity.id)))
        }
    }

    /// Like and dislike totals for an entity, with the viewer's vote when known.
    pub async fn get_reaction_counts(
        &self,
        entity: EntityRef,
        viewer_id: Option<i32>,
    ) -> AppResult<ReactionCounts> {
        self.ensure_exists(entity).await?;

        let counts = self.reaction_repo.count_by_vote(entity).await?;
        let viewer_vote = match viewer_id {
            Some(user_id) => self
                .reaction_repo
                .find_by_user_and_entity(user_id, entity)
                .await?
                .map(|r| r.vote),
            None => None,
        };

        Ok(ReactionCounts {
            likes: counts.likes,
            dislikes: counts.dislikes,
            viewer_vote,
        })
    }

    /// Totals and viewer votes for many entities of one kind, in two grouped queries.
    ///
    /// Every requested ID is present in the result, with zero counts if unreacted.
    pub async fn counts_for(
        &self,
        kind: EntityKind,
        ids: &[i32],
        viewer_id: Option<i32>,
    ) -> AppResult<HashMap<i32, ReactionCounts>> {
        let totals = self.reaction_repo.count_by_entities(kind, ids).await?;
        let votes = match viewer_id {
            Some(user_id) => self.reaction_repo.votes_for_user(user_id, kind, ids).await?,
            None => HashMap::new(),
        };

        Ok(ids
            .iter()
            .map(|&id| {
                let total = totals.get(&id).copied().unwrap_or_default();
                (
                    id,
                    ReactionCounts {
                        likes: total.likes,
                        dislikes: total.dislikes,
                        viewer_vote: votes.get(&id).copied(),
                    },
                )
            })
            .collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::resolver::EntityResolver;
    use async_trait::async_trait;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
    use std::sync::Arc;

    struct FixedResolver(bool);

    #[async_trait]
    impl EntityResolver for FixedResolver {
        async fn exists(&self, _entity: EntityRef) -> AppResult<bool> {
            Ok(self.0)
        }
    }

    fn create_test_reaction(id: i32, user_id: i32, vote: Vote) -> reaction::Model {
        reaction::Model {
            id,
            user_id,
            entity_type: EntityKind::Post,
            entity_id: 1,
            vote,
            created_at: Utc::now().into(),
        }
    }

    fn service(db: DatabaseConnection, exists: bool) -> ReactionService {
        ReactionService::new(
            ReactionRepository::new(Arc::new(db)),
            Arc::new(FixedResolver(exists)),
        )
    }

    fn exec(rows_affected: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected,
        }
    }

    #[tokio::test]
    async fn test_missing_entity_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let result = service(db, false)
            .submit_reaction(1, EntityRef::post(1), Vote::Like)
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_first_vote_is_added() {
        let created = create_test_reaction(7, 1, Vote::Like);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<reaction::Model>::new()])
            .append_query_results([[created.clone()]])
            .into_connection();

        let outcome = service(db, true)
            .submit_reaction(1, EntityRef::post(1), Vote::Like)
            .await
            .unwrap();

        assert_eq!(outcome.status, ReactionStatus::Added);
        assert_eq!(outcome.reaction.unwrap().id, 7);
    }

    #[tokio::test]
    async fn test_same_vote_is_removed() {
        let existing = create_test_reaction(7, 1, Vote::Like);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[existing]])
            .append_exec_results([exec(1)])
            .into_connection();

        let outcome = service(db, true)
            .submit_reaction(1, EntityRef::post(1), Vote::Like)
            .await
            .unwrap();

        assert_eq!(outcome.status, ReactionStatus::Removed);
        assert!(outcome.reaction.is_none());
    }

    #[tokio::test]
    async fn test_opposite_vote_keeps_identity() {
        let existing = create_test_reaction(7, 1, Vote::Like);
        let created_at = existing.created_at;
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[existing]])
            .append_exec_results([exec(1)])
            .into_connection();

        let outcome = service(db, true)
            .submit_reaction(1, EntityRef::post(1), Vote::Dislike)
            .await
            .unwrap();

        assert_eq!(outcome.status, ReactionStatus::Updated);
        let reaction = outcome.reaction.unwrap();
        assert_eq!(reaction.id, 7);
        assert_eq!(reaction.vote, Vote::Dislike);
        assert_eq!(reaction.created_at, created_at);
    }

    #[tokio::test]
    async fn test_lost_delete_is_retried_once() {
        // First pass: the row we saw is already gone when we delete it.
        // Second pass: nothing left, so the vote is added.
        let existing = create_test_reaction(7, 1, Vote::Like);
        let created = create_test_reaction(8, 1, Vote::Like);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[existing]])
            .append_exec_results([exec(0)])
            .append_query_results([Vec::<reaction::Model>::new()])
            .append_query_results([[created]])
            .into_connection();

        let outcome = service(db, true)
            .submit_reaction(1, EntityRef::post(1), Vote::Like)
            .await
            .unwrap();

        assert_eq!(outcome.status, ReactionStatus::Added);
    }

    #[tokio::test]
    async fn test_take_back_after_concurrent_flip_is_redecided() {
        // We saw a like and went to take it back, but it had become a dislike.
        // The guarded delete misses, and the retry flips the dislike back.
        let seen = create_test_reaction(7, 1, Vote::Like);
        let flipped = create_test_reaction(7, 1, Vote::Dislike);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[seen]])
            .append_exec_results([exec(0)])
            .append_query_results([[flipped]])
            .append_exec_results([exec(1)])
            .into_connection();

        let outcome = service(db, true)
            .submit_reaction(1, EntityRef::post(1), Vote::Like)
            .await
            .unwrap();

        assert_eq!(outcome.status, ReactionStatus::Updated);
        let reaction = outcome.reaction.unwrap();
        assert_eq!(reaction.id, 7);
        assert_eq!(reaction.vote, Vote::Like);
    }

    #[tokio::test]
    async fn test_second_collision_is_conflict() {
        let existing = create_test_reaction(7, 1, Vote::Like);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[existing.clone()]])
            .append_exec_results([exec(0)])
            .append_query_results([[existing]])
            .append_exec_results([exec(0)])
            .into_connection();

        let result = service(db, true)
            .submit_reaction(1, EntityRef::post(1), Vote::Dislike)
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[test]
    fn test_status_messages() {
        assert_eq!(ReactionStatus::Added.message(), "Reaction added");
        assert_eq!(ReactionStatus::Removed.message(), "Reaction removed");
        assert_eq!(ReactionStatus::Updated.message(), "Reaction updated");
    }
}
