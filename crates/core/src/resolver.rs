//! Entity resolution for polymorphic references.
//!
//! The reaction engine only needs to know whether an [`EntityRef`] points at a live
//! row. [`RepositoryResolver`] answers that with an explicit table from kind to
//! repository lookup.

use std::sync::Arc;

use agora_common::AppResult;
use agora_db::{
    EntityKind, EntityRef,
    repositories::{ArticleRepository, CommentRepository, CommunityRepository, PostRepository},
};
use async_trait::async_trait;

/// Checks that a referenced entity exists.
#[async_trait]
pub trait EntityResolver: Send + Sync {
    /// Whether the row named by `entity` exists.
    async fn exists(&self, entity: EntityRef) -> AppResult<bool>;
}

/// Shared resolver handle.
pub type SharedResolver = Arc<dyn EntityResolver>;

/// Resolver backed by the entity repositories.
#[derive(Clone)]
pub struct RepositoryResolver {
    post_repo: PostRepository,
    article_repo: ArticleRepository,
    community_repo: CommunityRepository,
    comment_repo: CommentRepository,
}

impl RepositoryResolver {
    /// Create a new repository resolver.
    #[must_use]
    pub const fn new(
        post_repo: PostRepository,
        article_repo: ArticleRepository,
        community_repo: CommunityRepository,
        comment_repo: CommentRepository,
    ) -> Self {
        Self {
            post_repo,
            article_repo,
            community_repo,
            comment_repo,
        }
    }

    /// Wrap into a shared handle.
    #[must_use]
    pub fn shared(self) -> SharedResolver {
        Arc::new(self)
    }
}

#[async_trait]
impl EntityResolver for RepositoryResolver {
    async fn exists(&self, entity: EntityRef) -> AppResult<bool> {
        match entity.kind {
            EntityKind::Post => self.post_repo.exists(entity.id).await,
            EntityKind::Article => self.article_repo.exists(entity.id).await,
            EntityKind::Community => self.community_repo.exists(entity.id).await,
            EntityKind::Comment => self.comment_repo.exists(entity.id).await,
        }
    }
}
