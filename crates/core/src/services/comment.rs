//! Comment service.

use std::collections::{HashMap, HashSet};

use crate::services::excerpt;
use crate::services::notification::{NewNotification, NotificationService};
use crate::services::reaction::{ReactionCounts, ReactionService};
use crate::thread::{AncestorWalk, CommentNode, ThreadItem, build_tree};
use agora_common::{AppError, AppResult};
use agora_db::{
    EntityKind,
    entities::{comment, notification::NotificationType, post, reaction::Vote, user},
    repositories::{CommentRepository, PostRepository, UserRepository},
};
use chrono::Utc;
use sea_orm::{Set, prelude::DateTimeWithTimeZone};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use validator::Validate;

/// Input for creating a comment.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentInput {
    #[validate(length(min = 1, max = 200))]
    pub body: String,

    pub parent_comment_id: Option<i32>,
}

/// A comment as shown to a viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub id: i32,
    pub post_id: i32,
    pub user_id: i32,
    pub username: String,
    pub body: String,
    pub parent_comment_id: Option<i32>,
    pub created_at: DateTimeWithTimeZone,
    pub likes: u64,
    pub dislikes: u64,
    pub viewer_vote: Option<Vote>,
    pub reply_count: u64,
}

impl CommentView {
    fn new(model: comment::Model, username: String, counts: ReactionCounts, reply_count: u64) -> Self {
        Self {
            id: model.id,
            post_id: model.post_id,
            user_id: model.user_id,
            username,
            body: model.body,
            parent_comment_id: model.parent_comment_id,
            created_at: model.created_at,
            likes: counts.likes,
            dislikes: counts.dislikes,
            viewer_vote: counts.viewer_vote,
            reply_count,
        }
    }
}

impl ThreadItem for CommentView {
    fn id(&self) -> i32 {
        self.id
    }

    fn parent_id(&self) -> Option<i32> {
        self.parent_comment_id
    }
}

/// Comment service for business logic.
#[derive(Clone)]
pub struct CommentService {
    comment_repo: CommentRepository,
    post_repo: PostRepository,
    user_repo: UserRepository,
    reactions: ReactionService,
    notifications: NotificationService,
}

impl CommentService {
    /// Create a new comment service.
    #[must_use]
    pub const fn new(
        comment_repo: CommentRepository,
        post_repo: PostRepository,
        user_repo: UserRepository,
        reactions: ReactionService,
        notifications: NotificationService,
    ) -> Self {
        Self {
            comment_repo,
            post_repo,
            user_repo,
            reactions,
            notifications,
        }
    }

    /// Comment on a post, optionally as a reply to another of its comments.
    pub async fn create_comment(
        &self,
        author: &user::Model,
        post_id: i32,
        input: CreateCommentInput,
    ) -> AppResult<CommentView> {
        input.validate()?;

        let body = input.body.trim();
        if body.is_empty() {
            return Err(AppError::Validation("Comment body must not be blank".to_string()));
        }

        let post = self.post_repo.get_by_id(post_id).await?;

        let parent = match input.parent_comment_id {
            Some(parent_id) => {
                let parent = self.comment_repo.get_by_id(parent_id).await?;
                if parent.post_id != post_id {
                    return Err(AppError::Validation(format!(
                        "Comment {parent_id} belongs to a different post"
                    )));
                }
                Some(parent)
            }
            None => None,
        };

        let model = comment::ActiveModel {
            user_id: Set(author.id),
            post_id: Set(post_id),
            body: Set(body.to_string()),
            parent_comment_id: Set(input.parent_comment_id),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };

        let created = self.comment_repo.create(model).await?;
        debug!(
            comment_id = created.id,
            post_id,
            parent_comment_id = ?created.parent_comment_id,
            "Comment created"
        );

        self.notify_participants(author, &post, parent.as_ref(), &created)
            .await;

        Ok(CommentView::new(
            created,
            author.username.clone(),
            ReactionCounts::default(),
            0,
        ))
    }

    /// Tell the parent's author and the post's author about a new comment, once each,
    /// and never the commenter themselves.
    async fn notify_participants(
        &self,
        author: &user::Model,
        post: &post::Model,
        parent: Option<&comment::Model>,
        created: &comment::Model,
    ) {
        let mut notified = HashSet::from([author.id]);
        let mut pending = Vec::new();
        let link = format!("/posts/{}#comment-{}", post.id, created.id);

        if let Some(parent) = parent {
            if notified.insert(parent.user_id) {
                pending.push(NewNotification {
                    user_id: parent.user_id,
                    actor_id: Some(author.id),
                    notification_type: NotificationType::Reply,
                    message: format!("{} replied to your comment", author.username),
                    content: Some(excerpt(&created.body, 100)),
                    link: Some(link.clone()),
                });
            }
        }

        if notified.insert(post.user_id) {
            pending.push(NewNotification {
                user_id: post.user_id,
                actor_id: Some(author.id),
                notification_type: NotificationType::Comment,
                message: format!("{} commented on your post", author.username),
                content: Some(excerpt(&created.body, 100)),
                link: Some(link),
            });
        }

        for notification in pending {
            let recipient = notification.user_id;
            if let Err(e) = self.notifications.create(notification).await {
                warn!(error = %e, comment_id = created.id, recipient, "Failed to store comment notification");
            }
        }
    }

    /// Get one comment.
    pub async fn get_comment(&self, comment_id: i32, viewer_id: Option<i32>) -> AppResult<CommentView> {
        let comment = self.comment_repo.get_by_id(comment_id).await?;
        let mut views = self.views(vec![comment], viewer_id).await?;
        views
            .pop()
            .ok_or(AppError::CommentNotFound(comment_id))
    }

    /// Delete one of the caller's comments, and its replies.
    pub async fn delete_comment(&self, user_id: i32, comment_id: i32) -> AppResult<()> {
        let comment = self.comment_repo.get_by_id(comment_id).await?;
        if comment.user_id != user_id {
            return Err(AppError::Forbidden(
                "You can only delete your own comments".to_string(),
            ));
        }

        let reactions = self.comment_repo.delete(comment_id).await?;
        debug!(comment_id, user_id, reactions, "Comment deleted");
        Ok(())
    }

    /// The nested comment thread of a post.
    pub async fn comment_tree(
        &self,
        post_id: i32,
        viewer_id: Option<i32>,
    ) -> AppResult<Vec<CommentNode<CommentView>>> {
        if !self.post_repo.exists(post_id).await? {
            return Err(AppError::PostNotFound(post_id));
        }

        let comments = self.comment_repo.find_by_post(post_id).await?;
        let views = self.views(comments, viewer_id).await?;
        Ok(build_tree(views))
    }

    /// The chain of comments from the thread root down to `comment_id`.
    ///
    /// A parent link that loops back or points at a missing row is a
    /// [`AppError::DataIntegrity`] failure.
    pub async fn ancestor_chain(&self, comment_id: i32) -> AppResult<Vec<comment::Model>> {
        let start = self.comment_repo.get_by_id(comment_id).await?;

        let mut walk = AncestorWalk::new();
        let mut next = walk.visit(start)?;
        while let Some(parent_id) = next {
            let parent = self.comment_repo.find_by_id(parent_id).await?.ok_or_else(|| {
                AppError::DataIntegrity(format!(
                    "Comment {} points at missing parent {parent_id}",
                    walk.last_id().unwrap_or(comment_id)
                ))
            })?;
            next = walk.visit(parent)?;
        }

        Ok(walk.into_chain())
    }

    /// [`Self::ancestor_chain`] as viewer-facing comments.
    pub async fn thread(&self, comment_id: i32, viewer_id: Option<i32>) -> AppResult<Vec<CommentView>> {
        let chain = self.ancestor_chain(comment_id).await?;
        self.views(chain, viewer_id).await
    }

    /// Decorate comments with author names, reaction counts and reply counts, keeping
    /// their order.
    async fn views(
        &self,
        comments: Vec<comment::Model>,
        viewer_id: Option<i32>,
    ) -> AppResult<Vec<CommentView>> {
        let ids: Vec<i32> = comments.iter().map(|c| c.id).collect();
        let mut user_ids: Vec<i32> = comments.iter().map(|c| c.user_id).collect();
        user_ids.sort_unstable();
        user_ids.dedup();

        let usernames: HashMap<i32, String> = self
            .user_repo
            .find_by_ids(&user_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u.username))
            .collect();
        let mut reactions = self
            .reactions
            .counts_for(EntityKind::Comment, &ids, viewer_id)
            .await?;
        let replies = self.comment_repo.count_replies(&ids).await?;

        Ok(comments
            .into_iter()
            .map(|c| {
                let username = usernames.get(&c.user_id).cloned().unwrap_or_default();
                let counts = reactions.remove(&c.id).unwrap_or_default();
                let reply_count = replies.get(&c.id).copied().unwrap_or(0);
                CommentView::new(c, username, counts, reply_count)
            })
            .collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::resolver::EntityResolver;
    use agora_db::{
        EntityRef,
        repositories::{NotificationRepository, ReactionRepository},
    };
    use async_trait::async_trait;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
    use std::sync::Arc;

    struct AlwaysExists;

    #[async_trait]
    impl EntityResolver for AlwaysExists {
        async fn exists(&self, _entity: EntityRef) -> AppResult<bool> {
            Ok(true)
        }
    }

    fn service(db: DatabaseConnection) -> CommentService {
        let db = Arc::new(db);
        CommentService::new(
            CommentRepository::new(db.clone()),
            PostRepository::new(db.clone()),
            UserRepository::new(db.clone()),
            ReactionService::new(ReactionRepository::new(db.clone()), Arc::new(AlwaysExists)),
            NotificationService::new(NotificationRepository::new(db)),
        )
    }

    fn create_test_user(id: i32, username: &str) -> user::Model {
        user::Model {
            id,
            username: username.to_string(),
            token: None,
            bio: None,
            created_at: Utc::now().into(),
        }
    }

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
    async fn test_blank_body_is_rejected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let author = create_test_user(1, "alice");

        let result = service(db)
            .create_comment(
                &author,
                1,
                CreateCommentInput {
                    body: "   ".to_string(),
                    parent_comment_id: None,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_overlong_body_is_rejected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let author = create_test_user(1, "alice");

        let result = service(db)
            .create_comment(
                &author,
                1,
                CreateCommentInput {
                    body: "x".repeat(201),
                    parent_comment_id: None,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_ancestor_chain_missing_start() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<comment::Model>::new()])
            .into_connection();

        let result = service(db).ancestor_chain(4).await;

        assert!(matches!(result, Err(AppError::CommentNotFound(4))));
    }

    #[tokio::test]
    async fn test_ancestor_chain_root_first() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_comment(4, 1, Some(2))]])
            .append_query_results([[create_test_comment(2, 1, Some(1))]])
            .append_query_results([[create_test_comment(1, 1, None)]])
            .into_connection();

        let chain = service(db).ancestor_chain(4).await.unwrap();
        let ids: Vec<i32> = chain.iter().map(|c| c.id).collect();

        assert_eq!(ids, vec![1, 2, 4]);
    }

    #[tokio::test]
    async fn test_ancestor_chain_dangling_parent() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_comment(4, 1, Some(2))]])
            .append_query_results([Vec::<comment::Model>::new()])
            .into_connection();

        let result = service(db).ancestor_chain(4).await;

        assert!(matches!(result, Err(AppError::DataIntegrity(msg)) if msg.contains("missing parent 2")));
    }

    #[tokio::test]
    async fn test_ancestor_chain_cycle() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_comment(1, 1, Some(2))]])
            .append_query_results([[create_test_comment(2, 1, Some(1))]])
            .into_connection();

        let result = service(db).ancestor_chain(1).await;

        assert!(matches!(result, Err(AppError::DataIntegrity(_))));
    }

    #[tokio::test]
    async fn test_delete_someone_elses_comment() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_comment(3, 1, None)]])
            .into_connection();

        let result = service(db).delete_comment(2, 3).await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }
}
