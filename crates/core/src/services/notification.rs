//! Notification service.
//!
//! Notifications are stored and read here; delivering them anywhere else is out of
//! scope.

use agora_common::{AppError, AppResult};
use agora_db::{
    entities::notification::{self, NotificationType},
    repositories::NotificationRepository,
};
use chrono::Utc;
use sea_orm::Set;

/// Input for storing a notification.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub user_id: i32,
    pub actor_id: Option<i32>,
    pub notification_type: NotificationType,
    pub message: String,
    pub content: Option<String>,
    pub link: Option<String>,
}

/// Notification service for business logic.
#[derive(Clone)]
pub struct NotificationService {
    notification_repo: NotificationRepository,
}

impl NotificationService {
    /// Default number of notifications returned by a listing.
    pub const DEFAULT_LIMIT: u64 = 50;

    /// Create a new notification service.
    #[must_use]
    pub const fn new(notification_repo: NotificationRepository) -> Self {
        Self { notification_repo }
    }

    /// Store a notification.
    pub async fn create(&self, input: NewNotification) -> AppResult<notification::Model> {
        let model = notification::ActiveModel {
            user_id: Set(input.user_id),
            actor_id: Set(input.actor_id),
            notification_type: Set(input.notification_type),
            message: Set(input.message),
            content: Set(input.content),
            link: Set(input.link),
            is_read: Set(false),
            created_at: Set(Utc::now().into()),
            expires_at: Set(None),
            ..Default::default()
        };

        self.notification_repo.create(model).await
    }

    /// A user's notifications, newest first.
    pub async fn list(
        &self,
        user_id: i32,
        limit: u64,
        until_id: Option<i32>,
        unread_only: bool,
    ) -> AppResult<Vec<notification::Model>> {
        self.notification_repo
            .find_by_user(user_id, limit, until_id, unread_only)
            .await
    }

    /// Mark one notification as read.
    ///
    /// Returns `true` if it was unread before. Someone else's notification is reported
    /// as missing.
    pub async fn mark_as_read(&self, user_id: i32, notification_id: i32) -> AppResult<bool> {
        let found = self
            .notification_repo
            .find_by_id(notification_id)
            .await?
            .filter(|n| n.user_id == user_id)
            .ok_or_else(|| AppError::NotFound("Notification not found".to_string()))?;

        if found.is_read {
            return Ok(false);
        }

        let changed = self
            .notification_repo
            .mark_as_read(notification_id, user_id)
            .await?;
        Ok(changed > 0)
    }

    /// Mark every notification of a user as read, returning how many changed.
    pub async fn mark_all_as_read(&self, user_id: i32) -> AppResult<u64> {
        self.notification_repo.mark_all_as_read(user_id).await
    }

    /// Count a user's unread notifications.
    pub async fn count_unread(&self, user_id: i32) -> AppResult<u64> {
        self.notification_repo.count_unread(user_id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn create_test_notification(id: i32, user_id: i32, is_read: bool) -> notification::Model {
        notification::Model {
            id,
            user_id,
            actor_id: None,
            notification_type: NotificationType::System,
            message: "Welcome".to_string(),
            content: None,
            link: None,
            is_read,
            created_at: Utc::now().into(),
            expires_at: None,
        }
    }

    #[tokio::test]
    async fn test_mark_as_read_changes_state() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_notification(1, 5, false)]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let service = NotificationService::new(NotificationRepository::new(db));
        assert!(service.mark_as_read(5, 1).await.unwrap());
    }

    #[tokio::test]
    async fn test_mark_as_read_already_read() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_notification(1, 5, true)]])
                .into_connection(),
        );

        let service = NotificationService::new(NotificationRepository::new(db));
        assert!(!service.mark_as_read(5, 1).await.unwrap());
    }

    #[tokio::test]
    async fn test_mark_as_read_not_owner() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_notification(1, 5, false)]])
                .into_connection(),
        );

        let service = NotificationService::new(NotificationRepository::new(db));
        let result = service.mark_as_read(6, 1).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
