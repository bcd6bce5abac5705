//! Bookmark service.

use agora_common::{AppError, AppResult};
use agora_db::{
    entities::bookmark,
    repositories::{BookmarkRepository, PostRepository},
};
use tracing::debug;

use crate::pagination::Page;

/// Bookmark service for business logic.
#[derive(Clone)]
pub struct BookmarkService {
    bookmark_repo: BookmarkRepository,
    post_repo: PostRepository,
}

impl BookmarkService {
    /// Create a new bookmark service.
    #[must_use]
    pub const fn new(bookmark_repo: BookmarkRepository, post_repo: PostRepository) -> Self {
        Self {
            bookmark_repo,
            post_repo,
        }
    }

    /// Bookmark a post.
    pub async fn bookmark(&self, user_id: i32, post_id: i32) -> AppResult<bookmark::Model> {
        if !self.post_repo.exists(post_id).await? {
            return Err(AppError::PostNotFound(post_id));
        }

        if self.bookmark_repo.is_bookmarked(user_id, post_id).await? {
            return Err(Self::already_bookmarked());
        }

        let created = match self.bookmark_repo.create(user_id, post_id).await {
            Err(AppError::Conflict(_)) => return Err(Self::already_bookmarked()),
            result => result?,
        };

        debug!(user_id, post_id, "Post bookmarked");
        Ok(created)
    }

    fn already_bookmarked() -> AppError {
        AppError::BadRequest("You have already bookmarked this post.".to_string())
    }

    /// Remove a bookmark.
    pub async fn unbookmark(&self, user_id: i32, post_id: i32) -> AppResult<()> {
        let removed = self
            .bookmark_repo
            .delete_by_user_and_post(user_id, post_id)
            .await?;

        if removed == 0 {
            return Err(AppError::BadRequest(
                "You have not bookmarked this post.".to_string(),
            ));
        }

        debug!(user_id, post_id, "Bookmark removed");
        Ok(())
    }

    /// A user's bookmarks, newest first.
    pub async fn list_bookmarks(
        &self,
        user_id: i32,
        page: u64,
        per_page: u64,
    ) -> AppResult<Page<bookmark::Model>> {
        let (items, total) = self
            .bookmark_repo
            .find_by_user(user_id, page, per_page)
            .await?;
        Ok(Page::new(items, total, page, per_page))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn service(db: DatabaseConnection) -> BookmarkService {
        let db = Arc::new(db);
        BookmarkService::new(BookmarkRepository::new(db.clone()), PostRepository::new(db))
    }

    fn post_exists(db: MockDatabase) -> MockDatabase {
        db.append_query_results([[maplit::btreemap! {
            "num_items" => sea_orm::Value::BigInt(Some(1))
        }]])
    }

    #[tokio::test]
    async fn test_duplicate_bookmark_is_bad_request() {
        let existing = bookmark::Model {
            id: 1,
            user_id: 2,
            post_id: 3,
            created_at: Utc::now().into(),
        };
        let db = post_exists(MockDatabase::new(DatabaseBackend::Postgres))
            .append_query_results([[existing]])
            .into_connection();

        let result = service(db).bookmark(2, 3).await;

        assert!(matches!(result, Err(AppError::BadRequest(msg)) if msg.contains("already")));
    }

    #[tokio::test]
    async fn test_unbookmark_when_absent() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let result = service(db).unbookmark(2, 3).await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }
}
