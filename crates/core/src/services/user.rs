//! User service.

use agora_common::{AppError, AppResult};
use agora_db::{
    entities::user,
    repositories::{
        BookmarkRepository, CommentRepository, PostRepository, ReactionRepository, UserRepository,
    },
};
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::Serialize;

/// Activity totals for a user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub posts: u64,
    pub comments: u64,
    pub likes_given: u64,
    pub bookmarks: u64,
}

/// The authenticated user's own profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: i32,
    pub username: String,
    pub bio: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub stats: UserStats,
}

/// User service for business logic.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    post_repo: PostRepository,
    comment_repo: CommentRepository,
    reaction_repo: ReactionRepository,
    bookmark_repo: BookmarkRepository,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub const fn new(
        user_repo: UserRepository,
        post_repo: PostRepository,
        comment_repo: CommentRepository,
        reaction_repo: ReactionRepository,
        bookmark_repo: BookmarkRepository,
    ) -> Self {
        Self {
            user_repo,
            post_repo,
            comment_repo,
            reaction_repo,
            bookmark_repo,
        }
    }

    /// Resolve a bearer token to its user.
    pub async fn authenticate_by_token(&self, token: &str) -> AppResult<user::Model> {
        if token.is_empty() {
            return Err(AppError::Unauthorized);
        }

        self.user_repo
            .find_by_token(token)
            .await?
            .ok_or(AppError::Unauthorized)
    }

    /// Get a user by username.
    pub async fn get_by_username(&self, username: &str) -> AppResult<user::Model> {
        self.user_repo
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::UserNotFound(username.to_string()))
    }

    /// The user's profile with activity totals.
    pub async fn get_me(&self, user: &user::Model) -> AppResult<UserProfile> {
        let stats = UserStats {
            posts: self.post_repo.count_by_user(user.id).await?,
            comments: self.comment_repo.count_by_user(user.id).await?,
            likes_given: self.reaction_repo.count_likes_by_user(user.id).await?,
            bookmarks: self.bookmark_repo.count_by_user(user.id).await?,
        };

        Ok(UserProfile {
            id: user.id,
            username: user.username.clone(),
            bio: user.bio.clone(),
            created_at: user.created_at,
            stats,
        })
    }
}
