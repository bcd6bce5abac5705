//! Repository layer.
//!
//! Each repository wraps a shared [`sea_orm::DatabaseConnection`] and maps database
//! errors into [`agora_common::AppError`].

pub mod article;
pub mod bookmark;
pub mod comment;
pub mod community;
pub mod hashtag;
pub mod notification;
pub mod post;
pub mod reaction;
pub mod user;

pub use article::ArticleRepository;
pub use bookmark::BookmarkRepository;
pub use comment::CommentRepository;
pub use community::CommunityRepository;
pub use hashtag::{HashtagCount, HashtagRepository, HashtagSort};
pub use notification::NotificationRepository;
pub use post::PostRepository;
pub use reaction::{ReactionRepository, VoteCounts};
pub use user::UserRepository;
