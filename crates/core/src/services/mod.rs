//! Business logic services.

#![allow(missing_docs)]

pub mod bookmark;
pub mod comment;
pub mod community;
pub mod favorite;
pub mod hashtag;
pub mod notification;
pub mod post;
pub mod reaction;
pub mod user;

pub use bookmark::BookmarkService;
pub use comment::{CommentService, CommentView, CreateCommentInput};
pub use community::{CommunityService, CommunitySummary};
pub use favorite::{FavoriteItem, FavoriteService};
pub use hashtag::{HashtagService, HashtagSummary};
pub use notification::{NewNotification, NotificationService};
pub use post::{CreatePostInput, PostDetail, PostService, PostSummary, UpdatePostInput};
pub use reaction::{ReactionCounts, ReactionOutcome, ReactionService, ReactionStatus};
pub use user::{UserProfile, UserService, UserStats};

/// Shorten `text` to at most `max_chars` characters, marking the cut with `...`.
pub(crate) fn excerpt(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", text[..cut].trim_end()),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::excerpt;

    #[test]
    fn test_excerpt() {
        assert_eq!(excerpt("short", 10), "short");
        assert_eq!(excerpt("exactly ten", 11), "exactly ten");
        assert_eq!(excerpt("hello wonderful world", 5), "hello...");
        assert_eq!(excerpt("ünïcödé text", 4), "ünïc...");
    }
}
