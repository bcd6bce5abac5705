//! Database entities.

#![allow(missing_docs)]

pub mod article;
pub mod bookmark;
pub mod comment;
pub mod community;
pub mod community_member;
pub mod hashtag;
pub mod notification;
pub mod post;
pub mod post_hashtag;
pub mod reaction;
pub mod user;

pub use article::Entity as Article;
pub use bookmark::Entity as Bookmark;
pub use comment::Entity as Comment;
pub use community::Entity as Community;
pub use community_member::Entity as CommunityMember;
pub use hashtag::Entity as Hashtag;
pub use notification::Entity as Notification;
pub use post::Entity as Post;
pub use post_hashtag::Entity as PostHashtag;
pub use reaction::Entity as Reaction;
pub use user::Entity as User;
