//! Post service.

use std::collections::HashMap;

use crate::pagination::Page;
use crate::services::comment::{CommentService, CommentView};
use crate::services::hashtag::HashtagService;
use crate::services::reaction::ReactionService;
use crate::thread::CommentNode;
use agora_common::{AppError, AppResult};
use agora_db::{
    EntityKind,
    entities::{post, reaction::Vote, user},
    repositories::{BookmarkRepository, CommentRepository, PostRepository, UserRepository},
};
use chrono::Utc;
use sea_orm::{Set, prelude::DateTimeWithTimeZone};
use serde::{Deserialize, Serialize};
use tracing::debug;
use validator::Validate;

/// Input for creating a post.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostInput {
    #[validate(length(min = 1, max = 2000))]
    pub body: String,

    #[validate(length(max = 512))]
    pub image_url: Option<String>,

    #[validate(length(max = 10))]
    #[serde(default)]
    pub hashtags: Vec<String>,
}

/// Input for updating a post. Absent fields are left alone.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostInput {
    #[validate(length(min = 1, max = 2000))]
    pub body: Option<String>,

    /// An empty string removes the image.
    #[validate(length(max = 512))]
    pub image_url: Option<String>,

    /// Replaces the post's hashtags when present.
    #[validate(length(max = 10))]
    pub hashtags: Option<Vec<String>>,
}

/// A post with its author and engagement numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    pub id: i32,
    pub user_id: i32,
    pub username: String,
    pub body: String,
    pub image_url: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: Option<DateTimeWithTimeZone>,
    pub likes: u64,
    pub dislikes: u64,
    pub viewer_vote: Option<Vote>,
    pub comments: u64,
    pub bookmarks: u64,
    pub hashtags: Vec<String>,
}

/// A post together with its comment thread.
#[derive(Debug, Clone, Serialize)]
pub struct PostDetail {
    #[serde(flatten)]
    pub post: PostSummary,
    pub thread: Vec<CommentNode<CommentView>>,
}

/// Post service for business logic.
#[derive(Clone)]
pub struct PostService {
    post_repo: PostRepository,
    user_repo: UserRepository,
    comment_repo: CommentRepository,
    bookmark_repo: BookmarkRepository,
    hashtags: HashtagService,
    reactions: ReactionService,
    comments: CommentService,
}

impl PostService {
    /// Create a new post service.
    #[must_use]
    pub const fn new(
        post_repo: PostRepository,
        user_repo: UserRepository,
        comment_repo: CommentRepository,
        bookmark_repo: BookmarkRepository,
        hashtags: HashtagService,
        reactions: ReactionService,
        comments: CommentService,
    ) -> Self {
        Self {
            post_repo,
            user_repo,
            comment_repo,
            bookmark_repo,
            hashtags,
            reactions,
            comments,
        }
    }

    /// Publish a new post.
    pub async fn create_post(
        &self,
        author: &user::Model,
        input: CreatePostInput,
    ) -> AppResult<PostSummary> {
        input.validate()?;

        let body = input.body.trim();
        if body.is_empty() {
            return Err(AppError::Validation("Post body must not be blank".to_string()));
        }

        // Reject bad tags before anything is written
        HashtagService::normalize(&input.hashtags)?;

        let now = Utc::now();
        let model = post::ActiveModel {
            user_id: Set(author.id),
            body: Set(body.to_string()),
            image_url: Set(input.image_url.filter(|url| !url.trim().is_empty())),
            created_at: Set(now.into()),
            updated_at: Set(None),
            ..Default::default()
        };

        let created = self.post_repo.create(model).await?;
        self.hashtags
            .set_post_hashtags(created.id, &input.hashtags)
            .await?;

        debug!(post_id = created.id, user_id = author.id, "Post created");

        self.summary(created, Some(author.id)).await
    }

    /// A post with its full comment thread.
    pub async fn get_post(&self, post_id: i32, viewer_id: Option<i32>) -> AppResult<PostDetail> {
        let post = self.post_repo.get_by_id(post_id).await?;
        let summary = self.summary(post, viewer_id).await?;
        let thread = self.comments.comment_tree(post_id, viewer_id).await?;

        Ok(PostDetail {
            post: summary,
            thread,
        })
    }

    /// Newest posts, optionally only those carrying a hashtag.
    pub async fn list_posts(
        &self,
        hashtag: Option<&str>,
        page: u64,
        per_page: u64,
        viewer_id: Option<i32>,
    ) -> AppResult<Page<PostSummary>> {
        let hashtag_id = match hashtag {
            Some(name) => match self.hashtags.find_id(name).await? {
                Some(id) => Some(id),
                None => return Ok(Page::new(vec![], 0, page, per_page)),
            },
            None => None,
        };

        let (posts, total) = self
            .post_repo
            .find_page(None, hashtag_id, page, per_page)
            .await?;
        let items = self.summaries(posts, viewer_id).await?;

        Ok(Page::new(items, total, page, per_page))
    }

    /// Newest posts by one user.
    pub async fn list_user_posts(
        &self,
        username: &str,
        page: u64,
        per_page: u64,
        viewer_id: Option<i32>,
    ) -> AppResult<Page<PostSummary>> {
        let author = self
            .user_repo
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::UserNotFound(username.to_string()))?;

        let (posts, total) = self
            .post_repo
            .find_page(Some(author.id), None, page, per_page)
            .await?;
        let items = self.summaries(posts, viewer_id).await?;

        Ok(Page::new(items, total, page, per_page))
    }

    /// Edit one of the caller's posts.
    pub async fn update_post(
        &self,
        user_id: i32,
        post_id: i32,
        input: UpdatePostInput,
    ) -> AppResult<PostSummary> {
        input.validate()?;

        let post = self.post_repo.get_by_id(post_id).await?;
        if post.user_id != user_id {
            return Err(AppError::Forbidden(
                "You can only edit your own posts".to_string(),
            ));
        }

        if let Some(tags) = &input.hashtags {
            HashtagService::normalize(tags)?;
        }

        let mut active: post::ActiveModel = post.into();
        if let Some(body) = input.body {
            let body = body.trim();
            if body.is_empty() {
                return Err(AppError::Validation("Post body must not be blank".to_string()));
            }
            active.body = Set(body.to_string());
        }
        if let Some(image_url) = input.image_url {
            let image_url = image_url.trim();
            active.image_url = Set((!image_url.is_empty()).then(|| image_url.to_string()));
        }
        active.updated_at = Set(Some(Utc::now().into()));

        let updated = self.post_repo.update(active).await?;

        if let Some(tags) = &input.hashtags {
            self.hashtags.set_post_hashtags(post_id, tags).await?;
        }

        debug!(post_id, user_id, "Post updated");
        self.summary(updated, Some(user_id)).await
    }

    /// Delete one of the caller's posts.
    pub async fn delete_post(&self, user_id: i32, post_id: i32) -> AppResult<()> {
        let post = self.post_repo.get_by_id(post_id).await?;
        if post.user_id != user_id {
            return Err(AppError::Forbidden(
                "You can only delete your own posts".to_string(),
            ));
        }

        let reactions = self.post_repo.delete(post_id).await?;
        debug!(post_id, user_id, reactions, "Post deleted");
        Ok(())
    }

    /// Summaries for posts given by ID, in the order given. Missing posts are skipped.
    pub async fn summaries_by_ids(
        &self,
        ids: &[i32],
        viewer_id: Option<i32>,
    ) -> AppResult<Vec<PostSummary>> {
        let mut by_id: HashMap<i32, post::Model> = self
            .post_repo
            .find_by_ids(ids)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();
        let posts = ids.iter().filter_map(|id| by_id.remove(id)).collect();

        self.summaries(posts, viewer_id).await
    }

    async fn summary(&self, post: post::Model, viewer_id: Option<i32>) -> AppResult<PostSummary> {
        let post_id = post.id;
        self.summaries(vec![post], viewer_id)
            .await?
            .pop()
            .ok_or(AppError::PostNotFound(post_id))
    }

    /// Decorate posts with everything a listing shows, using one grouped query per
    /// measure rather than one per post.
    pub async fn summaries(
        &self,
        posts: Vec<post::Model>,
        viewer_id: Option<i32>,
    ) -> AppResult<Vec<PostSummary>> {
        let ids: Vec<i32> = posts.iter().map(|p| p.id).collect();
        let mut user_ids: Vec<i32> = posts.iter().map(|p| p.user_id).collect();
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
            .counts_for(EntityKind::Post, &ids, viewer_id)
            .await?;
        let comments = self.comment_repo.count_by_posts(&ids).await?;
        let bookmarks = self.bookmark_repo.count_by_posts(&ids).await?;
        let mut hashtags = self.hashtags.names_for_posts(&ids).await?;

        Ok(posts
            .into_iter()
            .map(|p| {
                let counts = reactions.remove(&p.id).unwrap_or_default();
                PostSummary {
                    id: p.id,
                    user_id: p.user_id,
                    username: usernames.get(&p.user_id).cloned().unwrap_or_default(),
                    likes: counts.likes,
                    dislikes: counts.dislikes,
                    viewer_vote: counts.viewer_vote,
                    comments: comments.get(&p.id).copied().unwrap_or(0),
                    bookmarks: bookmarks.get(&p.id).copied().unwrap_or(0),
                    hashtags: hashtags.remove(&p.id).unwrap_or_default(),
                    body: p.body,
                    image_url: p.image_url,
                    created_at: p.created_at,
                    updated_at: p.updated_at,
                }
            })
            .collect())
    }
}
