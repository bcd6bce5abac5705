//! Favorites: everything a user has liked, across entity kinds.

use std::collections::HashMap;

use crate::services::excerpt;
use agora_common::AppResult;
use agora_db::{
    EntityKind,
    entities::reaction,
    repositories::{
        ArticleRepository, CommentRepository, CommunityRepository, PostRepository,
        ReactionRepository, UserRepository,
    },
};
use serde::Serialize;

const TITLE_CHARS: usize = 50;

/// One liked entity, described for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteItem {
    pub entity_type: EntityKind,
    pub entity_id: i32,
    pub title: String,
    pub details: String,
}

/// Favorites service for business logic.
#[derive(Clone)]
pub struct FavoriteService {
    reaction_repo: ReactionRepository,
    post_repo: PostRepository,
    article_repo: ArticleRepository,
    community_repo: CommunityRepository,
    comment_repo: CommentRepository,
    user_repo: UserRepository,
}

impl FavoriteService {
    /// Create a new favorites service.
    #[must_use]
    pub const fn new(
        reaction_repo: ReactionRepository,
        post_repo: PostRepository,
        article_repo: ArticleRepository,
        community_repo: CommunityRepository,
        comment_repo: CommentRepository,
        user_repo: UserRepository,
    ) -> Self {
        Self {
            reaction_repo,
            post_repo,
            article_repo,
            community_repo,
            comment_repo,
            user_repo,
        }
    }

    /// The user's likes, newest first. Liked rows that have since gone are skipped.
    pub async fn list_favorites(&self, user_id: i32) -> AppResult<Vec<FavoriteItem>> {
        let likes = self.reaction_repo.find_likes_by_user(user_id).await?;

        let ids_of = |kind: EntityKind| -> Vec<i32> {
            likes
                .iter()
                .filter(|r| r.entity_type == kind)
                .map(|r| r.entity_id)
                .collect()
        };
        let post_ids = ids_of(EntityKind::Post);
        let article_ids = ids_of(EntityKind::Article);
        let community_ids = ids_of(EntityKind::Community);
        let comment_ids = ids_of(EntityKind::Comment);

        let posts = self.post_repo.find_by_ids(&post_ids).await?;
        let articles = self.article_repo.find_by_ids(&article_ids).await?;
        let communities = self.community_repo.find_by_ids(&community_ids).await?;
        let comments = self.comment_repo.find_by_ids(&comment_ids).await?;

        let mut author_ids: Vec<i32> = posts
            .iter()
            .map(|p| p.user_id)
            .chain(articles.iter().map(|a| a.submitter_id))
            .chain(comments.iter().map(|c| c.user_id))
            .collect();
        author_ids.sort_unstable();
        author_ids.dedup();

        let usernames: HashMap<i32, String> = self
            .user_repo
            .find_by_ids(&author_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u.username))
            .collect();
        let username = |id: i32| usernames.get(&id).map_or("unknown", String::as_str).to_string();

        let post_likes = self
            .reaction_repo
            .count_by_entities(EntityKind::Post, &post_ids)
            .await?;
        let members = self.community_repo.member_counts(&community_ids).await?;

        let mut described: HashMap<(EntityKind, i32), (String, String)> = HashMap::new();
        for post in posts {
            let likes = post_likes.get(&post.id).map_or(0, |c| c.likes);
            described.insert(
                (EntityKind::Post, post.id),
                (
                    excerpt(&post.body, TITLE_CHARS),
                    format!("Post by {} · {likes} likes", username(post.user_id)),
                ),
            );
        }
        for article in articles {
            described.insert(
                (EntityKind::Article, article.id),
                (
                    article.title,
                    format!("Article by {}", username(article.submitter_id)),
                ),
            );
        }
        for community in communities {
            let count = members.get(&community.id).copied().unwrap_or(0);
            described.insert(
                (EntityKind::Community, community.id),
                (community.name, format!("{count} members")),
            );
        }
        for comment in comments {
            described.insert(
                (EntityKind::Comment, comment.id),
                (
                    excerpt(&comment.body, TITLE_CHARS),
                    format!("Comment by {}", username(comment.user_id)),
                ),
            );
        }

        Ok(likes
            .into_iter()
            .filter_map(|r: reaction::Model| {
                described
                    .remove(&(r.entity_type, r.entity_id))
                    .map(|(title, details)| FavoriteItem {
                        entity_type: r.entity_type,
                        entity_id: r.entity_id,
                        title,
                        details,
                    })
            })
            .collect())
    }
}
