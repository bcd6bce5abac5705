//! Shared fixture for the core integration tests.

#![allow(dead_code, clippy::unwrap_used)]

use std::sync::Arc;

use agora_core::{
    BookmarkService, CommentService, CommunityService, CreateCommentInput, CreatePostInput,
    FavoriteService, HashtagService, NotificationService, PostService, ReactionService,
    RepositoryResolver, UserService,
};
use agora_db::{
    entities::{article, community, community_member, community_member::MemberRole, user},
    repositories::{
        ArticleRepository, BookmarkRepository, CommentRepository, CommunityRepository,
        HashtagRepository, NotificationRepository, PostRepository, ReactionRepository,
        UserRepository,
    },
    test_utils::TestDatabase,
};
use chrono::Utc;
use sea_orm::{DatabaseConnection, Set};

pub struct Fixture {
    pub db: TestDatabase,
    pub users: UserRepository,
    pub articles: ArticleRepository,
    pub communities: CommunityRepository,
    pub reactions: ReactionService,
    pub comments: CommentService,
    pub posts: PostService,
    pub bookmarks: BookmarkService,
    pub hashtags: HashtagService,
    pub notifications: NotificationService,
    pub community_service: CommunityService,
    pub favorites: FavoriteService,
    pub user_service: UserService,
}

impl Fixture {
    pub async fn new() -> Self {
        let db = TestDatabase::in_memory().await.unwrap();
        let conn: Arc<DatabaseConnection> = db.connection();

        let user_repo = UserRepository::new(conn.clone());
        let post_repo = PostRepository::new(conn.clone());
        let comment_repo = CommentRepository::new(conn.clone());
        let reaction_repo = ReactionRepository::new(conn.clone());
        let bookmark_repo = BookmarkRepository::new(conn.clone());
        let hashtag_repo = HashtagRepository::new(conn.clone());
        let notification_repo = NotificationRepository::new(conn.clone());
        let article_repo = ArticleRepository::new(conn.clone());
        let community_repo = CommunityRepository::new(conn);

        let resolver = RepositoryResolver::new(
            post_repo.clone(),
            article_repo.clone(),
            community_repo.clone(),
            comment_repo.clone(),
        )
        .shared();

        let reactions = ReactionService::new(reaction_repo.clone(), resolver);
        let notifications = NotificationService::new(notification_repo);
        let hashtags = HashtagService::new(hashtag_repo);
        let comments = CommentService::new(
            comment_repo.clone(),
            post_repo.clone(),
            user_repo.clone(),
            reactions.clone(),
            notifications.clone(),
        );
        let posts = PostService::new(
            post_repo.clone(),
            user_repo.clone(),
            comment_repo.clone(),
            bookmark_repo.clone(),
            hashtags.clone(),
            reactions.clone(),
            comments.clone(),
        );

        Self {
            bookmarks: BookmarkService::new(bookmark_repo.clone(), post_repo.clone()),
            community_service: CommunityService::new(community_repo.clone()),
            favorites: FavoriteService::new(
                reaction_repo.clone(),
                post_repo.clone(),
                article_repo.clone(),
                community_repo.clone(),
                comment_repo.clone(),
                user_repo.clone(),
            ),
            user_service: UserService::new(
                user_repo.clone(),
                post_repo,
                comment_repo,
                reaction_repo,
                bookmark_repo,
            ),
            db,
            users: user_repo,
            articles: article_repo,
            communities: community_repo,
            reactions,
            comments,
            posts,
            hashtags,
            notifications,
        }
    }

    pub async fn user(&self, username: &str) -> user::Model {
        self.users
            .create(user::ActiveModel {
                username: Set(username.to_string()),
                token: Set(Some(format!("token-{username}"))),
                bio: Set(None),
                created_at: Set(Utc::now().into()),
                ..Default::default()
            })
            .await
            .unwrap()
    }

    pub async fn post(&self, author: &user::Model, body: &str, hashtags: &[&str]) -> i32 {
        self.posts
            .create_post(
                author,
                CreatePostInput {
                    body: body.to_string(),
                    image_url: None,
                    hashtags: hashtags.iter().map(ToString::to_string).collect(),
                },
            )
            .await
            .unwrap()
            .id
    }

    pub async fn comment(
        &self,
        author: &user::Model,
        post_id: i32,
        parent_comment_id: Option<i32>,
    ) -> i32 {
        self.comments
            .create_comment(
                author,
                post_id,
                CreateCommentInput {
                    body: format!("{} says hi", author.username),
                    parent_comment_id,
                },
            )
            .await
            .unwrap()
            .id
    }

    pub async fn article(&self, submitter: &user::Model, title: &str) -> i32 {
        self.articles
            .create(article::ActiveModel {
                submitter_id: Set(submitter.id),
                title: Set(title.to_string()),
                created_at: Set(Utc::now().into()),
                ..Default::default()
            })
            .await
            .unwrap()
            .id
    }

    pub async fn community(&self, name: &str, members: &[(&user::Model, MemberRole)]) -> i32 {
        let created = self
            .communities
            .create(community::ActiveModel {
                name: Set(name.to_string()),
                created_at: Set(Utc::now().into()),
                ..Default::default()
            })
            .await
            .unwrap();

        for (member, role) in members {
            self.communities
                .add_member(community_member::ActiveModel {
                    community_id: Set(created.id),
                    user_id: Set(member.id),
                    role: Set(*role),
                    joined_at: Set(Utc::now().into()),
                })
                .await
                .unwrap();
        }

        created.id
    }

    /// Disable foreign key checks so a test can plant broken parent links.
    pub async fn allow_dangling_links(&self) {
        self.db.execute_raw("PRAGMA foreign_keys = OFF").await.unwrap();
    }
}
