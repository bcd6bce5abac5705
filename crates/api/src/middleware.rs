//! API middleware and shared state.

use std::sync::Arc;

use agora_common::config::ApiConfig;
use agora_core::{
    BookmarkService, CommentService, CommunityService, FavoriteService, HashtagService,
    NotificationService, PostService, ReactionService, RepositoryResolver, UserService,
};
use agora_db::repositories::{
    ArticleRepository, BookmarkRepository, CommentRepository, CommunityRepository,
    HashtagRepository, NotificationRepository, PostRepository, ReactionRepository,
    UserRepository,
};
use axum::{
    body::Body,
    extract::State,
    http::{Request, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use sea_orm::DatabaseConnection;

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub post_service: PostService,
    pub comment_service: CommentService,
    pub reaction_service: ReactionService,
    pub bookmark_service: BookmarkService,
    pub hashtag_service: HashtagService,
    pub notification_service: NotificationService,
    pub community_service: CommunityService,
    pub favorite_service: FavoriteService,
    pub api: ApiConfig,
}

impl AppState {
    /// Wire repositories and services over one connection pool.
    #[must_use]
    pub fn new(db: Arc<DatabaseConnection>, api: ApiConfig) -> Self {
        let user_repo = UserRepository::new(Arc::clone(&db));
        let post_repo = PostRepository::new(Arc::clone(&db));
        let comment_repo = CommentRepository::new(Arc::clone(&db));
        let reaction_repo = ReactionRepository::new(Arc::clone(&db));
        let bookmark_repo = BookmarkRepository::new(Arc::clone(&db));
        let hashtag_repo = HashtagRepository::new(Arc::clone(&db));
        let notification_repo = NotificationRepository::new(Arc::clone(&db));
        let article_repo = ArticleRepository::new(Arc::clone(&db));
        let community_repo = CommunityRepository::new(db);

        let resolver = RepositoryResolver::new(
            post_repo.clone(),
            article_repo.clone(),
            community_repo.clone(),
            comment_repo.clone(),
        )
        .shared();

        let reaction_service = ReactionService::new(reaction_repo.clone(), resolver);
        let notification_service = NotificationService::new(notification_repo);
        let hashtag_service = HashtagService::new(hashtag_repo);
        let comment_service = CommentService::new(
            comment_repo.clone(),
            post_repo.clone(),
            user_repo.clone(),
            reaction_service.clone(),
            notification_service.clone(),
        );
        let post_service = PostService::new(
            post_repo.clone(),
            user_repo.clone(),
            comment_repo.clone(),
            bookmark_repo.clone(),
            hashtag_service.clone(),
            reaction_service.clone(),
            comment_service.clone(),
        );
        let favorite_service = FavoriteService::new(
            reaction_repo.clone(),
            post_repo.clone(),
            article_repo,
            community_repo.clone(),
            comment_repo.clone(),
            user_repo.clone(),
        );

        Self {
            user_service: UserService::new(
                user_repo,
                post_repo.clone(),
                comment_repo,
                reaction_repo,
                bookmark_repo.clone(),
            ),
            bookmark_service: BookmarkService::new(bookmark_repo, post_repo),
            community_service: CommunityService::new(community_repo),
            post_service,
            comment_service,
            reaction_service,
            hashtag_service,
            notification_service,
            favorite_service,
            api,
        }
    }
}

/// Authentication middleware.
///
/// Resolves `Authorization: Bearer <token>` to a user and stores it in the request
/// extensions. Unknown tokens are ignored here; endpoints that need a user reject
/// the request through [`crate::extractors::AuthUser`].
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get(AUTHORIZATION)
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        match state.user_service.authenticate_by_token(token.trim()).await {
            Ok(user) => {
                req.extensions_mut().insert(user);
            }
            Err(e) => tracing::debug!(error = %e, "Bearer token rejected"),
        }
    }

    next.run(req).await
}
