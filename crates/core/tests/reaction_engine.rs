//! Reaction engine behaviour against a real (in-memory `SQLite`) schema.

#![allow(clippy::unwrap_used, clippy::panic)]

mod common;

use agora_common::AppError;
use agora_core::ReactionStatus;
use agora_db::{
    EntityKind, EntityRef,
    entities::{community_member::MemberRole, reaction::Vote},
};
use common::Fixture;
use futures::future::join_all;

#[tokio::test]
async fn test_same_vote_twice_leaves_nothing() {
    let fx = Fixture::new().await;
    let alice = fx.user("alice").await;
    let post = EntityRef::post(fx.post(&alice, "hello", &[]).await);

    let first = fx.reactions.submit_reaction(alice.id, post, Vote::Like).await.unwrap();
    let second = fx.reactions.submit_reaction(alice.id, post, Vote::Like).await.unwrap();

    assert_eq!(first.status, ReactionStatus::Added);
    assert_eq!(second.status, ReactionStatus::Removed);
    assert!(second.reaction.is_none());

    let counts = fx.reactions.get_reaction_counts(post, Some(alice.id)).await.unwrap();
    assert_eq!((counts.likes, counts.dislikes), (0, 0));
    assert_eq!(counts.viewer_vote, None);
}

#[tokio::test]
async fn test_switching_vote_keeps_identity() {
    let fx = Fixture::new().await;
    let alice = fx.user("alice").await;
    let post = EntityRef::post(fx.post(&alice, "hello", &[]).await);

    let added = fx
        .reactions
        .submit_reaction(alice.id, post, Vote::Like)
        .await
        .unwrap()
        .reaction
        .unwrap();
    let updated = fx
        .reactions
        .submit_reaction(alice.id, post, Vote::Dislike)
        .await
        .unwrap();

    assert_eq!(updated.status, ReactionStatus::Updated);
    let reaction = updated.reaction.unwrap();
    assert_eq!(reaction.id, added.id);
    assert_eq!(reaction.created_at, added.created_at);
    assert_eq!(reaction.vote, Vote::Dislike);

    let counts = fx.reactions.get_reaction_counts(post, Some(alice.id)).await.unwrap();
    assert_eq!((counts.likes, counts.dislikes), (0, 1));
    assert_eq!(counts.viewer_vote, Some(Vote::Dislike));
}

#[tokio::test]
async fn test_every_entity_kind_is_reactable() {
    let fx = Fixture::new().await;
    let alice = fx.user("alice").await;
    let post_id = fx.post(&alice, "hello", &[]).await;
    let comment_id = fx.comment(&alice, post_id, None).await;
    let article_id = fx.article(&alice, "A title").await;
    let community_id = fx.community("rustaceans", &[]).await;

    for entity in [
        EntityRef::new(EntityKind::Post, post_id),
        EntityRef::new(EntityKind::Comment, comment_id),
        EntityRef::new(EntityKind::Article, article_id),
        EntityRef::new(EntityKind::Community, community_id),
    ] {
        let outcome = fx.reactions.submit_reaction(alice.id, entity, Vote::Like).await.unwrap();
        assert_eq!(outcome.status, ReactionStatus::Added, "{entity}");
    }
}

#[tokio::test]
async fn test_ids_are_scoped_by_kind() {
    let fx = Fixture::new().await;
    let alice = fx.user("alice").await;
    let post_id = fx.post(&alice, "hello", &[]).await;
    let article_id = fx.article(&alice, "A title").await;
    assert_eq!(post_id, article_id);

    fx.reactions
        .submit_reaction(alice.id, EntityRef::post(post_id), Vote::Like)
        .await
        .unwrap();

    let article = fx
        .reactions
        .get_reaction_counts(EntityRef::new(EntityKind::Article, article_id), None)
        .await
        .unwrap();
    assert_eq!(article.likes, 0);
}

#[tokio::test]
async fn test_missing_entity_is_not_found() {
    let fx = Fixture::new().await;
    let alice = fx.user("alice").await;

    let result = fx
        .reactions
        .submit_reaction(alice.id, EntityRef::post(404), Vote::Like)
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_unknown_vote_is_rejected_at_parse() {
    assert!(matches!("love".parse::<Vote>(), Err(AppError::Validation(_))));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_fifty_concurrent_users() {
    let fx = Fixture::new().await;
    let owner = fx.user("owner").await;
    let post = EntityRef::post(fx.post(&owner, "popular", &[]).await);

    let mut users = Vec::new();
    for i in 0..50 {
        users.push(fx.user(&format!("user{i}")).await);
    }

    let tasks = users.iter().enumerate().map(|(i, user)| {
        let reactions = fx.reactions.clone();
        let user_id = user.id;
        let vote = if i % 5 == 0 { Vote::Dislike } else { Vote::Like };
        tokio::spawn(async move { reactions.submit_reaction(user_id, post, vote).await })
    });

    for outcome in join_all(tasks).await {
        assert_eq!(outcome.unwrap().unwrap().status, ReactionStatus::Added);
    }

    let counts = fx.reactions.get_reaction_counts(post, None).await.unwrap();
    assert_eq!(counts.likes, 40);
    assert_eq!(counts.dislikes, 10);
    assert_eq!(counts.likes + counts.dislikes, 50);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_same_user_race_never_duplicates() {
    let fx = Fixture::new().await;
    let alice = fx.user("alice").await;
    let post = EntityRef::post(fx.post(&alice, "hello", &[]).await);

    let first = {
        let reactions = fx.reactions.clone();
        tokio::spawn(async move { reactions.submit_reaction(alice.id, post, Vote::Like).await })
    };
    let second = {
        let reactions = fx.reactions.clone();
        tokio::spawn(async move { reactions.submit_reaction(alice.id, post, Vote::Like).await })
    };

    let mut statuses = vec![
        first.await.unwrap().unwrap().status,
        second.await.unwrap().unwrap().status,
    ];
    statuses.sort_by_key(|s| *s as u8);

    assert_eq!(statuses, vec![ReactionStatus::Added, ReactionStatus::Removed]);

    let counts = fx.reactions.get_reaction_counts(post, None).await.unwrap();
    assert_eq!(counts.likes + counts.dislikes, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_take_back_racing_a_flip_keeps_a_vote() {
    let fx = Fixture::new().await;
    let alice = fx.user("alice").await;

    for round in 0..20 {
        let post = EntityRef::post(fx.post(&alice, &format!("round {round}"), &[]).await);
        fx.reactions.submit_reaction(alice.id, post, Vote::Like).await.unwrap();

        let take_back = {
            let reactions = fx.reactions.clone();
            tokio::spawn(async move { reactions.submit_reaction(alice.id, post, Vote::Like).await })
        };
        let flip = {
            let reactions = fx.reactions.clone();
            tokio::spawn(async move { reactions.submit_reaction(alice.id, post, Vote::Dislike).await })
        };

        let take_back = take_back.await.unwrap().unwrap().status;
        let flip = flip.await.unwrap().unwrap().status;
        let counts = fx.reactions.get_reaction_counts(post, Some(alice.id)).await.unwrap();

        // Either the like was taken back and the dislike added, or the dislike
        // landed first and the like flipped it back. Never both gone.
        match (take_back, flip) {
            (ReactionStatus::Removed, ReactionStatus::Added) => {
                assert_eq!(counts.viewer_vote, Some(Vote::Dislike));
            }
            (ReactionStatus::Updated, ReactionStatus::Updated) => {
                assert_eq!(counts.viewer_vote, Some(Vote::Like));
            }
            other => panic!("round {round}: unexpected outcome {other:?}"),
        }
        assert_eq!(counts.likes + counts.dislikes, 1);
    }
}

#[tokio::test]
async fn test_batch_counts_cover_every_id() {
    let fx = Fixture::new().await;
    let alice = fx.user("alice").await;
    let bob = fx.user("bob").await;
    let p1 = fx.post(&alice, "one", &[]).await;
    let p2 = fx.post(&alice, "two", &[]).await;

    fx.reactions.submit_reaction(alice.id, EntityRef::post(p1), Vote::Like).await.unwrap();
    fx.reactions.submit_reaction(bob.id, EntityRef::post(p1), Vote::Dislike).await.unwrap();

    let counts = fx
        .reactions
        .counts_for(EntityKind::Post, &[p1, p2], Some(bob.id))
        .await
        .unwrap();

    assert_eq!(counts[&p1].likes, 1);
    assert_eq!(counts[&p1].dislikes, 1);
    assert_eq!(counts[&p1].viewer_vote, Some(Vote::Dislike));
    assert_eq!(counts[&p2].likes, 0);
    assert_eq!(counts[&p2].viewer_vote, None);
}

#[tokio::test]
async fn test_favorites_list_likes_newest_first() {
    let fx = Fixture::new().await;
    let alice = fx.user("alice").await;
    let bob = fx.user("bob").await;
    let post_id = fx.post(&bob, "a post about lifetimes", &[]).await;
    let article_id = fx.article(&bob, "Borrowing").await;
    let community_id = fx.community("rustaceans", &[(&bob, MemberRole::Member)]).await;

    fx.reactions.submit_reaction(alice.id, EntityRef::post(post_id), Vote::Like).await.unwrap();
    fx.reactions
        .submit_reaction(alice.id, EntityRef::new(EntityKind::Article, article_id), Vote::Dislike)
        .await
        .unwrap();
    fx.reactions
        .submit_reaction(alice.id, EntityRef::new(EntityKind::Community, community_id), Vote::Like)
        .await
        .unwrap();

    let favorites = fx.favorites.list_favorites(alice.id).await.unwrap();

    assert_eq!(favorites.len(), 2);
    assert_eq!(favorites[0].entity_type, EntityKind::Community);
    assert_eq!(favorites[0].details, "1 members");
    assert_eq!(favorites[1].title, "a post about lifetimes");
    assert_eq!(favorites[1].details, "Post by bob · 1 likes");
}
