//! Comment trees and ancestor chains against a real (in-memory `SQLite`) schema.

#![allow(clippy::unwrap_used)]

mod common;

use agora_common::AppError;
use agora_core::{CommentNode, CommentView, CreateCommentInput, MAX_THREAD_DEPTH};
use agora_db::{EntityRef, entities::reaction::Vote};
use common::Fixture;

fn ids(nodes: &[CommentNode<CommentView>]) -> Vec<i32> {
    nodes.iter().map(|n| n.comment.id).collect()
}

#[tokio::test]
async fn test_tree_and_chain() {
    let fx = Fixture::new().await;
    let alice = fx.user("alice").await;
    let bob = fx.user("bob").await;
    let post_id = fx.post(&alice, "root post", &[]).await;

    // 1 <- 2 <- 4, 1 <- 3
    let c1 = fx.comment(&alice, post_id, None).await;
    let c2 = fx.comment(&bob, post_id, Some(c1)).await;
    let c3 = fx.comment(&alice, post_id, Some(c1)).await;
    let c4 = fx.comment(&bob, post_id, Some(c2)).await;

    let tree = fx.comments.comment_tree(post_id, None).await.unwrap();
    assert_eq!(ids(&tree), vec![c1]);
    assert_eq!(ids(&tree[0].replies), vec![c2, c3]);
    assert_eq!(ids(&tree[0].replies[0].replies), vec![c4]);
    assert!(tree[0].replies[1].replies.is_empty());
    assert_eq!(tree[0].comment.reply_count, 2);
    assert_eq!(tree[0].comment.username, "alice");

    let chain: Vec<i32> = fx
        .comments
        .ancestor_chain(c4)
        .await
        .unwrap()
        .iter()
        .map(|c| c.id)
        .collect();
    assert_eq!(chain, vec![c1, c2, c4]);

    let root_only = fx.comments.ancestor_chain(c1).await.unwrap();
    assert_eq!(root_only.len(), 1);
}

#[tokio::test]
async fn test_post_detail_embeds_thread() {
    let fx = Fixture::new().await;
    let alice = fx.user("alice").await;
    let post_id = fx.post(&alice, "root post", &["rust"]).await;
    let c1 = fx.comment(&alice, post_id, None).await;
    fx.comment(&alice, post_id, Some(c1)).await;

    let detail = fx.posts.get_post(post_id, Some(alice.id)).await.unwrap();

    assert_eq!(detail.post.comments, 2);
    assert_eq!(detail.post.hashtags, vec!["rust".to_string()]);
    assert_eq!(detail.thread.len(), 1);
    assert_eq!(detail.thread[0].replies.len(), 1);
}

#[tokio::test]
async fn test_cycle_is_data_integrity_error() {
    let fx = Fixture::new().await;
    let alice = fx.user("alice").await;
    let post_id = fx.post(&alice, "root post", &[]).await;
    let c1 = fx.comment(&alice, post_id, None).await;
    let c2 = fx.comment(&alice, post_id, Some(c1)).await;

    fx.db
        .execute_raw(&format!(
            "UPDATE comment SET parent_comment_id = {c2} WHERE id = {c1}"
        ))
        .await
        .unwrap();

    let result = fx.comments.ancestor_chain(c2).await;
    assert!(matches!(result, Err(AppError::DataIntegrity(_))));

    // Neither comment has a reachable root, so the tree is empty.
    let tree = fx.comments.comment_tree(post_id, None).await.unwrap();
    assert!(tree.is_empty());
}

#[tokio::test]
async fn test_dangling_parent() {
    let fx = Fixture::new().await;
    let alice = fx.user("alice").await;
    let post_id = fx.post(&alice, "root post", &[]).await;
    let c1 = fx.comment(&alice, post_id, None).await;
    let c2 = fx.comment(&alice, post_id, None).await;

    fx.allow_dangling_links().await;
    fx.db
        .execute_raw(&format!(
            "UPDATE comment SET parent_comment_id = 999 WHERE id = {c2}"
        ))
        .await
        .unwrap();

    let tree = fx.comments.comment_tree(post_id, None).await.unwrap();
    assert_eq!(ids(&tree), vec![c1]);

    let result = fx.comments.ancestor_chain(c2).await;
    assert!(matches!(result, Err(AppError::DataIntegrity(msg)) if msg.contains("999")));
}

#[tokio::test]
async fn test_missing_comment_and_post() {
    let fx = Fixture::new().await;

    assert!(matches!(
        fx.comments.ancestor_chain(42).await,
        Err(AppError::CommentNotFound(42))
    ));
    assert!(matches!(
        fx.comments.comment_tree(42, None).await,
        Err(AppError::PostNotFound(42))
    ));
}

#[tokio::test]
async fn test_reply_must_stay_on_its_post() {
    let fx = Fixture::new().await;
    let alice = fx.user("alice").await;
    let first = fx.post(&alice, "first", &[]).await;
    let second = fx.post(&alice, "second", &[]).await;
    let parent = fx.comment(&alice, first, None).await;

    let result = fx
        .comments
        .create_comment(
            &alice,
            second,
            CreateCommentInput {
                body: "wrong thread".to_string(),
                parent_comment_id: Some(parent),
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn test_deleting_comment_removes_replies() {
    let fx = Fixture::new().await;
    let alice = fx.user("alice").await;
    let bob = fx.user("bob").await;
    let post_id = fx.post(&alice, "root post", &[]).await;
    let c1 = fx.comment(&alice, post_id, None).await;
    let c2 = fx.comment(&bob, post_id, Some(c1)).await;

    assert!(matches!(
        fx.comments.delete_comment(bob.id, c1).await,
        Err(AppError::Forbidden(_))
    ));

    fx.comments.delete_comment(alice.id, c1).await.unwrap();

    assert!(fx.comments.comment_tree(post_id, None).await.unwrap().is_empty());
    assert!(matches!(
        fx.comments.get_comment(c2, None).await,
        Err(AppError::CommentNotFound(_))
    ));
}

#[tokio::test]
async fn test_deleting_comment_drops_subtree_reactions() {
    let fx = Fixture::new().await;
    let alice = fx.user("alice").await;
    let carol = fx.user("carol").await;
    let post_id = fx.post(&alice, "root post", &[]).await;
    let c1 = fx.comment(&alice, post_id, None).await;
    let c2 = fx.comment(&alice, post_id, Some(c1)).await;
    let c3 = fx.comment(&alice, post_id, Some(c2)).await;
    let sibling = fx.comment(&alice, post_id, None).await;

    for id in [c1, c2, c3, sibling] {
        fx.reactions
            .submit_reaction(carol.id, EntityRef::comment(id), Vote::Like)
            .await
            .unwrap();
    }
    fx.reactions
        .submit_reaction(carol.id, EntityRef::post(post_id), Vote::Like)
        .await
        .unwrap();

    fx.comments.delete_comment(alice.id, c1).await.unwrap();

    // The sibling comment and the post keep their likes.
    assert_eq!(fx.user_service.get_me(&carol).await.unwrap().stats.likes_given, 2);
    let counts = fx
        .reactions
        .get_reaction_counts(EntityRef::comment(sibling), None)
        .await
        .unwrap();
    assert_eq!(counts.likes, 1);
}

#[tokio::test]
async fn test_long_reply_chain_is_capped_in_the_tree() {
    let fx = Fixture::new().await;
    let alice = fx.user("alice").await;
    let post_id = fx.post(&alice, "root post", &[]).await;

    let mut parent = None;
    let mut last = 0;
    for _ in 0..MAX_THREAD_DEPTH + 5 {
        last = fx.comment(&alice, post_id, parent).await;
        parent = Some(last);
    }

    let detail = fx.posts.get_post(post_id, None).await.unwrap();

    let mut node = &detail.thread[0];
    let mut level = 1;
    while node.replies.len() == 1 {
        node = &node.replies[0];
        level += 1;
    }
    assert_eq!(level, MAX_THREAD_DEPTH - 1);
    assert_eq!(node.replies.len(), 6);
    assert_eq!(node.replies.last().unwrap().comment.id, last);
    assert!(node.replies.iter().all(|r| r.replies.is_empty()));

    // The ancestor chain still reports the full, unflattened ancestry.
    let chain = fx.comments.ancestor_chain(last).await.unwrap();
    assert_eq!(chain.len(), MAX_THREAD_DEPTH + 5);
}

#[tokio::test]
async fn test_comment_notifications() {
    let fx = Fixture::new().await;
    let alice = fx.user("alice").await;
    let bob = fx.user("bob").await;
    let carol = fx.user("carol").await;
    let post_id = fx.post(&alice, "root post", &[]).await;

    // Commenting on your own post notifies nobody.
    fx.comment(&alice, post_id, None).await;
    assert_eq!(fx.notifications.count_unread(alice.id).await.unwrap(), 0);

    let c_bob = fx.comment(&bob, post_id, None).await;
    fx.comment(&carol, post_id, Some(c_bob)).await;

    assert_eq!(fx.notifications.count_unread(alice.id).await.unwrap(), 2);
    assert_eq!(fx.notifications.count_unread(bob.id).await.unwrap(), 1);
    assert_eq!(fx.notifications.count_unread(carol.id).await.unwrap(), 0);

    let bob_inbox = fx.notifications.list(bob.id, 10, None, false).await.unwrap();
    assert_eq!(bob_inbox.len(), 1);
    assert_eq!(bob_inbox[0].actor_id, Some(carol.id));

    assert!(fx.notifications.mark_as_read(bob.id, bob_inbox[0].id).await.unwrap());
    assert!(!fx.notifications.mark_as_read(bob.id, bob_inbox[0].id).await.unwrap());
    assert!(matches!(
        fx.notifications.mark_as_read(alice.id, bob_inbox[0].id).await,
        Err(AppError::NotFound(_))
    ));

    assert_eq!(fx.notifications.mark_all_as_read(alice.id).await.unwrap(), 2);
    assert_eq!(fx.notifications.count_unread(alice.id).await.unwrap(), 0);
}
