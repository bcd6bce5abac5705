//! Comment thread assembly.
//!
//! Comments are stored flat, each pointing at an optional parent. [`build_tree`] turns
//! one post's comments into a forest in a single pass; [`AncestorWalk`] tracks an
//! upward walk from a comment to its root and refuses to loop.
//!
//! Nesting is capped at [`MAX_THREAD_DEPTH`] levels so that serializing or dropping a
//! tree never goes deeper than that, however long a reply chain users build.

use std::collections::{HashMap, HashSet};

use agora_common::{AppError, AppResult};
use agora_db::entities::comment;
use serde::Serialize;

/// Anything that can be placed in a comment thread.
pub trait ThreadItem {
    /// The item's own comment ID.
    fn id(&self) -> i32;
    /// The comment this one replies to, if any.
    fn parent_id(&self) -> Option<i32>;
}

impl ThreadItem for comment::Model {
    fn id(&self) -> i32 {
        self.id
    }

    fn parent_id(&self) -> Option<i32> {
        self.parent_comment_id
    }
}

/// Deepest nesting level a built thread reaches. Top-level comments are level 1.
pub const MAX_THREAD_DEPTH: usize = 32;

/// A comment and its replies, in fetch order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentNode<T> {
    #[serde(flatten)]
    pub comment: T,
    pub replies: Vec<CommentNode<T>>,
}

impl<T> Drop for CommentNode<T> {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.replies);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.replies);
        }
    }
}

/// Assemble a reply forest from comments sorted oldest first.
///
/// A comment whose parent has not been placed yet (missing, filtered out or
/// appearing later in the input) is dropped, and with it every reply beneath it.
/// A reply to a comment already at [`MAX_THREAD_DEPTH`] is listed next to that
/// comment instead of under it. Roots and siblings keep input order.
#[must_use]
pub fn build_tree<T: ThreadItem>(items: Vec<T>) -> Vec<CommentNode<T>> {
    let mut slot_of: HashMap<i32, usize> = HashMap::with_capacity(items.len());
    let mut slots: Vec<Option<T>> = Vec::with_capacity(items.len());
    let mut children: Vec<Vec<usize>> = Vec::with_capacity(items.len());
    // Level and attachment point of each placed slot.
    let mut depth: Vec<usize> = Vec::with_capacity(items.len());
    let mut attached_to: Vec<Option<usize>> = Vec::with_capacity(items.len());
    let mut roots = Vec::new();

    for item in items {
        if slot_of.contains_key(&item.id()) {
            continue;
        }

        let parent_slot = match item.parent_id() {
            None => None,
            Some(parent_id) => match slot_of.get(&parent_id) {
                Some(&slot) if depth[slot] >= MAX_THREAD_DEPTH => attached_to[slot],
                Some(&slot) => Some(slot),
                None => continue,
            },
        };

        let slot = slots.len();
        slot_of.insert(item.id(), slot);
        slots.push(Some(item));
        children.push(Vec::new());
        depth.push(parent_slot.map_or(1, |parent| depth[parent] + 1));
        attached_to.push(parent_slot);

        match parent_slot {
            Some(parent) => children[parent].push(slot),
            None => roots.push(slot),
        }
    }

    // A reply always lands in a later slot than its parent, so walking the arena
    // backwards finishes every child before the node that owns it.
    let mut built: Vec<Option<CommentNode<T>>> = (0..slots.len()).map(|_| None).collect();
    for slot in (0..slots.len()).rev() {
        let replies = children[slot]
            .iter()
            .filter_map(|&child| built[child].take())
            .collect();
        if let Some(comment) = slots[slot].take() {
            built[slot] = Some(CommentNode { comment, replies });
        }
    }

    roots
        .into_iter()
        .filter_map(|slot| built[slot].take())
        .collect()
}

/// Upward walk from a comment to the root of its thread.
#[derive(Debug, Default)]
pub struct AncestorWalk {
    visited: HashSet<i32>,
    chain: Vec<comment::Model>,
}

impl AncestorWalk {
    /// Start an empty walk.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the next comment on the way up.
    ///
    /// Returns the parent to fetch next, or `None` once a root has been reached.
    /// Meeting a comment twice means the parent links form a cycle.
    pub fn visit(&mut self, comment: comment::Model) -> AppResult<Option<i32>> {
        if !self.visited.insert(comment.id) {
            return Err(AppError::DataIntegrity(format!(
                "Comment {} appears twice in its own ancestry",
                comment.id
            )));
        }

        let parent = comment.parent_comment_id;
        if let Some(parent_id) = parent {
            if self.visited.contains(&parent_id) {
                return Err(AppError::DataIntegrity(format!(
                    "Comment {} has a cyclic parent link to {parent_id}",
                    comment.id
                )));
            }
        }

        self.chain.push(comment);
        Ok(parent)
    }

    /// The comment most recently visited.
    #[must_use]
    pub fn last_id(&self) -> Option<i32> {
        self.chain.last().map(|c| c.id)
    }

    /// Finish the walk: root first, starting comment last.
    #[must_use]
    pub fn into_chain(self) -> Vec<comment::Model> {
        let mut chain = self.chain;
        chain.reverse();
        chain
    }
}
