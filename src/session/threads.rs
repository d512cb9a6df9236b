//! Inline comment threads.

use std::collections::HashMap;

use crate::github::models::ReviewComment;

/// Comments anchored at one position of a file, in posting order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineCommentThread {
    /// File the thread is anchored to.
    pub path: String,
    /// Line of the root comment, when GitHub still maps it onto the diff.
    pub line: Option<u32>,
    /// Root comment followed by its replies.
    pub comments: Vec<ReviewComment>,
}

impl InlineCommentThread {
    /// Returns true when any comment belongs to `review_id`.
    #[must_use]
    pub fn belongs_to_review(&self, review_id: u64) -> bool {
        self.comments
            .iter()
            .any(|comment| comment.review_id == review_id)
    }
}

/// Groups comments into threads by following `in_reply_to` links back to a
/// root comment.
///
/// Threads keep the order in which their roots first appear. A reply whose
/// parent is missing starts its own thread.
#[must_use]
pub fn group_threads(comments: &[ReviewComment]) -> Vec<InlineCommentThread> {
    let by_id: HashMap<u64, &ReviewComment> =
        comments.iter().map(|comment| (comment.id, comment)).collect();
    let mut order = Vec::new();
    let mut threads: HashMap<u64, InlineCommentThread> = HashMap::new();

    for comment in comments {
        let root = root_of(comment, &by_id);
        threads
            .entry(root.id)
            .or_insert_with(|| {
                order.push(root.id);
                InlineCommentThread {
                    path: root.path.clone(),
                    line: root.line,
                    comments: Vec::new(),
                }
            })
            .comments
            .push(comment.clone());
    }

    order
        .into_iter()
        .filter_map(|root_id| threads.remove(&root_id))
        .collect()
}

fn root_of<'comments>(
    comment: &'comments ReviewComment,
    by_id: &HashMap<u64, &'comments ReviewComment>,
) -> &'comments ReviewComment {
    let mut current = comment;
    let mut hops = 0_usize;
    // Bounded so a malformed reply cycle cannot loop forever.
    while hops < by_id.len() {
        let Some(parent) = current
            .in_reply_to_id
            .and_then(|parent_id| by_id.get(&parent_id).copied())
        else {
            break;
        };
        current = parent;
        hops = hops.saturating_add(1);
    }
    current
}
