//! Errors raised by the tree and the priority queue.
//!
//! Note that a missing key is *not* an error. Searching for or deleting a key that isn't in a
//! non-empty tree yields `Ok(None)`.

/// Errors returned by [`Tree`][crate::avlg::Tree].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// The requested maximum imbalance was less than 1. No tree is produced.
    #[error("invalid max imbalance {0}: an AVL-G tree needs G >= 1")]
    InvalidBalance(isize),
    /// `search`, `delete`, or `root` was called on a tree with no keys.
    #[error("tree is empty")]
    EmptyTree,
}

/// Errors returned by [`MinHeapPriorityQueue`][crate::priority_queue::MinHeapPriorityQueue].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum QueueError {
    /// Priorities start at 1.
    #[error("invalid priority {0}: priorities must be at least 1")]
    InvalidPriority(i64),
    /// `dequeue` or `first` was called on an empty queue.
    #[error("priority queue is empty")]
    EmptyQueue,
}

/// Result alias for tree operations.
pub type Result<T, E = TreeError> = std::result::Result<T, E>;
