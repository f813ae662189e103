use thiserror::Error;

use crate::Key;

/// Failures reported by the mutating operations of
/// [`AvlTree`](crate::AvlTree).
///
/// Every failing call leaves the tree exactly as it was.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AvlError {
    /// `insert` was given a key the tree already holds.
    #[error("key {0} is already in the tree")]
    DuplicateKey(Key),

    /// `delete` was given a key the tree does not hold.
    #[error("key {0} is not in the tree")]
    KeyNotFound(Key),

    /// `split` requires its key to be present.
    #[error("cannot split on key {0}: it is not in the tree")]
    SplitKeyMissing(Key),

    /// `join` requires the separator to divide the two trees.
    #[error("separator {0} does not divide the keys of the joined trees")]
    UnorderedJoin(Key),
}

impl AvlError {
    /// Returns true for errors caused by a broken caller contract rather than
    /// by a lookup miss or hit.
    pub fn is_precondition_violation(&self) -> bool {
        matches!(self, Self::SplitKeyMissing(_) | Self::UnorderedJoin(_))
    }
}

/// An invariant violation found by [`AvlTree::check`](crate::AvlTree::check).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CheckError {
    #[error("key {0} is out of order")]
    Order(Key),

    #[error("node {key} has rank {rank}, expected {expected}")]
    Rank { key: Key, rank: i32, expected: i32 },

    #[error("node {key} has rank gaps ({left}, {right})")]
    Gap { key: Key, left: i32, right: i32 },

    #[error("node {key} records size {size}, expected {expected}")]
    Size {
        key: Key,
        size: usize,
        expected: usize,
    },

    #[error("node {0} does not link back to its parent")]
    ParentLink(Key),

    #[error("root node {0} has a parent")]
    RootParent(Key),

    #[error("cached minimum is stale")]
    StaleMin,

    #[error("cached maximum is stale")]
    StaleMax,
}
