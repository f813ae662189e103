//! # A rank-balanced AVL tree with split and join
//!
//! `avl-rank-tree` provides [`AvlTree`], an ordered map from `i64` keys to
//! arbitrary values.  Each node stores its rank, which equals its height, and
//! the size of its subtree, and the tree caches its minimum and maximum.
//!
//! Beyond search, insert and delete, the tree can be [split](AvlTree::split)
//! around a key and two trees can be [joined](AvlTree::join) around a new
//! separating entry, both in logarithmic time.  Insert, delete and join
//! report the work they did as a count of rebalancing operations, which
//! makes the tree handy for studying amortized rebalancing costs.
//!
//! ```
//! use avl_rank_tree::AvlTree;
//!
//! let mut t = AvlTree::new();
//! for k in [10, 20, 30] {
//!     t.insert(k, k.to_string()).unwrap();
//! }
//! assert_eq!(t.root().key(), Some(20));
//! assert_eq!(t.keys_in_order(), vec![10, 20, 30]);
//! ```

/// The key type of [`AvlTree`].  Every value, including -1, is a valid key.
pub type Key = i64;

mod avl;
pub use avl::{AvlTree, NodeRef};

mod error;
pub use error::{AvlError, CheckError};

pub mod print;
