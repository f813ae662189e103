use std::rc::{Rc, Weak};

use super::node::*;
use super::{upgrade, AvlTree};
use crate::{CheckError, Key};

impl<V> AvlTree<V> {
    /// Validates the whole tree: key order, ranks and their gaps, subtree
    /// sizes, parent links and the cached extrema.  Takes time linear in the
    /// size of the tree.
    ///
    /// The tree's own operations never produce a tree that fails this; it
    /// is meant for tests.
    pub fn check(&self) -> Result<(), CheckError> {
        if let Some(root) = &self.root {
            if parent(root).is_some() {
                return Err(CheckError::RootParent(key(root)));
            }
        }
        chk_subtree(&self.root, None, None)?;

        let first = self.root.as_ref().map(leftmost);
        if !same_node(&first, &upgrade(&self.min)) {
            return Err(CheckError::StaleMin);
        }
        let last = self.root.as_ref().map(rightmost);
        if !same_node(&last, &upgrade(&self.max)) {
            return Err(CheckError::StaleMax);
        }
        Ok(())
    }
}

fn same_node<V>(a: &OptLink<V>, b: &OptLink<V>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => Rc::ptr_eq(a, b),
        _ => false,
    }
}

// Returns the subtree's size and rank.  Keys must lie strictly inside
// (lo, hi).
fn chk_subtree<V>(
    opt_node: &OptLink<V>,
    lo: Option<Key>,
    hi: Option<Key>,
) -> Result<(usize, i32), CheckError> {
    let Some(rc) = opt_node else {
        return Ok((0, -1));
    };

    let n = rc.borrow();
    if lo.is_some_and(|lo| n.key <= lo) || hi.is_some_and(|hi| n.key >= hi) {
        return Err(CheckError::Order(n.key));
    }

    for c in [&n.left, &n.right].into_iter().flatten() {
        let back = c.borrow().parent.as_ref().and_then(Weak::upgrade);
        if !back.is_some_and(|p| Rc::ptr_eq(&p, rc)) {
            return Err(CheckError::ParentLink(c.borrow().key));
        }
    }

    let (lsize, lrank) = chk_subtree(&n.left, lo, Some(n.key))?;
    let (rsize, rrank) = chk_subtree(&n.right, Some(n.key), hi)?;

    let expected = 1 + lrank.max(rrank);
    if n.rank != expected {
        return Err(CheckError::Rank {
            key: n.key,
            rank: n.rank,
            expected,
        });
    }

    let (left, right) = (n.rank - lrank, n.rank - rrank);
    if !(1..=2).contains(&left) || !(1..=2).contains(&right) {
        return Err(CheckError::Gap {
            key: n.key,
            left,
            right,
        });
    }

    let expected = 1 + lsize + rsize;
    if n.size != expected {
        return Err(CheckError::Size {
            key: n.key,
            size: n.size,
            expected,
        });
    }

    Ok((n.size, n.rank))
}
