use std::cmp::Ordering::*;
use std::mem::{swap, take};

use log::debug;

use super::insert::{fix_join_seam, rebalance_after_insert};
use super::node::*;
use super::AvlTree;
use crate::{AvlError, Key};

impl<V> AvlTree<V> {
    // Wraps a detached subtree.  The extrema are left unset; callers that
    // hand the tree out must refresh them.
    fn from_subtree(root: OptLink<V>) -> Self {
        AvlTree {
            root,
            min: None,
            max: None,
        }
    }

    /// Merges `other` into this tree with a new entry `(k, val)` between
    /// them, and returns the join cost: the difference between the two
    /// trees' ranks plus one.
    ///
    /// All keys of one tree must be below `k` and all keys of the other
    /// above it; either tree may be the lower one, and either may be empty.
    /// On failure neither tree is changed (`other` is dropped).
    ///
    /// # Examples
    /// ```
    /// use avl_rank_tree::AvlTree;
    ///
    /// let mut lo = AvlTree::new();
    /// lo.insert(1, "one").unwrap();
    /// let mut hi = AvlTree::new();
    /// hi.insert(3, "three").unwrap();
    ///
    /// assert_eq!(hi.join(2, "two", lo), Ok(1));
    /// assert_eq!(hi.keys_in_order(), vec![1, 2, 3]);
    /// assert_eq!(hi.min(), Some("one"));
    /// ```
    pub fn join(
        &mut self,
        k: Key,
        val: V,
        other: AvlTree<V>,
    ) -> Result<usize, AvlError> {
        if !self.separates(k, &other) {
            return Err(AvlError::UnorderedJoin(k));
        }

        let cost = self.join_node(Node::new_link(k, val), other);
        chk_tree!(self);
        Ok(cost)
    }

    // Tests that `k` lies strictly between the keys of `self` and `other`,
    // in either order.
    fn separates(&self, k: Key, other: &AvlTree<V>) -> bool {
        let below = |t: &AvlTree<V>| t.max_key().map_or(true, |m| m < k);
        let above = |t: &AvlTree<V>| t.min_key().map_or(true, |m| k < m);
        (below(self) && above(other)) || (below(other) && above(self))
    }

    // Joins with `x` as the separator.  `x` must be a detached node with rank
    // 0, size 1 and no children, and its key must separate the two trees.
    // The min and max caches are only right if both inputs' were.
    fn join_node(&mut self, x: Link<V>, mut other: AvlTree<V>) -> usize {
        let cost =
            (rank(&self.root) - rank(&other.root)).unsigned_abs() as usize + 1;
        let k = key(&x);

        if self.root.is_none() || other.root.is_none() {
            if self.root.is_none() {
                swap(self, &mut other);
            }
            let inserted = self.attach(x);
            debug_assert!(inserted.is_some(), "join separator {k} is present");
            debug!("joined at {k} with an empty tree, cost {cost}");
            return cost;
        }

        let mine = self.root.take().expect("checked non-empty");
        let theirs = other.root.take().expect("checked non-empty");
        let (lo, hi, min, max) = if key(&mine) < k {
            (mine, theirs, self.min.take(), other.max.take())
        } else {
            (theirs, mine, other.min.take(), self.max.take())
        };

        let (lo_rank, hi_rank) = (lo.borrow().rank, hi.borrow().rank);
        let root = match lo_rank.cmp(&hi_rank) {
            Less => {
                hang_on_spine(&hi, &x, lo, Side::Left);
                hi
            }
            Greater => {
                hang_on_spine(&lo, &x, hi, Side::Right);
                lo
            }
            Equal => {
                set_child(&x, Side::Left, Some(lo));
                set_child(&x, Side::Right, Some(hi));
                x.clone()
            }
        };
        reset_rank(&x);
        update_size(&x);
        self.root = Some(root);

        fix_join_seam(&x, &mut self.root);
        rebalance_after_insert(&x, &mut self.root);
        update_sizes_to_root(&x);
        self.min = min;
        self.max = max;

        debug!("joined at {k}, cost {cost}");
        cost
    }

    /// Splits the tree at `k`, which must be present, into the entries below
    /// `k` and the entries above it.  The entry for `k` itself is dropped
    /// and this tree is left empty.  If `k` is absent the tree is unchanged.
    ///
    /// The summed cost of the joins it performs is only logged, at debug
    /// level.
    ///
    /// # Examples
    /// ```
    /// use avl_rank_tree::AvlTree;
    ///
    /// let mut t = AvlTree::new();
    /// for k in 1..=7 {
    ///     t.insert(k, k * k).unwrap();
    /// }
    ///
    /// let (lo, hi) = t.split(4).unwrap();
    /// assert_eq!(lo.keys_in_order(), vec![1, 2, 3]);
    /// assert_eq!(hi.keys_in_order(), vec![5, 6, 7]);
    /// assert_eq!(hi.min(), Some(25));
    /// assert!(t.is_empty());
    /// ```
    pub fn split(&mut self, k: Key) -> Result<(Self, Self), AvlError> {
        let x = find(&self.root, k).ok_or(AvlError::SplitKeyMissing(k))?;
        // keeps the ancestors alive while they are taken apart
        let source = take(self);

        let mut lower = AvlTree::from_subtree(take_child(&x, Side::Left));
        let mut upper = AvlTree::from_subtree(take_child(&x, Side::Right));
        let mut cost = 0;

        // Each ancestor becomes the separator joining its other subtree onto
        // the side of the split it belongs to.  Its link to the child we came
        // from is dropped without touching that child, which by then belongs
        // to one of the results.
        let mut up = step_up(&x);
        while let Some((anc, from)) = up {
            up = step_up(&anc);

            anc.borrow_mut().unlink(from);
            let piece = AvlTree::from_subtree(take_child(&anc, from.flip()));
            {
                let mut n = anc.borrow_mut();
                n.parent = None;
                n.rank = 0;
                n.size = 1;
            }

            cost += match from {
                Side::Right => lower.join_node(anc, piece),
                Side::Left => upper.join_node(anc, piece),
            };
        }

        drop(source);
        lower.refresh_extrema();
        upper.refresh_extrema();
        debug!("split at {k}, total join cost {cost}");

        chk_tree!(lower);
        chk_tree!(upper);
        Ok((lower, upper))
    }
}

// The parent of `n` and the side `n` hangs on.
fn step_up<V>(n: &Link<V>) -> Option<(Link<V>, Side)> {
    parent(n).map(|p| {
        let side = side_of(&p, n);
        (p, side)
    })
}

// Descends the `side` spine of `tall` to the first node whose `side` child
// is no taller than `short`, and hangs `x` there with that child on its
// inner side and `short` on its outer side.
fn hang_on_spine<V>(tall: &Link<V>, x: &Link<V>, short: Link<V>, side: Side) {
    let target = short.borrow().rank;
    let mut tmp = tall.clone();
    while let Some(c) = child(&tmp, side).filter(|c| c.borrow().rank > target)
    {
        tmp = c;
    }

    set_child(x, side.flip(), child(&tmp, side));
    set_child(&tmp, side, Some(x.clone()));
    set_child(x, side, Some(short));
}

fn reset_rank<V>(x: &Link<V>) {
    let r = 1 + rank(&left(x)).max(rank(&right(x)));
    x.borrow_mut().rank = r;
}
