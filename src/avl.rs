#![warn(missing_docs)]
use std::fmt::{Debug, Formatter};
use std::mem::swap;
use std::rc::{Rc, Weak};

use crate::{AvlError, Key};

#[cfg(test)]
macro_rules! chk_tree {
    ( $x:expr ) => {{
        if let Err(e) = $x.check() {
            panic!("invariant violated: {e}");
        }
    }};
}

#[cfg(not(test))]
macro_rules! chk_tree {
    ( $x:expr ) => {{
        let _ = &$x;
    }};
}

mod check;
mod delete;
mod insert;
mod join;
mod node;
mod node_ref;
mod rotate;

use delete::rebalance_after_delete;
use insert::rebalance_after_insert;
use node::*;
pub use node_ref::NodeRef;

/// A rank-balanced (AVL) search tree from integer keys to values.
///
/// Every node carries a rank equal to its height; the ranks of a node's two
/// children each lie one or two below its own.  Nodes also record the size of
/// their subtree, and the tree caches its minimum and maximum, so `size`,
/// `min` and `max` are constant time.
///
/// Besides the usual map operations the tree supports [`split`] and
/// [`join`], both logarithmic.  Mutating operations report how many
/// rebalancing operations they performed:
///
/// | step                                    | charge |
/// |-----------------------------------------|--------|
/// | promotion or demotion                   | 1      |
/// | insert: demote + single rotation        | 2      |
/// | insert: three rank changes + double rot | 5      |
/// | delete: single rotation with its ranks  | 3      |
/// | delete: double rotation with its ranks  | 6      |
///
/// [`split`]: AvlTree::split
/// [`join`]: AvlTree::join
pub struct AvlTree<V> {
    root: OptLink<V>,
    min: Option<WeakLink<V>>,
    max: Option<WeakLink<V>>,
}

impl<V: Debug> Debug for AvlTree<V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.root {
            None => f.write_str("AvlTree(EMPTY)"),
            Some(_) => {
                f.write_fmt(format_args!("AvlTree(#{}, ", self.size()))?;
                fmt_subtree(&self.root, f)?;
                f.write_str(")")
            }
        }
    }
}

fn fmt_subtree<V: Debug>(
    opt_node: &OptLink<V>,
    f: &mut Formatter<'_>,
) -> std::fmt::Result {
    let Some(rc) = opt_node else {
        return f.write_str(".");
    };

    let n = rc.borrow();
    f.write_fmt(format_args!("(rk: {} {{{}: {:?}}} ", n.rank, n.key, n.val))?;
    fmt_subtree(&n.left, f)?;
    f.write_str(" ")?;
    fmt_subtree(&n.right, f)?;
    f.write_str(")")
}

impl<V> Default for AvlTree<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> AvlTree<V> {
    /// Creates a new, empty tree.
    ///
    /// # Examples
    /// ```
    /// use avl_rank_tree::AvlTree;
    /// let t: AvlTree<&str> = AvlTree::new();
    /// assert!(t.is_empty());
    /// ```
    pub fn new() -> Self {
        AvlTree {
            root: None,
            min: None,
            max: None,
        }
    }

    /// Returns true if the tree holds no entries.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the number of entries in the tree.
    pub fn size(&self) -> usize {
        size(&self.root)
    }

    /// Returns a read-only handle on the root, virtual if the tree is empty.
    pub fn root(&self) -> NodeRef<'_, V> {
        NodeRef::new(self.root.clone())
    }

    /// Tests if the tree holds an entry for `k`.
    pub fn contains_key(&self, k: Key) -> bool {
        find(&self.root, k).is_some()
    }

    /// Returns the smallest key, or None if the tree is empty.
    pub fn min_key(&self) -> Option<Key> {
        upgrade(&self.min).map(|n| key(&n))
    }

    /// Returns the greatest key, or None if the tree is empty.
    pub fn max_key(&self) -> Option<Key> {
        upgrade(&self.max).map(|n| key(&n))
    }

    /// Inserts an entry and returns the number of rebalancing operations it
    /// took.  Fails without touching the tree if `k` is already present.
    ///
    /// # Examples
    /// ```
    /// use avl_rank_tree::{AvlError, AvlTree};
    ///
    /// let mut t = AvlTree::new();
    /// assert_eq!(t.insert(10, "a"), Ok(0));
    /// // promoting 10 reaches the root, which is free
    /// assert_eq!(t.insert(20, "b"), Ok(0));
    /// // promoting 20 unbalances 10: demote it and rotate
    /// assert_eq!(t.insert(30, "c"), Ok(3));
    /// assert_eq!(t.insert(20, "d"), Err(AvlError::DuplicateKey(20)));
    /// assert_eq!(t.search(20), Some("b"));
    /// ```
    pub fn insert(&mut self, k: Key, val: V) -> Result<usize, AvlError> {
        let ops = self
            .attach(Node::new_link(k, val))
            .ok_or(AvlError::DuplicateKey(k))?;
        chk_tree!(self);
        Ok(ops)
    }

    /// Deletes the entry for `k` and returns the number of rebalancing
    /// operations it took.  Fails without touching the tree if `k` is absent.
    ///
    /// # Examples
    /// ```
    /// use avl_rank_tree::{AvlError, AvlTree};
    ///
    /// let mut t = AvlTree::new();
    /// t.insert(1, 'x').unwrap();
    /// assert_eq!(t.delete(1), Ok(0));
    /// assert_eq!(t.delete(1), Err(AvlError::KeyNotFound(1)));
    /// assert!(t.is_empty());
    /// ```
    pub fn delete(&mut self, k: Key) -> Result<usize, AvlError> {
        let x = find(&self.root, k).ok_or(AvlError::KeyNotFound(k))?;

        // a binary node trades places with its successor, which has at most
        // one child
        let target = match (left(&x), right(&x)) {
            (Some(_), Some(_)) => {
                let succ = successor(&x).expect("a binary node has a successor");
                {
                    let mut xn = x.borrow_mut();
                    let mut sn = succ.borrow_mut();
                    xn.key = sn.key;
                    swap(&mut xn.val, &mut sn.val);
                }
                succ
            }
            _ => x,
        };

        let p = parent(&target);
        let c = left(&target).or_else(|| right(&target));
        replace_in_parent(&p, &target, c.clone());
        if p.is_none() {
            self.root = c;
        }

        let ops = rebalance_after_delete(p, &mut self.root);
        self.refresh_extrema();
        chk_tree!(self);
        Ok(ops)
    }

    /// Returns the keys in increasing order.
    pub fn keys_in_order(&self) -> Vec<Key> {
        let mut keys = Vec::with_capacity(self.size());
        self.for_each_node(|n| keys.push(n.key));
        keys
    }

    // Visits the nodes in key order without recursion.
    fn for_each_node<F: FnMut(&Node<V>)>(&self, mut f: F) {
        let mut work: Vec<Link<V>> = Vec::new();
        let mut curr = self.root.clone();
        loop {
            if let Some(rc) = curr {
                curr = left(&rc);
                work.push(rc);
            } else if let Some(rc) = work.pop() {
                f(&rc.borrow());
                curr = right(&rc);
            } else {
                break;
            }
        }
    }

    // Hangs a detached node in its place and rebalances.  Returns None, and
    // drops the node, if its key is already present.
    fn attach(&mut self, n: Link<V>) -> Option<usize> {
        let k = key(&n);
        let Some(root) = self.root.clone() else {
            self.min = Some(Rc::downgrade(&n));
            self.max = Some(Rc::downgrade(&n));
            self.root = Some(n);
            return Some(0);
        };

        let (p, side) = match find_slot(&root, k) {
            Slot::Occupied => return None,
            Slot::Vacant { parent, side } => (parent, side),
        };

        // hanging a leaf under a node that already has a child never breaks
        // the rank rule
        let was_leaf = p.borrow().rank == 0;
        set_child(&p, side, Some(n.clone()));
        let ops = if was_leaf {
            rebalance_after_insert(&n, &mut self.root)
        } else {
            0
        };

        update_sizes_to_root(&n);
        if self.min_key().map_or(true, |m| k < m) {
            self.min = Some(Rc::downgrade(&n));
        }
        if self.max_key().map_or(true, |m| m < k) {
            self.max = Some(Rc::downgrade(&n));
        }
        Some(ops)
    }

    fn refresh_extrema(&mut self) {
        self.min = self.root.as_ref().map(|r| Rc::downgrade(&leftmost(r)));
        self.max = self.root.as_ref().map(|r| Rc::downgrade(&rightmost(r)));
    }
}

impl<V: Clone> AvlTree<V> {
    /// Returns the value stored under `k`.
    ///
    /// # Examples
    /// ```
    /// use avl_rank_tree::AvlTree;
    ///
    /// let mut t = AvlTree::new();
    /// t.insert(-1, "minus one").unwrap();
    /// assert_eq!(t.search(-1), Some("minus one"));
    /// assert_eq!(t.search(0), None);
    /// ```
    pub fn search(&self, k: Key) -> Option<V> {
        find(&self.root, k).map(|n| n.borrow().val.clone())
    }

    /// Returns the value of the smallest key, or None if the tree is empty.
    pub fn min(&self) -> Option<V> {
        upgrade(&self.min).map(|n| n.borrow().val.clone())
    }

    /// Returns the value of the greatest key, or None if the tree is empty.
    pub fn max(&self) -> Option<V> {
        upgrade(&self.max).map(|n| n.borrow().val.clone())
    }

    /// Returns the values ordered by their keys, index for index with
    /// [`keys_in_order`](AvlTree::keys_in_order).
    pub fn values_in_order(&self) -> Vec<V> {
        let mut vals = Vec::with_capacity(self.size());
        self.for_each_node(|n| vals.push(n.val.clone()));
        vals
    }
}

fn upgrade<V>(cached: &Option<WeakLink<V>>) -> OptLink<V> {
    cached.as_ref().and_then(Weak::upgrade)
}

#[cfg(test)]
mod test {
    extern crate quickcheck;
    use super::*;
    use quickcheck::quickcheck;

    fn build(keys: &[Key]) -> AvlTree<Key> {
        let mut t = AvlTree::new();
        for &k in keys {
            t.insert(k, k * 10).unwrap();
        }
        t
    }

    fn bal_test(ks: Vec<i16>) {
        let mut t = AvlTree::new();
        let mut btree = std::collections::BTreeMap::new();
        for k in ks {
            let k = k as Key;
            let expected = btree.insert(k, k).is_none();
            assert_eq!(t.insert(k, k).is_ok(), expected);
            t.check().unwrap();
        }
        assert_eq!(t.keys_in_order(), btree.keys().copied().collect::<Vec<_>>());
    }

    fn rm_test(vs: Vec<(i8, u32)>) {
        let mut t = AvlTree::new();
        let mut btree = std::collections::BTreeMap::new();

        for &(k, v) in vs.iter() {
            match k {
                1..=i8::MAX => {
                    let k = (k % 32) as Key;
                    let fresh = !btree.contains_key(&k);
                    if fresh {
                        btree.insert(k, v);
                    }
                    assert_eq!(t.insert(k, v).is_ok(), fresh);
                }

                0 | i8::MIN => (),

                _ => {
                    let k = (-k % 32) as Key;
                    assert_eq!(t.delete(k).is_ok(), btree.remove(&k).is_some());
                }
            }

            assert_eq!(t.keys_in_order(), btree.keys().copied().collect::<Vec<_>>());
            assert_eq!(t.values_in_order(), btree.values().copied().collect::<Vec<_>>());
            assert_eq!(t.min(), btree.values().next().copied());
            assert_eq!(t.max(), btree.values().next_back().copied());
            t.check().unwrap();
        }
    }

    // systematically try deleting each key of a tree built from `keys`
    fn chk_all_deletes(keys: &[Key]) {
        for &k in keys {
            let mut t = build(keys);
            t.delete(k).unwrap();
            assert!(!t.contains_key(k));
            assert_eq!(t.size(), keys.len() - 1);
            t.check().unwrap();
        }
    }

    #[test]
    fn delete_each_test() {
        // ascending inserts encourage skewing
        let keys: Vec<Key> = (0..32).collect();
        chk_all_deletes(&keys);

        // and descending inserts the opposite skew
        let keys: Vec<Key> = (0..32).rev().collect();
        chk_all_deletes(&keys);
    }

    #[test]
    fn insert_cost_model() {
        let mut t = AvlTree::new();
        assert_eq!(t.insert(10, ()), Ok(0));
        // a walk that promotes up to the root is free
        assert_eq!(t.insert(20, ()), Ok(0));
        // promote 20, then demote 10 and rotate
        assert_eq!(t.insert(30, ()), Ok(3));

        let mut t = AvlTree::new();
        t.insert(30, ()).unwrap();
        t.insert(10, ()).unwrap();
        // promote 10, then the double rotation bundle
        assert_eq!(t.insert(20, ()), Ok(6));
        assert_eq!(t.root().key(), Some(20));
    }

    #[test]
    fn promotions_stopping_below_root_are_counted() {
        let mut t = build(&[4, 2, 6, 1, 3]);
        // 6 is promoted and 4 becomes a (1,1) node
        assert_eq!(t.insert(5, 50), Ok(1));
        assert_eq!(t.insert(7, 70), Ok(0));
    }

    #[test]
    fn root_rotation_away_from_insert_parent() {
        let mut t = AvlTree::new();
        for k in [3, 0, 1, 2, 4, 127] {
            t.insert(k, k).unwrap();
            t.check().unwrap();
        }
        assert_eq!(t.keys_in_order(), vec![0, 1, 2, 3, 4, 127]);
        assert_eq!(t.size(), 6);
        assert_eq!(t.max_key(), Some(127));
        assert_eq!(t.min_key(), Some(0));
    }

    #[test]
    fn delete_rotates_at_root() {
        // 8(7, 9(_, 10)); deleting 7 rotates 9 up to the root
        let mut t = build(&[7, 8, 9, 10]);
        assert_eq!(t.delete(7), Ok(3));
        assert_eq!(t.root().key(), Some(9));
        assert_eq!(t.keys_in_order(), vec![8, 9, 10]);
        assert_eq!(t.size(), 3);
        t.check().unwrap();
    }

    #[test]
    fn delete_cost_model() {
        // 2(1, 3(_, 4)); deleting 1 leaves 2 as a (3,1) node over a (2,1)
        // child: one single rotation bundle and a double demotion
        let mut t = build(&[2, 1, 3, 4]);
        assert_eq!(t.delete(1), Ok(3));
        assert_eq!(t.root().key(), Some(3));

        // 2(1, 4(3, _)); deleting 1 needs the double rotation bundle
        let mut t = build(&[2, 1, 4, 3]);
        assert_eq!(t.delete(1), Ok(6));
        assert_eq!(t.root().key(), Some(3));

        // the mirror is charged the same
        let mut t = build(&[3, 4, 1, 2]);
        assert_eq!(t.delete(4), Ok(6));
        assert_eq!(t.root().key(), Some(2));
    }

    #[test]
    fn demotions_are_counted() {
        // 2(1, 3): deleting 1 leaves (2,1) and nothing to do
        let mut t = build(&[2, 1, 3]);
        assert_eq!(t.delete(1), Ok(0));
        // 2(_, 3): deleting 3 makes 2 a (2,2) leaf, demoted once
        assert_eq!(t.delete(3), Ok(1));
        t.check().unwrap();
    }

    #[test]
    fn failed_calls_change_nothing() {
        let mut t = build(&[5, 3, 8]);
        assert_eq!(t.insert(3, 0), Err(AvlError::DuplicateKey(3)));
        assert_eq!(t.delete(4), Err(AvlError::KeyNotFound(4)));
        assert_eq!(t.size(), 3);
        assert_eq!(t.min(), Some(30));
        assert_eq!(t.max(), Some(80));
        assert_eq!(t.search(3), Some(30));
    }

    #[test]
    fn debug_shows_structure() {
        let t = build(&[2, 1]);
        assert_eq!(
            format!("{:?}", t),
            "AvlTree(#2, (rk: 1 {2: 20} (rk: 0 {1: 10} . .) .))"
        );
        let e: AvlTree<()> = AvlTree::new();
        assert_eq!(format!("{:?}", e), "AvlTree(EMPTY)");
    }

    #[test]
    fn bal_test_regr1() {
        bal_test(vec![4, 0, 5, 1, 2, 3]);
    }

    #[test]
    fn bal_test_regr2() {
        bal_test(vec![3, 0, 1, 2, 4, 127, 3]);
    }

    #[test]
    fn rm_test_regr1() {
        rm_test(vec![(101, 0), (100, 0), (1, 0), (-100, 0)]);
    }

    #[test]
    fn rm_test_regr2() {
        rm_test(vec![
            (31, 0),
            (14, 0),
            (1, 0),
            (15, 0),
            (32, 0),
            (16, 0),
            (17, 0),
            (-14, 0),
            (-31, 0),
        ]);
    }

    quickcheck! {
        fn qc_bal_test(ks: Vec<i16>) -> () {
            bal_test(ks);
        }

        fn qc_rm_test(vs: Vec<(i8, u32)>) -> () {
            rm_test(vs);
        }
    }
}
