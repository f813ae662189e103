use std::cell::RefCell;
use std::cmp::Ordering::*;
use std::rc::{Rc, Weak};

use crate::Key;

pub(crate) type Link<V> = Rc<RefCell<Node<V>>>;
pub(crate) type WeakLink<V> = Weak<RefCell<Node<V>>>;

// `None` is the empty subtree: rank -1, size 0.
pub(crate) type OptLink<V> = Option<Link<V>>;

pub(crate) struct Node<V> {
    pub(crate) key: Key,
    pub(crate) val: V,
    pub(crate) rank: i32,
    pub(crate) size: usize,
    pub(crate) left: OptLink<V>,
    pub(crate) right: OptLink<V>,
    pub(crate) parent: Option<WeakLink<V>>,
}

impl<V> Node<V> {
    pub(crate) fn new_link(key: Key, val: V) -> Link<V> {
        Rc::new(RefCell::new(Node {
            key,
            val,
            rank: 0,
            size: 1,
            left: None,
            right: None,
            parent: None,
        }))
    }

    fn child(&self, side: Side) -> &OptLink<V> {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    // Drops the `side` link without touching the child's parent link.
    pub(crate) fn unlink(&mut self, side: Side) {
        match side {
            Side::Left => self.left = None,
            Side::Right => self.right = None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    pub(crate) fn flip(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

pub(crate) fn rank<V>(opt_node: &OptLink<V>) -> i32 {
    opt_node.as_ref().map_or(-1, |rc| rc.borrow().rank)
}

pub(crate) fn size<V>(opt_node: &OptLink<V>) -> usize {
    opt_node.as_ref().map_or(0, |rc| rc.borrow().size)
}

pub(crate) fn key<V>(n: &Link<V>) -> Key {
    n.borrow().key
}

pub(crate) fn child<V>(n: &Link<V>, side: Side) -> OptLink<V> {
    n.borrow().child(side).clone()
}

pub(crate) fn left<V>(n: &Link<V>) -> OptLink<V> {
    child(n, Side::Left)
}

pub(crate) fn right<V>(n: &Link<V>) -> OptLink<V> {
    child(n, Side::Right)
}

pub(crate) fn parent<V>(n: &Link<V>) -> OptLink<V> {
    n.borrow().parent.as_ref().and_then(Weak::upgrade)
}

/// Installs `c` as the `side` child of `n` and points `c` back at `n`.
pub(crate) fn set_child<V>(n: &Link<V>, side: Side, c: OptLink<V>) {
    if let Some(rc) = &c {
        rc.borrow_mut().parent = Some(Rc::downgrade(n));
    }
    let mut node = n.borrow_mut();
    match side {
        Side::Left => node.left = c,
        Side::Right => node.right = c,
    }
}

/// Detaches and returns the `side` child of `n`, clearing its parent link.
pub(crate) fn take_child<V>(n: &Link<V>, side: Side) -> OptLink<V> {
    let c = {
        let mut node = n.borrow_mut();
        match side {
            Side::Left => node.left.take(),
            Side::Right => node.right.take(),
        }
    };
    if let Some(rc) = &c {
        rc.borrow_mut().parent = None;
    }
    c
}

pub(crate) fn is_child<V>(p: &Link<V>, side: Side, c: &Link<V>) -> bool {
    p.borrow()
        .child(side)
        .as_ref()
        .is_some_and(|rc| Rc::ptr_eq(rc, c))
}

// prerequisite: c is a child of p
pub(crate) fn side_of<V>(p: &Link<V>, c: &Link<V>) -> Side {
    if is_child(p, Side::Left, c) {
        Side::Left
    } else {
        Side::Right
    }
}

/// Puts `new` where `old` hung under `parent`.  With no parent, `new` just
/// loses its parent link; the caller owns the new root.
pub(crate) fn replace_in_parent<V>(
    parent: &OptLink<V>,
    old: &Link<V>,
    new: OptLink<V>,
) {
    match parent {
        Some(p) => {
            let side = side_of(p, old);
            set_child(p, side, new);
        }
        None => {
            if let Some(rc) = &new {
                rc.borrow_mut().parent = None;
            }
        }
    }
}

/// Rank difference between `n` and its `side` child.
pub(crate) fn gap<V>(n: &Link<V>, side: Side) -> i32 {
    let node = n.borrow();
    node.rank - rank(node.child(side))
}

pub(crate) fn gaps<V>(n: &Link<V>) -> (i32, i32) {
    (gap(n, Side::Left), gap(n, Side::Right))
}

pub(crate) fn shift_rank<V>(n: &Link<V>, delta: i32) {
    n.borrow_mut().rank += delta;
}

pub(crate) fn promote<V>(n: &Link<V>) {
    shift_rank(n, 1);
}

pub(crate) fn demote<V>(n: &Link<V>) {
    shift_rank(n, -1);
}

pub(crate) fn update_size<V>(n: &Link<V>) {
    let sz = {
        let node = n.borrow();
        1 + size(&node.left) + size(&node.right)
    };
    n.borrow_mut().size = sz;
}

pub(crate) fn update_sizes_to_root<V>(n: &Link<V>) {
    let mut curr = Some(n.clone());
    while let Some(rc) = curr {
        update_size(&rc);
        curr = parent(&rc);
    }
}

pub(crate) fn outermost<V>(n: &Link<V>, side: Side) -> Link<V> {
    let mut curr = n.clone();
    while let Some(next) = child(&curr, side) {
        curr = next;
    }
    curr
}

pub(crate) fn leftmost<V>(n: &Link<V>) -> Link<V> {
    outermost(n, Side::Left)
}

pub(crate) fn rightmost<V>(n: &Link<V>) -> Link<V> {
    outermost(n, Side::Right)
}

/// Returns the node holding the next greater key, if any.
pub(crate) fn successor<V>(n: &Link<V>) -> OptLink<V> {
    if let Some(r) = right(n) {
        return Some(leftmost(&r));
    }

    let mut curr = n.clone();
    while let Some(p) = parent(&curr) {
        if is_child(&p, Side::Left, &curr) {
            return Some(p);
        }
        curr = p;
    }
    None
}

pub(crate) fn find<V>(root: &OptLink<V>, k: Key) -> OptLink<V> {
    let mut curr = root.clone();
    while let Some(rc) = curr {
        curr = match k.cmp(&key(&rc)) {
            Less => left(&rc),
            Equal => return Some(rc),
            Greater => right(&rc),
        };
    }
    None
}

/// Where a key would hang in a non-empty tree.
pub(crate) enum Slot<V> {
    Occupied,
    Vacant { parent: Link<V>, side: Side },
}

pub(crate) fn find_slot<V>(root: &Link<V>, k: Key) -> Slot<V> {
    let mut curr = root.clone();
    loop {
        let side = match k.cmp(&key(&curr)) {
            Less => Side::Left,
            Equal => return Slot::Occupied,
            Greater => Side::Right,
        };
        match child(&curr, side) {
            Some(next) => curr = next,
            None => return Slot::Vacant { parent: curr, side },
        }
    }
}
