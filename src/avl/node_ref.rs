use std::marker::PhantomData;

use super::node::*;
use super::AvlTree;
use crate::Key;

/// A read-only handle on a position in an [`AvlTree`].
///
/// A handle on an empty subtree is *virtual*: it has no key, rank -1 and
/// size 0, and its children are virtual too.  Handles borrow the tree, so it
/// cannot change while any are alive.
pub struct NodeRef<'a, V> {
    link: OptLink<V>,
    _tree: PhantomData<&'a AvlTree<V>>,
}

// derive would demand V: Clone
impl<V> Clone for NodeRef<'_, V> {
    fn clone(&self) -> Self {
        NodeRef {
            link: self.link.clone(),
            _tree: PhantomData,
        }
    }
}

impl<'a, V> NodeRef<'a, V> {
    pub(crate) fn new(link: OptLink<V>) -> Self {
        NodeRef {
            link,
            _tree: PhantomData,
        }
    }

    /// Returns true unless the handle is virtual.
    pub fn is_real(&self) -> bool {
        self.link.is_some()
    }

    /// The key stored here; None if the handle is virtual.
    pub fn key(&self) -> Option<Key> {
        self.link.as_ref().map(key)
    }

    /// The rank (height) of the subtree, -1 when virtual.
    pub fn rank(&self) -> i32 {
        rank(&self.link)
    }

    /// The number of entries in the subtree under this position.
    pub fn size(&self) -> usize {
        size(&self.link)
    }

    /// Handle on the left child.
    pub fn left(&self) -> NodeRef<'a, V> {
        NodeRef::new(self.link.as_ref().and_then(left))
    }

    /// Handle on the right child.
    pub fn right(&self) -> NodeRef<'a, V> {
        NodeRef::new(self.link.as_ref().and_then(right))
    }

    /// Applies `f` to the value stored here; None if the handle is virtual.
    pub fn with_value<R>(&self, f: impl FnOnce(&V) -> R) -> Option<R> {
        self.link.as_ref().map(|rc| f(&rc.borrow().val))
    }

    /// A copy of the value stored here.
    pub fn value(&self) -> Option<V>
    where
        V: Clone,
    {
        self.with_value(V::clone)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn walk_from_root() {
        let mut t = AvlTree::new();
        for k in [2, 1, 3] {
            t.insert(k, k.to_string()).unwrap();
        }

        let root = t.root();
        assert_eq!(root.key(), Some(2));
        assert_eq!(root.rank(), 1);
        assert_eq!(root.size(), 3);
        assert_eq!(root.left().value(), Some("1".to_string()));
        assert_eq!(root.right().with_value(|v| v.len()), Some(1));
    }

    #[test]
    fn virtual_handles() {
        let t: AvlTree<u8> = AvlTree::new();
        let root = t.root();
        assert!(!root.is_real());
        assert_eq!(root.key(), None);
        assert_eq!(root.rank(), -1);
        assert_eq!(root.size(), 0);
        assert_eq!(root.value(), None);

        let below = root.left().right();
        assert!(!below.is_real());
        assert_eq!(below.rank(), -1);
    }
}
