//! Text dumps of tree structure for debugging.

use std::fmt::Debug;

use crate::{AvlTree, NodeRef};

/// Renders the subtree under `node`, one node per line.  Children are
/// introduced by `L=` and `R=` and indented two spaces per level; empty
/// subtrees print as `∅`.
///
/// ```
/// use avl_rank_tree::{print, AvlTree};
///
/// let mut t = AvlTree::new();
/// t.insert(2, 'b').unwrap();
/// t.insert(1, 'a').unwrap();
/// assert_eq!(
///     print::render(&t.root(), ""),
///     "2 [rank=1] = 'b'\nL=1 [rank=0] = 'a'\n  L=∅\n  R=∅\nR=∅"
/// );
/// ```
pub fn render<V: Debug>(node: &NodeRef<'_, V>, tab: &str) -> String {
    let Some(k) = node.key() else {
        return "∅".to_string();
    };

    let child_tab = format!("{tab}  ");
    let left = render(&node.left(), &child_tab);
    let right = render(&node.right(), &child_tab);
    let val = node.with_value(|v| format!("{v:?}")).unwrap_or_default();
    format!(
        "{k} [rank={}] = {val}\n{tab}L={left}\n{tab}R={right}",
        node.rank()
    )
}

/// Renders a whole tree.
pub fn render_tree<V: Debug>(tree: &AvlTree<V>) -> String {
    render(&tree.root(), "")
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty_tree() {
        let t: AvlTree<()> = AvlTree::new();
        assert_eq!(render_tree(&t), "∅");
    }

    #[test]
    fn nested_indent() {
        let mut t = AvlTree::new();
        for k in [2, 1, 3, 4] {
            t.insert(k, ()).unwrap();
        }
        let expected = "2 [rank=2] = ()\n\
                        L=1 [rank=0] = ()\n  L=∅\n  R=∅\n\
                        R=3 [rank=1] = ()\n  L=∅\n  R=4 [rank=0] = ()\n    L=∅\n    R=∅";
        assert_eq!(render_tree(&t), expected);
    }
}
