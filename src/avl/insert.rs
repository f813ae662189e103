use log::trace;

use super::node::*;
use super::rotate::{double_rotate, rotate};

/// Rebalance-operation charges for the insert walk.
pub(crate) const PROMOTE_COST: usize = 1;
pub(crate) const SINGLE_ROTATION_COST: usize = 2;
pub(crate) const DOUBLE_ROTATION_COST: usize = 5;

/// Restores the rank rule above `node`, whose rank has just become equal to
/// its parent's (a fresh leaf under a former leaf, or a join separator).
///
/// Walks up while the parent is a (0,1) node, promoting it.  A (0,2) parent
/// is fixed by one single or double rotation, after which the subtree has
/// its old rank back and the walk ends.  Returns the charged operations; a
/// walk that promotes its way up to the root is charged nothing.
pub(crate) fn rebalance_after_insert<V>(
    node: &Link<V>,
    root: &mut OptLink<V>,
) -> usize {
    let mut ops = 0;
    let mut node = node.clone();

    loop {
        let Some(p) = parent(&node) else {
            trace!("promotions reached the root");
            return 0;
        };

        let heavy = match gaps(&p) {
            (0, 1) | (1, 0) => {
                trace!("promote {}", key(&p));
                promote(&p);
                ops += PROMOTE_COST;
                node = p;
                continue;
            }
            (0, 2) => Side::Left,
            (2, 0) => Side::Right,
            _ => return ops,
        };

        let light = heavy.flip();
        if gap(&node, light) == 2 {
            trace!("single rotation at {}", key(&p));
            demote(&p);
            rotate(&p, light, root);
            ops += SINGLE_ROTATION_COST;
        } else {
            trace!("double rotation at {}", key(&p));
            let inner = child(&node, light)
                .expect("a (1,2) child has a real node on its 1-side");
            demote(&p);
            demote(&node);
            promote(&inner);
            double_rotate(&p, light, root);
            ops += DOUBLE_ROTATION_COST;
        }
        return ops;
    }
}

/// Join can leave the separator `x` as a (1,1) node under a (0,2) parent,
/// which the insert walk does not expect.  Rotate the parent away from `x`
/// and promote `x` so the walk can continue from there.
pub(crate) fn fix_join_seam<V>(x: &Link<V>, root: &mut OptLink<V>) {
    let Some(p) = parent(x) else {
        return;
    };

    let side = side_of(&p, x);
    if gaps(x) != (1, 1)
        || gap(&p, side) != 0
        || gap(&p, side.flip()) != 2
    {
        return;
    }

    trace!("join seam rotation at {}", key(&p));
    rotate(&p, side.flip(), root);
    promote(x);
}
