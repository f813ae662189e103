use log::trace;

use super::node::*;
use super::rotate::{double_rotate, rotate};

/// Rebalance-operation charges for the delete walk.
pub(crate) const DEMOTE_COST: usize = 1;
pub(crate) const SINGLE_ROTATION_COST: usize = 3;
pub(crate) const DOUBLE_ROTATION_COST: usize = 6;

/// Restores the rank rule from `start` upward after a child of `start` lost
/// one rank.  Sizes on the path to the root are refreshed on the way.
/// Returns the charged operations.
pub(crate) fn rebalance_after_delete<V>(
    start: OptLink<V>,
    root: &mut OptLink<V>,
) -> usize {
    let mut ops = 0;
    let mut curr = start;

    while let Some(x) = curr {
        let deep = match gaps(&x) {
            (1, 1) | (1, 2) | (2, 1) => {
                update_sizes_to_root(&x);
                break;
            }
            (2, 2) => {
                trace!("demote {}", key(&x));
                demote(&x);
                ops += DEMOTE_COST;
                update_size(&x);
                curr = parent(&x);
                continue;
            }
            (3, 1) => Side::Right,
            (1, 3) => Side::Left,
            (l, r) => unreachable!(
                "node {} has rank gaps ({l}, {r}) after a delete",
                key(&x)
            ),
        };

        let shallow = deep.flip();
        let tmp = child(&x, deep).expect("a 1-gap child is a real node");
        let (inner_gap, outer_gap) = (gap(&tmp, shallow), gap(&tmp, deep));

        if outer_gap == 1 {
            trace!("single rotation at {}", key(&x));
            rotate(&x, shallow, root);
            ops += SINGLE_ROTATION_COST;
            if inner_gap == 1 {
                demote(&x);
                promote(&tmp);
                update_sizes_to_root(&tmp);
                break;
            }
            shift_rank(&x, -2);
            curr = parent(&tmp);
        } else {
            trace!("double rotation at {}", key(&x));
            let top = double_rotate(&x, shallow, root);
            shift_rank(&x, -2);
            demote(&tmp);
            promote(&top);
            ops += DOUBLE_ROTATION_COST;
            curr = parent(&top);
        }
    }

    ops
}
