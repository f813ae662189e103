use avl_rank_tree::Key;
use proptest::prelude::*;

#[allow(dead_code)]
pub(super) fn assert_eq_iters<I: Iterator, J: Iterator<Item = I::Item>>(
    mut i: I,
    mut j: J,
) where
    I::Item: std::fmt::Debug + Eq, // same inferred for J::Item
{
    loop {
        match (i.next(), j.next()) {
            (None, None) => return,
            (a, b) => assert_eq!(a, b),
        }
    }
}

pub(super) type SmallIntPairs = Vec<(Key, u16)>;

// Keys are drawn from a narrow range, including negatives, so that
// duplicates and misses are common.
pub(super) fn small_int_pairs() -> impl Strategy<Value = SmallIntPairs> {
    prop::collection::vec((-512 as Key..512, 0u16..1024u16), 0..512)
}

#[derive(Clone, Debug)]
pub(super) enum Op {
    Insert(Key, u16),
    Delete(Key),
    Search(Key),
}

pub(super) fn op_sequences() -> impl Strategy<Value = Vec<Op>> {
    let op = prop_oneof![
        3 => (-64 as Key..64, any::<u16>()).prop_map(|(k, v)| Op::Insert(k, v)),
        2 => (-64 as Key..64).prop_map(Op::Delete),
        1 => (-64 as Key..64).prop_map(Op::Search),
    ];
    prop::collection::vec(op, 0..256)
}
