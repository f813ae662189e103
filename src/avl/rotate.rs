use super::node::*;

// Rotates `x` down toward `toward`, lifting its child from the other side.
// For a left rotation we want the following transformation:
//    x(a, y(b, c))   =>   y(x(a, b), c)
// a and c keep their parents; b moves from y to x.  Ranks are untouched; the
// sizes of x and y are recomputed from their new children.  When x is the
// root, y takes its place in `root`, which owns it from then on.  Returns y.
pub(crate) fn rotate<V>(
    x: &Link<V>,
    toward: Side,
    root: &mut OptLink<V>,
) -> Link<V> {
    let from = toward.flip();
    let y = child(x, from).expect("rotation needs a child to lift");

    let p = parent(x);
    replace_in_parent(&p, x, Some(y.clone()));
    if p.is_none() {
        *root = Some(y.clone());
    }
    set_child(x, from, child(&y, toward));
    set_child(&y, toward, Some(x.clone()));

    update_size(x);
    update_size(&y);
    y
}

// Lifts the grandchild of `x` on the inner side of its `toward.flip()` child:
//    x(a, y(z(b, c), d))   =>   z(x(a, b), y(c, d))     (toward = Left)
pub(crate) fn double_rotate<V>(
    x: &Link<V>,
    toward: Side,
    root: &mut OptLink<V>,
) -> Link<V> {
    let y = child(x, toward.flip()).expect("double rotation needs a child");
    rotate(&y, toward.flip(), root);
    rotate(x, toward, root)
}
