//! Treap (Cartesian Tree): a probabilistically balanced BST keyed by implicit
//! position rather than by value, supporting split/concat/order queries in
//! expected O(log n).
//!
//! This is the collaborator the rest of the crate treats as a sealed box:
//! [`crate::tour::Tour`] only ever calls the methods below, never reaches into
//! node internals directly. Nodes live in a single arena per [`Treap`]; a
//! [`NodeId`] is only meaningful for the arena that produced it.

use std::fmt::{Debug, Formatter};

use debug_tree::{add_branch_to, add_leaf_to, AsTree, TreeBuilder};
use derivative::Derivative;
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Handle to a node living inside a [`Treap`]. Opaque outside this module;
/// a half-edge's public identity ([`crate::half_edge::HalfEdgeId`]) is just a
/// `NodeId` in a trenchcoat, since the half-edge *is* the node's payload.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl Debug for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

fn fmt_opt_node(u: &Option<NodeId>, f: &mut Formatter) -> std::fmt::Result {
    match u {
        None => write!(f, "∅"),
        Some(n) => write!(f, "{n:?}"),
    }
}

fn fmt_children(c: &[Option<NodeId>; 2], f: &mut Formatter) -> std::fmt::Result {
    write!(f, "[")?;
    fmt_opt_node(&c[0], f)?;
    write!(f, ", ")?;
    fmt_opt_node(&c[1], f)?;
    write!(f, "]")
}

#[derive(Derivative)]
#[derivative(Debug)]
struct Node<T> {
    #[derivative(Debug(format_with = "fmt_opt_node"))]
    parent: Option<NodeId>,
    #[derivative(Debug(format_with = "fmt_children"))]
    child: [Option<NodeId>; 2],
    size: usize,
    #[derivative(Debug = "ignore")]
    priority: u32,
    value: T,
}

impl<T> Node<T> {
    fn new(value: T, priority: u32) -> Self {
        Self {
            parent: None,
            child: [None, None],
            size: 1,
            priority,
            value,
        }
    }
}

enum Slot<T> {
    Occupied(Node<T>),
    Free,
}

/// Arena holding any number of independent treaps. Nodes freed via
/// [`Treap::destruct`] are recycled by later [`Treap::construct`] calls, so
/// the arena does not grow without bound across repeated link/cut traffic.
pub struct Treap<T> {
    nodes: Vec<Slot<T>>,
    free: Vec<usize>,
    rng: StdRng,
}

impl<T> Debug for Treap<T>
where
    T: Debug,
{
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let builder = TreeBuilder::new();
        add_branch_to!(builder, "Treap");
        for (i, slot) in self.nodes.iter().enumerate() {
            if let Slot::Occupied(n) = slot {
                if n.parent.is_none() {
                    self.inorder_dbg(NodeId(i), &builder);
                }
            }
        }
        writeln!(f, "{}", builder.string())
    }
}

impl<T> Treap<T>
where
    T: Debug,
{
    fn inorder_dbg<B: AsTree>(&self, u: NodeId, tree: &B) {
        let n = self.node(u);
        if let Some(l) = n.child[0] {
            add_branch_to!(*tree, "left of {u:?}");
            self.inorder_dbg(l, tree);
        }
        add_branch_to!(*tree, "{u:?} {n:?}");
        if let Some(r) = n.child[1] {
            self.inorder_dbg(r, tree);
        } else {
            add_leaf_to!(*tree, "<end>");
        }
    }
}

impl<T> Default for Treap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Treap<T> {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            free: Vec::new(),
            rng: StdRng::seed_from_u64(0x7472_6561_70), // "treap" in hex-ish, deterministic for reproducible tests
        }
    }

    fn node(&self, u: NodeId) -> &Node<T> {
        match &self.nodes[u.0] {
            Slot::Occupied(n) => n,
            Slot::Free => panic!("use of a NodeId ({u:?}) after it was destructed"),
        }
    }

    fn node_mut(&mut self, u: NodeId) -> &mut Node<T> {
        match &mut self.nodes[u.0] {
            Slot::Occupied(n) => n,
            Slot::Free => panic!("use of a NodeId ({u:?}) after it was destructed"),
        }
    }

    fn size_of(&self, u: Option<NodeId>) -> usize {
        u.map_or(0, |u| self.node(u).size)
    }

    fn parent_of(&self, u: NodeId) -> Option<NodeId> {
        self.node(u).parent
    }

    /// Allocates a fresh, isolated (size-1) node holding `value`.
    pub fn construct(&mut self, value: T) -> NodeId {
        self.construct_with(|_| value)
    }

    /// Like [`Treap::construct`], but `f` is handed the node's own id before
    /// the value is stored — lets a payload that needs to reference its own
    /// identity (e.g. a half-edge that is its own inverse until a partner
    /// half-edge exists) be built without a placeholder round-trip.
    pub fn construct_with(&mut self, f: impl FnOnce(NodeId) -> T) -> NodeId {
        let id = if let Some(idx) = self.free.pop() {
            idx
        } else {
            self.nodes.push(Slot::Free);
            self.nodes.len() - 1
        };
        let value = f(NodeId(id));
        let priority = self.rng.gen();
        self.nodes[id] = Slot::Occupied(Node::new(value, priority));
        log::trace!("treap: construct {:?}", NodeId(id));
        NodeId(id)
    }

    /// Tears down an isolated node (size 1: no parent, no children) and
    /// returns its payload. Panics if the node is not isolated — the caller
    /// must `split_before`/`split_after` it out first.
    pub fn destruct(&mut self, u: NodeId) -> T {
        {
            let n = self.node(u);
            assert!(
                n.parent.is_none() && n.child == [None, None],
                "destruct called on non-isolated node {u:?}"
            );
        }
        log::trace!("treap: destruct {u:?}");
        let slot = std::mem::replace(&mut self.nodes[u.0], Slot::Free);
        self.free.push(u.0);
        match slot {
            Slot::Occupied(n) => n.value,
            Slot::Free => unreachable!(),
        }
    }

    pub fn get(&self, u: NodeId) -> &T {
        &self.node(u).value
    }

    pub fn get_mut(&mut self, u: NodeId) -> &mut T {
        &mut self.node_mut(u).value
    }

    /// Root of the treap containing `u`.
    pub fn find_root(&self, mut u: NodeId) -> NodeId {
        while let Some(p) = self.parent_of(u) {
            u = p;
        }
        u
    }

    /// Minimum (leftmost, i.e. first in tour order) element of the treap
    /// containing `u`.
    pub fn find_min(&self, u: NodeId) -> NodeId {
        let mut u = self.find_root(u);
        while let Some(l) = self.node(u).child[0] {
            u = l;
        }
        u
    }

    /// Maximum (rightmost, i.e. last in tour order) element of the treap
    /// containing `u`.
    pub fn find_max(&self, u: NodeId) -> NodeId {
        let mut u = self.find_root(u);
        while let Some(r) = self.node(u).child[1] {
            u = r;
        }
        u
    }

    /// In-order successor of `u` within its treap, or `None` if `u` is last.
    pub fn next(&self, u: NodeId) -> Option<NodeId> {
        if let Some(mut cur) = self.node(u).child[1] {
            while let Some(l) = self.node(cur).child[0] {
                cur = l;
            }
            return Some(cur);
        }
        let mut cur = u;
        while let Some(p) = self.parent_of(cur) {
            if self.node(p).child[0] == Some(cur) {
                return Some(p);
            }
            cur = p;
        }
        None
    }

    /// In-order predecessor of `u` within its treap, or `None` if `u` is first.
    pub fn prev(&self, u: NodeId) -> Option<NodeId> {
        if let Some(mut cur) = self.node(u).child[0] {
            while let Some(r) = self.node(cur).child[1] {
                cur = r;
            }
            return Some(cur);
        }
        let mut cur = u;
        while let Some(p) = self.parent_of(cur) {
            if self.node(p).child[1] == Some(cur) {
                return Some(p);
            }
            cur = p;
        }
        None
    }

    /// Number of nodes in the treap containing `u`.
    pub fn size(&self, u: NodeId) -> usize {
        self.node(self.find_root(u)).size
    }

    /// 0-indexed in-order position of `u` within its treap.
    fn order(&self, u: NodeId) -> usize {
        let mut ord = self.size_of(self.node(u).child[0]);
        let mut cur = u;
        while let Some(p) = self.parent_of(cur) {
            if self.node(p).child[1] == Some(cur) {
                ord += self.size_of(self.node(p).child[0]) + 1;
            }
            cur = p;
        }
        ord
    }

    /// Sign of the in-order position difference between `a` and `b`. Both
    /// must already be in the same treap; checked with `debug_assert!` since
    /// the comparison is undefined across treaps.
    pub fn compare(&self, a: NodeId, b: NodeId) -> std::cmp::Ordering {
        debug_assert_eq!(
            self.find_root(a),
            self.find_root(b),
            "compare() called on nodes from different treaps"
        );
        self.order(a).cmp(&self.order(b))
    }

    fn recalc(&mut self, u: NodeId) {
        let [l, r] = self.node(u).child;
        let size = 1 + self.size_of(l) + self.size_of(r);
        self.node_mut(u).size = size;
    }

    /// Replaces `u`'s `side` child (0 = left, 1 = right), fixing up parent
    /// pointers and the size counter. Returns the previous child.
    fn set_child(&mut self, u: NodeId, side: usize, child: Option<NodeId>) -> Option<NodeId> {
        let old = self.node(u).child[side];
        if let Some(old) = old {
            self.node_mut(old).parent = None;
        }
        self.node_mut(u).child[side] = child;
        if let Some(c) = child {
            self.node_mut(c).parent = Some(u);
        }
        self.recalc(u);
        old
    }

    fn concat_inner(&mut self, l: NodeId, r: NodeId) -> NodeId {
        if self.node(l).priority > self.node(r).priority {
            let old_right = self.set_child(l, 1, None);
            let merged = Some(match old_right {
                Some(old) => self.concat_inner(old, r),
                None => r,
            });
            self.set_child(l, 1, merged);
            l
        } else {
            let old_left = self.set_child(r, 0, None);
            let merged = Some(match old_left {
                Some(old) => self.concat_inner(l, old),
                None => l,
            });
            self.set_child(r, 0, merged);
            r
        }
    }

    /// Concatenates two treaps in the given order, returning the resulting
    /// root. Either side may be `None` (the empty treap).
    pub fn concat(&mut self, left: Option<NodeId>, right: Option<NodeId>) -> Option<NodeId> {
        let (left, right) = match (left, right) {
            (None, r) => return r,
            (l, None) => return l,
            (Some(l), Some(r)) => (self.find_root(l), self.find_root(r)),
        };
        if left == right {
            // Already the same treap; nothing to do.
            return Some(left);
        }
        log::trace!("treap: concat {left:?} {right:?}");
        Some(self.concat_inner(left, right))
    }

    /// Splits the treap rooted at `root` so the first `k` elements (in-order)
    /// form the left result and the rest form the right result.
    fn split_k(&mut self, root: Option<NodeId>, k: usize) -> (Option<NodeId>, Option<NodeId>) {
        let Some(u) = root else {
            return (None, None);
        };
        if k == 0 {
            return (None, Some(u));
        }
        let szl = self.size_of(self.node(u).child[0]);
        if k <= szl {
            let l = self.set_child(u, 0, None);
            let (ll, lr) = self.split_k(l, k);
            (ll, self.concat(lr, Some(u)))
        } else {
            let r = self.set_child(u, 1, None);
            let (rl, rr) = self.split_k(r, k - szl - 1);
            (self.concat(Some(u), rl), rr)
        }
    }

    /// Splits `u`'s treap into the elements strictly before `u` (returned)
    /// and `u` together with everything after it (left attached to the
    /// existing structure — `find_root(u)` gives its new root).
    pub fn split_before(&mut self, u: NodeId) -> Option<NodeId> {
        let k = self.order(u);
        log::trace!("treap: split_before {u:?} (order {k})");
        let root = self.find_root(u);
        let (left, _right) = self.split_k(Some(root), k);
        left
    }

    /// Splits `u`'s treap into `u` together with everything before it (left
    /// attached to the existing structure) and the elements strictly after
    /// `u` (returned).
    pub fn split_after(&mut self, u: NodeId) -> Option<NodeId> {
        let k = self.order(u) + 1;
        log::trace!("treap: split_after {u:?} (order {})", k - 1);
        let root = self.find_root(u);
        let (_left, right) = self.split_k(Some(root), k);
        right
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(t: &Treap<char>, root: NodeId) -> Vec<char> {
        let mut out = vec![];
        let mut cur = t.find_min(root);
        loop {
            out.push(*t.get(cur));
            match t.next(cur) {
                Some(n) => cur = n,
                None => break,
            }
        }
        out
    }

    #[test]
    fn single_node_is_its_own_everything() {
        let mut t = Treap::new();
        let a = t.construct('a');
        assert_eq!(t.find_root(a), a);
        assert_eq!(t.find_min(a), a);
        assert_eq!(t.find_max(a), a);
        assert_eq!(t.size(a), 1);
        assert_eq!(t.next(a), None);
        assert_eq!(t.prev(a), None);
    }

    #[test]
    fn concat_preserves_order() {
        let mut t = Treap::new();
        let nodes: Vec<_> = "abcdef".chars().map(|c| t.construct(c)).collect();
        let mut root = nodes[0];
        for &n in &nodes[1..] {
            root = t.concat(Some(root), Some(n)).unwrap();
        }
        assert_eq!(values(&t, root), "abcdef".chars().collect::<Vec<_>>());
        assert_eq!(t.size(root), 6);
        for w in nodes.windows(2) {
            assert_eq!(t.compare(w[0], w[1]), std::cmp::Ordering::Less);
        }
    }

    #[test]
    fn split_before_and_after() {
        let mut t = Treap::new();
        let nodes: Vec<_> = "abcdef".chars().map(|c| t.construct(c)).collect();
        let mut root = nodes[0];
        for &n in &nodes[1..] {
            root = t.concat(Some(root), Some(n)).unwrap();
        }
        let left = t.split_before(nodes[3]); // split before 'd'
        assert_eq!(values(&t, left.unwrap()), vec!['a', 'b', 'c']);
        assert_eq!(values(&t, t.find_root(nodes[3])), vec!['d', 'e', 'f']);

        let right = t.split_after(nodes[3]); // split after 'd', among d,e,f
        assert_eq!(values(&t, t.find_root(nodes[3])), vec!['d']);
        assert_eq!(values(&t, right.unwrap()), vec!['e', 'f']);
    }

    #[test]
    fn destruct_recycles_slots() {
        let mut t = Treap::new();
        let a = t.construct('a');
        t.destruct(a);
        let b = t.construct('b');
        assert_eq!(a, b, "freed slot should be recycled");
    }

    #[test]
    #[should_panic(expected = "non-isolated")]
    fn destruct_panics_on_attached_node() {
        let mut t = Treap::new();
        let a = t.construct('a');
        let b = t.construct('b');
        let root = t.concat(Some(a), Some(b)).unwrap();
        let _ = root;
        t.destruct(a);
    }
}
