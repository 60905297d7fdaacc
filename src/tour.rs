//! The tour engine: the coordination between vertex records, half-edges,
//! the edge index, and the treap that makes up an Euler tour forest.
//! Everything else in this crate is a passive collaborator; all structural
//! mutation is here.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use crate::edge_index::EdgeIndex;
use crate::half_edge::{HalfEdge, HalfEdgeId};
use crate::iter::{EdgeIter, VertexIter};
use crate::treap::Treap;
use crate::vertex::VertexRecord;

/// A dynamic forest, represented as a collection of Euler tours sharing one
/// treap arena. `V` is an opaque, caller-owned vertex identifier.
pub struct Tour<V> {
    vertices: HashMap<V, VertexRecord<V>>,
    edges: EdgeIndex<V>,
    pub(crate) treap: Treap<HalfEdge<V>>,
    n_components: usize,
}

impl<V> Default for Tour<V>
where
    V: Clone + Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Tour<V>
where
    V: Clone + Eq + Hash,
{
    pub fn new() -> Self {
        Self {
            vertices: HashMap::new(),
            edges: EdgeIndex::new(),
            treap: Treap::new(),
            n_components: 0,
        }
    }

    /// Number of vertices currently tracked.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of connected components.
    pub fn n_components(&self) -> usize {
        self.n_components
    }

    pub fn get_vertex(&self, id: &V) -> Option<&VertexRecord<V>> {
        self.vertices.get(id)
    }
}

impl<V> Tour<V>
where
    V: Clone + Eq + Hash + Debug,
{
    pub(crate) fn vertex(&self, id: &V) -> &VertexRecord<V> {
        self.vertices
            .get(id)
            .unwrap_or_else(|| panic!("unknown vertex {id:?}"))
    }

    fn vertex_mut(&mut self, id: &V) -> &mut VertexRecord<V> {
        self.vertices
            .get_mut(id)
            .unwrap_or_else(|| panic!("unknown vertex {id:?}"))
    }

    fn he(&self, e: HalfEdgeId) -> &HalfEdge<V> {
        self.treap.get(e.0)
    }

    fn other_endpoint(&self, e: HalfEdgeId, v: &V) -> V {
        let he = self.he(e);
        if &he.from == v {
            he.to.clone()
        } else {
            he.from.clone()
        }
    }

    pub fn create_vertex(&mut self, id: V) {
        let prev = self.vertices.insert(id.clone(), VertexRecord::new(id.clone()));
        assert!(
            prev.is_none(),
            "create_vertex: vertex {id:?} already present"
        );
        self.n_components += 1;
        log::trace!("tour: create_vertex {id:?}");
    }

    pub fn remove_vertex(&mut self, id: &V) {
        let rec = self.vertex(id);
        assert!(
            rec.is_singleton(),
            "remove_vertex: {id:?} still has incident edges"
        );
        self.vertices.remove(id);
        self.n_components -= 1;
        log::trace!("tour: remove_vertex {id:?}");
    }

    /// `true` if `a == b`; else both must be non-singleton and share a
    /// treap root.
    pub fn connected(&self, a: &V, b: &V) -> bool {
        match (self.vertices.get(a), self.vertices.get(b)) {
            (Some(_), Some(_)) if a == b => true,
            (Some(ra), Some(rb)) => {
                if ra.is_singleton() || rb.is_singleton() {
                    false
                } else {
                    let na = ra.left_out().unwrap().0;
                    let nb = rb.left_out().unwrap().0;
                    self.treap.find_root(na) == self.treap.find_root(nb)
                }
            }
            _ => false,
        }
    }

    /// Returns the tour's root vertex, or `None` if `v` is singleton or unknown.
    pub fn find_root(&self, v: &V) -> Option<V> {
        let rec = self.vertices.get(v)?;
        if rec.is_singleton() {
            return None;
        }
        let min = self.treap.find_min(rec.left_out().unwrap().0);
        Some(self.he(HalfEdgeId(min)).from.clone())
    }

    /// Number of vertices in `v`'s component, 0 if `v` is unknown.
    pub fn size(&self, v: &V) -> usize {
        let Some(rec) = self.vertices.get(v) else {
            return 0;
        };
        if rec.is_singleton() {
            return 1;
        }
        self.treap.size(rec.left_out().unwrap().0) / 2 + 1
    }

    pub fn nodes_in_component(&self, v: &V) -> Vec<V> {
        self.iter_vertices(v).collect()
    }

    pub fn iter_vertices<'a>(&'a self, v: &V) -> VertexIter<'a, V> {
        VertexIter::new(self, v)
    }

    pub fn iter_edges<'a>(&'a self, v: &V) -> EdgeIter<'a, V> {
        EdgeIter::new(self, v)
    }

    /// Re-roots `v`'s tour so it begins at `v`.
    pub fn make_root(&mut self, v: &V) {
        let rec = self.vertex(v);
        if rec.is_singleton() {
            return;
        }
        let mut f = rec.left_out().unwrap();
        let b = rec.right_in().unwrap();
        if self.treap.size(f.0) == 2 {
            return;
        }
        if self.treap.compare(f.0, b.0) == Ordering::Greater {
            f = b;
        }

        let other = self.other_endpoint(f, v);
        let next = self.treap.next(f.0).map(HalfEdgeId);
        let next_contains_v = next.map_or(false, |n| self.he(n).contains(v));

        if !next_contains_v {
            match self.treap.prev(f.0) {
                Some(p) => f = HalfEdgeId(p),
                None => return, // v is already the root
            }
        } else {
            let next = next.unwrap();
            if self.he(next).contains(&other) {
                if let Some(further) = self.treap.next(next.0) {
                    if self.he(HalfEdgeId(further)).contains(v) {
                        f = next;
                    }
                }
            }
        }

        log::debug!("tour: make_root {v:?} splitting after node {:?}", f.0);
        if let Some(right) = self.treap.split_after(f.0) {
            let left = self.treap.find_root(f.0);
            self.treap.concat(Some(right), Some(left));
        }
    }

    /// Joins two distinct trees with a new edge.
    pub fn link(&mut self, u: &V, v: &V) {
        assert!(u != v, "link: u and v are the same vertex ({u:?})");
        assert!(
            self.vertices.contains_key(u),
            "link: unknown vertex {u:?}"
        );
        assert!(
            self.vertices.contains_key(v),
            "link: unknown vertex {v:?}"
        );
        assert!(
            !self.connected(u, v),
            "link: {u:?} and {v:?} are already connected"
        );

        self.make_root(u);
        self.make_root(v);

        let u_was_singleton = self.vertex(u).is_singleton();
        let v_was_singleton = self.vertex(v).is_singleton();

        let f_node = self
            .treap
            .construct_with(|id| HalfEdge::new(u.clone(), v.clone(), HalfEdgeId(id), true));
        let f = HalfEdgeId(f_node);
        let b_node = self.treap.construct(HalfEdge::new(v.clone(), u.clone(), f, false));
        let b = HalfEdgeId(b_node);
        self.treap.get_mut(f_node).inverse = b;

        self.edges.insert_forward(u.clone(), v.clone(), f);
        self.edges.insert_backward(v.clone(), u.clone(), b);

        let mut running = if u_was_singleton {
            None
        } else {
            Some(self.vertex(u).left_out().unwrap().0)
        };
        running = self.treap.concat(running, Some(f_node));

        if v_was_singleton {
            self.vertex_mut(v).set_left_out(Some(f));
        } else {
            running = self
                .treap
                .concat(running, Some(self.vertex(v).left_out().unwrap().0));
        }

        if v_was_singleton {
            self.vertex_mut(v).set_right_in(Some(b));
        }
        running = self.treap.concat(running, Some(b_node));
        let _ = running; // anchors below are sufficient to navigate the merged treap.

        if u_was_singleton {
            self.vertex_mut(u).set_left_out(Some(f));
        }
        // `tleft` is always None by the time we get here (see DESIGN.md);
        // kept as an explicit dead branch rather than silently deleted.
        let tleft: Option<HalfEdgeId> = None;
        debug_assert!(tleft.is_none(), "tleft branch was expected to be dead");
        self.vertex_mut(u).set_right_in(Some(tleft.unwrap_or(b)));

        self.n_components -= 1;
        log::trace!("tour: link {u:?} {v:?}");
    }

    fn anchors_from_neighbors(
        &self,
        p: Option<HalfEdgeId>,
        n: Option<HalfEdgeId>,
    ) -> Option<(HalfEdgeId, HalfEdgeId)> {
        match (p, n) {
            (None, None) => None,
            (Some(p), Some(n)) => Some((n, p)),
            (Some(p), None) => Some((HalfEdgeId(self.treap.find_min(p.0)), p)),
            (None, Some(n)) => Some((n, HalfEdgeId(self.treap.find_max(n.0)))),
        }
    }

    /// Removes the edge {u, v}.
    pub fn cut(&mut self, u: &V, v: &V) {
        assert!(
            self.vertices.contains_key(u),
            "cut: unknown vertex {u:?}"
        );
        assert!(
            self.vertices.contains_key(v),
            "cut: unknown vertex {v:?}"
        );
        assert!(
            self.connected(u, v),
            "cut: {u:?} and {v:?} are not connected"
        );
        let (mut f, mut b) = self
            .edges
            .get_pair(u, v)
            .unwrap_or_else(|| panic!("cut: edge {{{u:?}, {v:?}}} is not present"));
        if self.treap.compare(f.0, b.0) == Ordering::Greater {
            std::mem::swap(&mut f, &mut b);
        }
        let from = self.he(f).from.clone();
        let to = self.he(f).to.clone();

        let p = self.treap.prev(f.0).map(HalfEdgeId);
        let pn = self.treap.next(f.0).map(HalfEdgeId);
        let nn = self.treap.prev(b.0).map(HalfEdgeId);
        let n = self.treap.next(b.0).map(HalfEdgeId);

        log::debug!("tour: cut {u:?} {v:?}");

        // Step 3: extract and rejoin the outer tours.
        let tree1 = self.treap.split_before(f.0);
        let tree2 = self.treap.split_after(b.0);
        self.treap.concat(tree1, tree2);

        // Step 4: re-assign anchors for `from`/`to`.
        if pn == Some(b) {
            match self.anchors_from_neighbors(p, n) {
                None => {
                    self.vertex_mut(&from).clear();
                    self.vertex_mut(&to).clear();
                }
                Some((lo, ri)) => {
                    let marker = n.or(p).unwrap();
                    let owner_is_from = self.he(marker).contains(&from);
                    if owner_is_from {
                        self.vertex_mut(&from).set_left_out(Some(lo));
                        self.vertex_mut(&from).set_right_in(Some(ri));
                        self.vertex_mut(&to).clear();
                    } else {
                        debug_assert!(self.he(marker).contains(&to));
                        self.vertex_mut(&to).set_left_out(Some(lo));
                        self.vertex_mut(&to).set_right_in(Some(ri));
                        self.vertex_mut(&from).clear();
                    }
                }
            }
        } else if pn.map_or(false, |pn| self.he(pn).contains(&from)) {
            self.vertex_mut(&from).set_left_out(pn);
            self.vertex_mut(&from).set_right_in(nn);
            match self.anchors_from_neighbors(p, n) {
                Some((lo, ri)) => {
                    self.vertex_mut(&to).set_left_out(Some(lo));
                    self.vertex_mut(&to).set_right_in(Some(ri));
                }
                None => self.vertex_mut(&to).clear(),
            }
        } else {
            debug_assert!(pn.map_or(false, |pn| self.he(pn).contains(&to)));
            self.vertex_mut(&to).set_left_out(pn);
            self.vertex_mut(&to).set_right_in(nn);
            match self.anchors_from_neighbors(p, n) {
                Some((lo, ri)) => {
                    self.vertex_mut(&from).set_left_out(Some(lo));
                    self.vertex_mut(&from).set_right_in(Some(ri));
                }
                None => self.vertex_mut(&from).clear(),
            }
        }

        // Step 5: isolate F and B; a size-1 anchor tree means that endpoint
        // is actually a singleton.
        self.treap.split_after(f.0);
        self.treap.split_before(b.0);
        for id in [&from, &to] {
            if let Some(anchor) = self.vertex(id).left_out() {
                if self.treap.size(anchor.0) == 1 {
                    self.vertex_mut(id).clear();
                }
            }
        }

        self.edges.remove_pair(u, v);
        self.treap.destruct(f.0);
        self.treap.destruct(b.0);

        self.n_components += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(n: i32) -> Tour<i32> {
        let mut t = Tour::new();
        for i in 1..=n {
            t.create_vertex(i);
        }
        for i in 1..n {
            t.link(&i, &(i + 1));
        }
        t
    }

    #[test]
    fn singleton_vertex() {
        let mut t: Tour<i32> = Tour::new();
        t.create_vertex(1);
        assert_eq!(t.size(&1), 1);
        assert_eq!(t.find_root(&1), None);
        assert_eq!(t.nodes_in_component(&1), vec![1]);
        assert!(t.connected(&1, &1));
        assert_eq!(t.n_components(), 1);
    }

    #[test]
    fn path_build_and_tear() {
        let mut t = path(5);
        assert!(t.connected(&1, &5));
        assert_eq!(t.size(&3), 5);
        assert_eq!(t.n_components(), 1);
        let mut vs = t.nodes_in_component(&3);
        vs.sort();
        assert_eq!(vs, vec![1, 2, 3, 4, 5]);

        t.cut(&3, &4);
        assert!(!t.connected(&1, &5));
        assert_eq!(t.size(&1), 3);
        assert_eq!(t.size(&5), 2);
        assert_eq!(t.n_components(), 2);
    }

    #[test]
    fn star_rerooting_preserves_size() {
        let mut t: Tour<i32> = Tour::new();
        for i in 0..5 {
            t.create_vertex(i);
        }
        for i in 1..5 {
            t.link(&0, &i);
        }
        assert_eq!(t.size(&2), 5);
        t.make_root(&2);
        assert_eq!(t.find_root(&2), Some(2));
        assert_eq!(t.size(&2), 5);
    }

    #[test]
    fn link_cut_link_idempotence() {
        let mut t: Tour<i32> = Tour::new();
        t.create_vertex(1);
        t.create_vertex(2);
        t.link(&1, &2);
        assert_eq!(t.n_components(), 1);
        t.cut(&1, &2);
        assert_eq!(t.n_components(), 2);
        t.link(&1, &2);
        assert!(t.connected(&1, &2));
        assert_eq!(t.n_components(), 1);
    }

    #[test]
    fn cut_middle_of_path() {
        let mut t = path(7);
        t.cut(&4, &5);
        let mut left = t.nodes_in_component(&1);
        left.sort();
        assert_eq!(left, vec![1, 2, 3, 4]);
        let mut right = t.nodes_in_component(&5);
        right.sort();
        assert_eq!(right, vec![5, 6, 7]);
    }

    #[test]
    fn reconnect_via_different_edge() {
        let mut t = path(5);
        t.cut(&2, &3);
        t.link(&1, &4);
        assert!(!t.connected(&3, &5));
        assert!(!t.connected(&1, &5));
        assert!(t.connected(&1, &4));
        assert!(!t.connected(&2, &5));
        assert_eq!(t.n_components(), 2);
    }

    #[test]
    fn component_enumeration() {
        let mut t: Tour<i32> = Tour::new();
        for i in [1, 2, 3, 4, 5] {
            t.create_vertex(i);
        }
        t.link(&1, &2);
        t.link(&2, &3);
        t.link(&4, &5);

        let mut a = t.nodes_in_component(&2);
        a.sort();
        assert_eq!(a, vec![1, 2, 3]);
        let mut b = t.nodes_in_component(&5);
        b.sort();
        assert_eq!(b, vec![4, 5]);
    }

    #[test]
    fn leaf_cut_leaves_singleton() {
        let mut t: Tour<i32> = Tour::new();
        t.create_vertex(1);
        t.create_vertex(2);
        t.link(&1, &2);
        t.cut(&1, &2);
        assert_eq!(t.size(&1), 1);
        assert_eq!(t.size(&2), 1);
        assert_eq!(t.find_root(&1), None);
    }

    #[test]
    #[should_panic(expected = "already connected")]
    fn link_panics_when_already_connected() {
        let mut t = path(3);
        t.link(&1, &3);
    }

    #[test]
    #[should_panic(expected = "not connected")]
    fn cut_panics_when_not_connected() {
        let mut t: Tour<i32> = Tour::new();
        t.create_vertex(1);
        t.create_vertex(2);
        t.cut(&1, &2);
    }

    #[test]
    #[should_panic(expected = "unknown vertex")]
    fn link_panics_on_unknown_vertex() {
        let mut t: Tour<i32> = Tour::new();
        t.create_vertex(1);
        t.link(&1, &99);
    }

    #[test]
    #[should_panic(expected = "incident edges")]
    fn remove_vertex_panics_if_not_singleton() {
        let mut t: Tour<i32> = Tour::new();
        t.create_vertex(1);
        t.create_vertex(2);
        t.link(&1, &2);
        t.remove_vertex(&1);
    }
}
