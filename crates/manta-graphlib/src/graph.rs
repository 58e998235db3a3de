//! The core arena `Graph` container.

use std::fmt;

/// Index of a vertex in the graph's vertex arena.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VertexIx(pub u32);

/// Index of an edge in the graph's edge arena.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeIx(pub u32);

impl VertexIx {
    #[inline]
    pub fn ix(self) -> usize {
        self.0 as usize
    }
}

impl EdgeIx {
    #[inline]
    pub fn ix(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for VertexIx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

impl fmt::Debug for EdgeIx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct EdgeEntry<E> {
    pub v: VertexIx,
    pub w: VertexIx,
    pub label: E,
    /// Edges removed by a pipeline stage keep their slot so indices elsewhere stay valid.
    pub removed: bool,
}

/// An undirected multigraph over `Vec` arenas.
///
/// Self-loops and parallel edges are representable; removal is tombstoned so indices held by
/// other structures never dangle.
#[derive(Debug, Clone, Default)]
pub struct Graph<N, E> {
    vertices: Vec<N>,
    edges: Vec<EdgeEntry<E>>,
    adjacency: Vec<Vec<EdgeIx>>,
}

impl<N, E> Graph<N, E> {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            edges: Vec::new(),
            adjacency: Vec::new(),
        }
    }

    pub fn add_vertex(&mut self, label: N) -> VertexIx {
        let ix = VertexIx(self.vertices.len() as u32);
        self.vertices.push(label);
        self.adjacency.push(Vec::new());
        ix
    }

    pub fn add_edge(&mut self, v: VertexIx, w: VertexIx, label: E) -> EdgeIx {
        debug_assert!(v.ix() < self.vertices.len() && w.ix() < self.vertices.len());
        let ix = EdgeIx(self.edges.len() as u32);
        self.edges.push(EdgeEntry {
            v,
            w,
            label,
            removed: false,
        });
        self.adjacency[v.ix()].push(ix);
        if v != w {
            self.adjacency[w.ix()].push(ix);
        }
        ix
    }

    /// Tombstones the edge. Its arena slot and label stay in place.
    pub fn remove_edge(&mut self, e: EdgeIx) {
        let entry = &mut self.edges[e.ix()];
        if entry.removed {
            return;
        }
        entry.removed = true;
        let (v, w) = (entry.v, entry.w);
        self.adjacency[v.ix()].retain(|&a| a != e);
        if v != w {
            self.adjacency[w.ix()].retain(|&a| a != e);
        }
    }

    /// Moves the `from` endpoint of `e` over to `to`, keeping adjacency lists
    /// consistent. Not defined for self-loops.
    pub fn reattach(&mut self, e: EdgeIx, from: VertexIx, to: VertexIx) {
        let entry = &mut self.edges[e.ix()];
        debug_assert!(!entry.removed && entry.v != entry.w && from != to);
        if entry.v == from {
            entry.v = to;
        } else {
            debug_assert_eq!(entry.w, from);
            entry.w = to;
        }
        self.adjacency[from.ix()].retain(|&a| a != e);
        self.adjacency[to.ix()].push(e);
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Live (non-tombstoned) edge count.
    pub fn edge_count(&self) -> usize {
        self.edges.iter().filter(|e| !e.removed).count()
    }

    /// Size of the edge arena including tombstones; an exclusive upper bound for any `EdgeIx`.
    pub fn edge_count_bound(&self) -> usize {
        self.edges.len()
    }

    pub fn vertex(&self, v: VertexIx) -> &N {
        &self.vertices[v.ix()]
    }

    pub fn vertex_mut(&mut self, v: VertexIx) -> &mut N {
        &mut self.vertices[v.ix()]
    }

    pub fn edge(&self, e: EdgeIx) -> &EdgeEntry<E> {
        &self.edges[e.ix()]
    }

    pub fn edge_mut(&mut self, e: EdgeIx) -> &mut EdgeEntry<E> {
        &mut self.edges[e.ix()]
    }

    pub fn endpoints(&self, e: EdgeIx) -> (VertexIx, VertexIx) {
        let entry = &self.edges[e.ix()];
        (entry.v, entry.w)
    }

    pub fn is_self_loop(&self, e: EdgeIx) -> bool {
        let entry = &self.edges[e.ix()];
        entry.v == entry.w
    }

    /// The endpoint of `e` that is not `v`. For self-loops this is `v` itself.
    pub fn opposite(&self, e: EdgeIx, v: VertexIx) -> VertexIx {
        let entry = &self.edges[e.ix()];
        if entry.v == v { entry.w } else { entry.v }
    }

    /// Incident live edges of `v` in insertion order. Self-loops appear once.
    pub fn adjacent(&self, v: VertexIx) -> &[EdgeIx] {
        &self.adjacency[v.ix()]
    }

    /// Degree counting a self-loop as 2.
    pub fn degree(&self, v: VertexIx) -> usize {
        self.adjacency[v.ix()]
            .iter()
            .map(|&e| if self.is_self_loop(e) { 2 } else { 1 })
            .sum()
    }

    pub fn vertex_indices(&self) -> impl Iterator<Item = VertexIx> + '_ {
        (0..self.vertices.len() as u32).map(VertexIx)
    }

    /// Live edge indices in insertion order.
    pub fn edge_indices(&self) -> impl Iterator<Item = EdgeIx> + '_ {
        self.edges
            .iter()
            .enumerate()
            .filter(|(_, e)| !e.removed)
            .map(|(i, _)| EdgeIx(i as u32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_edge_updates_adjacency_in_insertion_order() {
        let mut g: Graph<(), ()> = Graph::new();
        let a = g.add_vertex(());
        let b = g.add_vertex(());
        let c = g.add_vertex(());
        let e0 = g.add_edge(a, b, ());
        let e1 = g.add_edge(a, c, ());
        assert_eq!(g.adjacent(a), &[e0, e1]);
        assert_eq!(g.adjacent(b), &[e0]);
        assert_eq!(g.opposite(e1, a), c);
        assert_eq!(g.degree(a), 2);
    }

    #[test]
    fn self_loop_counts_twice_toward_degree_but_once_in_adjacency() {
        let mut g: Graph<(), ()> = Graph::new();
        let a = g.add_vertex(());
        let e = g.add_edge(a, a, ());
        assert_eq!(g.adjacent(a), &[e]);
        assert_eq!(g.degree(a), 2);
        assert!(g.is_self_loop(e));
    }

    #[test]
    fn reattach_moves_an_endpoint_and_its_adjacency_entry() {
        let mut g: Graph<(), ()> = Graph::new();
        let a = g.add_vertex(());
        let b = g.add_vertex(());
        let c = g.add_vertex(());
        let e = g.add_edge(a, b, ());
        g.reattach(e, a, c);
        assert_eq!(g.endpoints(e), (c, b));
        assert!(g.adjacent(a).is_empty());
        assert_eq!(g.adjacent(c), &[e]);
        assert_eq!(g.opposite(e, b), c);
    }

    #[test]
    fn remove_edge_tombstones_the_slot() {
        let mut g: Graph<(), ()> = Graph::new();
        let a = g.add_vertex(());
        let b = g.add_vertex(());
        let e0 = g.add_edge(a, b, ());
        let e1 = g.add_edge(a, b, ());
        g.remove_edge(e0);
        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.adjacent(a), &[e1]);
        assert!(g.edge(e0).removed);
        assert_eq!(g.edge_indices().collect::<Vec<_>>(), vec![e1]);
    }
}
