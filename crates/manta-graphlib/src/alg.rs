//! Small graph algorithms shared by the layout stages.

use crate::{EdgeIx, Graph, VertexIx};

/// Connected components as ascending vertex-index lists, ordered by smallest contained index.
///
/// Iteration is index-ordered BFS, so the result is a pure function of the graph's shape.
pub fn components<N, E>(g: &Graph<N, E>) -> Vec<Vec<VertexIx>> {
    let n = g.vertex_count();
    let mut seen = vec![false; n];
    let mut out: Vec<Vec<VertexIx>> = Vec::new();
    let mut queue: Vec<VertexIx> = Vec::new();

    for start in g.vertex_indices() {
        if seen[start.ix()] {
            continue;
        }
        seen[start.ix()] = true;
        queue.clear();
        queue.push(start);
        let mut comp = vec![start];
        let mut head = 0;
        while head < queue.len() {
            let v = queue[head];
            head += 1;
            for &e in g.adjacent(v) {
                let w = g.opposite(e, v);
                if !seen[w.ix()] {
                    seen[w.ix()] = true;
                    comp.push(w);
                    queue.push(w);
                }
            }
        }
        comp.sort();
        out.push(comp);
    }
    out
}

/// A spanning forest of `g` restricted to `vertices`, as edge indices in insertion order.
///
/// Self-loops never enter the forest.
pub fn spanning_forest<N, E>(g: &Graph<N, E>, vertices: &[VertexIx]) -> Vec<EdgeIx> {
    let n = g.vertex_count();
    let mut dsu = DisjointSets::new(n);
    let mut forest = Vec::new();
    let mut in_set = vec![false; n];
    for &v in vertices {
        in_set[v.ix()] = true;
    }
    for e in g.edge_indices() {
        let (v, w) = g.endpoints(e);
        if v == w || !in_set[v.ix()] || !in_set[w.ix()] {
            continue;
        }
        if dsu.union(v.ix(), w.ix()) {
            forest.push(e);
        }
    }
    forest
}

/// Plain union-find with path halving.
#[derive(Debug, Clone)]
pub struct DisjointSets {
    parent: Vec<u32>,
}

impl DisjointSets {
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n as u32).collect(),
        }
    }

    pub fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] as usize != x {
            let grandparent = self.parent[self.parent[x] as usize];
            self.parent[x] = grandparent;
            x = grandparent as usize;
        }
        x
    }

    /// Returns true when the two sets were distinct. The smaller root index wins, keeping
    /// representative choice independent of call order.
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return false;
        }
        let (lo, hi) = if ra < rb { (ra, rb) } else { (rb, ra) };
        self.parent[hi] = lo as u32;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn components_orders_by_smallest_index() {
        let mut g: Graph<(), ()> = Graph::new();
        let a = g.add_vertex(());
        let b = g.add_vertex(());
        let c = g.add_vertex(());
        let d = g.add_vertex(());
        g.add_edge(b, d, ());
        let comps = components(&g);
        assert_eq!(comps, vec![vec![a], vec![b, d], vec![c]]);
    }

    #[test]
    fn spanning_forest_skips_cycle_closing_edges() {
        let mut g: Graph<(), ()> = Graph::new();
        let a = g.add_vertex(());
        let b = g.add_vertex(());
        let c = g.add_vertex(());
        let e0 = g.add_edge(a, b, ());
        let e1 = g.add_edge(b, c, ());
        let e2 = g.add_edge(c, a, ());
        let forest = spanning_forest(&g, &[a, b, c]);
        assert_eq!(forest, vec![e0, e1]);
        let _ = e2;
    }
}
