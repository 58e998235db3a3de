//! Geometric invariants of finished drawings, reconstructed from `positions` and
//! `edge_bends` alone: runs follow the grid, two edges meet only at shared route
//! points, and no run passes through the box of a node it is not attached to.

use std::collections::BTreeMap;

use manta::{layout, EdgeSpec, LayoutConfig, LayoutResult, NodeSpec, Point, Rect};

fn node(id: u64, width: i32, height: i32) -> NodeSpec {
    NodeSpec { id, width, height }
}

fn edge(source: u64, target: u64) -> EdgeSpec {
    EdgeSpec { source, target }
}

fn complete(n: u64) -> (Vec<NodeSpec>, Vec<EdgeSpec>) {
    let nodes = (0..n).map(|id| node(id, 10, 10)).collect();
    let mut edges = Vec::new();
    for a in 0..n {
        for b in a + 1..n {
            edges.push(edge(a, b));
        }
    }
    (nodes, edges)
}

/// An axis-aligned run with its span normalized so `lo <= hi`.
#[derive(Debug, Clone, Copy)]
struct Run {
    horizontal: bool,
    fixed: i32,
    lo: i32,
    hi: i32,
}

struct Drawing {
    result: LayoutResult,
    edges: Vec<EdgeSpec>,
    degree: BTreeMap<u64, usize>,
}

impl Drawing {
    fn build(nodes: &[NodeSpec], edges: &[EdgeSpec]) -> Self {
        let result = layout(nodes, edges, &LayoutConfig::default()).unwrap();
        let mut degree = BTreeMap::new();
        for e in edges {
            *degree.entry(e.source).or_insert(0usize) += 1;
            *degree.entry(e.target).or_insert(0usize) += 1;
        }
        Self {
            result,
            edges: edges.to_vec(),
            degree,
        }
    }

    /// Full polyline of edge `k`: source center, route points, target center.
    fn polyline(&self, k: usize) -> Vec<Point> {
        let e = &self.edges[k];
        let mut pts = vec![self.result.positions[&e.source]];
        pts.extend(self.result.edge_bends[k].iter().copied());
        pts.push(self.result.positions[&e.target]);
        pts
    }

    /// Grid runs of edge `k`, asserting axis-alignment along the way. Attachment stubs
    /// at nodes of degree above four are excluded: those connect the node's center to a
    /// port inside its own expansion ring and do not follow the grid.
    fn runs(&self, k: usize) -> Vec<Run> {
        let e = &self.edges[k];
        let pts = self.polyline(k);
        let last = pts.len() - 1;
        let mut runs = Vec::new();
        for i in 0..last {
            if i == 0 && self.degree[&e.source] > 4 {
                continue;
            }
            if i + 1 == last && self.degree[&e.target] > 4 {
                continue;
            }
            let (p, q) = (pts[i], pts[i + 1]);
            assert!(
                p.x == q.x || p.y == q.y,
                "edge {e:?} segment {i} leaves the grid: {p:?} -> {q:?}"
            );
            if p == q {
                continue;
            }
            runs.push(if p.y == q.y {
                Run {
                    horizontal: true,
                    fixed: p.y,
                    lo: p.x.min(q.x),
                    hi: p.x.max(q.x),
                }
            } else {
                Run {
                    horizontal: false,
                    fixed: p.x,
                    lo: p.y.min(q.y),
                    hi: p.y.max(q.y),
                }
            });
        }
        runs
    }

    fn assert_clear_of_foreign_boxes(&self, nodes: &[NodeSpec]) {
        for (k, e) in self.edges.iter().enumerate() {
            for run in self.runs(k) {
                for n in nodes {
                    if n.id == e.source || n.id == e.target {
                        continue;
                    }
                    let b = Rect::from_center(self.result.positions[&n.id], n.width, n.height);
                    let (clo, chi, alo, ahi) = if run.horizontal {
                        (b.y, b.bottom(), b.x, b.right())
                    } else {
                        (b.x, b.right(), b.y, b.bottom())
                    };
                    let hit =
                        run.fixed >= clo && run.fixed <= chi && run.hi >= alo && run.lo <= ahi;
                    assert!(!hit, "edge {e:?} runs through the box of node {}", n.id);
                }
            }
        }
    }

    /// Crossing dummies split both edges' runs at the shared route point, so any
    /// crossing strictly inside two runs, and any collinear overlap, is a defect.
    fn assert_no_proper_crossings(&self) {
        for a in 0..self.edges.len() {
            for b in a + 1..self.edges.len() {
                for ra in self.runs(a) {
                    for rb in self.runs(b) {
                        if ra.horizontal == rb.horizontal {
                            assert!(
                                ra.fixed != rb.fixed || ra.lo >= rb.hi || rb.lo >= ra.hi,
                                "edges {:?} and {:?} overlap along one line",
                                self.edges[a],
                                self.edges[b]
                            );
                            continue;
                        }
                        let (h, v) = if ra.horizontal { (ra, rb) } else { (rb, ra) };
                        assert!(
                            !(v.fixed > h.lo && v.fixed < h.hi && h.fixed > v.lo && h.fixed < v.hi),
                            "edges {:?} and {:?} cross away from a route point",
                            self.edges[a],
                            self.edges[b]
                        );
                    }
                }
            }
        }
    }
}

#[test]
fn k4_routes_stay_on_the_grid_and_out_of_foreign_boxes() {
    let (nodes, edges) = complete(4);
    let d = Drawing::build(&nodes, &edges);
    d.assert_clear_of_foreign_boxes(&nodes);
    d.assert_no_proper_crossings();
}

#[test]
fn k5_crosses_only_at_its_crossing_dummies() {
    let (nodes, edges) = complete(5);
    let d = Drawing::build(&nodes, &edges);
    // Nonplanar, so at least one route carries a crossing point.
    assert!(d.result.edge_bends.iter().any(|r| !r.is_empty()));
    d.assert_clear_of_foreign_boxes(&nodes);
    d.assert_no_proper_crossings();
}

#[test]
fn a_five_leaf_star_fans_its_spokes_apart() {
    let nodes: Vec<_> = (0..6).map(|id| node(id, 10, 10)).collect();
    let edges: Vec<_> = (1..6).map(|leaf| edge(0, leaf)).collect();
    let d = Drawing::build(&nodes, &edges);

    // Every spoke attaches through a ring port, so every route is non-empty.
    assert!(d.result.edge_bends.iter().all(|r| !r.is_empty()));
    d.assert_clear_of_foreign_boxes(&nodes);
    d.assert_no_proper_crossings();

    // Leaves spread around the hub rather than stacking on a single ray.
    let xs: Vec<_> = (1..6).map(|leaf| d.result.positions[&leaf].x).collect();
    let ys: Vec<_> = (1..6).map(|leaf| d.result.positions[&leaf].y).collect();
    assert!(xs.iter().any(|&x| x != xs[0]), "leaves stack on one vertical ray");
    assert!(ys.iter().any(|&y| y != ys[0]), "leaves stack on one horizontal ray");
}

#[test]
fn a_triangle_keeps_its_single_bend_on_the_grid() {
    let nodes: Vec<_> = (0..3).map(|id| node(id, 10, 10)).collect();
    let edges = [edge(0, 1), edge(1, 2), edge(2, 0)];
    let d = Drawing::build(&nodes, &edges);
    d.assert_clear_of_foreign_boxes(&nodes);
    d.assert_no_proper_crossings();
}

#[test]
fn k6_expands_every_hub_yet_keeps_routes_clear() {
    let (nodes, edges) = complete(6);
    let d = Drawing::build(&nodes, &edges);
    d.assert_clear_of_foreign_boxes(&nodes);
    d.assert_no_proper_crossings();
}
