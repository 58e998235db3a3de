//! Planarizer: maximal planar subgraph by incremental insertion, deferred-edge reinsertion
//! through dummy crossing vertices, then ring expansion of vertices with degree above four.
//!
//! The embedding is a half-edge ("dart") structure over integer indices: dart `2k`/`2k+1` are
//! the two directions of embedded edge `k`, `twin(d) = d ^ 1`, and `next(d)` continues the
//! face walk to the left of `d`. Faces are recomputed from the `next` permutation whenever a
//! stage needs them; ids are assigned in ascending-dart discovery order so the whole structure
//! is a pure function of the input graph.

use crate::error::Diagnostic;
use crate::graphlib::{EdgeIx, VertexIx, alg};
use crate::model::{EdgeData, LayoutGraph, Vertex, VertexKind};

/// A connected component with a fixed combinatorial embedding, stored as a dart
/// structure. Index-based and trivially cloneable.
#[derive(Debug, Clone)]
pub struct Embedding {
    /// Component vertices, ascending.
    pub verts: Vec<VertexIx>,
    pub dart_origin: Vec<VertexIx>,
    pub dart_edge: Vec<EdgeIx>,
    /// Face-walk successor per dart.
    pub next: Vec<u32>,
    pub face_of: Vec<u32>,
    pub face_walks: Vec<Vec<u32>>,
    pub outer: u32,
    /// Whether local edge `k` (darts `2k`/`2k+1`) belongs to an expansion ring.
    pub ring_edge: Vec<bool>,
    /// Expanded high-degree vertices with their port rings in rotation order.
    pub expansions: Vec<(VertexIx, Vec<VertexIx>)>,
}

impl Embedding {
    #[inline]
    pub fn twin(d: u32) -> u32 {
        d ^ 1
    }

    #[inline]
    pub fn head(&self, d: u32) -> VertexIx {
        self.dart_origin[Self::twin(d) as usize]
    }

    /// The dart after `d` in the rotation around its origin vertex.
    #[inline]
    pub fn rot_next(&self, d: u32) -> u32 {
        self.next[Self::twin(d) as usize]
    }

    pub fn dart_count(&self) -> usize {
        self.dart_origin.len()
    }

    pub fn face_count(&self) -> usize {
        self.face_walks.len()
    }

    /// Degree of `v` inside this embedding.
    pub fn embedded_degree(&self, v: VertexIx) -> usize {
        self.dart_origin.iter().filter(|&&o| o == v).count()
    }

    /// Local edge count (darts / 2).
    pub fn edge_count(&self) -> usize {
        self.dart_origin.len() / 2
    }
}

/// Mutable embedding under construction for one component.
struct Builder {
    dart_origin: Vec<VertexIx>,
    dart_edge: Vec<EdgeIx>,
    next: Vec<u32>,
    ring_dart: Vec<bool>,
    face_of: Vec<u32>,
    face_walks: Vec<Vec<u32>>,
    faces_dirty: bool,
}

impl Builder {
    fn new() -> Self {
        Self {
            dart_origin: Vec::new(),
            dart_edge: Vec::new(),
            next: Vec::new(),
            ring_dart: Vec::new(),
            face_of: Vec::new(),
            face_walks: Vec::new(),
            faces_dirty: true,
        }
    }

    fn add_dart_pair(&mut self, v: VertexIx, w: VertexIx, e: EdgeIx) -> u32 {
        let d = self.dart_origin.len() as u32;
        self.dart_origin.push(v);
        self.dart_origin.push(w);
        self.dart_edge.push(e);
        self.dart_edge.push(e);
        self.next.push(u32::MAX);
        self.next.push(u32::MAX);
        self.ring_dart.push(false);
        self.ring_dart.push(false);
        d
    }

    fn ensure_faces(&mut self) {
        if !self.faces_dirty {
            return;
        }
        let n = self.dart_origin.len();
        self.face_of = vec![u32::MAX; n];
        self.face_walks.clear();
        for start in 0..n as u32 {
            if self.face_of[start as usize] != u32::MAX {
                continue;
            }
            let f = self.face_walks.len() as u32;
            let mut walk = Vec::new();
            let mut d = start;
            loop {
                self.face_of[d as usize] = f;
                walk.push(d);
                d = self.next[d as usize];
                if d == start {
                    break;
                }
            }
            self.face_walks.push(walk);
        }
        self.faces_dirty = false;
    }

    /// Lowest face id whose walk touches both `u` and `w`, if any.
    fn shared_face(&mut self, u: VertexIx, w: VertexIx) -> Option<u32> {
        self.ensure_faces();
        let mut best: Option<u32> = None;
        for (f, walk) in self.face_walks.iter().enumerate() {
            let mut has_u = false;
            let mut has_w = false;
            for &d in walk {
                let o = self.dart_origin[d as usize];
                has_u |= o == u;
                has_w |= o == w;
            }
            if has_u && has_w {
                best = Some(f as u32);
                break;
            }
        }
        best
    }

    /// Splits face `f` by the chord `u`–`w`, realized by graph edge `e`. The chord attaches at
    /// the first walk corner of each endpoint. Returns the dart `u -> w`.
    fn insert_chord(&mut self, f: u32, u: VertexIx, w: VertexIx, e: EdgeIx) -> u32 {
        self.ensure_faces();
        let walk = self.face_walks[f as usize].clone();
        let len = walk.len();
        let ia = walk
            .iter()
            .position(|&d| self.dart_origin[d as usize] == u)
            .expect("chord endpoint must lie on the face walk");
        let ib = walk
            .iter()
            .position(|&d| self.dart_origin[d as usize] == w)
            .expect("chord endpoint must lie on the face walk");
        let a = walk[ia];
        let b = walk[ib];
        let pa = walk[(ia + len - 1) % len];
        let pb = walk[(ib + len - 1) % len];

        let h1 = self.add_dart_pair(u, w, e);
        let h2 = h1 + 1;
        self.next[pa as usize] = h1;
        self.next[h1 as usize] = b;
        self.next[pb as usize] = h2;
        self.next[h2 as usize] = a;
        self.faces_dirty = true;
        h1
    }

    /// Subdivides the embedded edge under dart `d` at the new vertex `mid`. The slots of `d`
    /// and its twin keep the half from `origin(d)` to `mid`; a fresh dart pair carries the
    /// rest. `e_from` must connect `origin(d)` and `mid`, `e_to` the remainder.
    fn subdivide(&mut self, d: u32, mid: VertexIx, e_from: EdgeIx, e_to: EdgeIx) {
        let q = Embedding::twin(d);
        let y = self.dart_origin[q as usize];

        let r = self.add_dart_pair(mid, y, e_to);
        let s = r + 1;

        // Predecessor of q before any rewiring; when d itself precedes q (head of d has
        // degree 1 on this walk) the predecessor becomes the freshly inserted r.
        let mut t = (0..self.next.len() as u32 - 2)
            .find(|&t| self.next[t as usize] == q)
            .expect("every dart has a face-walk predecessor");

        // Walk of d gains r right after it; the twin-side walk gains s right before q.
        self.next[r as usize] = self.next[d as usize];
        self.next[d as usize] = r;
        if t == d {
            t = r;
        }
        self.next[t as usize] = s;
        self.next[s as usize] = q;

        self.dart_origin[q as usize] = mid;
        self.dart_edge[d as usize] = e_from;
        self.dart_edge[q as usize] = e_from;
        self.faces_dirty = true;
    }

    /// Crossing darts of a shortest dual path from a face at `u` to a face at `w`, or `None`
    /// when the endpoints already share a face. BFS visits faces in id order and walk darts in
    /// walk order, so ties resolve deterministically.
    fn dual_path(&mut self, u: VertexIx, w: VertexIx) -> Option<Vec<u32>> {
        self.ensure_faces();
        let nf = self.face_walks.len();
        let mut incident_u = vec![false; nf];
        let mut incident_w = vec![false; nf];
        for (f, walk) in self.face_walks.iter().enumerate() {
            for &d in walk {
                let o = self.dart_origin[d as usize];
                incident_u[f] |= o == u;
                incident_w[f] |= o == w;
            }
        }

        let mut pred: Vec<Option<u32>> = vec![None; nf];
        let mut visited = vec![false; nf];
        let mut queue: Vec<u32> = Vec::new();
        for f in 0..nf {
            if incident_u[f] {
                if incident_w[f] {
                    return None;
                }
                visited[f] = true;
                queue.push(f as u32);
            }
        }

        let mut head = 0;
        let mut target: Option<u32> = None;
        'bfs: while head < queue.len() {
            let f = queue[head];
            head += 1;
            for &d in &self.face_walks[f as usize] {
                let g = self.face_of[Embedding::twin(d) as usize];
                if visited[g as usize] {
                    continue;
                }
                visited[g as usize] = true;
                pred[g as usize] = Some(d);
                if incident_w[g as usize] {
                    target = Some(g);
                    break 'bfs;
                }
                queue.push(g);
            }
        }

        let mut crossings = Vec::new();
        let mut f = target.expect("dual graph of a connected embedding is connected");
        while let Some(d) = pred[f as usize] {
            crossings.push(d);
            f = self.face_of[d as usize];
        }
        crossings.reverse();
        Some(crossings)
    }

    fn finish(mut self, verts: Vec<VertexIx>, expansions: Vec<(VertexIx, Vec<VertexIx>)>) -> Embedding {
        self.ensure_faces();
        // Outer face: longest boundary walk, ties to the lowest id. Ring interiors never
        // qualify; they must stay inner faces so they compact to rectangles.
        let outer = self
            .face_walks
            .iter()
            .enumerate()
            .filter(|(_, walk)| walk.iter().any(|&d| !self.ring_dart[d as usize]))
            .max_by_key(|(f, walk)| (walk.len(), usize::MAX - f))
            .map(|(f, _)| f as u32)
            .unwrap_or(0);
        let ring_edge = (0..self.dart_origin.len() / 2)
            .map(|k| self.ring_dart[2 * k])
            .collect();
        Embedding {
            verts,
            dart_origin: self.dart_origin,
            dart_edge: self.dart_edge,
            next: self.next,
            face_of: self.face_of,
            face_walks: self.face_walks,
            outer,
            ring_edge,
            expansions,
        }
    }
}

/// Planarizes every connected component of the graph, inserting dummy crossing vertices for
/// edges that could not join the maximal planar subgraph. Isolated vertices produce no
/// embedding and stay unmarked for singleton placement.
pub fn planarize(lg: &mut LayoutGraph) -> (Vec<Embedding>, Vec<Diagnostic>) {
    let mut diagnostics = Vec::new();

    let self_loops: Vec<EdgeIx> = lg
        .graph
        .edge_indices()
        .filter(|&e| lg.graph.is_self_loop(e))
        .collect();
    if !self_loops.is_empty() {
        tracing::warn!(count = self_loops.len(), "dropping self-loops before embedding");
        for e in self_loops.iter() {
            let owner = lg
                .graph
                .edge(*e)
                .label
                .owner
                .expect("self-loops are caller edges");
            lg.graph.remove_edge(*e);
            lg.edge_segments[owner].clear();
            lg.edge_paths[owner].truncate(1);
        }
        diagnostics.push(Diagnostic::SelfLoopsDropped {
            count: self_loops.len(),
        });
    }

    let components = alg::components(&lg.graph);
    let mut embeddings = Vec::new();
    let mut total_edges = 0usize;
    let mut total_deferred = 0usize;

    for comp in components {
        if comp.len() < 2 {
            continue;
        }
        let (embedding, edges, deferred) = planarize_component(lg, &comp);
        total_edges += edges;
        total_deferred += deferred;
        for &v in &embedding.verts {
            lg.graph.vertex_mut(v).embedded = true;
        }
        embeddings.push(embedding);
    }

    if total_edges > 0 && total_deferred * 10 > total_edges * 3 {
        tracing::warn!(
            deferred = total_deferred,
            embedded = total_edges,
            "planarization degraded: deferred-edge ratio exceeds 30%"
        );
        diagnostics.push(Diagnostic::PlanarizationDegraded {
            deferred: total_deferred,
            embedded: total_edges,
        });
    }

    (embeddings, diagnostics)
}

fn planarize_component(
    lg: &mut LayoutGraph,
    comp: &[VertexIx],
) -> (Embedding, usize, usize) {
    let mut b = Builder::new();

    // Seed with a spanning forest: a tree is embeddable with any rotation, and using the
    // adjacency insertion order keeps the rotation reproducible.
    let forest = alg::spanning_forest(&lg.graph, comp);
    let mut in_forest = vec![false; lg.graph.edge_count_bound()];
    let mut dart_of_edge = vec![u32::MAX; lg.graph.edge_count_bound()];
    for &e in &forest {
        in_forest[e.ix()] = true;
        let (v, w) = lg.graph.endpoints(e);
        dart_of_edge[e.ix()] = b.add_dart_pair(v, w, e);
    }

    // Rotation per vertex in adjacency order, then next(d) = rotation successor of twin(d)
    // around head(d).
    let mut rotation: Vec<(VertexIx, Vec<u32>)> = Vec::with_capacity(comp.len());
    for &v in comp {
        let mut out_darts = Vec::new();
        for &e in lg.graph.adjacent(v) {
            if !in_forest[e.ix()] {
                continue;
            }
            let base = dart_of_edge[e.ix()];
            let (ev, _) = lg.graph.endpoints(e);
            out_darts.push(if ev == v { base } else { base + 1 });
        }
        rotation.push((v, out_darts));
    }
    for (_, out_darts) in &rotation {
        for (i, &d) in out_darts.iter().enumerate() {
            let succ = out_darts[(i + 1) % out_darts.len()];
            b.next[Embedding::twin(d) as usize] = succ;
        }
    }
    b.faces_dirty = true;

    // Incremental insertion of the remaining edges in insertion order: accept an edge iff its
    // endpoints currently share a face, otherwise defer it.
    let mut in_comp = vec![false; lg.graph.vertex_count()];
    for &v in comp {
        in_comp[v.ix()] = true;
    }
    let mut deferred: Vec<EdgeIx> = Vec::new();
    let candidates: Vec<EdgeIx> = lg
        .graph
        .edge_indices()
        .filter(|&e| {
            let (v, w) = lg.graph.endpoints(e);
            in_comp[v.ix()] && !in_forest[e.ix()] && v != w && in_comp[w.ix()]
        })
        .collect();
    let edge_total = forest.len() + candidates.len();

    for e in candidates {
        let (v, w) = lg.graph.endpoints(e);
        match b.shared_face(v, w) {
            Some(f) => {
                b.insert_chord(f, v, w, e);
            }
            None => deferred.push(e),
        }
    }

    let deferred_count = deferred.len();
    for e in deferred {
        reinsert_deferred(lg, &mut b, e);
    }

    // Only four compass directions exist, so vertices with more darts than that are replaced
    // by port rings; afterwards every corner angle can stay positive.
    let mut expansions = Vec::new();
    let mut origins = b.dart_origin.clone();
    origins.sort_unstable();
    let mut i = 0;
    while i < origins.len() {
        let v = origins[i];
        let mut j = i;
        while j < origins.len() && origins[j] == v {
            j += 1;
        }
        if j - i > 4 {
            expansions.push((v, expand_vertex(lg, &mut b, v)));
        }
        i = j;
    }

    // Reinsertion and expansion added dummies, so the vertex set comes from the darts.
    let mut verts = b.dart_origin.clone();
    verts.sort_unstable();
    verts.dedup();

    (b.finish(verts, expansions), edge_total, deferred_count)
}

/// Replaces `v` by a cycle of port vertices, one per incident dart in rotation order, and
/// reattaches each incident edge to its port. The ring bounds a fresh inner face that later
/// compacts to a rectangle covering the node box; `v` itself leaves the embedding and gets
/// its position from the ring center.
fn expand_vertex(lg: &mut LayoutGraph, b: &mut Builder, v: VertexIx) -> Vec<VertexIx> {
    // Fan of outgoing darts in rotation order, started at the lowest for reproducibility.
    let start = (0..b.dart_origin.len() as u32)
        .find(|&d| b.dart_origin[d as usize] == v)
        .expect("expanded vertex has incident darts");
    let mut fan = vec![start];
    let mut d = b.next[Embedding::twin(start) as usize];
    while d != start {
        fan.push(d);
        d = b.next[Embedding::twin(d) as usize];
    }
    let k = fan.len();
    debug_assert!(k > 4);

    let (width, height) = {
        let vert = lg.graph.vertex(v);
        (vert.width, vert.height)
    };
    let ring: Vec<VertexIx> = (0..k)
        .map(|_| lg.graph.add_vertex(Vertex::port(width, height)))
        .collect();

    // Ring dart a_i runs ring[i] -> ring[i + 1]; the twins close the interior face.
    let mut ring_darts = Vec::with_capacity(k);
    for i in 0..k {
        let e = lg
            .graph
            .add_edge(ring[i], ring[(i + 1) % k], EdgeData { owner: None });
        let a = b.add_dart_pair(ring[i], ring[(i + 1) % k], e);
        b.ring_dart[a as usize] = true;
        b.ring_dart[a as usize + 1] = true;
        ring_darts.push(a);
    }

    for i in 0..k {
        let o = fan[i];
        let a = ring_darts[i];
        let prev_twin = Embedding::twin(ring_darts[(i + k - 1) % k]);
        // Each corner walk detours over one ring dart between consecutive fan darts.
        b.next[Embedding::twin(o) as usize] = a;
        b.next[a as usize] = fan[(i + 1) % k];
        b.next[Embedding::twin(a) as usize] = prev_twin;
        b.dart_origin[o as usize] = ring[i];

        let e = b.dart_edge[o as usize];
        lg.graph.reattach(e, v, ring[i]);
        let owner = lg
            .graph
            .edge(e)
            .label
            .owner
            .expect("fan darts realize caller edges");
        if lg.edge_segments[owner].first() == Some(&e) && lg.edge_paths[owner].first() == Some(&v)
        {
            lg.edge_paths[owner][0] = ring[i];
        } else {
            debug_assert_eq!(lg.edge_segments[owner].last(), Some(&e));
            let last = lg.edge_paths[owner].len() - 1;
            debug_assert_eq!(lg.edge_paths[owner][last], v);
            lg.edge_paths[owner][last] = ring[i];
        }
    }
    b.faces_dirty = true;
    // Off the dart structure now, but placed by compaction all the same.
    lg.graph.vertex_mut(v).embedded = true;
    ring
}

/// Reinserts a deferred edge as a chain through one dummy crossing vertex per crossed
/// embedded edge, following a shortest face-adjacency path through the dual.
fn reinsert_deferred(lg: &mut LayoutGraph, b: &mut Builder, e: EdgeIx) {
    let owner = lg
        .graph
        .edge(e)
        .label
        .owner
        .expect("deferred edges are caller edges");
    let u = lg.edge_paths[owner][0];
    let w = lg.edge_paths[owner][1];

    let Some(crossings) = b.dual_path(u, w) else {
        // Earlier reinsertions opened a face both endpoints now share.
        lg.graph.remove_edge(e);
        let chain = lg.graph.add_edge(u, w, EdgeData { owner: Some(owner) });
        lg.edge_segments[owner] = vec![chain];
        b.ensure_faces();
        let f = b.shared_face(u, w).expect("dual path said the faces touch");
        b.insert_chord(f, u, w, chain);
        return;
    };

    lg.graph.remove_edge(e);
    let mut path = vec![u];
    let mut segments = Vec::new();

    let mut current = u;
    let mut entry_dart = u32::MAX;
    for d in crossings {
        // Split the crossed edge at a dummy crossing vertex. The dart slot `d` keeps the half
        // on the side we are coming from.
        let crossed = b.dart_edge[d as usize];
        let (mid, e1, e2) = lg.split_edge(crossed, VertexKind::Crossing);
        let (from, _) = lg.graph.endpoints(e1);
        let (e_from, e_to) = if b.dart_origin[d as usize] == from {
            (e1, e2)
        } else {
            (e2, e1)
        };
        b.subdivide(d, mid, e_from, e_to);

        let chain = lg.graph.add_edge(current, mid, EdgeData { owner: Some(owner) });
        b.ensure_faces();
        let f = if entry_dart == u32::MAX {
            b.face_of[d as usize]
        } else {
            b.face_of[entry_dart as usize]
        };
        debug_assert_eq!(f, b.face_of[d as usize]);
        b.insert_chord(f, current, mid, chain);

        path.push(mid);
        segments.push(chain);
        current = mid;
        entry_dart = Embedding::twin(d);
    }

    let chain = lg.graph.add_edge(current, w, EdgeData { owner: Some(owner) });
    b.ensure_faces();
    let f = b.face_of[entry_dart as usize];
    b.insert_chord(f, current, w, chain);
    path.push(w);
    segments.push(chain);

    lg.edge_paths[owner] = path;
    lg.edge_segments[owner] = segments;
}
