//! Orthogonalizer: per embedded component, assigns an angle to every edge-end and a bend
//! sequence to every edge, minimizing total bend count (Tamassia's flow formulation).
//!
//! Angles are kept in 90° units. The corner "owned" by dart `d` is the one at `head(d)`
//! between `d` and `next(d)`, lying in `face(d)`; summing the units of all corners owned by
//! darts pointing at a vertex always yields 4 (360°).

use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::graphlib::VertexIx;
use crate::planarize::Embedding;

mod flow;

pub use flow::FlowNet;

/// A 90° bend, relative to the travel direction of the edge's forward dart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    Left,
    Right,
}

impl Turn {
    pub fn mirrored(self) -> Turn {
        match self {
            Turn::Left => Turn::Right,
            Turn::Right => Turn::Left,
        }
    }
}

/// The orthogonal shape of one embedded component: corner angles and bend sequences.
#[derive(Debug, Clone)]
pub struct OrthoShape {
    /// Corner units per dart (1..=4), see module docs for the corner convention.
    pub angles: Vec<u8>,
    /// Bend sequence per local edge `k`, in the direction of dart `2k`. A `Left` is convex
    /// toward the face left of that dart.
    pub bends: Vec<Vec<Turn>>,
}

impl OrthoShape {
    /// Bend sequence of local edge `k` as seen when traversing dart `d` (`2k` or `2k + 1`).
    pub fn bends_along(&self, d: u32) -> Vec<Turn> {
        let stored = &self.bends[(d / 2) as usize];
        if d % 2 == 0 {
            stored.clone()
        } else {
            stored.iter().rev().map(|t| t.mirrored()).collect()
        }
    }

    pub fn total_bends(&self) -> usize {
        self.bends.iter().map(Vec::len).sum()
    }
}

/// Orthogonalizes every component. Path and cycle components are shaped directly; everything
/// else goes through the min-cost-flow solver.
pub fn orthogonalize(embeddings: &[Embedding]) -> Result<Vec<OrthoShape>> {
    embeddings.iter().map(orthogonalize_component).collect()
}

fn orthogonalize_component(emb: &Embedding) -> Result<OrthoShape> {
    let degrees: Vec<(VertexIx, usize)> = emb
        .verts
        .iter()
        .map(|&v| (v, emb.embedded_degree(v)))
        .collect();
    let max_degree = degrees.iter().map(|&(_, d)| d).max().unwrap_or(0);
    let is_path = emb.edge_count() == emb.verts.len() - 1 && max_degree <= 2;
    let is_cycle =
        emb.edge_count() == emb.verts.len() && max_degree == 2 && emb.verts.len() >= 3;

    let shape = if is_path {
        path_shape(emb, &degrees)
    } else if is_cycle {
        cycle_shape(emb)
    } else {
        flow_shape(emb, &degrees)?
    };

    verify_angle_sums(emb, &shape)?;
    Ok(shape)
}

/// Straight line: 180° at interior vertices, 360° at the two ends, no bends.
fn path_shape(emb: &Embedding, degrees: &[(VertexIx, usize)]) -> OrthoShape {
    let mut angles = vec![0u8; emb.dart_count()];
    for d in 0..emb.dart_count() as u32 {
        let v = emb.head(d);
        let deg = degrees
            .iter()
            .find(|&&(w, _)| w == v)
            .map(|&(_, deg)| deg)
            .unwrap_or(0);
        angles[d as usize] = if deg == 1 { 4 } else { 2 };
    }
    OrthoShape {
        angles,
        bends: vec![Vec::new(); emb.edge_count()],
    }
}

/// Rectangle: four 90° corners at deterministic walk positions, everything else straight.
/// A triangle gets three corners plus one convex bend on the walk's first edge.
fn cycle_shape(emb: &Embedding) -> OrthoShape {
    let inner: u32 = if emb.outer == 0 { 1 } else { 0 };
    let walk = &emb.face_walks[inner as usize];
    let k = walk.len();

    let mut corner_positions = vec![0, k / 4, k / 2, 3 * k / 4];
    corner_positions.dedup();

    let mut angles = vec![0u8; emb.dart_count()];
    for (i, &d) in walk.iter().enumerate() {
        let inner_units: u8 = if corner_positions.contains(&i) { 1 } else { 2 };
        angles[d as usize] = inner_units;
        // The head vertex has exactly one other corner, on the outer walk.
        let v = emb.head(d);
        let other = (0..emb.dart_count() as u32)
            .find(|&q| q != d && emb.head(q) == v)
            .expect("cycle vertex has two incident darts");
        angles[other as usize] = 4 - inner_units;
    }

    let mut bends = vec![Vec::new(); emb.edge_count()];
    if k == 3 {
        // One bend closes the rectangle; make it convex toward the inner face.
        let d = walk[0];
        let turn = if d % 2 == 0 { Turn::Left } else { Turn::Right };
        bends[(d / 2) as usize].push(turn);
    }
    OrthoShape { angles, bends }
}

fn flow_shape(emb: &Embedding, degrees: &[(VertexIx, usize)]) -> Result<OrthoShape> {
    let mut net = FlowNet::new();

    // One flow node per component vertex, then one per face.
    let vertex_node: Vec<u32> = degrees.iter().map(|_| net.add_node()).collect();
    let face_node: Vec<u32> = (0..emb.face_count()).map(|_| net.add_node()).collect();

    let mut vertex_slot: FxHashMap<VertexIx, u32> = FxHashMap::default();
    for (i, &(v, deg)) in degrees.iter().enumerate() {
        // Ring expansion keeps every embedded degree within the four compass directions.
        debug_assert!(deg <= 4);
        vertex_slot.insert(v, vertex_node[i]);
    }

    // Ring interiors must compact to rectangles: their corners stay at 90° or 180° and
    // their boundary edges never bend.
    let ring_face: Vec<bool> = emb
        .face_walks
        .iter()
        .map(|walk| walk.iter().all(|&d| emb.ring_edge[(d / 2) as usize]))
        .collect();

    // Every corner arc carries a lower bound of 1, pre-pushed out of the excesses.
    for &(v, deg) in degrees.iter() {
        net.add_excess(vertex_slot[&v], 4 - deg as i64);
    }
    for (f, walk) in emb.face_walks.iter().enumerate() {
        let len = walk.len() as i64;
        let demand = if f as u32 == emb.outer {
            2 * len + 4
        } else {
            2 * len - 4
        };
        net.add_excess(face_node[f], len - demand);
    }

    // Corner arcs (residual capacity net of the pre-push), then bend arcs between face
    // pairs. A bend-arc unit is a bend convex in the arc's source face.
    let mut corner_arc = vec![u32::MAX; emb.dart_count()];
    let mut bend_arc = vec![u32::MAX; emb.dart_count()];
    for d in 0..emb.dart_count() as u32 {
        let f = emb.face_of[d as usize];
        let v = emb.head(d);
        let cap = if ring_face[f as usize] { 1 } else { 3 };
        corner_arc[d as usize] = net.add_arc(vertex_slot[&v], face_node[f as usize], cap, 0);
    }
    for d in 0..emb.dart_count() as u32 {
        if emb.ring_edge[(d / 2) as usize] {
            continue;
        }
        let f = emb.face_of[d as usize];
        let g = emb.face_of[Embedding::twin(d) as usize];
        if f == g {
            continue;
        }
        bend_arc[d as usize] = net.add_arc(
            face_node[f as usize],
            face_node[g as usize],
            FlowNet::unbounded_cap(),
            1,
        );
    }

    let Some(total) = net.solve() else {
        return Err(Error::EmbeddingInconsistent {
            message: "bend-minimization flow is infeasible".to_string(),
        });
    };
    tracing::debug!(bends = total, "bend minimization solved");

    let mut angles = vec![0u8; emb.dart_count()];
    for d in 0..emb.dart_count() {
        angles[d] = 1 + net.flow(corner_arc[d]) as u8;
    }

    let mut bends = vec![Vec::new(); emb.edge_count()];
    for k in 0..emb.edge_count() {
        let fwd = 2 * k as u32;
        let rev = fwd + 1;
        let lefts = if bend_arc[fwd as usize] != u32::MAX {
            net.flow(bend_arc[fwd as usize])
        } else {
            0
        };
        let rights = if bend_arc[rev as usize] != u32::MAX {
            net.flow(bend_arc[rev as usize])
        } else {
            0
        };
        let seq = &mut bends[k];
        seq.extend(std::iter::repeat_n(Turn::Left, lefts as usize));
        seq.extend(std::iter::repeat_n(Turn::Right, rights as usize));
    }

    Ok(OrthoShape { angles, bends })
}

fn verify_angle_sums(emb: &Embedding, shape: &OrthoShape) -> Result<()> {
    for &v in &emb.verts {
        let sum: u32 = (0..emb.dart_count() as u32)
            .filter(|&d| emb.head(d) == v)
            .map(|d| shape.angles[d as usize] as u32)
            .sum();
        if sum != 4 {
            return Err(Error::EmbeddingInconsistent {
                message: format!("angles around {v:?} sum to {}x90, expected 360", sum),
            });
        }
    }
    Ok(())
}
