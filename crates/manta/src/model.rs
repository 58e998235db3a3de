//! Graph model: the caller-facing node/edge specs and the internal layout graph.
//!
//! The internal graph holds one real vertex per caller node plus the synthetic vertices later
//! stages insert (crossings, bends). Algorithmic stages only ever see vertex/edge indices; the
//! `NodeId` side table is consulted again when coordinates are mapped back.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::graphlib::{EdgeIx, Graph, VertexIx};

/// Opaque caller node identity.
pub type NodeId = u64;

/// A caller node: opaque id plus a fixed bounding-box size in integer units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSpec {
    pub id: NodeId,
    pub width: i32,
    pub height: i32,
}

/// A caller edge. Self-loops and parallel edges are permitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeSpec {
    pub source: NodeId,
    pub target: NodeId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn from_center(center: Point, width: i32, height: i32) -> Self {
        Self {
            x: center.x - width / 2,
            y: center.y - height / 2,
            width,
            height,
        }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn inflate(&self, margin: i32) -> Self {
        Self {
            x: self.x - margin,
            y: self.y - margin,
            width: self.width + 2 * margin,
            height: self.height + 2 * margin,
        }
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    pub fn union(&self, other: &Rect) -> Self {
        if self.width == 0 && self.height == 0 {
            return *other;
        }
        if other.width == 0 && other.height == 0 {
            return *self;
        }
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Self {
            x,
            y,
            width: self.right().max(other.right()) - x,
            height: self.bottom().max(other.bottom()) - y,
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexKind {
    /// Mirrors a caller node.
    Real(NodeId),
    /// Synthetic vertex standing in for an edge crossing.
    Crossing,
    /// Synthetic vertex standing in for a bend point.
    Bend,
    /// Attachment point on the expansion ring of a node whose degree exceeds four. Ports carry
    /// the node's own size so compaction keeps the ring wide enough to cover the node box.
    Port,
}

#[derive(Debug, Clone)]
pub struct Vertex {
    pub kind: VertexKind,
    pub width: i32,
    pub height: i32,
    /// Set only once compaction completes.
    pub pos: Option<Point>,
    /// Whether the planarizer placed this vertex in any embedding. Real vertices that never
    /// enter one are singletons; the coordinate value itself is never used to detect that.
    pub embedded: bool,
}

impl Vertex {
    pub fn real(id: NodeId, width: i32, height: i32) -> Self {
        Self {
            kind: VertexKind::Real(id),
            width,
            height,
            pos: None,
            embedded: false,
        }
    }

    pub fn synthetic(kind: VertexKind) -> Self {
        debug_assert!(!matches!(kind, VertexKind::Real(_)));
        Self {
            kind,
            width: 0,
            height: 0,
            pos: None,
            embedded: false,
        }
    }

    pub fn port(width: i32, height: i32) -> Self {
        Self {
            kind: VertexKind::Port,
            width,
            height,
            pos: None,
            embedded: false,
        }
    }

    pub fn node_id(&self) -> Option<NodeId> {
        match self.kind {
            VertexKind::Real(id) => Some(id),
            _ => None,
        }
    }
}

/// Per-edge payload: the index of the owning caller edge. Expansion-ring edges belong to no
/// caller edge and carry `None`.
#[derive(Debug, Clone, Copy)]
pub struct EdgeData {
    pub owner: Option<usize>,
}

/// The internal graph plus the bookkeeping the stages share.
#[derive(Debug, Clone)]
pub struct LayoutGraph {
    pub graph: Graph<Vertex, EdgeData>,
    pub by_node: FxHashMap<NodeId, VertexIx>,
    /// For every caller edge, its current segment-vertex path (endpoints plus any inserted
    /// dummies) and the graph edges realizing it, kept in path order. Self-loop owners have an
    /// empty segment list.
    pub edge_paths: Vec<Vec<VertexIx>>,
    pub edge_segments: Vec<Vec<EdgeIx>>,
}

impl LayoutGraph {
    /// Splits graph edge `e` at a new synthetic vertex, updating the owner's path. Returns the
    /// new vertex and the two replacement edges, ordered along the owner's path direction.
    pub fn split_edge(&mut self, e: EdgeIx, kind: VertexKind) -> (VertexIx, EdgeIx, EdgeIx) {
        let owner = self
            .graph
            .edge(e)
            .label
            .owner
            .expect("ring edges are never split");
        let pos = self.edge_segments[owner]
            .iter()
            .position(|&s| s == e)
            .expect("split edge must belong to its owner's segment list");
        // Path direction, not arena endpoint order.
        let a = self.edge_paths[owner][pos];
        let b = self.edge_paths[owner][pos + 1];

        let mid = self.graph.add_vertex(Vertex::synthetic(kind));
        self.graph.remove_edge(e);
        let e1 = self.graph.add_edge(a, mid, EdgeData { owner: Some(owner) });
        let e2 = self.graph.add_edge(mid, b, EdgeData { owner: Some(owner) });

        self.edge_paths[owner].insert(pos + 1, mid);
        self.edge_segments[owner].splice(pos..=pos, [e1, e2]);
        (mid, e1, e2)
    }
}

/// Builds the internal graph: one real vertex per node, one edge per caller edge, no dummies.
///
/// Rejects duplicate node ids, edges referencing unknown nodes, and negative node sizes.
pub fn build_graph(nodes: &[NodeSpec], edges: &[EdgeSpec]) -> Result<LayoutGraph> {
    let mut graph: Graph<Vertex, EdgeData> = Graph::new();
    let mut by_node: FxHashMap<NodeId, VertexIx> = FxHashMap::default();

    for node in nodes {
        if node.width < 0 || node.height < 0 {
            return Err(Error::InvalidNodeSize {
                node: node.id,
                width: node.width,
                height: node.height,
            });
        }
        if by_node.contains_key(&node.id) {
            return Err(Error::DuplicateNode { node: node.id });
        }
        let ix = graph.add_vertex(Vertex::real(node.id, node.width, node.height));
        by_node.insert(node.id, ix);
    }

    let mut edge_paths = Vec::with_capacity(edges.len());
    let mut edge_segments = Vec::with_capacity(edges.len());
    for (owner, edge) in edges.iter().enumerate() {
        let v = *by_node
            .get(&edge.source)
            .ok_or(Error::InvalidTopology { node: edge.source })?;
        let w = *by_node
            .get(&edge.target)
            .ok_or(Error::InvalidTopology { node: edge.target })?;
        let e = graph.add_edge(v, w, EdgeData { owner: Some(owner) });
        edge_paths.push(vec![v, w]);
        edge_segments.push(vec![e]);
    }

    Ok(LayoutGraph {
        graph,
        by_node,
        edge_paths,
        edge_segments,
    })
}
