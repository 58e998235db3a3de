//! Pipeline: runs the four layout stages in order and assembles the caller-facing result.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::compact;
use crate::error::{Diagnostic, Result};
use crate::model::{self, EdgeSpec, NodeSpec, Point, Rect, VertexKind};
use crate::orthogonalize;
use crate::place;
use crate::planarize;

/// Knobs for a layout run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Minimum whitespace between any two element boxes, in grid units.
    pub gutter: i32,
    /// Passed through to [`LayoutResult::animate`] for callers that stage transitions.
    pub animate: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            gutter: 55,
            animate: false,
        }
    }
}

/// Computed layout: node centers, per-edge route points, and the overall bounding box.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutResult {
    /// Center coordinates per node id.
    pub positions: BTreeMap<model::NodeId, Point>,
    /// Interior route points per input edge, in input order. Covers bends, edge crossings,
    /// and ring-expansion ports; an edge drawn as a single straight segment has an empty
    /// route.
    pub edge_bends: Vec<Vec<Point>>,
    pub bounds: Rect,
    pub animate: bool,
    /// Non-fatal degradations encountered during the run.
    pub diagnostics: Vec<Diagnostic>,
}

pub fn run(nodes: &[NodeSpec], edges: &[EdgeSpec], config: &LayoutConfig) -> Result<LayoutResult> {
    let mut lg = model::build_graph(nodes, edges)?;

    let (embeddings, diagnostics) = planarize::planarize(&mut lg);
    let shapes = orthogonalize::orthogonalize(&embeddings)?;
    let drawing = compact::compact(&mut lg, &embeddings, &shapes, config.gutter)?;
    let (positions, bounds) = place::place(&mut lg, drawing, config.gutter);

    tracing::debug!(
        nodes = nodes.len(),
        edges = edges.len(),
        components = embeddings.len(),
        width = bounds.width,
        height = bounds.height,
        "layout complete"
    );

    let mut edge_bends = Vec::with_capacity(edges.len());
    for path in &lg.edge_paths {
        // A path shorter than two vertices means the edge was dropped (self-loop). Every
        // synthetic path vertex becomes a route point: bends, crossings, and the ports an
        // edge attaches to when its endpoint was ring-expanded.
        let route: Vec<Point> = if path.len() >= 2 {
            path.iter()
                .filter(|&&v| !matches!(lg.graph.vertex(v).kind, VertexKind::Real(_)))
                .filter_map(|&v| lg.graph.vertex(v).pos)
                .collect()
        } else {
            Vec::new()
        };
        edge_bends.push(route);
    }

    Ok(LayoutResult {
        positions,
        edge_bends,
        bounds,
        animate: config.animate,
        diagnostics,
    })
}
