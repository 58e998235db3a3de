//! Orthogonal graph layout by topology-shape-metrics.
//!
//! The pipeline embeds each connected component in the plane (inserting crossing dummies
//! where planarity fails), computes a bend-minimal orthogonal shape by min-cost flow,
//! compacts the shape onto the integer grid with one-dimensional constraint graphs, and
//! tiles edge-less nodes beneath the drawing. All stages are deterministic: the same input
//! always yields the same coordinates.

pub use manta_graphlib as graphlib;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod compact;
pub mod error;
pub mod model;
pub mod orthogonalize;
pub mod pipeline;
pub mod place;
pub mod planarize;

pub use error::{Diagnostic, Error, Result};
pub use model::{EdgeSpec, NodeSpec, Point, Rect};
pub use pipeline::{LayoutConfig, LayoutResult};

/// Lays out the given nodes and edges. Node sizes are box extents in grid units; the
/// returned coordinates are box centers.
pub fn layout(
    nodes: &[NodeSpec],
    edges: &[EdgeSpec],
    config: &LayoutConfig,
) -> Result<LayoutResult> {
    pipeline::run(nodes, edges, config)
}
