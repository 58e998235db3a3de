//! Error taxonomy for the layout pipeline.
//!
//! Input errors surface before any stage runs. Internal consistency failures mean an earlier
//! stage produced malformed output; they are always fatal and never produce a partial layout.
//! Quality problems that still yield a valid drawing travel as [`Diagnostic`]s next to the
//! successful result instead.

use serde::{Deserialize, Serialize};

use crate::model::NodeId;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("edge references unknown node {node}")]
    InvalidTopology { node: NodeId },

    #[error("duplicate node id {node}")]
    DuplicateNode { node: NodeId },

    #[error("node {node} has a negative size ({width}x{height})")]
    InvalidNodeSize {
        node: NodeId,
        width: i32,
        height: i32,
    },

    #[error("embedding is inconsistent: {message}")]
    EmbeddingInconsistent { message: String },

    #[error("compaction constraint graph contains a cycle on the {axis} axis")]
    CompactionCycle { axis: &'static str },

    #[error("layout exceeds the i32 coordinate range")]
    CoordinateOverflow,
}

/// Non-fatal quality diagnostics reported alongside a successful layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Diagnostic {
    /// Too many edges had to be deferred and reinserted through crossings; bend count and area
    /// may be well above optimum for this input.
    PlanarizationDegraded { deferred: usize, embedded: usize },
    /// Self-loops carry no shape information and were dropped before embedding.
    SelfLoopsDropped { count: usize },
}
