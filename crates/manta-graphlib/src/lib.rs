//! Arena-based graph container APIs used by `manta`.
//!
//! Vertices and edges live in `Vec` arenas addressed by `u32` index newtypes. Adjacency is
//! stored per vertex in edge-insertion order, so every traversal that touches the container is
//! deterministic by construction. The container knows nothing about the caller's node ids;
//! that mapping belongs to the layout engine.

mod graph;

pub mod alg;

pub use graph::{EdgeEntry, EdgeIx, Graph, VertexIx};
