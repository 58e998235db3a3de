use manta::model::{self, EdgeSpec, NodeSpec, VertexKind};
use manta::Error;

fn node(id: u64) -> NodeSpec {
    NodeSpec {
        id,
        width: 10,
        height: 10,
    }
}

fn edge(source: u64, target: u64) -> EdgeSpec {
    EdgeSpec { source, target }
}

#[test]
fn build_graph_indexes_nodes_and_edges_in_input_order() {
    let lg = model::build_graph(&[node(7), node(3), node(9)], &[edge(3, 9), edge(7, 3)]).unwrap();

    assert_eq!(lg.graph.vertex_count(), 3);
    assert_eq!(lg.graph.edge_count(), 2);
    assert_eq!(lg.edge_paths.len(), 2);
    assert_eq!(lg.edge_segments.len(), 2);
    for (path, segments) in lg.edge_paths.iter().zip(&lg.edge_segments) {
        assert_eq!(path.len(), 2);
        assert_eq!(segments.len(), 1);
    }
}

#[test]
fn build_graph_rejects_duplicate_node_ids() {
    let err = model::build_graph(&[node(1), node(1)], &[]).unwrap_err();
    assert!(matches!(err, Error::DuplicateNode { node: 1 }));
}

#[test]
fn build_graph_rejects_edges_to_unknown_nodes() {
    let err = model::build_graph(&[node(1)], &[edge(1, 2)]).unwrap_err();
    assert!(matches!(err, Error::InvalidTopology { node: 2 }));
}

#[test]
fn build_graph_rejects_negative_node_sizes() {
    let err = model::build_graph(
        &[NodeSpec {
            id: 5,
            width: -1,
            height: 10,
        }],
        &[],
    )
    .unwrap_err();
    assert!(matches!(err, Error::InvalidNodeSize { node: 5, .. }));
}

#[test]
fn split_edge_splices_the_owner_path() {
    let mut lg = model::build_graph(&[node(1), node(2)], &[edge(1, 2)]).unwrap();
    let e = lg.edge_segments[0][0];
    let (mid, first, second) = lg.split_edge(e, VertexKind::Crossing);

    assert_eq!(lg.edge_paths[0].len(), 3);
    assert_eq!(lg.edge_paths[0][1], mid);
    assert_eq!(lg.edge_segments[0], vec![first, second]);
    assert!(matches!(lg.graph.vertex(mid).kind, VertexKind::Crossing));

    // The chain still runs endpoint to endpoint through the new vertex.
    let (u, _) = lg.graph.endpoints(first);
    let (m, w) = lg.graph.endpoints(second);
    assert_eq!(u, lg.edge_paths[0][0]);
    assert_eq!(m, mid);
    assert_eq!(w, lg.edge_paths[0][2]);
}
