use manta::{layout, Diagnostic, EdgeSpec, LayoutConfig, NodeSpec};

fn node(id: u64, width: i32, height: i32) -> NodeSpec {
    NodeSpec { id, width, height }
}

fn edge(source: u64, target: u64) -> EdgeSpec {
    EdgeSpec { source, target }
}

#[test]
fn a_four_cycle_lays_out_as_a_rectangle() {
    let nodes: Vec<_> = (0..4).map(|id| node(id, 10, 10)).collect();
    let edges = [edge(0, 1), edge(1, 2), edge(2, 3), edge(3, 0)];
    let result = layout(&nodes, &edges, &LayoutConfig::default()).unwrap();

    assert_eq!(result.positions.len(), 4);
    assert!(result.edge_bends.iter().all(|route| route.is_empty()));

    // Adjacent centers sit one box-plus-gutter apart on a single axis.
    for e in &edges {
        let a = result.positions[&e.source];
        let b = result.positions[&e.target];
        let aligned_x = a.x == b.x && (a.y - b.y).abs() == 65;
        let aligned_y = a.y == b.y && (a.x - b.x).abs() == 65;
        assert!(aligned_x || aligned_y, "edge {:?} is not axis-tight", e);
    }
    assert_eq!((result.bounds.width, result.bounds.height), (75, 75));
}

#[test]
fn singletons_tile_beneath_the_main_drawing() {
    let nodes = [
        node(1, 10, 10),
        node(2, 10, 10),
        node(3, 20, 12),
        node(4, 16, 8),
    ];
    let result = layout(&nodes, &[edge(1, 2)], &LayoutConfig::default()).unwrap();

    let a = result.positions[&1];
    let b = result.positions[&2];
    assert_eq!(a.y, b.y);
    assert_eq!((b.x - a.x).abs(), 65);

    let main_bottom = a.y + 5;
    let c = result.positions[&3];
    let d = result.positions[&4];
    // First singleton row opens half a gutter below the drawing.
    assert_eq!(c.y - 6, main_bottom + 27);
    assert_eq!(d.y - 4, main_bottom + 27);
    // Tiles advance left to right with half-gutter spacing.
    assert_eq!(d.x - 8, (c.x + 10) + 27);

    assert!(result.bounds.height >= 10 + 27 + 12);
}

#[test]
fn a_graph_of_only_singletons_forms_a_single_row() {
    let nodes: Vec<_> = (0..3).map(|id| node(id, 10, 10)).collect();
    let result = layout(&nodes, &[], &LayoutConfig::default()).unwrap();

    let ys: Vec<_> = result.positions.values().map(|p| p.y).collect();
    assert!(ys.windows(2).all(|w| w[0] == w[1]));
    let mut xs: Vec<_> = result.positions.values().map(|p| p.x).collect();
    xs.sort_unstable();
    assert_eq!(xs[1] - xs[0], 37);
    assert_eq!(xs[2] - xs[1], 37);
}

#[test]
fn self_loops_are_reported_and_skipped() {
    let nodes = [node(1, 10, 10), node(2, 10, 10)];
    let edges = [edge(1, 1), edge(1, 2)];
    let result = layout(&nodes, &edges, &LayoutConfig::default()).unwrap();

    assert!(result
        .diagnostics
        .iter()
        .any(|d| matches!(d, Diagnostic::SelfLoopsDropped { count: 1 })));
    assert!(result.edge_bends[0].is_empty());
    assert_eq!(result.positions.len(), 2);
}

#[test]
fn the_animate_flag_passes_through() {
    let nodes = [node(1, 10, 10)];
    let config = LayoutConfig {
        animate: true,
        ..Default::default()
    };
    let result = layout(&nodes, &[], &config).unwrap();
    assert!(result.animate);
}

#[test]
fn results_serialize_deterministically() {
    let nodes: Vec<_> = (0..6).map(|id| node(id, 10 + id as i32, 10)).collect();
    let mut edges = Vec::new();
    for a in 0..5u64 {
        for b in a + 1..6 {
            edges.push(edge(a, b));
        }
    }
    let first = serde_json::to_string(&layout(&nodes, &edges, &LayoutConfig::default()).unwrap())
        .unwrap();
    let second = serde_json::to_string(&layout(&nodes, &edges, &LayoutConfig::default()).unwrap())
        .unwrap();
    assert_eq!(first, second);
}

#[test]
fn dense_complete_graphs_always_lay_out() {
    // Degrees five and up force ring expansion; the layout must still succeed and keep
    // every pair of node boxes apart.
    for n in 3..=8u64 {
        let nodes: Vec<_> = (0..n).map(|id| node(id, 10, 10)).collect();
        let mut edges = Vec::new();
        for a in 0..n {
            for b in a + 1..n {
                edges.push(edge(a, b));
            }
        }
        let result = layout(&nodes, &edges, &LayoutConfig::default())
            .unwrap_or_else(|e| panic!("complete graph on {n} nodes failed: {e}"));
        assert_eq!(result.positions.len(), n as usize);

        let boxes: Vec<_> = result
            .positions
            .values()
            .map(|&p| manta::Rect::from_center(p, 10, 10))
            .collect();
        for i in 0..boxes.len() {
            for j in i + 1..boxes.len() {
                assert!(
                    !boxes[i].intersects(&boxes[j]),
                    "complete graph on {n} nodes: boxes {i} and {j} overlap"
                );
            }
        }
    }
}

#[test]
fn coordinates_beyond_the_grid_fail_cleanly() {
    // Two chained separations at this gutter exceed i32; the failure must be an error, not
    // a silent wraparound.
    let nodes: Vec<_> = (0..3).map(|id| node(id, 10, 10)).collect();
    let edges = [edge(0, 1), edge(1, 2)];
    let config = LayoutConfig {
        gutter: i32::MAX / 2,
        animate: false,
    };
    let err = layout(&nodes, &edges, &config).unwrap_err();
    assert!(matches!(err, manta::Error::CoordinateOverflow));
}

#[test]
fn crossings_show_up_as_route_points() {
    // K5 cannot be drawn planar; at least one edge routes through a crossing.
    let nodes: Vec<_> = (0..5).map(|id| node(id, 10, 10)).collect();
    let mut edges = Vec::new();
    for a in 0..4u64 {
        for b in a + 1..5 {
            edges.push(edge(a, b));
        }
    }
    let result = layout(&nodes, &edges, &LayoutConfig::default()).unwrap();
    assert!(result.edge_bends.iter().any(|route| !route.is_empty()));
}

#[test]
fn empty_input_yields_an_empty_result() {
    let result = layout(&[], &[], &LayoutConfig::default()).unwrap();
    assert!(result.positions.is_empty());
    assert!(result.edge_bends.is_empty());
    assert_eq!(result.bounds.width, 0);
    assert_eq!(result.bounds.height, 0);
}
