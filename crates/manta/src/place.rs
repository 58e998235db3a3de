//! Placement: final node positions plus tiling of nodes the main drawing left out.
//!
//! nodes with no surviving edges never enter an embedding, so the compactor assigns them no
//! coordinates. They are laid out in rows beneath the main drawing, separated by half the
//! gutter, wrapping at the drawing's width.

use std::collections::BTreeMap;

use crate::compact::Drawing;
use crate::model::{LayoutGraph, NodeId, Point, Rect, VertexKind};

/// Tiles every unplaced real vertex and returns the node center table together with the
/// bounding box of the full picture.
pub fn place(lg: &mut LayoutGraph, drawing: Drawing, gutter: i32) -> (BTreeMap<NodeId, Point>, Rect) {
    let bounds = tile_singletons(lg, drawing.bounds, gutter);

    let mut positions = BTreeMap::new();
    for v in lg.graph.vertex_indices() {
        let vert = lg.graph.vertex(v);
        if let (VertexKind::Real(id), Some(pos)) = (vert.kind, vert.pos) {
            positions.insert(id, pos);
        }
    }
    (positions, bounds)
}

fn tile_singletons(lg: &mut LayoutGraph, main: Rect, gutter: i32) -> Rect {
    let singletons: Vec<_> = lg
        .graph
        .vertex_indices()
        .filter(|&v| {
            let vert = lg.graph.vertex(v);
            matches!(vert.kind, VertexKind::Real(_)) && !vert.embedded
        })
        .collect();
    if singletons.is_empty() {
        return main;
    }

    let spacing = gutter / 2;
    let has_main = main.width > 0 || main.height > 0;
    // Without a main drawing there is nothing to wrap against; everything goes in one row.
    let wrap_at = if has_main { main.right() } else { i32::MAX };
    let mut cursor_x = main.x;
    let mut row_top = if has_main { main.bottom() + spacing } else { main.y };
    let mut row_height = 0;
    let mut bounds = main;

    for v in singletons {
        let (w, h) = {
            let vert = lg.graph.vertex(v);
            (vert.width.max(1), vert.height.max(1))
        };
        if cursor_x > main.x && cursor_x + w > wrap_at {
            cursor_x = main.x;
            row_top += row_height + spacing;
            row_height = 0;
        }
        let center = Point::new(cursor_x + w / 2, row_top + h / 2);
        lg.graph.vertex_mut(v).pos = Some(center);
        bounds = bounds.union(&Rect {
            x: cursor_x,
            y: row_top,
            width: w,
            height: h,
        });
        cursor_x += w + spacing;
        row_height = row_height.max(h);
    }

    bounds
}
