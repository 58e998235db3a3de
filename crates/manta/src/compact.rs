//! Compactor: realizes each orthogonal shape on the integer grid.
//!
//! Two independent one-dimensional constraint graphs (x and y) are built from the shape's
//! segment directions, node sizes and the gutter, then solved by longest path over a DAG.
//! Points joined by a vertical segment share an x coordinate (one x-class), points joined by
//! a horizontal segment share a y-class. A repair pass then inserts extra separation arcs for
//! anything the segment constraints alone did not keep apart: overlapping node boxes,
//! segments cutting through non-incident boxes, spurious segment crossings, and points lying
//! on foreign segments. Disconnected components are packed side by side at the end.

use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::graphlib::{EdgeIx, VertexIx, alg::DisjointSets};
use crate::model::{LayoutGraph, Point, Rect, VertexKind};
use crate::orthogonalize::{OrthoShape, Turn};
use crate::planarize::Embedding;

/// Compass direction of a traversed segment, counterclockwise from East.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Dir(u8);

impl Dir {
    const EAST: Dir = Dir(0);

    fn rot_ccw(self, n: i32) -> Dir {
        Dir((self.0 as i32 + n).rem_euclid(4) as u8)
    }

    fn opposite(self) -> Dir {
        self.rot_ccw(2)
    }

    fn is_horizontal(self) -> bool {
        self.0 % 2 == 0
    }

    /// True for the direction of increasing coordinate on its own axis (East, South).
    fn is_forward(self) -> bool {
        // Screen coordinates: y grows downward, so South is forward on y.
        self.0 == 0 || self.0 == 3
    }
}

fn turn_rotation(t: Turn) -> i32 {
    match t {
        Turn::Left => 1,
        Turn::Right => -1,
    }
}

/// Output of compaction. Vertex coordinates (including crossing and bend dummies) are written
/// onto the layout graph itself; [`Drawing::bounds`] is the main drawing's bounding box.
#[derive(Debug, Clone, Copy, Default)]
pub struct Drawing {
    pub bounds: Rect,
}

/// A straight axis-aligned segment between two local points.
#[derive(Debug, Clone, Copy)]
struct Segment {
    a: u32,
    b: u32,
    dir: Dir,
}

pub fn compact(
    lg: &mut LayoutGraph,
    embeddings: &[Embedding],
    shapes: &[OrthoShape],
    gutter: i32,
) -> Result<Drawing> {
    let mut bounds = Rect::default();
    let mut cursor_x = 0i32;

    for (emb, shape) in embeddings.iter().zip(shapes) {
        let comp = compact_component(lg, emb, shape, gutter)?;
        let offset_x = cursor_x - comp.bounds.x;
        let offset_y = -comp.bounds.y;
        for (&v, &p) in &comp.vertex_pos {
            lg.graph.vertex_mut(v).pos = Some(Point::new(p.x + offset_x, p.y + offset_y));
        }
        for (e, (origin, pts)) in comp.edge_bends {
            let shifted: Vec<Point> = pts
                .iter()
                .map(|p| Point::new(p.x + offset_x, p.y + offset_y))
                .collect();
            materialize_bends(lg, e, origin, &shifted);
        }
        let placed = Rect {
            x: comp.bounds.x + offset_x,
            y: comp.bounds.y + offset_y,
            ..comp.bounds
        };
        bounds = bounds.union(&placed);
        cursor_x = placed.right() + gutter;
    }

    Ok(Drawing { bounds })
}

struct CompactedComponent {
    vertex_pos: FxHashMap<VertexIx, Point>,
    /// Bend points per graph edge, ordered from the recorded origin endpoint.
    edge_bends: Vec<(EdgeIx, (VertexIx, Vec<Point>))>,
    bounds: Rect,
}

fn compact_component(
    lg: &LayoutGraph,
    emb: &Embedding,
    shape: &OrthoShape,
    gutter: i32,
) -> Result<CompactedComponent> {
    let dirs = assign_directions(emb, shape)?;

    // Local points: component vertices first, then one point per bend.
    let mut local: FxHashMap<VertexIx, u32> = FxHashMap::default();
    for (i, &v) in emb.verts.iter().enumerate() {
        local.insert(v, i as u32);
    }
    let mut sizes: Vec<(i32, i32)> = emb
        .verts
        .iter()
        .map(|&v| {
            let vert = lg.graph.vertex(v);
            (vert.width, vert.height)
        })
        .collect();

    let mut segments: Vec<Segment> = Vec::new();
    let mut bend_points: Vec<Vec<u32>> = vec![Vec::new(); emb.edge_count()];
    for k in 0..emb.edge_count() {
        let d = 2 * k as u32;
        let mut dir = dirs[d as usize];
        let mut prev = local[&emb.dart_origin[d as usize]];
        for &turn in &shape.bends[k] {
            let p = sizes.len() as u32;
            sizes.push((0, 0));
            bend_points[k].push(p);
            segments.push(Segment { a: prev, b: p, dir });
            dir = dir.rot_ccw(turn_rotation(turn));
            prev = p;
        }
        segments.push(Segment {
            a: prev,
            b: local[&emb.head(d)],
            dir,
        });
    }

    let n_points = sizes.len();
    let mut x_classes = DisjointSets::new(n_points);
    let mut y_classes = DisjointSets::new(n_points);
    for seg in &segments {
        if seg.dir.is_horizontal() {
            y_classes.union(seg.a as usize, seg.b as usize);
        } else {
            x_classes.union(seg.a as usize, seg.b as usize);
        }
    }

    let mut x_arcs: Vec<(usize, usize, i64)> = Vec::new();
    let mut y_arcs: Vec<(usize, usize, i64)> = Vec::new();
    for seg in &segments {
        let (from, to) = if seg.dir.is_forward() {
            (seg.a, seg.b)
        } else {
            (seg.b, seg.a)
        };
        if seg.dir.is_horizontal() {
            let w = separation(sizes[from as usize].0, sizes[to as usize].0, gutter);
            x_arcs.push((
                x_classes.find(from as usize),
                x_classes.find(to as usize),
                w,
            ));
        } else {
            let w = separation(sizes[from as usize].1, sizes[to as usize].1, gutter);
            y_arcs.push((
                y_classes.find(from as usize),
                y_classes.find(to as usize),
                w,
            ));
        }
    }

    let mut xs = solve_axis(n_points, &mut x_classes, &x_arcs, "x")?;
    let mut ys = solve_axis(n_points, &mut y_classes, &y_arcs, "y")?;

    // Repair pass: scan for geometry the segment constraints left inconsistent and add one
    // separation arc per violation. Each accepted arc settles its violation for good, so the
    // loop terminates once every pair is either clean or arced.
    let real_points: Vec<u32> = emb
        .verts
        .iter()
        .enumerate()
        .filter(|&(_, &v)| matches!(lg.graph.vertex(v).kind, VertexKind::Real(_)))
        .map(|(i, _)| i as u32)
        .collect();
    let mut skipped: Vec<Violation> = Vec::new();
    let max_rounds = (n_points + segments.len()).pow(2) + 16;
    for _ in 0..max_rounds {
        let Some(violation) = find_violation(
            &real_points,
            &segments,
            &sizes,
            &xs,
            &ys,
            gutter,
            &skipped,
        ) else {
            break;
        };

        // Candidate arcs in increasing-push order; an arc that would close a constraint
        // cycle is backed out and the next candidate tried.
        let fixes = candidate_fixes(violation, &segments, &sizes, &xs, &ys, gutter);
        let mut applied = false;
        for fix in fixes {
            if fix.axis_x {
                let from = x_classes.find(fix.from);
                let to = x_classes.find(fix.to);
                if from == to {
                    continue;
                }
                x_arcs.push((from, to, fix.weight));
                match solve_axis(n_points, &mut x_classes, &x_arcs, "x") {
                    Ok(solved) => {
                        xs = solved;
                        applied = true;
                        break;
                    }
                    Err(_) => {
                        x_arcs.pop();
                    }
                }
            } else {
                let from = y_classes.find(fix.from);
                let to = y_classes.find(fix.to);
                if from == to {
                    continue;
                }
                y_arcs.push((from, to, fix.weight));
                match solve_axis(n_points, &mut y_classes, &y_arcs, "y") {
                    Ok(solved) => {
                        ys = solved;
                        applied = true;
                        break;
                    }
                    Err(_) => {
                        y_arcs.pop();
                    }
                }
            }
        }
        if !applied {
            tracing::warn!(?violation, "geometry violation could not be separated");
            skipped.push(violation);
        }
    }

    let mut vertex_pos = FxHashMap::default();
    let mut bounds = Rect::default();
    for (i, &v) in emb.verts.iter().enumerate() {
        let p = Point::new(grid_coord(xs[i])?, grid_coord(ys[i])?);
        vertex_pos.insert(v, p);
        let (w, h) = sizes[i];
        bounds = bounds.union(&Rect::from_center(p, w.max(1), h.max(1)));
    }

    // Expanded nodes sit at the center of their port ring; the ring rectangle always covers
    // the node box because every port carries the node's size.
    for (v, ring) in &emb.expansions {
        let mut min = (i64::MAX, i64::MAX);
        let mut max = (i64::MIN, i64::MIN);
        for r in ring {
            let i = local[r] as usize;
            min = (min.0.min(xs[i]), min.1.min(ys[i]));
            max = (max.0.max(xs[i]), max.1.max(ys[i]));
        }
        let center = Point::new(
            grid_coord((min.0 + max.0) / 2)?,
            grid_coord((min.1 + max.1) / 2)?,
        );
        vertex_pos.insert(*v, center);
        let vert = lg.graph.vertex(*v);
        bounds = bounds.union(&Rect::from_center(
            center,
            vert.width.max(1),
            vert.height.max(1),
        ));
    }

    let mut edge_bends = Vec::new();
    for k in 0..emb.edge_count() {
        if bend_points[k].is_empty() {
            continue;
        }
        let pts: Vec<Point> = bend_points[k]
            .iter()
            .map(|&p| {
                Ok(Point::new(
                    grid_coord(xs[p as usize])?,
                    grid_coord(ys[p as usize])?,
                ))
            })
            .collect::<Result<_>>()?;
        for p in &pts {
            bounds = bounds.union(&Rect::from_center(*p, 1, 1));
        }
        let origin = emb.dart_origin[2 * k];
        edge_bends.push((emb.dart_edge[2 * k], (origin, pts)));
    }

    Ok(CompactedComponent {
        vertex_pos,
        edge_bends,
        bounds,
    })
}

/// Checked conversion from a constraint-graph coordinate back to the grid.
fn grid_coord(c: i64) -> Result<i32> {
    i32::try_from(c).map_err(|_| Error::CoordinateOverflow)
}

/// Minimum center distance of two elements along one axis.
fn separation(a: i32, b: i32, gutter: i32) -> i64 {
    ((a + b + 1) / 2 + gutter) as i64
}

fn ordered_pair(i: usize, j: usize, coords: &[i64]) -> (usize, usize) {
    if (coords[i], i) <= (coords[j], j) {
        (i, j)
    } else {
        (j, i)
    }
}

/// A geometric inconsistency the repair pass must separate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Violation {
    /// Two node boxes closer than their gutter separation on both axes.
    Boxes(u32, u32),
    /// A segment cutting through the gutter-inflated box of a non-incident node.
    BoxSegment(u32, usize),
    /// Two perpendicular segments crossing away from any shared point.
    Crossing(usize, usize),
    /// A point lying on the interior of a foreign segment.
    Threading(u32, usize),
}

/// One candidate separation arc for a violation, with the coordinate push it would cause.
struct Fix {
    axis_x: bool,
    from: usize,
    to: usize,
    weight: i64,
    push: i64,
}

/// A segment's current geometry: the fixed cross-axis coordinate and the span along its own
/// axis, with the span's endpoint point ids.
struct SegGeom {
    horizontal: bool,
    fixed: i64,
    lo: i64,
    hi: i64,
    lo_pt: u32,
    hi_pt: u32,
}

fn seg_geom(seg: &Segment, xs: &[i64], ys: &[i64]) -> SegGeom {
    let (a, b) = (seg.a as usize, seg.b as usize);
    if seg.dir.is_horizontal() {
        let (lo_pt, hi_pt) = if xs[a] <= xs[b] { (seg.a, seg.b) } else { (seg.b, seg.a) };
        SegGeom {
            horizontal: true,
            fixed: ys[a],
            lo: xs[lo_pt as usize],
            hi: xs[hi_pt as usize],
            lo_pt,
            hi_pt,
        }
    } else {
        let (lo_pt, hi_pt) = if ys[a] <= ys[b] { (seg.a, seg.b) } else { (seg.b, seg.a) };
        SegGeom {
            horizontal: false,
            fixed: xs[a],
            lo: ys[lo_pt as usize],
            hi: ys[hi_pt as usize],
            lo_pt,
            hi_pt,
        }
    }
}

/// First geometric violation in a fixed scan order, ignoring any already given up on.
#[allow(clippy::too_many_arguments)]
fn find_violation(
    real_points: &[u32],
    segments: &[Segment],
    sizes: &[(i32, i32)],
    xs: &[i64],
    ys: &[i64],
    gutter: i32,
    skipped: &[Violation],
) -> Option<Violation> {
    // Node boxes against each other.
    for (a, &i) in real_points.iter().enumerate() {
        for &j in &real_points[a + 1..] {
            let (pi, pj) = (i as usize, j as usize);
            let dx = (xs[pi] - xs[pj]).abs();
            let dy = (ys[pi] - ys[pj]).abs();
            if dx < separation(sizes[pi].0, sizes[pj].0, gutter)
                && dy < separation(sizes[pi].1, sizes[pj].1, gutter)
                && !skipped.contains(&Violation::Boxes(i, j))
            {
                return Some(Violation::Boxes(i, j));
            }
        }
    }

    // Node boxes against non-incident segments.
    for &p in real_points {
        let pi = p as usize;
        for (si, seg) in segments.iter().enumerate() {
            if seg.a == p || seg.b == p {
                continue;
            }
            let g = seg_geom(seg, xs, ys);
            let (own, cross, half_along, half_cross) = if g.horizontal {
                (
                    xs[pi],
                    ys[pi],
                    separation(sizes[pi].0, 0, gutter),
                    separation(sizes[pi].1, 0, gutter),
                )
            } else {
                (
                    ys[pi],
                    xs[pi],
                    separation(sizes[pi].1, 0, gutter),
                    separation(sizes[pi].0, 0, gutter),
                )
            };
            if (cross - g.fixed).abs() < half_cross
                && g.lo < own + half_along
                && own - half_along < g.hi
                && !skipped.contains(&Violation::BoxSegment(p, si))
            {
                return Some(Violation::BoxSegment(p, si));
            }
        }
    }

    // Perpendicular segment pairs crossing in their interiors. Crossing dummies are shared
    // points of all four incident segments, so legitimate crossings never match.
    for (i, s1) in segments.iter().enumerate() {
        for (jo, s2) in segments[i + 1..].iter().enumerate() {
            let j = i + 1 + jo;
            if s1.dir.is_horizontal() == s2.dir.is_horizontal() {
                continue;
            }
            if s1.a == s2.a || s1.a == s2.b || s1.b == s2.a || s1.b == s2.b {
                continue;
            }
            let (h, v) = if s1.dir.is_horizontal() { (s1, s2) } else { (s2, s1) };
            let gh = seg_geom(h, xs, ys);
            let gv = seg_geom(v, xs, ys);
            if gh.lo < gv.fixed
                && gv.fixed < gh.hi
                && gv.lo < gh.fixed
                && gh.fixed < gv.hi
                && !skipped.contains(&Violation::Crossing(i, j))
            {
                return Some(Violation::Crossing(i, j));
            }
        }
    }

    // Any point sitting exactly on a foreign segment's interior.
    for p in 0..xs.len() as u32 {
        for (si, seg) in segments.iter().enumerate() {
            if seg.a == p || seg.b == p {
                continue;
            }
            let g = seg_geom(seg, xs, ys);
            let (own, cross) = if g.horizontal {
                (xs[p as usize], ys[p as usize])
            } else {
                (ys[p as usize], xs[p as usize])
            };
            if cross == g.fixed
                && g.lo < own
                && own < g.hi
                && !skipped.contains(&Violation::Threading(p, si))
            {
                return Some(Violation::Threading(p, si));
            }
        }
    }

    None
}

/// Candidate separation arcs for one violation, cheapest push first. Order-preserving pushes
/// come before order-reversing ones so constraint cycles stay the exception.
fn candidate_fixes(
    violation: Violation,
    segments: &[Segment],
    sizes: &[(i32, i32)],
    xs: &[i64],
    ys: &[i64],
    gutter: i32,
) -> Vec<Fix> {
    let mut fixes = Vec::new();
    match violation {
        Violation::Boxes(i, j) => {
            let (pi, pj) = (i as usize, j as usize);
            let sep_x = separation(sizes[pi].0, sizes[pj].0, gutter);
            let sep_y = separation(sizes[pi].1, sizes[pj].1, gutter);
            let (fx, tx) = ordered_pair(pi, pj, xs);
            fixes.push(Fix {
                axis_x: true,
                from: fx,
                to: tx,
                weight: sep_x,
                push: sep_x - (xs[pi] - xs[pj]).abs(),
            });
            let (fy, ty) = ordered_pair(pi, pj, ys);
            fixes.push(Fix {
                axis_x: false,
                from: fy,
                to: ty,
                weight: sep_y,
                push: sep_y - (ys[pi] - ys[pj]).abs(),
            });
        }
        Violation::BoxSegment(p, si) => {
            let pi = p as usize;
            let g = seg_geom(&segments[si], xs, ys);
            let side = segments[si].a as usize;
            if g.horizontal {
                let half_cross = separation(sizes[pi].1, 0, gutter);
                let half_along = separation(sizes[pi].0, 0, gutter);
                let (from, to) = ordered_pair(side, pi, ys);
                fixes.push(Fix {
                    axis_x: false,
                    from,
                    to,
                    weight: half_cross,
                    push: half_cross - (ys[pi] - g.fixed).abs(),
                });
                fixes.push(Fix {
                    axis_x: true,
                    from: pi,
                    to: g.lo_pt as usize,
                    weight: half_along,
                    push: xs[pi] + half_along - g.lo,
                });
                fixes.push(Fix {
                    axis_x: true,
                    from: g.hi_pt as usize,
                    to: pi,
                    weight: half_along,
                    push: g.hi + half_along - xs[pi],
                });
            } else {
                let half_cross = separation(sizes[pi].0, 0, gutter);
                let half_along = separation(sizes[pi].1, 0, gutter);
                let (from, to) = ordered_pair(side, pi, xs);
                fixes.push(Fix {
                    axis_x: true,
                    from,
                    to,
                    weight: half_cross,
                    push: half_cross - (xs[pi] - g.fixed).abs(),
                });
                fixes.push(Fix {
                    axis_x: false,
                    from: pi,
                    to: g.lo_pt as usize,
                    weight: half_along,
                    push: ys[pi] + half_along - g.lo,
                });
                fixes.push(Fix {
                    axis_x: false,
                    from: g.hi_pt as usize,
                    to: pi,
                    weight: half_along,
                    push: g.hi + half_along - ys[pi],
                });
            }
        }
        Violation::Crossing(i, j) => {
            let (s1, s2) = (&segments[i], &segments[j]);
            let (h, v) = if s1.dir.is_horizontal() { (s1, s2) } else { (s2, s1) };
            let gh = seg_geom(h, xs, ys);
            let gv = seg_geom(v, xs, ys);
            let h_side = h.a as usize;
            let v_side = v.a as usize;
            fixes.push(Fix {
                axis_x: false,
                from: h_side,
                to: gv.lo_pt as usize,
                weight: 1,
                push: gh.fixed - gv.lo + 1,
            });
            fixes.push(Fix {
                axis_x: false,
                from: gv.hi_pt as usize,
                to: h_side,
                weight: 1,
                push: gv.hi - gh.fixed + 1,
            });
            fixes.push(Fix {
                axis_x: true,
                from: v_side,
                to: gh.lo_pt as usize,
                weight: 1,
                push: gv.fixed - gh.lo + 1,
            });
            fixes.push(Fix {
                axis_x: true,
                from: gh.hi_pt as usize,
                to: v_side,
                weight: 1,
                push: gh.hi - gv.fixed + 1,
            });
        }
        Violation::Threading(p, si) => {
            let pi = p as usize;
            let g = seg_geom(&segments[si], xs, ys);
            let side = segments[si].a as usize;
            let cross_axis_x = !g.horizontal;
            fixes.push(Fix {
                axis_x: cross_axis_x,
                from: pi,
                to: side,
                weight: 1,
                push: 1,
            });
            fixes.push(Fix {
                axis_x: cross_axis_x,
                from: side,
                to: pi,
                weight: 1,
                push: 1,
            });
            let own = if g.horizontal { xs[pi] } else { ys[pi] };
            fixes.push(Fix {
                axis_x: g.horizontal,
                from: pi,
                to: g.lo_pt as usize,
                weight: 1,
                push: own - g.lo + 1,
            });
            fixes.push(Fix {
                axis_x: g.horizontal,
                from: g.hi_pt as usize,
                to: pi,
                weight: 1,
                push: g.hi - own + 1,
            });
        }
    }
    fixes.sort_by_key(|f| f.push);
    fixes
}

/// Walks every dart from a fixed seed, assigning segment directions from the shape's angles
/// and bends. A contradiction means the shape does not realize its embedding.
fn assign_directions(emb: &Embedding, shape: &OrthoShape) -> Result<Vec<Dir>> {
    let n = emb.dart_count();
    let mut dirs: Vec<Option<Dir>> = vec![None; n];
    if n == 0 {
        return Ok(Vec::new());
    }
    dirs[0] = Some(Dir::EAST);
    let mut stack = vec![0u32];
    while let Some(d) = stack.pop() {
        let start = dirs[d as usize].expect("stacked darts are assigned");
        let net: i32 = shape
            .bends_along(d)
            .iter()
            .map(|&t| turn_rotation(t))
            .sum();
        let end = start.rot_ccw(net);

        let twin = Embedding::twin(d);
        let twin_dir = end.opposite();
        match dirs[twin as usize] {
            None => {
                dirs[twin as usize] = Some(twin_dir);
                stack.push(twin);
            }
            Some(existing) if existing != twin_dir => {
                return Err(Error::EmbeddingInconsistent {
                    message: "direction propagation disagrees across an edge".to_string(),
                });
            }
            Some(_) => {}
        }

        let succ = emb.next[d as usize];
        let succ_dir = end.rot_ccw(2 - shape.angles[d as usize] as i32);
        match dirs[succ as usize] {
            None => {
                dirs[succ as usize] = Some(succ_dir);
                stack.push(succ);
            }
            Some(existing) if existing != succ_dir => {
                return Err(Error::EmbeddingInconsistent {
                    message: "direction propagation disagrees around a face".to_string(),
                });
            }
            Some(_) => {}
        }
    }

    Ok(dirs
        .into_iter()
        .map(|d| d.expect("component embeddings are connected"))
        .collect())
}

/// Longest path from the implicit origin over the class DAG; errors on a cycle.
fn solve_axis(
    n_points: usize,
    classes: &mut DisjointSets,
    arcs: &[(usize, usize, i64)],
    axis: &'static str,
) -> Result<Vec<i64>> {
    let mut dense: FxHashMap<usize, usize> = FxHashMap::default();
    let mut roots: Vec<usize> = Vec::new();
    for p in 0..n_points {
        let r = classes.find(p);
        if !dense.contains_key(&r) {
            dense.insert(r, roots.len());
            roots.push(r);
        }
    }
    let n = roots.len();
    let mut out: Vec<Vec<(usize, i64)>> = vec![Vec::new(); n];
    let mut indegree = vec![0usize; n];
    for &(from, to, w) in arcs {
        let f = dense[&classes.find(from)];
        let t = dense[&classes.find(to)];
        if f == t {
            continue;
        }
        out[f].push((t, w));
        indegree[t] += 1;
    }

    let mut dist = vec![0i64; n];
    let mut queue: Vec<usize> = (0..n).filter(|&c| indegree[c] == 0).collect();
    let mut head = 0;
    let mut processed = 0;
    while head < queue.len() {
        let c = queue[head];
        head += 1;
        processed += 1;
        for i in 0..out[c].len() {
            let (t, w) = out[c][i];
            if dist[c] + w > dist[t] {
                dist[t] = dist[c] + w;
            }
            indegree[t] -= 1;
            if indegree[t] == 0 {
                queue.push(t);
            }
        }
    }
    if processed != n {
        return Err(Error::CompactionCycle { axis });
    }

    Ok((0..n_points)
        .map(|p| dist[dense[&classes.find(p)]])
        .collect())
}

/// Splits the graph edge into a chain through explicit bend vertices carrying the computed
/// bend coordinates, so every synthetic point is a first-class vertex of the layout graph.
fn materialize_bends(lg: &mut LayoutGraph, e: EdgeIx, origin: VertexIx, pts: &[Point]) {
    let owner = lg
        .graph
        .edge(e)
        .label
        .owner
        .expect("bends land on caller edges only");
    let pos = lg.edge_segments[owner]
        .iter()
        .position(|&s| s == e)
        .expect("bend edge belongs to its owner");
    let path_from = lg.edge_paths[owner][pos];

    let ordered: Vec<Point> = if path_from == origin {
        pts.to_vec()
    } else {
        pts.iter().rev().copied().collect()
    };

    let mut edge = e;
    for p in ordered {
        let (mid, _, rest) = lg.split_edge(edge, VertexKind::Bend);
        let vert = lg.graph.vertex_mut(mid);
        vert.pos = Some(p);
        vert.embedded = true;
        edge = rest;
    }
}
