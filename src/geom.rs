//! Geometry kernel: pure, stateless math over points and shape outlines.
//!
//! Everything in this module is a total function over valid shapes — there is
//! no error type. Degenerate inputs (zero-size boxes, zero-length direction
//! vectors) fall back to the shape's center instead of producing NaN.
//!
//! Angles are degrees, positive clockwise in the screen's Y-down convention.
//! Mapping a world point into a rotated shape's local frame is
//! `rotate_point(p, center, -rotation)`; mapping back is `+rotation`.

#[cfg(test)]
#[path = "geom_test.rs"]
mod geom_test;

use std::f64::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize};

use crate::consts::{FRAC_PI_5, PERIMETER_RAY_EXTENT, STAR_INNER_RATIO};
use crate::shape::{GeoKind, Shape};

/// A point in either screen or world space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Euclidean distance between two points.
#[must_use]
pub fn distance(a: Point, b: Point) -> f64 {
    (b.x - a.x).hypot(b.y - a.y)
}

/// Rotate `point` around `center` by `angle_deg` degrees (clockwise, Y-down).
#[must_use]
pub fn rotate_point(point: Point, center: Point, angle_deg: f64) -> Point {
    let rad = angle_deg.to_radians();
    let (sin, cos) = rad.sin_cos();
    let dx = point.x - center.x;
    let dy = point.y - center.y;
    Point {
        x: center.x + dx * cos - dy * sin,
        y: center.y + dx * sin + dy * cos,
    }
}

/// Distance from `p` to the closed segment `[a, b]`.
///
/// A zero-length segment degenerates to point distance.
#[must_use]
pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let l2 = distance(a, b).powi(2);
    if l2 == 0.0 {
        return distance(p, a);
    }
    let t = (((p.x - a.x) * (b.x - a.x) + (p.y - a.y) * (b.y - a.y)) / l2).clamp(0.0, 1.0);
    let proj = Point::new(a.x + t * (b.x - a.x), a.y + t * (b.y - a.y));
    distance(p, proj)
}

/// Intersection of segments `[p1, p2]` and `[p3, p4]`, if any.
///
/// Parallel (or collinear) segments return `None`.
#[must_use]
pub fn segment_intersection(p1: Point, p2: Point, p3: Point, p4: Point) -> Option<Point> {
    let d = (p2.x - p1.x) * (p4.y - p3.y) - (p2.y - p1.y) * (p4.x - p3.x);
    if d == 0.0 {
        return None;
    }
    let u = ((p3.x - p1.x) * (p4.y - p3.y) - (p3.y - p1.y) * (p4.x - p3.x)) / d;
    let v = ((p3.x - p1.x) * (p2.y - p1.y) - (p3.y - p1.y) * (p2.x - p1.x)) / d;
    if (0.0..=1.0).contains(&u) && (0.0..=1.0).contains(&v) {
        Some(Point::new(p1.x + u * (p2.x - p1.x), p1.y + u * (p2.y - p1.y)))
    } else {
        None
    }
}

/// Center of a shape in world space.
///
/// Box shapes use their bounding-box center, pen strokes the center of the
/// derived point bounding box, connectors the midpoint of their stored
/// endpoints.
#[must_use]
pub fn shape_center(shape: &Shape) -> Point {
    if let Some(b) = shape.box_bounds() {
        return Point::new(b.x + b.width / 2.0, b.y + b.height / 2.0);
    }
    match shape {
        Shape::Pen(path) => {
            let mut min = Point::new(f64::INFINITY, f64::INFINITY);
            let mut max = Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
            for p in &path.points {
                min.x = min.x.min(p.x);
                min.y = min.y.min(p.y);
                max.x = max.x.max(p.x);
                max.y = max.y.max(p.y);
            }
            if path.points.is_empty() {
                Point::default()
            } else {
                Point::new(min.x + (max.x - min.x) / 2.0, min.y + (max.y - min.y) / 2.0)
            }
        }
        Shape::Connector(conn) => Point::new(
            (conn.start_point.x + conn.end_point.x) / 2.0,
            (conn.start_point.y + conn.end_point.y) / 2.0,
        ),
        Shape::Geo(_) | Shape::Sticky(_) | Shape::Text(_) => Point::default(),
    }
}

/// The point on `shape`'s boundary where the ray from its center toward
/// `from` exits, in world space, accounting for rotation.
///
/// Per subtype: circle, star, and bubble are approximated by the inscribed
/// ellipse parametrized by angle; triangle and diamond intersect the ray
/// against their real edges (the ray is extended far past `from`, so `from`
/// may lie inside the shape); the rectangle family uses the exact sign-based
/// ray-vs-AABB solution. Falls back to the center when no boundary can be
/// determined.
#[must_use]
pub fn perimeter_point(shape: &Shape, from: Point) -> Point {
    let Some(b) = shape.box_bounds() else {
        return shape_center(shape);
    };
    let center = Point::new(b.x + b.width / 2.0, b.y + b.height / 2.0);
    let local_from = rotate_point(from, center, -b.rotation);
    let dx = local_from.x - center.x;
    let dy = local_from.y - center.y;
    if dx == 0.0 && dy == 0.0 {
        return center;
    }

    let geo_kind = match shape {
        Shape::Geo(geo) => Some(geo.kind),
        _ => None,
    };

    let local = match geo_kind {
        Some(GeoKind::Circle | GeoKind::Star | GeoKind::Bubble) => {
            let angle = dy.atan2(dx);
            Point::new(
                center.x + (b.width / 2.0) * angle.cos(),
                center.y + (b.height / 2.0) * angle.sin(),
            )
        }
        Some(GeoKind::Triangle) => {
            let v = triangle_points(b.width, b.height).map(|p| Point::new(p.x + b.x, p.y + b.y));
            ray_polygon_exit(center, local_from, &v)
        }
        Some(GeoKind::Diamond) => {
            let v = diamond_points(b.width, b.height).map(|p| Point::new(p.x + b.x, p.y + b.y));
            ray_polygon_exit(center, local_from, &v)
        }
        _ => {
            // Rectangle family, sticky, text: exact ray-vs-AABB about the center.
            if b.width == 0.0 || b.height == 0.0 {
                center
            } else {
                let mut t = f64::INFINITY;
                if dx != 0.0 {
                    t = t.min((dx.signum() * b.width / 2.0) / dx);
                }
                if dy != 0.0 {
                    t = t.min((dy.signum() * b.height / 2.0) / dy);
                }
                Point::new(center.x + dx * t, center.y + dy * t)
            }
        }
    };

    rotate_point(local, center, b.rotation)
}

/// Where the ray `center → toward` (extended well past `toward`) crosses the
/// convex polygon `vertices`. Falls back to `center` if it never does.
fn ray_polygon_exit(center: Point, toward: Point, vertices: &[Point]) -> Point {
    let far = Point::new(
        center.x + (toward.x - center.x) * PERIMETER_RAY_EXTENT,
        center.y + (toward.y - center.y) * PERIMETER_RAY_EXTENT,
    );
    for i in 0..vertices.len() {
        let a = vertices[i];
        let b = vertices[(i + 1) % vertices.len()];
        if let Some(hit) = segment_intersection(center, far, a, b) {
            return hit;
        }
    }
    center
}

/// Four-point orthogonal route between `start` and `end`.
///
/// Routes horizontal-first when the horizontal span dominates, vertical-first
/// otherwise.
#[must_use]
pub fn elbow_points(start: Point, end: Point) -> [Point; 4] {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    if dx.abs() >= dy.abs() {
        let mid_x = start.x + dx / 2.0;
        [start, Point::new(mid_x, start.y), Point::new(mid_x, end.y), end]
    } else {
        let mid_y = start.y + dy / 2.0;
        [start, Point::new(start.x, mid_y), Point::new(end.x, mid_y), end]
    }
}

// =============================================================
// Outline generators
// =============================================================

/// One step of a renderer-agnostic outline path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCmd {
    MoveTo(Point),
    LineTo(Point),
    QuadTo { ctrl: Point, to: Point },
    Close,
}

struct CornerCut {
    start: Point,
    end: Point,
    ctrl: Point,
    skip: bool,
}

/// Quadratic corner cut at `p` between its neighbours. The cut radius is
/// clamped to half the shorter adjacent edge so cuts never overlap.
fn poly_corner(p: Point, prev: Point, next: Point, r: f64) -> CornerCut {
    let v1 = Point::new(p.x - prev.x, p.y - prev.y);
    let v2 = Point::new(next.x - p.x, next.y - p.y);
    let l1 = v1.x.hypot(v1.y);
    let l2 = v2.x.hypot(v2.y);
    let eff_r = r.min(l1.min(l2) / 2.0);
    if eff_r <= 0.0 || l1 == 0.0 || l2 == 0.0 {
        return CornerCut { start: p, end: p, ctrl: p, skip: true };
    }
    let n1 = Point::new(v1.x / l1, v1.y / l1);
    let n2 = Point::new(v2.x / l2, v2.y / l2);
    CornerCut {
        start: Point::new(p.x - n1.x * eff_r, p.y - n1.y * eff_r),
        end: Point::new(p.x + n2.x * eff_r, p.y + n2.y * eff_r),
        ctrl: p,
        skip: false,
    }
}

/// Closed polygon outline with every corner cut by a quadratic Bézier of the
/// given radius. Fewer than three vertices produce an empty path.
#[must_use]
pub fn rounded_polygon(points: &[Point], radius: f64) -> Vec<PathCmd> {
    if points.len() < 3 {
        return Vec::new();
    }
    let n = points.len();
    let mut cmds = Vec::with_capacity(n * 2 + 1);
    for i in 0..n {
        let curr = points[i];
        let prev = points[(i + n - 1) % n];
        let next = points[(i + 1) % n];
        let c = poly_corner(curr, prev, next, radius);
        if i == 0 {
            if c.skip {
                cmds.push(PathCmd::MoveTo(curr));
            } else {
                cmds.push(PathCmd::MoveTo(c.start));
                cmds.push(PathCmd::QuadTo { ctrl: c.ctrl, to: c.end });
            }
        } else if c.skip {
            cmds.push(PathCmd::LineTo(curr));
        } else {
            cmds.push(PathCmd::LineTo(c.start));
            cmds.push(PathCmd::QuadTo { ctrl: c.ctrl, to: c.end });
        }
    }
    cmds.push(PathCmd::Close);
    cmds
}

/// The ten vertices of a five-point star inscribed in a `w`×`h` box,
/// in box-local coordinates (top-left origin).
#[must_use]
pub fn star_points(w: f64, h: f64) -> Vec<Point> {
    let cx = w / 2.0;
    let cy = h / 2.0;
    let outer = w.min(h) / 2.0;
    let inner = outer * STAR_INNER_RATIO;
    (0..10)
        .map(|i| {
            let r = if i % 2 == 0 { outer } else { inner };
            let angle = FRAC_PI_5 * f64::from(i) - FRAC_PI_2;
            Point::new(cx + angle.cos() * r, cy + angle.sin() * r)
        })
        .collect()
}

/// Triangle vertices (apex top-center) in box-local coordinates.
#[must_use]
pub fn triangle_points(w: f64, h: f64) -> [Point; 3] {
    [Point::new(w / 2.0, 0.0), Point::new(w, h), Point::new(0.0, h)]
}

/// Diamond vertices (edge midpoints of the box) in box-local coordinates.
#[must_use]
pub fn diamond_points(w: f64, h: f64) -> [Point; 4] {
    [
        Point::new(w / 2.0, 0.0),
        Point::new(w, h / 2.0),
        Point::new(w / 2.0, h),
        Point::new(0.0, h / 2.0),
    ]
}

/// Speech-bubble outline: a rounded rectangle body with a bottom-center tail.
#[must_use]
pub fn bubble_path(w: f64, h: f64) -> Vec<PathCmd> {
    let r = w.min(h) * 0.15;
    let tail_h = (h * 0.2).min(30.0);
    let body_h = h - tail_h;
    vec![
        PathCmd::MoveTo(Point::new(r, 0.0)),
        PathCmd::LineTo(Point::new(w - r, 0.0)),
        PathCmd::QuadTo { ctrl: Point::new(w, 0.0), to: Point::new(w, r) },
        PathCmd::LineTo(Point::new(w, body_h - r)),
        PathCmd::QuadTo { ctrl: Point::new(w, body_h), to: Point::new(w - r, body_h) },
        PathCmd::LineTo(Point::new(w / 2.0 + 15.0, body_h)),
        PathCmd::LineTo(Point::new(w / 2.0, h)),
        PathCmd::LineTo(Point::new(w / 2.0 - 15.0, body_h)),
        PathCmd::LineTo(Point::new(r, body_h)),
        PathCmd::QuadTo { ctrl: Point::new(0.0, body_h), to: Point::new(0.0, body_h - r) },
        PathCmd::LineTo(Point::new(0.0, r)),
        PathCmd::QuadTo { ctrl: Point::new(0.0, 0.0), to: Point::new(r, 0.0) },
        PathCmd::Close,
    ]
}

/// Right-pointing block arrow outline in box-local coordinates.
#[must_use]
pub fn block_arrow_path(w: f64, h: f64) -> Vec<PathCmd> {
    let tail_h = h * 0.5;
    let tail_y = (h - tail_h) / 2.0;
    let head_w = w * 0.4;
    let tail_w = w - head_w;
    vec![
        PathCmd::MoveTo(Point::new(0.0, tail_y)),
        PathCmd::LineTo(Point::new(tail_w, tail_y)),
        PathCmd::LineTo(Point::new(tail_w, 0.0)),
        PathCmd::LineTo(Point::new(w, h / 2.0)),
        PathCmd::LineTo(Point::new(tail_w, h)),
        PathCmd::LineTo(Point::new(tail_w, tail_y + tail_h)),
        PathCmd::LineTo(Point::new(0.0, tail_y + tail_h)),
        PathCmd::Close,
    ]
}
