//! Hit-testing: shape bodies and the resize/rotate handle ring.
//!
//! Body tests work in the shape's unrotated local frame: the probe point is
//! rotated by the negative shape rotation about the box center, rejected
//! against the axis-aligned bounding box, then refined per subtype. Circle
//! uses the inscribed-ellipse equation, triangle a half-plane sign test,
//! diamond the taxicab equation; the remaining box kinds accept the
//! bounding-box result as-is. Connectors are tested against the straight
//! chord between their stored endpoints regardless of routing subtype — an
//! accepted approximation for curved and elbow connectors.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::consts::{
    CONNECTOR_HIT_RADIUS, HANDLE_HIT_RADIUS_PX, HANDLE_PADDING, PEN_HIT_SLOP,
    ROTATE_HANDLE_OFFSET,
};
use crate::geom::{self, Point};
use crate::shape::{BoxBounds, GeoKind, Shape};

/// A resize or rotate handle on the selection ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    Nw,
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    Rotate,
}

/// All handles in hit-test order.
pub const ALL_HANDLES: [Handle; 9] = [
    Handle::Nw,
    Handle::N,
    Handle::Ne,
    Handle::E,
    Handle::Se,
    Handle::S,
    Handle::Sw,
    Handle::W,
    Handle::Rotate,
];

/// The eight resize handles, without the rotate handle.
pub const RESIZE_HANDLES: [Handle; 8] = [
    Handle::Nw,
    Handle::N,
    Handle::Ne,
    Handle::E,
    Handle::Se,
    Handle::S,
    Handle::Sw,
    Handle::W,
];

/// Whether world point `p` is inside (or on) `shape`.
#[must_use]
pub fn is_point_in_shape(p: Point, shape: &Shape) -> bool {
    match shape {
        Shape::Connector(conn) => {
            geom::distance_to_segment(p, conn.start_point, conn.end_point)
                <= CONNECTOR_HIT_RADIUS
        }
        Shape::Pen(path) => {
            let radius = path.style.stroke_width + PEN_HIT_SLOP;
            path.points
                .windows(2)
                .any(|seg| geom::distance_to_segment(p, seg[0], seg[1]) <= radius)
        }
        Shape::Geo(geo) => {
            let b = BoxBounds {
                x: geo.x,
                y: geo.y,
                width: geo.width,
                height: geo.height,
                rotation: geo.rotation,
            };
            let Some((lx, ly)) = local_box_point(p, b) else {
                return false;
            };
            match geo.kind {
                GeoKind::Circle => {
                    let rx = geo.width / 2.0;
                    let ry = geo.height / 2.0;
                    if rx == 0.0 || ry == 0.0 {
                        return false;
                    }
                    let dx = lx - rx;
                    let dy = ly - ry;
                    (dx * dx) / (rx * rx) + (dy * dy) / (ry * ry) <= 1.0
                }
                GeoKind::Triangle => point_in_triangle(
                    Point::new(lx, ly),
                    Point::new(geo.width / 2.0, 0.0),
                    Point::new(0.0, geo.height),
                    Point::new(geo.width, geo.height),
                ),
                GeoKind::Diamond => {
                    let half_w = geo.width / 2.0;
                    let half_h = geo.height / 2.0;
                    if half_w == 0.0 || half_h == 0.0 {
                        return false;
                    }
                    let dx = (lx - half_w).abs();
                    let dy = (ly - half_h).abs();
                    dx / half_w + dy / half_h <= 1.0
                }
                GeoKind::Rectangle
                | GeoKind::RoundedRect
                | GeoKind::Star
                | GeoKind::Bubble
                | GeoKind::ArrowShape => true,
            }
        }
        Shape::Sticky(_) | Shape::Text(_) => {
            let b = shape.box_bounds().unwrap_or_default();
            local_box_point(p, b).is_some()
        }
    }
}

/// Map `p` into box-local coordinates (top-left origin) after unrotating
/// about the box center; `None` when outside the bounding box.
fn local_box_point(p: Point, b: BoxBounds) -> Option<(f64, f64)> {
    if b.width <= 0.0 || b.height <= 0.0 {
        return None;
    }
    let local = geom::rotate_point(p, b.center(), -b.rotation);
    let lx = local.x - b.x;
    let ly = local.y - b.y;
    if lx < 0.0 || lx > b.width || ly < 0.0 || ly > b.height {
        None
    } else {
        Some((lx, ly))
    }
}

/// Half-plane sign test against triangle `(v1, v2, v3)`.
fn point_in_triangle(p: Point, v1: Point, v2: Point, v3: Point) -> bool {
    fn sign(p1: Point, p2: Point, p3: Point) -> f64 {
        (p1.x - p3.x) * (p2.y - p3.y) - (p2.x - p3.x) * (p1.y - p3.y)
    }
    let d1 = sign(p, v1, v2);
    let d2 = sign(p, v2, v3);
    let d3 = sign(p, v3, v1);
    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    !(has_neg && has_pos)
}

/// Top-most shape under `world`, scanning in reverse collection order
/// (the collection order is the z-order, last drawn on top).
#[must_use]
pub fn top_shape_at(world: Point, shapes: &[Shape]) -> Option<&Shape> {
    shapes.iter().rev().find(|s| is_point_in_shape(world, s))
}

/// World-space position of a handle on the selection ring around `b`.
///
/// The ring sits [`HANDLE_PADDING`] outside the box; the rotate handle sits
/// a further [`ROTATE_HANDLE_OFFSET`] above the north edge. Rotated shapes
/// rotate their ring with them.
#[must_use]
pub fn handle_position(b: BoxBounds, handle: Handle) -> Point {
    let center = b.center();
    let pad = HANDLE_PADDING;
    let local = match handle {
        Handle::Nw => Point::new(b.x - pad, b.y - pad),
        Handle::N => Point::new(center.x, b.y - pad),
        Handle::Ne => Point::new(b.x + b.width + pad, b.y - pad),
        Handle::E => Point::new(b.x + b.width + pad, center.y),
        Handle::Se => Point::new(b.x + b.width + pad, b.y + b.height + pad),
        Handle::S => Point::new(center.x, b.y + b.height + pad),
        Handle::Sw => Point::new(b.x - pad, b.y + b.height + pad),
        Handle::W => Point::new(b.x - pad, center.y),
        Handle::Rotate => Point::new(center.x, b.y - pad - ROTATE_HANDLE_OFFSET),
    };
    if b.rotation == 0.0 {
        local
    } else {
        geom::rotate_point(local, center, b.rotation)
    }
}

/// The handle under `world`, if any. The hit radius is a constant screen
/// size, so it shrinks in world units as the camera zooms in.
#[must_use]
pub fn handle_at_point(b: BoxBounds, world: Point, zoom: f64) -> Option<Handle> {
    let radius = HANDLE_HIT_RADIUS_PX / zoom;
    ALL_HANDLES
        .into_iter()
        .find(|&h| geom::distance(world, handle_position(b, h)) <= radius)
}
