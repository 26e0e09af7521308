//! Connector binding resolver: turns a connector's bindings into concrete
//! endpoints and a drawable route.
//!
//! This is not a run loop — it is applied at render time and at drag-commit
//! time. A bound endpoint is always recomputed from the bound shape's
//! current perimeter; the stored endpoint is only the fallback when the
//! binding is unset or no longer resolves (fail soft, never an error).
//!
//! Shape lookup is a closure so callers can overlay a transient drag shape
//! over the committed collection and have bound connectors track it live.

#[cfg(test)]
#[path = "connector_test.rs"]
mod connector_test;

use crate::consts::{CURVE_MIN_OFFSET, CURVE_OFFSET_RATIO};
use crate::geom::{self, Point};
use crate::shape::{ConnectorKind, ConnectorShape, Shape, ShapeId};

/// A resolved, drawable connector route.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConnectorRoute {
    /// Straight chord.
    Straight(Point, Point),
    /// Cubic Bézier with control points pushed outward from the bound
    /// shapes' centers.
    Curved { start: Point, c1: Point, c2: Point, end: Point },
    /// Four-point orthogonal polyline.
    Elbow([Point; 4]),
}

impl ConnectorRoute {
    /// The resolved endpoints of the route.
    #[must_use]
    pub fn endpoints(&self) -> (Point, Point) {
        match *self {
            Self::Straight(a, b) => (a, b),
            Self::Curved { start, end, .. } => (start, end),
            Self::Elbow(pts) => (pts[0], pts[3]),
        }
    }
}

/// Resolve a connector's effective endpoints against its bindings.
///
/// Both ends can be bound to shapes that depend on each other, so the
/// resolution relaxes: end against the stored start, start against the
/// resolved end, then end once more against the resolved start. Two passes
/// are enough to converge for the two-fixed-shapes case. An unresolvable
/// binding id leaves the stored endpoint in place.
pub fn resolve_endpoints<'a, F>(conn: &ConnectorShape, lookup: F) -> (Point, Point)
where
    F: Fn(ShapeId) -> Option<&'a Shape>,
{
    let mut start = conn.start_point;
    let mut end = conn.end_point;
    let start_shape = conn.start_binding.and_then(&lookup);
    let end_shape = conn.end_binding.and_then(&lookup);

    if let Some(shape) = end_shape {
        end = geom::perimeter_point(shape, start);
    }
    if let Some(shape) = start_shape {
        start = geom::perimeter_point(shape, end);
    }
    if let Some(shape) = end_shape {
        end = geom::perimeter_point(shape, start);
    }
    (start, end)
}

/// Resolve endpoints and route them according to the connector's subtype.
pub fn route<'a, F>(conn: &ConnectorShape, lookup: F) -> ConnectorRoute
where
    F: Fn(ShapeId) -> Option<&'a Shape>,
{
    let (start, end) = resolve_endpoints(conn, &lookup);
    match conn.kind {
        ConnectorKind::Straight => ConnectorRoute::Straight(start, end),
        ConnectorKind::Elbow => ConnectorRoute::Elbow(geom::elbow_points(start, end)),
        ConnectorKind::Curved => {
            let offset = CURVE_MIN_OFFSET.max(geom::distance(start, end) * CURVE_OFFSET_RATIO);
            let start_shape = conn.start_binding.and_then(&lookup);
            let end_shape = conn.end_binding.and_then(&lookup);
            ConnectorRoute::Curved {
                start,
                c1: control_point(start, start_shape, end, offset),
                c2: control_point(end, end_shape, start, offset),
                end,
            }
        }
    }
}

/// Control point for one end of a curved connector: extend outward from the
/// bound shape's center through the attachment point, or toward the other
/// endpoint when unbound. Zero-length directions leave the point unmoved.
fn control_point(point: Point, shape: Option<&Shape>, other: Point, offset: f64) -> Point {
    if let Some(shape) = shape {
        let center = geom::shape_center(shape);
        let dx = point.x - center.x;
        let dy = point.y - center.y;
        let len = dx.hypot(dy);
        if len > 0.0 {
            return Point::new(point.x + dx / len * offset, point.y + dy / len * offset);
        }
    }
    let dx = other.x - point.x;
    let dy = other.y - point.y;
    let len = dx.hypot(dy);
    if len > 0.0 {
        Point::new(point.x + dx / len * offset, point.y + dy / len * offset)
    } else {
        point
    }
}

/// Re-snap the stored endpoints of a connector bound to `moved` against the
/// shape's new perimeter. Called at drag-commit so the move and the
/// connector re-route land in the same history push.
pub fn rebind_after_move(conn: &mut ConnectorShape, moved: &Shape) {
    let id = moved.id();
    if conn.start_binding == Some(id) {
        conn.start_point = geom::perimeter_point(moved, conn.end_point);
    }
    if conn.end_binding == Some(id) {
        conn.end_point = geom::perimeter_point(moved, conn.start_point);
    }
}
