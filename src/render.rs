//! Rendering: draws the full canvas scene to a 2D context.
//!
//! This module is the only place that touches
//! [`web_sys::CanvasRenderingContext2d`]. It receives a read-only view of the
//! engine core and produces pixels — it never mutates application state.
//!
//! Bound connectors are routed through [`crate::connector`] on every frame
//! with a lookup that prefers the transient gesture shape, so connector ends
//! track a live drag without any history writes.
//!
//! All fallible `Canvas2D` calls propagate errors via `Result<(), JsValue>`;
//! the top-level caller ([`crate::engine::Engine::render`]) handles them.

use std::f64::consts::{PI, TAU};

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::connector::{self, ConnectorRoute};
use crate::consts::HANDLE_HIT_RADIUS_PX;
use crate::engine::EngineCore;
use crate::geom::{self, PathCmd, Point};
use crate::hit::{self, Handle, RESIZE_HANDLES};
use crate::input::{Gesture, Tool};
use crate::shape::{
    ConnectorShape, GeoKind, GeoShape, Shape, ShapeId, StickyShape, StrokeStyle, TextShape,
};

/// Arrowhead length in world units.
const ARROW_SIZE: f64 = 10.0;

/// Arrowhead half-angle in radians (~30°).
const ARROW_ANGLE: f64 = PI / 6.0;

/// Accent color for selection chrome and handles.
const SELECTION_COLOR: &str = "#6366f1";

/// Padding between a shape and its selection outline, world units.
const SELECTION_PADDING: f64 = 4.0;

/// Sticky-note text size.
const STICKY_FONT_SIZE: f64 = 20.0;

/// Inner padding for sticky-note text.
const STICKY_TEXT_PADDING: f64 = 8.0;

/// Draw the full scene: committed shapes, the transient gesture shape, and
/// selection chrome.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails.
pub fn draw(ctx: &CanvasRenderingContext2d, core: &EngineCore) -> Result<(), JsValue> {
    let camera = core.camera;

    // Layer 1: clear and set up transforms.
    ctx.set_transform(core.dpr, 0.0, 0.0, core.dpr, 0.0, 0.0)?;
    ctx.clear_rect(0.0, 0.0, core.viewport_width, core.viewport_height);
    ctx.translate(camera.pan_x, camera.pan_y)?;
    ctx.scale(camera.zoom, camera.zoom)?;

    let transient = core.transient_shape();
    let lookup = |id: ShapeId| -> Option<&Shape> {
        match transient {
            Some(t) if t.id() == id => Some(t),
            _ => core.shape_by_id(id),
        }
    };
    let selected = core.selection();

    // Layer 2: committed shapes in z-order (collection order), skipping the
    // one shadowed by the transient.
    for shape in core.current_shapes() {
        if transient.is_some_and(|t| t.id() == shape.id()) {
            continue;
        }
        draw_shape(ctx, shape, selected == Some(shape.id()), &lookup)?;
    }

    // Layer 3: transient shape and gesture previews.
    if let Some(t) = transient {
        draw_shape(ctx, t, false, &lookup)?;
    }
    match &core.gesture {
        Gesture::DrawingPath { points } => {
            ctx.set_global_alpha(1.0);
            ctx.set_line_dash(&js_sys::Array::new())?;
            draw_polyline(ctx, points, &core.ui.color, 4.0);
        }
        Gesture::Connecting { transient } => draw_connector(ctx, transient, false, &lookup)?,
        _ => {}
    }

    // Layer 4: selection chrome.
    if core.ui.tool == Tool::Select {
        if let Some(id) = selected {
            let shape = match transient {
                Some(t) if t.id() == id => Some(t),
                _ => core.shape_by_id(id),
            };
            if let Some(shape) = shape {
                draw_selection(ctx, shape, &core.gesture, camera.zoom)?;
            }
        }
    }
    Ok(())
}

// =============================================================
// Shape dispatch
// =============================================================

fn draw_shape<'a, F>(
    ctx: &CanvasRenderingContext2d,
    shape: &Shape,
    selected: bool,
    lookup: &F,
) -> Result<(), JsValue>
where
    F: Fn(ShapeId) -> Option<&'a Shape>,
{
    apply_style(ctx, shape)?;
    match shape {
        Shape::Pen(path) => {
            draw_polyline(ctx, &path.points, &path.style.color, path.style.stroke_width);
            Ok(())
        }
        Shape::Geo(geo) => draw_geo(ctx, geo),
        Shape::Sticky(sticky) => draw_sticky(ctx, sticky),
        Shape::Text(text) => draw_text(ctx, text),
        Shape::Connector(conn) => draw_connector(ctx, conn, selected, lookup),
    }
}

/// Stroke color, width, opacity, and dash pattern from the shape's style.
fn apply_style(ctx: &CanvasRenderingContext2d, shape: &Shape) -> Result<(), JsValue> {
    let style = shape.style();
    ctx.set_stroke_style_str(&style.color);
    ctx.set_line_width(style.stroke_width);
    ctx.set_global_alpha(style.opacity.clamp(0.0, 1.0));
    ctx.set_line_cap("round");
    ctx.set_line_join("round");
    let dash = js_sys::Array::new();
    match style.stroke_style {
        StrokeStyle::Solid => {}
        StrokeStyle::Dashed => {
            dash.push(&JsValue::from_f64(8.0));
            dash.push(&JsValue::from_f64(4.0));
        }
        StrokeStyle::Dotted => {
            dash.push(&JsValue::from_f64(2.0));
            dash.push(&JsValue::from_f64(4.0));
        }
    }
    ctx.set_line_dash(&dash)
}

// =============================================================
// Shape renderers
// =============================================================

fn draw_polyline(ctx: &CanvasRenderingContext2d, points: &[Point], color: &str, width: f64) {
    if points.len() < 2 {
        return;
    }
    ctx.set_stroke_style_str(color);
    ctx.set_line_width(width);
    ctx.begin_path();
    ctx.move_to(points[0].x, points[0].y);
    for p in &points[1..] {
        ctx.line_to(p.x, p.y);
    }
    ctx.stroke();
}

fn draw_geo(ctx: &CanvasRenderingContext2d, geo: &GeoShape) -> Result<(), JsValue> {
    ctx.save();
    rotate_about_center(ctx, geo.x, geo.y, geo.width, geo.height, geo.rotation)?;

    ctx.begin_path();
    match geo.kind {
        GeoKind::Circle => {
            ctx.ellipse(
                geo.x + geo.width / 2.0,
                geo.y + geo.height / 2.0,
                geo.width / 2.0,
                geo.height / 2.0,
                0.0,
                0.0,
                TAU,
            )?;
        }
        GeoKind::Triangle => {
            let pts = geom::triangle_points(geo.width, geo.height);
            trace_cmds(ctx, &geom::rounded_polygon(&pts, geo.corner_radius), geo.x, geo.y);
        }
        GeoKind::Diamond => {
            let pts = geom::diamond_points(geo.width, geo.height);
            trace_cmds(ctx, &geom::rounded_polygon(&pts, geo.corner_radius), geo.x, geo.y);
        }
        GeoKind::Star => {
            let pts = geom::star_points(geo.width, geo.height);
            trace_cmds(ctx, &geom::rounded_polygon(&pts, geo.corner_radius), geo.x, geo.y);
        }
        GeoKind::Bubble => {
            trace_cmds(ctx, &geom::bubble_path(geo.width, geo.height), geo.x, geo.y);
        }
        GeoKind::ArrowShape => {
            trace_cmds(ctx, &geom::block_arrow_path(geo.width, geo.height), geo.x, geo.y);
        }
        GeoKind::Rectangle | GeoKind::RoundedRect => {
            let pts = [
                Point::new(0.0, 0.0),
                Point::new(geo.width, 0.0),
                Point::new(geo.width, geo.height),
                Point::new(0.0, geo.height),
            ];
            trace_cmds(ctx, &geom::rounded_polygon(&pts, geo.corner_radius), geo.x, geo.y);
        }
    }
    if let Some(fill) = &geo.style.background_color {
        ctx.set_fill_style_str(fill);
        ctx.fill();
    }
    ctx.stroke();
    ctx.restore();
    Ok(())
}

fn draw_sticky(ctx: &CanvasRenderingContext2d, sticky: &StickyShape) -> Result<(), JsValue> {
    ctx.save();
    rotate_about_center(ctx, sticky.x, sticky.y, sticky.width, sticky.height, sticky.rotation)?;

    let fill = sticky.style.background_color.as_deref().unwrap_or("#FCD34D");
    ctx.set_fill_style_str(fill);
    ctx.fill_rect(sticky.x, sticky.y, sticky.width, sticky.height);

    ctx.set_fill_style_str(&sticky.style.color);
    ctx.set_font(&format!("{STICKY_FONT_SIZE}px sans-serif"));
    let max_width = sticky.width - 2.0 * STICKY_TEXT_PADDING;
    let mut y = sticky.y + STICKY_TEXT_PADDING + STICKY_FONT_SIZE;
    for line in wrap_text(ctx, &sticky.text, max_width) {
        if y > sticky.y + sticky.height {
            break;
        }
        ctx.fill_text(&line, sticky.x + STICKY_TEXT_PADDING, y)?;
        y += STICKY_FONT_SIZE * 1.2;
    }
    ctx.restore();
    Ok(())
}

fn draw_text(ctx: &CanvasRenderingContext2d, text: &TextShape) -> Result<(), JsValue> {
    ctx.save();
    rotate_about_center(ctx, text.x, text.y, text.width, text.height, text.rotation)?;
    ctx.set_fill_style_str(&text.style.color);
    ctx.set_font(&format!("{}px sans-serif", text.font_size));
    ctx.fill_text(&text.text, text.x, text.y + text.font_size)?;
    ctx.restore();
    Ok(())
}

fn draw_connector<'a, F>(
    ctx: &CanvasRenderingContext2d,
    conn: &ConnectorShape,
    selected: bool,
    lookup: &F,
) -> Result<(), JsValue>
where
    F: Fn(ShapeId) -> Option<&'a Shape>,
{
    let route = connector::route(conn, lookup);
    let color = if selected { SELECTION_COLOR } else { conn.style.color.as_str() };
    ctx.set_stroke_style_str(color);
    ctx.set_line_width(if selected { conn.style.stroke_width + 1.0 } else { conn.style.stroke_width });

    // Trace the route, remembering the segment feeding each endpoint so the
    // arrowheads point along the final approach direction.
    ctx.begin_path();
    let (into_end, into_start) = match route {
        ConnectorRoute::Straight(a, b) => {
            ctx.move_to(a.x, a.y);
            ctx.line_to(b.x, b.y);
            ((a, b), (b, a))
        }
        ConnectorRoute::Curved { start, c1, c2, end } => {
            ctx.move_to(start.x, start.y);
            ctx.bezier_curve_to(c1.x, c1.y, c2.x, c2.y, end.x, end.y);
            ((c2, end), (c1, start))
        }
        ConnectorRoute::Elbow(pts) => {
            ctx.move_to(pts[0].x, pts[0].y);
            for p in &pts[1..] {
                ctx.line_to(p.x, p.y);
            }
            ((pts[2], pts[3]), (pts[1], pts[0]))
        }
    };
    ctx.stroke();

    if conn.end_arrowhead {
        draw_arrowhead(ctx, into_end.0, into_end.1, color);
    }
    if conn.start_arrowhead {
        draw_arrowhead(ctx, into_start.0, into_start.1, color);
    }
    Ok(())
}

/// Filled triangle at `tip`, oriented along `from → tip`.
fn draw_arrowhead(ctx: &CanvasRenderingContext2d, from: Point, tip: Point, color: &str) {
    let dx = tip.x - from.x;
    let dy = tip.y - from.y;
    if dx == 0.0 && dy == 0.0 {
        return;
    }
    let angle = dy.atan2(dx);
    ctx.set_fill_style_str(color);
    ctx.begin_path();
    ctx.move_to(tip.x, tip.y);
    ctx.line_to(
        tip.x - ARROW_SIZE * (angle - ARROW_ANGLE).cos(),
        tip.y - ARROW_SIZE * (angle - ARROW_ANGLE).sin(),
    );
    ctx.line_to(
        tip.x - ARROW_SIZE * (angle + ARROW_ANGLE).cos(),
        tip.y - ARROW_SIZE * (angle + ARROW_ANGLE).sin(),
    );
    ctx.close_path();
    ctx.fill();
}

// =============================================================
// Selection chrome
// =============================================================

fn draw_selection(
    ctx: &CanvasRenderingContext2d,
    shape: &Shape,
    gesture: &Gesture,
    zoom: f64,
) -> Result<(), JsValue> {
    let Some(b) = shape.box_bounds() else {
        return Ok(());
    };
    ctx.set_global_alpha(1.0);

    // Dashed outline, rotated with the shape.
    ctx.save();
    rotate_about_center(ctx, b.x, b.y, b.width, b.height, b.rotation)?;
    ctx.set_stroke_style_str(SELECTION_COLOR);
    ctx.set_line_width(2.0 / zoom);
    let dash = js_sys::Array::new();
    dash.push(&JsValue::from_f64(4.0 / zoom));
    ctx.set_line_dash(&dash)?;
    ctx.stroke_rect(
        b.x - SELECTION_PADDING,
        b.y - SELECTION_PADDING,
        b.width + 2.0 * SELECTION_PADDING,
        b.height + 2.0 * SELECTION_PADDING,
    );
    ctx.restore();

    // Handles stay hidden while a creation gesture is active.
    if matches!(gesture, Gesture::DrawingPath { .. } | Gesture::DrawingShape { .. } | Gesture::Connecting { .. })
        || !shape.supports_transform()
    {
        return Ok(());
    }

    ctx.set_line_dash(&js_sys::Array::new())?;
    let radius = HANDLE_HIT_RADIUS_PX / zoom;

    // Stalk from the box center to the rotate handle.
    let rotate_pos = hit::handle_position(b, Handle::Rotate);
    let center = b.center();
    ctx.set_stroke_style_str(SELECTION_COLOR);
    ctx.set_line_width(1.0 / zoom);
    ctx.begin_path();
    ctx.move_to(center.x, center.y);
    ctx.line_to(rotate_pos.x, rotate_pos.y);
    ctx.stroke();

    for handle in RESIZE_HANDLES.into_iter().chain([Handle::Rotate]) {
        let pos = hit::handle_position(b, handle);
        ctx.begin_path();
        ctx.arc(pos.x, pos.y, radius, 0.0, TAU)?;
        ctx.set_fill_style_str(SELECTION_COLOR);
        ctx.fill();
        ctx.set_stroke_style_str("#ffffff");
        ctx.set_line_width(1.5 / zoom);
        ctx.stroke();
    }
    Ok(())
}

// =============================================================
// Helpers
// =============================================================

/// Rotate the context around a box's center, matching the shape model's
/// rotation pivot.
fn rotate_about_center(
    ctx: &CanvasRenderingContext2d,
    x: f64,
    y: f64,
    w: f64,
    h: f64,
    rotation: f64,
) -> Result<(), JsValue> {
    if rotation == 0.0 {
        return Ok(());
    }
    let cx = x + w / 2.0;
    let cy = y + h / 2.0;
    ctx.translate(cx, cy)?;
    ctx.rotate(rotation.to_radians())?;
    ctx.translate(-cx, -cy)?;
    Ok(())
}

/// Walk a box-local outline path into the context, offset to world space.
fn trace_cmds(ctx: &CanvasRenderingContext2d, cmds: &[PathCmd], ox: f64, oy: f64) {
    for cmd in cmds {
        match *cmd {
            PathCmd::MoveTo(p) => ctx.move_to(p.x + ox, p.y + oy),
            PathCmd::LineTo(p) => ctx.line_to(p.x + ox, p.y + oy),
            PathCmd::QuadTo { ctrl, to } => {
                ctx.quadratic_curve_to(ctrl.x + ox, ctrl.y + oy, to.x + ox, to.y + oy);
            }
            PathCmd::Close => ctx.close_path(),
        }
    }
}

/// Greedy word wrap against the current context font.
fn wrap_text(ctx: &CanvasRenderingContext2d, text: &str, max_width: f64) -> Vec<String> {
    let mut lines = Vec::new();
    for raw_line in text.lines() {
        let mut current = String::new();
        for word in raw_line.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_owned()
            } else {
                format!("{current} {word}")
            };
            let fits = ctx
                .measure_text(&candidate)
                .map(|m| m.width() <= max_width)
                .unwrap_or(true);
            if fits {
                current = candidate;
            } else {
                if !current.is_empty() {
                    lines.push(current);
                }
                current = word.to_owned();
            }
        }
        lines.push(current);
    }
    lines
}
