//! Shape model: the closed tagged union of everything that can live on a
//! board, plus the mechanical helpers the rest of the crate needs.
//!
//! Shapes are plain data. Every mutation of the board happens by building a
//! new full collection and pushing it through [`crate::history::History`];
//! nothing here mutates a committed snapshot in place.
//!
//! The serde representation is internally tagged on `"type"` with lowercase
//! tag values (`pen`, `geo`, `sticky`, `text`, `connector`), matching the
//! stored-board wire format.

#[cfg(test)]
#[path = "shape_test.rs"]
mod shape_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geom::Point;

/// Unique identifier for a shape.
pub type ShapeId = Uuid;

/// Stroke rendering style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokeStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

/// Style block shared by every shape variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeStyle {
    /// Stroke color (or text color), as a CSS color string.
    pub color: String,
    /// Fill color; `None` renders unfilled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    /// Stroke width in world units.
    pub stroke_width: f64,
    pub stroke_style: StrokeStyle,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            color: "#6366f1".to_owned(),
            background_color: None,
            stroke_width: 2.0,
            stroke_style: StrokeStyle::Solid,
            opacity: 1.0,
        }
    }
}

/// Geometric shape subtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeoKind {
    #[default]
    Rectangle,
    RoundedRect,
    Circle,
    Diamond,
    Triangle,
    Star,
    Bubble,
    ArrowShape,
}

/// Connector routing subtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectorKind {
    Straight,
    #[default]
    Curved,
    Elbow,
}

/// Freehand pen stroke: an ordered point sequence, no stored position or
/// size. The bounding box is derived on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathShape {
    pub id: ShapeId,
    #[serde(flatten)]
    pub style: ShapeStyle,
    pub points: Vec<Point>,
}

/// Geometric shape: rectangle family, circle, diamond, triangle, star,
/// bubble, block arrow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoShape {
    pub id: ShapeId,
    #[serde(flatten)]
    pub style: ShapeStyle,
    pub kind: GeoKind,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Clockwise rotation in degrees around the box center.
    #[serde(default)]
    pub rotation: f64,
    /// Corner cut radius; meaningful for the rectangle-like kinds.
    #[serde(default)]
    pub corner_radius: f64,
}

/// Sticky note: a filled box with wrapping text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StickyShape {
    pub id: ShapeId,
    #[serde(flatten)]
    pub style: ShapeStyle,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub rotation: f64,
    pub text: String,
}

/// Free-standing text block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextShape {
    pub id: ShapeId,
    #[serde(flatten)]
    pub style: ShapeStyle,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub rotation: f64,
    pub text: String,
    pub font_size: f64,
}

/// Connector between two points or two bound shapes.
///
/// The stored endpoints are authoritative only while the corresponding
/// binding is unset; a bound endpoint is always recomputed from the bound
/// shape's perimeter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectorShape {
    pub id: ShapeId,
    #[serde(flatten)]
    pub style: ShapeStyle,
    pub kind: ConnectorKind,
    pub start_point: Point,
    pub end_point: Point,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_binding: Option<ShapeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_binding: Option<ShapeId>,
    #[serde(default)]
    pub start_arrowhead: bool,
    #[serde(default)]
    pub end_arrowhead: bool,
}

/// A board shape. Closed sum type — every consumer matches exhaustively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Shape {
    Pen(PathShape),
    Geo(GeoShape),
    Sticky(StickyShape),
    Text(TextShape),
    Connector(ConnectorShape),
}

/// Position, size, and rotation of a box-like shape (geo, sticky, text).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoxBounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotation: f64,
}

impl BoxBounds {
    /// Center of the box, ignoring rotation (the rotation pivot).
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

impl Shape {
    #[must_use]
    pub fn id(&self) -> ShapeId {
        match self {
            Self::Pen(s) => s.id,
            Self::Geo(s) => s.id,
            Self::Sticky(s) => s.id,
            Self::Text(s) => s.id,
            Self::Connector(s) => s.id,
        }
    }

    #[must_use]
    pub fn style(&self) -> &ShapeStyle {
        match self {
            Self::Pen(s) => &s.style,
            Self::Geo(s) => &s.style,
            Self::Sticky(s) => &s.style,
            Self::Text(s) => &s.style,
            Self::Connector(s) => &s.style,
        }
    }

    pub fn style_mut(&mut self) -> &mut ShapeStyle {
        match self {
            Self::Pen(s) => &mut s.style,
            Self::Geo(s) => &mut s.style,
            Self::Sticky(s) => &mut s.style,
            Self::Text(s) => &mut s.style,
            Self::Connector(s) => &mut s.style,
        }
    }

    /// Box geometry for the variants that have one (geo, sticky, text).
    #[must_use]
    pub fn box_bounds(&self) -> Option<BoxBounds> {
        match self {
            Self::Geo(s) => Some(BoxBounds {
                x: s.x,
                y: s.y,
                width: s.width,
                height: s.height,
                rotation: s.rotation,
            }),
            Self::Sticky(s) => Some(BoxBounds {
                x: s.x,
                y: s.y,
                width: s.width,
                height: s.height,
                rotation: s.rotation,
            }),
            Self::Text(s) => Some(BoxBounds {
                x: s.x,
                y: s.y,
                width: s.width,
                height: s.height,
                rotation: s.rotation,
            }),
            Self::Pen(_) | Self::Connector(_) => None,
        }
    }

    /// Write box geometry back. No-op for pen strokes and connectors.
    pub fn set_box_bounds(&mut self, b: BoxBounds) {
        match self {
            Self::Geo(s) => {
                s.x = b.x;
                s.y = b.y;
                s.width = b.width;
                s.height = b.height;
                s.rotation = b.rotation;
            }
            Self::Sticky(s) => {
                s.x = b.x;
                s.y = b.y;
                s.width = b.width;
                s.height = b.height;
                s.rotation = b.rotation;
            }
            Self::Text(s) => {
                s.x = b.x;
                s.y = b.y;
                s.width = b.width;
                s.height = b.height;
                s.rotation = b.rotation;
            }
            Self::Pen(_) | Self::Connector(_) => {}
        }
    }

    /// Whether the shape can be resized and rotated with handles.
    #[must_use]
    pub fn supports_transform(&self) -> bool {
        matches!(self, Self::Geo(_) | Self::Sticky(_) | Self::Text(_))
    }

    /// Move the shape by a world-space delta: box origin for box shapes,
    /// every point of a pen stroke, both stored endpoints of a connector.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        match self {
            Self::Geo(s) => {
                s.x += dx;
                s.y += dy;
            }
            Self::Sticky(s) => {
                s.x += dx;
                s.y += dy;
            }
            Self::Text(s) => {
                s.x += dx;
                s.y += dy;
            }
            Self::Pen(s) => {
                for p in &mut s.points {
                    p.x += dx;
                    p.y += dy;
                }
            }
            Self::Connector(s) => {
                s.start_point.x += dx;
                s.start_point.y += dy;
                s.end_point.x += dx;
                s.end_point.y += dy;
            }
        }
    }

    /// Whether this shape is a connector bound to `id` at either end.
    #[must_use]
    pub fn is_bound_to(&self, id: ShapeId) -> bool {
        match self {
            Self::Connector(c) => c.start_binding == Some(id) || c.end_binding == Some(id),
            _ => false,
        }
    }
}

/// Sparse style/content update applied to a shape as one undoable unit.
/// Only present fields are applied; fields that don't apply to the target
/// variant are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShapePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_style: Option<StrokeStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corner_radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_arrowhead: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_arrowhead: Option<bool>,
}

impl ShapePatch {
    /// Apply every present field to `shape`.
    pub fn apply(&self, shape: &mut Shape) {
        let style = shape.style_mut();
        if let Some(color) = &self.color {
            style.color = color.clone();
        }
        if let Some(bg) = &self.background_color {
            style.background_color = Some(bg.clone());
        }
        if let Some(w) = self.stroke_width {
            style.stroke_width = w;
        }
        if let Some(s) = self.stroke_style {
            style.stroke_style = s;
        }
        if let Some(o) = self.opacity {
            style.opacity = o.clamp(0.0, 1.0);
        }
        match shape {
            Shape::Sticky(s) => {
                if let Some(text) = &self.text {
                    s.text = text.clone();
                }
            }
            Shape::Text(s) => {
                if let Some(text) = &self.text {
                    s.text = text.clone();
                }
                if let Some(size) = self.font_size {
                    s.font_size = size;
                }
            }
            Shape::Geo(s) => {
                if let Some(r) = self.corner_radius {
                    s.corner_radius = r;
                }
            }
            Shape::Connector(c) => {
                if let Some(a) = self.start_arrowhead {
                    c.start_arrowhead = a;
                }
                if let Some(a) = self.end_arrowhead {
                    c.end_arrowhead = a;
                }
            }
            Shape::Pen(_) => {}
        }
    }
}
