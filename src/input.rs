//! Input model: tools, modifier keys, mouse buttons, UI state, and the
//! gesture context tracked between pointer-down and pointer-up.
//!
//! A [`Gesture`] is the single explicit value carrying everything an active
//! pointer interaction needs: the captured shape snapshot, the transient
//! in-progress shape, and the active handle. The transient shape is owned
//! here and is invisible to the history store until the gesture commits.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::geom::Point;
use crate::hit::Handle;
use crate::shape::{BoxBounds, ConnectorKind, ConnectorShape, GeoKind, Shape, ShapeId};

/// Which tool is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    /// Pointer / selection tool (default).
    #[default]
    Select,
    /// Pan-only hand tool.
    Hand,
    /// Freehand pen strokes.
    Pen,
    /// Geometric shapes (the active [`GeoKind`] picks the subtype).
    Geo,
    /// Sticky notes.
    Sticky,
    /// Free-standing text blocks.
    Text,
    /// Shape-to-shape connectors.
    Connector,
}

impl Tool {
    /// Whether this tool creates a box shape by dragging out a rectangle.
    #[must_use]
    pub fn creates_box(self) -> bool {
        matches!(self, Self::Geo | Self::Sticky | Self::Text)
    }
}

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

impl Modifiers {
    /// Whether the platform command modifier (Ctrl or Meta) is held.
    #[must_use]
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

/// A keyboard key, holding the name as reported by the browser
/// (e.g. `"Delete"`, `"z"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down).
    pub dy: f64,
}

/// Persistent UI state visible to the renderer.
#[derive(Debug, Clone)]
pub struct UiState {
    /// Currently active tool.
    pub tool: Tool,
    /// The id of the currently selected shape, if any.
    pub selected_id: Option<ShapeId>,
    /// Geo subtype drawn by the geo tool.
    pub active_geo: GeoKind,
    /// Routing subtype drawn by the connector tool.
    pub active_connector: ConnectorKind,
    /// Stroke/text color applied to newly created shapes.
    pub color: String,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            tool: Tool::default(),
            selected_id: None,
            active_geo: GeoKind::default(),
            active_connector: ConnectorKind::default(),
            color: "#6366f1".to_owned(),
        }
    }
}

/// The active pointer gesture and its captured context.
///
/// Each variant carries what pointer-move needs to compute the transient
/// shape and what pointer-up needs to emit exactly one history push.
#[derive(Debug, Clone, Default)]
pub enum Gesture {
    /// No gesture in progress.
    #[default]
    Idle,
    /// Pen stroke being drawn; world points accumulate per pointer-move.
    DrawingPath {
        points: Vec<Point>,
    },
    /// Box shape being dragged out from its anchor corner.
    DrawingShape {
        /// The transient shape, resized from the down-point on every move.
        shape: Shape,
    },
    /// An existing shape being moved.
    Dragging {
        /// Snapshot of the shape at pointer-down; deltas apply to this.
        original: Shape,
        /// Snapshot plus the current drag delta.
        transient: Shape,
    },
    /// An existing box shape being resized by one of the eight handles.
    Resizing {
        handle: Handle,
        /// Box geometry at pointer-down; the handle formulas read this.
        initial: BoxBounds,
        transient: Shape,
    },
    /// An existing box shape being rotated by the rotate handle.
    Rotating {
        initial: BoxBounds,
        /// Rotation at pointer-down; pointer deltas add to it.
        start_rotation: f64,
        transient: Shape,
    },
    /// A connector being dragged from its start point.
    Connecting {
        transient: ConnectorShape,
    },
}

impl Gesture {
    /// The transient box-or-dragged shape, if this gesture carries one.
    ///
    /// `Connecting` is excluded; its transient connector is reached by
    /// matching the variant directly.
    #[must_use]
    pub fn transient_shape(&self) -> Option<&Shape> {
        match self {
            Self::DrawingShape { shape } => Some(shape),
            Self::Dragging { transient, .. }
            | Self::Resizing { transient, .. }
            | Self::Rotating { transient, .. } => Some(transient),
            Self::Idle | Self::DrawingPath { .. } | Self::Connecting { .. } => None,
        }
    }
}
