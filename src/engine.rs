//! Engine: the interaction state machine and its browser-facing wrapper.
//!
//! [`EngineCore`] consumes pointer/keyboard events, hit-tests against the
//! current snapshot, owns the transient in-progress shape inside its
//! [`Gesture`], and commits finished gestures to the history store — at most
//! one `push_state` per gesture, so each gesture is one undoable unit.
//! It has no browser dependencies and is tested natively.
//!
//! [`Engine`] wraps the core with the `HtmlCanvasElement` and the render
//! entry point for the WASM host.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use std::mem;

use uuid::Uuid;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::HtmlCanvasElement;

use crate::camera::Camera;
use crate::connector;
use crate::consts::{
    DUPLICATE_OFFSET, MIN_RESIZE_SIZE, MIN_SHAPE_SIZE, STICKY_DEFAULT_SIZE,
    TEXT_DEFAULT_FONT_SIZE, TEXT_DEFAULT_HEIGHT, TEXT_DEFAULT_WIDTH,
};
use crate::geom::{self, Point};
use crate::history::History;
use crate::hit::{self, Handle};
use crate::input::{Button, Gesture, Key, Modifiers, Tool, UiState, WheelDelta};
use crate::render;
use crate::shape::{
    BoxBounds, ConnectorKind, ConnectorShape, GeoKind, GeoShape, PathShape, Shape, ShapeId,
    ShapePatch, ShapeStyle, StickyShape, TextShape,
};
use crate::sync::{BoardData, Permission};

/// Direction for z-order moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerMove {
    Raise,
    Lower,
}

/// What a handled event changed, for the host to act on.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A new snapshot was pushed (or restored by undo/redo): persist and
    /// broadcast.
    ShapesCommitted,
    /// The selection changed.
    SelectionChanged(Option<ShapeId>),
    /// The active tool changed (e.g. auto-switch back to select).
    ToolChanged(Tool),
    /// The scene needs a repaint.
    RenderNeeded,
}

/// Core engine state — all logic that doesn't depend on the canvas element.
///
/// Separated from [`Engine`] so it can be tested without WASM/browser
/// dependencies.
pub struct EngineCore {
    pub history: History,
    pub camera: Camera,
    pub ui: UiState,
    pub gesture: Gesture,
    /// Orthogonal to the gesture: true while a drag pans the canvas.
    pub panning: bool,
    /// Access level; `View` turns every mutating transition into a no-op.
    pub permission: Permission,
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub dpr: f64,
    loaded: bool,
    last_screen: Point,
    down_world: Point,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self {
            history: History::new(),
            camera: Camera::default(),
            ui: UiState::default(),
            gesture: Gesture::Idle,
            panning: false,
            permission: Permission::Edit,
            viewport_width: 0.0,
            viewport_height: 0.0,
            dpr: 1.0,
            loaded: false,
            last_screen: Point::default(),
            down_world: Point::default(),
        }
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Board lifecycle ---

    /// Hydrate from a loaded board and enable interaction. Resets history to
    /// a single snapshot.
    pub fn load_board(&mut self, data: BoardData) {
        self.history.reset(data.shapes);
        self.ui.selected_id = None;
        self.gesture = Gesture::Idle;
        self.panning = false;
        self.loaded = true;
    }

    /// Whether a board has been loaded; all interaction is refused before.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Apply a remote full-collection snapshot as a regular history push.
    /// No commit action is emitted — the update must not be re-broadcast.
    pub fn apply_remote(&mut self, shapes: Vec<Shape>) -> Vec<Action> {
        if !self.loaded {
            return Vec::new();
        }
        self.history.push_state(shapes);
        let mut actions = self.prune_selection();
        actions.push(Action::RenderNeeded);
        actions
    }

    pub fn set_permission(&mut self, permission: Permission) {
        self.permission = permission;
    }

    /// Update viewport dimensions and device pixel ratio.
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) {
        self.viewport_width = width_css;
        self.viewport_height = height_css;
        self.dpr = dpr;
    }

    // --- Tool / UI ---

    pub fn set_tool(&mut self, tool: Tool) {
        self.ui.tool = tool;
    }

    pub fn set_active_geo(&mut self, kind: GeoKind) {
        self.ui.active_geo = kind;
    }

    pub fn set_active_connector(&mut self, kind: ConnectorKind) {
        self.ui.active_connector = kind;
    }

    pub fn set_color(&mut self, color: String) {
        self.ui.color = color;
    }

    // --- Queries ---

    /// The currently selected shape id, if any.
    #[must_use]
    pub fn selection(&self) -> Option<ShapeId> {
        self.ui.selected_id
    }

    /// The current committed shape collection.
    #[must_use]
    pub fn current_shapes(&self) -> &[Shape] {
        self.history.current()
    }

    /// Look up a committed shape by id.
    #[must_use]
    pub fn shape_by_id(&self, id: ShapeId) -> Option<&Shape> {
        self.history.current().iter().find(|s| s.id() == id)
    }

    /// The transient in-progress shape, if a gesture carries one.
    #[must_use]
    pub fn transient_shape(&self) -> Option<&Shape> {
        self.gesture.transient_shape()
    }

    /// CSS cursor for the current tool and gesture.
    #[must_use]
    pub fn cursor_style(&self) -> &'static str {
        if self.panning {
            return "grabbing";
        }
        match self.ui.tool {
            Tool::Select => "default",
            Tool::Hand => "grab",
            Tool::Pen | Tool::Geo | Tool::Sticky | Tool::Text | Tool::Connector => "crosshair",
        }
    }

    fn can_edit(&self) -> bool {
        self.permission == Permission::Edit
    }

    // --- Pointer events ---

    /// Pointer-down: begin a gesture according to the active tool, handle
    /// hits, and body hits, in that precedence order.
    pub fn on_pointer_down(
        &mut self,
        screen: Point,
        button: Button,
        modifiers: Modifiers,
    ) -> Vec<Action> {
        if !self.loaded {
            return Vec::new();
        }
        let world = self.camera.screen_to_world(screen);
        self.last_screen = screen;
        self.down_world = world;
        let mut actions = Vec::new();

        // 1. Pure pan: hand tool, or middle-button / ctrl-click in select.
        if self.ui.tool == Tool::Hand
            || (self.ui.tool == Tool::Select && (button == Button::Middle || modifiers.ctrl))
        {
            self.panning = true;
            actions.push(Action::RenderNeeded);
            return actions;
        }

        // 2. Handles on the current selection, before any body hit.
        if self.ui.tool == Tool::Select && self.can_edit() {
            if let Some(gesture) = self.begin_handle_gesture(world) {
                self.gesture = gesture;
                actions.push(Action::RenderNeeded);
                return actions;
            }
        }

        // 3. Body hit, top-most first.
        let hit_id = hit::top_shape_at(world, self.history.current()).map(Shape::id);
        match self.ui.tool {
            Tool::Select => {
                if let Some(id) = hit_id {
                    if self.ui.selected_id != Some(id) {
                        actions.push(Action::SelectionChanged(Some(id)));
                    }
                    self.ui.selected_id = Some(id);
                    if self.can_edit() {
                        if let Some(original) = self.shape_by_id(id).cloned() {
                            self.gesture = Gesture::Dragging {
                                transient: original.clone(),
                                original,
                            };
                        }
                    }
                } else {
                    if self.ui.selected_id.is_some() {
                        actions.push(Action::SelectionChanged(None));
                    }
                    self.ui.selected_id = None;
                    // Dragging empty canvas pans in select mode.
                    self.panning = true;
                }
            }
            Tool::Pen => {
                if self.can_edit() {
                    self.gesture = Gesture::DrawingPath { points: vec![world] };
                }
            }
            Tool::Connector => {
                if self.can_edit() {
                    self.gesture = Gesture::Connecting {
                        transient: ConnectorShape {
                            id: Uuid::new_v4(),
                            style: ShapeStyle {
                                color: self.ui.color.clone(),
                                ..ShapeStyle::default()
                            },
                            kind: self.ui.active_connector,
                            start_point: world,
                            end_point: world,
                            start_binding: hit_id,
                            end_binding: None,
                            start_arrowhead: false,
                            end_arrowhead: true,
                        },
                    };
                }
            }
            Tool::Geo | Tool::Sticky | Tool::Text => {
                if self.can_edit() {
                    self.gesture = Gesture::DrawingShape { shape: self.new_box_shape(world) };
                }
            }
            Tool::Hand => {}
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    /// If the pointer lands on a handle of the selected shape, capture the
    /// resize/rotate gesture.
    fn begin_handle_gesture(&self, world: Point) -> Option<Gesture> {
        let id = self.ui.selected_id?;
        let shape = self.shape_by_id(id)?;
        if !shape.supports_transform() {
            return None;
        }
        let bounds = shape.box_bounds()?;
        let handle = hit::handle_at_point(bounds, world, self.camera.zoom)?;
        let transient = shape.clone();
        Some(match handle {
            Handle::Rotate => Gesture::Rotating {
                initial: bounds,
                start_rotation: bounds.rotation,
                transient,
            },
            handle => Gesture::Resizing { handle, initial: bounds, transient },
        })
    }

    /// Tool-specific transient shape created at the drag anchor.
    fn new_box_shape(&self, world: Point) -> Shape {
        let style = ShapeStyle { color: self.ui.color.clone(), ..ShapeStyle::default() };
        match self.ui.tool {
            Tool::Sticky => Shape::Sticky(StickyShape {
                id: Uuid::new_v4(),
                style: ShapeStyle {
                    color: "#000000".to_owned(),
                    background_color: Some("#FCD34D".to_owned()),
                    ..ShapeStyle::default()
                },
                x: world.x,
                y: world.y,
                width: STICKY_DEFAULT_SIZE,
                height: STICKY_DEFAULT_SIZE,
                rotation: 0.0,
                text: "New Note".to_owned(),
            }),
            Tool::Text => Shape::Text(TextShape {
                id: Uuid::new_v4(),
                style,
                x: world.x,
                y: world.y,
                width: TEXT_DEFAULT_WIDTH,
                height: TEXT_DEFAULT_HEIGHT,
                rotation: 0.0,
                text: "Type here".to_owned(),
                font_size: TEXT_DEFAULT_FONT_SIZE,
            }),
            // Geo, and the fallback no other tool reaches.
            _ => Shape::Geo(GeoShape {
                id: Uuid::new_v4(),
                style,
                kind: self.ui.active_geo,
                x: world.x,
                y: world.y,
                width: 0.0,
                height: 0.0,
                rotation: 0.0,
                corner_radius: 0.0,
            }),
        }
    }

    /// Pointer-move: advance the active gesture (or the pan) against the
    /// current world position.
    pub fn on_pointer_move(&mut self, screen: Point, _modifiers: Modifiers) -> Vec<Action> {
        if !self.loaded {
            return Vec::new();
        }
        let world = self.camera.screen_to_world(screen);

        if self.panning {
            let dx = screen.x - self.last_screen.x;
            let dy = screen.y - self.last_screen.y;
            self.camera.pan_by(dx, dy);
            self.last_screen = screen;
            return vec![Action::RenderNeeded];
        }
        self.last_screen = screen;

        let down = self.down_world;
        match &mut self.gesture {
            Gesture::Idle => return Vec::new(),
            Gesture::DrawingPath { points } => points.push(world),
            Gesture::DrawingShape { shape } => {
                // Normalize a negative drag into an origin shift: the box is
                // always expressed with non-negative width/height.
                if let Some(mut b) = shape.box_bounds() {
                    let w = world.x - down.x;
                    let h = world.y - down.y;
                    b.width = w.abs();
                    b.height = h.abs();
                    b.x = if w < 0.0 { world.x } else { down.x };
                    b.y = if h < 0.0 { world.y } else { down.y };
                    shape.set_box_bounds(b);
                }
            }
            Gesture::Dragging { original, transient } => {
                let mut moved = original.clone();
                moved.translate(world.x - down.x, world.y - down.y);
                *transient = moved;
            }
            Gesture::Resizing { handle, initial, transient } => {
                let b = resize_box(*initial, *handle, world);
                transient.set_box_bounds(b);
            }
            Gesture::Rotating { initial, start_rotation, transient } => {
                let center = initial.center();
                let angle = (world.y - center.y).atan2(world.x - center.x).to_degrees();
                let start_angle = (down.y - center.y).atan2(down.x - center.x).to_degrees();
                if let Some(mut b) = transient.box_bounds() {
                    b.rotation = *start_rotation + (angle - start_angle);
                    transient.set_box_bounds(b);
                }
            }
            Gesture::Connecting { transient } => {
                // Snap the live endpoint to a hovered shape's perimeter.
                let hover = hit::top_shape_at(world, self.history.current());
                transient.end_point = match hover {
                    Some(shape) => geom::perimeter_point(shape, transient.start_point),
                    None => world,
                };
            }
        }
        vec![Action::RenderNeeded]
    }

    /// Pointer-up: finish the active gesture. Each arm produces at most one
    /// history push — the unit of undo.
    pub fn on_pointer_up(
        &mut self,
        screen: Point,
        _button: Button,
        _modifiers: Modifiers,
    ) -> Vec<Action> {
        if !self.loaded {
            return Vec::new();
        }
        let world = self.camera.screen_to_world(screen);
        self.panning = false;
        let gesture = mem::take(&mut self.gesture);
        let mut actions = Vec::new();

        match gesture {
            Gesture::Idle => {}
            Gesture::DrawingPath { points } => {
                if points.len() >= 2 {
                    let shape = Shape::Pen(PathShape {
                        id: Uuid::new_v4(),
                        style: ShapeStyle {
                            color: self.ui.color.clone(),
                            stroke_width: 4.0,
                            ..ShapeStyle::default()
                        },
                        points,
                    });
                    self.commit_added(shape);
                    actions.push(Action::ShapesCommitted);
                }
            }
            Gesture::DrawingShape { shape } => {
                let committed = shape
                    .box_bounds()
                    .is_some_and(|b| b.width > MIN_SHAPE_SIZE && b.height > MIN_SHAPE_SIZE);
                if committed {
                    let id = shape.id();
                    self.commit_added(shape);
                    self.ui.selected_id = Some(id);
                    self.ui.tool = Tool::Select;
                    actions.push(Action::ShapesCommitted);
                    actions.push(Action::SelectionChanged(Some(id)));
                    actions.push(Action::ToolChanged(Tool::Select));
                }
            }
            Gesture::Dragging { original, transient } => {
                // A click without movement commits nothing.
                if transient != original {
                    let id = transient.id();
                    let next: Vec<Shape> = self
                        .history
                        .current()
                        .iter()
                        .map(|s| {
                            if s.id() == id {
                                return transient.clone();
                            }
                            let mut s = s.clone();
                            if let Shape::Connector(conn) = &mut s {
                                connector::rebind_after_move(conn, &transient);
                            }
                            s
                        })
                        .collect();
                    self.history.push_state(next);
                    actions.push(Action::ShapesCommitted);
                }
            }
            Gesture::Resizing { transient, .. } | Gesture::Rotating { transient, .. } => {
                let id = transient.id();
                let changed = self.shape_by_id(id).is_some_and(|s| *s != transient);
                if changed {
                    let next: Vec<Shape> = self
                        .history
                        .current()
                        .iter()
                        .map(|s| if s.id() == id { transient.clone() } else { s.clone() })
                        .collect();
                    self.history.push_state(next);
                    actions.push(Action::ShapesCommitted);
                }
            }
            Gesture::Connecting { mut transient } => {
                if let Some(end_shape) = hit::top_shape_at(world, self.history.current()) {
                    transient.end_binding = Some(end_shape.id());
                    transient.end_point =
                        geom::perimeter_point(end_shape, transient.start_point);
                }
                // Both ends perimeter-accurate at commit time.
                if let Some(start_id) = transient.start_binding {
                    if let Some(start_shape) = self.shape_by_id(start_id) {
                        transient.start_point =
                            geom::perimeter_point(start_shape, transient.end_point);
                    }
                }
                self.commit_added(Shape::Connector(transient));
                self.ui.tool = Tool::Select;
                actions.push(Action::ShapesCommitted);
                actions.push(Action::ToolChanged(Tool::Select));
            }
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Wheel: zoom with the command modifier held, pan otherwise.
    pub fn on_wheel(&mut self, delta: WheelDelta, modifiers: Modifiers) -> Vec<Action> {
        if !self.loaded {
            return Vec::new();
        }
        self.camera.apply_wheel(delta, modifiers.command());
        vec![Action::RenderNeeded]
    }

    // --- Keyboard ---

    /// Global key handling. `typing` is true when focus sits inside a
    /// text-editing control; delete and tool shortcuts are suppressed then.
    pub fn on_key_down(&mut self, key: &Key, modifiers: Modifiers, typing: bool) -> Vec<Action> {
        if !self.loaded {
            return Vec::new();
        }
        if modifiers.command() && key.0.eq_ignore_ascii_case("z") {
            return if modifiers.shift { self.redo() } else { self.undo() };
        }
        if (key.0 == "Delete" || key.0 == "Backspace") && !typing {
            return self.delete_selection();
        }
        if typing || modifiers.command() {
            return Vec::new();
        }
        let tool = match key.0.to_ascii_lowercase().as_str() {
            "v" => Some(Tool::Select),
            "h" => Some(Tool::Hand),
            "p" => Some(Tool::Pen),
            "g" => Some(Tool::Geo),
            "c" => Some(Tool::Connector),
            "s" => Some(Tool::Sticky),
            "t" => Some(Tool::Text),
            _ => None,
        };
        match tool {
            Some(tool) => {
                self.ui.tool = tool;
                vec![Action::ToolChanged(tool), Action::RenderNeeded]
            }
            None => Vec::new(),
        }
    }

    // --- Collection operations (each one history push) ---

    /// Step history back one snapshot.
    pub fn undo(&mut self) -> Vec<Action> {
        if !self.can_edit() || self.history.undo().is_none() {
            return Vec::new();
        }
        let mut actions = self.prune_selection();
        actions.push(Action::ShapesCommitted);
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Step history forward one snapshot.
    pub fn redo(&mut self) -> Vec<Action> {
        if !self.can_edit() || self.history.redo().is_none() {
            return Vec::new();
        }
        let mut actions = self.prune_selection();
        actions.push(Action::ShapesCommitted);
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Delete the selected shape, cascading to any connector bound to it.
    pub fn delete_selection(&mut self) -> Vec<Action> {
        if !self.can_edit() {
            return Vec::new();
        }
        let Some(id) = self.ui.selected_id else {
            return Vec::new();
        };
        let next: Vec<Shape> = self
            .history
            .current()
            .iter()
            .filter(|s| s.id() != id && !s.is_bound_to(id))
            .cloned()
            .collect();
        self.history.push_state(next);
        self.ui.selected_id = None;
        vec![
            Action::ShapesCommitted,
            Action::SelectionChanged(None),
            Action::RenderNeeded,
        ]
    }

    /// Clone the selected shape with a fresh id, offset down-right.
    pub fn duplicate_selected(&mut self) -> Vec<Action> {
        if !self.can_edit() {
            return Vec::new();
        }
        let Some(copy) = self.ui.selected_id.and_then(|id| self.shape_by_id(id)).cloned() else {
            return Vec::new();
        };
        let mut copy = copy;
        set_shape_id(&mut copy, Uuid::new_v4());
        copy.translate(DUPLICATE_OFFSET, DUPLICATE_OFFSET);
        let id = copy.id();
        self.commit_added(copy);
        self.ui.selected_id = Some(id);
        vec![
            Action::ShapesCommitted,
            Action::SelectionChanged(Some(id)),
            Action::RenderNeeded,
        ]
    }

    /// Swap the selected shape with its z-order neighbour.
    pub fn move_layer(&mut self, direction: LayerMove) -> Vec<Action> {
        if !self.can_edit() {
            return Vec::new();
        }
        let Some(id) = self.ui.selected_id else {
            return Vec::new();
        };
        let shapes = self.history.current();
        let Some(index) = shapes.iter().position(|s| s.id() == id) else {
            return Vec::new();
        };
        let swap_with = match direction {
            LayerMove::Raise if index + 1 < shapes.len() => index + 1,
            LayerMove::Lower if index > 0 => index - 1,
            LayerMove::Raise | LayerMove::Lower => return Vec::new(),
        };
        let mut next = shapes.to_vec();
        next.swap(index, swap_with);
        self.history.push_state(next);
        vec![Action::ShapesCommitted, Action::RenderNeeded]
    }

    /// Replace the collection with an empty one.
    pub fn clear_board(&mut self) -> Vec<Action> {
        if !self.can_edit() {
            return Vec::new();
        }
        self.history.push_state(Vec::new());
        let mut actions = self.prune_selection();
        actions.push(Action::ShapesCommitted);
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Apply a sparse style/content update to a shape as one undoable unit.
    pub fn apply_patch(&mut self, id: ShapeId, patch: &ShapePatch) -> Vec<Action> {
        if !self.can_edit() || self.shape_by_id(id).is_none() {
            return Vec::new();
        }
        let next: Vec<Shape> = self
            .history
            .current()
            .iter()
            .map(|s| {
                let mut s = s.clone();
                if s.id() == id {
                    patch.apply(&mut s);
                }
                s
            })
            .collect();
        self.history.push_state(next);
        vec![Action::ShapesCommitted, Action::RenderNeeded]
    }

    // --- Internals ---

    /// Push the current collection plus one new shape.
    fn commit_added(&mut self, shape: Shape) {
        let mut next = self.history.current().to_vec();
        next.push(shape);
        self.history.push_state(next);
    }

    /// Drop the selection if the selected shape vanished from the current
    /// snapshot (after undo/redo, remote replace, clear).
    fn prune_selection(&mut self) -> Vec<Action> {
        match self.ui.selected_id {
            Some(id) if self.shape_by_id(id).is_none() => {
                self.ui.selected_id = None;
                vec![Action::SelectionChanged(None)]
            }
            _ => Vec::new(),
        }
    }
}

/// Apply one resize handle's edge formula in the shape's unrotated local
/// frame, flooring both axes at the minimum size and re-anchoring the origin
/// when dragging a north/west-ish handle.
fn resize_box(initial: BoxBounds, handle: Handle, world: Point) -> BoxBounds {
    let center = initial.center();
    let local = if initial.rotation == 0.0 {
        world
    } else {
        geom::rotate_point(world, center, -initial.rotation)
    };

    let mut b = initial;
    let right = initial.x + initial.width;
    let bottom = initial.y + initial.height;
    match handle {
        Handle::Nw => {
            b.width = (right - local.x).max(MIN_RESIZE_SIZE);
            b.height = (bottom - local.y).max(MIN_RESIZE_SIZE);
            b.x = local.x;
            b.y = local.y;
        }
        Handle::N => {
            b.height = (bottom - local.y).max(MIN_RESIZE_SIZE);
            b.y = local.y;
        }
        Handle::Ne => {
            b.width = (local.x - initial.x).max(MIN_RESIZE_SIZE);
            b.height = (bottom - local.y).max(MIN_RESIZE_SIZE);
            b.y = local.y;
        }
        Handle::E => {
            b.width = (local.x - initial.x).max(MIN_RESIZE_SIZE);
        }
        Handle::Se => {
            b.width = (local.x - initial.x).max(MIN_RESIZE_SIZE);
            b.height = (local.y - initial.y).max(MIN_RESIZE_SIZE);
        }
        Handle::S => {
            b.height = (local.y - initial.y).max(MIN_RESIZE_SIZE);
        }
        Handle::Sw => {
            b.width = (right - local.x).max(MIN_RESIZE_SIZE);
            b.height = (local.y - initial.y).max(MIN_RESIZE_SIZE);
            b.x = local.x;
        }
        Handle::W => {
            b.width = (right - local.x).max(MIN_RESIZE_SIZE);
            b.x = local.x;
        }
        Handle::Rotate => {}
    }
    b
}

/// Rewrite a shape's id (used when duplicating).
fn set_shape_id(shape: &mut Shape, id: ShapeId) {
    match shape {
        Shape::Pen(s) => s.id = id,
        Shape::Geo(s) => s.id = id,
        Shape::Sticky(s) => s.id = id,
        Shape::Text(s) => s.id = id,
        Shape::Connector(s) => s.id = id,
    }
}

/// The full canvas engine. Wraps [`EngineCore`] and owns the browser canvas
/// element.
pub struct Engine {
    canvas: HtmlCanvasElement,
    pub core: EngineCore,
}

impl Engine {
    /// Create a new engine bound to the given canvas element.
    #[must_use]
    pub fn new(canvas: HtmlCanvasElement) -> Self {
        Self { canvas, core: EngineCore::new() }
    }

    /// Draw the current state to the canvas.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the 2D context is unavailable or a `Canvas2D` call
    /// fails.
    pub fn render(&self) -> Result<(), JsValue> {
        let ctx = self
            .canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("no 2d context"))?
            .dyn_into::<web_sys::CanvasRenderingContext2d>()?;
        render::draw(&ctx, &self.core)
    }
}
