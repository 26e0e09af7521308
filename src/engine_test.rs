#![allow(clippy::float_cmp, clippy::too_many_lines)]

use uuid::Uuid;

use super::*;
use crate::shape::{ConnectorKind, GeoKind, GeoShape, ShapeStyle, StrokeStyle};
use crate::sync::{BoardData, Permission};

// =============================================================
// Helpers
// =============================================================

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn no_mods() -> Modifiers {
    Modifiers::default()
}

fn rect_at(x: f64, y: f64, w: f64, h: f64) -> Shape {
    Shape::Geo(GeoShape {
        id: Uuid::new_v4(),
        style: ShapeStyle::default(),
        kind: GeoKind::Rectangle,
        x,
        y,
        width: w,
        height: h,
        rotation: 0.0,
        corner_radius: 0.0,
    })
}

/// A core with a loaded (possibly empty) board; camera is identity, so
/// screen coordinates equal world coordinates.
fn loaded_core(shapes: Vec<Shape>) -> EngineCore {
    let mut core = EngineCore::new();
    core.load_board(BoardData { shapes, title: "test board".to_owned() });
    core
}

fn down(core: &mut EngineCore, x: f64, y: f64) -> Vec<Action> {
    core.on_pointer_down(pt(x, y), Button::Primary, no_mods())
}

fn drag(core: &mut EngineCore, x: f64, y: f64) -> Vec<Action> {
    core.on_pointer_move(pt(x, y), no_mods())
}

fn up(core: &mut EngineCore, x: f64, y: f64) -> Vec<Action> {
    core.on_pointer_up(pt(x, y), Button::Primary, no_mods())
}

fn has_committed(actions: &[Action]) -> bool {
    actions.iter().any(|a| matches!(a, Action::ShapesCommitted))
}

fn key(name: &str) -> Key {
    Key(name.to_owned())
}

// =============================================================
// Construction and load gating
// =============================================================

#[test]
fn new_core_has_no_selection_and_empty_doc() {
    let core = EngineCore::new();
    assert!(core.selection().is_none());
    assert!(core.current_shapes().is_empty());
    assert!(!core.is_loaded());
}

#[test]
fn default_tool_is_select() {
    assert_eq!(EngineCore::new().ui.tool, Tool::Select);
}

#[test]
fn pointer_events_are_noops_before_load() {
    let mut core = EngineCore::new();
    core.set_tool(Tool::Geo);
    assert!(down(&mut core, 0.0, 0.0).is_empty());
    assert!(drag(&mut core, 50.0, 50.0).is_empty());
    assert!(up(&mut core, 50.0, 50.0).is_empty());
    assert!(core.current_shapes().is_empty());
    assert!(matches!(core.gesture, Gesture::Idle));
}

#[test]
fn load_board_hydrates_and_enables_interaction() {
    let shapes = vec![rect_at(0.0, 0.0, 10.0, 10.0)];
    let id = shapes[0].id();
    let core = loaded_core(shapes);
    assert!(core.is_loaded());
    assert!(core.shape_by_id(id).is_some());
    assert_eq!(core.history.depth(), 1);
}

#[test]
fn load_board_clears_selection_and_history() {
    let mut core = loaded_core(vec![rect_at(0.0, 0.0, 50.0, 50.0)]);
    down(&mut core, 25.0, 25.0);
    up(&mut core, 25.0, 25.0);
    assert!(core.selection().is_some());

    core.load_board(BoardData { shapes: Vec::new(), title: String::new() });
    assert!(core.selection().is_none());
    assert!(!core.history.can_undo());
}

// =============================================================
// Scenario: create a rectangle by dragging
// =============================================================

#[test]
fn draw_rectangle_by_dragging() {
    let mut core = loaded_core(Vec::new());
    core.set_tool(Tool::Geo);

    down(&mut core, 100.0, 100.0);
    drag(&mut core, 300.0, 250.0);
    let actions = up(&mut core, 300.0, 250.0);

    assert!(has_committed(&actions));
    let shapes = core.current_shapes();
    assert_eq!(shapes.len(), 1);
    let Shape::Geo(g) = &shapes[0] else {
        panic!("expected geo, got {:?}", shapes[0]);
    };
    assert_eq!((g.x, g.y, g.width, g.height), (100.0, 100.0, 200.0, 150.0));
    assert_eq!(core.selection(), Some(shapes[0].id()));
    assert_eq!(core.ui.tool, Tool::Select);
}

#[test]
fn draw_rectangle_mirrored_drag_normalizes_origin() {
    let mut core = loaded_core(Vec::new());
    core.set_tool(Tool::Geo);

    down(&mut core, 300.0, 250.0);
    drag(&mut core, 100.0, 100.0);
    up(&mut core, 100.0, 100.0);

    let Shape::Geo(g) = &core.current_shapes()[0] else {
        panic!("expected geo");
    };
    assert_eq!((g.x, g.y, g.width, g.height), (100.0, 100.0, 200.0, 150.0));
}

#[test]
fn tiny_drag_discards_the_shape() {
    let mut core = loaded_core(Vec::new());
    core.set_tool(Tool::Geo);

    down(&mut core, 100.0, 100.0);
    drag(&mut core, 103.0, 103.0);
    let actions = up(&mut core, 103.0, 103.0);

    assert!(!has_committed(&actions));
    assert!(core.current_shapes().is_empty());
    assert!(!core.history.can_undo());
    // The tool does not auto-switch when nothing was created.
    assert_eq!(core.ui.tool, Tool::Geo);
}

#[test]
fn sticky_click_commits_default_size() {
    let mut core = loaded_core(Vec::new());
    core.set_tool(Tool::Sticky);

    down(&mut core, 40.0, 40.0);
    up(&mut core, 40.0, 40.0);

    let Shape::Sticky(s) = &core.current_shapes()[0] else {
        panic!("expected sticky");
    };
    assert_eq!((s.x, s.y, s.width, s.height), (40.0, 40.0, 150.0, 150.0));
    assert_eq!(s.text, "New Note");
    assert_eq!(s.style.background_color.as_deref(), Some("#FCD34D"));
    assert_eq!(core.ui.tool, Tool::Select);
}

#[test]
fn text_tool_creates_default_block() {
    let mut core = loaded_core(Vec::new());
    core.set_tool(Tool::Text);

    down(&mut core, 10.0, 20.0);
    up(&mut core, 10.0, 20.0);

    let Shape::Text(t) = &core.current_shapes()[0] else {
        panic!("expected text");
    };
    assert_eq!((t.width, t.height), (200.0, 40.0));
    assert_eq!(t.text, "Type here");
    assert_eq!(t.font_size, 24.0);
}

#[test]
fn geo_tool_uses_active_geo_kind() {
    let mut core = loaded_core(Vec::new());
    core.set_tool(Tool::Geo);
    core.set_active_geo(GeoKind::Star);

    down(&mut core, 0.0, 0.0);
    drag(&mut core, 80.0, 80.0);
    up(&mut core, 80.0, 80.0);

    let Shape::Geo(g) = &core.current_shapes()[0] else {
        panic!("expected geo");
    };
    assert_eq!(g.kind, GeoKind::Star);
}

// =============================================================
// Pen strokes
// =============================================================

#[test]
fn pen_stroke_commits_accumulated_points() {
    let mut core = loaded_core(Vec::new());
    core.set_tool(Tool::Pen);

    down(&mut core, 0.0, 0.0);
    drag(&mut core, 10.0, 5.0);
    drag(&mut core, 20.0, 15.0);
    let actions = up(&mut core, 20.0, 15.0);

    assert!(has_committed(&actions));
    let Shape::Pen(p) = &core.current_shapes()[0] else {
        panic!("expected pen");
    };
    assert_eq!(p.points, vec![pt(0.0, 0.0), pt(10.0, 5.0), pt(20.0, 15.0)]);
    assert_eq!(p.style.stroke_width, 4.0);
}

#[test]
fn pen_click_without_movement_is_discarded() {
    let mut core = loaded_core(Vec::new());
    core.set_tool(Tool::Pen);

    down(&mut core, 0.0, 0.0);
    let actions = up(&mut core, 0.0, 0.0);

    assert!(!has_committed(&actions));
    assert!(core.current_shapes().is_empty());
}

// =============================================================
// Selection and dragging
// =============================================================

#[test]
fn clicking_a_shape_selects_it() {
    let shapes = vec![rect_at(0.0, 0.0, 100.0, 100.0)];
    let id = shapes[0].id();
    let mut core = loaded_core(shapes);

    let actions = down(&mut core, 50.0, 50.0);
    assert!(actions.contains(&Action::SelectionChanged(Some(id))));
    assert_eq!(core.selection(), Some(id));
}

#[test]
fn clicking_empty_canvas_clears_selection_and_pans() {
    let mut core = loaded_core(vec![rect_at(0.0, 0.0, 100.0, 100.0)]);
    down(&mut core, 50.0, 50.0);
    up(&mut core, 50.0, 50.0);

    let actions = down(&mut core, 500.0, 500.0);
    assert!(actions.contains(&Action::SelectionChanged(None)));
    assert!(core.selection().is_none());
    assert!(core.panning);
}

#[test]
fn click_without_movement_pushes_nothing() {
    let mut core = loaded_core(vec![rect_at(0.0, 0.0, 100.0, 100.0)]);
    down(&mut core, 50.0, 50.0);
    let actions = up(&mut core, 50.0, 50.0);
    assert!(!has_committed(&actions));
    assert_eq!(core.history.depth(), 1);
}

#[test]
fn hit_test_picks_topmost_shape() {
    let bottom = rect_at(0.0, 0.0, 100.0, 100.0);
    let top = rect_at(50.0, 50.0, 100.0, 100.0);
    let top_id = top.id();
    let mut core = loaded_core(vec![bottom, top]);

    down(&mut core, 75.0, 75.0);
    assert_eq!(core.selection(), Some(top_id));
}

#[test]
fn dragging_moves_the_shape_in_one_push() {
    let shapes = vec![rect_at(0.0, 0.0, 100.0, 100.0)];
    let id = shapes[0].id();
    let mut core = loaded_core(shapes);

    down(&mut core, 50.0, 50.0);
    drag(&mut core, 60.0, 80.0);
    drag(&mut core, 90.0, 150.0);
    let actions = up(&mut core, 90.0, 150.0);

    assert!(has_committed(&actions));
    assert_eq!(core.history.depth(), 2);
    let Some(Shape::Geo(g)) = core.shape_by_id(id) else {
        panic!("shape vanished");
    };
    assert_eq!((g.x, g.y), (40.0, 100.0));
}

#[test]
fn drag_exposes_transient_without_committing() {
    let mut core = loaded_core(vec![rect_at(0.0, 0.0, 100.0, 100.0)]);
    down(&mut core, 50.0, 50.0);
    drag(&mut core, 70.0, 50.0);

    let transient = core.transient_shape().expect("transient during drag");
    let b = transient.box_bounds().unwrap();
    assert_eq!(b.x, 20.0);
    // The committed collection is untouched mid-gesture.
    let Shape::Geo(g) = &core.current_shapes()[0] else {
        panic!("expected geo");
    };
    assert_eq!(g.x, 0.0);
    assert_eq!(core.history.depth(), 1);
}

#[test]
fn dragging_unbound_connector_moves_endpoints() {
    let conn = Shape::Connector(crate::shape::ConnectorShape {
        id: Uuid::new_v4(),
        style: ShapeStyle::default(),
        kind: ConnectorKind::Straight,
        start_point: pt(0.0, 0.0),
        end_point: pt(100.0, 0.0),
        start_binding: None,
        end_binding: None,
        start_arrowhead: false,
        end_arrowhead: true,
    });
    let id = conn.id();
    let mut core = loaded_core(vec![conn]);

    down(&mut core, 50.0, 0.0);
    drag(&mut core, 50.0, 40.0);
    up(&mut core, 50.0, 40.0);

    let Some(Shape::Connector(c)) = core.shape_by_id(id) else {
        panic!("connector vanished");
    };
    assert_eq!(c.start_point, pt(0.0, 40.0));
    assert_eq!(c.end_point, pt(100.0, 40.0));
}

// =============================================================
// Scenario: bind a connector between two rectangles
// =============================================================

fn connect_two_rects(core: &mut EngineCore) -> (ShapeId, ShapeId) {
    let a = rect_at(0.0, 0.0, 100.0, 100.0);
    let b = rect_at(300.0, 0.0, 100.0, 100.0);
    let (a_id, b_id) = (a.id(), b.id());
    core.load_board(BoardData { shapes: vec![a, b], title: String::new() });

    core.set_tool(Tool::Connector);
    core.set_active_connector(ConnectorKind::Straight);
    down(core, 50.0, 50.0);
    drag(core, 350.0, 50.0);
    up(core, 350.0, 50.0);
    (a_id, b_id)
}

#[test]
fn connector_binds_both_shapes_on_facing_edges() {
    let mut core = EngineCore::new();
    let (a_id, b_id) = connect_two_rects(&mut core);

    let shapes = core.current_shapes();
    assert_eq!(shapes.len(), 3);
    let Shape::Connector(c) = &shapes[2] else {
        panic!("expected connector on top, got {:?}", shapes[2]);
    };
    assert_eq!(c.start_binding, Some(a_id));
    assert_eq!(c.end_binding, Some(b_id));
    assert_eq!(c.start_point, pt(100.0, 50.0));
    assert_eq!(c.end_point, pt(300.0, 50.0));
    assert_eq!(core.ui.tool, Tool::Select);
}

#[test]
fn connector_to_empty_space_stays_unbound_at_end() {
    let a = rect_at(0.0, 0.0, 100.0, 100.0);
    let a_id = a.id();
    let mut core = loaded_core(vec![a]);
    core.set_tool(Tool::Connector);

    down(&mut core, 50.0, 50.0);
    drag(&mut core, 400.0, 300.0);
    up(&mut core, 400.0, 300.0);

    let Shape::Connector(c) = &core.current_shapes()[1] else {
        panic!("expected connector");
    };
    assert_eq!(c.start_binding, Some(a_id));
    assert_eq!(c.end_binding, None);
    assert_eq!(c.end_point, pt(400.0, 300.0));
}

#[test]
fn connecting_snaps_live_endpoint_to_hovered_shape() {
    let a = rect_at(0.0, 0.0, 100.0, 100.0);
    let b = rect_at(300.0, 0.0, 100.0, 100.0);
    let mut core = loaded_core(vec![a, b]);
    core.set_tool(Tool::Connector);

    down(&mut core, 50.0, 50.0);
    drag(&mut core, 350.0, 50.0);
    let Gesture::Connecting { transient } = &core.gesture else {
        panic!("expected connecting gesture");
    };
    // Hovering over B: the live endpoint sits on B's perimeter, not under
    // the cursor.
    assert_eq!(transient.end_point, pt(300.0, 50.0));
}

// =============================================================
// Scenario: drag a bound shape, its connector tracks
// =============================================================

#[test]
fn dragging_bound_shape_reroutes_connector_atomically() {
    let mut core = EngineCore::new();
    let (a_id, _) = connect_two_rects(&mut core);
    let depth_before = core.history.depth();

    // Drag A down by 200 in one continuous gesture.
    down(&mut core, 50.0, 50.0);
    drag(&mut core, 50.0, 150.0);
    drag(&mut core, 50.0, 250.0);
    up(&mut core, 50.0, 250.0);

    // Exactly one new snapshot for move + re-route together.
    assert_eq!(core.history.depth(), depth_before + 1);

    let Some(Shape::Geo(g)) = core.shape_by_id(a_id) else {
        panic!("A vanished");
    };
    assert_eq!((g.x, g.y), (0.0, 200.0));

    let Shape::Connector(c) = &core.current_shapes()[2] else {
        panic!("expected connector");
    };
    // A's stored attachment tracks its new perimeter.
    assert_eq!(c.start_point, pt(100.0, 210.0));

    // One undo restores both the position and the old attachment.
    core.undo();
    let Shape::Connector(c) = &core.current_shapes()[2] else {
        panic!("expected connector");
    };
    assert_eq!(c.start_point, pt(100.0, 50.0));
}

// =============================================================
// Scenario: view permission refuses mutations
// =============================================================

#[test]
fn view_permission_refuses_drawing() {
    let mut core = loaded_core(Vec::new());
    core.set_permission(Permission::View);
    core.set_tool(Tool::Geo);

    down(&mut core, 0.0, 0.0);
    drag(&mut core, 100.0, 100.0);
    up(&mut core, 100.0, 100.0);

    assert!(core.current_shapes().is_empty());
    assert_eq!(core.history.depth(), 1);
    assert!(!core.history.can_undo());
}

#[test]
fn view_permission_refuses_drag_and_delete() {
    let shapes = vec![rect_at(0.0, 0.0, 100.0, 100.0)];
    let id = shapes[0].id();
    let mut core = loaded_core(shapes);
    core.set_permission(Permission::View);

    down(&mut core, 50.0, 50.0);
    drag(&mut core, 90.0, 90.0);
    up(&mut core, 90.0, 90.0);
    let Some(Shape::Geo(g)) = core.shape_by_id(id) else {
        panic!("shape vanished");
    };
    assert_eq!(g.x, 0.0);

    core.on_key_down(&key("Delete"), no_mods(), false);
    assert_eq!(core.current_shapes().len(), 1);
}

#[test]
fn view_permission_still_allows_pan_and_zoom() {
    let mut core = loaded_core(Vec::new());
    core.set_permission(Permission::View);
    core.set_tool(Tool::Hand);

    down(&mut core, 0.0, 0.0);
    drag(&mut core, 30.0, 40.0);
    up(&mut core, 30.0, 40.0);
    assert_eq!(core.camera.pan_x, 30.0);
    assert_eq!(core.camera.pan_y, 40.0);

    core.on_wheel(WheelDelta { dx: 0.0, dy: -100.0 }, Modifiers { ctrl: true, ..no_mods() });
    assert!((core.camera.zoom - 1.1).abs() < 1e-9);
}

#[test]
fn view_permission_still_selects() {
    let shapes = vec![rect_at(0.0, 0.0, 100.0, 100.0)];
    let id = shapes[0].id();
    let mut core = loaded_core(shapes);
    core.set_permission(Permission::View);

    down(&mut core, 50.0, 50.0);
    assert_eq!(core.selection(), Some(id));
    assert!(matches!(core.gesture, Gesture::Idle));
}

// =============================================================
// Panning and zooming
// =============================================================

#[test]
fn hand_tool_pans_with_pointer() {
    let mut core = loaded_core(Vec::new());
    core.set_tool(Tool::Hand);
    down(&mut core, 100.0, 100.0);
    assert!(core.panning);
    drag(&mut core, 130.0, 80.0);
    assert_eq!(core.camera.pan_x, 30.0);
    assert_eq!(core.camera.pan_y, -20.0);
    up(&mut core, 130.0, 80.0);
    assert!(!core.panning);
}

#[test]
fn middle_button_pans_in_select_tool() {
    let mut core = loaded_core(vec![rect_at(0.0, 0.0, 100.0, 100.0)]);
    core.on_pointer_down(pt(50.0, 50.0), Button::Middle, no_mods());
    assert!(core.panning);
    // No drag gesture started even though a shape was under the pointer.
    assert!(matches!(core.gesture, Gesture::Idle));
}

#[test]
fn ctrl_click_pans_in_select_tool() {
    let mut core = loaded_core(vec![rect_at(0.0, 0.0, 100.0, 100.0)]);
    core.on_pointer_down(pt(50.0, 50.0), Button::Primary, Modifiers { ctrl: true, ..no_mods() });
    assert!(core.panning);
}

#[test]
fn wheel_without_modifier_pans() {
    let mut core = loaded_core(Vec::new());
    core.on_wheel(WheelDelta { dx: 5.0, dy: 10.0 }, no_mods());
    assert_eq!(core.camera.pan_x, -5.0);
    assert_eq!(core.camera.pan_y, -10.0);
    assert_eq!(core.camera.zoom, 1.0);
}

#[test]
fn pointer_coordinates_respect_camera() {
    let mut core = loaded_core(Vec::new());
    core.camera.pan_x = 100.0;
    core.camera.zoom = 2.0;
    core.set_tool(Tool::Geo);

    // Screen (300, 100) is world (100, 50).
    down(&mut core, 300.0, 100.0);
    drag(&mut core, 500.0, 300.0);
    up(&mut core, 500.0, 300.0);

    let Shape::Geo(g) = &core.current_shapes()[0] else {
        panic!("expected geo");
    };
    assert_eq!((g.x, g.y, g.width, g.height), (100.0, 50.0, 100.0, 100.0));
}

// =============================================================
// Resizing
// =============================================================

fn select_rect(core: &mut EngineCore) -> ShapeId {
    let id = core.current_shapes()[0].id();
    down(core, 50.0, 50.0);
    up(core, 50.0, 50.0);
    assert_eq!(core.selection(), Some(id));
    id
}

#[test]
fn se_handle_resizes_the_shape() {
    let mut core = loaded_core(vec![rect_at(0.0, 0.0, 100.0, 100.0)]);
    let id = select_rect(&mut core);

    // SE handle sits at (108, 108).
    down(&mut core, 108.0, 108.0);
    assert!(matches!(core.gesture, Gesture::Resizing { handle: Handle::Se, .. }));
    drag(&mut core, 200.0, 150.0);
    up(&mut core, 200.0, 150.0);

    let Some(Shape::Geo(g)) = core.shape_by_id(id) else {
        panic!("shape vanished");
    };
    assert_eq!((g.x, g.y, g.width, g.height), (0.0, 0.0, 200.0, 150.0));
}

#[test]
fn nw_handle_reanchors_the_origin() {
    let mut core = loaded_core(vec![rect_at(0.0, 0.0, 100.0, 100.0)]);
    let id = select_rect(&mut core);

    down(&mut core, -8.0, -8.0);
    assert!(matches!(core.gesture, Gesture::Resizing { handle: Handle::Nw, .. }));
    drag(&mut core, 20.0, 30.0);
    up(&mut core, 20.0, 30.0);

    let Some(Shape::Geo(g)) = core.shape_by_id(id) else {
        panic!("shape vanished");
    };
    assert_eq!((g.x, g.y, g.width, g.height), (20.0, 30.0, 80.0, 70.0));
}

#[test]
fn resize_clamps_to_minimum_size() {
    let mut core = loaded_core(vec![rect_at(0.0, 0.0, 100.0, 100.0)]);
    select_rect(&mut core);

    down(&mut core, 108.0, 108.0);
    drag(&mut core, 2.0, 2.0);
    up(&mut core, 2.0, 2.0);

    let Shape::Geo(g) = &core.current_shapes()[0] else {
        panic!("expected geo");
    };
    assert_eq!((g.width, g.height), (10.0, 10.0));
}

#[test]
fn resize_commits_one_undo_step() {
    let mut core = loaded_core(vec![rect_at(0.0, 0.0, 100.0, 100.0)]);
    select_rect(&mut core);
    let depth = core.history.depth();

    down(&mut core, 108.0, 108.0);
    drag(&mut core, 150.0, 150.0);
    drag(&mut core, 180.0, 170.0);
    up(&mut core, 180.0, 170.0);

    assert_eq!(core.history.depth(), depth + 1);
}

// =============================================================
// Rotating
// =============================================================

#[test]
fn rotate_handle_rotates_relative_to_grab_angle() {
    let mut core = loaded_core(vec![rect_at(0.0, 0.0, 100.0, 100.0)]);
    let id = select_rect(&mut core);

    // Rotate handle sits at (50, -28); grab angle is -90° from center.
    down(&mut core, 50.0, -28.0);
    assert!(matches!(core.gesture, Gesture::Rotating { .. }));
    // Move due east of the center: angle 0°, so the delta is +90°.
    drag(&mut core, 150.0, 50.0);
    up(&mut core, 150.0, 50.0);

    let Some(Shape::Geo(g)) = core.shape_by_id(id) else {
        panic!("shape vanished");
    };
    assert!((g.rotation - 90.0).abs() < 1e-9);
}

#[test]
fn rotation_composes_across_gestures() {
    let mut core = loaded_core(vec![rect_at(0.0, 0.0, 100.0, 100.0)]);
    let id = select_rect(&mut core);

    down(&mut core, 50.0, -28.0);
    drag(&mut core, 150.0, 50.0);
    up(&mut core, 150.0, 50.0);

    // Second quarter turn: the handle now sits due east at (128, 50).
    down(&mut core, 128.0, 50.0);
    assert!(matches!(core.gesture, Gesture::Rotating { .. }));
    drag(&mut core, 50.0, 150.0);
    up(&mut core, 50.0, 150.0);

    let Some(Shape::Geo(g)) = core.shape_by_id(id) else {
        panic!("shape vanished");
    };
    assert!((g.rotation - 180.0).abs() < 1e-9);
}

// =============================================================
// Keyboard
// =============================================================

#[test]
fn mod_z_undoes_and_shift_redoes() {
    let mut core = loaded_core(Vec::new());
    core.set_tool(Tool::Geo);
    down(&mut core, 0.0, 0.0);
    drag(&mut core, 100.0, 100.0);
    up(&mut core, 100.0, 100.0);
    assert_eq!(core.current_shapes().len(), 1);

    let ctrl = Modifiers { ctrl: true, ..no_mods() };
    let actions = core.on_key_down(&key("z"), ctrl, false);
    assert!(has_committed(&actions));
    assert!(core.current_shapes().is_empty());

    let ctrl_shift = Modifiers { ctrl: true, shift: true, ..no_mods() };
    core.on_key_down(&key("Z"), ctrl_shift, false);
    assert_eq!(core.current_shapes().len(), 1);
}

#[test]
fn undo_at_start_emits_nothing() {
    let mut core = loaded_core(Vec::new());
    let ctrl = Modifiers { ctrl: true, ..no_mods() };
    assert!(core.on_key_down(&key("z"), ctrl, false).is_empty());
}

#[test]
fn undo_clears_selection_of_vanished_shape() {
    let mut core = loaded_core(Vec::new());
    core.set_tool(Tool::Geo);
    down(&mut core, 0.0, 0.0);
    drag(&mut core, 100.0, 100.0);
    up(&mut core, 100.0, 100.0);
    assert!(core.selection().is_some());

    let actions = core.undo();
    assert!(actions.contains(&Action::SelectionChanged(None)));
    assert!(core.selection().is_none());
}

#[test]
fn delete_key_removes_selection_with_cascade() {
    let mut core = EngineCore::new();
    let (a_id, _) = connect_two_rects(&mut core);
    down(&mut core, 50.0, 50.0);
    up(&mut core, 50.0, 50.0);
    assert_eq!(core.selection(), Some(a_id));

    let actions = core.on_key_down(&key("Delete"), no_mods(), false);
    assert!(has_committed(&actions));
    // A and the connector bound to it are gone; B remains.
    assert_eq!(core.current_shapes().len(), 1);
    assert!(core.selection().is_none());
}

#[test]
fn backspace_deletes_too() {
    let shapes = vec![rect_at(0.0, 0.0, 100.0, 100.0)];
    let mut core = loaded_core(shapes);
    down(&mut core, 50.0, 50.0);
    up(&mut core, 50.0, 50.0);

    core.on_key_down(&key("Backspace"), no_mods(), false);
    assert!(core.current_shapes().is_empty());
}

#[test]
fn delete_is_suppressed_while_typing() {
    let shapes = vec![rect_at(0.0, 0.0, 100.0, 100.0)];
    let mut core = loaded_core(shapes);
    down(&mut core, 50.0, 50.0);
    up(&mut core, 50.0, 50.0);

    assert!(core.on_key_down(&key("Backspace"), no_mods(), true).is_empty());
    assert_eq!(core.current_shapes().len(), 1);
}

#[test]
fn letter_shortcuts_switch_tools() {
    let mut core = loaded_core(Vec::new());
    for (name, tool) in [
        ("v", Tool::Select),
        ("h", Tool::Hand),
        ("p", Tool::Pen),
        ("g", Tool::Geo),
        ("c", Tool::Connector),
        ("s", Tool::Sticky),
        ("t", Tool::Text),
    ] {
        let actions = core.on_key_down(&key(name), no_mods(), false);
        assert!(actions.contains(&Action::ToolChanged(tool)), "{name} -> {tool:?}");
        assert_eq!(core.ui.tool, tool);
    }
}

#[test]
fn shortcuts_suppressed_while_typing_or_with_modifier() {
    let mut core = loaded_core(Vec::new());
    assert!(core.on_key_down(&key("p"), no_mods(), true).is_empty());
    assert_eq!(core.ui.tool, Tool::Select);

    let ctrl = Modifiers { ctrl: true, ..no_mods() };
    assert!(core.on_key_down(&key("p"), ctrl, false).is_empty());
    assert_eq!(core.ui.tool, Tool::Select);
}

#[test]
fn unknown_key_is_ignored() {
    let mut core = loaded_core(Vec::new());
    assert!(core.on_key_down(&key("q"), no_mods(), false).is_empty());
}

// =============================================================
// Collection operations
// =============================================================

#[test]
fn duplicate_offsets_the_copy() {
    let shapes = vec![rect_at(10.0, 10.0, 50.0, 50.0)];
    let original_id = shapes[0].id();
    let mut core = loaded_core(shapes);
    down(&mut core, 30.0, 30.0);
    up(&mut core, 30.0, 30.0);

    let actions = core.duplicate_selected();
    assert!(has_committed(&actions));
    assert_eq!(core.current_shapes().len(), 2);
    let Shape::Geo(copy) = &core.current_shapes()[1] else {
        panic!("expected geo copy");
    };
    assert_eq!((copy.x, copy.y), (30.0, 30.0));
    assert_ne!(copy.id, original_id);
    assert_eq!(core.selection(), Some(copy.id));
}

#[test]
fn move_layer_swaps_z_order() {
    let a = rect_at(0.0, 0.0, 100.0, 100.0);
    let b = rect_at(0.0, 0.0, 100.0, 100.0);
    let a_id = a.id();
    let mut core = loaded_core(vec![a, b]);
    // Click selects the topmost (B); select A instead via its id.
    core.ui.selected_id = Some(a_id);

    core.move_layer(LayerMove::Raise);
    assert_eq!(core.current_shapes()[1].id(), a_id);

    core.move_layer(LayerMove::Lower);
    assert_eq!(core.current_shapes()[0].id(), a_id);
}

#[test]
fn move_layer_at_edge_is_noop() {
    let shapes = vec![rect_at(0.0, 0.0, 10.0, 10.0)];
    let id = shapes[0].id();
    let mut core = loaded_core(shapes);
    core.ui.selected_id = Some(id);
    assert!(core.move_layer(LayerMove::Lower).is_empty());
    assert_eq!(core.history.depth(), 1);
}

#[test]
fn clear_board_empties_collection_undoably() {
    let mut core = loaded_core(vec![rect_at(0.0, 0.0, 10.0, 10.0)]);
    let actions = core.clear_board();
    assert!(has_committed(&actions));
    assert!(core.current_shapes().is_empty());

    core.undo();
    assert_eq!(core.current_shapes().len(), 1);
}

#[test]
fn apply_patch_is_one_undo_step() {
    let shapes = vec![rect_at(0.0, 0.0, 10.0, 10.0)];
    let id = shapes[0].id();
    let mut core = loaded_core(shapes);

    let patch = ShapePatch {
        color: Some("#ff0000".to_owned()),
        stroke_style: Some(StrokeStyle::Dashed),
        ..ShapePatch::default()
    };
    let actions = core.apply_patch(id, &patch);
    assert!(has_committed(&actions));
    assert_eq!(core.shape_by_id(id).unwrap().style().color, "#ff0000");

    core.undo();
    assert_eq!(core.shape_by_id(id).unwrap().style().color, "#6366f1");
}

#[test]
fn apply_patch_unknown_id_is_noop() {
    let mut core = loaded_core(Vec::new());
    let actions = core.apply_patch(Uuid::new_v4(), &ShapePatch::default());
    assert!(actions.is_empty());
    assert_eq!(core.history.depth(), 1);
}

// =============================================================
// Remote snapshots
// =============================================================

#[test]
fn apply_remote_replaces_collection_as_history_push() {
    let mut core = loaded_core(vec![rect_at(0.0, 0.0, 10.0, 10.0)]);
    let remote = vec![rect_at(5.0, 5.0, 20.0, 20.0), rect_at(50.0, 50.0, 20.0, 20.0)];

    let actions = core.apply_remote(remote);
    // Remote updates repaint but are never re-broadcast.
    assert!(!has_committed(&actions));
    assert_eq!(core.current_shapes().len(), 2);

    // The replacement is still locally undoable.
    core.undo();
    assert_eq!(core.current_shapes().len(), 1);
}

#[test]
fn apply_remote_prunes_dead_selection() {
    let shapes = vec![rect_at(0.0, 0.0, 100.0, 100.0)];
    let mut core = loaded_core(shapes);
    down(&mut core, 50.0, 50.0);
    up(&mut core, 50.0, 50.0);
    assert!(core.selection().is_some());

    let actions = core.apply_remote(Vec::new());
    assert!(actions.contains(&Action::SelectionChanged(None)));
    assert!(core.selection().is_none());
}

// =============================================================
// Cursor style
// =============================================================

#[test]
fn cursor_style_follows_tool_and_pan() {
    let mut core = loaded_core(Vec::new());
    assert_eq!(core.cursor_style(), "default");
    core.set_tool(Tool::Hand);
    assert_eq!(core.cursor_style(), "grab");
    core.set_tool(Tool::Pen);
    assert_eq!(core.cursor_style(), "crosshair");
    core.panning = true;
    assert_eq!(core.cursor_style(), "grabbing");
}
