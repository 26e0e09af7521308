//! Shared numeric constants for the whiteboard engine.

// ── Math ────────────────────────────────────────────────────────

/// π / 5 (36°) — angular step for a 10-vertex star polygon.
pub const FRAC_PI_5: f64 = std::f64::consts::PI / 5.0;

/// Inner-to-outer radius ratio for the default 5-point star.
pub const STAR_INNER_RATIO: f64 = 0.382;

/// Multiplier applied to the center→from ray when intersecting shape
/// edges, emulating an infinite ray with a finite segment.
pub const PERIMETER_RAY_EXTENT: f64 = 1000.0;

// ── Hit-testing ─────────────────────────────────────────────────

/// Hit radius around resize/rotate handles, in screen pixels.
/// Divided by zoom so the apparent radius stays constant on screen.
pub const HANDLE_HIT_RADIUS_PX: f64 = 8.0;

/// Gap between a shape's bounding box and its handle ring, world units.
pub const HANDLE_PADDING: f64 = 8.0;

/// Extra offset of the rotate handle beyond the handle ring's north edge.
pub const ROTATE_HANDLE_OFFSET: f64 = 20.0;

/// Hit radius around a connector's chord, world units.
pub const CONNECTOR_HIT_RADIUS: f64 = 10.0;

/// Slop added to a pen stroke's width when hit-testing its segments.
pub const PEN_HIT_SLOP: f64 = 5.0;

// ── Shape sizing ────────────────────────────────────────────────

/// Shapes drawn smaller than this on either axis are discarded on release.
pub const MIN_SHAPE_SIZE: f64 = 5.0;

/// Floor for either axis while resizing with a handle.
pub const MIN_RESIZE_SIZE: f64 = 10.0;

/// Default sticky-note edge length, world units.
pub const STICKY_DEFAULT_SIZE: f64 = 150.0;

/// Default text-block width, world units.
pub const TEXT_DEFAULT_WIDTH: f64 = 200.0;

/// Default text-block height, world units.
pub const TEXT_DEFAULT_HEIGHT: f64 = 40.0;

/// Default text font size.
pub const TEXT_DEFAULT_FONT_SIZE: f64 = 24.0;

/// Offset applied to both axes when duplicating a shape.
pub const DUPLICATE_OFFSET: f64 = 20.0;

// ── Camera ──────────────────────────────────────────────────────

/// Lowest allowed zoom factor.
pub const ZOOM_MIN: f64 = 0.1;

/// Highest allowed zoom factor.
pub const ZOOM_MAX: f64 = 5.0;

/// Zoom change per wheel-delta pixel when the zoom modifier is held.
pub const ZOOM_SENSITIVITY: f64 = 0.001;

// ── Connectors ──────────────────────────────────────────────────

/// Minimum control-point offset for curved connectors, world units.
pub const CURVE_MIN_OFFSET: f64 = 80.0;

/// Control-point offset as a fraction of the endpoint distance.
pub const CURVE_OFFSET_RATIO: f64 = 0.4;

// ── Sync ────────────────────────────────────────────────────────

/// Quiet period after the last edit before autosave fires, milliseconds.
pub const AUTOSAVE_DELAY_MS: f64 = 5000.0;

/// Minimum interval between cursor-position broadcasts, milliseconds.
pub const CURSOR_THROTTLE_MS: f64 = 50.0;
