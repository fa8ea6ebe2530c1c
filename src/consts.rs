//! Shared numeric constants for the engine.

use glam::DVec3;

// ── Render buffers ──────────────────────────────────────────────

/// Position inserted before every stroke in a flattened render buffer.
///
/// Far below any reachable world position; the store refuses strokes that
/// contain it so a renderer can always treat it as "do not connect".
pub const BREAK_SENTINEL: DVec3 = DVec3::new(0.0, -10_000.0, 0.0);

// ── Geometry ────────────────────────────────────────────────────

/// Squared segment length below which a segment is treated as a point.
pub const DEGENERATE_SEGMENT_EPSILON_SQ: f64 = 1e-18;

// ── Drawing defaults ────────────────────────────────────────────

/// Minimum tip travel (world units) before a new stroke point is recorded.
pub const DEFAULT_MIN_MOVE_DISTANCE: f64 = 0.02;

/// Tolerance of the simplification pass applied when a stroke is committed.
pub const DEFAULT_SIMPLIFY_TOLERANCE: f64 = 0.005;

// ── Eraser defaults ─────────────────────────────────────────────

/// Radius of the whole-line eraser sphere.
pub const DEFAULT_ERASE_RADIUS: f64 = 0.2;

/// Radius of the partial (pixel) eraser sphere.
pub const DEFAULT_PIXEL_ERASE_RADIUS: f64 = 0.1;

/// Minimum eraser travel before partial erase recomputes line geometry.
pub const DEFAULT_PIXEL_ERASER_MIN_MOVE_DISTANCE: f64 = 0.1;

/// Seconds between two line-marking passes while the eraser is held.
pub const DEFAULT_CHECK_ERASE_FREQUENCY_SECS: f64 = 0.5;

/// Number of recent eraser samples kept for the visual mask.
pub const DEFAULT_ERASER_TRAIL_CAPACITY: usize = 25;
