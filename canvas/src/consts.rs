//! Shared numeric constants for the canvas crate.

use std::f64::consts::PI;

// ── Scene limits ────────────────────────────────────────────────

/// Maximum number of parts a layout may hold.
pub const MAX_RECTS: usize = 6;

/// Default canvas width in pixels.
pub const DEFAULT_CANVAS_WIDTH: f64 = 700.0;

/// Default canvas height in pixels.
pub const DEFAULT_CANVAS_HEIGHT: f64 = 450.0;

// ── Interaction steps ───────────────────────────────────────────

/// Grid spacing in pixels used when snapping a drag.
pub const GRID_SIZE: f64 = 10.0;

/// Fine rotation step (5°) in radians.
pub const ROT_FINE: f64 = 5.0 * (PI / 180.0);

/// Coarse rotation step (10°) in radians, used while the modifier is held.
pub const ROT_COARSE: f64 = 2.0 * ROT_FINE;

/// Fine keyboard nudge in pixels.
pub const MOVE_FINE: f64 = 1.0;

/// Coarse keyboard nudge in pixels, used while the modifier is held.
pub const MOVE_COARSE: f64 = 10.0;

/// Offset in pixels applied to each pasted copy, on both axes.
pub const PASTE_OFFSET: f64 = 15.0;

// ── Units ───────────────────────────────────────────────────────

/// Scale from source image pixels to canvas pixels.
pub const IMAGE_RENDER_SCALE: f64 = 0.25;

/// Physical units per canvas pixel: 400 source pixels span 5 units.
pub const LENGTH_SCALE: f64 = 5.0 / (400.0 * IMAGE_RENDER_SCALE);

/// Ascending table of road widths offered as the secondary extent.
pub const WIDTH_THRESHOLDS: [f64; 5] = [6.0, 10.0, 15.0, 22.0, 28.0];

/// Margin added to the minimum width when no threshold qualifies.
pub const WIDTH_FALLBACK_MARGIN: f64 = 5.0;

/// Lower bound on the fallback extent.
pub const WIDTH_FALLBACK_FLOOR: f64 = 50.0;

// ── Status messages ─────────────────────────────────────────────

/// How long a transient status notice stays visible, in seconds.
pub const STATUS_TTL_SECS: u64 = 4;
