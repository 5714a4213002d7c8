//! Constraint engine: decides whether proposed poses keep every part on the canvas.
//!
//! All checks are recomputed from scratch from pose and footprint; nothing is
//! cached, since footprints change on retype and angles change on every
//! rotation step.
//!
//! Group operations take `(Pose, Size)` pairs rather than scene items so the
//! rules can be exercised without a scene.

#[cfg(test)]
#[path = "constraint_test.rs"]
mod constraint_test;

use crate::config::CanvasSize;
use crate::consts::{MOVE_COARSE, MOVE_FINE, ROT_COARSE, ROT_FINE};
use crate::geom::{Bounds, Point, Pose, Size, local_corners, snap_to, world_corners};

/// Whether a rectangle at `pose` lies entirely within the canvas (edges inclusive).
#[must_use]
pub fn is_admissible(pose: Pose, size: Size, canvas: CanvasSize) -> bool {
    world_corners(pose, size)
        .iter()
        .all(|c| c.x >= 0.0 && c.x <= canvas.width && c.y >= 0.0 && c.y <= canvas.height)
}

/// `pose` if admissible, otherwise the same angle at the canvas center.
///
/// Used where an illegal pose is recovered by recentering rather than rejected
/// (retype, paste).
#[must_use]
pub fn place_or_center(pose: Pose, size: Size, canvas: CanvasSize) -> Pose {
    if is_admissible(pose, size, canvas) {
        pose
    } else {
        tracing::debug!(x = pose.center.x, y = pose.center.y, "pose out of bounds; recentering");
        Pose { center: canvas.center(), angle: pose.angle }
    }
}

// =============================================================
// Drag
// =============================================================

/// Correct a proposed group translation so the group stays on the canvas.
///
/// `starts` holds each dragged part's pose at drag start; `delta` is the raw
/// translation. Each canvas edge is handled independently: the worst overflow
/// past the left edge pushes right, the worst past the right edge pushes left,
/// and both pushes are added (likewise vertically). When a group overflows
/// opposite edges at once the pushes partially cancel, so the result is not
/// guaranteed to be in bounds in that case.
#[must_use]
pub fn drag_clamp(starts: &[(Pose, Size)], delta: Point, canvas: CanvasSize) -> Point {
    let mut push_right = 0.0_f64;
    let mut push_left = 0.0_f64;
    let mut push_down = 0.0_f64;
    let mut push_up = 0.0_f64;

    for (pose, size) in starts {
        let ext = Bounds::of_corners(local_corners(*size, pose.angle));
        let x = pose.center.x + delta.x;
        let y = pose.center.y + delta.y;

        if x + ext.min_x < 0.0 {
            push_right = push_right.max(-(x + ext.min_x));
        }
        if x + ext.max_x > canvas.width {
            push_left = push_left.min(canvas.width - (x + ext.max_x));
        }
        if y + ext.min_y < 0.0 {
            push_down = push_down.max(-(y + ext.min_y));
        }
        if y + ext.max_y > canvas.height {
            push_up = push_up.min(canvas.height - (y + ext.max_y));
        }
    }

    delta.offset(push_right + push_left, push_down + push_up)
}

// =============================================================
// Rotation
// =============================================================

/// Direction of one rotation step. Clockwise is positive on a Y-down canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotateDirection {
    Clockwise,
    CounterClockwise,
}

impl RotateDirection {
    /// Direction for a wheel event: scrolling down turns clockwise.
    #[must_use]
    pub fn from_wheel(dy: f64) -> Self {
        if dy > 0.0 { Self::Clockwise } else { Self::CounterClockwise }
    }

    #[must_use]
    pub fn sign(self) -> f64 {
        match self {
            Self::Clockwise => 1.0,
            Self::CounterClockwise => -1.0,
        }
    }
}

/// Rotation step in radians: [`ROT_COARSE`] when `coarse`, else [`ROT_FINE`].
#[must_use]
pub fn rotation_step(coarse: bool) -> f64 {
    if coarse { ROT_COARSE } else { ROT_FINE }
}

/// Advance `angle` by one step and snap to the nearest multiple of `step`.
#[must_use]
pub fn snap_rotation(angle: f64, direction: RotateDirection, step: f64) -> f64 {
    snap_to(angle + direction.sign() * step, step)
}

/// New angles for every part after one rotation step, or `None` if any part
/// would leave the canvas. Either all parts rotate or none do.
#[must_use]
pub fn rotate_group(parts: &[(Pose, Size)], direction: RotateDirection, step: f64, canvas: CanvasSize) -> Option<Vec<f64>> {
    parts
        .iter()
        .map(|(pose, size)| {
            let angle = snap_rotation(pose.angle, direction, step);
            is_admissible(Pose { center: pose.center, angle }, *size, canvas).then_some(angle)
        })
        .collect()
}

// =============================================================
// Keyboard nudge
// =============================================================

/// Arrow-key direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NudgeDirection {
    Up,
    Down,
    Left,
    Right,
}

impl NudgeDirection {
    /// Unit offset in canvas space (Y down).
    #[must_use]
    pub fn unit(self) -> Point {
        match self {
            Self::Up => Point::new(0.0, -1.0),
            Self::Down => Point::new(0.0, 1.0),
            Self::Left => Point::new(-1.0, 0.0),
            Self::Right => Point::new(1.0, 0.0),
        }
    }
}

/// Nudge distance in pixels: [`MOVE_COARSE`] when `coarse`, else [`MOVE_FINE`].
#[must_use]
pub fn nudge_step(coarse: bool) -> f64 {
    if coarse { MOVE_COARSE } else { MOVE_FINE }
}

/// How far the whole group may move in `direction`, capped at `step`.
///
/// The result is the smallest room left between any part's extreme corner and
/// the facing canvas edge. A result `<= 0` means the group cannot move.
#[must_use]
pub fn nudge_limit(parts: &[(Pose, Size)], direction: NudgeDirection, step: f64, canvas: CanvasSize) -> f64 {
    parts.iter().fold(step, |limit, (pose, size)| {
        let b = Bounds::of_corners(world_corners(*pose, *size));
        let room = match direction {
            NudgeDirection::Up => b.min_y,
            NudgeDirection::Down => canvas.height - b.max_y,
            NudgeDirection::Left => b.min_x,
            NudgeDirection::Right => canvas.width - b.max_x,
        };
        limit.min(room)
    })
}
