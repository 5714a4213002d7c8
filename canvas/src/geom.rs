//! Geometry kernel: points, poses, oriented-rectangle corners, and bounds.
//!
//! Canvas space has its origin at the top-left with Y pointing down. Angles are
//! radians; a positive angle turns clockwise on screen. [`local_corners`] and
//! [`point_in_rotated_rect`] use the same rotation sense, so a point produced
//! by one is accepted by the other.

#[cfg(test)]
#[path = "geom_test.rs"]
mod geom_test;

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// A point (or offset) in canvas pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// This point shifted by `(dx, dy)`.
    #[must_use]
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self { x: self.x + dx, y: self.y + dy }
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}

/// Width and height of a rectangle footprint, in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Center position plus rotation of a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    pub center: Point,
    pub angle: f64,
}

impl Pose {
    #[must_use]
    pub fn new(x: f64, y: f64, angle: f64) -> Self {
        Self { center: Point::new(x, y), angle }
    }
}

/// Offsets from a rectangle's center to its four corners after rotation.
///
/// Corners come back in canvas order: top-left, top-right, bottom-right,
/// bottom-left (as seen at angle zero).
#[must_use]
pub fn local_corners(size: Size, angle: f64) -> [Point; 4] {
    let (sin, cos) = angle.sin_cos();
    let hw = size.width / 2.0;
    let hh = size.height / 2.0;
    [(-hw, -hh), (hw, -hh), (hw, hh), (-hw, hh)].map(|(x, y)| Point::new(x * cos - y * sin, x * sin + y * cos))
}

/// Corners of a rectangle at `pose`, in canvas space.
#[must_use]
pub fn world_corners(pose: Pose, size: Size) -> [Point; 4] {
    local_corners(size, pose.angle).map(|c| pose.center.offset(c.x, c.y))
}

/// Whether `point` lies inside the rectangle at `pose`. Boundaries count as inside.
#[must_use]
pub fn point_in_rotated_rect(point: Point, pose: Pose, size: Size) -> bool {
    let (sin, cos) = (-pose.angle).sin_cos();
    let d = point - pose.center;
    let rx = d.x * cos - d.y * sin;
    let ry = d.x * sin + d.y * cos;
    let hw = size.width / 2.0;
    let hh = size.height / 2.0;
    rx >= -hw && rx <= hw && ry >= -hh && ry <= hh
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    /// The box spanned by two opposite corners, in either order.
    #[must_use]
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self { min_x: a.x.min(b.x), min_y: a.y.min(b.y), max_x: a.x.max(b.x), max_y: a.y.max(b.y) }
    }

    /// Smallest box enclosing every point, or `None` for an empty iterator.
    #[must_use]
    pub fn enclosing<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Point>,
    {
        points.into_iter().fold(None, |acc, p| {
            Some(match acc {
                None => Self { min_x: p.x, min_y: p.y, max_x: p.x, max_y: p.y },
                Some(b) => Self {
                    min_x: b.min_x.min(p.x),
                    min_y: b.min_y.min(p.y),
                    max_x: b.max_x.max(p.x),
                    max_y: b.max_y.max(p.y),
                },
            })
        })
    }

    /// Box around the four corners of one rectangle.
    #[must_use]
    pub fn of_corners(corners: [Point; 4]) -> Self {
        let [first, rest @ ..] = corners;
        rest.iter().fold(Self::from_corners(first, first), |b, p| Self {
            min_x: b.min_x.min(p.x),
            min_y: b.min_y.min(p.y),
            max_x: b.max_x.max(p.x),
            max_y: b.max_y.max(p.y),
        })
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.min_x + self.width() / 2.0, self.min_y + self.height() / 2.0)
    }

    /// Inclusive containment test.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }
}

/// Round to the nearest integer with ties going toward positive infinity.
///
/// `f64::round` sends `-2.5` to `-3`; snapping needs `-2`, so every snap in
/// the crate goes through here.
#[must_use]
pub fn round_half_up(v: f64) -> f64 {
    (v + 0.5).floor()
}

/// Snap `v` to the nearest multiple of `step`.
#[must_use]
pub fn snap_to(v: f64, step: f64) -> f64 {
    round_half_up(v / step) * step
}
