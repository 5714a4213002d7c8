//! Rendering view: what the host should draw, without drawing it.
//!
//! [`draw_list`] reads the scene and gesture state and produces plain data in
//! paint order. The host maps each entry onto its own 2D API; nothing here
//! produces pixels or mutates state.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use crate::config::CanvasSize;
use crate::consts::GRID_SIZE;
use crate::geom::{Bounds, Point, Pose, Size};
use crate::hit::{draw_order, scene_bounds};
use crate::input::{InputState, Modifiers};
use crate::scene::{ItemId, PartKind, Scene};

/// One part image, centered on `pose` and rotated by its angle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub id: ItemId,
    pub kind: PartKind,
    pub pose: Pose,
    pub size: Size,
    /// Draw the selection outline around this sprite.
    pub selected: bool,
}

/// Background grid shown while snapping is available.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    pub spacing: f64,
    pub width: f64,
    pub height: f64,
}

/// Everything drawn for one frame, layer by layer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DrawList {
    /// Layer 1: snapping grid.
    pub grid: Option<Grid>,
    /// Layer 2: parts, bottom first.
    pub sprites: Vec<Sprite>,
    /// Layer 3: dashed selection box while box-selecting.
    pub selection_box: Option<Bounds>,
    /// Layer 4: dashed outline around the whole layout.
    pub layout_bounds: Option<Bounds>,
    /// Layer 5: marker at the layout center, only with more than one part.
    pub center_marker: Option<Point>,
}

/// Build the draw list for the current state.
#[must_use]
pub fn draw_list(scene: &Scene, input: &InputState, canvas: CanvasSize, modifiers: Modifiers) -> DrawList {
    let grid = (modifiers.shift && !scene.selection().is_empty()).then_some(Grid {
        spacing: GRID_SIZE,
        width: canvas.width,
        height: canvas.height,
    });

    let sprites = draw_order(scene)
        .into_iter()
        .map(|item| Sprite {
            id: item.id,
            kind: item.kind,
            pose: item.pose(),
            size: item.size,
            selected: scene.is_selected(&item.id),
        })
        .collect();

    let layout_bounds = scene_bounds(scene.items());
    let center_marker = layout_bounds.filter(|_| scene.len() > 1).map(|b| b.center());

    DrawList { grid, sprites, selection_box: input.selection_box(), layout_bounds, center_marker }
}
