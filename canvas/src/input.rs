//! Input model: modifier keys, buttons, keys, and the gesture state machine.
//!
//! `Modifiers` captures the user's intent at the time of an event; Shift is
//! the editor's single modifier (multi-select, grid snap, coarse steps, and
//! retype instead of add). `InputState` is the gesture tracked between
//! pointer-down and pointer-up. It is discarded on pointer-up whether or not
//! the pointer moved.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::constraint::NudgeDirection;
use crate::geom::{Bounds, Point};
use crate::scene::ItemId;

/// Modifier keys held when an event fired. Only `shift` and `ctrl` change
/// editor behavior; the others are carried so hosts can pass events through.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Multi-select, grid snap, coarse steps, retype.
    pub shift: bool,
    /// Clipboard and select-all shortcuts.
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Only Shift held.
    #[must_use]
    pub fn shift_only() -> Self {
        Self { shift: true, ..Self::default() }
    }

    /// Only Ctrl held.
    #[must_use]
    pub fn ctrl_only() -> Self {
        Self { ctrl: true, ..Self::default() }
    }
}

/// Pointer button. Only `Primary` starts a drag or box selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Primary,
    Middle,
    Secondary,
}

/// A keyboard key.
///
/// The inner string holds the key name as reported by the browser (e.g. `"Delete"`, `"ArrowUp"`, `"a"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self(name.to_owned())
    }

    /// Case-insensitive comparison against a key name.
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.0.eq_ignore_ascii_case(name)
    }

    /// The nudge direction for an arrow key.
    #[must_use]
    pub fn nudge_direction(&self) -> Option<NudgeDirection> {
        match self.0.as_str() {
            "ArrowUp" => Some(NudgeDirection::Up),
            "ArrowDown" => Some(NudgeDirection::Down),
            "ArrowLeft" => Some(NudgeDirection::Left),
            "ArrowRight" => Some(NudgeDirection::Right),
            _ => None,
        }
    }
}

/// Scroll delta of a wheel event. The sign of `dy` picks the rotation
/// direction; magnitudes are ignored.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    pub dx: f64,
    /// Positive scrolls down and rotates clockwise.
    pub dy: f64,
}

/// Host-visible UI state that is not part of the scene.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// The import overlay is showing; canvas input is suspended.
    pub import_open: bool,
    /// Raw text in the import overlay.
    pub import_text: String,
    /// Whether `import_text` currently passes validation.
    pub import_loadable: bool,
}

/// Starting position of one dragged item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragStart {
    pub id: ItemId,
    pub center: Point,
}

/// Gesture in progress between pointer-down and pointer-up.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    /// No pointer is down.
    #[default]
    Idle,
    /// The user is moving the selected items as a group.
    Dragging {
        /// Smallest item center x and y across the group at drag start.
        group_origin: Point,
        /// Pointer position minus `group_origin` at drag start.
        pointer_offset: Point,
        /// Each dragged item's center at drag start.
        starts: Vec<DragStart>,
    },
    /// The user is dragging a selection box over empty canvas.
    BoxSelecting {
        /// Where the pointer went down.
        start: Point,
        /// Latest pointer position.
        current: Point,
        /// Selection at the moment the box started; always kept.
        snapshot: Vec<ItemId>,
    },
}

impl InputState {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// The selection box while box-selecting.
    #[must_use]
    pub fn selection_box(&self) -> Option<Bounds> {
        match self {
            Self::BoxSelecting { start, current, .. } => Some(Bounds::from_corners(*start, *current)),
            _ => None,
        }
    }
}
