//! Interaction controller: turns pointer and keyboard events into scene edits.
//!
//! Every handler validates its edit through [`crate::constraint`], applies it
//! to the [`Scene`], and returns the [`Action`]s the host should perform
//! (redraw, refresh the export text, show a notice). The engine never touches
//! the DOM, the system clipboard, or timers itself.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use std::time::Duration;

use crate::config::EditorConfig;
use crate::constraint::{
    NudgeDirection, RotateDirection, drag_clamp, nudge_limit, nudge_step, rotate_group, rotation_step,
};
use crate::consts::{GRID_SIZE, STATUS_TTL_SECS};
use crate::error::ImportError;
use crate::geom::{Bounds, Point, Pose, snap_to};
use crate::hit::{hit_test, items_in_box};
use crate::input::{Button, DragStart, InputState, Key, Modifiers, UiState, WheelDelta};
use crate::render::{DrawList, draw_list};
use crate::scene::{Item, ItemId, PartKind, Scene};
use crate::transcode::{self, ImportedLayout};

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// The canvas should be redrawn.
    RenderNeeded,
    /// The selection changed; carries the new selection.
    SelectionChanged(Vec<ItemId>),
    /// The scene changed; carries the fresh export text.
    ExportChanged(String),
    /// Show a transient notice.
    Status(StatusNotice),
    /// Write this text to the system clipboard.
    CopyToClipboard(String),
    /// Show or hide the import overlay.
    ImportOverlay { open: bool },
}

/// Severity of a status notice, for colouring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Success,
    Warning,
    Info,
}

/// A short human-readable message that disappears after `ttl`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusNotice {
    pub text: String,
    pub level: StatusLevel,
    pub ttl: Duration,
}

impl StatusNotice {
    fn new(text: &str, level: StatusLevel) -> Self {
        Self { text: text.to_owned(), level, ttl: Duration::from_secs(STATUS_TTL_SECS) }
    }
}

/// Whether a kind button adds a new part or retypes the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindMode {
    Add,
    Retype,
}

/// State of one kind button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindAffordance {
    pub kind: PartKind,
    pub mode: KindMode,
    pub enabled: bool,
}

/// Which controls the host should enable, derived from the current state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Affordances {
    pub kinds: [KindAffordance; 3],
    pub delete_enabled: bool,
    pub remaining_capacity: usize,
    pub grid_visible: bool,
    pub can_load_import: bool,
}

impl Affordances {
    /// Capacity counter text, e.g. `Room for 5 more part(s)`.
    #[must_use]
    pub fn capacity_label(&self) -> String {
        format!("Room for {} more part(s)", self.remaining_capacity)
    }
}

/// Editor state and event handlers, independent of any host toolkit.
#[derive(Debug)]
pub struct EngineCore {
    pub scene: Scene,
    pub input: InputState,
    pub ui: UiState,
    pub config: EditorConfig,
    clipboard: Option<Vec<Item>>,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl EngineCore {
    /// Create an engine holding the default scene: one car at canvas center.
    #[must_use]
    pub fn new(config: EditorConfig) -> Self {
        let mut scene = Scene::new();
        scene.add(PartKind::Car, config.footprint(PartKind::Car), config.canvas.center());
        Self { scene, input: InputState::Idle, ui: UiState::default(), config, clipboard: None }
    }

    // --- Queries ---

    /// Current selection.
    #[must_use]
    pub fn selection(&self) -> &[ItemId] {
        self.scene.selection()
    }

    /// Look up an item by id.
    #[must_use]
    pub fn item(&self, id: &ItemId) -> Option<&Item> {
        self.scene.get(id)
    }

    /// Export text for the current scene in the configured profile.
    #[must_use]
    pub fn export_text(&self) -> Option<String> {
        transcode::export(self.scene.items(), &self.config.profile)
    }

    /// Items copied by the last copy, if any.
    #[must_use]
    pub fn clipboard(&self) -> Option<&[Item]> {
        self.clipboard.as_deref()
    }

    /// Derived draw list for the host renderer.
    #[must_use]
    pub fn draw_list(&self, modifiers: Modifiers) -> DrawList {
        draw_list(&self.scene, &self.input, self.config.canvas, modifiers)
    }

    /// Control state for the current scene and modifiers.
    #[must_use]
    pub fn affordances(&self, modifiers: Modifiers) -> Affordances {
        let selection = self.scene.selection();
        let retyping = modifiers.shift && !selection.is_empty();

        let kinds = PartKind::ALL.map(|kind| {
            if retyping {
                let protected = if kind == PartKind::Car { None } else { self.scene.protected_car() };
                let enabled = self.scene.selected_items().any(|i| Some(i.id) != protected && i.kind != kind);
                KindAffordance { kind, mode: KindMode::Retype, enabled }
            } else {
                KindAffordance { kind, mode: KindMode::Add, enabled: self.scene.remaining_capacity() > 0 }
            }
        });

        let sole_car_selected = selection.len() == 1 && self.scene.protected_car().is_some();

        Affordances {
            kinds,
            delete_enabled: !selection.is_empty() && !sole_car_selected,
            remaining_capacity: self.scene.remaining_capacity(),
            grid_visible: retyping,
            can_load_import: self.ui.import_loadable,
        }
    }

    /// Selection, export, and redraw notifications after a scene edit.
    fn refreshed(&self) -> Vec<Action> {
        let mut actions = vec![Action::SelectionChanged(self.scene.selection().to_vec())];
        if let Some(text) = self.export_text() {
            actions.push(Action::ExportChanged(text));
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    fn selection_refreshed(&self) -> Vec<Action> {
        vec![Action::SelectionChanged(self.scene.selection().to_vec()), Action::RenderNeeded]
    }

    // --- Pointer ---

    /// Begin a drag on the item under the pointer, or a box selection on empty canvas.
    pub fn on_pointer_down(&mut self, pt: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        if button != Button::Primary || self.ui.import_open || !self.input.is_idle() {
            return Vec::new();
        }

        let Some(hit) = hit_test(&self.scene, pt) else {
            if !modifiers.shift {
                self.scene.clear_selection();
            }
            self.input =
                InputState::BoxSelecting { start: pt, current: pt, snapshot: self.scene.selection().to_vec() };
            return self.selection_refreshed();
        };

        if !self.scene.is_selected(&hit) {
            if modifiers.shift {
                self.scene.add_to_selection(hit);
            } else {
                self.scene.select_only(hit);
            }
        }
        self.scene.touch(&hit);

        let starts: Vec<DragStart> =
            self.scene.selected_items().map(|i| DragStart { id: i.id, center: i.center() }).collect();
        let group_origin = Point::new(
            starts.iter().map(|s| s.center.x).fold(f64::INFINITY, f64::min),
            starts.iter().map(|s| s.center.y).fold(f64::INFINITY, f64::min),
        );
        self.input = InputState::Dragging { group_origin, pointer_offset: pt - group_origin, starts };
        self.refreshed()
    }

    /// Continue the active gesture.
    pub fn on_pointer_move(&mut self, pt: Point, modifiers: Modifiers) -> Vec<Action> {
        match &mut self.input {
            InputState::Idle => Vec::new(),
            InputState::Dragging { group_origin, pointer_offset, starts } => {
                let mut target = pt - *pointer_offset;
                if modifiers.shift {
                    target = Point::new(snap_to(target.x, GRID_SIZE), snap_to(target.y, GRID_SIZE));
                }
                let raw = target - *group_origin;

                let group: Vec<(Pose, _)> = starts
                    .iter()
                    .filter_map(|s| {
                        let item = self.scene.get(&s.id)?;
                        Some((Pose { center: s.center, angle: item.angle }, item.size))
                    })
                    .collect();
                let delta = drag_clamp(&group, raw, self.config.canvas);

                for s in starts.iter() {
                    if let Some(item) = self.scene.get_mut(&s.id) {
                        item.x = s.center.x + delta.x;
                        item.y = s.center.y + delta.y;
                    }
                }
                self.refreshed()
            }
            InputState::BoxSelecting { start, current, snapshot } => {
                *current = pt;
                let area = Bounds::from_corners(*start, pt);
                let inside = items_in_box(&self.scene, area);
                self.scene.set_selection(snapshot.iter().copied().chain(inside));
                self.selection_refreshed()
            }
        }
    }

    /// End the active gesture. Always returns to idle.
    pub fn on_pointer_up(&mut self, _pt: Point, _button: Button, _modifiers: Modifiers) -> Vec<Action> {
        self.input = InputState::Idle;
        vec![Action::RenderNeeded]
    }

    /// A pointer press outside the canvas clears the selection.
    pub fn on_outside_pointer_down(&mut self) -> Vec<Action> {
        self.scene.clear_selection();
        self.selection_refreshed()
    }

    /// Rotate the selection one step; all-or-nothing.
    pub fn on_wheel(&mut self, _pt: Point, delta: WheelDelta, modifiers: Modifiers) -> Vec<Action> {
        if self.ui.import_open || self.scene.selection().is_empty() {
            return Vec::new();
        }
        let direction = RotateDirection::from_wheel(delta.dy);
        let step = rotation_step(modifiers.shift);
        let parts = self.scene.selected_poses();

        let Some(angles) = rotate_group(&parts, direction, step, self.config.canvas) else {
            tracing::debug!(count = parts.len(), "rotation rejected; a part would leave the canvas");
            return Vec::new();
        };

        let ids = self.scene.selection().to_vec();
        for (id, angle) in ids.iter().zip(angles) {
            if let Some(item) = self.scene.get_mut(id) {
                item.angle = angle;
            }
        }
        self.refreshed()
    }

    // --- Keyboard ---

    /// Dispatch a key press.
    pub fn on_key_down(&mut self, key: &Key, modifiers: Modifiers) -> Vec<Action> {
        if key.is("Escape") {
            if self.ui.import_open {
                return self.close_import();
            }
            self.scene.clear_selection();
            return self.selection_refreshed();
        }
        if self.ui.import_open {
            return Vec::new();
        }

        if key.is("Delete") || key.is("Backspace") {
            return self.delete_selected();
        }
        if modifiers.ctrl && key.is("a") {
            self.scene.select_all();
            return self.selection_refreshed();
        }
        if modifiers.ctrl && key.is("c") {
            self.copy_selection();
            return Vec::new();
        }
        if modifiers.ctrl && key.is("v") {
            return self.paste();
        }
        if let Some(direction) = key.nudge_direction() {
            return self.nudge(direction, modifiers);
        }
        Vec::new()
    }

    /// Move the whole selection by the largest safe distance up to one step.
    pub fn nudge(&mut self, direction: NudgeDirection, modifiers: Modifiers) -> Vec<Action> {
        if self.scene.selection().is_empty() {
            return Vec::new();
        }
        let step = nudge_step(modifiers.shift);
        let limit = nudge_limit(&self.scene.selected_poses(), direction, step, self.config.canvas);
        if limit <= 0.0 {
            tracing::debug!(?direction, "nudge blocked by canvas edge");
            return Vec::new();
        }

        let unit = direction.unit();
        let ids = self.scene.selection().to_vec();
        for id in &ids {
            if let Some(item) = self.scene.get_mut(id) {
                item.x += unit.x * limit;
                item.y += unit.y * limit;
            }
        }
        self.refreshed()
    }

    // --- Clipboard ---

    /// Snapshot the selected items. An empty selection leaves the clipboard alone.
    pub fn copy_selection(&mut self) {
        let copied: Vec<Item> = self.scene.selected_items().cloned().collect();
        if !copied.is_empty() {
            self.clipboard = Some(copied);
        }
    }

    /// Paste the clipboard if it fits; the copies become the selection.
    pub fn paste(&mut self) -> Vec<Action> {
        let Some(sources) = &self.clipboard else {
            return Vec::new();
        };
        if self.scene.paste(sources, self.config.canvas).is_empty() {
            return Vec::new();
        }
        self.refreshed()
    }

    /// Copy the export text to the clipboard and confirm.
    #[must_use]
    pub fn copy_export(&self) -> Vec<Action> {
        let Some(text) = self.export_text() else {
            return Vec::new();
        };
        vec![Action::CopyToClipboard(text), Action::Status(StatusNotice::new("Settings copied.", StatusLevel::Info))]
    }

    // --- Scene edits ---

    /// Kind button: retype the selection with the modifier held, otherwise add.
    pub fn apply_kind(&mut self, kind: PartKind, modifiers: Modifiers) -> Vec<Action> {
        if modifiers.shift && !self.scene.selection().is_empty() {
            self.retype_selected(kind)
        } else {
            self.add(kind)
        }
    }

    /// Add an upright part of `kind` at canvas center. No-op when full.
    pub fn add(&mut self, kind: PartKind) -> Vec<Action> {
        if self.scene.add(kind, self.config.footprint(kind), self.config.canvas.center()).is_none() {
            return Vec::new();
        }
        self.refreshed()
    }

    /// Retype every selected part to `kind`, sparing the protected car.
    pub fn retype_selected(&mut self, kind: PartKind) -> Vec<Action> {
        let protected = if kind == PartKind::Car { None } else { self.scene.protected_car() };
        let size = self.config.footprint(kind);
        let ids = self.scene.selection().to_vec();
        for id in ids.iter().filter(|id| Some(**id) != protected) {
            self.scene.retype(id, kind, size, self.config.canvas);
        }
        self.refreshed()
    }

    /// Delete the selection, sparing the protected car.
    pub fn delete_selected(&mut self) -> Vec<Action> {
        if self.scene.selection().is_empty() {
            return Vec::new();
        }
        self.scene.delete_selected();
        self.refreshed()
    }

    /// Reset to a single car at canvas center.
    pub fn clear(&mut self) -> Vec<Action> {
        self.input = InputState::Idle;
        self.scene.clear(self.config.footprint(PartKind::Car), self.config.canvas.center());
        self.refreshed()
    }

    // --- Import ---

    /// Show the import overlay with empty text.
    pub fn open_import(&mut self) -> Vec<Action> {
        self.ui.import_open = true;
        self.ui.import_text.clear();
        self.ui.import_loadable = false;
        vec![Action::ImportOverlay { open: true }]
    }

    /// Hide the import overlay.
    pub fn close_import(&mut self) -> Vec<Action> {
        self.ui.import_open = false;
        vec![Action::ImportOverlay { open: false }]
    }

    /// Replace the overlay text and revalidate. Returns whether it can be loaded.
    pub fn set_import_text(&mut self, text: &str) -> bool {
        text.clone_into(&mut self.ui.import_text);
        self.ui.import_loadable = transcode::is_loadable(text);
        self.ui.import_loadable
    }

    #[must_use]
    pub fn can_load_import(&self) -> bool {
        self.ui.import_loadable
    }

    /// Load the overlay text, close the overlay, and report the outcome.
    /// Does nothing while the text is invalid.
    pub fn load_import(&mut self) -> Vec<Action> {
        let text = self.ui.import_text.clone();
        match self.import_text(&text) {
            Ok(mut actions) => {
                let mut out = self.close_import();
                out.append(&mut actions);
                out
            }
            Err(e) => {
                tracing::debug!(error = %e, code = e.code(), "import not loadable");
                Vec::new()
            }
        }
    }

    /// Replace the scene with a parsed parameter text.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError`] if the text is not loadable; the scene is unchanged.
    pub fn import_text(&mut self, text: &str) -> Result<Vec<Action>, ImportError> {
        let layout = transcode::import(text, &self.config.footprints, self.config.canvas, &self.config.profile)?;
        Ok(self.apply_import(layout))
    }

    fn apply_import(&mut self, layout: ImportedLayout) -> Vec<Action> {
        let out_of_bounds = layout.out_of_bounds;
        let count = layout.items.len();
        self.input = InputState::Idle;
        self.scene.replace(layout.items);

        let notice = if out_of_bounds {
            tracing::warn!(count, "imported layout is out of bounds");
            StatusNotice::new("Import out of bounds.", StatusLevel::Warning)
        } else {
            tracing::info!(count, "layout imported");
            StatusNotice::new("Import successful.", StatusLevel::Success)
        };

        let mut actions = self.refreshed();
        actions.push(Action::Status(notice));
        actions
    }
}
