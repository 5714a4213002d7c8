//! Scene model: placed parts, the active selection, and the layering counter.
//!
//! Items are kept in insertion order; that order is what the export numbers
//! (`part01`, `part02`, ...). Draw and hit-test order are derived on demand in
//! [`crate::hit`] and never stored here.
//!
//! The selection holds item ids rather than positions, so deleting one item
//! never shifts another's membership.

#[cfg(test)]
#[path = "scene_test.rs"]
mod scene_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::CanvasSize;
use crate::constraint::place_or_center;
use crate::consts::{MAX_RECTS, PASTE_OFFSET};
use crate::geom::{Point, Pose, Size, world_corners};

/// Stable identifier for a placed item.
pub type ItemId = Uuid;

/// The kind of a placed part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartKind {
    /// The protected vehicle. A non-empty scene always keeps at least one.
    Car,
    Barricade,
    Spikes,
}

impl PartKind {
    pub const ALL: [Self; 3] = [Self::Car, Self::Barricade, Self::Spikes];

    /// Numeric code used by the parameter format.
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::Car => 1,
            Self::Barricade => 2,
            Self::Spikes => 3,
        }
    }

    /// Inverse of [`PartKind::code`].
    #[must_use]
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Car),
            2 => Some(Self::Barricade),
            3 => Some(Self::Spikes),
            _ => None,
        }
    }

    /// Layering priority; higher draws above lower regardless of layer.
    #[must_use]
    pub fn priority(self) -> u8 {
        match self {
            Self::Barricade => 3,
            Self::Car => 2,
            Self::Spikes => 1,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Car => "car",
            Self::Barricade => "barricade",
            Self::Spikes => "spikes",
        }
    }
}

/// One placed part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub kind: PartKind,
    /// Center of the rectangle in canvas pixels.
    pub x: f64,
    pub y: f64,
    /// Rotation about the center in radians.
    pub angle: f64,
    /// Footprint for `kind`, in canvas pixels.
    pub size: Size,
    /// Recency stamp; larger means touched more recently.
    pub layer: u64,
}

impl Item {
    /// Fresh item with a new id.
    #[must_use]
    pub fn new(kind: PartKind, pose: Pose, size: Size, layer: u64) -> Self {
        Self { id: Uuid::new_v4(), kind, x: pose.center.x, y: pose.center.y, angle: pose.angle, size, layer }
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x, self.y)
    }

    #[must_use]
    pub fn pose(&self) -> Pose {
        Pose::new(self.x, self.y, self.angle)
    }

    pub fn set_pose(&mut self, pose: Pose) {
        self.x = pose.center.x;
        self.y = pose.center.y;
        self.angle = pose.angle;
    }

    /// The four rotated corners in canvas space.
    #[must_use]
    pub fn corners(&self) -> [Point; 4] {
        world_corners(self.pose(), self.size)
    }
}

/// Ordered item list plus selection and layer counter.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    items: Vec<Item>,
    selection: Vec<ItemId>,
    layer_counter: u64,
}

impl Scene {
    /// An empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Queries ---

    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    #[must_use]
    pub fn get(&self, id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|i| i.id == *id)
    }

    pub fn get_mut(&mut self, id: &ItemId) -> Option<&mut Item> {
        self.items.iter_mut().find(|i| i.id == *id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// How many more items fit before [`MAX_RECTS`].
    #[must_use]
    pub fn remaining_capacity(&self) -> usize {
        MAX_RECTS.saturating_sub(self.items.len())
    }

    #[must_use]
    pub fn layer_counter(&self) -> u64 {
        self.layer_counter
    }

    /// Ids of every car, in insertion order.
    #[must_use]
    pub fn car_ids(&self) -> Vec<ItemId> {
        self.items.iter().filter(|i| i.kind == PartKind::Car).map(|i| i.id).collect()
    }

    /// The car that must survive a delete or retype of the current selection.
    #[must_use]
    pub fn protected_car(&self) -> Option<ItemId> {
        self.protected_in(&self.selection)
    }

    /// The car that must survive removing `ids` from the scene.
    ///
    /// When `ids` covers every car in the scene, the first car listed is
    /// protected. Otherwise some car outside `ids` survives anyway, and
    /// nothing needs protecting.
    #[must_use]
    pub fn protected_in(&self, ids: &[ItemId]) -> Option<ItemId> {
        let all_cars = self.car_ids();
        let listed_cars: Vec<ItemId> = ids
            .iter()
            .filter_map(|id| self.get(id))
            .filter(|i| i.kind == PartKind::Car)
            .map(|i| i.id)
            .collect();
        if !all_cars.is_empty() && all_cars.iter().all(|c| listed_cars.contains(c)) {
            listed_cars.first().copied()
        } else {
            None
        }
    }

    // --- Selection ---

    /// Selected ids, in the order they were selected.
    #[must_use]
    pub fn selection(&self) -> &[ItemId] {
        &self.selection
    }

    #[must_use]
    pub fn is_selected(&self, id: &ItemId) -> bool {
        self.selection.contains(id)
    }

    /// Selected items, in selection order.
    pub fn selected_items(&self) -> impl Iterator<Item = &Item> {
        self.selection.iter().filter_map(|id| self.get(id))
    }

    /// `(pose, footprint)` of each selected item, in selection order.
    #[must_use]
    pub fn selected_poses(&self) -> Vec<(Pose, Size)> {
        self.selected_items().map(|i| (i.pose(), i.size)).collect()
    }

    /// Replace the selection with ids from `ids` that exist, dropping duplicates.
    pub fn set_selection<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = ItemId>,
    {
        self.selection.clear();
        for id in ids {
            if self.get(&id).is_some() && !self.selection.contains(&id) {
                self.selection.push(id);
            }
        }
    }

    /// Select exactly `id`.
    pub fn select_only(&mut self, id: ItemId) {
        self.set_selection([id]);
    }

    /// Add `id` to the selection if it is not already there.
    pub fn add_to_selection(&mut self, id: ItemId) {
        if self.get(&id).is_some() && !self.selection.contains(&id) {
            self.selection.push(id);
        }
    }

    pub fn select_all(&mut self) {
        self.selection = self.items.iter().map(|i| i.id).collect();
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    // --- Mutations ---

    fn next_layer(&mut self) -> u64 {
        self.layer_counter += 1;
        self.layer_counter
    }

    /// Add an item of `kind` at `center`, upright, and make it the selection.
    ///
    /// Returns `None` without changing anything when the scene is full.
    pub fn add(&mut self, kind: PartKind, size: Size, center: Point) -> Option<ItemId> {
        if self.items.len() >= MAX_RECTS {
            tracing::debug!(kind = kind.label(), "add ignored; scene full");
            return None;
        }
        let layer = self.next_layer();
        let item = Item::new(kind, Pose { center, angle: 0.0 }, size, layer);
        let id = item.id;
        self.items.push(item);
        self.selection = vec![id];
        Some(id)
    }

    /// Change `id` to `kind`, recentering it if the new footprint no longer fits.
    ///
    /// Returns false if the item does not exist.
    pub fn retype(&mut self, id: &ItemId, kind: PartKind, size: Size, canvas: CanvasSize) -> bool {
        let Some(item) = self.get_mut(id) else {
            return false;
        };
        item.kind = kind;
        item.size = size;
        let pose = place_or_center(item.pose(), size, canvas);
        item.set_pose(pose);
        true
    }

    /// Move `id` to the front of its kind's layer band.
    pub fn touch(&mut self, id: &ItemId) {
        if self.get(id).is_none() {
            return;
        }
        let layer = self.next_layer();
        if let Some(item) = self.get_mut(id) {
            item.layer = layer;
        }
    }

    /// Delete `ids`, sparing the last car if `ids` would remove every car.
    ///
    /// Afterwards the selection is the last remaining item, if any. Returns the
    /// number of items removed.
    pub fn delete(&mut self, ids: &[ItemId]) -> usize {
        if ids.is_empty() {
            return 0;
        }
        let protected = self.protected_in(ids);
        if let Some(car) = protected {
            tracing::debug!(%car, "sole car kept out of delete");
        }
        let before = self.items.len();
        self.items.retain(|i| Some(i.id) == protected || !ids.contains(&i.id));
        self.selection = self.items.last().map(|i| vec![i.id]).unwrap_or_default();
        before - self.items.len()
    }

    /// [`Scene::delete`] applied to the current selection.
    pub fn delete_selected(&mut self) -> usize {
        let ids = self.selection.clone();
        self.delete(&ids)
    }

    /// Append copies of `sources`, each offset by [`PASTE_OFFSET`] and
    /// recentered if that pose would leave the canvas. The copies become the
    /// selection.
    ///
    /// Does nothing and returns an empty list when the copies would not fit.
    pub fn paste(&mut self, sources: &[Item], canvas: CanvasSize) -> Vec<ItemId> {
        if sources.is_empty() || self.items.len() + sources.len() > MAX_RECTS {
            tracing::debug!(count = sources.len(), len = self.items.len(), "paste ignored; not enough room");
            return Vec::new();
        }
        let mut pasted = Vec::with_capacity(sources.len());
        for src in sources {
            let layer = self.next_layer();
            let shifted = Pose::new(src.x + PASTE_OFFSET, src.y + PASTE_OFFSET, src.angle);
            let pose = place_or_center(shifted, src.size, canvas);
            let item = Item::new(src.kind, pose, src.size, layer);
            pasted.push(item.id);
            self.items.push(item);
        }
        self.selection.clone_from(&pasted);
        pasted
    }

    /// Empty the scene, reset the layer counter, and add one car at `center`.
    pub fn clear(&mut self, car_size: Size, center: Point) -> Option<ItemId> {
        self.items.clear();
        self.selection.clear();
        self.layer_counter = 0;
        self.add(PartKind::Car, car_size, center)
    }

    /// Replace all items with `items`. The selection is cleared and the layer
    /// counter restarts at the number of items loaded.
    pub fn replace(&mut self, items: Vec<Item>) {
        self.layer_counter = items.len() as u64;
        self.items = items;
        self.selection.clear();
    }
}
