//! Derived ordering and spatial queries over a scene.
//!
//! Draw order sorts by `(kind priority, layer)` ascending, so barricades sit
//! above cars and cars above spikes, with recently touched items on top within
//! a kind. Hit order is the exact reverse, so the first hit is the frontmost.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::geom::{Bounds, Point, point_in_rotated_rect};
use crate::scene::{Item, ItemId, Scene};

/// Items bottom-first, in the order they should be drawn.
#[must_use]
pub fn draw_order(scene: &Scene) -> Vec<&Item> {
    let mut items: Vec<&Item> = scene.items().iter().collect();
    items.sort_by(|a, b| a.kind.priority().cmp(&b.kind.priority()).then_with(|| a.layer.cmp(&b.layer)));
    items
}

/// Items front-first, in the order they should be hit-tested.
#[must_use]
pub fn hit_order(scene: &Scene) -> Vec<&Item> {
    let mut items: Vec<&Item> = scene.items().iter().collect();
    items.sort_by(|a, b| b.kind.priority().cmp(&a.kind.priority()).then_with(|| b.layer.cmp(&a.layer)));
    items
}

/// The frontmost item whose rectangle contains `point`, if any.
#[must_use]
pub fn hit_test(scene: &Scene, point: Point) -> Option<ItemId> {
    hit_order(scene)
        .into_iter()
        .find(|item| point_in_rotated_rect(point, item.pose(), item.size))
        .map(|item| item.id)
}

/// Ids of items whose center lies in `area` (edges inclusive), in insertion order.
#[must_use]
pub fn items_in_box(scene: &Scene, area: Bounds) -> Vec<ItemId> {
    scene.items().iter().filter(|i| area.contains(i.center())).map(|i| i.id).collect()
}

/// Tight box around every item's rotated corners, or `None` for an empty scene.
#[must_use]
pub fn scene_bounds(items: &[Item]) -> Option<Bounds> {
    Bounds::enclosing(items.iter().flat_map(Item::corners))
}
