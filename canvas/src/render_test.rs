use super::*;

fn size_of(kind: PartKind) -> Size {
    match kind {
        PartKind::Car => Size::new(48.0, 100.0),
        PartKind::Barricade => Size::new(140.0, 30.0),
        PartKind::Spikes => Size::new(160.0, 16.0),
    }
}

fn canvas() -> CanvasSize {
    CanvasSize::new(700.0, 450.0)
}

fn make_scene() -> (Scene, ItemId, ItemId) {
    let mut scene = Scene::new();
    let car = scene.add(PartKind::Car, size_of(PartKind::Car), Point::new(300.0, 200.0)).unwrap();
    let bar = scene.add(PartKind::Barricade, size_of(PartKind::Barricade), Point::new(400.0, 300.0)).unwrap();
    (scene, car, bar)
}

#[test]
fn sprites_follow_draw_order_and_flag_selection() {
    let (mut scene, car, bar) = make_scene();
    let spikes = scene.add(PartKind::Spikes, size_of(PartKind::Spikes), Point::new(200.0, 100.0)).unwrap();
    let list = draw_list(&scene, &InputState::Idle, canvas(), Modifiers::default());
    let order: Vec<(ItemId, bool)> = list.sprites.iter().map(|s| (s.id, s.selected)).collect();
    assert_eq!(order, vec![(spikes, true), (car, false), (bar, false)]);
}

#[test]
fn grid_needs_modifier_and_selection() {
    let (mut scene, _, _) = make_scene();
    let shift = Modifiers::shift_only();
    let list = draw_list(&scene, &InputState::Idle, canvas(), shift);
    assert_eq!(list.grid, Some(Grid { spacing: 10.0, width: 700.0, height: 450.0 }));

    scene.clear_selection();
    assert!(draw_list(&scene, &InputState::Idle, canvas(), shift).grid.is_none());
}

#[test]
fn selection_box_only_while_box_selecting() {
    let (scene, _, _) = make_scene();
    assert!(draw_list(&scene, &InputState::Idle, canvas(), Modifiers::default()).selection_box.is_none());

    let input = InputState::BoxSelecting {
        start: Point::new(10.0, 10.0),
        current: Point::new(60.0, 40.0),
        snapshot: Vec::new(),
    };
    let list = draw_list(&scene, &input, canvas(), Modifiers::default());
    assert_eq!(list.selection_box, Some(Bounds::from_corners(Point::new(10.0, 10.0), Point::new(60.0, 40.0))));
}

#[test]
fn layout_bounds_and_center_marker() {
    let (scene, _, _) = make_scene();
    let list = draw_list(&scene, &InputState::Idle, canvas(), Modifiers::default());
    let b = list.layout_bounds.unwrap();
    assert_eq!(b, Bounds { min_x: 276.0, min_y: 150.0, max_x: 470.0, max_y: 315.0 });
    assert_eq!(list.center_marker, Some(b.center()));
}

#[test]
fn single_item_has_bounds_but_no_marker() {
    let mut scene = Scene::new();
    scene.add(PartKind::Car, size_of(PartKind::Car), Point::new(300.0, 200.0));
    let list = draw_list(&scene, &InputState::Idle, canvas(), Modifiers::default());
    assert!(list.layout_bounds.is_some());
    assert!(list.center_marker.is_none());
}

#[test]
fn empty_scene_draws_nothing() {
    let list = draw_list(&Scene::new(), &InputState::Idle, canvas(), Modifiers::shift_only());
    assert_eq!(list, DrawList::default());
}
