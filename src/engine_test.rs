#![allow(clippy::float_cmp)]

use std::cell::Cell;
use std::rc::Rc;

use super::*;
use crate::represent::RepresentError;

// =============================================================
// Helpers
// =============================================================

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn press(core: &mut EngineCore, x: f64, y: f64) -> Vec<Action> {
    core.on_pointer_down(pt(x, y), Button::Primary)
}

fn right_press(core: &mut EngineCore) -> Vec<Action> {
    core.on_pointer_down(pt(0.0, 0.0), Button::Secondary)
}

fn release(core: &mut EngineCore) -> Vec<Action> {
    core.on_pointer_up(pt(0.0, 0.0), Button::Primary)
}

/// Draw a finished shape through the given points.
fn draw(core: &mut EngineCore, points: &[(f64, f64)]) -> ShapeId {
    for &(x, y) in points {
        press(core, x, y);
    }
    let id = core.active_shape().unwrap();
    right_press(core);
    id
}

fn renders(actions: &[Action]) -> bool {
    actions.contains(&Action::RenderNeeded)
}

fn assert_exclusive(core: &EngineCore) {
    assert!(!(core.active_shape().is_some() && core.hit().is_some()));
}

fn counting_engine() -> (Engine, Rc<Cell<usize>>) {
    let count = Rc::new(Cell::new(0));
    let seen = Rc::clone(&count);
    let engine = Engine::new(EngineCore::new(), Box::new(move || seen.set(seen.get() + 1)));
    (engine, count)
}

// =============================================================
// Construction
// =============================================================

#[test]
fn new_core_defaults() {
    let core = EngineCore::new();
    assert_eq!(core.mode(), Mode::Create);
    assert!(core.shapes().is_empty());
    assert!(core.active_shape().is_none());
    assert!(core.hit().is_none());
    assert_eq!(core.ui.point_type, PointType::G4);
    assert_eq!(core.ui.hit_threshold_squared, 49.0);
    assert_eq!(core.width, 600.0);
    assert_eq!(core.height, 600.0);
}

#[test]
fn with_config_applies_defaults() {
    let config = EditorConfig {
        point_type: PointType::Corner,
        is_closed: true,
        is_tagged: true,
        width: 320.0,
        height: 240.0,
        ..EditorConfig::default()
    };
    let mut core = EngineCore::with_config(&config, Box::new(PolylineRepresenter));
    assert_eq!(core.width, 320.0);
    press(&mut core, 10.0, 10.0);
    let shape = core.shape(core.active_shape().unwrap()).unwrap();
    assert!(shape.is_closed);
    assert!(shape.is_tagged);
    assert_eq!(shape.points()[0].kind, PointType::Corner);
}

// =============================================================
// Drawing with the primary button
// =============================================================

#[test]
fn first_press_starts_shape() {
    let mut core = EngineCore::new();
    let actions = press(&mut core, 100.0, 100.0);
    let id = core.active_shape().unwrap();
    assert_eq!(
        actions,
        vec![
            Action::ShapeStarted { id },
            Action::PointAdded { shape_id: id, index: 0 },
            Action::RenderNeeded,
        ]
    );
    assert_eq!(core.shapes().len(), 1);
    assert_eq!(core.shape(id).unwrap().points()[0], ControlPoint::new(100.0, 100.0, PointType::G4));
}

#[test]
fn later_presses_append_to_active_shape() {
    let mut core = EngineCore::new();
    press(&mut core, 100.0, 100.0);
    let id = core.active_shape().unwrap();
    let actions = press(&mut core, 200.0, 100.0);
    assert_eq!(actions, vec![Action::PointAdded { shape_id: id, index: 1 }, Action::RenderNeeded]);
    assert_eq!(core.shapes().len(), 1);
    assert_eq!(core.shape(id).unwrap().len(), 2);
}

#[test]
fn press_near_own_point_while_drawing_appends() {
    let mut core = EngineCore::new();
    press(&mut core, 100.0, 100.0);
    press(&mut core, 101.0, 101.0);
    assert_eq!(core.shape(core.active_shape().unwrap()).unwrap().len(), 2);
    assert!(core.hit().is_none());
}

#[test]
fn representation_refreshed_after_second_point() {
    let mut core = EngineCore::new();
    press(&mut core, 0.0, 0.0);
    let id = core.active_shape().unwrap();
    assert!(core.representation(id).is_none());
    press(&mut core, 50.0, 50.0);
    assert!(core.representation(id).is_some());
}

#[test]
fn press_in_mode_none_does_nothing() {
    let mut core = EngineCore::new();
    core.ui.mode = Mode::None;
    let actions = press(&mut core, 10.0, 10.0);
    assert!(actions.is_empty());
    assert!(core.shapes().is_empty());
}

// =============================================================
// Secondary button
// =============================================================

#[test]
fn right_press_finishes_active_shape() {
    let mut core = EngineCore::new();
    press(&mut core, 0.0, 0.0);
    press(&mut core, 50.0, 0.0);
    let id = core.active_shape().unwrap();
    let actions = right_press(&mut core);
    assert_eq!(actions, vec![Action::ShapeFinished { id }, Action::RenderNeeded]);
    assert!(core.active_shape().is_none());
    assert!(core.shape(id).is_some());
    assert!(core.representation(id).is_some());
}

#[test]
fn right_press_with_nothing_is_noop() {
    let mut core = EngineCore::new();
    let actions = right_press(&mut core);
    assert!(actions.is_empty());
    assert_eq!(core.mode(), Mode::Create);
    assert!(core.shapes().is_empty());
}

#[test]
fn right_press_clears_hit_target() {
    let mut core = EngineCore::new();
    draw(&mut core, &[(0.0, 0.0), (100.0, 0.0)]);
    press(&mut core, 1.0, 1.0);
    assert_eq!(core.mode(), Mode::Move);
    let actions = right_press(&mut core);
    assert_eq!(actions, vec![Action::HitChanged(None), Action::RenderNeeded]);
    assert!(core.hit().is_none());
    assert_eq!(core.mode(), Mode::Create);
}

#[test]
fn next_press_after_finish_starts_new_shape() {
    let mut core = EngineCore::new();
    let first = draw(&mut core, &[(0.0, 0.0), (100.0, 0.0)]);
    press(&mut core, 300.0, 300.0);
    let second = core.active_shape().unwrap();
    assert_ne!(first, second);
    assert_eq!(core.shapes().len(), 2);
}

// =============================================================
// Hit targets and moving points
// =============================================================

#[test]
fn press_on_existing_point_enters_move() {
    let mut core = EngineCore::new();
    let id = draw(&mut core, &[(0.0, 0.0), (100.0, 0.0)]);
    let actions = press(&mut core, 99.0, 1.0);
    let hit = Hit { shape_id: id, point_index: 1 };
    assert_eq!(actions, vec![Action::HitChanged(Some(hit)), Action::RenderNeeded]);
    assert_eq!(core.mode(), Mode::Move);
    assert_eq!(core.hit(), Some(hit));
    assert_eq!(core.shape(id).unwrap().len(), 2);
}

#[test]
fn press_at_threshold_distance_misses() {
    let mut core = EngineCore::new();
    draw(&mut core, &[(0.0, 0.0), (100.0, 0.0)]);
    press(&mut core, 7.0, 0.0);
    assert!(core.hit().is_none());
    assert!(core.active_shape().is_some());
}

#[test]
fn drag_moves_hit_point_then_release_selects() {
    let mut core = EngineCore::new();
    let id = draw(&mut core, &[(0.0, 0.0), (100.0, 0.0)]);
    press(&mut core, 100.0, 0.0);
    let actions = core.on_pointer_move(pt(150.0, 40.0));
    assert_eq!(actions, vec![Action::PointMoved { shape_id: id, index: 1 }, Action::RenderNeeded]);
    let moved = core.shape(id).unwrap().points()[1];
    assert_eq!((moved.x, moved.y), (150.0, 40.0));
    assert_eq!(moved.kind, PointType::G4);

    assert!(release(&mut core).is_empty());
    assert_eq!(core.mode(), Mode::Selected);
    assert!(core.hit().is_some());
}

#[test]
fn move_refreshes_representation() {
    let mut core = EngineCore::new();
    let id = draw(&mut core, &[(0.0, 0.0), (100.0, 0.0)]);
    let before = core.representation(id).unwrap().to_owned();
    press(&mut core, 100.0, 0.0);
    core.on_pointer_move(pt(100.0, 80.0));
    assert_ne!(core.representation(id).unwrap(), before);
}

#[test]
fn selected_mode_ignores_moves() {
    let mut core = EngineCore::new();
    let id = draw(&mut core, &[(0.0, 0.0), (100.0, 0.0)]);
    press(&mut core, 0.0, 0.0);
    release(&mut core);
    assert!(core.on_pointer_move(pt(300.0, 300.0)).is_empty());
    assert_eq!(core.shape(id).unwrap().points()[0].x, 0.0);
}

#[test]
fn press_on_empty_canvas_clears_selection() {
    let mut core = EngineCore::new();
    draw(&mut core, &[(0.0, 0.0), (100.0, 0.0)]);
    press(&mut core, 0.0, 0.0);
    release(&mut core);
    let actions = press(&mut core, 400.0, 400.0);
    assert_eq!(actions, vec![Action::HitChanged(None), Action::RenderNeeded]);
    assert_eq!(core.mode(), Mode::Create);
    assert!(core.active_shape().is_none());
    assert_eq!(core.shapes().len(), 1);
}

#[test]
fn release_outside_move_is_noop() {
    let mut core = EngineCore::new();
    assert!(release(&mut core).is_empty());
    assert_eq!(core.mode(), Mode::Create);
}

#[test]
fn first_match_wins_over_nearest() {
    let mut core = EngineCore::new();
    let first = draw(&mut core, &[(0.0, 0.0), (100.0, 0.0)]);
    core.execute_script("v 200 0\nv 4 0\n").unwrap();
    // (4, 0) is nearer the press, but its shape was drawn later.
    press(&mut core, 3.0, 0.0);
    assert_eq!(core.hit(), Some(Hit { shape_id: first, point_index: 0 }));
}

#[test]
fn hit_on_removed_shape_is_ignored() {
    let mut core = EngineCore::new();
    draw(&mut core, &[(0.0, 0.0), (100.0, 0.0)]);
    press(&mut core, 0.0, 0.0);
    core.doc.clear();
    assert!(core.hit().is_none());
    assert!(core.on_pointer_move(pt(10.0, 10.0)).is_empty());
}

// =============================================================
// Hover in Create mode
// =============================================================

#[test]
fn hover_sets_and_clears_hit_target() {
    let mut core = EngineCore::new();
    let id = draw(&mut core, &[(0.0, 0.0), (100.0, 0.0)]);

    let actions = core.on_pointer_move(pt(2.0, 2.0));
    let hit = Hit { shape_id: id, point_index: 0 };
    assert_eq!(actions, vec![Action::HitChanged(Some(hit)), Action::RenderNeeded]);
    assert_eq!(core.hit(), Some(hit));
    assert_eq!(core.mode(), Mode::Create);

    let actions = core.on_pointer_move(pt(3.0, 3.0));
    assert_eq!(actions, vec![Action::RenderNeeded]);

    let actions = core.on_pointer_move(pt(50.0, 50.0));
    assert_eq!(actions, vec![Action::HitChanged(None), Action::RenderNeeded]);
    assert!(core.hit().is_none());
}

#[test]
fn hover_on_empty_canvas_still_renders() {
    let mut core = EngineCore::new();
    assert!(renders(&core.on_pointer_move(pt(10.0, 10.0))));
}

// =============================================================
// Drag preview while drawing
// =============================================================

#[test]
fn move_with_single_point_does_not_mutate() {
    let mut core = EngineCore::new();
    press(&mut core, 10.0, 10.0);
    let id = core.active_shape().unwrap();
    assert!(core.on_pointer_move(pt(50.0, 50.0)).is_empty());
    assert_eq!(core.shape(id).unwrap().points()[0], ControlPoint::new(10.0, 10.0, PointType::G4));
}

#[test]
fn move_with_two_points_updates_last() {
    let mut core = EngineCore::new();
    press(&mut core, 10.0, 10.0);
    press(&mut core, 20.0, 20.0);
    let id = core.active_shape().unwrap();
    let actions = core.on_pointer_move(pt(60.0, 70.0));
    assert_eq!(actions, vec![Action::PointMoved { shape_id: id, index: 1 }, Action::RenderNeeded]);
    let shape = core.shape(id).unwrap();
    assert_eq!(shape.points()[0], ControlPoint::new(10.0, 10.0, PointType::G4));
    assert_eq!(shape.points()[1], ControlPoint::new(60.0, 70.0, PointType::G4));
}

#[test]
fn drawing_does_not_hover() {
    let mut core = EngineCore::new();
    draw(&mut core, &[(0.0, 0.0), (100.0, 0.0)]);
    press(&mut core, 300.0, 300.0);
    core.on_pointer_move(pt(0.0, 0.0));
    assert!(core.hit().is_none());
    assert_exclusive(&core);
}

// =============================================================
// Toggles and point type
// =============================================================

#[test]
fn toggle_closed_without_active_shape_only_flips_default() {
    let mut core = EngineCore::new();
    assert!(core.toggle_closed().is_empty());
    assert!(core.ui.is_closed);
    press(&mut core, 0.0, 0.0);
    assert!(core.shape(core.active_shape().unwrap()).unwrap().is_closed);
}

#[test]
fn toggle_closed_applies_to_active_shape() {
    let mut core = EngineCore::new();
    press(&mut core, 0.0, 0.0);
    press(&mut core, 50.0, 0.0);
    press(&mut core, 50.0, 50.0);
    let id = core.active_shape().unwrap();
    let actions = core.toggle_closed();
    assert_eq!(actions, vec![Action::RenderNeeded]);
    assert!(core.shape(id).unwrap().is_closed);
    assert!(core.representation(id).unwrap().ends_with('Z'));
}

#[test]
fn toggle_tagged_applies_to_active_shape() {
    let mut core = EngineCore::new();
    press(&mut core, 0.0, 0.0);
    let id = core.active_shape().unwrap();
    assert!(renders(&core.toggle_tagged()));
    assert!(core.shape(id).unwrap().is_tagged);
    core.toggle_tagged();
    assert!(!core.shape(id).unwrap().is_tagged);
    assert!(!core.ui.is_tagged);
}

#[test]
fn toggles_leave_finished_shapes_alone() {
    let mut core = EngineCore::new();
    let id = draw(&mut core, &[(0.0, 0.0), (100.0, 0.0)]);
    core.toggle_closed();
    core.toggle_tagged();
    let shape = core.shape(id).unwrap();
    assert!(!shape.is_closed);
    assert!(!shape.is_tagged);
}

#[test]
fn set_point_type_retypes_last_point() {
    let mut core = EngineCore::new();
    press(&mut core, 0.0, 0.0);
    press(&mut core, 10.0, 0.0);
    let id = core.active_shape().unwrap();
    assert_eq!(core.set_point_type(PointType::Corner), vec![Action::RenderNeeded]);
    let shape = core.shape(id).unwrap();
    assert_eq!(shape.points()[0].kind, PointType::G4);
    assert_eq!(shape.points()[1], ControlPoint::new(10.0, 0.0, PointType::Corner));

    press(&mut core, 20.0, 0.0);
    assert_eq!(core.shape(id).unwrap().points()[2].kind, PointType::Corner);
}

#[test]
fn set_point_type_without_active_shape_still_renders() {
    let mut core = EngineCore::new();
    assert_eq!(core.set_point_type(PointType::Left), vec![Action::RenderNeeded]);
    assert_eq!(core.ui.point_type, PointType::Left);
}

// =============================================================
// Scripts
// =============================================================

#[test]
fn script_commits_shapes_with_representations() {
    let mut core = EngineCore::new();
    let actions = core.execute_script("v 0 0\no 10 10\nz\n").unwrap();
    assert_eq!(core.shapes().len(), 2);
    let finished = &core.shapes()[0];
    assert_eq!(
        finished.points(),
        &[
            ControlPoint::new(0.0, 0.0, PointType::Corner),
            ControlPoint::new(10.0, 10.0, PointType::G4),
            ControlPoint::new(0.0, 0.0, PointType::End),
        ]
    );
    assert!(finished.is_tagged);
    assert!(!finished.is_closed);
    assert!(core.representation(finished.id()).is_some());
    assert!(core.representation(core.shapes()[1].id()).is_none());
    assert_eq!(actions.iter().filter(|a| matches!(a, Action::ShapeCommitted { .. })).count(), 2);
    assert!(renders(&actions));
}

#[test]
fn script_failure_keeps_earlier_shapes() {
    let mut core = EngineCore::new();
    let err = core.execute_script("v 0 0\nz\nq 1 1\n").unwrap_err();
    assert!(matches!(err, ScriptError::UnknownCommand { line: 3, command: 'q' }));
    assert_eq!(core.shapes().len(), 1);
    assert!(core.shapes()[0].is_tagged);
}

#[test]
fn empty_script_changes_nothing() {
    let mut core = EngineCore::new();
    assert!(core.execute_script("").unwrap().is_empty());
    assert!(core.shapes().is_empty());
}

#[test]
fn script_appends_after_drawn_shapes() {
    let mut core = EngineCore::new();
    let drawn = draw(&mut core, &[(0.0, 0.0), (100.0, 0.0)]);
    core.execute_script("v 1 1\nv 2 2\n").unwrap();
    assert_eq!(core.shapes()[0].id(), drawn);
    assert_eq!(core.shapes()[1].len(), 2);
    assert!(!core.shapes()[1].is_tagged);
}

#[test]
fn representation_failures_are_cached_as_absent() {
    let failing = |_: &Shape| -> Result<String, RepresentError> { Err(RepresentError::Failed("no fit".into())) };
    let mut core = EngineCore::with_config(&EditorConfig::default(), Box::new(failing));
    core.execute_script("v 0 0\nv 10 0\nz\n").unwrap();
    let id = core.shapes()[0].id();
    assert!(core.cache.contains(id));
    assert!(core.representation(id).is_none());
}

// =============================================================
// Drawings
// =============================================================

#[test]
fn new_drawing_resets_everything_but_size() {
    let mut core = EngineCore::new();
    core.width = 800.0;
    draw(&mut core, &[(0.0, 0.0), (100.0, 0.0)]);
    press(&mut core, 0.0, 0.0);
    let actions = core.new_drawing();
    assert_eq!(actions, vec![Action::DrawingReplaced, Action::RenderNeeded]);
    assert!(core.shapes().is_empty());
    assert!(core.cache.is_empty());
    assert!(core.hit().is_none());
    assert_eq!(core.mode(), Mode::Create);
    assert_eq!(core.width, 800.0);
}

#[test]
fn load_drawing_rebuilds_cache_with_fresh_ids() {
    let mut source = EngineCore::new();
    source.execute_script("v 0 0\nv 10 10\nz\n").unwrap();
    let drawing = source.export_drawing();
    let old_id = drawing.shapes[0].id();

    let mut core = EngineCore::new();
    press(&mut core, 500.0, 500.0);
    let actions = core.load_drawing(Drawing { width: 1024.0, height: 768.0, ..drawing });
    assert!(renders(&actions));
    assert_eq!(core.width, 1024.0);
    assert_eq!(core.height, 768.0);
    assert_eq!(core.shapes().len(), 2);
    assert!(core.active_shape().is_none());
    let loaded = core.shapes()[0].id();
    assert_ne!(loaded, old_id);
    assert!(core.representation(loaded).is_some());
    assert_eq!(core.cache.len(), 2);
}

#[test]
fn export_drawing_snapshots_state() {
    let mut core = EngineCore::new();
    draw(&mut core, &[(0.0, 0.0), (100.0, 0.0)]);
    let drawing = core.export_drawing();
    assert_eq!(drawing.width, 600.0);
    assert_eq!(drawing.shapes.len(), 1);
    assert_eq!(drawing.shapes[0].points(), core.shapes()[0].points());
}

#[test]
fn export_svg_contains_each_representable_shape() {
    let mut core = EngineCore::new();
    draw(&mut core, &[(0.0, 0.0), (100.0, 0.0)]);
    draw(&mut core, &[(200.0, 200.0), (300.0, 200.0)]);
    let svg = core.export_svg();
    assert_eq!(svg.matches("<path").count(), 2);
}

// =============================================================
// Exclusivity across a session
// =============================================================

#[test]
fn active_shape_and_hit_never_coexist() {
    let mut core = EngineCore::new();
    assert_exclusive(&core);
    press(&mut core, 0.0, 0.0);
    assert_exclusive(&core);
    press(&mut core, 100.0, 0.0);
    core.on_pointer_move(pt(100.0, 10.0));
    assert_exclusive(&core);
    right_press(&mut core);
    core.on_pointer_move(pt(1.0, 1.0));
    assert_exclusive(&core);
    press(&mut core, 1.0, 1.0);
    assert_exclusive(&core);
    core.on_pointer_move(pt(20.0, 20.0));
    release(&mut core);
    assert_exclusive(&core);
    press(&mut core, 400.0, 400.0);
    press(&mut core, 420.0, 400.0);
    assert_exclusive(&core);
}

// =============================================================
// Engine callback
// =============================================================

#[test]
fn engine_invalidates_once_per_render() {
    let (mut engine, count) = counting_engine();
    engine.on_pointer_down(pt(0.0, 0.0), Button::Primary);
    assert_eq!(count.get(), 1);
    engine.on_pointer_down(pt(50.0, 0.0), Button::Primary);
    assert_eq!(count.get(), 2);
}

#[test]
fn engine_skips_callback_without_render() {
    let (mut engine, count) = counting_engine();
    engine.on_pointer_down(pt(0.0, 0.0), Button::Secondary);
    engine.on_pointer_up(pt(0.0, 0.0), Button::Primary);
    engine.toggle_closed();
    assert_eq!(count.get(), 0);
}

#[test]
fn engine_invalidates_on_partial_script() {
    let (mut engine, count) = counting_engine();
    assert!(engine.execute_script("v 0 0\nz\nq 1 1\n").is_err());
    assert_eq!(count.get(), 1);
    assert!(engine.execute_script("q 1 1\n").is_err());
    assert_eq!(count.get(), 1);
}

#[test]
fn engine_invalidates_on_load_and_new() {
    let (mut engine, count) = counting_engine();
    engine.load_drawing(Drawing::default());
    engine.new_drawing();
    assert_eq!(count.get(), 2);
    assert!(engine.export_drawing().shapes.is_empty());
}
