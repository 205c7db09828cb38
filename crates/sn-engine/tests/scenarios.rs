use std::sync::Arc;
use std::time::Duration;

use glam::{Vec2, Vec3};
use parking_lot::Mutex;
use sn_camera::{BrowseTransition, CameraRig, CameraTransition};
use sn_core::events::events::{
    ActiveItemChanged, BrowseModeChanged, CameraSettled, LayoutChanged, SectionExitHidden,
    SectionExitShown,
};
use sn_core::{Category, ControlType, Direction, NavigationMode, Side};
use sn_engine::{EngineConfig, EngineError, SpatialEngine};
use sn_input::{Key, KeyInput, NavOutcome, PointerInput, PointerPhase, WheelAction, WheelInput};
use sn_layout::LayoutError;

fn content(sizes: &[usize]) -> Vec<Category<String>> {
    sizes
        .iter()
        .enumerate()
        .map(|(c, &n)| {
            Category::new(format!("cat{}", c))
                .with_title(format!("Category {}", c))
                .with_items((0..n).map(|i| format!("{}-{}", c, i)))
        })
        .collect()
}

fn engine_with(config: EngineConfig, sizes: &[usize]) -> SpatialEngine<String> {
    let mut engine = SpatialEngine::new(config).expect("engine");
    engine.load_content(&content(sizes));
    engine
}

fn engine(sizes: &[usize]) -> SpatialEngine<String> {
    engine_with(EngineConfig::default(), sizes)
}

fn settle(engine: &mut SpatialEngine<String>) {
    for _ in 0..1200 {
        engine.tick(1.0 / 60.0);
    }
}

fn active(engine: &SpatialEngine<String>) -> Option<usize> {
    engine.active_item().map(|item| item.global_index)
}

#[test]
fn test_boundary_opens_section_exit_and_skips_empty_category() {
    let mut engine = engine(&[2, 0, 3]);
    let shown = Arc::new(Mutex::new(Vec::new()));
    let log = shown.clone();
    engine
        .events()
        .on::<SectionExitShown, _>(move |e| log.lock().push((e.category_index, e.left, e.right)));

    assert_eq!(
        engine.navigate(Direction::Down),
        NavOutcome::Moved { from: Some(0), to: 1 }
    );
    assert!(matches!(
        engine.navigate(Direction::Down),
        NavOutcome::Boundary { category: 0, .. }
    ));

    // Active item untouched, modal offers the nearest non-empty neighbours
    assert_eq!(active(&engine), Some(1));
    let exit = engine.section_exit().get();
    assert!(exit.is_visible);
    assert_eq!(exit.left_category.as_ref().map(|n| n.index), Some(2));
    assert_eq!(exit.right_category.as_ref().map(|n| n.index), Some(2));
    assert_eq!(shown.lock().as_slice(), &[(0, Some(2), Some(2))]);

    // Navigation is suppressed while the modal is up
    assert_eq!(engine.navigate(Direction::Up), NavOutcome::Unchanged);

    engine.handle_input(KeyInput::press(Key::ArrowRight));
    assert_eq!(engine.section_exit().get().selected_side, Side::Right);
    engine.handle_input(KeyInput::press(Key::Enter));

    assert!(!engine.section_exit().get().is_visible);
    assert_eq!(active(&engine), Some(2));
    let state = engine.navigation().get();
    assert_eq!(state.active_category_index, 2);
    assert_eq!(state.active_item_index, 0);
}

#[test]
fn test_grid_horizontal_wraps_over_non_empty_categories() {
    let mut engine = engine(&[2, 0, 3]);
    engine.navigate(Direction::Down);

    // Item index is kept across the empty category
    assert_eq!(
        engine.navigate(Direction::Right).moved_to(),
        Some(3),
        "category 1 is empty and skipped"
    );
    assert_eq!(engine.navigate(Direction::Right).moved_to(), Some(1));
    assert_eq!(engine.navigate(Direction::Left).moved_to(), Some(3));
}

#[test]
fn test_confirm_without_selection_keeps_modal_open() {
    let mut engine = engine(&[1, 1]);
    engine.navigate(Direction::Up);
    assert!(engine.section_exit().get().is_visible);

    assert_eq!(engine.confirm_exit(), NavOutcome::Unchanged);
    assert!(engine.section_exit().get().is_visible);

    assert!(engine.cancel_exit());
    assert!(!engine.section_exit().get().is_visible);
    assert_eq!(active(&engine), Some(0));
}

#[test]
fn test_select_exit_jumps_to_first_item_of_neighbour() {
    let mut engine = engine(&[3, 2, 4]);
    let hidden = Arc::new(Mutex::new(Vec::new()));
    let log = hidden.clone();
    engine
        .events()
        .on::<SectionExitHidden, _>(move |e| log.lock().push(e.target));

    engine.navigate(Direction::Up);
    assert_eq!(engine.select_exit(Side::Left).moved_to(), Some(5));
    assert_eq!(hidden.lock().as_slice(), &[Some(2)]);
}

#[test]
fn test_flat_navigation_wraps_around() {
    let mut config = EngineConfig::default();
    config.initial_layout = "deck".to_string();
    config.stack.navigation_mode = NavigationMode::Flat;
    let mut engine = engine_with(config, &[2, 0, 3]);
    assert_eq!(engine.navigation_mode(), NavigationMode::Flat);

    for _ in 0..5 {
        assert!(matches!(
            engine.navigate(Direction::Down),
            NavOutcome::Moved { .. }
        ));
    }
    assert_eq!(active(&engine), Some(0));
    assert_eq!(engine.navigate(Direction::Up).moved_to(), Some(4));
    assert!(!engine.section_exit().get().is_visible);
}

#[test]
fn test_active_item_survives_reload() {
    let mut engine = engine(&[2, 0, 3]);
    assert_eq!(engine.navigate_to_item("2-1").moved_to(), Some(3));

    engine.load_content(&content(&[1, 0, 3]));
    assert_eq!(active(&engine), Some(2));
    assert_eq!(engine.index().generation(), 2);

    // Gone entirely: back to the first item
    engine.load_content(&content(&[1]));
    assert_eq!(active(&engine), Some(0));
}

#[test]
fn test_empty_content_goes_home() {
    let mut engine = engine(&[]);
    assert!(engine.navigation().get().is_empty());
    assert_eq!(engine.navigate(Direction::Down), NavOutcome::Unchanged);

    settle(&mut engine);
    let pose = engine.rig().pose();
    assert!(pose.is_finite());
    assert_eq!(pose.eye, Vec3::new(0.0, 0.0, 10.0));
    assert_eq!(engine.camera_transition(), CameraTransition::Settled);
}

#[test]
fn test_camera_settles_on_focused_item() {
    let mut engine = engine(&[2, 0, 3]);
    let settled = Arc::new(Mutex::new(Vec::new()));
    let log = settled.clone();
    engine
        .events()
        .on::<CameraSettled, _>(move |e| log.lock().push(e.focused_item));

    settle(&mut engine);
    assert_eq!(settled.lock().last(), Some(&None));

    engine.navigate(Direction::Down);
    settle(&mut engine);
    assert_eq!(settled.lock().last(), Some(&Some(1)));
    assert!(engine.rig().pose().is_finite());
    assert!(!engine.animator().is_animating());
}

#[test]
fn test_events_follow_navigation() {
    let mut engine = engine(&[2, 2]);
    let changes = Arc::new(Mutex::new(Vec::new()));
    let log = changes.clone();
    engine
        .events()
        .on::<ActiveItemChanged, _>(move |e| log.lock().push(e.item_id.clone()));

    engine.navigate(Direction::Down);
    engine.navigate(Direction::Right);
    engine.navigate_to_item("missing");

    assert_eq!(changes.lock().as_slice(), &["0-1".to_string(), "1-1".to_string()]);
}

#[test]
fn test_layout_switch_auto_enters_browse() {
    let mut engine = engine(&[2, 3]);
    let browse = Arc::new(Mutex::new(Vec::new()));
    let log = browse.clone();
    engine
        .events()
        .on::<BrowseModeChanged, _>(move |e| log.lock().push((e.active, e.control_type)));
    let layouts = Arc::new(Mutex::new(Vec::new()));
    let log = layouts.clone();
    engine
        .events()
        .on::<LayoutChanged, _>(move |e| log.lock().push(e.layout.clone()));

    engine.set_layout("deck").expect("deck layout");
    let state = engine.browse_state().get();
    assert!(state.is_active);
    assert!(state.auto_entered);
    assert_eq!(state.control_type, ControlType::FreeMove);

    assert_eq!(engine.cycle_layout().expect("cycle"), "pillar");
    assert!(!engine.browse_state().get().is_active);

    assert_eq!(
        browse.lock().as_slice(),
        &[(true, ControlType::FreeMove), (false, ControlType::FreeMove)]
    );
    assert_eq!(layouts.lock().as_slice(), &["deck".to_string(), "pillar".to_string()]);
}

#[test]
fn test_unknown_layout_is_rejected() {
    let mut engine = engine(&[1]);
    assert!(matches!(
        engine.set_layout("spiral"),
        Err(EngineError::Layout(LayoutError::UnknownLayout(_)))
    ));
    assert_eq!(engine.layout_name(), "pillar");

    let mut config = EngineConfig::default();
    config.initial_layout = "spiral".to_string();
    assert!(SpatialEngine::<String>::new(config).is_err());
}

#[test]
fn test_browse_key_toggles_and_escape_cancels() {
    let mut engine = engine(&[3]);
    settle(&mut engine);
    let before = engine.rig().pose();

    engine.handle_input(KeyInput::press(Key::Char('B')));
    assert_eq!(
        engine.browse_state().get().control_type,
        ControlType::Orbit
    );
    assert!(engine.browse_state().get().is_active);

    // Arrows belong to the camera now
    engine.handle_input(KeyInput::press(Key::ArrowDown));
    assert_eq!(active(&engine), Some(0));

    assert_eq!(engine.toggle_browse(), BrowseTransition::Exited { restored: true });
    settle(&mut engine);
    assert!((engine.rig().pose().eye - before.eye).length() < 1e-2);

    engine.handle_input(KeyInput::press(Key::Char('b')));
    engine.handle_input(KeyInput::press(Key::Escape));
    assert!(!engine.browse_state().get().is_active);
}

#[test]
fn test_text_field_keys_are_ignored() {
    let mut engine = engine(&[3]);
    engine.handle_input(KeyInput::press(Key::ArrowDown).in_text_field());
    engine.handle_input(KeyInput::press(Key::Char('b')).in_text_field());
    assert_eq!(active(&engine), Some(0));
    assert!(!engine.browse_state().get().is_active);
}

#[test]
fn test_drag_navigates_and_wheel_reaches_host() {
    let mut engine = engine(&[3]);
    let scrolls = Arc::new(Mutex::new(Vec::new()));
    let log = scrolls.clone();
    engine.on_scroll(move |action| log.lock().push(action));

    engine.handle_input(PointerInput {
        phase: PointerPhase::Down,
        position: Vec2::ZERO,
        time: Duration::ZERO,
    });
    engine.handle_input(PointerInput {
        phase: PointerPhase::Move,
        position: Vec2::new(0.0, -100.0),
        time: Duration::from_millis(100),
    });
    assert_eq!(active(&engine), Some(1));

    engine.handle_input(WheelInput {
        delta: Vec2::new(0.0, 120.0),
    });
    assert_eq!(scrolls.lock().as_slice(), &[WheelAction::ScrollDown]);
}

#[test]
fn test_orbit_drag_moves_camera() {
    let mut engine = engine(&[4, 4]);
    engine.toggle_browse();
    settle(&mut engine);
    let before = engine.rig().pose();

    engine.handle_input(PointerInput {
        phase: PointerPhase::Down,
        position: Vec2::ZERO,
        time: Duration::ZERO,
    });
    engine.handle_input(PointerInput {
        phase: PointerPhase::Move,
        position: Vec2::new(-200.0, 0.0),
        time: Duration::from_millis(16),
    });

    let after = engine.rig().pose();
    assert_ne!(after.eye, before.eye);
    assert_eq!(after.eye.y, after.target.y);
    // Drag navigation stays off while browsing
    assert_eq!(active(&engine), Some(0));
}

#[test]
fn test_toggle_focus_and_escape_reach_host() {
    let mut engine = engine(&[2]);
    let calls = Arc::new(Mutex::new(Vec::new()));
    let log = calls.clone();
    engine.on_toggle_focus(move || log.lock().push("focus"));
    let log = calls.clone();
    engine.on_escape(move || log.lock().push("escape"));

    engine.handle_input(KeyInput::press(Key::Space));
    engine.handle_input(KeyInput::press(Key::Escape));
    assert_eq!(calls.lock().as_slice(), &["focus", "escape"]);
}

#[test]
fn test_resize_updates_rig_aspect() {
    let mut engine = engine(&[2]);
    engine.resize(800.0, 400.0);
    assert_eq!(engine.rig().aspect(), 2.0);
    assert_eq!(engine.viewport().aspect(), 2.0);
}

#[test]
fn test_resize_at_end_of_layout_animation_runs_parked_focus() {
    let mut config = EngineConfig::default();
    config.initial_layout = "deck".to_string();
    let mut engine = engine_with(config, &[3]);
    let settled = Arc::new(Mutex::new(Vec::new()));
    let log = settled.clone();
    engine
        .events()
        .on::<CameraSettled, _>(move |e| log.lock().push(e.focused_item));

    // Lifting the next card animates the deck and parks the focus request
    engine.navigate(Direction::Down);
    assert!(engine.animator().is_animating());
    for _ in 0..26 {
        engine.tick(1.0 / 60.0);
    }
    assert!(engine.animator().is_animating());

    // A single pile does not move with the aspect, so this retarget lands
    // where the cards already are
    engine.resize(1000.0, 500.0);
    assert!(!engine.animator().is_animating());

    settle(&mut engine);
    assert_eq!(settled.lock().last(), Some(&Some(1)));
    assert_eq!(engine.camera_transition(), CameraTransition::Settled);
}

#[test]
fn test_flat_navigation_passes_repeated_items() {
    let mut config = EngineConfig::default();
    config.initial_layout = "deck".to_string();
    config.stack.navigation_mode = NavigationMode::Flat;
    let mut engine = SpatialEngine::<String>::new(config).expect("engine");
    engine.load_content(&[
        Category::new("today").with_items(["x".to_string(), "y".to_string()]),
        Category::new("popular").with_items(["x".to_string(), "z".to_string()]),
    ]);

    let mut visited = Vec::new();
    for _ in 0..4 {
        engine.navigate(Direction::Down);
        let item = engine.active_item().expect("active item");
        visited.push((item.global_index, item.id.clone()));
    }
    assert_eq!(
        visited,
        vec![
            (1, "y".to_string()),
            (2, "popular-0".to_string()),
            (3, "z".to_string()),
            (0, "x".to_string()),
        ]
    );
    assert_eq!(engine.navigate_to_item("popular-0").moved_to(), Some(2));
}

#[test]
fn test_entering_browse_drops_drag_in_progress() {
    let mut engine = engine(&[4]);
    engine.handle_input(PointerInput {
        phase: PointerPhase::Down,
        position: Vec2::ZERO,
        time: Duration::ZERO,
    });
    engine.handle_input(PointerInput {
        phase: PointerPhase::Move,
        position: Vec2::new(0.0, -50.0),
        time: Duration::from_millis(16),
    });
    assert_eq!(active(&engine), Some(0));

    engine.toggle_browse();
    engine.toggle_browse();
    assert!(!engine.browse_state().get().is_active);

    // The gesture started before browsing no longer counts
    engine.handle_input(PointerInput {
        phase: PointerPhase::Move,
        position: Vec2::new(0.0, -150.0),
        time: Duration::from_millis(32),
    });
    assert_eq!(active(&engine), Some(0));

    // A fresh gesture navigates again
    engine.handle_input(PointerInput {
        phase: PointerPhase::Up,
        position: Vec2::new(0.0, -150.0),
        time: Duration::from_millis(48),
    });
    engine.handle_input(PointerInput {
        phase: PointerPhase::Down,
        position: Vec2::ZERO,
        time: Duration::from_millis(64),
    });
    engine.handle_input(PointerInput {
        phase: PointerPhase::Move,
        position: Vec2::new(0.0, -100.0),
        time: Duration::from_millis(80),
    });
    assert_eq!(active(&engine), Some(1));
}

#[test]
fn test_static_browse_frames_overview_and_holds_camera() {
    let mut config = EngineConfig::default();
    config.pillar.browse_control = ControlType::Static;
    let mut engine = engine_with(config, &[3, 2]);
    engine.navigate(Direction::Down);
    settle(&mut engine);
    let focused = engine.rig().pose();

    let settled = Arc::new(Mutex::new(Vec::new()));
    let log = settled.clone();
    engine
        .events()
        .on::<CameraSettled, _>(move |e| log.lock().push(e.focused_item));

    assert_eq!(
        engine.toggle_browse(),
        BrowseTransition::Entered(ControlType::Static)
    );
    settle(&mut engine);
    assert_eq!(settled.lock().as_slice(), &[None]);
    let overview = engine.rig().pose();
    assert!(overview.is_finite());
    assert!((overview.eye - focused.eye).length() > 1e-2);

    // Neither pointer nor arrows move anything
    engine.handle_input(PointerInput {
        phase: PointerPhase::Down,
        position: Vec2::ZERO,
        time: Duration::ZERO,
    });
    engine.handle_input(PointerInput {
        phase: PointerPhase::Move,
        position: Vec2::new(-200.0, -200.0),
        time: Duration::from_millis(16),
    });
    engine.handle_input(KeyInput::press(Key::ArrowDown));
    engine.handle_input(KeyInput::press(Key::Char('w')));
    settle(&mut engine);
    assert!((engine.rig().pose().eye - overview.eye).length() < 1e-4);
    assert_eq!(active(&engine), Some(1));

    assert_eq!(engine.toggle_browse(), BrowseTransition::Exited { restored: true });
    settle(&mut engine);
    assert!((engine.rig().pose().eye - focused.eye).length() < 1e-2);
}
