//! Integration tests: pointer gestures through the handler chain, observed
//! via registry notifications.

use pretty_assertions::assert_eq;
use roi_core::{
    Curve, CurveKey, CurveKind, CurveRegistry, Notification, Point, RegistryObserver,
};
use roi_editor::{
    Claims, Cursor, CurveEditor, EditState, EditorConfig, InputEvent, InputHandler, Response,
    dispatch,
};
use std::cell::RefCell;
use std::rc::Rc;

const R: f64 = 0.5;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

type Log = Rc<RefCell<Vec<Notification>>>;

fn observed_editor(kind: CurveKind) -> (CurveEditor, Log) {
    init_logging();
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    let registry = CurveRegistry::with_observer(move |n: Notification| sink.borrow_mut().push(n));
    let config = EditorConfig {
        default_kind: kind,
        ..EditorConfig::default()
    };
    (CurveEditor::with_registry(registry, config), log)
}

fn count_changes(log: &Log) -> Vec<(usize, usize)> {
    log.borrow()
        .iter()
        .filter_map(|n| match n {
            Notification::CountChanged { old, new } => Some((*old, *new)),
            Notification::RedrawRequested => None,
        })
        .collect()
}

fn square(key: u64, origin: f64) -> Curve {
    Curve::new(
        CurveKey::new(key),
        CurveKind::Polygon,
        [
            Point::new(origin, origin),
            Point::new(origin + 10.0, origin),
            Point::new(origin + 10.0, origin + 10.0),
            Point::new(origin, origin + 10.0),
        ],
    )
}

/// Stands in for the host's chart: pans on any unclaimed drag and opens a
/// context menu on unreserved secondary clicks.
#[derive(Default)]
struct Chart {
    panned: usize,
    menus: usize,
}

impl InputHandler for Chart {
    fn handle(&mut self, event: &InputEvent, claims: &Claims) -> Response {
        match event {
            InputEvent::Drag { .. } if claims.drag.is_none() => {
                self.panned += 1;
                Response {
                    cursor: Some(Cursor::Default),
                    drag_handled: true,
                    reserve_secondary_click: false,
                }
            }
            InputEvent::Click {
                button: roi_editor::Button::Secondary,
                ..
            } if !claims.is_secondary_click_reserved() => {
                self.menus += 1;
                Response::default()
            }
            _ => Response::cursor(Cursor::Default),
        }
    }
}

// ─── Construction ────────────────────────────────────────────────────────

#[test]
fn click_begins_and_click_finishes_simple_curve() {
    let (mut editor, log) = observed_editor(CurveKind::Line);

    editor.on_event(&InputEvent::click((0.0, 0.0), R));
    assert_eq!(editor.state(), EditState::ConstructingCurve);
    assert_eq!(editor.registry().len(), 0);
    assert!(count_changes(&log).is_empty());

    editor.on_event(&InputEvent::click((10.0, 10.0), R));
    assert_eq!(editor.state(), EditState::Idle);
    assert_eq!(editor.registry().len(), 1);
    assert_eq!(count_changes(&log), vec![(0, 1)]);

    let curve = editor.registry().curves().next().unwrap();
    assert_eq!(curve.kind, CurveKind::Line);
    assert!(curve.finished);
}

#[test]
fn complex_curve_keeps_going_until_right_click() {
    let (mut editor, _log) = observed_editor(CurveKind::Composite);
    let mut chart = Chart::default();

    let mut send = |editor: &mut CurveEditor, event: InputEvent| {
        dispatch(&event, &mut [editor, &mut chart])
    };

    send(&mut editor, InputEvent::click((0.0, 0.0), R));
    for p in [(1.0, 1.0), (5.0, 1.0), (5.0, 6.0)] {
        send(&mut editor, InputEvent::press(p, R));
        send(&mut editor, InputEvent::release(p, R));
        send(&mut editor, InputEvent::click(p, R));
    }
    assert_eq!(editor.state(), EditState::ConstructingCurve);

    // Right click on the draft is reserved against the context menu.
    let claims = send(&mut editor, InputEvent::secondary_click((5.0, 3.0), R));
    assert!(claims.is_secondary_click_reserved());
    assert_eq!(claims.secondary_click, Some(0));
    assert_eq!(editor.state(), EditState::Idle);

    let curve = editor.registry().curves().next().unwrap();
    // The placeholder seed was replaced by the first placed vertex.
    assert_eq!(
        curve.points().collect::<Vec<_>>(),
        vec![
            Point::new(1.0, 1.0),
            Point::new(5.0, 1.0),
            Point::new(5.0, 6.0),
        ]
    );
    drop(send);
    assert_eq!(chart.menus, 0);
}

#[test]
fn right_click_away_from_draft_is_not_reserved() {
    let (mut editor, _log) = observed_editor(CurveKind::Polygon);
    let mut chart = Chart::default();

    editor.on_event(&InputEvent::click((0.0, 0.0), R));
    editor.on_event(&InputEvent::press((10.0, 0.0), R));
    editor.on_event(&InputEvent::press((10.0, 10.0), R));

    let claims = dispatch(
        &InputEvent::secondary_click((40.0, 40.0), R),
        &mut [&mut editor, &mut chart],
    );
    assert!(!claims.is_secondary_click_reserved());
    assert_eq!(chart.menus, 1);
    // Still finishes the curve.
    assert_eq!(editor.registry().len(), 1);
}

// ─── Removal ─────────────────────────────────────────────────────────────

#[test]
fn double_click_removes_then_noops() {
    let (mut editor, log) = observed_editor(CurveKind::Polygon);
    editor.registry_mut().add_or_replace(square(1, 0.0)).unwrap();

    editor.on_event(&InputEvent::double_click((5.0, 5.0), R));
    assert!(editor.registry().is_empty());
    assert_eq!(count_changes(&log), vec![(0, 1), (1, 0)]);

    let before = log.borrow().len();
    editor.on_event(&InputEvent::double_click((5.0, 5.0), R));
    assert!(editor.registry().is_empty());
    assert_eq!(log.borrow().len(), before);
}

// ─── Dragging ────────────────────────────────────────────────────────────

#[test]
fn anchor_drag_updates_before_release() {
    let (mut editor, log) = observed_editor(CurveKind::Polygon);
    editor.registry_mut().add_or_replace(Curve::new(
        CurveKey::new(1),
        CurveKind::Polygon,
        [
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(5.0, 5.0),
        ],
    ))
    .unwrap();
    editor.registry_mut().add_or_replace(square(2, 50.0)).unwrap();
    let mut chart = Chart::default();

    let claims = dispatch(
        &InputEvent::press((5.0, 5.0), R),
        &mut [&mut editor, &mut chart],
    );
    assert_eq!(claims.cursor(), Some(Cursor::ResizeAll));
    assert!(matches!(editor.state(), EditState::AnchorCaught(_)));

    let redraws_before = log.borrow().len();
    for y in [6.0, 7.0, 8.0] {
        let claims = dispatch(
            &InputEvent::drag((5.0, y), R),
            &mut [&mut editor, &mut chart],
        );
        assert_eq!(claims.drag, Some(0));
    }
    assert_eq!(chart.panned, 0);
    assert!(log.borrow().len() > redraws_before);

    // Visible mid-drag and promoted to most recent.
    let registry = editor.registry();
    assert_eq!(registry.keys().last(), Some(CurveKey::new(1)));
    assert_eq!(
        registry.get(CurveKey::new(1)).unwrap().vertices[2].point,
        Point::new(5.0, 8.0)
    );
    assert_eq!(editor.state(), EditState::AnchorCaught(roi_core::AnchorRef {
        key: CurveKey::new(1),
        kind: roi_core::AnchorKind::Vertex(2),
    }));

    dispatch(
        &InputEvent::release((5.0, 8.0), R),
        &mut [&mut editor, &mut chart],
    );
    assert_eq!(editor.state(), EditState::Idle);
}

#[test]
fn idle_drag_falls_through_to_chart() {
    let (mut editor, _log) = observed_editor(CurveKind::Polygon);
    let mut chart = Chart::default();
    dispatch(&InputEvent::press((3.0, 3.0), R), &mut [&mut editor, &mut chart]);
    let claims = dispatch(&InputEvent::drag((4.0, 4.0), R), &mut [&mut editor, &mut chart]);
    assert_eq!(claims.drag, Some(1));
    assert_eq!(chart.panned, 1);
}

// ─── Hover ───────────────────────────────────────────────────────────────

#[test]
fn hover_cursor_first_claim_wins() {
    let (mut editor, _log) = observed_editor(CurveKind::Polygon);
    editor.registry_mut().add_or_replace(square(1, 0.0)).unwrap();
    let mut chart = Chart::default();

    let over_vertex = dispatch(
        &InputEvent::hover((0.0, 0.0), R),
        &mut [&mut editor, &mut chart],
    );
    assert_eq!(over_vertex.cursor, Some((0, Cursor::ResizeAll)));

    let over_side = dispatch(
        &InputEvent::hover((10.0, 5.0), R),
        &mut [&mut editor, &mut chart],
    );
    assert_eq!(over_side.cursor(), Some(Cursor::ResizeHorizontal));

    let over_body = dispatch(
        &InputEvent::hover((3.0, 6.0), R),
        &mut [&mut editor, &mut chart],
    );
    assert_eq!(over_body.cursor(), Some(Cursor::Move));

    // Nothing under the pointer: the chart's cursor applies.
    let elsewhere = dispatch(
        &InputEvent::hover((30.0, 30.0), R),
        &mut [&mut editor, &mut chart],
    );
    assert_eq!(elsewhere.cursor, Some((1, Cursor::Default)));

    // Reversed priority: the chart wins.
    let reversed = dispatch(
        &InputEvent::hover((0.0, 0.0), R),
        &mut [&mut chart, &mut editor],
    );
    assert_eq!(reversed.cursor, Some((0, Cursor::Default)));
}

#[test]
fn hidden_curves_ignore_pointer() {
    let (mut editor, _log) = observed_editor(CurveKind::Polygon);
    editor.registry_mut().add_or_replace(square(1, 0.0)).unwrap();
    editor.on_event(&InputEvent::key("h"));

    // A click on the hidden curve starts a new one instead.
    editor.on_event(&InputEvent::click((5.0, 5.0), R));
    assert_eq!(editor.state(), EditState::ConstructingCurve);
    assert!(!editor.registry().construction().unwrap().visible);
}

// ─── Configuration ───────────────────────────────────────────────────────

#[test]
fn config_from_json_fills_defaults() {
    let config: EditorConfig =
        serde_json::from_str(r#"{ "default_kind": "line", "initial_visibility": false }"#)
            .unwrap();
    assert_eq!(
        config,
        EditorConfig {
            default_kind: CurveKind::Line,
            initial_visibility: false,
            ..EditorConfig::default()
        }
    );

    let editor = CurveEditor::new(config.clone());
    assert_eq!(editor.kind(), CurveKind::Line);
    assert!(!editor.registry().is_visible());

    let text = serde_json::to_string(&config).unwrap();
    let back: EditorConfig = serde_json::from_str(&text).unwrap();
    assert_eq!(back, config);
}

#[test]
fn observer_trait_objects_work_too() {
    struct Counter(Rc<RefCell<usize>>);
    impl RegistryObserver for Counter {
        fn notify(&mut self, _n: Notification) {
            *self.0.borrow_mut() += 1;
        }
    }
    let hits = Rc::new(RefCell::new(0));
    let registry = CurveRegistry::with_observer(Counter(Rc::clone(&hits)));
    let mut editor = CurveEditor::with_registry(registry, EditorConfig::default());
    editor.on_event(&InputEvent::click((0.0, 0.0), R));
    assert!(*hits.borrow() > 0);
}
