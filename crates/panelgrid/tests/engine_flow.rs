//! Host-level flows: JSON event streams through `GridEngine`, with log capture.

use std::sync::{Arc, Mutex};

use panelgrid::{
    DragEffect, DragPhase, EngineConfig, EngineOutput, GridEngine, GridPosition, HostEvent,
    RendererRegistry, UpdateRequest, UpdateSink, Widget, WidgetKind, WidgetUpdate,
};
use tracing::Subscriber;
use tracing_subscriber::Layer;
use tracing_subscriber::layer::{Context, SubscriberExt};

fn pos(row: i32, col: i32, width: i32, height: i32) -> GridPosition {
    GridPosition::new(row, col, width, height).expect("positive span")
}

/// A store stand-in that applies requests to its own copy of the widgets.
#[derive(Debug, Default)]
struct MirrorStore {
    widgets: Vec<Widget>,
    received: Vec<UpdateRequest>,
}

impl UpdateSink for MirrorStore {
    fn request_update(&mut self, widget_id: &str, update: WidgetUpdate) {
        if let Some(widget) = self.widgets.iter_mut().find(|w| w.id == widget_id) {
            update.apply_to(widget);
        }
        self.received.push(UpdateRequest::new(widget_id, update));
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Captured {
    target: String,
    message: String,
}

struct CaptureLayer {
    events: Arc<Mutex<Vec<Captured>>>,
}

impl<S> Layer<S> for CaptureLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        struct Msg {
            message: Option<String>,
        }
        impl tracing::field::Visit for Msg {
            fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
                if field.name() == "message" {
                    self.message = Some(value.to_string());
                }
            }

            fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
                if field.name() == "message" {
                    self.message = Some(format!("{value:?}").trim_matches('"').to_string());
                }
            }
        }
        let mut msg = Msg { message: None };
        event.record(&mut msg);
        self.events.lock().expect("capture lock").push(Captured {
            target: event.metadata().target().to_string(),
            message: msg.message.unwrap_or_default(),
        });
    }
}

fn capture<T>(f: impl FnOnce() -> T) -> (T, Vec<Captured>) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::registry().with(CaptureLayer {
        events: Arc::clone(&events),
    });
    let out = tracing::subscriber::with_default(subscriber, f);
    let events = events.lock().expect("capture lock").clone();
    (out, events)
}

fn events(json: &str) -> Vec<HostEvent> {
    serde_json::from_str(json).expect("event stream parses")
}

fn initial_widgets() -> Vec<Widget> {
    vec![
        Widget::new("A", "weather", pos(0, 0, 2, 2)),
        Widget::new("B", "calendar", pos(3, 2, 2, 1)),
    ]
}

#[test]
fn json_event_stream_drives_a_committed_drag() {
    let store = MirrorStore {
        widgets: initial_widgets(),
        ..MirrorStore::default()
    };
    let mut engine = GridEngine::new(EngineConfig::default(), 1200.0, store).expect("valid config");
    engine.set_snapshot(initial_widgets());

    // Cell (r, c) center = 16 + 296 * n + 140.
    let stream = events(
        r#"[
            {"event": "pointer",
             "kind": {"kind": "down", "target": {"widget_id": "B", "handle": "move"}},
             "position": {"x": 748.0, "y": 1044.0}, "pointer_id": 0},
            {"event": "pointer", "kind": {"kind": "moved"},
             "position": {"x": 452.0, "y": 156.0}, "pointer_id": 0},
            {"event": "pointer", "kind": {"kind": "moved"},
             "position": {"x": 156.0, "y": 748.0}, "pointer_id": 0},
            {"event": "pointer", "kind": {"kind": "up"},
             "position": {"x": 156.0, "y": 748.0}, "pointer_id": 0}
        ]"#,
    );

    let (outputs, logs) = capture(|| {
        stream
            .into_iter()
            .flat_map(|event| engine.push_event(event))
            .collect::<Vec<_>>()
    });

    let phases: Vec<DragPhase> = outputs
        .iter()
        .filter_map(|out| match out {
            EngineOutput::Drag(t) => Some(t.to),
            _ => None,
        })
        .collect();
    assert_eq!(
        phases,
        vec![DragPhase::Dragging, DragPhase::Hovering, DragPhase::Idle]
    );
    assert!(matches!(
        outputs.last(),
        Some(EngineOutput::Drag(t)) if matches!(t.effect, DragEffect::Committed { .. })
    ));

    let store = engine.sink();
    assert_eq!(
        store.received,
        vec![UpdateRequest::new("B", WidgetUpdate::position(pos(2, 0, 2, 1)))]
    );
    assert_eq!(store.widgets[1].grid_position, pos(2, 0, 2, 1));

    assert!(logs.iter().any(|c| c.target == "panelgrid::drag" && c.message == "drag started"));
    assert!(logs.iter().any(|c| c.target == "panelgrid::drag" && c.message == "drag committed"));
}

#[test]
fn store_echo_converges_after_shrink() {
    let mut engine =
        GridEngine::new(EngineConfig::default(), 1200.0, MirrorStore::default()).expect("valid");
    let widgets = vec![
        Widget::new("A", "weather", pos(0, 0, 1, 1)),
        Widget::new("C", "notes", pos(1, 1, 2, 1)),
    ];
    engine.sink_mut().widgets = widgets.clone();
    engine.set_snapshot(widgets);

    let (output, logs) =
        capture(|| engine.handle_event(HostEvent::ContainerResized { width: 700.0 }));
    let EngineOutput::Resized { grid, report, .. } = output else {
        panic!("expected a resize");
    };
    assert_eq!(grid.columns, 2);
    assert_eq!(report.violations.len(), 1);
    assert!(logs
        .iter()
        .any(|c| c.target == "panelgrid::reconcile" && c.message == "layout violation"));
    assert!(logs.iter().any(|c| c.target == "panelgrid::engine"));

    // The store pushes its updated copy back; nothing further to correct.
    let echoed = engine.sink().widgets.clone();
    let (_, report) = engine.set_snapshot(echoed);
    assert!(report.is_clean());
    assert_eq!(engine.widgets()[1].grid_position, pos(1, 0, 2, 1));
}

#[test]
fn rejected_commit_is_reconciled_from_corrective_snapshot() {
    let mut engine =
        GridEngine::new(EngineConfig::default(), 1200.0, Vec::<UpdateRequest>::new())
            .expect("valid");
    engine.set_snapshot(initial_widgets());

    // The store failed to persist and pushes a snapshot where two widgets collide.
    let corrupted = vec![
        Widget::new("A", "weather", pos(0, 0, 2, 2)),
        Widget::new("B", "calendar", pos(1, 1, 2, 1)),
    ];
    let (_, report) = engine.set_snapshot(corrupted);
    assert!(!report.is_clean());
    assert_eq!(
        engine.sink().last(),
        Some(&UpdateRequest::new("B", WidgetUpdate::position(pos(0, 2, 2, 1))))
    );
}

#[test]
fn scroll_windows_large_dashboards() {
    let mut engine =
        GridEngine::new(EngineConfig::default(), 1200.0, Vec::<UpdateRequest>::new())
            .expect("valid");
    let widgets: Vec<Widget> = (0..40)
        .map(|i| Widget::new(format!("w{i}"), "clock", pos(i / 4, i % 4, 1, 1)))
        .collect();
    engine.set_snapshot(widgets);

    let out = engine.handle_event(HostEvent::Scrolled {
        scroll_top: 888.0,
        viewport_height: 600.0,
    });
    let EngineOutput::Scrolled(window) = out else {
        panic!("expected a scroll");
    };
    assert!(window.is_virtualized());
    // Pitch is 296px: row 3 at the top, 3 rows in view, 1 buffer row.
    assert_eq!((window.row_start, window.row_end), (3, 7));
    let visible = window.visible_items(engine.widgets());
    assert_eq!(visible.first().map(|w| w.id.as_str()), Some("w12"));
    assert_eq!(visible.len(), 16);
}

#[test]
fn registry_sizes_new_widgets() {
    let mut registry = RendererRegistry::new();
    struct Calendar;
    impl panelgrid::WidgetRenderer for Calendar {
        fn default_span(&self) -> (i32, i32) {
            (2, 1)
        }
        fn render(&self, widget: &Widget, _bounds: panelgrid::PxRect) -> String {
            format!("calendar {}", widget.id)
        }
    }
    registry
        .register(WidgetKind::Calendar, Calendar)
        .expect("first registration");

    let mut engine =
        GridEngine::new(EngineConfig::default(), 1200.0, Vec::<UpdateRequest>::new())
            .expect("valid");
    engine.set_snapshot(initial_widgets());
    let (width, height) = registry.default_span("calendar");
    let slot = engine.place_new(width, height);
    assert_eq!(slot, pos(0, 2, 2, 1));

    let widget = Widget::new("C", "calendar", slot);
    assert_eq!(WidgetKind::of(&widget), WidgetKind::Calendar);
    let rect = engine.grid().position_rect(slot);
    assert_eq!(registry.render(&widget, rect).as_deref(), Some("calendar C"));
}
