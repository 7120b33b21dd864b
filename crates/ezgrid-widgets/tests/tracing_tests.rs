#![forbid(unsafe_code)]

//! Tracing instrumentation tests.
//!
//! A capture layer records every span and event so the tests can check span
//! names, fields, and nesting of the placement, tab, and teardown paths.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use ezgrid_core::event::{Event, EventKind};
use ezgrid_layout::Place;
use ezgrid_widgets::{Gui, GuiConfig, HeadlessToolkit};

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;

// ============================================================================
// Test Infrastructure
// ============================================================================

/// A captured span with its fields and parent.
#[derive(Debug, Clone)]
struct CapturedSpan {
    name: String,
    fields: HashMap<String, String>,
    parent_name: Option<String>,
}

/// A captured event with its target and message.
#[derive(Debug, Clone)]
struct CapturedEvent {
    target: String,
    level: tracing::Level,
    message: String,
    fields: HashMap<String, String>,
}

#[derive(Default)]
struct Captured {
    spans: Vec<CapturedSpan>,
    events: Vec<CapturedEvent>,
}

struct Capture(Arc<Mutex<Captured>>);

#[derive(Clone)]
struct CaptureHandle(Arc<Mutex<Captured>>);

impl CaptureHandle {
    fn spans(&self) -> Vec<CapturedSpan> {
        self.0.lock().unwrap().spans.clone()
    }

    fn events(&self) -> Vec<CapturedEvent> {
        self.0.lock().unwrap().events.clone()
    }

    fn spans_named(&self, name: &str) -> Vec<CapturedSpan> {
        self.spans().into_iter().filter(|s| s.name == name).collect()
    }
}

struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S> tracing_subscriber::Layer<S> for Capture
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        _id: &tracing::span::Id,
        ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = FieldVisitor(Vec::new());
        attrs.record(&mut visitor);
        let parent_name = ctx
            .current_span()
            .id()
            .and_then(|id| ctx.span(id))
            .map(|span_ref| span_ref.name().to_string());
        self.0.lock().unwrap().spans.push(CapturedSpan {
            name: attrs.metadata().name().to_string(),
            fields: visitor.0.into_iter().collect(),
            parent_name,
        });
    }

    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        let mut fields: HashMap<String, String> = visitor.0.into_iter().collect();
        let message = fields.remove("message").unwrap_or_default();
        self.0.lock().unwrap().events.push(CapturedEvent {
            target: event.metadata().target().to_string(),
            level: *event.metadata().level(),
            message,
            fields,
        });
    }
}

fn with_captured<R>(f: impl FnOnce() -> R) -> (R, CaptureHandle) {
    let captured = Arc::new(Mutex::new(Captured::default()));
    let handle = CaptureHandle(Arc::clone(&captured));
    let subscriber = tracing_subscriber::registry().with(Capture(captured));
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, handle)
}

fn gui(config: GuiConfig) -> Gui<HeadlessToolkit> {
    Gui::new(HeadlessToolkit::new(), config).unwrap()
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn every_placement_has_a_span() {
    let (_, capture) = with_captured(|| {
        let mut gui = gui(GuiConfig::default());
        let root = gui.root();
        gui.add_label(root, "a", Place::next_row()).unwrap();
        gui.add_entry_field(root, Some("B"), "", Place::same_row())
            .unwrap();
    });
    let spans = capture.spans_named("ezgrid.place");
    assert_eq!(spans.len(), 2);
    assert_eq!(spans[1].fields.get("kind").map(String::as_str), Some("EntryField"));
    let placed = capture
        .events()
        .into_iter()
        .filter(|e| e.message == "placed")
        .count();
    assert_eq!(placed, 2);
}

#[test]
fn label_click_selects_inside_dispatch() {
    let (_, capture) = with_captured(|| {
        let mut gui = gui(GuiConfig::default());
        let root = gui.root();
        let nb = gui.add_notebook(root, Place::next_row(), 1).unwrap();
        gui.add_tab(nb, Some("Alpha"), None).unwrap();
        gui.add_tab(nb, Some("Beta"), None).unwrap();
        let label = gui.node(nb).unwrap().tabs().unwrap().get(1).unwrap().label;
        gui.dispatch(Event::new(label, EventKind::Click)).unwrap();
    });
    let selects = capture.spans_named("ezgrid.tab.select");
    assert_eq!(selects.len(), 1);
    assert_eq!(selects[0].parent_name.as_deref(), Some("ezgrid.dispatch"));
    assert_eq!(selects[0].fields.get("tab").map(String::as_str), Some("index 1"));
}

#[test]
fn forget_tears_down_inside_its_span() {
    let (_, capture) = with_captured(|| {
        let mut gui = gui(GuiConfig::default());
        let root = gui.root();
        let nb = gui.add_notebook(root, Place::next_row(), 1).unwrap();
        gui.add_tab(nb, Some("Alpha"), None).unwrap();
        gui.add_tab(nb, Some("Beta"), None).unwrap();
        gui.tab_forget(nb, "Alpha").unwrap();
    });
    let destroys = capture.spans_named("ezgrid.destroy");
    assert_eq!(destroys.len(), 1);
    assert_eq!(destroys[0].parent_name.as_deref(), Some("ezgrid.tab.forget"));
    assert!(
        capture
            .events()
            .iter()
            .any(|e| e.message == "tab forgotten" && e.level == tracing::Level::DEBUG)
    );
}

#[test]
fn deferred_first_selection_is_traced() {
    let (_, capture) = with_captured(|| {
        let mut gui = gui(GuiConfig::default().with_initial_tab_select_delay(Duration::from_millis(5)));
        let root = gui.root();
        let nb = gui.add_notebook(root, Place::next_row(), 1).unwrap();
        gui.add_tab(nb, None, None).unwrap();
        for token in gui.toolkit_mut().advance(Duration::from_millis(5)) {
            assert!(gui.run_deferred(token).unwrap());
        }
    });
    assert!(
        capture
            .events()
            .iter()
            .any(|e| e.message == "first selection scheduled")
    );
    assert_eq!(capture.spans_named("ezgrid.tab.select").len(), 1);
}

#[test]
fn layout_trace_only_for_marked_containers() {
    let (_, capture) = with_captured(|| {
        let mut gui = gui(GuiConfig::default());
        let root = gui.root();
        let quiet = gui.add_frame(root, Place::next_row(), 1).unwrap();
        gui.add_label(quiet, "untraced", Place::next_row()).unwrap();
        let loud = gui.add_frame(root, Place::next_row(), 1).unwrap();
        gui.set_trace(loud, true).unwrap();
        gui.add_label(loud, "traced", Place::next_row()).unwrap();
    });
    let layout: Vec<_> = capture
        .events()
        .into_iter()
        .filter(|e| e.target == "ezgrid.layout")
        .collect();
    let messages: Vec<&str> = layout.iter().map(|e| e.message.as_str()).collect();
    assert_eq!(messages, vec!["resolve", "remember"]);
    assert_eq!(
        layout[1].fields.get("placed").map(String::as_str),
        Some("(0,0) Span(1,1)")
    );
}

#[test]
fn failed_thumbnail_warns() {
    let (_, capture) = with_captured(|| {
        let mut gui = gui(GuiConfig::default());
        let root = gui.root();
        let base = gui
            .add_canvas(root, Default::default(), Place::next_row())
            .unwrap();
        gui.add_label_image(
            root,
            ezgrid_widgets::ImageOptions::default()
                .thumbnail_of(base)
                .thumbnail_width(0),
            Place::next_row(),
            1,
        )
        .unwrap();
        let err = gui
            .update_image(base, image::RgbImage::new(10, 10))
            .unwrap_err();
        assert!(matches!(err, ezgrid_widgets::WidgetError::Image(_)));
    });
    assert!(
        capture
            .events()
            .iter()
            .any(|e| e.level == tracing::Level::WARN && e.message == "thumbnail derivation failed")
    );
}
