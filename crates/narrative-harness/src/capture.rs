#![forbid(unsafe_code)]

//! `tracing` capture for log assertions.
//!
//! ```
//! use narrative_harness::capture::with_captured;
//!
//! let logs = with_captured(|| tracing::debug!(index = 7, "ignored"));
//! assert!(logs.contains_message("ignored"));
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;

/// A recorded log event.
#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub level: Level,
    pub target: String,
    pub message: String,
    pub fields: HashMap<String, String>,
    /// Name of the innermost span the event was emitted in.
    pub span: Option<String>,
}

/// A recorded span creation.
#[derive(Debug, Clone)]
pub struct CapturedSpan {
    pub name: String,
    pub fields: HashMap<String, String>,
}

#[derive(Debug, Default)]
struct Records {
    events: Vec<CapturedEvent>,
    spans: Vec<CapturedSpan>,
}

/// Layer that appends every event and span to shared storage.
#[derive(Debug, Clone, Default)]
pub struct CaptureLayer {
    records: Arc<Mutex<Records>>,
}

impl CaptureLayer {
    #[must_use]
    pub fn new() -> (Self, CaptureHandle) {
        let layer = Self::default();
        let handle = CaptureHandle {
            records: layer.records.clone(),
        };
        (layer, handle)
    }
}

/// Read side of a [`CaptureLayer`].
#[derive(Debug, Clone)]
pub struct CaptureHandle {
    records: Arc<Mutex<Records>>,
}

impl CaptureHandle {
    #[must_use]
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.records
            .lock()
            .map(|records| records.events.clone())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn spans(&self) -> Vec<CapturedSpan> {
        self.records
            .lock()
            .map(|records| records.spans.clone())
            .unwrap_or_default()
    }

    /// Whether any event's message contains `needle`.
    #[must_use]
    pub fn contains_message(&self, needle: &str) -> bool {
        self.events()
            .iter()
            .any(|event| event.message.contains(needle))
    }

    /// Events at exactly `level`.
    #[must_use]
    pub fn at_level(&self, level: Level) -> Vec<CapturedEvent> {
        self.events()
            .into_iter()
            .filter(|event| event.level == level)
            .collect()
    }

    /// Spans named `name`.
    #[must_use]
    pub fn spans_named(&self, name: &str) -> Vec<CapturedSpan> {
        self.spans()
            .into_iter()
            .filter(|span| span.name == name)
            .collect()
    }
}

#[derive(Default)]
struct FieldVisitor {
    message: String,
    fields: HashMap<String, String>,
}

impl Visit for FieldVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.fields
                .insert(field.name().to_owned(), format!("{value:?}"));
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_owned();
        } else {
            self.fields.insert(field.name().to_owned(), value.to_owned());
        }
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.fields.insert(field.name().to_owned(), value.to_string());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.fields.insert(field.name().to_owned(), value.to_string());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.fields.insert(field.name().to_owned(), value.to_string());
    }
}

impl<S> tracing_subscriber::Layer<S> for CaptureLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, _id: &Id, _ctx: Context<'_, S>) {
        let mut visitor = FieldVisitor::default();
        attrs.record(&mut visitor);
        if let Ok(mut records) = self.records.lock() {
            records.spans.push(CapturedSpan {
                name: attrs.metadata().name().to_owned(),
                fields: visitor.fields,
            });
        }
    }

    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);
        let span = ctx
            .event_span(event)
            .map(|span| span.name().to_owned());
        if let Ok(mut records) = self.records.lock() {
            records.events.push(CapturedEvent {
                level: *event.metadata().level(),
                target: event.metadata().target().to_owned(),
                message: visitor.message,
                fields: visitor.fields,
                span,
            });
        }
    }
}

/// Run `f` with a capturing subscriber installed on this thread.
pub fn with_captured<F>(f: F) -> CaptureHandle
where
    F: FnOnce(),
{
    let (layer, handle) = CaptureLayer::new();
    let subscriber = tracing_subscriber::registry().with(layer);
    tracing::subscriber::with_default(subscriber, f);
    handle
}
