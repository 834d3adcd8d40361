use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::{Event, Subscriber};
use tracing_subscriber::{Layer, layer::Context, registry::LookupSpan};

/// A captured log event
#[derive(Debug, Clone, Serialize)]
pub struct EventData {
    pub level: String,
    pub target: String,
    /// The event's `message` field, empty if it had none
    pub message: String,
    pub fields: HashMap<String, serde_json::Value>,
}

impl EventData {
    /// String value of a field, if present
    pub fn field_str(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(|v| v.as_str())
    }
}

/// Shared storage for captured events
#[derive(Debug, Clone, Default)]
pub struct SharedEventStorage {
    events: Arc<RwLock<Vec<EventData>>>,
    /// document.id -> indexes into `events`
    by_document: Arc<RwLock<HashMap<String, Vec<usize>>>>,
}

impl SharedEventStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<EventData> {
        self.events.read().map(|e| e.clone()).unwrap_or_default()
    }

    /// Events carrying the given `document.id` field, oldest first
    pub fn for_document(&self, document_id: &str) -> Vec<EventData> {
        let Ok(index) = self.by_document.read() else {
            return Vec::new();
        };
        let Ok(events) = self.events.read() else {
            return Vec::new();
        };
        index
            .get(document_id)
            .map(|ids| ids.iter().filter_map(|&i| events.get(i).cloned()).collect())
            .unwrap_or_default()
    }

    /// Whether any event has exactly this message
    pub fn contains_message(&self, message: &str) -> bool {
        self.events
            .read()
            .map(|events| events.iter().any(|e| e.message == message))
            .unwrap_or(false)
    }

    pub fn add_event(&self, event: EventData) {
        let Ok(mut events) = self.events.write() else {
            return;
        };
        if let Some(doc_id) = event.field_str("document.id") {
            if let Ok(mut index) = self.by_document.write() {
                index.entry(doc_id.to_string()).or_default().push(events.len());
            }
        }
        events.push(event);
    }

    pub fn clear(&self) {
        if let Ok(mut events) = self.events.write() {
            events.clear();
        }
        if let Ok(mut index) = self.by_document.write() {
            index.clear();
        }
    }
}

/// A tracing layer that records events in memory
pub struct CaptureLayer {
    storage: SharedEventStorage,
}

impl CaptureLayer {
    pub fn new(storage: SharedEventStorage) -> Self {
        Self { storage }
    }
}

impl<S> Layer<S> for CaptureLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = JsonVisitor::default();
        event.record(&mut visitor);
        let mut fields = visitor.0;

        let message = match fields.remove("message") {
            Some(serde_json::Value::String(s)) => s,
            Some(other) => other.to_string(),
            None => String::new(),
        };

        let metadata = event.metadata();
        self.storage.add_event(EventData {
            level: metadata.level().to_string(),
            target: metadata.target().to_string(),
            message,
            fields,
        });
    }
}

#[derive(Default)]
struct JsonVisitor(HashMap<String, serde_json::Value>);

impl tracing::field::Visit for JsonVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.insert(field.name().to_string(), serde_json::Value::String(format!("{:?}", value)));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.insert(field.name().to_string(), serde_json::Value::String(value.to_string()));
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.0.insert(field.name().to_string(), serde_json::Value::Bool(value));
    }

    fn record_i64(&mut self, field: &tracing::field::Field, value: i64) {
        self.0.insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_f64(&mut self, field: &tracing::field::Field, value: f64) {
        self.0.insert(field.name().to_string(), serde_json::json!(value));
    }
}
