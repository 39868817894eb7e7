use crate::client::LogClient;
use crate::record::Metadata;
use serde_json::Value;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

/// Events emitted by this crate itself are never shipped.
const SELF_TARGET: &str = "logship";

/// `tracing_subscriber` layer that forwards events to a [`LogClient`].
///
/// Events at or above `min_level` become `log()` calls: the level is
/// lowercased, the `message` field becomes the entry message and every
/// other field lands in metadata next to `target`, `module_path`, `file`
/// and `line`. A `source` field is honoured like any caller-supplied
/// `metadata.source`.
pub struct ShippingLayer {
    client: LogClient,
    min_level: Level,
}

impl ShippingLayer {
    pub fn new(client: LogClient, min_level: Level) -> Self {
        Self { client, min_level }
    }
}

impl<S> Layer<S> for ShippingLayer
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    fn on_event(&self, event: &Event, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        // Lower severities compare greater (TRACE > ERROR).
        if *meta.level() > self.min_level || is_own_target(meta.target()) {
            return;
        }

        let mut fields = Metadata::new();
        let mut message: Option<String> = None;
        let mut visitor = FieldVisitor { fields: &mut fields, message: &mut message };
        event.record(&mut visitor);

        fields.insert("target".to_string(), Value::String(meta.target().to_string()));
        if let Some(module_path) = meta.module_path() {
            fields.insert("module_path".to_string(), Value::String(module_path.to_string()));
        }
        if let Some(file) = meta.file() {
            fields.insert("file".to_string(), Value::String(file.to_string()));
        }
        if let Some(line) = meta.line() {
            fields.insert("line".to_string(), Value::from(line));
        }

        let level = meta.level().to_string().to_ascii_lowercase();
        self.client
            .log(&level, message.as_deref().unwrap_or_default(), fields, None);
    }
}

fn is_own_target(target: &str) -> bool {
    target == SELF_TARGET
        || target
            .strip_prefix(SELF_TARGET)
            .map_or(false, |rest| rest.starts_with("::"))
}

pub struct FieldVisitor<'a> {
    pub fields: &'a mut Metadata,
    pub message: &'a mut Option<String>,
}

impl<'a> Visit for FieldVisitor<'a> {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            *self.message = Some(value.to_string());
        } else {
            self.fields.insert(field.name().to_string(), Value::String(value.to_string()));
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.fields.insert(field.name().to_string(), Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.fields.insert(field.name().to_string(), Value::from(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.fields.insert(field.name().to_string(), Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.fields.insert(field.name().to_string(), Value::from(value));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            *self.message = Some(format!("{:?}", value));
        } else {
            self.fields.insert(field.name().to_string(), Value::String(format!("{:?}", value)));
        }
    }
}
