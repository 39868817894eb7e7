use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use uuid::Uuid;

/// Structured key/value payload attached to a [`LogEntry`].
pub type Metadata = BTreeMap<String, Value>;

pub const REQUEST_ID_KEY: &str = "requestId";
pub const SOURCE_KEY: &str = "source";
pub const SOURCE_ID_KEY: &str = "sourceId";

/// Last-resort source label when nothing else is configured.
pub const FALLBACK_SOURCE: &str = "unknown";

/// A single log record as it is buffered and shipped to `/logs`.
///
/// Entries are immutable once they enter the buffer. `metadata` always
/// holds a `requestId` and never holds a `source` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub source: String,
    pub level: String,
    pub message: String,
    pub metadata: Metadata,
}

impl LogEntry {
    /// Correlation id stored under `metadata.requestId`, rendered as text.
    pub fn request_id(&self) -> String {
        self.metadata
            .get(REQUEST_ID_KEY)
            .map(value_to_string)
            .unwrap_or_default()
    }
}

/// Identity of this client as registered with the remote service, as
/// returned by `GET /validate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceInfo {
    pub id: String,
    pub name: String,
    pub user_id: String,
}

/// Turns caller input into a [`LogEntry`].
///
/// Source precedence, highest first: explicit argument, `metadata.source`,
/// the resolved [`SourceInfo::name`], the configured default, then
/// [`FALLBACK_SOURCE`]. Empty values are skipped at every step.
#[derive(Debug, Clone)]
pub struct EntryBuilder {
    default_source: String,
}

impl EntryBuilder {
    pub fn new(default_source: impl Into<String>) -> Self {
        Self {
            default_source: default_source.into(),
        }
    }

    pub fn build(
        &self,
        level: &str,
        message: &str,
        mut metadata: Metadata,
        explicit_source: Option<&str>,
        resolved: Option<&SourceInfo>,
    ) -> LogEntry {
        let metadata_source = metadata
            .remove(SOURCE_KEY)
            .map(|v| value_to_string(&v))
            .filter(|s| !s.is_empty());

        let source = explicit_source
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .or(metadata_source)
            .or_else(|| {
                resolved
                    .map(|info| info.name.clone())
                    .filter(|s| !s.is_empty())
            })
            .or_else(|| Some(self.default_source.clone()).filter(|s| !s.is_empty()))
            .unwrap_or_else(|| FALLBACK_SOURCE.to_string());

        let has_request_id = metadata
            .get(REQUEST_ID_KEY)
            .map_or(false, |v| !v.is_null() && v.as_str() != Some(""));
        if !has_request_id {
            metadata.insert(
                REQUEST_ID_KEY.to_string(),
                Value::String(Uuid::new_v4().to_string()),
            );
        }

        if let Some(info) = resolved {
            metadata.insert(SOURCE_ID_KEY.to_string(), Value::String(info.id.clone()));
        }

        LogEntry {
            timestamp: Utc::now(),
            source,
            level: level.to_string(),
            message: message.to_string(),
            metadata,
        }
    }
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
