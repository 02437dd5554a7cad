//! Memory document definitions.
//!
//! Defines [`MemoryDocument`] (the whole persisted file), [`EventRecord`] (an entry in
//! the append-only interaction log) and [`TaskRecord`] (a remembered to-do item).

use chrono::{DateTime, Local, NaiveDate};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Timestamp layout written into the memory file: local time, microsecond precision.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Format a local time the way every record in the memory file stores it.
pub fn format_timestamp(time: &DateTime<Local>) -> String {
    time.naive_local().format(TIMESTAMP_FORMAT).to_string()
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// The full content of the memory file.
///
/// Both keys are always present once loaded; a file missing either one loads with
/// that list empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryDocument {
    #[serde(default)]
    pub events: Vec<EventRecord>,
    #[serde(default)]
    pub tasks: Vec<TaskRecord>,
}

/// One line of the interaction log. Never modified after it is appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// ISO 8601 local timestamp.
    pub time: String,
    /// Free-text description of what happened.
    pub event: String,
}

/// A task the user asked to be reminded of.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub task: String,
    /// ISO 8601 local timestamp. Empty when an older writer left it out.
    #[serde(default, deserialize_with = "null_as_default")]
    pub created: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub done: bool,
}

impl EventRecord {
    pub fn new(event: impl Into<String>, time: &DateTime<Local>) -> Self {
        Self {
            time: format_timestamp(time),
            event: event.into(),
        }
    }

    /// True if the event's timestamp falls on `date`.
    pub fn is_on(&self, date: NaiveDate) -> bool {
        self.time.starts_with(&date.format("%Y-%m-%d").to_string())
    }
}

impl TaskRecord {
    pub fn new(task: impl Into<String>, created: &DateTime<Local>) -> Self {
        Self {
            task: task.into(),
            created: format_timestamp(created),
            done: false,
        }
    }
}

/// Decode each element of `list` on its own, dropping the ones that do not fit.
fn decode_records<T: DeserializeOwned>(list: Option<&Value>, key: &str) -> Vec<T> {
    let items = match list {
        None | Some(Value::Null) => return Vec::new(),
        Some(Value::Array(items)) => items,
        Some(other) => {
            tracing::warn!(key, found = %other, "memory list is not an array, ignoring it");
            return Vec::new();
        }
    };

    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| match T::deserialize(item) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(key, index, error = %e, "skipping unreadable memory record");
                None
            }
        })
        .collect()
}

impl MemoryDocument {
    /// Build a document from parsed JSON, keeping every record that decodes.
    ///
    /// Returns `None` only when the top level is not an object.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        Some(Self {
            events: decode_records(object.get("events"), "events"),
            tasks: decode_records(object.get("tasks"), "tasks"),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty() && self.tasks.is_empty()
    }

    pub fn pending_tasks(&self) -> Vec<TaskRecord> {
        self.tasks.iter().filter(|t| !t.done).cloned().collect()
    }

    /// The last `n` events, oldest first.
    pub fn recent_events(&self, n: usize) -> &[EventRecord] {
        let start = self.events.len().saturating_sub(n);
        &self.events[start..]
    }

    pub fn events_on(&self, date: NaiveDate) -> Vec<String> {
        self.events
            .iter()
            .filter(|e| e.is_on(date))
            .map(|e| e.event.clone())
            .collect()
    }
}
