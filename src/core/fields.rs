//! Field sets: the key/value data carried by one log line
//!
//! A [`FieldSet`] maps keys to [`FieldValue`]s behind a single per-instance
//! lock. Eight keys are reserved for the logging machinery and can only be
//! written from inside the crate; [`FieldSet::try_set`] rejects them.

use super::error::{LoggerError, Result};
use super::field_value::{ErrorValue, FieldValue};
use super::log_level::LogLevel;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// Reserved field keys.
pub mod keys {
    pub const TIME: &str = "time";
    pub const MESSAGE: &str = "message";
    pub const LOG_LEVEL: &str = "loglevel";
    pub const ERROR: &str = "error";
    pub const FRAMES: &str = "frames";
    pub const FILE: &str = "file";
    pub const LINE: &str = "line";
    pub const FUNC: &str = "func";

    pub const RESERVED: [&str; 8] = [TIME, MESSAGE, LOG_LEVEL, ERROR, FRAMES, FILE, LINE, FUNC];
}

/// Returns true if `key` is owned by the logging machinery.
pub fn is_reserved(key: &str) -> bool {
    keys::RESERVED.contains(&key)
}

#[derive(Default)]
pub struct FieldSet {
    fields: RwLock<HashMap<String, FieldValue>>,
}

impl FieldSet {
    pub fn new() -> Self {
        Self {
            fields: RwLock::new(HashMap::new()),
        }
    }

    /// Write a field unconditionally, reserved keys included.
    pub(crate) fn set(&self, key: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.write().insert(key.into(), value.into());
    }

    /// Set a custom field.
    ///
    /// Fails with [`LoggerError::ReservedKey`] if `key` is reserved.
    pub fn try_set(&self, key: impl Into<String>, value: impl Into<FieldValue>) -> Result<()> {
        let key = key.into();
        if is_reserved(&key) {
            return Err(LoggerError::reserved_key(key));
        }
        self.set(key, value);
        Ok(())
    }

    /// Builder-style [`try_set`](Self::try_set).
    pub fn try_with(self, key: impl Into<String>, value: impl Into<FieldValue>) -> Result<Self> {
        self.try_set(key, value)?;
        Ok(self)
    }

    pub fn get(&self, key: &str) -> Option<FieldValue> {
        self.fields.read().get(key).cloned()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.read().contains_key(key)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.read().is_empty()
    }

    /// A new set holding only the non-reserved fields.
    pub fn user_fields(&self) -> FieldSet {
        let custom = self
            .fields
            .read()
            .iter()
            .filter(|(key, _)| !is_reserved(key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        FieldSet {
            fields: RwLock::new(custom),
        }
    }

    /// All fields sorted by key.
    pub fn entries(&self) -> Vec<(String, FieldValue)> {
        let mut entries: Vec<_> = self
            .fields
            .read()
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    /// Visit every field until the visitor returns `false`.
    ///
    /// The visitor runs over a snapshot taken under the lock, so it may touch
    /// this set without deadlocking. Fails with
    /// [`LoggerError::InvalidVisitor`] if no visitor is given.
    pub fn for_each<F>(&self, visitor: Option<F>) -> Result<()>
    where
        F: FnMut(&str, &FieldValue) -> bool,
    {
        let mut visitor = visitor.ok_or(LoggerError::InvalidVisitor)?;
        for (key, value) in self.entries() {
            if !visitor(&key, &value) {
                break;
            }
        }
        Ok(())
    }

    /// Copy every non-reserved field of `other` into this set.
    pub(crate) fn merge_user_fields(&self, other: &FieldSet) {
        if std::ptr::eq(self, other) {
            return;
        }
        let incoming = other.user_fields().into_map();
        self.fields.write().extend(incoming);
    }

    fn into_map(self) -> HashMap<String, FieldValue> {
        self.fields.into_inner()
    }

    /// Timestamp of the event, or the Unix epoch when absent.
    pub fn time(&self) -> DateTime<Utc> {
        match self.get(keys::TIME) {
            Some(FieldValue::Time(t)) => t,
            _ => DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    /// Message of the event, or an empty string when absent.
    pub fn message(&self) -> String {
        self.string_field(keys::MESSAGE)
    }

    /// Level of the event, or `LogLevel::NONE` when absent.
    pub fn level(&self) -> LogLevel {
        match self.get(keys::LOG_LEVEL) {
            Some(FieldValue::Level(l)) => l,
            _ => LogLevel::NONE,
        }
    }

    pub fn error(&self) -> Option<ErrorValue> {
        match self.get(keys::ERROR) {
            Some(FieldValue::Error(e)) => Some(e),
            _ => None,
        }
    }

    /// Captured stack frames, empty when absent.
    pub fn frames(&self) -> Vec<FieldSet> {
        match self.get(keys::FRAMES) {
            Some(FieldValue::Frames(frames)) => frames,
            _ => Vec::new(),
        }
    }

    pub fn file(&self) -> String {
        self.string_field(keys::FILE)
    }

    /// Line number, or 0 when absent.
    pub fn line(&self) -> u32 {
        self.get(keys::LINE)
            .and_then(|v| v.as_i64())
            .and_then(|l| u32::try_from(l).ok())
            .unwrap_or(0)
    }

    pub fn func(&self) -> String {
        self.string_field(keys::FUNC)
    }

    fn string_field(&self, key: &str) -> String {
        match self.get(key) {
            Some(FieldValue::String(s)) => s,
            _ => String::new(),
        }
    }
}

impl Clone for FieldSet {
    /// Snapshot copy into an independent set.
    fn clone(&self) -> Self {
        Self {
            fields: RwLock::new(self.fields.read().clone()),
        }
    }
}

impl PartialEq for FieldSet {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other) || self.entries() == other.entries()
    }
}

impl fmt::Debug for FieldSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries()).finish()
    }
}

impl Serialize for FieldSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let entries = self.entries();
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (key, value) in &entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Reads back what [`Serialize`] writes, so a JSON event can be parsed into
/// a field set.
///
/// Reserved keys regain their types: `time` as a timestamp, `loglevel` as a
/// level, `error` as an error value. Arrays of objects become frame
/// sequences; other values map through [`FieldValue::from_json`].
impl<'de> Deserialize<'de> for FieldSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let map = serde_json::Map::<String, serde_json::Value>::deserialize(deserializer)?;
        Ok(FieldSet::from_json_map(map))
    }
}

impl FieldSet {
    fn from_json_map(map: serde_json::Map<String, serde_json::Value>) -> Self {
        let fields = FieldSet::new();
        for (key, value) in map {
            let value = decode_field(&key, value);
            fields.set(key, value);
        }
        fields
    }
}

fn decode_field(key: &str, value: serde_json::Value) -> FieldValue {
    use serde_json::Value;
    match (key, value) {
        (keys::TIME, Value::String(text)) => match DateTime::parse_from_rfc3339(&text) {
            Ok(time) => FieldValue::Time(time.with_timezone(&Utc)),
            Err(_) => FieldValue::String(text),
        },
        (keys::LOG_LEVEL, Value::String(text)) => match text.parse::<LogLevel>() {
            Ok(level) => FieldValue::Level(level),
            Err(_) => FieldValue::String(text),
        },
        (keys::ERROR, Value::String(text)) => FieldValue::Error(ErrorValue::msg(text)),
        (_, Value::Array(items)) if !items.is_empty() && items.iter().all(Value::is_object) => {
            let frames = items
                .into_iter()
                .filter_map(|item| match item {
                    Value::Object(map) => Some(FieldSet::from_json_map(map)),
                    _ => None,
                })
                .collect::<Vec<_>>();
            FieldValue::Frames(frames)
        }
        (_, other) => FieldValue::from_json(other),
    }
}
