//! Generic decoded records.
//!
//! Entity readers never define per-entity structs. Every record is a [`Row`]:
//! an insertion-ordered map from a field name to a [`Value`]. Meaning is only
//! applied later, when the model builder looks fields up by name.

use chrono::{NaiveDateTime, NaiveTime};
use indexmap::IndexMap;
use uuid::Uuid;

use super::models::Duration;

/// A single decoded field.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// An absent string, date or duration.
    Null,
    String(String),
    Integer(i64),
    Double(f64),
    Boolean(bool),
    Uuid(Uuid),
    Date(NaiveDateTime),
    Time(NaiveTime),
    Duration(Duration),
    /// A region whose meaning is not known, kept exactly as read.
    Bytes(Vec<u8>),
    /// A nested table.
    Rows(Vec<Row>),
}

impl From<Option<String>> for Value {
    fn from(value: Option<String>) -> Self {
        value.map_or(Value::Null, Value::String)
    }
}

impl From<Option<NaiveDateTime>> for Value {
    fn from(value: Option<NaiveDateTime>) -> Self {
        value.map_or(Value::Null, Value::Date)
    }
}

impl From<Option<Duration>> for Value {
    fn from(value: Option<Duration>) -> Self {
        value.map_or(Value::Null, Value::Duration)
    }
}

impl From<Uuid> for Value {
    fn from(value: Uuid) -> Self {
        Value::Uuid(value)
    }
}

impl From<Vec<Row>> for Value {
    fn from(value: Vec<Row>) -> Self {
        Value::Rows(value)
    }
}

/// One decoded record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    fields: IndexMap<&'static str, Value>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a field, replacing any earlier value under the same name.
    pub fn put(&mut self, name: &'static str, value: impl Into<Value>) {
        self.fields.insert(name, value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field names and values in the order they were decoded.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        self.fields.iter().map(|(name, value)| (*name, value))
    }

    pub fn get_string(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(Value::String(value)) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn get_integer(&self, name: &str) -> Option<i64> {
        match self.get(name) {
            Some(Value::Integer(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn get_double(&self, name: &str) -> Option<f64> {
        match self.get(name) {
            Some(Value::Double(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn get_bool(&self, name: &str) -> bool {
        matches!(self.get(name), Some(Value::Boolean(true)))
    }

    pub fn get_uuid(&self, name: &str) -> Option<Uuid> {
        match self.get(name) {
            Some(Value::Uuid(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn get_date(&self, name: &str) -> Option<NaiveDateTime> {
        match self.get(name) {
            Some(Value::Date(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn get_time(&self, name: &str) -> Option<NaiveTime> {
        match self.get(name) {
            Some(Value::Time(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn get_duration(&self, name: &str) -> Option<Duration> {
        match self.get(name) {
            Some(Value::Duration(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn get_bytes(&self, name: &str) -> Option<&[u8]> {
        match self.get(name) {
            Some(Value::Bytes(value)) => Some(value.as_slice()),
            _ => None,
        }
    }

    /// Rows of a nested table. A table that was absent reads as empty.
    pub fn get_rows(&self, name: &str) -> &[Row] {
        match self.get(name) {
            Some(Value::Rows(rows)) => rows.as_slice(),
            _ => &[],
        }
    }
}
