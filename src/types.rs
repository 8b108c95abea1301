//! Core data types for taskdoc.

use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Task metadata: an open-schema mapping from keys to values.
pub type Meta = BTreeMap<String, Value>;

/// A single metadata value.
///
/// Integers and floats are distinct variants, so `1` and `1.0` never compare
/// equal.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Sequence(Vec<Value>),
    Mapping(Meta),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Meta> {
        match self {
            Value::Mapping(map) => Some(map),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<Vec<Value>> for Value {
    fn from(values: Vec<Value>) -> Self {
        Value::Sequence(values)
    }
}

impl From<Meta> for Value {
    fn from(map: Meta) -> Self {
        Value::Mapping(map)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Integer(n) => serializer.serialize_i64(*n),
            Value::Float(n) => serializer.serialize_f64(*n),
            Value::String(s) => serializer.serialize_str(s),
            Value::Sequence(values) => {
                let mut seq = serializer.serialize_seq(Some(values.len()))?;
                for value in values {
                    seq.serialize_element(value)?;
                }
                seq.end()
            }
            Value::Mapping(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (key, value) in map {
                    out.serialize_entry(key, value)?;
                }
                out.end()
            }
        }
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a scalar, sequence or mapping")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Value, E> {
        Ok(Value::Integer(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Value, E> {
        // Out-of-range unsigned values degrade to floats rather than failing.
        Ok(i64::try_from(v).map(Value::Integer).unwrap_or(Value::Float(v as f64)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Value, E> {
        Ok(Value::Float(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Value, E> {
        Ok(Value::String(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Value, E> {
        Ok(Value::String(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        Value::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        let mut values = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(value) = seq.next_element()? {
            values.push(value);
        }
        Ok(Value::Sequence(values))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Value, A::Error> {
        let mut map = Meta::new();
        while let Some((key, value)) = access.next_entry::<String, Value>()? {
            map.insert(key, value);
        }
        Ok(Value::Mapping(map))
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

/// A stored unit of work.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    /// Location relative to the store root; unique within a store.
    pub path: String,

    /// Open-schema metadata header.
    pub meta: Meta,

    /// Free-form body text.
    pub contents: String,
}

impl Task {
    pub fn new(path: impl Into<String>, meta: Meta, contents: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            meta,
            contents: contents.into(),
        }
    }

    /// The `title` metadata entry, if it is a string.
    pub fn title(&self) -> Option<&str> {
        self.meta.get("title").and_then(Value::as_str)
    }
}

/// A markdown-style `[title](target)` reference found in task contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub title: String,
    pub target: String,
}

/// Errors raised by taskdoc operations.
#[derive(Debug)]
pub enum TaskError {
    /// No task document exists at the given path.
    NotFound(String),
    /// Filesystem failure.
    Io { path: PathBuf, source: std::io::Error },
    /// A document whose header cannot be parsed.
    MalformedDocument(String),
    /// A `key=value` or JSON attribute that cannot be parsed.
    InvalidAttribute(String),
    /// A path that escapes the store root or is not valid UTF-8.
    InvalidPath(String),
    /// A title that cannot be turned into a task path.
    InvalidTitle(String),
    /// The external editor could not be run or failed.
    Editor(String),
}

impl fmt::Display for TaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskError::NotFound(path) => write!(f, "task not found: {}", path),
            TaskError::Io { path, source } => write!(f, "i/o error on {}: {}", path.display(), source),
            TaskError::MalformedDocument(reason) => write!(f, "malformed document: {}", reason),
            TaskError::InvalidAttribute(input) => write!(f, "invalid attribute: {}", input),
            TaskError::InvalidPath(path) => write!(f, "invalid task path: {}", path),
            TaskError::InvalidTitle(reason) => write!(f, "invalid title: {}", reason),
            TaskError::Editor(reason) => write!(f, "editor error: {}", reason),
        }
    }
}

impl std::error::Error for TaskError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TaskError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_from_yaml_scalars() {
        let meta: Meta = serde_yaml::from_str("a: 1\nb: 1.5\nc: true\nd: text\ne: ~\n").unwrap();
        assert_eq!(meta["a"], Value::Integer(1));
        assert_eq!(meta["b"], Value::Float(1.5));
        assert_eq!(meta["c"], Value::Bool(true));
        assert_eq!(meta["d"], Value::from("text"));
        assert_eq!(meta["e"], Value::Null);
    }

    #[test]
    fn test_value_from_yaml_nested() {
        let meta: Meta = serde_yaml::from_str("tags: [a, b]\nowner:\n  name: sam\n  age: 40\n").unwrap();
        assert_eq!(
            meta["tags"],
            Value::Sequence(vec![Value::from("a"), Value::from("b")])
        );
        let owner = meta["owner"].as_mapping().unwrap();
        assert_eq!(owner["name"], Value::from("sam"));
        assert_eq!(owner["age"], Value::Integer(40));
    }

    #[test]
    fn test_value_from_json() {
        let meta: Meta = serde_json::from_str(r#"{"n": 3, "list": ["x"], "nested": {"ok": false}}"#).unwrap();
        assert_eq!(meta["n"], Value::Integer(3));
        assert_eq!(meta["list"], Value::Sequence(vec![Value::from("x")]));
        assert_eq!(meta["nested"].as_mapping().unwrap()["ok"], Value::Bool(false));
    }

    #[test]
    fn test_integer_and_float_differ() {
        assert_ne!(Value::Integer(1), Value::Float(1.0));
    }

    #[test]
    fn test_task_title() {
        let mut meta = Meta::new();
        meta.insert("title".to_string(), Value::from("Write docs"));
        let task = Task::new("Write_docs.md", meta, "");
        assert_eq!(task.title(), Some("Write docs"));
    }

    #[test]
    fn test_error_display() {
        assert_eq!(TaskError::NotFound("a.md".into()).to_string(), "task not found: a.md");
        assert_eq!(
            TaskError::InvalidAttribute("=x".into()).to_string(),
            "invalid attribute: =x"
        );
    }
}
