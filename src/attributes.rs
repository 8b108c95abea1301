//! Attribute input from the command line.
//!
//! Attributes arrive either as flat `key=value` pairs or as a JSON object and
//! become task metadata.

use crate::types::{Meta, TaskError, Value};

/// Parse a single `key=value` pair. The value is kept as a string and may
/// itself contain `=`.
pub fn parse_pair(input: &str) -> Result<(String, Value), TaskError> {
    let (key, value) = input
        .split_once('=')
        .ok_or_else(|| TaskError::InvalidAttribute(format!("expected KEY=VALUE, got {:?}", input)))?;

    let key = key.trim();
    if key.is_empty() {
        return Err(TaskError::InvalidAttribute(format!("empty key in {:?}", input)));
    }

    Ok((key.to_string(), Value::from(value)))
}

/// Parse a JSON object into metadata.
pub fn parse_json(input: &str) -> Result<Meta, TaskError> {
    serde_json::from_str::<Meta>(input)
        .map_err(|e| TaskError::InvalidAttribute(format!("expected a JSON object: {}", e)))
}

/// Combine flat pairs and an optional JSON object. Later entries win.
pub fn collect(pairs: &[String], json: Option<&str>) -> Result<Meta, TaskError> {
    let mut meta = Meta::new();

    for pair in pairs {
        let (key, value) = parse_pair(pair)?;
        meta.insert(key, value);
    }

    if let Some(json) = json {
        meta.extend(parse_json(json)?);
    }

    Ok(meta)
}
