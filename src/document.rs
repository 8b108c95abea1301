//! On-disk task document format.
//!
//! A document is a YAML metadata header fenced by `---` lines, a blank
//! separator line, then the free-form contents:
//!
//! ```text
//! ---
//! title: Write docs
//! ---
//!
//! Body text.
//! ```

use crate::types::{Meta, TaskError};
use eyre::{Context, Result};

/// Marker line that opens and closes the metadata header.
pub const DELIMITER: &str = "---";

/// Render metadata and contents as a task document.
pub fn encode(meta: &Meta, contents: &str) -> Result<String> {
    let mut header = if meta.is_empty() {
        String::new()
    } else {
        serde_yaml::to_string(meta).context("Failed to serialize task metadata")?
    };
    if !header.is_empty() && !header.ends_with('\n') {
        header.push('\n');
    }

    Ok(format!("{DELIMITER}\n{header}{DELIMITER}\n\n{contents}"))
}

/// Split a task document into its metadata and contents.
///
/// Only blank lines may precede the opening delimiter. A document without a
/// closing delimiter is all header and decodes with empty contents.
pub fn decode(text: &str) -> Result<(Meta, String), TaskError> {
    let mut offset = 0;
    let mut header_start = None;
    let mut header_end = None;

    for line in text.split_inclusive('\n') {
        let line_start = offset;
        offset += line.len();

        if is_delimiter(line) {
            if header_start.is_none() {
                header_start = Some(offset);
            } else {
                header_end = Some((line_start, offset));
                break;
            }
        } else if header_start.is_none() && !line.trim().is_empty() {
            return Err(TaskError::MalformedDocument(
                "text before the opening `---` line".to_string(),
            ));
        }
    }

    let header_start =
        header_start.ok_or_else(|| TaskError::MalformedDocument("missing opening `---` line".to_string()))?;

    let (header, contents) = match header_end {
        Some((end, body_start)) => (&text[header_start..end], strip_separator(&text[body_start..])),
        None => (&text[header_start..], ""),
    };

    Ok((parse_meta(header)?, contents.to_string()))
}

/// Parse a YAML mapping. Blank input and a bare `null` yield an empty mapping.
pub fn parse_meta(yaml: &str) -> Result<Meta, TaskError> {
    if yaml.trim().is_empty() {
        return Ok(Meta::new());
    }

    serde_yaml::from_str::<Option<Meta>>(yaml)
        .map(Option::unwrap_or_default)
        .map_err(|e| TaskError::MalformedDocument(e.to_string()))
}

fn is_delimiter(line: &str) -> bool {
    line.trim_end_matches(|c| c == '\n' || c == '\r') == DELIMITER
}

fn strip_separator(body: &str) -> &str {
    body.strip_prefix("\r\n")
        .or_else(|| body.strip_prefix('\n'))
        .unwrap_or(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Value;

    fn sample_meta() -> Meta {
        let mut meta = Meta::new();
        meta.insert("title".to_string(), Value::from("Write docs"));
        meta.insert("priority".to_string(), Value::Integer(2));
        meta
    }

    #[test]
    fn test_encode_layout() {
        let doc = encode(&sample_meta(), "Body").unwrap();
        assert_eq!(doc, "---\npriority: 2\ntitle: Write docs\n---\n\nBody");
    }

    #[test]
    fn test_encode_empty_meta() {
        let doc = encode(&Meta::new(), "x").unwrap();
        assert_eq!(doc, "---\n---\n\nx");
    }

    #[test]
    fn test_roundtrip_preserves_contents_exactly() {
        let contents = "\nfirst line\n\n  indented --- not a marker\n---x\ntrailing\n\n";
        let doc = encode(&sample_meta(), contents).unwrap();
        let (meta, decoded) = decode(&doc).unwrap();
        assert_eq!(meta, sample_meta());
        assert_eq!(decoded, contents);
    }

    #[test]
    fn test_roundtrip_nested_meta() {
        let mut inner = Meta::new();
        inner.insert("name".to_string(), Value::from("sam"));
        let mut meta = Meta::new();
        meta.insert("owner".to_string(), Value::Mapping(inner));
        meta.insert(
            "tags".to_string(),
            Value::Sequence(vec![Value::from("a"), Value::Bool(true), Value::Float(0.5)]),
        );

        let (decoded, contents) = decode(&encode(&meta, "").unwrap()).unwrap();
        assert_eq!(decoded, meta);
        assert_eq!(contents, "");
    }

    #[test]
    fn test_decode_hand_written() {
        let (meta, contents) = decode("---\ntitle: Foo\nstatus: open\n---\n\nline one\nline two").unwrap();
        assert_eq!(meta["title"], Value::from("Foo"));
        assert_eq!(meta["status"], Value::from("open"));
        assert_eq!(contents, "line one\nline two");
    }

    #[test]
    fn test_decode_crlf() {
        let (meta, contents) = decode("---\r\ntitle: Foo\r\n---\r\n\r\nbody\r\n").unwrap();
        assert_eq!(meta["title"], Value::from("Foo"));
        assert_eq!(contents, "body\r\n");
    }

    #[test]
    fn test_decode_leading_blank_lines_allowed() {
        let (meta, _) = decode("\n\n---\na: 1\n---\n").unwrap();
        assert_eq!(meta["a"], Value::Integer(1));
    }

    #[test]
    fn test_decode_without_closing_delimiter() {
        let (meta, contents) = decode("---\ntitle: Foo\n").unwrap();
        assert_eq!(meta["title"], Value::from("Foo"));
        assert_eq!(contents, "");
    }

    #[test]
    fn test_decode_missing_opening_delimiter() {
        let result = decode("title: Foo\n");
        assert!(matches!(result, Err(TaskError::MalformedDocument(_))));
    }

    #[test]
    fn test_decode_invalid_yaml() {
        let result = decode("---\ntitle: [unclosed\n---\n\nbody");
        assert!(matches!(result, Err(TaskError::MalformedDocument(_))));
    }

    #[test]
    fn test_decode_non_mapping_header() {
        let result = decode("---\n- one\n- two\n---\n\nbody");
        assert!(matches!(result, Err(TaskError::MalformedDocument(_))));
    }

    #[test]
    fn test_decode_body_keeps_later_delimiters() {
        let (_, contents) = decode("---\na: 1\n---\n\nabove\n---\nbelow").unwrap();
        assert_eq!(contents, "above\n---\nbelow");
    }

    #[test]
    fn test_parse_meta_null_is_empty() {
        assert!(parse_meta("~\n").unwrap().is_empty());
        assert!(parse_meta("   \n").unwrap().is_empty());
    }
}
