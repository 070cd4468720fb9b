//! Java-properties-style document backend.
//!
//! The grammar is line-oriented `key = value` with `#`/`!` comment lines.
//! Nesting has no native representation, so sections map to dotted key paths
//! (`database.pool.size = 4`) on encode and are folded back into nested
//! mappings on decode. Scalar values parse leniently: boolean, then integer,
//! then float, then plain string. Sequences round-trip as JSON array
//! literals, and strings the line grammar cannot carry verbatim (surrounding
//! whitespace, newlines, text that reads as another scalar) round-trip as
//! JSON string literals; the lenient parse recognizes both by their leading
//! bracket or quote.

use std::fmt::Write;

use serde_json::{Map, Number, Value};

use super::{non_empty_str, DocComments, DocumentBackend, KeyDocs};
use crate::error::{PersistError, Result};

/// Backend for `.properties` files.
///
/// Keys containing literal dots would alias the nesting separator and must be
/// avoided by callers.
#[derive(Debug, Default)]
pub struct PropertiesBackend;

impl DocumentBackend for PropertiesBackend {
    fn name(&self) -> &str {
        "properties"
    }

    fn extensions(&self) -> &[&str] {
        &["properties"]
    }

    fn decode(&self, bytes: &[u8]) -> Result<Option<Value>> {
        let Some(text) = non_empty_str(bytes) else {
            return Ok(None);
        };

        let mut root = Map::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }
            let Some(sep) = line.find(['=', ':']) else {
                continue;
            };
            let key = line[..sep].trim();
            let raw = line[sep + 1..].trim();
            if key.is_empty() {
                continue;
            }
            insert_dotted(&mut root, key, parse_scalar(raw));
        }
        Ok(Some(Value::Object(root)))
    }

    fn encode_simple(&self, tree: &Value) -> Result<String> {
        let Value::Object(map) = tree else {
            return Err(PersistError::InvalidRoot);
        };
        let mut out = String::new();
        flatten(&mut out, "", map, None)?;
        Ok(out)
    }

    fn encode_decorated(&self, tree: &Value, docs: &DocComments) -> Result<String> {
        let Value::Object(map) = tree else {
            return Err(PersistError::InvalidRoot);
        };
        let mut out = String::new();
        for line in &docs.header {
            let _ = writeln!(out, "# {line}");
        }
        if !docs.header.is_empty() {
            out.push('\n');
        }
        flatten(&mut out, "", map, Some(docs))?;
        Ok(out)
    }
}

fn flatten(
    out: &mut String,
    prefix: &str,
    map: &Map<String, Value>,
    docs: Option<&DocComments>,
) -> Result<()> {
    for (key, value) in map {
        let entry = docs.and_then(|d| d.entry(key));
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            Value::Object(sub) => {
                // Section break: a blank line and the section's own docs.
                if docs.is_some() && !out.is_empty() && !out.ends_with("\n\n") {
                    out.push('\n');
                }
                emit_decoration(out, entry);
                let nested = entry.and_then(|e| e.nested.as_ref());
                flatten(out, &path, sub, if docs.is_some() { Some(nested.unwrap_or(&EMPTY)) } else { None })?;
            }
            other => {
                if entry.is_some_and(|e| e.group_start) && !out.is_empty() && !out.ends_with("\n\n")
                {
                    out.push('\n');
                }
                emit_decoration(out, entry);
                let _ = writeln!(out, "{path} = {}", render_scalar(other)?);
            }
        }
    }
    Ok(())
}

static EMPTY: DocComments = DocComments {
    header: Vec::new(),
    entries: Vec::new(),
};

fn emit_decoration(out: &mut String, entry: Option<&KeyDocs>) {
    if let Some(entry) = entry {
        for line in &entry.lines {
            let _ = writeln!(out, "# {line}");
        }
    }
}

fn render_scalar(value: &Value) -> Result<String> {
    Ok(match value {
        // Strings the lenient parse would read back verbatim go out bare;
        // anything else (surrounding whitespace, control characters, or text
        // that parses as another scalar kind) goes out as a JSON string
        // literal, which the parse recognizes by its leading quote.
        Value::String(s) if plain_safe(s) => s.clone(),
        other => serde_json::to_string(other)?,
    })
}

fn plain_safe(s: &str) -> bool {
    s.trim() == s
        && !s.chars().any(|c| c.is_control())
        && !s.starts_with(['"', '['])
        && s.parse::<bool>().is_err()
        && s.parse::<i64>().is_err()
        && s.parse::<f64>().is_err()
}

// Lenient scalar parse: bool, integer, float, JSON string or array literal,
// plain string.
fn parse_scalar(raw: &str) -> Value {
    if let Ok(b) = raw.parse::<bool>() {
        return Value::Bool(b);
    }
    if let Ok(i) = raw.parse::<i64>() {
        return Value::Number(Number::from(i));
    }
    if let Ok(f) = raw.parse::<f64>() {
        if let Some(n) = Number::from_f64(f) {
            return Value::Number(n);
        }
    }
    if raw.starts_with('"') {
        if let Ok(v @ Value::String(_)) = serde_json::from_str::<Value>(raw) {
            return v;
        }
    }
    if raw.starts_with('[') {
        if let Ok(v @ Value::Array(_)) = serde_json::from_str::<Value>(raw) {
            return v;
        }
    }
    Value::String(raw.to_string())
}

fn insert_dotted(root: &mut Map<String, Value>, key: &str, value: Value) {
    let mut parts = key.split('.').peekable();
    let mut current = root;
    while let Some(part) = parts.next() {
        if parts.peek().is_none() {
            current.insert(part.to_string(), value);
            return;
        }
        let slot = current
            .entry(part.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            // A scalar already sits on this path; deeper keys win.
            *slot = Value::Object(Map::new());
        }
        let Value::Object(sub) = slot else {
            unreachable!()
        };
        current = sub;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decode_folds_dotted_keys() {
        let text = b"name = TestServer\nport = 8080\ndatabase.host = localhost\ndatabase.port = 5432\n";
        let tree = PropertiesBackend.decode(text).unwrap().unwrap();
        assert_eq!(tree["name"], json!("TestServer"));
        assert_eq!(tree["port"], json!(8080));
        assert_eq!(tree["database"]["port"], json!(5432));
    }

    #[test]
    fn lenient_scalars() {
        assert_eq!(parse_scalar("true"), json!(true));
        assert_eq!(parse_scalar("42"), json!(42));
        assert_eq!(parse_scalar("1.5"), json!(1.5));
        assert_eq!(parse_scalar("[\"a\",\"b\"]"), json!(["a", "b"]));
        assert_eq!(parse_scalar("hello world"), json!("hello world"));
    }

    #[test]
    fn comment_only_input_is_data_free_but_not_empty() {
        let b = PropertiesBackend;
        assert!(b.decode(b"  \n").unwrap().is_none());
        assert_eq!(b.decode(b"# note\n").unwrap(), Some(json!({})));
    }

    #[test]
    fn awkward_strings_round_trip_quoted() {
        let b = PropertiesBackend;
        let tree = json!({
            "padded": "  spaced out  ",
            "multiline": "first\nsecond",
            "numeric_text": "8080",
            "bool_text": "true",
            "quoted": "\"already quoted\""
        });
        let out = b.encode_simple(&tree).unwrap();
        // The multi-line value must not leak a raw newline into the grammar.
        assert!(out.lines().all(|l| l.is_empty() || l.contains('=')));
        let back = b.decode(out.as_bytes()).unwrap().unwrap();
        assert_eq!(back, tree);
    }

    #[test]
    fn encode_round_trips() {
        let tree = json!({
            "name": "TestServer",
            "tags": ["a", "b"],
            "database": { "host": "localhost", "pool": { "size": 4 } }
        });
        let out = PropertiesBackend.encode_simple(&tree).unwrap();
        assert!(out.contains("database.pool.size = 4"));
        let back = PropertiesBackend.decode(out.as_bytes()).unwrap().unwrap();
        assert_eq!(back, tree);
    }
}
