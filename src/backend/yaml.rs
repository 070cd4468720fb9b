//! YAML document backend.
//!
//! Simple saves go through `serde_yaml`. Decorated saves are rendered by
//! hand for comment placement; scalar and flow values are rendered as JSON,
//! which YAML accepts verbatim, so the output always decodes back exactly.

use std::fmt::Write;

use serde_json::Value;

use super::{non_empty_str, DocComments, DocumentBackend, KeyDocs};
use crate::error::{PersistError, Result};

/// Backend for `.yaml` / `.yml` files.
#[derive(Debug, Default)]
pub struct YamlBackend;

impl DocumentBackend for YamlBackend {
    fn name(&self) -> &str {
        "yaml"
    }

    fn extensions(&self) -> &[&str] {
        &["yaml", "yml"]
    }

    fn decode(&self, bytes: &[u8]) -> Result<Option<Value>> {
        let Some(text) = non_empty_str(bytes) else {
            return Ok(None);
        };
        let value: Value = serde_yaml::from_str(&text)?;
        if value.is_null() {
            // Comment-only documents decode to null; there is no data.
            return Ok(None);
        }
        Ok(Some(value))
    }

    fn encode_simple(&self, tree: &Value) -> Result<String> {
        Ok(serde_yaml::to_string(tree)?)
    }

    fn encode_decorated(&self, tree: &Value, docs: &DocComments) -> Result<String> {
        let Value::Object(map) = tree else {
            return Err(PersistError::InvalidRoot);
        };

        let mut out = String::new();
        if !docs.header.is_empty() {
            for line in &docs.header {
                let _ = writeln!(out, "# {line}");
            }
            out.push('\n');
        }
        emit_map(&mut out, 0, map, docs)?;
        Ok(out)
    }
}

fn emit_map(
    out: &mut String,
    indent: usize,
    map: &serde_json::Map<String, Value>,
    docs: &DocComments,
) -> Result<()> {
    let pad = " ".repeat(indent);
    for (key, value) in map {
        let entry = docs.entry(key);
        emit_decoration(out, &pad, entry);
        match value {
            Value::Object(sub) if sub.is_empty() => {
                let _ = writeln!(out, "{pad}{}: {{}}", yaml_key(key));
            }
            Value::Object(sub) => {
                let _ = writeln!(out, "{pad}{}:", yaml_key(key));
                let nested = entry.and_then(|e| e.nested.as_ref());
                let empty = DocComments::default();
                emit_map(out, indent + 2, sub, nested.unwrap_or(&empty))?;
            }
            Value::Array(items) => {
                let _ = writeln!(out, "{pad}{}:", yaml_key(key));
                for item in items {
                    let _ = writeln!(out, "{pad}- {}", flow(item)?);
                }
            }
            scalar => {
                let _ = writeln!(out, "{pad}{}: {}", yaml_key(key), flow(scalar)?);
            }
        }
    }
    Ok(())
}

fn emit_decoration(out: &mut String, pad: &str, entry: Option<&KeyDocs>) {
    let Some(entry) = entry else {
        return;
    };
    if entry.group_start && !out.is_empty() && !out.ends_with("\n\n") {
        out.push('\n');
    }
    for line in &entry.lines {
        let _ = writeln!(out, "{pad}# {line}");
    }
}

// JSON scalars are valid YAML flow values; strings always come out quoted,
// which sidesteps every plain-scalar ambiguity ("yes", "1.0", "~", ...).
fn flow(value: &Value) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

fn yaml_key(key: &str) -> String {
    let plain = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.');
    if plain {
        key.to_string()
    } else {
        format!("\"{}\"", key.escape_default())
    }
}
