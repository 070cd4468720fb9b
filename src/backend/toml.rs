//! TOML document backend.
//!
//! Decoding goes through `toml::Value` into the interchange tree; simple
//! encoding serializes the tree back with `toml::to_string_pretty`. Decorated
//! encoding is rendered by hand so `#` doc comments, group separators, and
//! `[dotted.path]` tables land where the decoration model says.

use std::fmt::Write;

use serde_json::Value;

use super::{non_empty_str, DocComments, DocumentBackend, KeyDocs};
use crate::error::{PersistError, Result};

/// Backend for `.toml` / `.tml` files.
#[derive(Debug, Default)]
pub struct TomlBackend;

impl DocumentBackend for TomlBackend {
    fn name(&self) -> &str {
        "toml"
    }

    fn extensions(&self) -> &[&str] {
        &["toml", "tml"]
    }

    fn decode(&self, bytes: &[u8]) -> Result<Option<Value>> {
        let Some(text) = non_empty_str(bytes) else {
            return Ok(None);
        };
        let value: ::toml::Value = ::toml::from_str(&text)?;
        Ok(Some(serde_json::to_value(value)?))
    }

    fn encode_simple(&self, tree: &Value) -> Result<String> {
        Ok(::toml::to_string_pretty(tree)?)
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
        emit_table(&mut out, &[], map, docs)?;
        Ok(out)
    }
}

fn emit_table(
    out: &mut String,
    prefix: &[&str],
    map: &serde_json::Map<String, Value>,
    docs: &DocComments,
) -> Result<()> {
    // TOML requires plain keys of a table before its sub-tables.
    for (key, value) in map {
        if value.is_object() {
            continue;
        }
        emit_decoration(out, docs.entry(key));
        let rendered = ::toml::Value::try_from(value)?;
        let _ = writeln!(out, "{} = {}", bare_key(key), rendered);
    }

    for (key, value) in map {
        let Value::Object(sub) = value else {
            continue;
        };
        if !out.is_empty() && !out.ends_with("\n\n") {
            out.push('\n');
        }
        let entry = docs.entry(key);
        emit_decoration(out, entry);

        let mut path: Vec<&str> = prefix.to_vec();
        path.push(key);
        let rendered: Vec<String> = path.iter().copied().map(bare_key).collect();
        let _ = writeln!(out, "[{}]", rendered.join("."));

        let nested = entry.and_then(|e| e.nested.as_ref());
        let empty = DocComments::default();
        emit_table(out, &path, sub, nested.unwrap_or(&empty))?;
    }

    Ok(())
}

fn emit_decoration(out: &mut String, entry: Option<&KeyDocs>) {
    let Some(entry) = entry else {
        return;
    };
    if entry.group_start && !out.is_empty() && !out.ends_with("\n\n") {
        out.push('\n');
    }
    for line in &entry.lines {
        let _ = writeln!(out, "# {line}");
    }
}

fn bare_key(key: &str) -> String {
    let bare = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if bare {
        key.to_string()
    } else {
        format!("\"{}\"", key.escape_default())
    }
}
