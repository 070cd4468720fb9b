//! Pluggable document backends.
//!
//! A backend owns the text grammar of one format and nothing else: it turns
//! file bytes into the interchange [`Value`] tree and renders a tree (plus
//! optional decoration) back into text. The lifecycle controller never
//! touches format syntax, and backends never see field descriptors — they
//! receive the already-flattened [`DocComments`] model instead.
//!
//! ## Built-in backends
//!
//! - [`json::JsonBackend`] — `.json`
//! - [`toml::TomlBackend`] — `.toml`, `.tml`
//! - [`yaml::YamlBackend`] — `.yaml`, `.yml`
//! - [`properties::PropertiesBackend`] — `.properties`

use serde_json::Value;

use crate::error::Result;

pub mod json;
pub mod properties;
pub mod toml;
pub mod yaml;

/// Documentation attached to the keys of one mapping level.
///
/// Mirrors the document structure: `entries` are in key render order, and a
/// section entry carries the decoration of its nested level.
#[derive(Debug, Clone, Default)]
pub struct DocComments {
    /// Class-level header comment block (root level only).
    pub header: Vec<String>,
    /// Per-key decoration, in render order.
    pub entries: Vec<KeyDocs>,
}

impl DocComments {
    /// Look up the decoration for a key at this level.
    pub fn entry(&self, key: &str) -> Option<&KeyDocs> {
        self.entries.iter().find(|e| e.key == key)
    }
}

/// Decoration for one key.
#[derive(Debug, Clone, Default)]
pub struct KeyDocs {
    /// Document key the decoration belongs to.
    pub key: String,
    /// Comment lines rendered immediately above the key.
    pub lines: Vec<String>,
    /// Whether a blank separator line precedes the key.
    pub group_start: bool,
    /// Decoration of the nested level, for section keys.
    pub nested: Option<DocComments>,
}

/// Format-specific decode/encode capability.
///
/// Implementations must preserve mapping key order on encode, and must report
/// `Ok(None)` from [`decode`](Self::decode) only for genuinely
/// empty/whitespace-only input — a parsed document with zero entries is
/// `Ok(Some(_))`.
pub trait DocumentBackend: std::fmt::Debug + Send + Sync {
    /// Short format name, used in log messages.
    fn name(&self) -> &str;

    /// Lowercase file extensions this backend serves.
    fn extensions(&self) -> &[&str];

    /// Decode file bytes into a value tree, or `None` for empty input.
    fn decode(&self, bytes: &[u8]) -> Result<Option<Value>>;

    /// Render a minimal values-only document.
    fn encode_simple(&self, tree: &Value) -> Result<String>;

    /// Render a fully decorated document: header block, per-key doc comments,
    /// group separators, nested section structure.
    fn encode_decorated(&self, tree: &Value, docs: &DocComments) -> Result<String>;
}

/// Shared empty-input check: `None` means the backend must report EMPTY.
///
/// Invalid UTF-8 is replaced lossily; the format parser then reports it as a
/// decode error in its own terms.
pub(crate) fn non_empty_str(bytes: &[u8]) -> Option<std::borrow::Cow<'_, str>> {
    let text = String::from_utf8_lossy(bytes);
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}
