//! JSON document backend.

use serde_json::Value;

use super::{non_empty_str, DocComments, DocumentBackend};
use crate::error::Result;

/// Backend for `.json` files.
///
/// JSON has no comment syntax, so decorated saves degrade to pretty-printed
/// structure; header and doc lines are dropped.
#[derive(Debug, Default)]
pub struct JsonBackend;

impl DocumentBackend for JsonBackend {
    fn name(&self) -> &str {
        "json"
    }

    fn extensions(&self) -> &[&str] {
        &["json"]
    }

    fn decode(&self, bytes: &[u8]) -> Result<Option<Value>> {
        let Some(text) = non_empty_str(bytes) else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_str(&text)?))
    }

    fn encode_simple(&self, tree: &Value) -> Result<String> {
        let mut out = serde_json::to_string_pretty(tree)?;
        out.push('\n');
        Ok(out)
    }

    fn encode_decorated(&self, tree: &Value, _docs: &DocComments) -> Result<String> {
        self.encode_simple(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_input_is_distinct_from_empty_object() {
        let b = JsonBackend;
        assert!(b.decode(b"").unwrap().is_none());
        assert!(b.decode(b"  \n\t").unwrap().is_none());
        assert_eq!(b.decode(b"{}").unwrap(), Some(json!({})));
    }

    #[test]
    fn decode_failure_is_an_error() {
        assert!(JsonBackend.decode(b"{ not json").is_err());
    }

    #[test]
    fn encode_preserves_key_order() {
        let tree = serde_json::from_str::<Value>(r#"{"zeta":1,"alpha":2}"#).unwrap();
        let out = JsonBackend.encode_simple(&tree).unwrap();
        assert!(out.find("zeta").unwrap() < out.find("alpha").unwrap());
    }
}
