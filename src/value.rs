//! Typed extraction helpers over the interchange value tree.
//!
//! The tree itself is [`serde_json::Value`] (re-exported at the crate root).
//! These helpers let [`Persisted::set`](crate::Persisted::set) implementations
//! pull a concrete Rust value out of a decoded scalar, producing a
//! [`PersistError::TypeMismatch`] with the field key when the shapes disagree.

use serde_json::Value;

use crate::error::PersistError;

fn mismatch(key: &str, expected: &'static str, actual: &Value) -> PersistError {
    PersistError::TypeMismatch {
        key: key.to_string(),
        expected,
        actual: actual.to_string(),
    }
}

/// Extract a string value.
pub fn require_str(key: &str, value: &Value) -> Result<String, PersistError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        other => Err(mismatch(key, "string", other)),
    }
}

/// Extract a boolean value.
pub fn require_bool(key: &str, value: &Value) -> Result<bool, PersistError> {
    match value {
        Value::Bool(b) => Ok(*b),
        other => Err(mismatch(key, "boolean", other)),
    }
}

/// Extract a signed integer value.
pub fn require_i64(key: &str, value: &Value) -> Result<i64, PersistError> {
    match value {
        Value::Number(n) => n.as_i64().ok_or_else(|| mismatch(key, "integer", value)),
        other => Err(mismatch(key, "integer", other)),
    }
}

/// Extract an unsigned integer value.
pub fn require_u64(key: &str, value: &Value) -> Result<u64, PersistError> {
    match value {
        Value::Number(n) => n.as_u64().ok_or_else(|| mismatch(key, "unsigned integer", value)),
        other => Err(mismatch(key, "unsigned integer", other)),
    }
}

/// Extract a floating-point value.
pub fn require_f64(key: &str, value: &Value) -> Result<f64, PersistError> {
    match value {
        Value::Number(n) => n.as_f64().ok_or_else(|| mismatch(key, "number", value)),
        other => Err(mismatch(key, "number", other)),
    }
}

/// Extract a sequence of string elements.
pub fn require_str_seq(key: &str, value: &Value) -> Result<Vec<String>, PersistError> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| require_str(key, item))
            .collect(),
        other => Err(mismatch(key, "array", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn string_extraction() {
        assert_eq!(require_str("k", &json!("hello")).unwrap(), "hello");
        assert!(require_str("k", &json!(1)).is_err());
    }

    #[test]
    fn numeric_extraction() {
        assert_eq!(require_i64("k", &json!(-5)).unwrap(), -5);
        assert_eq!(require_u64("k", &json!(5)).unwrap(), 5);
        assert!(require_u64("k", &json!(-5)).is_err());
        assert_eq!(require_f64("k", &json!(1.5)).unwrap(), 1.5);
    }

    #[test]
    fn mismatch_names_key() {
        let err = require_bool("enabled", &json!("yes")).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("enabled"), "{msg}");
        assert!(msg.contains("boolean"), "{msg}");
    }
}
