//! Structural walker: turns an object's declared field list into the layout
//! the lifecycle controller operates on.
//!
//! The walker is where descriptor invariants are enforced. Malformed
//! descriptors (empty keys, duplicate keys, section flags on non-nested
//! kinds) are skipped with a warning rather than failing the whole object,
//! in line with the engine's degrade-gracefully policy.

use std::collections::HashSet;

use log::warn;

use crate::{
    field::{FieldDescriptor, FieldKind},
    object::Persisted,
};

/// Partitioned field layout of one object.
#[derive(Debug, Default)]
pub struct Layout {
    /// Plain keyed fields, in enumeration order.
    pub plain: Vec<FieldDescriptor>,
    /// Section fields, in enumeration order.
    pub sections: Vec<FieldDescriptor>,
}

/// Build the layout for an object.
///
/// Enumeration order is the order `fields()` returned, which the
/// [`Persisted`] contract requires to be embedded-base-first declaration
/// order.
pub fn layout(object: &dyn Persisted) -> Layout {
    let mut out = Layout::default();
    let mut seen: HashSet<String> = HashSet::new();

    for field in object.fields() {
        if field.key().is_empty() {
            warn!("skipping field descriptor with empty key");
            continue;
        }
        if !seen.insert(field.key().to_string()) {
            warn!("skipping duplicate field key {:?}", field.key());
            continue;
        }
        if field.is_section() {
            if field.kind() != FieldKind::Nested {
                warn!(
                    "section field {:?} is not declared as a nested object, skipping",
                    field.key()
                );
                continue;
            }
            out.sections.push(field);
        } else {
            out.plain.push(field);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::NumericKind;
    use serde_json::{json, Value};

    struct Base;

    impl Base {
        fn fields() -> Vec<FieldDescriptor> {
            vec![FieldDescriptor::new("id", FieldKind::Str)]
        }
    }

    struct Derived;

    impl Persisted for Derived {
        fn fields(&self) -> Vec<FieldDescriptor> {
            let mut fields = Base::fields();
            fields.push(FieldDescriptor::new("port", FieldKind::Numeric(NumericKind::U16)));
            fields.push(FieldDescriptor::new("db", FieldKind::Nested).section("database"));
            fields.push(FieldDescriptor::new("port", FieldKind::Bool));
            fields.push(FieldDescriptor::new("broken", FieldKind::Str).section(""));
            fields
        }

        fn get(&self, _key: &str) -> Option<Value> {
            Some(json!(null))
        }

        fn set(&mut self, _key: &str, _value: Value) -> Result<(), crate::PersistError> {
            Ok(())
        }
    }

    #[test]
    fn base_fields_come_first() {
        let layout = layout(&Derived);
        let keys: Vec<&str> = layout.plain.iter().map(|f| f.key()).collect();
        assert_eq!(keys, vec!["id", "port"]);
    }

    #[test]
    fn sections_are_partitioned_out() {
        let layout = layout(&Derived);
        assert_eq!(layout.sections.len(), 1);
        assert_eq!(layout.sections[0].key(), "db");
        assert_eq!(layout.sections[0].section_name(), "database");
    }

    #[test]
    fn duplicates_and_bad_sections_are_skipped() {
        let layout = layout(&Derived);
        // Second "port" (duplicate) and "broken" (section with non-nested
        // kind) must both be dropped.
        assert_eq!(layout.plain.len() + layout.sections.len(), 3);
    }
}
