//! The contract every persisted config object exposes to the engine.

use serde_json::Value;

use crate::{error::PersistError, field::FieldDescriptor};

/// Capability a configuration object exposes to the persistence lifecycle.
///
/// This is the explicit-registration rendition of annotation-driven field
/// metadata: instead of the engine reflecting over the type, the type hands
/// out its own ordered field list plus keyed accessors.
///
/// # Field order
///
/// [`fields`](Self::fields) must return descriptors in declaration order.
/// A type that embeds a "base" configuration struct must splice the base's
/// fields *first*, so embedded/ancestor fields are enumerated before the
/// type's own — the order the saved document renders them in.
///
/// Fields that should never be persisted (runtime-only state, shared values)
/// are simply not listed.
///
/// # Accessors
///
/// [`get`](Self::get) and [`set`](Self::set) serve non-section fields by
/// resolved key. [`section`](Self::section) / [`section_mut`](Self::section_mut)
/// serve section fields by *field* key and return the nested object, which is
/// itself a `Persisted` implementation of arbitrary depth. Self-referential
/// object graphs are not supported.
pub trait Persisted {
    /// Ordered descriptors for every persisted field, embedded-base first.
    fn fields(&self) -> Vec<FieldDescriptor>;

    /// Current value of a non-section field, or `None` if the key is unknown
    /// or the field currently has no value (omitted from the saved document).
    fn get(&self, key: &str) -> Option<Value>;

    /// Assign a decoded (and already coerced) value to a non-section field.
    ///
    /// Implementations should reject values of the wrong shape with
    /// [`PersistError::TypeMismatch`]; the engine absorbs the error, logs it,
    /// and leaves the field's prior value in place.
    fn set(&mut self, key: &str, value: Value) -> Result<(), PersistError>;

    /// Nested object behind a section field, by field key.
    fn section(&self, key: &str) -> Option<&dyn Persisted> {
        let _ = key;
        None
    }

    /// Mutable nested object behind a section field, by field key.
    fn section_mut(&mut self, key: &str) -> Option<&mut dyn Persisted> {
        let _ = key;
        None
    }

    /// Class-level header comment block for decorated saves.
    fn header_docs(&self) -> Vec<String> {
        Vec::new()
    }

    /// Post-load hook, invoked once after every successful `load_initial` or
    /// `reload` population. Never invoked on the error/empty fallback paths.
    fn after_load(&mut self) {}
}
