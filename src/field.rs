//! Format-neutral field descriptors.
//!
//! A [`FieldDescriptor`] is the engine's entire view of one persisted field:
//! the resolved key, the declared [`FieldKind`], documentation lines, and
//! section membership. Types hand these out from
//! [`Persisted::fields`](crate::Persisted::fields); the engine never sees the
//! Rust field itself.

/// Closed enumeration of numeric field kinds.
///
/// Coercion dispatches on this enum rather than on open-ended runtime types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericKind {
    /// 8-bit signed integer.
    I8,
    /// 16-bit signed integer.
    I16,
    /// 32-bit signed integer.
    I32,
    /// 64-bit signed integer.
    I64,
    /// 8-bit unsigned integer.
    U8,
    /// 16-bit unsigned integer.
    U16,
    /// 32-bit unsigned integer.
    U32,
    /// 64-bit unsigned integer.
    U64,
    /// 32-bit float.
    F32,
    /// 64-bit float.
    F64,
}

/// Declared semantic type of a persisted field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Numeric scalar of a specific width.
    Numeric(NumericKind),
    /// Boolean scalar.
    Bool,
    /// String scalar.
    Str,
    /// Ordered sequence.
    Seq,
    /// Key-value mapping persisted as-is (not a section).
    Map,
    /// Nested persisted object; required for section fields.
    Nested,
}

/// Format-neutral description of one persisted field.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    key: String,
    kind: FieldKind,
    docs: Vec<String>,
    section: bool,
    section_key: Option<String>,
    group_start: bool,
}

impl FieldDescriptor {
    /// Create a descriptor for the field named `name`.
    ///
    /// `name` is the field's own identifier and serves as the persistence key
    /// unless [`with_key`](Self::with_key) overrides it.
    pub fn new(name: &str, kind: FieldKind) -> Self {
        Self {
            key: name.to_string(),
            kind,
            docs: Vec::new(),
            section: false,
            section_key: None,
            group_start: false,
        }
    }

    /// Override the persistence key.
    ///
    /// An empty explicit key keeps the field-name fallback, mirroring the
    /// annotation semantics this descriptor stands in for.
    pub fn with_key(mut self, key: &str) -> Self {
        if !key.is_empty() {
            self.key = key.to_string();
        }
        self
    }

    /// Attach documentation lines rendered above the key in decorated saves.
    pub fn docs<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.docs = lines.into_iter().map(Into::into).collect();
        self
    }

    /// Mark the field as a section with the given name.
    ///
    /// An empty name falls back to the resolved key, the same fallback rule
    /// applied a second time.
    pub fn section(mut self, name: &str) -> Self {
        self.section = true;
        if !name.is_empty() {
            self.section_key = Some(name.to_string());
        }
        self
    }

    /// Mark the field as starting a new logical group; decorated encoders
    /// emit a blank separator line before it.
    pub fn group_start(mut self) -> Self {
        self.group_start = true;
        self
    }

    /// Resolved persistence key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Declared field kind.
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Documentation lines.
    pub fn doc_lines(&self) -> &[String] {
        &self.docs
    }

    /// Whether the field is a section.
    pub fn is_section(&self) -> bool {
        self.section
    }

    /// Resolved section name (explicit name, falling back to the key).
    ///
    /// Only meaningful when [`is_section`](Self::is_section) is true.
    pub fn section_name(&self) -> &str {
        self.section_key.as_deref().unwrap_or(&self.key)
    }

    /// Whether the field starts a new logical group.
    pub fn starts_group(&self) -> bool {
        self.group_start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_falls_back_to_field_name() {
        let f = FieldDescriptor::new("port", FieldKind::Numeric(NumericKind::U16));
        assert_eq!(f.key(), "port");

        let f = FieldDescriptor::new("port", FieldKind::Numeric(NumericKind::U16)).with_key("");
        assert_eq!(f.key(), "port");

        let f = FieldDescriptor::new("port", FieldKind::Numeric(NumericKind::U16))
            .with_key("listen_port");
        assert_eq!(f.key(), "listen_port");
    }

    #[test]
    fn section_name_falls_back_to_key() {
        let f = FieldDescriptor::new("database", FieldKind::Nested).section("");
        assert!(f.is_section());
        assert_eq!(f.section_name(), "database");

        let f = FieldDescriptor::new("database", FieldKind::Nested)
            .with_key("db")
            .section("");
        assert_eq!(f.section_name(), "db");

        let f = FieldDescriptor::new("database", FieldKind::Nested).section("storage");
        assert_eq!(f.section_name(), "storage");
    }
}
