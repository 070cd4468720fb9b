//! # confmap
//!
//! Maps typed configuration objects to and from human-editable text files
//! (JSON, YAML, TOML, Java-properties style), preserving per-field
//! documentation and nested sections, and never leaving the on-disk file
//! partially written.
//!
//! ## Features
//!
//! - Format-agnostic persistence driven by declarative field descriptors
//! - Nested section objects of arbitrary depth
//! - Decorated saves: class header comments, per-field documentation,
//!   logical-group separators
//! - Atomic file replacement via sibling temp file + rename
//! - Graceful degradation: missing/empty/corrupt files fall back to defaults,
//!   one bad field never blocks the rest of the document
//! - Pluggable backends selected by file extension
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use confmap::{
//!     require_str, require_u64, BackendRegistry, FieldDescriptor, FieldKind, NumericKind,
//!     Persisted, SaveMode, Value,
//! };
//!
//! struct ServerConfig {
//!     name: String,
//!     port: u16,
//! }
//!
//! impl Persisted for ServerConfig {
//!     fn fields(&self) -> Vec<FieldDescriptor> {
//!         vec![
//!             FieldDescriptor::new("name", FieldKind::Str).docs(["Display name."]),
//!             FieldDescriptor::new("port", FieldKind::Numeric(NumericKind::U16)),
//!         ]
//!     }
//!
//!     fn get(&self, key: &str) -> Option<Value> {
//!         match key {
//!             "name" => Some(Value::from(self.name.clone())),
//!             "port" => Some(Value::from(self.port)),
//!             _ => None,
//!         }
//!     }
//!
//!     fn set(&mut self, key: &str, value: Value) -> Result<(), confmap::PersistError> {
//!         match key {
//!             "name" => self.name = require_str(key, &value)?,
//!             "port" => self.port = require_u64(key, &value)? as u16,
//!             _ => {}
//!         }
//!         Ok(())
//!     }
//! }
//!
//! let registry = BackendRegistry::default();
//! let mut config = registry
//!     .load_initial("server.toml", SaveMode::Decorated, || ServerConfig {
//!         name: "TestServer".into(),
//!         port: 8080,
//!     })
//!     .unwrap();
//! config.port = 9090;
//! config.save().unwrap();
//! ```
//!
//! ## Modules
//!
//! - [`backend`] - Document backends (JSON, TOML, YAML, properties)
//! - [`coerce`] - Scalar coercion into declared numeric kinds
//! - [`error`] - Error types and result definitions
//! - [`field`] - Field descriptors and kind enumerations
//! - [`object`] - The [`Persisted`] contract
//! - [`persist`] - Lifecycle controller and the [`Persistent`] wrapper
//! - [`registry`] - Extension-based backend resolution
//! - [`value`] - Typed extraction helpers over the value tree
//! - [`walker`] - Structural walker over declared field lists

/// Document backends: decode/encode for each supported format.
pub mod backend;

/// Scalar coercion into declared numeric kinds.
pub mod coerce;

/// Error types and result definitions.
pub mod error;

/// Field descriptors and the closed kind enumerations.
pub mod field;

/// The contract persisted config objects implement.
pub mod object;

/// Persistence lifecycle: load, save, reload, atomic writes.
pub mod persist;

/// Extension-based backend registry.
pub mod registry;

/// Typed extraction helpers for `set` implementations.
pub mod value;

/// Structural walker over declared field lists.
pub mod walker;

pub use backend::{DocComments, DocumentBackend, KeyDocs};
pub use error::{PersistError, Result};
pub use field::{FieldDescriptor, FieldKind, NumericKind};
pub use object::Persisted;
pub use persist::{ConfigOption, Persistent, Persister, SaveMode};
pub use registry::BackendRegistry;
pub use value::{require_bool, require_f64, require_i64, require_str, require_str_seq, require_u64};
pub use serde_json::Value;
