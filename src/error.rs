//! Error types and result definitions for config persistence operations.

use std::path::PathBuf;

use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, PersistError>;

/// Errors surfaced by the persistence engine.
///
/// Recoverable conditions (missing files, empty documents, single bad fields)
/// are absorbed and logged by the lifecycle controller and never appear here;
/// this enum covers the conditions that must reach the caller.
#[derive(Debug, Error)]
pub enum PersistError {
    /// No registered backend serves the file extension.
    #[error("unsupported config file extension {extension:?}")]
    UnsupportedExtension {
        /// Extension taken from the target path (may be empty).
        extension: String,
    },

    /// `save` or `reload` was called on an instance that was never loaded
    /// through a registry.
    #[error("instance is not bound to a config file; it was not initialized via load_initial")]
    NotInitialized,

    /// File system failure during a save, with the path it concerned.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// Path of the file or directory being written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The decoded document root is not a table/mapping.
    #[error("document root is not a table")]
    InvalidRoot,

    /// A decoded value does not fit the field's declared type.
    #[error("type mismatch at {key}: expected {expected}, got {actual}")]
    TypeMismatch {
        /// Resolved key of the offending field.
        key: String,
        /// Human-readable name of the expected type.
        expected: &'static str,
        /// Rendering of the actual value.
        actual: String,
    },

    /// An object declared a section field but returned no nested object for it.
    #[error("no nested object registered for section field {key:?}")]
    MissingSection {
        /// Field key of the missing section.
        key: String,
    },

    /// JSON encode/decode failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML decode failure.
    #[error("TOML decode error: {0}")]
    TomlDecode(#[from] toml::de::Error),

    /// TOML encode failure.
    #[error("TOML encode error: {0}")]
    TomlEncode(#[from] toml::ser::Error),

    /// YAML encode/decode failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl PersistError {
    /// Wrap an I/O error with the path it concerned.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
