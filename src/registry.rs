//! Extension-based backend resolution and the `load_initial` entry point.
//!
//! A registry is an explicitly constructed value, not a process-wide global:
//! tests and embedders can build isolated registries with their own backend
//! sets. [`BackendRegistry::default`] registers the four built-in backends.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::{
    backend::{
        json::JsonBackend, properties::PropertiesBackend, toml::TomlBackend, yaml::YamlBackend,
        DocumentBackend,
    },
    error::{PersistError, Result},
    object::Persisted,
    persist::{Persistent, Persister, SaveMode},
};

/// Maps file extensions to document backends.
pub struct BackendRegistry {
    backends: Vec<Arc<dyn DocumentBackend>>,
}

impl Default for BackendRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(JsonBackend);
        registry.register(TomlBackend);
        registry.register(YamlBackend);
        registry.register(PropertiesBackend);
        registry
    }
}

impl BackendRegistry {
    /// A registry with no backends.
    pub fn empty() -> Self {
        Self {
            backends: Vec::new(),
        }
    }

    /// Register a backend. Later registrations win on extension conflicts.
    pub fn register(&mut self, backend: impl DocumentBackend + 'static) {
        self.backends.push(Arc::new(backend));
    }

    /// Resolve a backend by file extension, case-insensitively.
    ///
    /// An unknown extension is a configuration mistake, not a runtime
    /// condition: the error is returned before any file I/O happens.
    pub fn resolve(&self, extension: &str) -> Result<Arc<dyn DocumentBackend>> {
        let wanted = extension.to_ascii_lowercase();
        self.backends
            .iter()
            .rev()
            .find(|backend| backend.extensions().contains(&wanted.as_str()))
            .cloned()
            .ok_or(PersistError::UnsupportedExtension { extension: wanted })
    }

    fn resolve_path(&self, path: &Path) -> Result<Arc<dyn DocumentBackend>> {
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.resolve(&extension)
    }

    /// Load a config object from `path`, creating the file when absent.
    ///
    /// The returned instance always has deterministic values: populated from
    /// the file when it decodes, otherwise the factory's defaults. The
    /// instance comes back bound to its persister, so `save`/`reload` work
    /// on it directly.
    pub fn load_initial<T, F>(
        &self,
        path: impl AsRef<Path>,
        mode: SaveMode,
        factory: F,
    ) -> Result<Persistent<T>>
    where
        T: Persisted,
        F: FnOnce() -> T,
    {
        let path: PathBuf = path.as_ref().to_path_buf();
        let backend = self.resolve_path(&path)?;
        let persister = Persister::new(path.clone(), backend, mode);

        let mut value = factory();
        if !path.exists() {
            persister.save(&value)?;
            return Ok(Persistent::bound(value, persister));
        }

        // The fresh instance carries the defaults, so the degraded paths of
        // `reload` (empty file, decode failure, bad fields) land exactly on
        // "fully default" without rewriting the file.
        persister.reload(&mut value)?;
        Ok(Persistent::bound(value, persister))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_is_case_insensitive() {
        let registry = BackendRegistry::default();
        assert_eq!(registry.resolve("TOML").unwrap().name(), "toml");
        assert_eq!(registry.resolve("Yml").unwrap().name(), "yaml");
        assert_eq!(registry.resolve("json").unwrap().name(), "json");
        assert_eq!(registry.resolve("properties").unwrap().name(), "properties");
    }

    #[test]
    fn unknown_extension_names_the_extension() {
        let err = BackendRegistry::default().resolve("ini").unwrap_err();
        assert!(matches!(
            err,
            PersistError::UnsupportedExtension { ref extension } if extension == "ini"
        ));
    }

    #[test]
    fn registries_are_isolated() {
        let empty = BackendRegistry::empty();
        assert!(empty.resolve("json").is_err());
        assert!(BackendRegistry::default().resolve("json").is_ok());
    }
}
